//! Application layer: per-screen controllers and their shared context.
//!
//! Controllers own screen state and are driven from a single owner context.
//! Network results are produced on runtime workers and handed back through
//! each controller's completion queue; state changes only when the owner
//! applies them.
//!
//! # Architecture
//!
//! ```text
//! owner ── search()/load_more() ──► CatalogClient ──► Dispatcher ──► Transport
//!   ▲                                                     │
//!   │ process_next()/drain()                              ▼ worker
//!   └──────────────── CompletionQueue ◄──── Ticket::deliver(result)
//!   │
//!   └──► ViewEvent channel ──► presentation
//! ```
//!
//! # Modules
//!
//! - [`search`]: paginated search state machine
//! - [`detail`]: movie detail screen
//! - [`favorites`]: favorites screen
//! - [`context`]: [`AppContext`], the composition root
//! - [`events`]: [`ViewEvent`], the controller-to-view contract
//! - [`phase`]: [`SearchPhase`] and [`Submission`]
//! - [`completion`]: worker-to-owner hand-off

pub mod completion;
pub mod context;
pub mod detail;
pub mod events;
pub mod favorites;
pub mod phase;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::AppContext;
pub use detail::DetailController;
pub use events::ViewEvent;
pub use favorites::FavoritesController;
pub use phase::{SearchPhase, Submission};
pub use search::SearchController;
