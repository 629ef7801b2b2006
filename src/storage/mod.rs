//! Storage layer for the persisted favorites set.
//!
//! The favorites set is written through a byte-oriented key-value
//! abstraction so the durable backend can be swapped (or replaced by an
//! in-memory one in tests) without touching the favorites policy.
//!
//! # Modules
//!
//! - `backend`: the [`KeyValueStore`] trait
//! - `file`: JSON-file implementation with atomic writes
//! - `memory`: in-process implementation
//! - `favorites`: the favorites set policy on top of any backend

pub mod backend;
pub mod favorites;
pub mod file;
pub mod memory;

pub use backend::KeyValueStore;
pub use favorites::{FavoritesSnapshot, FavoritesStore, FAVORITES_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;
