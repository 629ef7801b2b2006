//! Search state machine phases and request outcomes.

use std::fmt;

/// Where a [`SearchController`](super::SearchController) is in its cycle.
///
/// ```text
/// Idle ──search──► Loading ──ok──► Loaded ──load_more──► Loading
///   ▲                 │                                     │
///   └── empty query   └──err──► Error ◄─────────err─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No active query.
    #[default]
    Idle,
    /// A fetch is outstanding; new fetches are rejected.
    Loading,
    /// Results reflect the last successful fetch.
    Loaded,
    /// The last fetch failed. Earlier results are kept.
    Error,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// What a fetch-issuing call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// A fetch was issued; its completion is pending.
    Issued,
    /// Nothing was issued: a fetch is already outstanding, or there is
    /// nothing more to load.
    Rejected,
    /// The query was blank; results were cleared without a fetch.
    Cleared,
}

impl Submission {
    #[must_use]
    pub const fn is_issued(self) -> bool {
        matches!(self, Self::Issued)
    }
}
