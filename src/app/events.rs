//! Events delivered from controllers to the presentation layer.

use crate::domain::{FetchError, MovieDetail};
use tokio::sync::mpsc::UnboundedSender;

/// Notification emitted by a controller.
///
/// Every issued fetch produces exactly one [`FetchStarted`](Self::FetchStarted)
/// and one [`FetchFinished`](Self::FetchFinished), with the outcome event in
/// between the finish and the next start.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    FetchStarted,
    FetchFinished,
    /// The controller's result list changed; re-read it.
    ResultsUpdated,
    DetailsLoaded {
        movie: MovieDetail,
        is_favorite: bool,
    },
    FavoriteStatusChanged {
        movie_id: i64,
        is_favorite: bool,
    },
    Error(FetchError),
}

impl ViewEvent {
    /// Human-readable message for [`ViewEvent::Error`].
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Error(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

pub(crate) fn emit(events: &UnboundedSender<ViewEvent>, event: ViewEvent) {
    if let Err(e) = events.send(event) {
        tracing::trace!(event = ?e.0, "no listener for view event");
    }
}
