//! Error types for the movie finder core.
//!
//! Two error types live here. [`FetchError`] is the closed taxonomy every
//! catalog request resolves to; it is cheap to clone so it can ride inside
//! [`ViewEvent`](crate::app::ViewEvent)s. [`MovieFinderError`] covers
//! everything else (storage, configuration, I/O) and wraps `FetchError` for
//! callers that want a single error type. Both derive `thiserror::Error`.

use thiserror::Error;

/// Machine-checkable classification of a [`FetchError`].
///
/// The presentation layer maps a kind to a user-facing message; the core
/// never formats UI strings beyond the `Display` of the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The request could not be built (bad URL, missing API key).
    InvalidRequest,
    /// Connectivity failure or timeout. Retryable by the caller.
    Transport,
    /// The response carried no body.
    EmptyBody,
    /// The body did not match the expected shape. Not retryable.
    Decode,
}

impl FetchErrorKind {
    /// Whether a caller may reasonably re-issue the same request.
    ///
    /// Only transport failures qualify; an invalid request or a body that
    /// failed to decode will fail the same way again.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transport)
    }
}

/// Failure of a single catalog request.
///
/// Non-2xx statuses are not a separate variant: the catalog reports errors
/// through the body, which then fails to decode into the expected shape and
/// surfaces as [`FetchError::Decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was rejected before any network call was attempted.
    ///
    /// Covers malformed base URLs, unencodable parameters and an empty API
    /// key.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The network layer failed (connection refused, DNS, TLS, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered but sent no body.
    #[error("no data received")]
    EmptyBody,

    /// The body could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Returns the machine-checkable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidRequest(_) => FetchErrorKind::InvalidRequest,
            Self::Transport(_) => FetchErrorKind::Transport,
            Self::EmptyBody => FetchErrorKind::EmptyBody,
            Self::Decode(_) => FetchErrorKind::Decode,
        }
    }

    /// Returns the optional detail string attached to this error.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidRequest(detail) | Self::Transport(detail) | Self::Decode(detail) => {
                Some(detail.as_str())
            }
            Self::EmptyBody => None,
        }
    }
}

/// The crate-level error type for operations outside the fetch path.
///
/// # Examples
///
/// ```
/// use movie_finder::domain::{FetchError, MovieFinderError};
///
/// let err: MovieFinderError = FetchError::EmptyBody.into();
/// assert_eq!(err.to_string(), "Fetch error: no data received");
/// ```
#[derive(Debug, Error)]
pub enum MovieFinderError {
    /// Reading or writing the key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog request failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// A specialized `Result` type for movie finder operations.
pub type Result<T> = std::result::Result<T, MovieFinderError>;
