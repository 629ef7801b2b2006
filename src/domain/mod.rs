//! Domain layer for the movie finder core.
//!
//! Catalog models and error types, independent of transport, storage and
//! threading concerns.
//!
//! # Organization
//!
//! - [`error`]: fetch error taxonomy and the crate error type
//! - [`movie`]: `Movie`, `MovieDetail`, `SearchPage` and friends
//! - [`format`]: display helpers for money, dates and runtimes

pub mod error;
pub mod format;
pub mod movie;

pub use error::{FetchError, FetchErrorKind, MovieFinderError, Result};
pub use movie::{Genre, ImageConfig, Movie, MovieDetail, ProductionCompany, SearchPage};
