//! Movie Finder: client core for searching a remote movie catalog.
//!
//! The crate provides the data-fetch and state-synchronization layer of a
//! movie browsing application:
//! - Single-flight HTTP dispatch with cancellation and typed JSON decoding
//! - Paginated search with page accumulation and a re-entrancy guard
//! - A durable favorites set stored as one JSON blob in a key-value store
//! - A cache-first image loader shared by every screen

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI driver (main.rs)                               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - SearchController / DetailController              │  ← State machines
//! │  - FavoritesController                              │
//! │  - AppContext (composition root)                    │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ catalog +     │   │ Storage Layer │   │ images        │
//! │ network/      │   │ (storage/)    │   │ - URL cache   │
//! │ - Dispatcher  │   │ - Favorites   │   │ - sniffing    │
//! │ - Transport   │   │ - FileStore   │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Movie models and formatting (domain/)            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controllers, events and the composition root
//! - [`catalog`]: Typed façade over the catalog API
//! - [`domain`]: Movie models, formatting and error types
//! - [`images`]: Cache-first image loading
//! - [`infrastructure`]: Data directory resolution
//! - [`network`]: Request descriptors, transport and dispatcher
//! - [`storage`]: Key-value stores and the favorites set
//! - [`observability`]: Tracing subscriber and span export
//!
//! # Configuration
//!
//! ```toml
//! data_dir = "/home/ana/.local/share/movie-finder"
//! trace_level = "debug"
//! log_to_stderr = true
//!
//! [catalog]
//! api_key = "..."
//! language = "pt-BR"
//! request_timeout_secs = 15
//! ```
//!
//! `TMDB_API_KEY` in the environment overrides `catalog.api_key`.
//!
//! # Threading
//!
//! Controllers are owned by one context and are not shared. Network work runs
//! on the tokio runtime whose [`Handle`](tokio::runtime::Handle) the context
//! was built with; results come back through each controller's channel and
//! are applied by `process_next`/`drain` on the owner.
//!
//! # Example
//!
//! ```rust,no_run
//! use movie_finder::{initialize, Config};
//!
//! # async fn run() -> movie_finder::Result<()> {
//! let config = Config::load("movie-finder.toml")?.with_env_overrides();
//! let ctx = initialize(&config)?;
//!
//! let (tx, _events) = tokio::sync::mpsc::unbounded_channel();
//! let mut search = ctx.search_controller(tx);
//! search.search("matrix");
//! search.process_next().await;
//! for movie in search.results() {
//!     println!("{} ({})", movie.title, movie.formatted_release_date());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod images;
pub mod infrastructure;
pub mod network;
pub mod observability;
pub mod storage;

pub use app::{
    AppContext, DetailController, FavoritesController, SearchController, SearchPhase, Submission,
    ViewEvent,
};
pub use catalog::{CatalogClient, CatalogConfig};
pub use domain::{FetchError, FetchErrorKind, Movie, MovieDetail, MovieFinderError, Result, SearchPage};
pub use images::{Image, ImageLoader};

use network::ReqwestTransport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::FileStore;

/// Environment variable overriding `catalog.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration (with an empty API key, which makes every catalog request
/// fail with [`FetchError::InvalidRequest`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog endpoint, credentials, locale and image sizes.
    pub catalog: CatalogConfig,

    /// Directory for the favorites store and span log.
    ///
    /// See [`infrastructure::paths::data_dir`] for the fallback chain.
    pub data_dir: Option<PathBuf>,

    /// Tracing level: `trace`, `debug`, `info`, `warn` or `error`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Also log human-readable lines to stderr.
    pub log_to_stderr: bool,
}

impl Config {
    /// Parses a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MovieFinderError::Config`] if the document is not valid TOML,
    /// a field has the wrong type, or `catalog.request_timeout_secs` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use movie_finder::Config;
    ///
    /// let config = Config::from_toml_str(r#"
    ///     trace_level = "debug"
    ///     [catalog]
    ///     api_key = "abc"
    /// "#)?;
    /// assert_eq!(config.catalog.api_key, "abc");
    /// assert_eq!(config.catalog.language, "pt-BR");
    /// # Ok::<(), movie_finder::MovieFinderError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| MovieFinderError::Config(e.to_string()))?;
        if config.catalog.request_timeout_secs == 0 {
            return Err(MovieFinderError::Config(
                "catalog.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Reads and parses the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MovieFinderError::Io`] if the file cannot be read and
    /// [`MovieFinderError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Applies environment overrides (currently only [`API_KEY_ENV`]).
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// Replaces the API key when `key` is present and non-blank.
    #[must_use]
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.catalog.api_key = key;
        }
        self
    }
}

/// Builds the application context from configuration.
///
/// Opens the file-backed favorites store in the data directory and a shared
/// `reqwest` transport. Must be called from within a tokio runtime; network
/// work is spawned on that runtime.
///
/// # Errors
///
/// Returns [`MovieFinderError::Config`] when called outside a runtime, and
/// an I/O or storage error if the data directory cannot be prepared.
pub fn initialize(config: &Config) -> Result<AppContext> {
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| MovieFinderError::Config(format!("no tokio runtime: {e}")))?;

    let store_path = infrastructure::paths::favorites_path(config);
    tracing::debug!(path = %store_path.display(), "opening favorites store");
    let store = FileStore::open(store_path)?;

    if !config.catalog.has_api_key() {
        tracing::warn!("no API key configured; catalog requests will fail");
    }

    Ok(AppContext::new(
        config.catalog.clone(),
        Arc::new(ReqwestTransport::default()),
        Arc::new(store),
        runtime,
    ))
}
