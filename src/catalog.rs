//! Typed façade over the remote movie catalog.
//!
//! Two operations, both thin: build the request descriptor (fixed path,
//! API key, locale, operation parameters) and hand it to the controller's
//! [`Dispatcher`]. No caching, no retry.

use crate::domain::{FetchError, ImageConfig, MovieDetail, SearchPage};
use crate::network::{Dispatcher, RequestDescriptor, Transport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

const SEARCH_PATH: &str = "/search/movie";

/// Connection settings for the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API root, e.g. `https://api.themoviedb.org/3`.
    pub api_base_url: String,
    /// Sent as the `api_key` query parameter. Must be non-empty.
    pub api_key: String,
    /// Sent as the `language` query parameter.
    pub language: String,
    pub request_timeout_secs: u64,
    pub images: ImageConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            language: "pt-BR".to_string(),
            request_timeout_secs: 15,
            images: ImageConfig::default(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Catalog operations for one controller.
///
/// Each client owns its own [`Dispatcher`], so a search on one screen never
/// cancels a detail fetch on another.
#[derive(Debug)]
pub struct CatalogClient {
    config: Arc<CatalogConfig>,
    dispatcher: Dispatcher,
}

impl CatalogClient {
    #[must_use]
    pub fn new(config: Arc<CatalogConfig>, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        let dispatcher = Dispatcher::new(transport, runtime, config.request_timeout());
        Self { config, dispatcher }
    }

    /// Fetches one page of text-search results.
    ///
    /// Fails immediately with [`FetchError::InvalidRequest`] when no API key
    /// is configured.
    pub fn search<F>(&self, query: &str, page: u32, on_complete: F)
    where
        F: FnOnce(Result<SearchPage, FetchError>) + Send + 'static,
    {
        tracing::debug!(query, page, "catalog search");
        match self.descriptor(SEARCH_PATH) {
            Ok(request) => {
                let request = request.param("query", query).param("page", page);
                self.dispatcher.perform(&request, on_complete);
            }
            Err(e) => on_complete(Err(e)),
        }
    }

    /// Fetches the full record of one movie.
    pub fn get_details<F>(&self, movie_id: i64, on_complete: F)
    where
        F: FnOnce(Result<MovieDetail, FetchError>) + Send + 'static,
    {
        tracing::debug!(movie_id, "catalog details");
        match self.descriptor(&format!("/movie/{movie_id}")) {
            Ok(request) => self.dispatcher.perform(&request, on_complete),
            Err(e) => on_complete(Err(e)),
        }
    }

    fn descriptor(&self, path: &str) -> Result<RequestDescriptor, FetchError> {
        if !self.config.has_api_key() {
            return Err(FetchError::InvalidRequest(
                "API key is not configured".to_string(),
            ));
        }

        Ok(RequestDescriptor::get(&self.config.api_base_url, path)
            .param("api_key", &self.config.api_key)
            .param("language", &self.config.language))
    }
}
