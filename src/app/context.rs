//! Composition root shared by all screens.

use super::detail::DetailController;
use super::events::ViewEvent;
use super::favorites::FavoritesController;
use super::search::SearchController;
use crate::catalog::{CatalogClient, CatalogConfig};
use crate::domain::Movie;
use crate::images::ImageLoader;
use crate::network::Transport;
use crate::storage::{FavoritesStore, KeyValueStore};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Collaborators shared across controllers.
///
/// The transport, favorites store and image cache are shared. Every
/// controller gets its own [`CatalogClient`] and therefore its own
/// single-flight dispatcher.
#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<CatalogConfig>,
    transport: Arc<dyn Transport>,
    favorites: Arc<FavoritesStore>,
    images: ImageLoader,
    runtime: Handle,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("catalog", &self.catalog)
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn new(
        catalog: CatalogConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
        runtime: Handle,
    ) -> Self {
        let images = ImageLoader::new(
            Arc::clone(&transport),
            runtime.clone(),
            catalog.request_timeout(),
        );
        Self {
            catalog: Arc::new(catalog),
            transport,
            favorites: Arc::new(FavoritesStore::new(store)),
            images,
            runtime,
        }
    }

    #[must_use]
    pub fn catalog_config(&self) -> &CatalogConfig {
        &self.catalog
    }

    #[must_use]
    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    #[must_use]
    pub const fn images(&self) -> &ImageLoader {
        &self.images
    }

    /// A catalog client with a fresh dispatcher.
    #[must_use]
    pub fn catalog_client(&self) -> CatalogClient {
        CatalogClient::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.transport),
            self.runtime.clone(),
        )
    }

    #[must_use]
    pub fn search_controller(&self, events: UnboundedSender<ViewEvent>) -> SearchController {
        SearchController::new(self.catalog_client(), Arc::clone(&self.favorites), events)
    }

    #[must_use]
    pub fn detail_controller(
        &self,
        movie: Movie,
        events: UnboundedSender<ViewEvent>,
    ) -> DetailController {
        DetailController::new(
            movie,
            self.catalog_client(),
            Arc::clone(&self.favorites),
            events,
        )
    }

    #[must_use]
    pub fn favorites_controller(&self, events: UnboundedSender<ViewEvent>) -> FavoritesController {
        FavoritesController::new(Arc::clone(&self.favorites), events)
    }
}
