//! Favorites screen controller.

use super::events::{emit, ViewEvent};
use crate::domain::{Movie, Result};
use crate::storage::FavoritesStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// In-memory view of the favorites set, refreshed from the store on demand.
#[derive(Debug)]
pub struct FavoritesController {
    favorites: Arc<FavoritesStore>,
    events: UnboundedSender<ViewEvent>,
    movies: Vec<Movie>,
    corrupted: bool,
}

impl FavoritesController {
    #[must_use]
    pub fn new(favorites: Arc<FavoritesStore>, events: UnboundedSender<ViewEvent>) -> Self {
        Self {
            favorites,
            events,
            movies: Vec::new(),
            corrupted: false,
        }
    }

    /// Re-reads the favorites set. A corrupted blob shows as empty.
    pub fn load(&mut self) {
        let snapshot = self.favorites.load();
        self.corrupted = snapshot.is_corrupted();
        self.movies = snapshot.into_movies();
        tracing::debug!(count = self.movies.len(), corrupted = self.corrupted, "favorites loaded");
        emit(&self.events, ViewEvent::ResultsUpdated);
    }

    /// Removes `movie` from the set and reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated set cannot be persisted.
    pub fn remove(&mut self, movie: &Movie) -> Result<()> {
        self.favorites.remove(movie)?;
        emit(
            &self.events,
            ViewEvent::FavoriteStatusChanged {
                movie_id: movie.id,
                is_favorite: false,
            },
        );
        self.load();
        Ok(())
    }

    /// Empties the stored set and the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the store refuses the delete.
    pub fn clear_all(&mut self) -> Result<()> {
        self.favorites.clear()?;
        self.movies.clear();
        self.corrupted = false;
        emit(&self.events, ViewEvent::ResultsUpdated);
        Ok(())
    }

    #[must_use]
    pub fn favorites(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.movies.len()
    }

    /// Whether the last [`load`](Self::load) found an unreadable blob.
    #[must_use]
    pub const fn last_load_corrupted(&self) -> bool {
        self.corrupted
    }
}
