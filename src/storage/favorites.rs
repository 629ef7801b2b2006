//! Durable favorites set.
//!
//! The whole set is one JSON array stored under [`FAVORITES_KEY`]. Every
//! operation re-reads the blob and every mutation rewrites it whole; there is
//! no in-memory copy to drift from what another controller (or process) just
//! wrote.
//!
//! # Corruption
//!
//! A blob that fails to parse reads as an empty set. That is user-visible
//! data loss, not a crash: [`FavoritesStore::list`] cannot tell "empty" from
//! "corrupted". [`FavoritesStore::load`] exposes the distinction for
//! diagnostics.

use crate::domain::error::{MovieFinderError, Result};
use crate::domain::Movie;
use crate::storage::backend::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Storage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "favorite_movies";

/// Result of reading the favorites blob, keeping the reason for an empty set.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesSnapshot {
    /// No blob has been stored yet (or it was cleared).
    Missing,
    /// The blob parsed; the set may still be empty.
    Parsed(Vec<Movie>),
    /// The blob, or the backend holding it, could not be read.
    Corrupted {
        /// Why the read failed.
        reason: String,
    },
}

impl FavoritesSnapshot {
    /// Movies in stored order; empty for `Missing` and `Corrupted`.
    #[must_use]
    pub fn into_movies(self) -> Vec<Movie> {
        match self {
            Self::Parsed(movies) => movies,
            Self::Missing | Self::Corrupted { .. } => Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_corrupted(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }
}

/// The user's favorited movies, unique by `id`, in insertion order.
///
/// Mutations run read-modify-write under an internal mutex, so two
/// controllers toggling favorites from different threads cannot lose each
/// other's update.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").finish_non_exhaustive()
    }
}

impl FavoritesStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the favorites blob and reports how it was found.
    #[must_use]
    pub fn load(&self) -> FavoritesSnapshot {
        let bytes = match self.store.get(FAVORITES_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return FavoritesSnapshot::Missing,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorites, treating as empty");
                return FavoritesSnapshot::Corrupted {
                    reason: e.to_string(),
                };
            }
        };

        match serde_json::from_slice::<Vec<Movie>>(&bytes) {
            Ok(movies) => FavoritesSnapshot::Parsed(movies),
            Err(e) => {
                tracing::warn!(error = %e, "favorites blob is corrupted, treating as empty");
                FavoritesSnapshot::Corrupted {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Favorites in insertion order. Missing or corrupted data reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<Movie> {
        self.load().into_movies()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.list().len()
    }

    /// Membership test by `id`.
    #[must_use]
    pub fn is_favorite(&self, movie: &Movie) -> bool {
        self.list().iter().any(|m| m.id == movie.id)
    }

    /// Appends `movie` unless an entry with the same `id` exists.
    ///
    /// Adding an existing movie does not write.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated set cannot be persisted.
    pub fn add(&self, movie: &Movie) -> Result<()> {
        let _span = tracing::debug_span!("favorites_add", movie_id = movie.id).entered();
        let _guard = self.write_lock.lock();
        self.insert_locked(movie)
    }

    /// Drops every entry with `movie`'s `id` and persists the result.
    ///
    /// The write happens even when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated set cannot be persisted.
    pub fn remove(&self, movie: &Movie) -> Result<()> {
        let _span = tracing::debug_span!("favorites_remove", movie_id = movie.id).entered();
        let _guard = self.write_lock.lock();
        self.remove_locked(movie)
    }

    /// Flips membership of `movie` and returns the new state.
    ///
    /// The membership check and the write happen under one lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated set cannot be persisted.
    pub fn toggle(&self, movie: &Movie) -> Result<bool> {
        let _span = tracing::debug_span!("favorites_toggle", movie_id = movie.id).entered();
        let _guard = self.write_lock.lock();

        if self.is_favorite(movie) {
            self.remove_locked(movie)?;
            Ok(false)
        } else {
            self.insert_locked(movie)?;
            Ok(true)
        }
    }

    /// Deletes the stored blob entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the delete.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        tracing::debug!("clearing favorites");
        self.store.delete(FAVORITES_KEY)
    }

    fn insert_locked(&self, movie: &Movie) -> Result<()> {
        let mut favorites = self.list();
        if favorites.iter().any(|m| m.id == movie.id) {
            tracing::debug!("already a favorite");
            return Ok(());
        }

        favorites.push(movie.clone());
        self.save(&favorites)?;

        tracing::debug!(count = favorites.len(), "favorite added");
        Ok(())
    }

    fn remove_locked(&self, movie: &Movie) -> Result<()> {
        let mut favorites = self.list();
        let before = favorites.len();
        favorites.retain(|m| m.id != movie.id);
        self.save(&favorites)?;

        tracing::debug!(removed = before - favorites.len(), "favorite removed");
        Ok(())
    }

    fn save(&self, favorites: &[Movie]) -> Result<()> {
        let bytes = serde_json::to_vec(favorites)
            .map_err(|e| MovieFinderError::Storage(format!("failed to encode favorites: {e}")))?;
        self.store.set(FAVORITES_KEY, &bytes)
    }
}
