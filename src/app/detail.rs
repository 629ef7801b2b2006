//! Movie detail screen controller.

use super::completion::CompletionQueue;
use super::events::{emit, ViewEvent};
use super::phase::Submission;
use crate::catalog::CatalogClient;
use crate::domain::{FetchError, Movie, MovieDetail, Result};
use crate::storage::FavoritesStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

type DetailResult = std::result::Result<MovieDetail, FetchError>;

/// Loads the full record for one movie and manages its favorite flag.
///
/// Starts from the [`Movie`] the user picked in a list; once details load,
/// [`current_movie`](Self::current_movie) is the projection of the detail
/// record instead.
#[derive(Debug)]
pub struct DetailController {
    catalog: CatalogClient,
    favorites: Arc<FavoritesStore>,
    events: UnboundedSender<ViewEvent>,
    completions: CompletionQueue<DetailResult>,
    movie: Movie,
    detail: Option<MovieDetail>,
    is_loading: bool,
    last_error: Option<FetchError>,
}

impl DetailController {
    #[must_use]
    pub fn new(
        movie: Movie,
        catalog: CatalogClient,
        favorites: Arc<FavoritesStore>,
        events: UnboundedSender<ViewEvent>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            events,
            completions: CompletionQueue::new(),
            movie,
            detail: None,
            is_loading: false,
            last_error: None,
        }
    }

    /// Requests the detail record. Rejected while a request is outstanding.
    pub fn load_details(&mut self) -> Submission {
        if self.is_loading {
            tracing::debug!(movie_id = self.movie.id, "details already loading");
            return Submission::Rejected;
        }

        self.is_loading = true;
        emit(&self.events, ViewEvent::FetchStarted);

        let ticket = self.completions.issue();
        self.catalog
            .get_details(self.movie.id, move |result| ticket.deliver(result));
        Submission::Issued
    }

    /// Waits for the outstanding request and applies it.
    pub async fn process_next(&mut self) -> bool {
        match self.completions.next().await {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    /// Applies a result that has already arrived.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(result) = self.completions.try_next() {
            self.apply(result);
            applied += 1;
        }
        applied
    }

    /// The detail projection once loaded, else the movie this screen opened
    /// with.
    #[must_use]
    pub fn current_movie(&self) -> Movie {
        self.detail
            .as_ref()
            .map_or_else(|| self.movie.clone(), MovieDetail::to_movie)
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorites.is_favorite(&self.current_movie())
    }

    /// Flips the favorite flag of the current movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites set cannot be persisted.
    pub fn toggle_favorite(&mut self) -> Result<bool> {
        let movie = self.current_movie();
        let is_favorite = self.favorites.toggle(&movie)?;
        emit(
            &self.events,
            ViewEvent::FavoriteStatusChanged {
                movie_id: movie.id,
                is_favorite,
            },
        );
        Ok(is_favorite)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    fn apply(&mut self, result: DetailResult) {
        self.is_loading = false;
        emit(&self.events, ViewEvent::FetchFinished);

        match result {
            Ok(detail) => {
                tracing::debug!(movie_id = detail.id, "details loaded");
                self.last_error = None;
                let is_favorite = self.favorites.is_favorite(&detail.to_movie());
                self.detail = Some(detail.clone());
                emit(
                    &self.events,
                    ViewEvent::DetailsLoaded {
                        movie: detail,
                        is_favorite,
                    },
                );
            }
            Err(e) => {
                tracing::debug!(movie_id = self.movie.id, error = %e, "details failed");
                self.last_error = Some(e.clone());
                emit(&self.events, ViewEvent::Error(e));
            }
        }
    }
}
