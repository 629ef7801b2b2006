//! Paginated movie search.
//!
//! [`SearchController`] owns the pagination state for one search screen:
//! the active query, the page last requested, the accumulated results and
//! whether the catalog has more pages. It issues at most one fetch at a time
//! and rejects `search`/`load_more` while that fetch is outstanding.
//!
//! # Owner context
//!
//! The controller is not shared between threads. Fetch results arrive on a
//! channel and are applied only when the owner calls
//! [`process_next`](SearchController::process_next) or
//! [`drain`](SearchController::drain), so every state change happens on the
//! owner's context.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo(ctx: movie_finder::AppContext) {
//! let (tx, mut events) = tokio::sync::mpsc::unbounded_channel();
//! let mut search = ctx.search_controller(tx);
//!
//! search.search("batman");
//! search.process_next().await;
//! while search.has_more_pages() {
//!     search.load_more();
//!     search.process_next().await;
//! }
//! println!("{} results", search.results().len());
//! # }
//! ```

use super::completion::CompletionQueue;
use super::events::{emit, ViewEvent};
use super::phase::{SearchPhase, Submission};
use crate::catalog::CatalogClient;
use crate::domain::{FetchError, Movie, Result, SearchPage};
use crate::storage::FavoritesStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug)]
struct PageCompletion {
    reset: bool,
    page: u32,
    result: std::result::Result<SearchPage, FetchError>,
}

/// Search-as-you-type controller with page accumulation.
#[derive(Debug)]
pub struct SearchController {
    catalog: CatalogClient,
    favorites: Arc<FavoritesStore>,
    events: UnboundedSender<ViewEvent>,
    completions: CompletionQueue<PageCompletion>,
    query: String,
    current_page: u32,
    results: Vec<Movie>,
    has_more_pages: bool,
    phase: SearchPhase,
    last_error: Option<FetchError>,
}

impl SearchController {
    #[must_use]
    pub fn new(
        catalog: CatalogClient,
        favorites: Arc<FavoritesStore>,
        events: UnboundedSender<ViewEvent>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            events,
            completions: CompletionQueue::new(),
            query: String::new(),
            current_page: 1,
            results: Vec::new(),
            has_more_pages: false,
            phase: SearchPhase::Idle,
            last_error: None,
        }
    }

    /// Starts a new search for `query`.
    ///
    /// A blank query clears the results and issues nothing. Otherwise the
    /// accumulated results are dropped and page 1 is requested. Rejected
    /// while a fetch is outstanding.
    pub fn search(&mut self, query: &str) -> Submission {
        if self.is_loading() {
            tracing::debug!(query, "search rejected, fetch outstanding");
            return Submission::Rejected;
        }

        let query = query.trim();
        if query.is_empty() {
            self.query.clear();
            self.reset_results();
            self.phase = SearchPhase::Idle;
            self.last_error = None;
            emit(&self.events, ViewEvent::ResultsUpdated);
            return Submission::Cleared;
        }

        self.query = query.to_string();
        self.reset_results();
        self.fetch(true);
        Submission::Issued
    }

    /// Requests the next page of the active query.
    ///
    /// Rejected while a fetch is outstanding, when there is no active query,
    /// or when the last page has already been loaded.
    pub fn load_more(&mut self) -> Submission {
        if self.is_loading() || !self.has_more_pages || self.query.is_empty() {
            tracing::trace!(
                phase = %self.phase,
                has_more = self.has_more_pages,
                "load_more ignored"
            );
            return Submission::Rejected;
        }

        self.current_page += 1;
        self.fetch(false);
        Submission::Issued
    }

    /// Drops all results and any outstanding fetch, returning to `Idle`.
    pub fn clear_results(&mut self) {
        if self.is_loading() {
            self.completions.invalidate();
            emit(&self.events, ViewEvent::FetchFinished);
        }
        self.query.clear();
        self.reset_results();
        self.phase = SearchPhase::Idle;
        self.last_error = None;
        emit(&self.events, ViewEvent::ResultsUpdated);
    }

    /// Waits for the outstanding fetch and applies it.
    ///
    /// Returns `false` without waiting when nothing is outstanding.
    pub async fn process_next(&mut self) -> bool {
        match self.completions.next().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Applies a completion that has already arrived, without waiting.
    ///
    /// Returns the number of completions applied (zero or one).
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.completions.try_next() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Whether `movie` is in the favorites set.
    #[must_use]
    pub fn is_favorite(&self, movie: &Movie) -> bool {
        self.favorites.is_favorite(movie)
    }

    /// Adds or removes `movie` from favorites and returns the new membership.
    ///
    /// The result list is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites set cannot be persisted.
    pub fn toggle_favorite(&mut self, movie: &Movie) -> Result<bool> {
        let is_favorite = self.favorites.toggle(movie)?;
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
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    #[must_use]
    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    fn reset_results(&mut self) {
        self.current_page = 1;
        self.results.clear();
        self.has_more_pages = false;
    }

    fn fetch(&mut self, reset: bool) {
        let page = self.current_page;
        self.phase = SearchPhase::Loading;
        tracing::debug!(query = %self.query, page, reset, "fetching search page");
        emit(&self.events, ViewEvent::FetchStarted);

        let ticket = self.completions.issue();
        self.catalog.search(&self.query, page, move |result| {
            ticket.deliver(PageCompletion {
                reset,
                page,
                result,
            });
        });
    }

    fn apply(&mut self, completion: PageCompletion) {
        let PageCompletion {
            reset,
            page,
            result,
        } = completion;
        emit(&self.events, ViewEvent::FetchFinished);

        match result {
            Ok(search_page) => {
                if reset {
                    self.results = search_page.results;
                } else {
                    self.results.extend(search_page.results);
                }
                self.current_page = page;
                self.has_more_pages = page < search_page.total_pages;
                self.phase = SearchPhase::Loaded;
                self.last_error = None;

                tracing::debug!(
                    page,
                    total_pages = search_page.total_pages,
                    accumulated = self.results.len(),
                    "search page applied"
                );
                emit(&self.events, ViewEvent::ResultsUpdated);
            }
            Err(e) => {
                if !reset {
                    self.current_page = page.saturating_sub(1).max(1);
                }
                self.phase = SearchPhase::Error;
                self.last_error = Some(e.clone());

                tracing::debug!(page, error = %e, "search page failed");
                emit(&self.events, ViewEvent::Error(e));
            }
        }
    }
}
