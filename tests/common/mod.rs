#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use movie_finder::network::{HttpRequest, HttpResponse, Transport, TransportFailure};
use movie_finder::storage::{FavoritesStore, MemoryStore};
use movie_finder::{AppContext, CatalogConfig, Movie, ViewEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

/// What the stub answers for a given page (or for the detail endpoint).
#[derive(Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
}

/// In-process catalog: canned replies keyed by `page` query parameter, with
/// optional per-page delay. Counts every call.
#[derive(Default)]
pub struct StubCatalog {
    replies: Mutex<HashMap<u32, Reply>>,
    details: Mutex<HashMap<i64, Reply>>,
    delays: Mutex<HashMap<u32, Duration>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
}

impl StubCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `total_pages` pages of `per_page` movies with ids numbered from 1.
    pub fn paged(total_pages: u32, per_page: i64) -> Arc<Self> {
        let stub = Self::new();
        for page in 1..=total_pages {
            let start = i64::from(page - 1) * per_page + 1;
            stub.reply(page, Reply::Body(page_json(page, total_pages, start..start + per_page)));
        }
        stub
    }

    pub fn reply(&self, page: u32, reply: Reply) {
        self.replies.lock().insert(page, reply);
    }

    pub fn detail(&self, id: i64, reply: Reply) {
        self.details.lock().insert(id, reply);
    }

    pub fn delay(&self, page: u32, delay: Duration) {
        self.delays.lock().insert(page, delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Transport for StubCatalog {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(request.url.clone());

        let detail_id = request
            .url
            .path()
            .strip_prefix("/3/movie/")
            .and_then(|id| id.parse::<i64>().ok());

        let reply = if let Some(id) = detail_id {
            self.details.lock().get(&id).cloned()
        } else {
            let page: u32 = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(1);
            let delay = self.delays.lock().get(&page).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.replies.lock().get(&page).cloned()
        };

        match reply {
            Some(Reply::Body(body)) => Ok(HttpResponse {
                status: 200,
                body: Bytes::from(body),
            }),
            Some(Reply::Fail(message)) => Err(TransportFailure::new(message)),
            None => Ok(HttpResponse {
                status: 404,
                body: Bytes::from_static(br#"{"status_code":34,"success":false}"#),
            }),
        }
    }
}

pub fn movie(id: i64) -> Movie {
    Movie {
        id,
        title: format!("Batman {id}"),
        original_title: format!("Batman {id}"),
        overview: "The caped crusader.".to_string(),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: None,
        release_date: "1989-06-23".to_string(),
        vote_average: 7.2,
        vote_count: 7000,
        budget: None,
        revenue: None,
    }
}

pub fn page_json(page: u32, total_pages: u32, ids: std::ops::Range<i64>) -> String {
    let results: Vec<Movie> = ids.map(movie).collect();
    serde_json::json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": results.len(),
    })
    .to_string()
}

pub fn detail_json(id: i64) -> String {
    let mut value = serde_json::to_value(movie(id)).unwrap();
    value["runtime"] = serde_json::json!(126);
    value["budget"] = serde_json::json!(35_000_000);
    value["revenue"] = serde_json::json!(411_348_924);
    value["genres"] = serde_json::json!([{ "id": 14, "name": "Fantasia" }]);
    value["production_companies"] = serde_json::json!([
        { "id": 174, "name": "Warner Bros. Pictures", "logo_path": null, "origin_country": "US" }
    ]);
    value.to_string()
}

pub fn catalog_config(api_key: &str) -> CatalogConfig {
    CatalogConfig {
        api_base_url: "http://catalog.test/3".to_string(),
        api_key: api_key.to_string(),
        ..CatalogConfig::default()
    }
}

pub fn context(stub: Arc<StubCatalog>, api_key: &str) -> AppContext {
    AppContext::new(
        catalog_config(api_key),
        stub,
        Arc::new(MemoryStore::new()),
        Handle::current(),
    )
}

pub fn memory_favorites() -> Arc<FavoritesStore> {
    Arc::new(FavoritesStore::new(Arc::new(MemoryStore::new())))
}

pub fn collect(rx: &mut UnboundedReceiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
