//! Scripted catalog used by controller unit tests.

use crate::catalog::{CatalogClient, CatalogConfig};
use crate::network::{HttpRequest, HttpResponse, Transport, TransportFailure};
use crate::storage::{FavoritesStore, MemoryStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use url::Url;

type Responder = dyn Fn(&Url) -> Result<String, String> + Send + Sync;

pub(crate) struct CannedTransport {
    respond: Box<Responder>,
    calls: AtomicUsize,
}

impl CannedTransport {
    pub(crate) fn new(
        respond: impl Fn(&Url) -> Result<String, String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        })
    }

    /// Two movies per page out of `total_pages`, and a detail record for any
    /// `/movie/{id}` path.
    pub(crate) fn pages(total_pages: u32) -> Arc<Self> {
        Self::new(move |url| {
            if let Some(id) = url.path().rsplit('/').next().and_then(|s| s.parse::<i64>().ok()) {
                return Ok(detail_body(id));
            }
            let page: u32 = url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(1);
            let start = i64::from(page - 1) * 2;
            Ok(page_body(page, total_pages, start..start + 2))
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = (self.respond)(&request.url).map_err(TransportFailure::new)?;
        Ok(HttpResponse {
            status: 200,
            body: Bytes::from(body),
        })
    }
}

pub(crate) fn movie_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Movie {id}"),
        "original_title": format!("Movie {id}"),
        "overview": "",
        "poster_path": null,
        "backdrop_path": null,
        "release_date": "2001-01-01",
        "vote_average": 7.0,
        "vote_count": 10
    })
}

pub(crate) fn page_body(page: u32, total_pages: u32, ids: Range<i64>) -> String {
    let results: Vec<_> = ids.map(movie_json).collect();
    serde_json::json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": u64::from(total_pages) * 2,
    })
    .to_string()
}

pub(crate) fn detail_body(id: i64) -> String {
    let mut detail = movie_json(id);
    detail["runtime"] = serde_json::json!(136);
    detail["budget"] = serde_json::json!(63_000_000);
    detail["genres"] = serde_json::json!([{ "id": 28, "name": "Ação" }]);
    detail.to_string()
}

pub(crate) fn catalog(transport: Arc<CannedTransport>, api_key: &str) -> CatalogClient {
    let config = CatalogConfig {
        api_base_url: "http://catalog.test/3".to_string(),
        api_key: api_key.to_string(),
        ..CatalogConfig::default()
    };
    CatalogClient::new(Arc::new(config), transport, Handle::current())
}

pub(crate) fn favorites() -> Arc<FavoritesStore> {
    Arc::new(FavoritesStore::new(Arc::new(MemoryStore::new())))
}
