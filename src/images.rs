//! Cache-first image loading.
//!
//! One [`ImageLoader`] is shared by every screen. Lookups hit an in-memory
//! map keyed by URL; misses are fetched on the runtime and stored only when
//! the response is a recognisable image. Failures resolve to `None` and are
//! never cached, so a later call retries the fetch.

use crate::network::{HttpRequest, Transport};
use bytes::Bytes;
use dashmap::DashMap;
use image::ImageFormat;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::Instrument;
use url::Url;

/// Encoded image bytes plus the format sniffed from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub bytes: Bytes,
    pub format: ImageFormat,
}

impl Image {
    /// Wraps `bytes` if they start with a known image signature.
    #[must_use]
    pub fn from_bytes(bytes: Bytes) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let format = image::guess_format(&bytes).ok()?;
        Some(Self { bytes, format })
    }
}

/// Shared image cache with asynchronous fetch on miss.
#[derive(Clone)]
pub struct ImageLoader {
    transport: Arc<dyn Transport>,
    runtime: Handle,
    timeout: Duration,
    cache: Arc<DashMap<Url, Image>>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, runtime: Handle, timeout: Duration) -> Self {
        Self {
            transport,
            runtime,
            timeout,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the image at `url`, from cache when possible.
    ///
    /// A missing URL, a transport failure, a non-2xx status or a body that is
    /// not an image all yield `None`.
    pub async fn fetch(&self, url: Option<Url>) -> Option<Image> {
        let url = url?;
        if let Some(hit) = self.cache.get(&url) {
            tracing::trace!(%url, "image cache hit");
            return Some(hit.clone());
        }

        let span = tracing::debug_span!("image_fetch", %url);
        async {
            let request = HttpRequest {
                method: Method::GET,
                url: url.clone(),
                timeout: self.timeout,
            };
            let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::debug!(error = %e, "image fetch failed");
                    return None;
                }
                Err(_) => {
                    tracing::debug!("image fetch timed out");
                    return None;
                }
            };

            if !response.is_success() {
                tracing::debug!(status = response.status, "image fetch rejected");
                return None;
            }

            let image = Image::from_bytes(response.body)?;
            self.cache.insert(url, image.clone());
            Some(image)
        }
        .instrument(span)
        .await
    }

    /// Callback flavour of [`fetch`](Self::fetch).
    ///
    /// A cache hit (or a missing URL) completes before this returns; a miss
    /// is fetched on the runtime and the callback runs on its worker.
    pub fn load<F>(&self, url: Option<Url>, on_complete: F)
    where
        F: FnOnce(Option<Image>) + Send + 'static,
    {
        let Some(url) = url else {
            on_complete(None);
            return;
        };
        if let Some(hit) = self.cache.get(&url).map(|entry| entry.clone()) {
            on_complete(Some(hit));
            return;
        }

        let loader = self.clone();
        self.runtime.spawn(async move {
            let image = loader.fetch(Some(url)).await;
            on_complete(image);
        });
    }

    /// Parses `raw` and loads it; unparseable URLs complete with `None`.
    pub fn load_str<F>(&self, raw: Option<&str>, on_complete: F)
    where
        F: FnOnce(Option<Image>) + Send + 'static,
    {
        self.load(raw.and_then(|s| Url::parse(s).ok()), on_complete);
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_cached(&self, url: &Url) -> bool {
        self.cache.contains_key(url)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
