//! Single-flight request dispatcher.
//!
//! A [`Dispatcher`] runs at most one request at a time. Issuing a new request
//! aborts the outstanding one and bumps a generation counter; a completion
//! whose generation is no longer current is dropped before its callback can
//! run, so a cancelled request never reports back even if its I/O had already
//! finished when the abort landed.
//!
//! # Architecture
//!
//! ```text
//! perform() ──► validate URL ──► bump generation, abort previous
//!                                   │
//!                                   ▼
//!                   runtime.spawn(transport.send + decode)
//!                                   │
//!                                   ▼
//!                generation current? ── no ──► drop result
//!                                   │ yes
//!                                   ▼
//!                           on_complete(result)
//! ```
//!
//! Callbacks run on the runtime worker that finished the request. Controllers
//! pass a callback that only forwards the result to their owner context.

use crate::domain::FetchError;
use crate::network::request::RequestDescriptor;
use crate::network::transport::{HttpRequest, Transport};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::Instrument;

/// Per-attempt timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    task: Option<AbortHandle>,
}

/// Issues one logical request at a time and decodes its JSON body.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    runtime: Handle,
    timeout: Duration,
    in_flight: Arc<Mutex<InFlight>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timeout", &self.timeout)
            .field("in_flight", &self.in_flight.lock().task.is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher that spawns its requests on `runtime`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, runtime: Handle, timeout: Duration) -> Self {
        Self {
            transport,
            runtime,
            timeout,
            in_flight: Arc::new(Mutex::new(InFlight::default())),
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a request is currently outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.lock().task.is_some()
    }

    /// Issues `request` and delivers the decoded body to `on_complete`.
    ///
    /// If the descriptor does not produce a valid URL the callback runs
    /// immediately with [`FetchError::InvalidRequest`]; no network call is
    /// made and the outstanding request, if any, is left alone. Otherwise the
    /// outstanding request is cancelled and its callback will never run.
    ///
    /// Status codes are not inspected: the body is decoded whatever the
    /// status, so an error payload from the server surfaces as
    /// [`FetchError::Decode`].
    pub fn perform<T, F>(&self, request: &RequestDescriptor, on_complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, FetchError>) + Send + 'static,
    {
        let url = match request.url() {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, path = %request.path, "rejecting request");
                on_complete(Err(e));
                return;
            }
        };

        let http_request = HttpRequest {
            method: request.method.clone(),
            url,
            timeout: self.timeout,
        };
        let span = tracing::debug_span!(
            "dispatch",
            method = %request.method,
            path = %request.path,
            generation = tracing::field::Empty,
        );

        let mut in_flight = self.in_flight.lock();
        in_flight.generation += 1;
        let generation = in_flight.generation;
        span.record("generation", generation);

        if let Some(previous) = in_flight.task.take() {
            previous.abort();
            tracing::debug!(superseded_by = generation, "cancelled outstanding request");
        }

        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.in_flight);
        let timeout = self.timeout;

        // The lock is held until the abort handle is stored, so the task
        // cannot observe its own completion before it is registered.
        let task = self.runtime.spawn(
            async move {
                let result = execute::<T>(transport.as_ref(), http_request, timeout).await;

                let mut current = state.lock();
                if current.generation != generation {
                    tracing::debug!("discarding stale completion");
                    return;
                }
                current.task = None;
                drop(current);

                if let Err(e) = &result {
                    tracing::debug!(error = %e, "request failed");
                }
                on_complete(result);
            }
            .instrument(span),
        );
        in_flight.task = Some(task.abort_handle());
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        in_flight.generation += 1;
        if let Some(task) = in_flight.task.take() {
            task.abort();
        }
    }
}

async fn execute<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: HttpRequest,
    timeout: Duration,
) -> Result<T, FetchError> {
    let response = match tokio::time::timeout(timeout, transport.send(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(FetchError::Transport(e.to_string())),
        Err(_) => {
            return Err(FetchError::Transport(format!(
                "request timed out after {}s",
                timeout.as_secs()
            )))
        }
    };

    if !response.is_success() {
        tracing::debug!(status = response.status, "non-success status, decoding body anyway");
    }
    if response.body.is_empty() {
        return Err(FetchError::EmptyBody);
    }

    serde_json::from_slice(&response.body).map_err(|e| FetchError::Decode(e.to_string()))
}
