//! Hand-off of network completions to the owning controller.
//!
//! Dispatcher callbacks run on a runtime worker. They must not touch
//! controller state, so the callback a controller passes only moves its result
//! into the controller's own channel through a [`Ticket`]. The controller then
//! applies results on its owner context via [`CompletionQueue::next`] or
//! [`CompletionQueue::try_next`].
//!
//! Every ticket carries a request id. Only the id of the most recently issued
//! ticket is accepted; anything else is dropped on receipt.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
struct Tagged<T> {
    request_id: u64,
    payload: T,
}

/// One-shot sender for the result of a single issued request.
#[derive(Debug)]
pub struct Ticket<T> {
    request_id: u64,
    tx: UnboundedSender<Tagged<T>>,
}

impl<T> Ticket<T> {
    #[must_use]
    pub const fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Posts `payload` back to the owner. A closed owner is ignored.
    pub fn deliver(self, payload: T) {
        if self
            .tx
            .send(Tagged {
                request_id: self.request_id,
                payload,
            })
            .is_err()
        {
            tracing::trace!(request_id = self.request_id, "owner gone, completion dropped");
        }
    }
}

/// Owner-side end of the completion channel.
#[derive(Debug)]
pub struct CompletionQueue<T> {
    tx: UnboundedSender<Tagged<T>>,
    rx: UnboundedReceiver<Tagged<T>>,
    next_id: u64,
    pending: Option<u64>,
}

impl<T> Default for CompletionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompletionQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            next_id: 0,
            pending: None,
        }
    }

    /// Issues a ticket for a new request, superseding any pending one.
    pub fn issue(&mut self) -> Ticket<T> {
        self.next_id += 1;
        self.pending = Some(self.next_id);
        Ticket {
            request_id: self.next_id,
            tx: self.tx.clone(),
        }
    }

    /// Forgets the pending request; its result will be dropped on arrival.
    pub fn invalidate(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Waits for the pending request's result.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn next(&mut self) -> Option<T> {
        while self.pending.is_some() {
            let tagged = self.rx.recv().await?;
            if let Some(payload) = self.accept(tagged) {
                return Some(payload);
            }
        }
        None
    }

    /// Returns the pending request's result if it has already arrived.
    pub fn try_next(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(tagged) => {
                    if let Some(payload) = self.accept(tagged) {
                        return Some(payload);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }

    fn accept(&mut self, tagged: Tagged<T>) -> Option<T> {
        if self.pending == Some(tagged.request_id) {
            self.pending = None;
            Some(tagged.payload)
        } else {
            tracing::debug!(
                request_id = tagged.request_id,
                pending = ?self.pending,
                "discarding superseded completion"
            );
            None
        }
    }
}
