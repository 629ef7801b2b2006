//! Key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the favorites store
//! persists through. It is byte-oriented: callers own the encoding and the
//! backend keeps blobs durable under string keys.
//!
//! Implementations use interior mutability so one store can be shared behind
//! an `Arc` by every controller in the process.

use crate::domain::error::Result;

/// Durable byte-blob storage keyed by string.
///
/// # Implementations
///
/// - [`FileStore`](crate::storage::FileStore): single JSON document on disk
///   with atomic writes (default)
/// - [`MemoryStore`](crate::storage::MemoryStore): in-process map, lost on exit
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. No partial write is left behind.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes the blob under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be updated.
    fn delete(&self, key: &str) -> Result<()>;
}
