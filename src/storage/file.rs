//! JSON file-based key-value store.
//!
//! All keys live in one human-readable JSON document. Writes go to a
//! temporary file that is then renamed over the target, so a crash mid-write
//! leaves the previous document intact.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "favorite_movies": "[{\"id\":603,\"title\":\"Matrix\",...}]"
//!   }
//! }
//! ```
//!
//! UTF-8 blobs are stored as strings; anything else is stored as an array of
//! byte values.

use crate::domain::error::{MovieFinderError, Result};
use crate::storage::backend::KeyValueStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Blob {
    Text(String),
    Bytes(Vec<u8>),
}

impl Blob {
    fn from_bytes(value: &[u8]) -> Self {
        match std::str::from_utf8(value) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Bytes(value.to_vec()),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

/// On-disk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Blob>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Durable [`KeyValueStore`] backed by a single JSON file.
///
/// Nothing is cached in memory: every `get` re-reads the file, so changes
/// made by another process are visible on the next read. Mutations take an
/// internal lock around load-modify-save, which serializes writers within
/// this process.
#[derive(Debug)]
pub struct FileStore {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (or prepares to create) the store at `file_path`.
    ///
    /// Parent directories are created immediately; the file itself is only
    /// written on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening file store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            file_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load(&self) -> Result<StoreData> {
        let contents = match std::fs::read(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!("store file missing, treating as empty");
                return Ok(StoreData::default());
            }
            Err(e) => return Err(e.into()),
        };

        let data: StoreData = serde_json::from_slice(&contents)
            .map_err(|e| MovieFinderError::Storage(format!("failed to parse store file: {e}")))?;

        if data.version != FORMAT_VERSION {
            return Err(MovieFinderError::Storage(format!(
                "unsupported store version {}",
                data.version
            )));
        }

        Ok(data)
    }

    /// Like [`load`](Self::load), but an unparseable document is moved aside
    /// to `<name>.corrupt` and replaced by an empty one, so mutations can
    /// always make progress.
    fn load_for_write(&self) -> Result<StoreData> {
        match self.load() {
            Err(MovieFinderError::Storage(reason)) => {
                let aside = self.file_path.with_extension("corrupt");
                tracing::warn!(%reason, aside = ?aside, "store file unreadable, starting fresh");
                std::fs::rename(&self.file_path, &aside)?;
                Ok(StoreData::default())
            }
            other => other,
        }
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| MovieFinderError::Storage(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(entries = data.entries.len(), "store saved");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _span = tracing::debug_span!("file_store_get", key = %key).entered();

        let mut data = self.load()?;
        let value = data.entries.remove(key).map(Blob::into_bytes);

        tracing::debug!(found = value.is_some(), "lookup complete");
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let _span = tracing::debug_span!("file_store_set", key = %key, len = value.len()).entered();
        let _guard = self.write_lock.lock();

        let mut data = self.load_for_write()?;
        data.entries.insert(key.to_string(), Blob::from_bytes(value));
        self.save(&data)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("file_store_delete", key = %key).entered();
        let _guard = self.write_lock.lock();

        let mut data = self.load_for_write()?;
        if data.entries.remove(key).is_none() {
            tracing::debug!("key not present, nothing to delete");
            return Ok(());
        }
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("greeting", b"hello").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("greeting").unwrap(), Some(b"hello".to_vec()));
        assert_eq!(reopened.get("missing").unwrap(), None);
    }

    #[test]
    fn stores_non_utf8_blobs() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();

        store.set("raw", &[0xff, 0x00, 0x7f]).unwrap();
        assert_eq!(store.get("raw").unwrap(), Some(vec![0xff, 0x00, 0x7f]));
    }

    #[test]
    fn delete_removes_only_that_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        store.set("a", b"1").unwrap();
        store.set("b", b"2").unwrap();

        store.delete("a").unwrap();
        store.delete("never-set").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn sees_writes_from_another_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();

        first.set("k", b"v1").unwrap();
        assert_eq!(second.get("k").unwrap(), Some(b"v1".to_vec()));
        second.set("k", b"v2").unwrap();
        assert_eq!(first.get("k").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn unreadable_document_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(matches!(store.get("k"), Err(MovieFinderError::Storage(_))));
    }

    #[test]
    fn writes_replace_an_unreadable_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"version":1,"entries":{"k":"[]""#).unwrap();

        let store = FileStore::open(&path).unwrap();
        store.set("k", b"fresh").unwrap();

        assert_eq!(store.get("k").unwrap(), Some(b"fresh".to_vec()));
        assert_eq!(
            std::fs::read_to_string(path.with_extension("corrupt")).unwrap(),
            r#"{"version":1,"entries":{"k":"[]""#
        );
    }

    #[test]
    fn delete_on_unreadable_document_leaves_an_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"version":7,"entries":{}}"#).unwrap();

        let store = FileStore::open(&path).unwrap();
        store.delete("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(path.with_extension("corrupt").exists());
    }
}
