//! Disk-backed response cache.
//!
//! Every successful remote fetch is stored under a caller-chosen key and
//! served on later runs. Entries never expire; a per-call bypass flag makes a
//! read behave exactly like a miss. Key schemes in use:
//!
//! ```text
//! <username>                               user profile (JSON)
//! -<owner>-<repo>                          walked repository tree (JSON)
//! files/<owner>/<repo>/<branch>/<path>     raw file text
//! ```
//!
//! `/` in a key becomes a directory boundary under the cache root. The last
//! segment gets an `.entry` suffix so a key can never collide with the
//! directory of a longer key (`files` vs `files/...`).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::ports::filesystem::FileSystem;

const ENTRY_SUFFIX: &str = ".entry";

/// Failure to store a cache record.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key cannot be mapped to a path inside the cache root.
    #[error("invalid cache key {0:?}")]
    InvalidKey(String),
    /// The payload could not be encoded.
    #[error("failed to encode cache record {key:?}: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Underlying serializer error.
        source: serde_json::Error,
    },
    /// The filesystem write failed.
    #[error("failed to write cache record {key:?}: {message}")]
    Io {
        /// Key being written.
        key: String,
        /// Underlying error text.
        message: String,
    },
}

/// Read-through/write-through store for remote payloads.
pub struct ResponseCache<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
}

impl<'a> ResponseCache<'a> {
    /// Creates a cache rooted at `root`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self { fs, root }
    }

    /// Maps a key to its file under the cache root.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidKey`] for empty keys and keys containing
    /// `.` or `..` segments.
    pub fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, dirs)) = segments.split_last() else {
            return Err(CacheError::InvalidKey(key.to_string()));
        };
        if segments.iter().any(|s| *s == "." || *s == ".." || s.contains('\\')) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        let mut path = self.root.to_path_buf();
        path.extend(dirs);
        path.push(format!("{last}{ENTRY_SUFFIX}"));
        Ok(path)
    }

    /// Returns the stored payload, or `None` on a miss, an unreadable
    /// record, an invalid key, or when `bypass` is set.
    #[must_use]
    pub fn read(&self, key: &str, bypass: bool) -> Option<String> {
        if bypass {
            tracing::debug!(key, "cache bypassed");
            return None;
        }
        let path = self.entry_path(key).ok()?;
        match self.fs.read_to_string(&path) {
            Ok(payload) => {
                tracing::debug!(key, "cache hit");
                Some(payload)
            }
            Err(_) => {
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }

    /// Like [`ResponseCache::read`], decoding the payload as JSON. A record
    /// that does not decode as `T` counts as a miss.
    #[must_use]
    pub fn read_json<T: DeserializeOwned>(&self, key: &str, bypass: bool) -> Option<T> {
        let payload = self.read(key, bypass)?;
        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "discarding malformed cache record");
                None
            }
        }
    }

    /// Replaces the record for `key` with `payload`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    pub fn write(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        self.fs
            .write(&path, payload)
            .map_err(|e| CacheError::Io { key: key.to_string(), message: e.to_string() })
    }

    /// Replaces the record for `key` with the JSON encoding of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the key, or the write fails.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)
            .map_err(|source| CacheError::Encode { key: key.to_string(), source })?;
        self.write(key, &payload)
    }

    /// Writes and logs instead of failing: a record that could not be stored
    /// only costs a refetch next time.
    pub fn store_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write_json(key, value) {
            tracing::warn!(error = %e, "cache write failed");
        }
    }

    /// Text counterpart of [`ResponseCache::store_json`].
    pub fn store(&self, key: &str, payload: &str) {
        if let Err(e) = self.write(key, payload) {
            tracing::warn!(error = %e, "cache write failed");
        }
    }
}
