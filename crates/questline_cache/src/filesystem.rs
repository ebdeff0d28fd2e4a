//! Filesystem cache store.
//!
//! Each slot is one JSON file: `{base_path}/{namespace}/{percent-encoded key}.json`.
//!
//! ```text
//! ~/.cache/questline/
//! ├── player-cache/
//! │   └── zezima.json
//! └── requirement-cache/
//!     ├── Cook%27s%20Assistant.json
//!     └── Sheep%20Shearer.json
//! ```
//!
//! Writes go to a uniquely named temp file first and are renamed into place, so a
//! reader sees either the old or the new envelope, never a torn one.

use crate::{CacheResult, CacheStore};
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use questline_error::{CacheError, CacheErrorKind};
use std::path::PathBuf;
use uuid::Uuid;

const SLOT_EXTENSION: &str = "json";

/// Cache store writing one file per key.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    base_path: PathBuf,
}

impl FileCacheStore {
    /// Create a filesystem store rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> CacheResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            CacheError::new(CacheErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened filesystem cache store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.base_path.join(encode(namespace))
    }

    fn slot_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.namespace_dir(namespace)
            .join(format!("{}.{}", encode(key), SLOT_EXTENSION))
    }
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

#[async_trait]
impl CacheStore for FileCacheStore {
    #[tracing::instrument(skip(self))]
    async fn load(&self, namespace: &str, key: &str) -> CacheResult<Option<String>> {
        let path = self.slot_path(namespace, key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                CacheError::new(CacheErrorKind::Corrupt(format!("{}: {}", path.display(), e)))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::new(CacheErrorKind::Read(format!(
                "{}: {}",
                path.display(),
                e
            )))),
        }
    }

    #[tracing::instrument(skip(self, contents), fields(size = contents.len()))]
    async fn save(&self, namespace: &str, key: &str, contents: &str) -> CacheResult<()> {
        let dir = self.namespace_dir(namespace);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CacheError::new(CacheErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        let path = self.slot_path(namespace, key);
        let temp_path = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&temp_path, contents).await.map_err(|e| {
            CacheError::new(CacheErrorKind::Write(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            CacheError::new(CacheErrorKind::Write(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), "Wrote cache slot");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, namespace: &str, key: &str) -> CacheResult<()> {
        let path = self.slot_path(namespace, key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::new(CacheErrorKind::Remove(format!(
                "{}: {}",
                path.display(),
                e
            )))),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self, namespace: &str) -> CacheResult<usize> {
        let dir = self.namespace_dir(namespace);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(CacheError::new(CacheErrorKind::Read(format!(
                    "{}: {}",
                    dir.display(),
                    e
                ))));
            }
        };

        let mut removed = 0;
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                CacheError::new(CacheErrorKind::Read(format!("{}: {}", dir.display(), e)))
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            let is_slot = path
                .extension()
                .is_some_and(|ext| ext == SLOT_EXTENSION);
            if !is_slot {
                continue;
            }
            tokio::fs::remove_file(&path).await.map_err(|e| {
                CacheError::new(CacheErrorKind::Remove(format!("{}: {}", path.display(), e)))
            })?;
            removed += 1;
        }

        tracing::info!(namespace, removed, "Cleared cache namespace");
        Ok(removed)
    }
}
