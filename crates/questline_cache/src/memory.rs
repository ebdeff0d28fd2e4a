//! In-process cache store.

use crate::{CacheResult, CacheStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache store backed by a map, for tests and runs that should leave nothing on disk.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    slots: RwLock<HashMap<(String, String), String>>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots across all namespaces.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// True when no slot is occupied.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self, namespace: &str, key: &str) -> CacheResult<Option<String>> {
        let slots = self.slots.read().await;
        Ok(slots
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    async fn save(&self, namespace: &str, key: &str, contents: &str) -> CacheResult<()> {
        self.slots.write().await.insert(
            (namespace.to_string(), key.to_string()),
            contents.to_string(),
        );
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &str) -> CacheResult<()> {
        self.slots
            .write()
            .await
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    async fn clear(&self, namespace: &str) -> CacheResult<usize> {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|(ns, _), _| ns != namespace);
        Ok(before - slots.len())
    }
}
