//! Storage backend trait.

use async_trait::async_trait;
use questline_error::CacheError;

/// Result type for cache store operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Raw key-value storage for serialized envelopes.
///
/// Backends store opaque JSON text addressed by `(namespace, key)`; envelope parsing,
/// expiry, and corruption handling live in [`crate::Cache`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the text stored in a slot, or `None` if the slot is empty.
    async fn load(&self, namespace: &str, key: &str) -> CacheResult<Option<String>>;

    /// Replace the contents of a slot.
    async fn save(&self, namespace: &str, key: &str, contents: &str) -> CacheResult<()>;

    /// Empty a slot. Removing an empty slot is not an error.
    async fn remove(&self, namespace: &str, key: &str) -> CacheResult<()>;

    /// Empty every slot in a namespace, returning how many were removed.
    async fn clear(&self, namespace: &str) -> CacheResult<usize>;
}
