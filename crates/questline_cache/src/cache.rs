//! Namespaced envelope cache over a pluggable store.

use crate::{CacheEnvelope, CachePolicy, CacheResult, CacheStore, SCHEMA_VERSION};
use questline_error::{CacheError, CacheErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Envelope cache addressed by `(namespace, key)`.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    default_policy: CachePolicy,
    policies: Arc<HashMap<String, CachePolicy>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("default_policy", &self.default_policy)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Create a cache with the default policy for every namespace.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            default_policy: CachePolicy::default(),
            policies: Arc::new(HashMap::new()),
        }
    }

    /// Replace the policy used for namespaces without an override.
    pub fn with_default_policy(mut self, policy: CachePolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Override the policy for one namespace.
    pub fn with_policy(mut self, namespace: impl Into<String>, policy: CachePolicy) -> Self {
        Arc::make_mut(&mut self.policies).insert(namespace.into(), policy);
        self
    }

    /// Policy in effect for a namespace.
    pub fn policy(&self, namespace: &str) -> CachePolicy {
        self.policies
            .get(namespace)
            .copied()
            .unwrap_or(self.default_policy)
    }

    /// Read an unexpired envelope.
    ///
    /// Returns `None` for a missing, expired, corrupt, or wrong-schema entry. Anything
    /// other than a missing entry also clears the slot.
    #[tracing::instrument(skip(self))]
    pub async fn read<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
    ) -> Option<CacheEnvelope<T>> {
        let raw = match self.store.load(namespace, key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cache entry");
                self.discard(namespace, key).await;
                return None;
            }
        };

        let envelope: CacheEnvelope<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt cache entry");
                self.discard(namespace, key).await;
                return None;
            }
        };

        if envelope.schema_version != SCHEMA_VERSION {
            tracing::warn!(
                found = envelope.schema_version,
                expected = SCHEMA_VERSION,
                "Discarding cache entry from another schema version"
            );
            self.discard(namespace, key).await;
            return None;
        }

        if self.policy(namespace).is_expired(&envelope) {
            tracing::debug!(stored_at = %envelope.stored_at, "Cache entry expired");
            self.discard(namespace, key).await;
            return None;
        }

        let CacheEnvelope {
            stored_at,
            payload,
            schema_version,
        } = envelope;
        match serde_json::from_value(payload) {
            Ok(payload) => {
                tracing::debug!(%stored_at, "Cache hit");
                Some(CacheEnvelope {
                    stored_at,
                    payload,
                    schema_version,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding cache entry with unreadable payload");
                self.discard(namespace, key).await;
                None
            }
        }
    }

    /// Store a payload stamped with the current time.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn write<T: Serialize>(&self, namespace: &str, key: &str, payload: &T) {
        let envelope = CacheEnvelope::new(payload);
        if let Err(e) = self.write_envelope(namespace, key, &envelope).await {
            tracing::warn!(namespace, key, error = %e, "Cache write failed");
        }
    }

    /// Store a prebuilt envelope, surfacing failures.
    #[tracing::instrument(skip(self, envelope), fields(stored_at = %envelope.stored_at))]
    pub async fn write_envelope<T: Serialize>(
        &self,
        namespace: &str,
        key: &str,
        envelope: &CacheEnvelope<T>,
    ) -> CacheResult<()> {
        let contents = serde_json::to_string(envelope)
            .map_err(|e| CacheError::new(CacheErrorKind::Serialization(e.to_string())))?;
        self.store.save(namespace, key, &contents).await
    }

    /// Clear one slot.
    pub async fn remove(&self, namespace: &str, key: &str) -> CacheResult<()> {
        self.store.remove(namespace, key).await
    }

    /// Clear every slot in a namespace, returning how many were removed.
    pub async fn clear_namespace(&self, namespace: &str) -> CacheResult<usize> {
        self.store.clear(namespace).await
    }

    /// True once an envelope from `namespace` should be refreshed.
    pub fn is_stale<T>(&self, namespace: &str, envelope: &CacheEnvelope<T>) -> bool {
        self.policy(namespace).is_stale(envelope)
    }

    /// True once an envelope from `namespace` must no longer be served.
    pub fn is_expired<T>(&self, namespace: &str, envelope: &CacheEnvelope<T>) -> bool {
        self.policy(namespace).is_expired(envelope)
    }

    async fn discard(&self, namespace: &str, key: &str) {
        if let Err(e) = self.store.remove(namespace, key).await {
            tracing::warn!(namespace, key, error = %e, "Failed to clear cache slot");
        }
    }
}
