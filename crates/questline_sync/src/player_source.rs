//! Remote player status with cache, retry, fallback, and background refresh.

use crate::{
    PlayerStatusApi, Recovery, RetryPolicy, Sleeper, SnapshotUpdate, TokioSleeper,
    UpdateSubscription, recover, snapshot_from_response,
};
use chrono::{DateTime, Utc};
use questline_cache::Cache;
use questline_core::{PlayerSnapshot, SnapshotOrigin, Username};
use questline_error::{SyncError, SyncResult};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Cache namespace for player snapshots, keyed by lower-cased username.
pub const PLAYER_NAMESPACE: &str = "player-cache";

const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Per-call options for [`PlayerStatusSource::fetch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Go straight to the network, ignoring any cached snapshot
    pub skip_cache: bool,
    /// Attempt number to start from; the retry budget counts up from here
    pub attempt: u32,
}

impl FetchOptions {
    /// Bypass the cache.
    pub fn skip_cache() -> Self {
        Self {
            skip_cache: true,
            attempt: 0,
        }
    }
}

/// Fetches player snapshots, serving the cache first and refreshing it behind the caller.
///
/// Clones share the API client, cache, and update channel.
#[derive(Clone)]
pub struct PlayerStatusSource {
    api: Arc<dyn PlayerStatusApi>,
    cache: Cache,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    updates: broadcast::Sender<SnapshotUpdate>,
}

impl std::fmt::Debug for PlayerStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStatusSource")
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PlayerStatusSource {
    /// Create a source with the default retry policy and real sleeps.
    pub fn new(api: Arc<dyn PlayerStatusApi>, cache: Cache) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            api,
            cache,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            updates,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Listen for background refresh results for `username`.
    pub fn subscribe(&self, username: &str) -> UpdateSubscription {
        UpdateSubscription::new(username, self.updates.subscribe())
    }

    /// Fetch a player's snapshot.
    ///
    /// With a cached snapshot and `skip_cache` unset, the cached copy is returned at once
    /// (tagged [`SnapshotOrigin::Cache`]) and a refresh is spawned. Otherwise the network
    /// is tried under the retry policy; some failures fall back to the cache, tagged
    /// [`SnapshotOrigin::Fallback`].
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid username. Other errors follow the recovery matrix in
    /// [`recover`].
    #[instrument(skip(self), fields(skip_cache = options.skip_cache, attempt = options.attempt))]
    pub async fn fetch(&self, username: &str, options: FetchOptions) -> SyncResult<PlayerSnapshot> {
        let username = Username::parse(username)?;

        if !options.skip_cache {
            let cached = self
                .cache
                .read::<PlayerSnapshot>(PLAYER_NAMESPACE, &username.cache_key())
                .await;
            if let Some(envelope) = cached {
                tracing::debug!(
                    stored_at = %envelope.stored_at,
                    stale = self.cache.is_stale(PLAYER_NAMESPACE, &envelope),
                    "Serving cached snapshot"
                );
                let cached = envelope.into_payload();
                self.spawn_refresh(username, *cached.fetched_at());
                return Ok(cached.with_origin(SnapshotOrigin::Cache));
            }
        }

        let snapshot = self.fetch_remote(&username, options.attempt).await?;
        if snapshot.origin() == SnapshotOrigin::Network {
            self.cache
                .write(PLAYER_NAMESPACE, &username.cache_key(), &snapshot)
                .await;
        }
        Ok(snapshot)
    }

    /// Spawn a detached refresh that replaces the cached snapshot.
    ///
    /// The refresh makes a single attempt. A newer `fetched_at` than `cached_fetched_at`
    /// is broadcast to subscribers.
    pub fn spawn_refresh(
        &self,
        username: Username,
        cached_fetched_at: Option<DateTime<Utc>>,
    ) -> JoinHandle<()> {
        let source = self.clone();
        tokio::spawn(async move {
            source.refresh(username, cached_fetched_at).await;
        })
    }

    #[instrument(skip(self, cached_fetched_at), fields(username = %username))]
    async fn refresh(&self, username: Username, cached_fetched_at: Option<DateTime<Utc>>) {
        let snapshot = match self.fetch_remote(&username, self.retry.max_retries).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e.kind(), "Background refresh failed");
                return;
            }
        };

        if snapshot.origin() != SnapshotOrigin::Network {
            tracing::debug!("Background refresh fell back to cache; keeping cached snapshot");
            return;
        }

        self.cache
            .write(PLAYER_NAMESPACE, &username.cache_key(), &snapshot)
            .await;

        if *snapshot.fetched_at() == cached_fetched_at {
            tracing::debug!("Background refresh found no newer data");
            return;
        }

        tracing::info!(fetched_at = ?snapshot.fetched_at(), "Background refresh found newer data");
        let update = SnapshotUpdate { username, snapshot };
        if self.updates.send(update).is_err() {
            tracing::debug!("No subscribers for snapshot update");
        }
    }

    async fn fetch_remote(&self, username: &Username, start: u32) -> SyncResult<PlayerSnapshot> {
        let mut attempt = start;
        loop {
            let outcome = match self.api.fetch_status(username).await {
                Ok(response) => snapshot_from_response(response),
                Err(e) => Err(e),
            };

            let error = match outcome {
                Ok(snapshot) => {
                    tracing::debug!(attempt, quests = snapshot.quests().len(), "Fetched snapshot");
                    return Ok(snapshot);
                }
                Err(error) => error,
            };

            tracing::warn!(
                attempt = attempt + 1,
                max_retries = self.retry.max_retries,
                error = %error.kind(),
                "Player status attempt failed"
            );

            match recover(error.kind(), username, attempt, &self.retry) {
                Recovery::Retry { delay } => {
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Recovery::Fail(kind) => return Err(SyncError::new(kind)),
                Recovery::Fallback { reason, otherwise } => {
                    let cached = self
                        .cache
                        .read::<PlayerSnapshot>(PLAYER_NAMESPACE, &username.cache_key())
                        .await;
                    return match cached {
                        Some(envelope) => {
                            let snapshot = envelope.into_payload();
                            tracing::warn!(
                                fetched_at = ?snapshot.fetched_at(),
                                %reason,
                                "Using cached snapshot"
                            );
                            Ok(snapshot.with_origin(SnapshotOrigin::Fallback(reason)))
                        }
                        None => Err(SyncError::new(otherwise)),
                    };
                }
            }
        }
    }
}
