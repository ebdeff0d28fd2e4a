use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use questline_cache::{Cache, CacheEnvelope, CacheStore, MemoryCacheStore};
use questline_core::{
    FallbackReason, PlayerSnapshot, QuestRecord, QuestStatus, SnapshotOrigin, Username,
};
use questline_error::{
    ErrorClass, SyncErrorKind, TransportError, TransportErrorKind, TransportResult,
};
use questline_sync::{
    FetchOptions, PLAYER_NAMESPACE, PlayerStatusApi, PlayerStatusResponse, PlayerStatusSource,
    RetryPolicy, Sleeper,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ScriptedApi {
    script: Mutex<VecDeque<TransportResult<PlayerStatusResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(script: Vec<TransportResult<PlayerStatusResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayerStatusApi for ScriptedApi {
    async fn fetch_status(&self, _username: &Username) -> TransportResult<PlayerStatusResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::new(TransportErrorKind::Other(
                "script exhausted".to_string(),
            )))
        })
    }
}

#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn timestamp(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn response(synced: DateTime<Utc>) -> TransportResult<PlayerStatusResponse> {
    Ok(PlayerStatusResponse {
        quests: Some(BTreeMap::from([
            ("Cook's Assistant".to_string(), 2),
            ("Sheep Shearer".to_string(), 1),
        ])),
        levels: Some(BTreeMap::from([("Attack".to_string(), 40)])),
        timestamp: Some(synced.to_rfc3339()),
        error: None,
    })
}

fn failure(kind: TransportErrorKind) -> TransportResult<PlayerStatusResponse> {
    Err(TransportError::new(kind))
}

fn status(code: u16) -> TransportErrorKind {
    TransportErrorKind::Status {
        status: code,
        code: None,
        message: None,
    }
}

fn cached_snapshot(synced: DateTime<Utc>) -> PlayerSnapshot {
    PlayerSnapshot::new(
        vec![QuestRecord::new("Cook's Assistant", QuestStatus::Complete)],
        BTreeMap::from([("Attack".to_string(), 30)]),
        Some(synced),
    )
}

struct Harness {
    store: Arc<MemoryCacheStore>,
    cache: Cache,
    api: Arc<ScriptedApi>,
    sleeper: Arc<RecordingSleeper>,
    source: PlayerStatusSource,
}

fn harness(script: Vec<TransportResult<PlayerStatusResponse>>) -> Harness {
    let store = Arc::new(MemoryCacheStore::new());
    let cache = Cache::new(store.clone());
    let api = ScriptedApi::new(script);
    let sleeper = Arc::new(RecordingSleeper::default());
    let source = PlayerStatusSource::new(api.clone(), cache.clone())
        .with_retry(RetryPolicy::new(3, Duration::from_millis(1000)))
        .with_sleeper(sleeper.clone());
    Harness {
        store,
        cache,
        api,
        sleeper,
        source,
    }
}

async fn seed(cache: &Cache, snapshot: &PlayerSnapshot, age: TimeDelta) {
    let envelope = CacheEnvelope::stored_at(snapshot, Utc::now() - age);
    cache
        .write_envelope(PLAYER_NAMESPACE, "zezima", &envelope)
        .await
        .unwrap();
}

async fn wait_for_calls(api: &ScriptedApi, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while api.calls() < expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("background refresh ran");
}

#[tokio::test]
async fn test_not_found_fails_without_retry_or_cache_change() {
    let h = harness(vec![failure(status(404))]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(1)).await;
    let before = h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap();

    let err = h
        .source
        .fetch("Zezima", FetchOptions::skip_cache())
        .await
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &SyncErrorKind::PlayerNotFound("Zezima".to_string())
    );
    assert_eq!(err.kind().class(), ErrorClass::PermanentRemote);
    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());
    assert_eq!(h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap(), before);
}

#[tokio::test]
async fn test_invalid_username_makes_no_call() {
    let h = harness(vec![]);
    let err = h
        .source
        .fetch("   ", FetchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind().class(), ErrorClass::InputValidation);
    assert_eq!(h.api.calls(), 0);
}

#[tokio::test]
async fn test_server_errors_back_off_linearly_then_succeed() {
    let h = harness(vec![
        failure(status(500)),
        failure(status(500)),
        failure(status(500)),
        response(timestamp(9)),
    ]);

    let snapshot = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(snapshot.origin(), SnapshotOrigin::Network);
    assert_eq!(h.api.calls(), 4);
    assert_eq!(
        h.sleeper.delays(),
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(3000),
        ]
    );

    let cached = h
        .cache
        .read::<PlayerSnapshot>(PLAYER_NAMESPACE, "zezima")
        .await
        .expect("successful fetch is cached");
    assert_eq!(cached.payload, snapshot);
}

#[tokio::test]
async fn test_server_errors_exhaust_into_server_message() {
    let h = harness((0..4).map(|_| failure(status(500))).collect());
    let err = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &SyncErrorKind::Server("Internal server error".to_string())
    );
    assert_eq!(h.api.calls(), 4);
}

#[tokio::test]
async fn test_timeouts_fall_back_to_cache() {
    let h = harness(
        (0..4)
            .map(|_| failure(TransportErrorKind::Timeout("deadline".into())))
            .collect(),
    );
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(2)).await;

    let snapshot = h
        .source
        .fetch("Zezima", FetchOptions::skip_cache())
        .await
        .unwrap();

    assert_eq!(
        snapshot.origin(),
        SnapshotOrigin::Fallback(FallbackReason::ServerTimeout)
    );
    assert!(snapshot.sync_label().ends_with("(Cached - Server Timeout)"));
    assert_eq!(h.sleeper.delays().len(), 3);
}

#[tokio::test]
async fn test_unreachable_without_cache_fails_at_once() {
    let h = harness(vec![failure(TransportErrorKind::Unreachable("dns".into()))]);
    let err = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), &SyncErrorKind::Network);
    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_exhausted_generic_failures_serve_cache() {
    let h = harness((0..4).map(|_| failure(status(503))).collect());
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(2)).await;

    let snapshot = h
        .source
        .fetch("zezima", FetchOptions::skip_cache())
        .await
        .unwrap();
    assert_eq!(
        snapshot.origin(),
        SnapshotOrigin::Fallback(FallbackReason::ApiFailure)
    );
    assert!(snapshot.sync_label().ends_with("(Cached)"));
}

#[tokio::test]
async fn test_rate_limit_fails_at_once_without_cache_fallback() {
    let h = harness(vec![failure(status(429)), response(timestamp(9))]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(2)).await;
    let before = h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap();

    let err = h
        .source
        .fetch("Zezima", FetchOptions::skip_cache())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &SyncErrorKind::RateLimited);
    assert_eq!(err.kind().class(), ErrorClass::PermanentRemote);
    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());
    assert_eq!(h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap(), before);
}

#[tokio::test]
async fn test_world_type_rejection_fails_at_once_without_cache_fallback() {
    let h = harness(vec![
        failure(TransportErrorKind::Rejected(
            "Cannot query data for this world type.".to_string(),
        )),
        response(timestamp(9)),
    ]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(2)).await;
    let before = h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap();

    let err = h
        .source
        .fetch("Zezima", FetchOptions::skip_cache())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &SyncErrorKind::UnsupportedWorld);
    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());
    assert_eq!(h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap(), before);
}

#[tokio::test]
async fn test_rate_limit_without_cache_writes_nothing() {
    let h = harness(vec![failure(status(429))]);

    let err = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &SyncErrorKind::RateLimited);
    assert_eq!(h.api.calls(), 1);
    assert!(h.store.load(PLAYER_NAMESPACE, "zezima").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_quest_list_is_not_accepted() {
    let empty = Ok(PlayerStatusResponse {
        quests: Some(BTreeMap::new()),
        ..Default::default()
    });
    let h = harness((0..4).map(|_| empty.clone()).collect());
    let err = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), SyncErrorKind::RetriesExhausted(_)));
}

#[tokio::test]
async fn test_stale_cache_is_served_and_refreshed_once() {
    let h = harness(vec![response(timestamp(12))]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(30)).await;
    let mut updates = h.source.subscribe("ZEZIMA");

    let snapshot = h
        .source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(snapshot.origin(), SnapshotOrigin::Cache);
    assert_eq!(*snapshot.fetched_at(), Some(timestamp(8)));

    let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .expect("update delivered")
        .expect("channel open");
    assert_eq!(update.username.as_str(), "Zezima");
    assert_eq!(*update.snapshot.fetched_at(), Some(timestamp(12)));
    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());

    let cached = h
        .cache
        .read::<PlayerSnapshot>(PLAYER_NAMESPACE, "zezima")
        .await
        .unwrap();
    assert_eq!(*cached.payload.fetched_at(), Some(timestamp(12)));
}

#[tokio::test]
async fn test_unchanged_refresh_sends_no_update() {
    let h = harness(vec![response(timestamp(8))]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(30)).await;
    let mut updates = h.source.subscribe("zezima");

    h.source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap();
    wait_for_calls(&h.api, 1).await;

    let received = tokio::time::timeout(Duration::from_millis(100), updates.recv()).await;
    assert!(received.is_err());
    assert_eq!(h.api.calls(), 1);
}

#[tokio::test]
async fn test_failed_refresh_keeps_cache_and_does_not_retry() {
    let h = harness(vec![failure(status(500))]);
    let seeded = cached_snapshot(timestamp(8));
    seed(&h.cache, &seeded, TimeDelta::hours(30)).await;

    h.source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap();
    wait_for_calls(&h.api, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.api.calls(), 1);
    assert!(h.sleeper.delays().is_empty());
    let cached = h
        .cache
        .read::<PlayerSnapshot>(PLAYER_NAMESPACE, "zezima")
        .await
        .unwrap();
    assert_eq!(cached.payload, seeded);
}

#[tokio::test]
async fn test_updates_for_other_players_are_filtered() {
    let h = harness(vec![response(timestamp(12))]);
    seed(&h.cache, &cached_snapshot(timestamp(8)), TimeDelta::hours(30)).await;
    let mut other = h.source.subscribe("Lynx Titan");

    h.source
        .fetch("Zezima", FetchOptions::default())
        .await
        .unwrap();
    wait_for_calls(&h.api, 1).await;

    let received = tokio::time::timeout(Duration::from_millis(100), other.recv()).await;
    assert!(received.is_err());
}
