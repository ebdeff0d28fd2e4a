//! Expiry and staleness thresholds.

use crate::CacheEnvelope;
use chrono::{DateTime, TimeDelta, Utc};

/// Hard TTL and soft staleness threshold for one namespace.
///
/// Past `stale_after` an envelope is still served but should be refreshed in the
/// background; past `ttl` it is never served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: TimeDelta,
    stale_after: TimeDelta,
}

impl CachePolicy {
    /// Create a policy.
    pub fn new(ttl: TimeDelta, stale_after: TimeDelta) -> Self {
        Self { ttl, stale_after }
    }

    /// Build from whole hours, as written in configuration.
    pub fn from_hours(ttl_hours: u32, stale_after_hours: u32) -> Self {
        Self::new(
            TimeDelta::hours(i64::from(ttl_hours)),
            TimeDelta::hours(i64::from(stale_after_hours)),
        )
    }

    /// Hard TTL.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Staleness threshold.
    pub fn stale_after(&self) -> TimeDelta {
        self.stale_after
    }

    /// True once the envelope is older than the hard TTL.
    pub fn is_expired_at<T>(&self, envelope: &CacheEnvelope<T>, now: DateTime<Utc>) -> bool {
        envelope.age_at(now) > self.ttl
    }

    /// True once the envelope is older than the staleness threshold.
    pub fn is_stale_at<T>(&self, envelope: &CacheEnvelope<T>, now: DateTime<Utc>) -> bool {
        envelope.age_at(now) > self.stale_after
    }

    /// [`CachePolicy::is_expired_at`] against the current time.
    pub fn is_expired<T>(&self, envelope: &CacheEnvelope<T>) -> bool {
        self.is_expired_at(envelope, Utc::now())
    }

    /// [`CachePolicy::is_stale_at`] against the current time.
    pub fn is_stale<T>(&self, envelope: &CacheEnvelope<T>) -> bool {
        self.is_stale_at(envelope, Utc::now())
    }
}

impl Default for CachePolicy {
    /// 7 day TTL, stale after 24 hours.
    fn default() -> Self {
        Self::new(TimeDelta::days(7), TimeDelta::hours(24))
    }
}
