//! Timestamped payload wrapper.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into every new envelope.
///
/// Entries written under another version read as absent.
pub const SCHEMA_VERSION: u32 = 1;

/// A cached payload plus the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    /// When the payload was written
    pub stored_at: DateTime<Utc>,
    /// The cached value
    pub payload: T,
    /// Schema version of the writer
    pub schema_version: u32,
}

impl<T> CacheEnvelope<T> {
    /// Wrap a payload stored now.
    pub fn new(payload: T) -> Self {
        Self::stored_at(payload, Utc::now())
    }

    /// Wrap a payload with an explicit store time.
    pub fn stored_at(payload: T, stored_at: DateTime<Utc>) -> Self {
        Self {
            stored_at,
            payload,
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Age at `now`; never negative.
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.stored_at).max(TimeDelta::zero())
    }

    /// Age right now.
    pub fn age(&self) -> TimeDelta {
        self.age_at(Utc::now())
    }

    /// Unwrap the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_timestamps_have_zero_age() {
        let now = Utc::now();
        let envelope = CacheEnvelope::stored_at("x", now + TimeDelta::hours(1));
        assert_eq!(envelope.age_at(now), TimeDelta::zero());
    }

    #[test]
    fn new_envelopes_use_current_schema() {
        let envelope = CacheEnvelope::new(5u8);
        assert_eq!(envelope.schema_version, SCHEMA_VERSION);
        assert!(envelope.age() < TimeDelta::seconds(5));
    }
}
