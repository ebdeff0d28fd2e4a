//! Point-in-time capture of one player's progress.

use crate::{QuestRecord, QuestStatus};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a cached snapshot was served in place of a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FallbackReason {
    /// Every attempt timed out
    #[display("Cached - Server Timeout")]
    ServerTimeout,
    /// The network was unreachable
    #[display("Cached - Network Error")]
    NetworkError,
    /// Some other failure outlasted the retry budget
    #[display("Cached")]
    ApiFailure,
}

/// Where a snapshot handed to a caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapshotOrigin {
    /// Fetched from the sync service just now
    #[default]
    Network,
    /// Served from cache ahead of a background refresh
    Cache,
    /// Served from cache because the sync service could not be used
    Fallback(FallbackReason),
}

/// A player's quest states and skill levels as of one sync.
///
/// Snapshots are immutable once built and replaced wholesale by the next successful sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerSnapshot {
    /// Quest states, one per quest the sync service reported
    quests: Vec<QuestRecord>,
    /// Skill name to level
    skill_levels: BTreeMap<String, u32>,
    /// When the sync service last received data for this player
    fetched_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    #[getter(skip)]
    origin: SnapshotOrigin,
}

impl PlayerSnapshot {
    /// Create a snapshot that came straight from the network.
    pub fn new(
        quests: Vec<QuestRecord>,
        skill_levels: BTreeMap<String, u32>,
        fetched_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            quests,
            skill_levels,
            fetched_at,
            origin: SnapshotOrigin::Network,
        }
    }

    /// Status of a quest, if the snapshot mentions it.
    pub fn status_of(&self, quest_name: &str) -> Option<QuestStatus> {
        self.quests
            .iter()
            .find(|q| q.name == quest_name)
            .map(|q| q.status)
    }

    /// Level in a skill, if the snapshot mentions it.
    pub fn level_of(&self, skill: &str) -> Option<u32> {
        self.skill_levels.get(skill).copied()
    }

    /// Where this copy came from.
    pub fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    /// Re-tag the snapshot with a different origin.
    pub fn with_origin(mut self, origin: SnapshotOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Sync timestamp for display, annotated when served as a fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use questline_core::{FallbackReason, PlayerSnapshot, SnapshotOrigin};
    /// use std::collections::BTreeMap;
    ///
    /// let snapshot = PlayerSnapshot::new(Vec::new(), BTreeMap::new(), None)
    ///     .with_origin(SnapshotOrigin::Fallback(FallbackReason::NetworkError));
    /// assert_eq!(snapshot.sync_label(), "never synced (Cached - Network Error)");
    /// ```
    pub fn sync_label(&self) -> String {
        let stamp = self
            .fetched_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never synced".to_string());
        match self.origin {
            SnapshotOrigin::Fallback(reason) => format!("{} ({})", stamp, reason),
            SnapshotOrigin::Network | SnapshotOrigin::Cache => stamp,
        }
    }
}
