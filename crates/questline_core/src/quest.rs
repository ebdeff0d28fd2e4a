//! Quest completion records.

use serde::{Deserialize, Serialize};

/// Completion state of one quest for one player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    /// Not started (also the meaning of "absent from the snapshot")
    #[default]
    NotStarted,
    /// Started but not finished
    InProgress,
    /// Finished
    Complete,
}

impl QuestStatus {
    /// Map the sync service's numeric status code.
    ///
    /// `2` is complete, `1` is in progress, anything else is not started.
    ///
    /// # Examples
    ///
    /// ```
    /// use questline_core::QuestStatus;
    ///
    /// assert_eq!(QuestStatus::from_code(2), QuestStatus::Complete);
    /// assert_eq!(QuestStatus::from_code(7), QuestStatus::NotStarted);
    /// ```
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => QuestStatus::Complete,
            1 => QuestStatus::InProgress,
            _ => QuestStatus::NotStarted,
        }
    }

    /// True only for [`QuestStatus::Complete`].
    pub fn is_complete(self) -> bool {
        self == QuestStatus::Complete
    }
}

/// One quest's status inside a player snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestRecord {
    /// Quest name, the stable identifier
    pub name: String,
    /// Completion state
    pub status: QuestStatus,
}

impl QuestRecord {
    /// Create a quest record.
    pub fn new(name: impl Into<String>, status: QuestStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}
