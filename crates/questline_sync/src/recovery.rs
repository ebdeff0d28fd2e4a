//! Response validation and the failure recovery matrix for player status.

use crate::{PlayerStatusResponse, RetryPolicy};
use chrono::{DateTime, NaiveDateTime, Utc};
use questline_core::{FallbackReason, PlayerSnapshot, QuestRecord, QuestStatus, Username};
use questline_error::{SyncErrorKind, TransportError, TransportErrorKind, TransportResult};
use std::time::Duration;

/// Body `code` the sync service sends for players it has never heard from.
pub const NO_USER_DATA_CODE: &str = "NO_USER_DATA";

/// Error text the sync service sends for data synced from unsupported worlds.
pub const WORLD_TYPE_REJECTION: &str = "Cannot query data for this world type.";

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Give up with this error
    Fail(SyncErrorKind),
    /// Wait, then try again with the next attempt number
    Retry {
        /// How long to wait first
        delay: Duration,
    },
    /// Serve the cached snapshot if there is one, otherwise fail
    Fallback {
        /// Annotation for the cached snapshot
        reason: FallbackReason,
        /// Error to raise when nothing is cached
        otherwise: SyncErrorKind,
    },
}

/// Decide how to recover from a failed player status attempt.
///
/// Conditions are checked in a fixed order: 400 "no user data", other 400s, 404, 500,
/// timeouts, unreachable hosts, 429, world-type rejections, then everything else.
pub fn recover(
    error: &TransportErrorKind,
    username: &Username,
    attempt: u32,
    policy: &RetryPolicy,
) -> Recovery {
    let retry_or = |exhausted: Recovery| {
        if policy.can_retry(attempt) {
            Recovery::Retry {
                delay: policy.delay_for(attempt),
            }
        } else {
            exhausted
        }
    };

    match error.status() {
        Some(400) if error.body_code() == Some(NO_USER_DATA_CODE) => {
            return Recovery::Fail(SyncErrorKind::NoUserData(username.to_string()));
        }
        Some(400) => return Recovery::Fail(SyncErrorKind::BadRequest),
        Some(404) => return Recovery::Fail(SyncErrorKind::PlayerNotFound(username.to_string())),
        Some(500) => {
            let message = error
                .server_message()
                .unwrap_or("Internal server error")
                .to_string();
            return retry_or(Recovery::Fail(SyncErrorKind::Server(message)));
        }
        _ => {}
    }

    if error.is_timeout() {
        return retry_or(Recovery::Fallback {
            reason: FallbackReason::ServerTimeout,
            otherwise: SyncErrorKind::Timeout,
        });
    }

    if error.is_unreachable() {
        return Recovery::Fallback {
            reason: FallbackReason::NetworkError,
            otherwise: SyncErrorKind::Network,
        };
    }

    if error.status() == Some(429) {
        return Recovery::Fail(SyncErrorKind::RateLimited);
    }

    if error.server_message() == Some(WORLD_TYPE_REJECTION) {
        return Recovery::Fail(SyncErrorKind::UnsupportedWorld);
    }

    retry_or(Recovery::Fallback {
        reason: FallbackReason::ApiFailure,
        otherwise: SyncErrorKind::RetriesExhausted(error.to_string()),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc())
        })
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|t| t.and_utc()))
        .ok()
}

/// Validate a raw response and build a snapshot from it.
///
/// # Errors
///
/// Returns [`TransportErrorKind::InvalidResponse`] when the quests field is missing or
/// holds no named quests. An empty skill map is accepted with a warning.
pub fn snapshot_from_response(response: PlayerStatusResponse) -> TransportResult<PlayerSnapshot> {
    let PlayerStatusResponse {
        quests,
        levels,
        timestamp,
        ..
    } = response;

    let Some(quests) = quests else {
        let message = if timestamp.is_some() {
            "No quest data found. Please log into RuneLite and try again in a few minutes."
        } else {
            "No quest data available. Please make sure you have logged in using RuneLite recently."
        };
        return Err(TransportError::new(TransportErrorKind::InvalidResponse(
            message.to_string(),
        )));
    };

    let quests: Vec<QuestRecord> = quests
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, code)| QuestRecord::new(name, QuestStatus::from_code(code)))
        .collect();

    if quests.is_empty() {
        return Err(TransportError::new(TransportErrorKind::InvalidResponse(
            "No valid quest data found. Please check if the Wiki plugin is enabled in RuneLite."
                .to_string(),
        )));
    }

    let levels = levels.unwrap_or_default();
    if levels.is_empty() {
        tracing::warn!(
            "No skill levels found in the response. This might indicate incomplete data sync."
        );
    }

    let fetched_at = timestamp.as_deref().and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            tracing::warn!(timestamp = raw, "Unrecognised sync timestamp");
        }
        parsed
    });

    Ok(PlayerSnapshot::new(quests, levels, fetched_at))
}
