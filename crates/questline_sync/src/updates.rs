//! Notifications for snapshots refreshed in the background.

use questline_core::{PlayerSnapshot, Username};
use tokio::sync::broadcast;

/// A newer snapshot picked up by a background refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotUpdate {
    /// Player the snapshot belongs to
    pub username: Username,
    /// The fresh snapshot
    pub snapshot: PlayerSnapshot,
}

/// Receives updates for one player.
#[derive(Debug)]
pub struct UpdateSubscription {
    username: String,
    receiver: broadcast::Receiver<SnapshotUpdate>,
}

impl UpdateSubscription {
    pub(crate) fn new(username: &str, receiver: broadcast::Receiver<SnapshotUpdate>) -> Self {
        Self {
            username: username.trim().to_string(),
            receiver,
        }
    }

    /// Name this subscription listens for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Wait for the next update for this player.
    ///
    /// Updates for other players are skipped; names compare case-insensitively.
    /// Returns `None` once the source has been dropped.
    pub async fn recv(&mut self) -> Option<SnapshotUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) if update.username.matches(&self.username) => return Some(update),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, username = %self.username, "Missed snapshot updates");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
