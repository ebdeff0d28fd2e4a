//! Resilient remote sync for player progress and quest requirements.
//!
//! Two remote datasets feed the checklist, and both are unreliable:
//!
//! - [`PlayerStatusSource`] fetches a player's quest states and skill levels from the
//!   RuneLite sync service. Cached snapshots are served first and refreshed in the
//!   background; failures retry with linear backoff and may fall back to the cache.
//! - [`RequirementSource`] fetches each quest's requirements section from the wiki and
//!   runs the extraction engine over it. It never fails; the worst case is an empty record.
//!
//! Remote calls go through the [`PlayerStatusApi`] and [`RequirementDocuments`] traits
//! and retry delays through [`Sleeper`], so the retry and fallback logic can be exercised
//! without a network.
//!
//! # Example
//!
//! ```no_run
//! use questline_sync::{
//!     FetchOptions, HttpPlayerStatusApi, PlayerStatusSource, SyncConfig,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::load()?;
//! let cache = config.cache().build()?;
//! let api = HttpPlayerStatusApi::new(config.player())?;
//! let players = PlayerStatusSource::new(Arc::new(api), cache)
//!     .with_retry(config.retry().policy());
//!
//! let snapshot = players.fetch("Zezima", FetchOptions::default()).await?;
//! println!("synced {}", snapshot.sync_label());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod markup;
mod player_api;
mod player_source;
mod recovery;
mod requirement_source;
mod retry;
mod transport;
mod updates;
mod wiki;

pub use config::{CacheConfig, EndpointConfig, NamespaceCacheConfig, RetryConfig, SyncConfig};
pub use markup::flatten_html;
pub use player_api::{ACCOUNT_TYPE, HttpPlayerStatusApi, PlayerStatusApi, PlayerStatusResponse};
pub use player_source::{FetchOptions, PLAYER_NAMESPACE, PlayerStatusSource};
pub use recovery::{
    NO_USER_DATA_CODE, Recovery, WORLD_TYPE_REJECTION, recover, snapshot_from_response,
};
pub use requirement_source::{REQUIREMENT_NAMESPACE, RequirementSource};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub(crate) use transport::transport_error;
pub use updates::{SnapshotUpdate, UpdateSubscription};
pub use wiki::{DocumentSection, HttpWikiDocuments, RequirementDocuments, find_requirements_section};
