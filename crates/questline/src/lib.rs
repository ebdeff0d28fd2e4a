//! Questline - quest checklist tracking against live player progress
//!
//! Questline walks a canonical quest order, checks each quest against a player's synced
//! progress, and recommends the first quest that is not complete together with the skill
//! levels and prerequisite quests the player still lacks.
//!
//! # Features
//!
//! - **Player sync**: Quest states and skill levels from the player sync service, with
//!   retry, cache fallback and background refresh
//! - **Requirement scraping**: Requirements sections from the wiki, extracted into
//!   structured records
//! - **Caching**: Namespaced, versioned cache entries with TTL and staleness policies
//! - **Resolution**: A total recommendation over whatever data is available
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use questline::{FetchOptions, QuestCatalog, Questline, Recommendation, SyncConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Questline::from_config(&SyncConfig::load()?, QuestCatalog::bundled()?)?;
//!
//!     let report = app.next_quest("Zezima", FetchOptions::default()).await?;
//!     if let Recommendation::Next(next) = report.recommendation {
//!         println!("Next up: {}", next.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `questline_error` - error taxonomy
//! - `questline_core` - data model and quest catalog
//! - `questline_cache` - cache store
//! - `questline_extract` - requirement extraction
//! - `questline_sync` - remote sources
//! - `questline_resolve` - prerequisite resolution

#![warn(missing_docs)]

mod observability;
mod service;

pub use observability::{LoggingConfig, init_logging};
pub use service::{QuestReport, Questline};

// Re-export error types
pub use questline_error::{
    CacheError, CacheErrorKind, CatalogError, CatalogErrorKind, ConfigError, ErrorClass,
    QuestlineError, QuestlineErrorKind, QuestlineResult, SyncError, SyncErrorKind, SyncResult,
    TransportError, TransportErrorKind, TransportResult,
};

// Re-export core types
pub use questline_core::{
    CanonicalQuestOrder, CatalogQuest, FallbackReason, MAX_USERNAME_LEN, PlayerSnapshot,
    QuestCatalog, QuestRecord, QuestStatus, RequirementMap, RequirementRecord, RequirementSpec,
    SkillRequirement, SnapshotOrigin, Username,
};

// Re-export cache types
pub use questline_cache::{
    Cache, CacheEnvelope, CachePolicy, CacheResult, CacheStore, FileCacheStore,
    MemoryCacheStore, SCHEMA_VERSION,
};

// Re-export extraction
pub use questline_extract::{ExtractedRequirements, extract};

// Re-export sync layer
pub use questline_sync::{
    CacheConfig, EndpointConfig, FetchOptions, HttpPlayerStatusApi, HttpWikiDocuments,
    PLAYER_NAMESPACE, PlayerStatusApi, PlayerStatusSource, REQUIREMENT_NAMESPACE,
    RequirementDocuments, RequirementSource, RetryConfig, RetryPolicy, Sleeper, SnapshotUpdate,
    SyncConfig, TokioSleeper, UpdateSubscription,
};

// Re-export resolution
pub use questline_resolve::{
    DEFAULT_SKILL_LEVEL, NextQuest, Recommendation, UnmetRequirements, recommend,
};
