//! Core data types for the Questline quest tracker.
//!
//! This crate holds the shapes every other crate agrees on: quest records, skill and
//! quest requirements, player snapshots, validated usernames, and the static quest
//! catalog that defines the canonical checklist order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod quest;
mod requirement;
mod snapshot;
mod username;

pub use catalog::{CanonicalQuestOrder, CatalogQuest, QuestCatalog, RequirementSpec};
pub use quest::{QuestRecord, QuestStatus};
pub use requirement::{RequirementMap, RequirementRecord, SkillRequirement};
pub use snapshot::{FallbackReason, PlayerSnapshot, SnapshotOrigin};
pub use username::{MAX_USERNAME_LEN, Username};
