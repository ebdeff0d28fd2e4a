//! Next-quest and unmet-requirement resolution.
//!
//! Everything here is pure and synchronous. Absent data is valid input: a quest missing
//! from the snapshot counts as not started, a skill missing from the snapshot counts as
//! [`DEFAULT_SKILL_LEVEL`], and a quest missing from the requirement map has no
//! requirements.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod recommend;
mod resolver;

pub use recommend::{NextQuest, Recommendation, recommend};
pub use resolver::{DEFAULT_SKILL_LEVEL, UnmetRequirements, next_actionable, unmet_requirements};
