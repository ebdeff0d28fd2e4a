//! Best-effort requirement extraction from quest guide text.
//!
//! [`extract`] turns a free-text requirements section into skill levels and quest
//! prerequisites. Two independent passes run over the text:
//!
//! - **Skills**: an ordered list of surface patterns ("50 Firemaking",
//!   "Firemaking level 50", "level 50 Firemaking") each produce candidates; candidates
//!   for the same skill keep the highest level.
//! - **Quests**: heading-anchored patterns ("Required quests:", "the following quests:",
//!   "Completion of ...:") followed by a run of `*` bullet lines.
//!
//! Extraction never fails. Text with no recognisable requirements yields empty lists.
//!
//! # Example
//!
//! ```rust
//! use questline_extract::extract;
//!
//! let found = extract("Required quests:\n* Rune Mysteries (started)\n30 Agility\nAgility level 45");
//! assert_eq!(found.skills.len(), 1);
//! assert_eq!(found.skills[0].skill, "Agility");
//! assert_eq!(found.skills[0].level, 45);
//! assert_eq!(found.quest_prerequisites, vec!["Rune Mysteries".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extract;
mod quests;
mod skills;

pub use extract::{ExtractedRequirements, extract};
pub use quests::{QuestHeading, match_quest_prerequisites, quest_headings};
pub use skills::{
    CaptureOrder, SkillCandidate, SkillMatcher, match_skills, merge_skills, normalize_skill,
    skill_matchers,
};
