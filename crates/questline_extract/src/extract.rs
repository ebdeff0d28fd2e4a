//! Combined extraction.

use crate::{match_quest_prerequisites, match_skills, merge_skills};
use questline_core::{RequirementRecord, SkillRequirement};
use serde::{Deserialize, Serialize};

/// Requirements found in one section of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRequirements {
    /// Skill levels, unique by skill
    pub skills: Vec<SkillRequirement>,
    /// Quest names, unique, in first-seen order
    pub quest_prerequisites: Vec<String>,
}

impl ExtractedRequirements {
    /// True when nothing was found.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.quest_prerequisites.is_empty()
    }

    /// Attach a quest name.
    pub fn into_record(self, quest_name: impl Into<String>) -> RequirementRecord {
        RequirementRecord::from_parts(quest_name, self.skills, self.quest_prerequisites)
    }
}

/// Extract skill and quest requirements from a requirements section.
///
/// Never fails; unrecognised text yields an empty result.
#[tracing::instrument(skip(text), fields(len = text.len()))]
pub fn extract(text: &str) -> ExtractedRequirements {
    let skills = merge_skills(match_skills(text));
    let quest_prerequisites = match_quest_prerequisites(text);
    tracing::debug!(
        skills = skills.len(),
        quests = quest_prerequisites.len(),
        "Extracted requirements"
    );
    ExtractedRequirements {
        skills,
        quest_prerequisites,
    }
}
