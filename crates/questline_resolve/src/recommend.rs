//! The single recommendation shown to the player.

use crate::{UnmetRequirements, next_actionable, unmet_requirements};
use questline_core::{
    CanonicalQuestOrder, PlayerSnapshot, QuestStatus, RequirementMap, RequirementRecord,
};
use std::collections::HashSet;

/// The quest to do next and what stands in the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextQuest {
    /// Quest name
    pub name: String,
    /// Current status; never complete
    pub status: QuestStatus,
    /// Everything the quest requires
    pub requirements: RequirementRecord,
    /// Requirements the player still lacks
    pub unmet: UnmetRequirements,
}

/// Outcome of resolving the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// There is a quest to work on
    Next(NextQuest),
    /// Every trackable quest is complete
    ChecklistComplete,
}

/// Combine the checklist order, player progress, and requirements into one recommendation.
pub fn recommend(
    order: &CanonicalQuestOrder,
    excluded: &HashSet<String>,
    snapshot: &PlayerSnapshot,
    requirements: &RequirementMap,
) -> Recommendation {
    let Some(name) = next_actionable(order, snapshot, excluded) else {
        tracing::debug!("Checklist complete");
        return Recommendation::ChecklistComplete;
    };

    let record = requirements.requirements_for(name);
    let unmet = unmet_requirements(&record, snapshot);
    tracing::debug!(
        quest = name,
        unmet_skills = unmet.skills.len(),
        unmet_quests = unmet.quests.len(),
        "Recommending next quest"
    );

    Recommendation::Next(NextQuest {
        name: name.to_string(),
        status: snapshot.status_of(name).unwrap_or_default(),
        requirements: record,
        unmet,
    })
}
