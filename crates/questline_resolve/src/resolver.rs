//! Checklist scanning and requirement checks.

use questline_core::{
    CanonicalQuestOrder, PlayerSnapshot, QuestStatus, RequirementRecord, SkillRequirement,
};
use std::collections::HashSet;

/// Level assumed for a skill the snapshot doesn't mention.
pub const DEFAULT_SKILL_LEVEL: u32 = 1;

/// First quest in `order` that is neither excluded nor complete.
///
/// Returns `None` when every quest is complete or excluded, meaning the checklist is
/// done.
///
/// # Examples
///
/// ```
/// use questline_core::{CanonicalQuestOrder, PlayerSnapshot, QuestRecord, QuestStatus};
/// use questline_resolve::next_actionable;
/// use std::collections::{BTreeMap, HashSet};
///
/// let order = CanonicalQuestOrder::new(vec![
///     "Cook's Assistant".to_string(),
///     "Sheep Shearer".to_string(),
/// ])
/// .unwrap();
/// let snapshot = PlayerSnapshot::new(
///     vec![QuestRecord::new("Cook's Assistant", QuestStatus::Complete)],
///     BTreeMap::new(),
///     None,
/// );
///
/// assert_eq!(next_actionable(&order, &snapshot, &HashSet::new()), Some("Sheep Shearer"));
/// ```
pub fn next_actionable<'a>(
    order: &'a CanonicalQuestOrder,
    snapshot: &PlayerSnapshot,
    excluded: &HashSet<String>,
) -> Option<&'a str> {
    order.iter().filter(|name| !excluded.contains(*name)).find(|name| {
        !snapshot
            .status_of(name)
            .unwrap_or(QuestStatus::NotStarted)
            .is_complete()
    })
}

/// The parts of a requirement record the player hasn't met yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmetRequirements {
    /// Skills below the required level, in record order
    pub skills: Vec<SkillRequirement>,
    /// Prerequisite quests not complete, in record order
    pub quests: Vec<String>,
}

impl UnmetRequirements {
    /// True when the player can start the quest.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.quests.is_empty()
    }
}

/// Requirements in `record` the snapshot doesn't satisfy.
///
/// A skill is unmet when the player's level (or [`DEFAULT_SKILL_LEVEL`]) is below the
/// requirement. A quest is unmet unless the snapshot has it complete.
pub fn unmet_requirements(record: &RequirementRecord, snapshot: &PlayerSnapshot) -> UnmetRequirements {
    let skills = record
        .skills
        .iter()
        .filter(|req| snapshot.level_of(&req.skill).unwrap_or(DEFAULT_SKILL_LEVEL) < req.level)
        .cloned()
        .collect();

    let quests = record
        .quest_prerequisites
        .iter()
        .filter(|quest| {
            !snapshot
                .status_of(quest)
                .is_some_and(QuestStatus::is_complete)
        })
        .cloned()
        .collect();

    UnmetRequirements { skills, quests }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_core::QuestRecord;
    use std::collections::BTreeMap;

    fn order(names: &[&str]) -> CanonicalQuestOrder {
        CanonicalQuestOrder::new(names.iter().map(|n| n.to_string()).collect()).unwrap()
    }

    fn snapshot(quests: &[(&str, QuestStatus)], levels: &[(&str, u32)]) -> PlayerSnapshot {
        PlayerSnapshot::new(
            quests
                .iter()
                .map(|(name, status)| QuestRecord::new(*name, *status))
                .collect(),
            levels
                .iter()
                .map(|(skill, level)| (skill.to_string(), *level))
                .collect::<BTreeMap<_, _>>(),
            None,
        )
    }

    #[test]
    fn first_incomplete_quest_wins() {
        let order = order(&["Cook's Assistant", "Sheep Shearer"]);
        let snapshot = snapshot(&[("Cook's Assistant", QuestStatus::Complete)], &[]);
        assert_eq!(
            next_actionable(&order, &snapshot, &HashSet::new()),
            Some("Sheep Shearer")
        );
    }

    #[test]
    fn in_progress_counts_as_actionable() {
        let order = order(&["Cook's Assistant", "Sheep Shearer"]);
        let snapshot = snapshot(&[("Cook's Assistant", QuestStatus::InProgress)], &[]);
        assert_eq!(
            next_actionable(&order, &snapshot, &HashSet::new()),
            Some("Cook's Assistant")
        );
    }

    #[test]
    fn excluded_quests_are_skipped() {
        let order = order(&["Natural History Quiz", "Sheep Shearer"]);
        let excluded = HashSet::from(["Natural History Quiz".to_string()]);
        let snapshot = snapshot(&[], &[]);
        assert_eq!(
            next_actionable(&order, &snapshot, &excluded),
            Some("Sheep Shearer")
        );
    }

    #[test]
    fn all_complete_is_none() {
        let order = order(&["Cook's Assistant"]);
        let snapshot = snapshot(&[("Cook's Assistant", QuestStatus::Complete)], &[]);
        assert_eq!(next_actionable(&order, &snapshot, &HashSet::new()), None);
    }

    #[test]
    fn missing_skills_use_the_default_level() {
        let record = RequirementRecord::from_parts(
            "Rune Mysteries",
            vec![
                SkillRequirement::new("Runecraft", DEFAULT_SKILL_LEVEL),
                SkillRequirement::new("Magic", DEFAULT_SKILL_LEVEL + 1),
            ],
            Vec::new(),
        );
        let unmet = unmet_requirements(&record, &snapshot(&[], &[]));
        assert_eq!(
            unmet.skills,
            vec![SkillRequirement::new("Magic", DEFAULT_SKILL_LEVEL + 1)]
        );
    }

    #[test]
    fn level_equal_to_requirement_is_met() {
        let record = RequirementRecord::from_parts(
            "Dragon Slayer I",
            vec![
                SkillRequirement::new("Prayer", 43),
                SkillRequirement::new("Agility", 33),
            ],
            Vec::new(),
        );
        let unmet = unmet_requirements(
            &record,
            &snapshot(&[], &[("Prayer", 43), ("Agility", 20)]),
        );
        assert_eq!(unmet.skills, vec![SkillRequirement::new("Agility", 33)]);
    }

    #[test]
    fn quest_prerequisites_need_completion() {
        let record = RequirementRecord::from_parts(
            "Dragon Slayer I",
            Vec::new(),
            vec![
                "Rune Mysteries".to_string(),
                "Druidic Ritual".to_string(),
                "Shield of Arrav".to_string(),
            ],
        );
        let unmet = unmet_requirements(
            &record,
            &snapshot(
                &[
                    ("Rune Mysteries", QuestStatus::Complete),
                    ("Druidic Ritual", QuestStatus::InProgress),
                ],
                &[],
            ),
        );
        assert_eq!(
            unmet.quests,
            vec!["Druidic Ritual".to_string(), "Shield of Arrav".to_string()]
        );
        assert!(unmet.skills.is_empty());
        assert!(!unmet.is_empty());
    }
}
