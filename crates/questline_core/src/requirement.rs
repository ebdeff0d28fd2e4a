//! Skill and quest prerequisites.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A minimum level in one skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRequirement {
    /// Skill name, first letter upper-case and the rest lower-case
    pub skill: String,
    /// Required level, at least 1
    pub level: u32,
}

impl SkillRequirement {
    /// Create a skill requirement.
    pub fn new(skill: impl Into<String>, level: u32) -> Self {
        Self {
            skill: skill.into(),
            level,
        }
    }
}

/// Everything a quest needs before it can be started.
///
/// Skills are unique by name; setting a skill that is already present replaces its
/// level in place. Quest prerequisites are de-duplicated and keep insertion order.
///
/// # Examples
///
/// ```
/// use questline_core::RequirementRecord;
///
/// let mut record = RequirementRecord::empty("Dragon Slayer I");
/// record.set_skill("Prayer", 10);
/// record.set_skill("Prayer", 12);
/// record.add_prerequisite("Rune Mysteries");
/// record.add_prerequisite("Rune Mysteries");
///
/// assert_eq!(record.skills.len(), 1);
/// assert_eq!(record.skills[0].level, 12);
/// assert_eq!(record.quest_prerequisites, vec!["Rune Mysteries".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Quest these requirements belong to
    pub quest_name: String,
    /// Skill levels, in discovery order
    #[serde(default)]
    pub skills: Vec<SkillRequirement>,
    /// Quests that must be complete, in discovery order
    #[serde(default)]
    pub quest_prerequisites: Vec<String>,
}

impl RequirementRecord {
    /// A record meaning "no known requirements".
    pub fn empty(quest_name: impl Into<String>) -> Self {
        Self {
            quest_name: quest_name.into(),
            skills: Vec::new(),
            quest_prerequisites: Vec::new(),
        }
    }

    /// Build a record from already-collected parts, applying the uniqueness rules.
    pub fn from_parts(
        quest_name: impl Into<String>,
        skills: impl IntoIterator<Item = SkillRequirement>,
        quest_prerequisites: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut record = Self::empty(quest_name);
        for requirement in skills {
            record.set_skill(requirement.skill, requirement.level);
        }
        for quest in quest_prerequisites {
            record.add_prerequisite(quest);
        }
        record
    }

    /// Set a skill level; a later write for the same skill wins.
    pub fn set_skill(&mut self, skill: impl Into<String>, level: u32) {
        let skill = skill.into();
        match self.skills.iter_mut().find(|s| s.skill == skill) {
            Some(existing) => existing.level = level,
            None => self.skills.push(SkillRequirement::new(skill, level)),
        }
    }

    /// Add a quest prerequisite unless it is already listed.
    pub fn add_prerequisite(&mut self, quest: impl Into<String>) {
        let quest = quest.into();
        if !self.quest_prerequisites.contains(&quest) {
            self.quest_prerequisites.push(quest);
        }
    }

    /// True when neither skills nor quests are required.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.quest_prerequisites.is_empty()
    }
}

/// Requirement records keyed by quest name.
///
/// Missing entries are not an error: [`RequirementMap::requirements_for`] hands back an
/// empty record instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMap {
    records: BTreeMap<String, RequirementRecord>,
}

impl RequirementMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own quest name, replacing any previous one.
    pub fn insert(&mut self, record: RequirementRecord) {
        self.records.insert(record.quest_name.clone(), record);
    }

    /// Look up a record.
    pub fn get(&self, quest_name: &str) -> Option<&RequirementRecord> {
        self.records.get(quest_name)
    }

    /// Requirements for a quest, or an empty record when none are known.
    pub fn requirements_for(&self, quest_name: &str) -> RequirementRecord {
        self.get(quest_name)
            .cloned()
            .unwrap_or_else(|| RequirementRecord::empty(quest_name))
    }

    /// Number of quests with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in quest-name order.
    pub fn iter(&self) -> impl Iterator<Item = &RequirementRecord> {
        self.records.values()
    }
}

impl FromIterator<RequirementRecord> for RequirementMap {
    fn from_iter<I: IntoIterator<Item = RequirementRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_skill_write_replaces_level() {
        let record = RequirementRecord::from_parts(
            "Vampire Slayer",
            vec![
                SkillRequirement::new("Attack", 45),
                SkillRequirement::new("Attack", 20),
            ],
            Vec::new(),
        );
        assert_eq!(record.skills, vec![SkillRequirement::new("Attack", 20)]);
    }

    #[test]
    fn missing_entries_become_empty_records() {
        let map = RequirementMap::new();
        let record = map.requirements_for("Sheep Shearer");
        assert_eq!(record.quest_name, "Sheep Shearer");
        assert!(record.is_empty());
    }
}
