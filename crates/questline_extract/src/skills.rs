//! Skill-level matchers.

use questline_core::SkillRequirement;
use regex::Regex;
use std::sync::LazyLock;

/// Which capture group holds the level and which holds the skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrder {
    /// Group 1 is the level, group 2 the skill
    LevelThenSkill,
    /// Group 1 is the skill, group 2 the level
    SkillThenLevel,
}

/// One surface pattern for skill requirements.
#[derive(Debug)]
pub struct SkillMatcher {
    /// Short label used in trace output
    pub name: &'static str,
    /// Compiled pattern with two capture groups
    pub pattern: Regex,
    /// Meaning of the capture groups
    pub order: CaptureOrder,
}

/// A (skill, level) fact found by one matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCandidate {
    /// Normalised skill name
    pub skill: String,
    /// Level found next to it
    pub level: u32,
    /// Matcher that produced the candidate
    pub matcher: &'static str,
}

static SKILL_MATCHERS: LazyLock<Vec<SkillMatcher>> = LazyLock::new(|| {
    vec![
        // "50 Firemaking", "50 Firemaking level"
        SkillMatcher {
            name: "level-skill",
            pattern: Regex::new(r"(\d+)\s+([A-Za-z]+)(?:\s+(?:level|Level))?")
                .expect("valid level-skill pattern"),
            order: CaptureOrder::LevelThenSkill,
        },
        // "Firemaking level 50"
        SkillMatcher {
            name: "skill-level",
            pattern: Regex::new(r"([A-Za-z]+)\s+(?:level|Level)\s+(\d+)")
                .expect("valid skill-level pattern"),
            order: CaptureOrder::SkillThenLevel,
        },
        // "level 50 Firemaking"
        SkillMatcher {
            name: "level-word",
            pattern: Regex::new(r"(?i)level\s+(\d+)\s+([A-Za-z]+)")
                .expect("valid level-word pattern"),
            order: CaptureOrder::LevelThenSkill,
        },
    ]
});

/// The skill matchers, in the order they are applied.
pub fn skill_matchers() -> &'static [SkillMatcher] {
    &SKILL_MATCHERS
}

/// Upper-case the first letter and lower-case the rest.
///
/// ```
/// assert_eq!(questline_extract::normalize_skill("fIREMAKING"), "Firemaking");
/// ```
pub fn normalize_skill(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl SkillMatcher {
    /// Every candidate this matcher finds, in text order.
    ///
    /// Matches with a level of zero or a level that does not fit in `u32` are skipped.
    pub fn candidates(&self, text: &str) -> Vec<SkillCandidate> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let (level, skill) = match self.order {
                    CaptureOrder::LevelThenSkill => (caps.get(1)?, caps.get(2)?),
                    CaptureOrder::SkillThenLevel => (caps.get(2)?, caps.get(1)?),
                };
                let level: u32 = level.as_str().parse().ok()?;
                if level == 0 {
                    return None;
                }
                Some(SkillCandidate {
                    skill: normalize_skill(skill.as_str()),
                    level,
                    matcher: self.name,
                })
            })
            .collect()
    }
}

/// Run every matcher over `text`, concatenating candidates in matcher order.
pub fn match_skills(text: &str) -> Vec<SkillCandidate> {
    skill_matchers()
        .iter()
        .flat_map(|matcher| matcher.candidates(text))
        .collect()
}

/// Merge candidates so each skill appears once with the highest level seen.
///
/// Skills keep the position of their first appearance.
pub fn merge_skills(candidates: impl IntoIterator<Item = SkillCandidate>) -> Vec<SkillRequirement> {
    let mut merged: Vec<SkillRequirement> = Vec::new();
    for candidate in candidates {
        match merged.iter_mut().find(|s| s.skill == candidate.skill) {
            Some(existing) => {
                if candidate.level > existing.level {
                    existing.level = candidate.level;
                }
            }
            None => merged.push(SkillRequirement::new(candidate.skill, candidate.level)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(text: &str) -> Vec<(String, u32)> {
        merge_skills(match_skills(text))
            .into_iter()
            .map(|s| (s.skill, s.level))
            .collect()
    }

    #[test]
    fn each_matcher_reads_its_own_shape() {
        let matchers = skill_matchers();
        assert_eq!(matchers[0].candidates("50 Firemaking")[0].level, 50);
        assert_eq!(matchers[1].candidates("Firemaking level 50")[0].skill, "Firemaking");
        assert_eq!(matchers[2].candidates("LEVEL 50 firemaking")[0].skill, "Firemaking");
    }

    #[test]
    fn higher_level_wins_regardless_of_matcher() {
        assert_eq!(
            levels("Agility level 45, 30 Agility"),
            vec![("Agility".to_string(), 45)]
        );
    }

    #[test]
    fn zero_levels_are_ignored() {
        assert!(levels("0 Cooking").is_empty());
    }

    #[test]
    fn oversized_levels_are_ignored() {
        assert!(levels("99999999999 Cooking").is_empty());
    }

    #[test]
    fn skills_keep_first_seen_order() {
        assert_eq!(
            levels("43 Prayer\n33 Agility\n50 prayer"),
            vec![("Prayer".to_string(), 50), ("Agility".to_string(), 33)]
        );
    }

    #[test]
    fn normalize_handles_empty() {
        assert_eq!(normalize_skill(""), "");
    }
}
