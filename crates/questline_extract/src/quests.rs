//! Heading-anchored quest prerequisite matchers.

use regex::Regex;
use std::sync::LazyLock;

/// A heading pattern that introduces a bullet list of quests.
///
/// Each pattern must end by matching the first bullet marker (`*`), so the list
/// starts at the last byte of the match.
#[derive(Debug)]
pub struct QuestHeading {
    /// Short label used in trace output
    pub name: &'static str,
    /// Compiled heading pattern
    pub pattern: Regex,
}

static QUEST_HEADINGS: LazyLock<Vec<QuestHeading>> = LazyLock::new(|| {
    vec![
        QuestHeading {
            name: "completion-of",
            pattern: Regex::new(r"(?:Completion of|Started|Complete)[^\n]*?:\s*\*")
                .expect("valid completion heading pattern"),
        },
        QuestHeading {
            name: "required-quests",
            pattern: Regex::new(r"Required quests?:\s*\*")
                .expect("valid required quests heading pattern"),
        },
        QuestHeading {
            name: "following-quests",
            pattern: Regex::new(r"following quests?[^\n]*?:\s*\*")
                .expect("valid following quests heading pattern"),
        },
    ]
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthetical pattern"));

/// The quest headings, in the order they are applied.
pub fn quest_headings() -> &'static [QuestHeading] {
    &QUEST_HEADINGS
}

impl QuestHeading {
    /// Quest names listed under every occurrence of this heading, in text order.
    pub fn prerequisites(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .flat_map(|m| bullet_run(&text[m.end() - 1..]))
            .collect()
    }
}

/// Cleaned items of the bullet lines at the start of `text`.
///
/// The first line is the one holding the heading's bullet; the run ends at the first
/// line that is not a bullet.
fn bullet_run(text: &str) -> Vec<String> {
    text.lines()
        .take_while(|line| line.trim_start().starts_with('*'))
        .filter_map(clean_item)
        .collect()
}

fn clean_item(line: &str) -> Option<String> {
    let item = line.trim().trim_start_matches('*').trim_start();
    let item = PARENTHETICAL.replace_all(item, "");
    let item = item.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Run every heading over `text`, de-duplicating names in first-seen order.
pub fn match_quest_prerequisites(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for heading in quest_headings() {
        for quest in heading.prerequisites(text) {
            if !found.contains(&quest) {
                tracing::trace!(heading = heading.name, quest = %quest, "Matched prerequisite");
                found.push(quest);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_quests_heading_reads_the_whole_run() {
        let text = "Required quests:\n* Rune Mysteries\n* Druidic Ritual (started)\nItems required:\n* Bucket";
        assert_eq!(
            match_quest_prerequisites(text),
            vec!["Rune Mysteries".to_string(), "Druidic Ritual".to_string()]
        );
    }

    #[test]
    fn overlapping_headings_do_not_duplicate() {
        let text = "Completion of the following quests:\n* Shield of Arrav\n* Demon Slayer";
        assert_eq!(
            match_quest_prerequisites(text),
            vec!["Shield of Arrav".to_string(), "Demon Slayer".to_string()]
        );
    }

    #[test]
    fn heading_without_bullets_yields_nothing() {
        assert!(match_quest_prerequisites("Required quests: None").is_empty());
        assert!(match_quest_prerequisites("Required quests:\nNone").is_empty());
    }

    #[test]
    fn every_parenthetical_is_removed() {
        let text = "Required quest: * Merlin's Crystal (partial) (for access)";
        assert_eq!(
            match_quest_prerequisites(text),
            vec!["Merlin's Crystal".to_string()]
        );
    }

    #[test]
    fn headings_are_case_sensitive() {
        assert!(match_quest_prerequisites("required quests:\n* Rune Mysteries").is_empty());
    }
}
