use questline_core::SkillRequirement;
use questline_extract::extract;

#[test]
fn test_single_skill_line() {
    let found = extract("50 Firemaking");
    assert_eq!(found.skills, vec![SkillRequirement::new("Firemaking", 50)]);
    assert!(found.quest_prerequisites.is_empty());
}

#[test]
fn test_max_level_wins_across_patterns() {
    let found = extract("30 Agility\nAgility level 45");
    assert_eq!(found.skills, vec![SkillRequirement::new("Agility", 45)]);
}

#[test]
fn test_extraction_is_idempotent() {
    let text = "Skills required:\n* 43 Prayer\n* Level 33 Agility\nRequired quests:\n* Rune Mysteries\n* Druidic Ritual (started)";
    let first = extract(text).into_record("Dragon Slayer I");
    let second = extract(text).into_record("Dragon Slayer I");
    assert_eq!(first, second);
    assert_eq!(first.quest_name, "Dragon Slayer I");
}

#[test]
fn test_mixed_section() {
    let text = "Skills required:\n* 43 Prayer\n* Level 33 Agility\nRequired quests:\n* Rune Mysteries\n* Druidic Ritual (started)";
    let found = extract(text);
    assert_eq!(
        found.skills,
        vec![
            SkillRequirement::new("Prayer", 43),
            SkillRequirement::new("Agility", 33),
        ]
    );
    assert_eq!(
        found.quest_prerequisites,
        vec!["Rune Mysteries".to_string(), "Druidic Ritual".to_string()]
    );
}

#[test]
fn test_no_bullets_no_quests() {
    let found = extract("Required quests: none, this quest can be started right away.");
    assert!(found.quest_prerequisites.is_empty());
}

#[test]
fn test_plain_prose_is_empty() {
    let found = extract("There are no requirements for this quest.");
    assert!(found.is_empty());
    assert!(found.into_record("Cook's Assistant").is_empty());
}
