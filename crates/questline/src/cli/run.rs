//! Command handlers.

use super::OutputFormat;
use anyhow::Context;
use questline::{
    FetchOptions, QuestCatalog, QuestReport, Questline, Recommendation, RequirementRecord,
    SyncConfig, extract,
};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Load the catalog from `path`, or the bundled one.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<QuestCatalog> {
    let catalog = match path {
        Some(path) => QuestCatalog::from_file(path)?,
        None => QuestCatalog::bundled()?,
    };
    Ok(catalog)
}

/// Load sync settings from `path`, or from the layered default locations.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    let config = match path {
        Some(path) => SyncConfig::from_file(path)?,
        None => SyncConfig::load()?,
    };
    Ok(config)
}

/// Print the next quest for `username`, optionally waiting for a fresher snapshot.
pub async fn next_quest(
    app: &Questline,
    username: &str,
    skip_cache: bool,
    watch: Option<u64>,
) -> anyhow::Result<()> {
    let options = if skip_cache {
        FetchOptions::skip_cache()
    } else {
        FetchOptions::default()
    };

    // Subscribe first so a refresh finishing during the fetch is not missed.
    let mut updates = app.subscribe(username);
    let report = app.next_quest(username, options).await?;
    print!("{}", ReportView { username, report: &report });

    let Some(secs) = watch else {
        return Ok(());
    };

    match tokio::time::timeout(Duration::from_secs(secs), updates.recv()).await {
        Ok(Some(update)) => {
            let report = app.report_for(update.snapshot).await?;
            println!();
            println!("Progress updated:");
            print!(
                "{}",
                ReportView {
                    username: update.username.as_str(),
                    report: &report,
                }
            );
        }
        Ok(None) | Err(_) => {
            println!();
            println!("No newer progress within {}s.", secs);
        }
    }
    Ok(())
}

/// Print the requirements of one quest.
pub async fn show_requirements(
    app: &Questline,
    quest: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let record = app.requirements(quest).await;
    print_record(&record, format)
}

/// Run extraction over the text in `file`.
pub fn extract_file(file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    print_record(&extract(&text).into_record(name), format)
}

/// Clear one namespace or the whole sync cache.
pub async fn clear_cache(app: &Questline, namespace: Option<&str>) -> anyhow::Result<()> {
    let removed = app.clear_cache(namespace).await?;
    match namespace {
        Some(namespace) => println!("Removed {} entries from {}.", removed, namespace),
        None => println!("Removed {} cached entries.", removed),
    }
    Ok(())
}

fn print_record(record: &RequirementRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Human => print!("{}", RecordView(record)),
    }
    Ok(())
}

/// Human-readable requirement record.
pub(crate) struct RecordView<'a>(pub &'a RequirementRecord);

impl fmt::Display for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        writeln!(f, "{}", record.quest_name)?;
        if record.is_empty() {
            return writeln!(f, "  No requirements");
        }
        for skill in &record.skills {
            writeln!(f, "  {} {}", skill.level, skill.skill)?;
        }
        for quest in &record.quest_prerequisites {
            writeln!(f, "  Quest: {}", quest)?;
        }
        Ok(())
    }
}

/// Human-readable recommendation for one player.
pub(crate) struct ReportView<'a> {
    pub username: &'a str,
    pub report: &'a QuestReport,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: last synced {}",
            self.username,
            self.report.snapshot.sync_label()
        )?;

        let next = match &self.report.recommendation {
            Recommendation::ChecklistComplete => return writeln!(f, "Checklist complete."),
            Recommendation::Next(next) => next,
        };

        writeln!(f, "Next quest: {} ({})", next.name, next.status)?;
        if next.unmet.is_empty() {
            return writeln!(f, "  All requirements met");
        }
        for skill in &next.unmet.skills {
            writeln!(f, "  Needs {} {}", skill.level, skill.skill)?;
        }
        for quest in &next.unmet.quests {
            writeln!(f, "  Needs quest: {}", quest)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline::{
        NextQuest, PlayerSnapshot, QuestStatus, SkillRequirement, UnmetRequirements,
    };
    use std::collections::BTreeMap;

    fn snapshot() -> PlayerSnapshot {
        PlayerSnapshot::new(Vec::new(), BTreeMap::new(), None)
    }

    #[test]
    fn test_render_complete() {
        let report = QuestReport {
            snapshot: snapshot(),
            recommendation: Recommendation::ChecklistComplete,
        };
        let text = ReportView {
            username: "Zezima",
            report: &report,
        }
        .to_string();
        assert!(text.starts_with("Zezima: last synced never synced"));
        assert!(text.contains("Checklist complete."));
    }

    #[test]
    fn test_render_unmet() {
        let mut requirements = RequirementRecord::empty("Dragon Slayer I");
        requirements.set_skill("Agility", 33);
        requirements.add_prerequisite("Rune Mysteries");
        let report = QuestReport {
            snapshot: snapshot(),
            recommendation: Recommendation::Next(NextQuest {
                name: "Dragon Slayer I".to_string(),
                status: QuestStatus::NotStarted,
                requirements,
                unmet: UnmetRequirements {
                    skills: vec![SkillRequirement::new("Agility", 33)],
                    quests: vec!["Rune Mysteries".to_string()],
                },
            }),
        };

        let text = ReportView {
            username: "Zezima",
            report: &report,
        }
        .to_string();
        assert!(text.contains("Next quest: Dragon Slayer I"));
        assert!(text.contains("  Needs 33 Agility\n"));
        assert!(text.contains("  Needs quest: Rune Mysteries\n"));
    }

    #[test]
    fn test_render_empty_record() {
        let text = RecordView(&RequirementRecord::empty("Cook's Assistant")).to_string();
        assert_eq!(text, "Cook's Assistant\n  No requirements\n");
    }

    #[test]
    fn test_render_record_lists_requirements() {
        let mut record = RequirementRecord::empty("Dragon Slayer I");
        record.set_skill("Agility", 33);
        record.add_prerequisite("Rune Mysteries");
        let text = RecordView(&record).to_string();
        assert_eq!(
            text,
            "Dragon Slayer I\n  33 Agility\n  Quest: Rune Mysteries\n"
        );
    }
}
