//! Static quest catalog: canonical order, untrackable quests, and override table.
//!
//! The catalog is plain TOML:
//!
//! ```toml
//! untrackable = ["Natural History Quiz"]
//!
//! [[quests]]
//! name = "Cook's Assistant"
//!
//! [[quests]]
//! name = "Vampire Slayer"
//! skills = [{ skill = "Attack", level = 45 }]
//!
//! [overrides."Cook's Assistant"]
//! skills = []
//! quests = []
//! ```

use crate::{RequirementMap, RequirementRecord, SkillRequirement};
use questline_error::{CatalogError, CatalogErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, instrument};

/// Requirements written directly in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpec {
    /// Skill levels
    #[serde(default)]
    pub skills: Vec<SkillRequirement>,
    /// Quests that must be complete
    #[serde(default)]
    pub quests: Vec<String>,
}

impl RequirementSpec {
    /// Turn these requirements into a record for `quest_name`.
    pub fn to_record(&self, quest_name: &str) -> RequirementRecord {
        RequirementRecord::from_parts(
            quest_name,
            self.skills.iter().cloned(),
            self.quests.iter().cloned(),
        )
    }
}

/// One entry of the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuest {
    /// Quest name
    pub name: String,
    /// Inline skill requirements
    #[serde(default)]
    pub skills: Vec<SkillRequirement>,
    /// Inline quest prerequisites
    #[serde(default)]
    pub quests: Vec<String>,
}

impl CatalogQuest {
    /// Inline requirements as a record, if any were written.
    pub fn inline_requirements(&self) -> Option<RequirementRecord> {
        let record = RequirementRecord::from_parts(
            self.name.as_str(),
            self.skills.iter().cloned(),
            self.quests.iter().cloned(),
        );
        (!record.is_empty()).then_some(record)
    }
}

/// Strictly ordered, duplicate-free quest names: the checklist priority.
///
/// # Examples
///
/// ```
/// use questline_core::CanonicalQuestOrder;
///
/// let order = CanonicalQuestOrder::new(vec![
///     "Cook's Assistant".to_string(),
///     "Sheep Shearer".to_string(),
/// ])
/// .unwrap();
/// assert_eq!(order.len(), 2);
///
/// let duplicate = CanonicalQuestOrder::new(vec!["A".to_string(), "A".to_string()]);
/// assert!(duplicate.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalQuestOrder(Vec<String>);

impl CanonicalQuestOrder {
    /// Validate and wrap an ordered list of names.
    ///
    /// # Errors
    ///
    /// Rejects empty names and duplicates.
    pub fn new(names: Vec<String>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(CatalogError::new(CatalogErrorKind::EmptyName(position)));
            }
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::new(CatalogErrorKind::DuplicateQuest(
                    name.clone(),
                )));
            }
        }
        Ok(Self(names))
    }

    /// Iterate names in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of quests.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the order is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The static data the resolver works from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCatalog {
    /// Quests in canonical order
    #[serde(default)]
    pub quests: Vec<CatalogQuest>,
    /// Quests whose completion the sync service cannot report
    #[serde(default)]
    pub untrackable: Vec<String>,
    /// Requirements that always win over fetched or cached data
    #[serde(default)]
    pub overrides: BTreeMap<String, RequirementSpec>,
}

impl QuestCatalog {
    /// The catalog bundled with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        const BUNDLED_CATALOG: &str = include_str!("../../../quests.toml");
        Self::from_toml(BUNDLED_CATALOG)
    }

    /// Load a catalog from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        debug!("Loading quest catalog from file");
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CatalogError::new(CatalogErrorKind::Read(format!(
                "{}: {}",
                path.as_ref().display(),
                e
            )))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a catalog.
    pub fn from_toml(contents: &str) -> Result<Self, CatalogError> {
        let catalog: QuestCatalog = toml::from_str(contents)
            .map_err(|e| CatalogError::new(CatalogErrorKind::Parse(e.to_string())))?;
        catalog.canonical_order()?;
        debug!(
            quests = catalog.quests.len(),
            untrackable = catalog.untrackable.len(),
            overrides = catalog.overrides.len(),
            "Parsed quest catalog"
        );
        Ok(catalog)
    }

    /// The canonical order, validated.
    pub fn canonical_order(&self) -> Result<CanonicalQuestOrder, CatalogError> {
        CanonicalQuestOrder::new(self.quests.iter().map(|q| q.name.clone()).collect())
    }

    /// Quest names excluded from "next actionable" scanning.
    pub fn excluded(&self) -> HashSet<String> {
        self.untrackable.iter().cloned().collect()
    }

    /// True if the quest's completion cannot be tracked.
    pub fn is_untrackable(&self, quest_name: &str) -> bool {
        self.untrackable.iter().any(|q| q == quest_name)
    }

    /// Quest names whose requirements are worth fetching: the canonical order minus
    /// untrackable quests and quests pinned by an override.
    pub fn fetchable_names(&self) -> Vec<String> {
        self.quests
            .iter()
            .map(|q| q.name.clone())
            .filter(|name| !self.is_untrackable(name) && !self.overrides.contains_key(name))
            .collect()
    }

    /// Combine fetched or cached records with the catalog's own data.
    ///
    /// Precedence, highest first: override table, then a fetched record carrying any
    /// requirement, then inline catalog requirements, then whatever was fetched (possibly
    /// an empty record).
    ///
    /// # Examples
    ///
    /// ```
    /// use questline_core::{QuestCatalog, RequirementRecord};
    ///
    /// let catalog = QuestCatalog::from_toml(r#"
    ///     [[quests]]
    ///     name = "Vampire Slayer"
    ///     skills = [{ skill = "Attack", level = 45 }]
    /// "#).unwrap();
    ///
    /// let merged = catalog.merge(vec![RequirementRecord::empty("Vampire Slayer")]);
    /// assert_eq!(merged.requirements_for("Vampire Slayer").skills[0].level, 45);
    /// ```
    pub fn merge(&self, fetched: impl IntoIterator<Item = RequirementRecord>) -> RequirementMap {
        let mut merged: BTreeMap<String, RequirementRecord> = fetched
            .into_iter()
            .map(|record| (record.quest_name.clone(), record))
            .collect();

        for quest in &self.quests {
            let fetched_has_data = merged
                .get(&quest.name)
                .is_some_and(|record| !record.is_empty());
            if fetched_has_data {
                continue;
            }
            if let Some(inline) = quest.inline_requirements() {
                merged.insert(quest.name.clone(), inline);
            }
        }

        for (name, spec) in &self.overrides {
            merged.insert(name.clone(), spec.to_record(name));
        }

        merged.into_values().collect()
    }
}
