//! The assembled quest tracker: catalog, player sync, requirement sync, resolution.

use questline_cache::Cache;
use questline_core::{PlayerSnapshot, QuestCatalog, RequirementRecord};
use questline_error::QuestlineResult;
use questline_resolve::{Recommendation, recommend};
use questline_sync::{
    FetchOptions, HttpPlayerStatusApi, HttpWikiDocuments, PLAYER_NAMESPACE, PlayerStatusSource,
    REQUIREMENT_NAMESPACE, RequirementSource, SyncConfig, UpdateSubscription,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// A player's progress together with what they should do next.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestReport {
    /// Progress the recommendation was computed from
    pub snapshot: PlayerSnapshot,
    /// Next quest, or checklist complete
    pub recommendation: Recommendation,
}

/// Wires the catalog and both remote sources over one shared cache.
#[derive(Debug, Clone)]
pub struct Questline {
    catalog: Arc<QuestCatalog>,
    players: PlayerStatusSource,
    requirements: RequirementSource,
    cache: Cache,
}

impl Questline {
    /// Assemble from already-built parts.
    pub fn new(
        catalog: QuestCatalog,
        players: PlayerStatusSource,
        requirements: RequirementSource,
        cache: Cache,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            players,
            requirements,
            cache,
        }
    }

    /// Build the HTTP-backed tracker described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the cache directory cannot be created or an HTTP client cannot be built.
    #[instrument(skip_all)]
    pub fn from_config(config: &SyncConfig, catalog: QuestCatalog) -> QuestlineResult<Self> {
        let cache = config.cache().build()?;
        let retry = config.retry().policy();

        let players = PlayerStatusSource::new(
            Arc::new(HttpPlayerStatusApi::new(config.player())?),
            cache.clone(),
        )
        .with_retry(retry);
        let requirements = RequirementSource::new(
            Arc::new(HttpWikiDocuments::new(config.wiki())?),
            cache.clone(),
        )
        .with_retry(retry);

        info!(
            cache_dir = %config.cache().resolved_dir().display(),
            quests = catalog.canonical_order()?.len(),
            "Questline ready"
        );
        Ok(Self::new(catalog, players, requirements, cache))
    }

    /// The quest catalog in use.
    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    /// Player status source, for subscriptions and direct fetches.
    pub fn players(&self) -> &PlayerStatusSource {
        &self.players
    }

    /// Listen for background refreshes of `username`'s snapshot.
    pub fn subscribe(&self, username: &str) -> UpdateSubscription {
        self.players.subscribe(username)
    }

    /// Fetch `username`'s progress and recommend the next quest.
    ///
    /// # Errors
    ///
    /// Returns the player source's user-facing error when no snapshot is available, or a
    /// catalog error if the canonical order is invalid.
    #[instrument(skip(self))]
    pub async fn next_quest(
        &self,
        username: &str,
        options: FetchOptions,
    ) -> QuestlineResult<QuestReport> {
        let snapshot = self.players.fetch(username, options).await?;
        self.report_for(snapshot).await
    }

    /// Recommend the next quest for a snapshot already in hand.
    ///
    /// # Errors
    ///
    /// Returns error if the catalog's canonical order is invalid.
    #[instrument(skip_all)]
    pub async fn report_for(&self, snapshot: PlayerSnapshot) -> QuestlineResult<QuestReport> {
        let order = self.catalog.canonical_order()?;
        let requirements = self
            .requirements
            .fetch_all(self.catalog.fetchable_names(), &self.catalog)
            .await;
        let recommendation = recommend(&order, &self.catalog.excluded(), &snapshot, &requirements);
        Ok(QuestReport {
            snapshot,
            recommendation,
        })
    }

    /// Requirements for one quest after catalog precedence is applied.
    #[instrument(skip(self))]
    pub async fn requirements(&self, quest_name: &str) -> RequirementRecord {
        let fetched = if self.catalog.is_untrackable(quest_name) {
            RequirementRecord::empty(quest_name)
        } else {
            self.requirements.resolve(quest_name).await
        };
        self.catalog.merge([fetched]).requirements_for(quest_name)
    }

    /// Drop cached entries of one namespace, or of both sync namespaces when `None`.
    ///
    /// Returns how many entries were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the cache store cannot be cleared.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self, namespace: Option<&str>) -> QuestlineResult<usize> {
        let namespaces = match namespace {
            Some(namespace) => vec![namespace],
            None => vec![PLAYER_NAMESPACE, REQUIREMENT_NAMESPACE],
        };
        let mut removed = 0;
        for namespace in namespaces {
            removed += self.cache.clear_namespace(namespace).await?;
        }
        info!(removed, "Cache cleared");
        Ok(removed)
    }
}
