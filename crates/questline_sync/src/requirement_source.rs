//! Remote quest requirements with cache, retry, and empty-record fallback.

use crate::{
    RequirementDocuments, RetryPolicy, Sleeper, TokioSleeper, find_requirements_section,
    flatten_html,
};
use futures::future::join_all;
use questline_cache::Cache;
use questline_core::{QuestCatalog, RequirementMap, RequirementRecord};
use questline_error::TransportResult;
use questline_extract::extract;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Cache namespace for requirement records, keyed by quest name.
pub const REQUIREMENT_NAMESPACE: &str = "requirement-cache";

/// Fetches per-quest requirement records.
///
/// Every operation yields a record; failures collapse to the cached record or to an
/// empty one.
#[derive(Clone)]
pub struct RequirementSource {
    documents: Arc<dyn RequirementDocuments>,
    cache: Cache,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RequirementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementSource")
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl RequirementSource {
    /// Create a source with the default retry policy and real sleeps.
    pub fn new(documents: Arc<dyn RequirementDocuments>, cache: Cache) -> Self {
        Self {
            documents,
            cache,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch a quest's requirements from the network.
    ///
    /// Successful fetches, including pages without a requirements section, are cached.
    /// Once retries run out the cached record is returned, or an empty one.
    #[instrument(skip(self))]
    pub async fn fetch(&self, quest_name: &str) -> RequirementRecord {
        let mut attempt = 0;
        loop {
            match self.fetch_once(quest_name).await {
                Ok(record) => {
                    self.cache
                        .write(REQUIREMENT_NAMESPACE, quest_name, &record)
                        .await;
                    return record;
                }
                Err(e) if self.retry.can_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::debug!(attempt, ?delay, error = %e.kind(), "Retrying requirement fetch");
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e.kind(), "Requirement fetch failed after retries");
                    let cached = self
                        .cache
                        .read::<RequirementRecord>(REQUIREMENT_NAMESPACE, quest_name)
                        .await;
                    return match cached {
                        Some(envelope) => envelope.into_payload(),
                        None => RequirementRecord::empty(quest_name),
                    };
                }
            }
        }
    }

    async fn fetch_once(&self, quest_name: &str) -> TransportResult<RequirementRecord> {
        let sections = self.documents.sections(quest_name).await?;
        let Some(section) = find_requirements_section(&sections) else {
            tracing::warn!(quest = quest_name, "No requirements section found");
            return Ok(RequirementRecord::empty(quest_name));
        };

        let html = self
            .documents
            .section_html(quest_name, &section.index)
            .await?;
        let text = html.map(|html| flatten_html(&html)).unwrap_or_default();
        if text.trim().is_empty() {
            tracing::warn!(quest = quest_name, "No content found in requirements section");
            return Ok(RequirementRecord::empty(quest_name));
        }

        Ok(extract(&text).into_record(quest_name))
    }

    /// Cache-first lookup.
    ///
    /// A fresh cached record is returned as is. A stale one is returned while a refresh
    /// runs in the background. Without a cached record this is [`RequirementSource::fetch`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, quest_name: &str) -> RequirementRecord {
        let cached = self
            .cache
            .read::<RequirementRecord>(REQUIREMENT_NAMESPACE, quest_name)
            .await;
        match cached {
            Some(envelope) => {
                if self.cache.is_stale(REQUIREMENT_NAMESPACE, &envelope) {
                    tracing::debug!(stored_at = %envelope.stored_at, "Refreshing stale requirements");
                    self.spawn_refresh(quest_name.to_string());
                }
                envelope.into_payload()
            }
            None => self.fetch(quest_name).await,
        }
    }

    /// Spawn a detached [`RequirementSource::fetch`] for one quest.
    pub fn spawn_refresh(&self, quest_name: String) -> JoinHandle<()> {
        let source = self.clone();
        tokio::spawn(async move {
            source.fetch(&quest_name).await;
        })
    }

    /// Resolve every name concurrently and merge with the catalog.
    ///
    /// One quest failing never affects the others; it just contributes an empty record.
    #[instrument(skip_all)]
    pub async fn fetch_all(
        &self,
        names: impl IntoIterator<Item = String>,
        catalog: &QuestCatalog,
    ) -> RequirementMap {
        let names: Vec<String> = names.into_iter().collect();
        let records = join_all(names.iter().map(|name| self.resolve(name))).await;
        let with_data = records.iter().filter(|r| !r.is_empty()).count();
        tracing::info!(
            requested = names.len(),
            with_data,
            "Resolved quest requirements"
        );
        catalog.merge(records)
    }
}
