//! Requirement documents from the wiki parse API.

use crate::EndpointConfig;
use async_trait::async_trait;
use questline_error::{TransportError, TransportErrorKind, TransportResult};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::instrument;

/// One entry in a page's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentSection {
    /// Section title as displayed
    pub line: String,
    /// Section index, as the API expects it back
    pub index: String,
}

impl DocumentSection {
    /// Create a section entry.
    pub fn new(line: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            index: index.into(),
        }
    }

    /// True if this section holds a quest's requirements.
    pub fn is_requirements(&self) -> bool {
        let title = self.line.to_lowercase();
        title.contains("requirement") || title == "requirements" || title == "prereq"
    }
}

/// First requirements section in a table of contents.
pub fn find_requirements_section(sections: &[DocumentSection]) -> Option<&DocumentSection> {
    sections.iter().find(|section| section.is_requirements())
}

/// Source of per-quest documents.
#[async_trait]
pub trait RequirementDocuments: Send + Sync {
    /// Table of contents for a quest page. A page with no sections yields an empty list.
    async fn sections(&self, page: &str) -> TransportResult<Vec<DocumentSection>>;

    /// Rendered HTML of one section, or `None` if the page returned no content.
    async fn section_html(&self, page: &str, index: &str) -> TransportResult<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct ParseEnvelope<T> {
    parse: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SectionsPayload {
    #[serde(default)]
    sections: Vec<DocumentSection>,
}

#[derive(Debug, Deserialize)]
struct TextPayload {
    text: Option<HashMap<String, String>>,
}

/// [`RequirementDocuments`] over the MediaWiki `action=parse` API.
#[derive(Debug, Clone)]
pub struct HttpWikiDocuments {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWikiDocuments {
    /// Create a client for the configured wiki.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &EndpointConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                TransportError::new(TransportErrorKind::Other(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        tracing::debug!("Created wiki documents client");
        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> TransportResult<Option<T>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("format", "json"), ("origin", "*")])
            .send()
            .await
            .map_err(crate::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(TransportErrorKind::Status {
                status: status.as_u16(),
                code: None,
                message: None,
            }));
        }

        let envelope: ParseEnvelope<T> = response.json().await.map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidResponse(format!(
                "Failed to parse wiki response: {}",
                e
            )))
        })?;
        Ok(envelope.parse)
    }
}

#[async_trait]
impl RequirementDocuments for HttpWikiDocuments {
    #[instrument(skip(self))]
    async fn sections(&self, page: &str) -> TransportResult<Vec<DocumentSection>> {
        let payload: Option<SectionsPayload> = self
            .parse(&[("action", "parse"), ("page", page), ("prop", "sections")])
            .await?;
        Ok(payload.map(|p| p.sections).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn section_html(&self, page: &str, index: &str) -> TransportResult<Option<String>> {
        let payload: Option<TextPayload> = self
            .parse(&[
                ("action", "parse"),
                ("page", page),
                ("prop", "text"),
                ("section", index),
            ])
            .await?;
        Ok(payload
            .and_then(|p| p.text)
            .and_then(|mut text| text.remove("*")))
    }
}
