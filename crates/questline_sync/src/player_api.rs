//! Player status from the RuneLite sync service.

use crate::EndpointConfig;
use crate::transport::transport_error;
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use questline_core::Username;
use questline_error::{TransportError, TransportErrorKind, TransportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// Account type segment of the sync service URL.
pub const ACCOUNT_TYPE: &str = "STANDARD";

/// Body returned by the sync service, before validation.
///
/// Every field is optional; [`crate::snapshot_from_response`] decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatusResponse {
    /// Quest name to status code (0 not started, 1 in progress, 2 complete)
    #[serde(default)]
    pub quests: Option<BTreeMap<String, i64>>,
    /// Skill name to level
    #[serde(default)]
    pub levels: Option<BTreeMap<String, u32>>,
    /// When the service last received data from the player's client
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Business error reported alongside a success status
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    error: Option<String>,
}

/// Source of raw player status responses.
#[async_trait]
pub trait PlayerStatusApi: Send + Sync {
    /// Fetch the raw status body for `username`.
    ///
    /// A success response carrying an `error` field is reported as
    /// [`TransportErrorKind::Rejected`].
    async fn fetch_status(&self, username: &Username) -> TransportResult<PlayerStatusResponse>;
}

/// [`PlayerStatusApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPlayerStatusApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlayerStatusApi {
    /// Create a client for the configured sync service.
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
        tracing::debug!("Created player status client");
        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// URL of a player's status document.
    pub fn status_url(&self, username: &Username) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            utf8_percent_encode(username.as_str(), NON_ALPHANUMERIC),
            ACCOUNT_TYPE
        )
    }
}

#[async_trait]
impl PlayerStatusApi for HttpPlayerStatusApi {
    #[instrument(skip(self), fields(username = %username))]
    async fn fetch_status(&self, username: &Username) -> TransportResult<PlayerStatusResponse> {
        let response = self
            .client
            .get(self.status_url(username))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let error_body: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            tracing::debug!(
                status = status.as_u16(),
                code = ?error_body.code,
                "Sync service returned error status"
            );
            return Err(TransportError::new(TransportErrorKind::Status {
                status: status.as_u16(),
                code: error_body.code,
                message: error_body.error,
            }));
        }

        if body.is_empty() {
            return Err(TransportError::new(TransportErrorKind::InvalidResponse(
                "Invalid response from server".to_string(),
            )));
        }

        let parsed: PlayerStatusResponse = serde_json::from_slice(&body).map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidResponse(format!(
                "Failed to parse player status: {}",
                e
            )))
        })?;

        if let Some(error) = parsed.error.as_deref().filter(|e| !e.is_empty()) {
            return Err(TransportError::new(TransportErrorKind::Rejected(
                error.to_string(),
            )));
        }
        Ok(parsed)
    }
}
