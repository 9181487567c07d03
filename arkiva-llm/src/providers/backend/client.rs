//! Arkiva HTTP client

use super::types::{ErrorEnvelope, SummaryResponse};
use crate::{DocumentSource, SummaryGenerator};
use arkiva_core::{Document, DocumentId, GenerationError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for [`ArkivaBackend`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
}

/// Arkiva REST backend client.
#[derive(Clone)]
pub struct ArkivaBackend {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ArkivaBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<Res: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        document_id: DocumentId,
    ) -> Result<Res, GenerationError> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| GenerationError::InvalidResponse {
                reason: format!("Failed to parse response: {}", e),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(GenerationError::NotFound { document_id });
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

/// Map a non-2xx reply to a backend error, keeping the server's message when
/// the body carries the standard error envelope.
pub(crate) fn error_from_body(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            debug!(status, code = ?envelope.error.code, "backend rejected request");
            GenerationError::backend(status, envelope.error.message)
        }
        Err(_) => GenerationError::backend(status, String::new()),
    }
}

#[async_trait]
impl SummaryGenerator for ArkivaBackend {
    async fn generate_summary(&self, document_id: DocumentId) -> Result<String, GenerationError> {
        let path = format!("/api/documents/{}/ai-summary", document_id);
        let reply: SummaryResponse = self
            .send(self.client.post(self.url(&path)), document_id)
            .await?;
        if let Some(doc_id) = reply.doc_id {
            if doc_id != document_id.get() {
                warn!(
                    requested = %document_id,
                    returned = doc_id,
                    "summary reply for unexpected document"
                );
            }
        }
        Ok(reply.ai_summary.unwrap_or_default())
    }
}

#[async_trait]
impl DocumentSource for ArkivaBackend {
    async fn fetch_document(&self, document_id: DocumentId) -> Result<Document, GenerationError> {
        let path = format!("/api/documents/{}", document_id);
        self.send(self.client.get(self.url(&path)), document_id).await
    }
}

impl std::fmt::Debug for ArkivaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArkivaBackend")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
