/// LLM Client — the single point of entry for calls to the Gemini generation API.
///
/// ARCHITECTURAL RULE: No other module may talk to the generation endpoint directly.
/// The outbound HTTP call goes through an injected `GenerationTransport` so the
/// assessor can be exercised without a network.
///
/// One call per request: no retry, no backoff. A timeout is the transport's business.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod wire;

use wire::{GenerateContentRequest, GenerateContentResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Request serialization failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Anything that can POST a JSON body and hand back the body of a 2xx response.
/// Non-success statuses must surface as `TransportError::Status`.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Production transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl GenerationTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .query(query)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Generation API returned {}", status);
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or(text)
                });
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

/// Client for the `generateContent` method of one Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn GenerationTransport>,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        transport: Arc<dyn GenerationTransport>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Sends `prompt` with the fixed triage generation settings and returns the
    /// first candidate's first text part.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest::for_prompt(prompt);
        let body = serde_json::to_value(&request).map_err(TransportError::Encode)?;

        let url = self.url();
        debug!("Calling generation API: {url}");

        let raw = self
            .transport
            .post_json(&url, &[("key", self.api_key.as_str())], &body)
            .await?;

        let response: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| LlmError::MalformedResponse(format!("response is not valid JSON: {e}")))?;

        let text = response
            .first_text()
            .ok_or_else(|| {
                LlmError::MalformedResponse("no candidates[0].content.parts[0].text".to_string())
            })?
            .to_string();

        debug!("Generation API returned {} chars", text.len());
        Ok(text)
    }
}
