//! Symptom assessors — one capability, two backends.
//!
//! `RemoteAssessor` asks the Gemini model and classifies its reply.
//! `LocalHeuristicAssessor` (see `heuristic.rs`) applies a local rule table.
//!
//! `AppState` holds an `Arc<dyn SymptomAssessor>` chosen once at startup.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{AssessorBackend, Config};
use crate::llm_client::{GeminiClient, LlmError, ReqwestTransport, TransportError};
use crate::triage::classifier::classify;
use crate::triage::heuristic::LocalHeuristicAssessor;
use crate::triage::models::{AssessmentResult, SymptomRecord};
use crate::triage::prompts::format_symptom_prompt;

#[derive(Debug, Error)]
pub enum AssessError {
    /// The generation service could not be reached or returned a non-success status.
    #[error("Remote assessment service failed: {0}")]
    RemoteService(#[from] TransportError),
}

/// Evaluate symptom data and return an urgency classification with narrative.
#[async_trait]
pub trait SymptomAssessor: Send + Sync {
    async fn assess(&self, record: &SymptomRecord) -> Result<AssessmentResult, AssessError>;

    /// "remote" | "local" — reported to callers for transparency.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteAssessor
// ────────────────────────────────────────────────────────────────────────────

/// Assessor backed by the Gemini generation API.
///
/// Transport failures propagate as `AssessError::RemoteService` and are never
/// retried. An unreadable reply becomes an ERROR-tier result that sends the
/// patient to care.
pub struct RemoteAssessor {
    client: GeminiClient,
}

impl RemoteAssessor {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SymptomAssessor for RemoteAssessor {
    async fn assess(&self, record: &SymptomRecord) -> Result<AssessmentResult, AssessError> {
        let prompt = format_symptom_prompt(record);

        match self.client.generate(&prompt).await {
            Ok(text) => {
                let classification = classify(&text);
                debug!(
                    "Classified model reply as {} (hospital={})",
                    classification.urgency_level, classification.should_go_to_hospital
                );
                Ok(AssessmentResult::new(
                    classification.urgency_level,
                    text.clone(),
                    Some(text),
                ))
            }
            Err(LlmError::MalformedResponse(detail)) => {
                warn!("Unreadable generation response, falling back to ERROR tier: {detail}");
                Ok(AssessmentResult::error_fallback())
            }
            Err(LlmError::Transport(e)) => {
                error!("Gemini assessment error: {e}");
                Err(AssessError::RemoteService(e))
            }
        }
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

/// Picks the assessor for this process from configuration.
pub fn build_assessor(config: &Config) -> Result<Arc<dyn SymptomAssessor>, TransportError> {
    match config.assessor_backend() {
        AssessorBackend::Remote { api_key } => {
            let transport = Arc::new(ReqwestTransport::new(config.gemini_timeout)?);
            let client = GeminiClient::new(
                transport,
                config.gemini_endpoint.clone(),
                config.gemini_model.clone(),
                api_key,
            );
            info!("Using remote assessor (model: {})", client.model());
            Ok(Arc::new(RemoteAssessor::new(client)))
        }
        AssessorBackend::Local { reason } => {
            warn!("Using local heuristic assessor: {}", reason.describe());
            Ok(Arc::new(LocalHeuristicAssessor::new(config.mock_latency)))
        }
    }
}
