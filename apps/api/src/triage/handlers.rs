//! Axum route handlers for the Assessment API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::triage::models::{AssessmentResult, SymptomRecord};

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub assessment_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub backend: &'static str,
    pub result: AssessmentResult,
}

#[derive(Debug, Serialize)]
pub struct BackendResponse {
    pub backend: &'static str,
    /// True when results come from the local rules rather than the model.
    pub simulated: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assessments
///
/// Runs one assessment with the configured backend.
pub async fn handle_assess(
    State(state): State<AppState>,
    Json(record): Json<SymptomRecord>,
) -> Result<Json<AssessmentResponse>, AppError> {
    if let Some(pain) = record.parsed_pain_level() {
        if !(0..=10).contains(&pain) {
            return Err(AppError::Validation(format!(
                "painLevel must be between 0 and 10, got {pain}"
            )));
        }
    }

    let assessment_id = Uuid::new_v4();
    let result = state.assessor.assess(&record).await?;

    info!(
        "Assessment {} via {}: {} (hospital={})",
        assessment_id,
        state.assessor.backend(),
        result.urgency_level(),
        result.should_go_to_hospital()
    );

    Ok(Json(AssessmentResponse {
        assessment_id,
        assessed_at: Utc::now(),
        backend: state.assessor.backend(),
        result,
    }))
}

/// GET /api/v1/assessments/backend
pub async fn handle_backend(State(state): State<AppState>) -> Json<BackendResponse> {
    let backend = state.assessor.backend();
    Json(BackendResponse {
        backend,
        simulated: backend == "local",
    })
}
