use std::sync::Arc;

use crate::triage::assessor::SymptomAssessor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote or local assessor, chosen once at startup from config.
    pub assessor: Arc<dyn SymptomAssessor>,
}
