// Symptom triage: prompt construction, model-reply classification, and the
// local rule-based fallback, all behind the `SymptomAssessor` trait.
// Calls to the generation API go through llm_client only.

pub mod assessor;
pub mod classifier;
pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod prompts;
