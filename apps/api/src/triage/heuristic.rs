//! Local heuristic assessor — rule table over symptom keywords and pain level.
//!
//! Used when no Gemini credential is configured, or in mock mode. Produces the
//! same result shape as the remote assessor with a locally synthesized narrative.

use std::time::Duration;

use async_trait::async_trait;

use crate::triage::assessor::{AssessError, SymptomAssessor};
use crate::triage::models::{
    AssessmentResult, SymptomRecord, UrgencyLevel, ERROR_FALLBACK_NARRATIVE,
};

const URGENT_KEYWORDS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "unconscious",
    "severe bleeding",
];
const HIGH_KEYWORDS: &[&str] = &["broken", "fracture"];
const MEDIUM_KEYWORDS: &[&str] = &["vomiting", "dehydration", "infection"];
const LOW_KEYWORDS: &[&str] = &["pain", "discomfort"];

const SIMULATION_DISCLAIMER: &str = "This is a simulated assessment for testing purposes only. \
    In a real situation, always consult with medical professionals.";

/// Deterministic rule-based assessor. `latency` only delays the reply.
#[derive(Debug, Clone, Default)]
pub struct LocalHeuristicAssessor {
    latency: Duration,
}

impl LocalHeuristicAssessor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SymptomAssessor for LocalHeuristicAssessor {
    async fn assess(&self, record: &SymptomRecord) -> Result<AssessmentResult, AssessError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let level = evaluate_rules(record);
        Ok(AssessmentResult::new(
            level,
            build_narrative(record, level),
            None,
        ))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Ordered, first-match-wins triage rules.
pub fn evaluate_rules(record: &SymptomRecord) -> UrgencyLevel {
    let symptoms = record.symptoms_lower();
    let pain = record.pain_score();
    let mentions_any = |keywords: &[&str]| keywords.iter().any(|k| symptoms.contains(k));

    if mentions_any(URGENT_KEYWORDS) {
        UrgencyLevel::Urgent
    } else if pain >= 8
        || (symptoms.contains("fever") && symptoms.contains("rash"))
        || mentions_any(HIGH_KEYWORDS)
    {
        UrgencyLevel::High
    } else if pain >= 6 || mentions_any(MEDIUM_KEYWORDS) {
        UrgencyLevel::Medium
    } else if pain >= 4 || mentions_any(LOW_KEYWORDS) {
        UrgencyLevel::Low
    } else {
        UrgencyLevel::SelfCare
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative
// ────────────────────────────────────────────────────────────────────────────

fn build_narrative(record: &SymptomRecord, level: UrgencyLevel) -> String {
    let age_text = match record.age.as_deref() {
        Some(age) => format!("You are {age} years old"),
        None => "Your age was not provided".to_string(),
    };
    let patient_description = match record.gender.as_deref() {
        Some(gender) => format!("{age_text}, a {} patient.", gender.to_lowercase()),
        None => format!("{age_text}."),
    };

    let symptoms = record.primary_symptoms.as_deref().unwrap_or("Not provided");
    let pain = record.pain_level.as_deref().unwrap_or("Not provided");

    let (reasoning, warnings) = match level {
        UrgencyLevel::Urgent => (
            format!(
                "Based on your reported symptoms \"{symptoms}\" and a pain level of {pain}/10, \
                this appears to be a potentially serious medical situation requiring immediate attention."
            ),
            "Delay in seeking emergency care could lead to serious complications. \
            Please call emergency services or go to the nearest emergency room immediately.",
        ),
        UrgencyLevel::High => (
            format!(
                "Your symptoms \"{symptoms}\" with a pain level of {pain}/10 indicate a condition \
                that should be evaluated by medical professionals soon."
            ),
            "If your symptoms worsen, such as increased pain, difficulty breathing, or confusion, \
            seek emergency care immediately.",
        ),
        UrgencyLevel::Medium => (
            format!(
                "Your symptoms \"{symptoms}\" with a pain level of {pain}/10 suggest a condition \
                that should be evaluated by a healthcare provider today, but may not require emergency care."
            ),
            "If your symptoms worsen significantly, consider going to the emergency room.",
        ),
        UrgencyLevel::Low => (
            format!(
                "Your symptoms \"{symptoms}\" with a pain level of {pain}/10 appear to be mild to moderate \
                and could be addressed during a regular medical appointment."
            ),
            "If your symptoms worsen or persist for more than a few days, consider seeking more immediate care.",
        ),
        UrgencyLevel::SelfCare => (
            format!(
                "Your symptoms \"{symptoms}\" with a pain level of {pain}/10 appear to be mild \
                and likely can be managed with appropriate self-care."
            ),
            "If your symptoms persist beyond 7 days or worsen, please consult with a healthcare provider.",
        ),
        // Sentinels have no tier wording; never present them as a recommendation.
        UrgencyLevel::Unknown | UrgencyLevel::Error => {
            return ERROR_FALLBACK_NARRATIVE.to_string();
        }
    };
    let directive = level.directive().unwrap_or_default();

    format!(
        "{patient_description}\n\n\
        RECOMMENDATION: {}: {directive}\n\n\
        REASONING: {reasoning}\n\n\
        IMPORTANT WARNINGS: {warnings}\n\n\
        {SIMULATION_DISCLAIMER}",
        level.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symptoms: &str, pain: Option<&str>) -> SymptomRecord {
        SymptomRecord {
            primary_symptoms: Some(symptoms.to_string()).filter(|s| !s.is_empty()),
            pain_level: pain.map(str::to_string),
            ..Default::default()
        }
    }

    async fn assess(r: &SymptomRecord) -> AssessmentResult {
        LocalHeuristicAssessor::default().assess(r).await.unwrap()
    }

    #[tokio::test]
    async fn test_severe_bleeding_is_urgent_despite_low_pain() {
        let result = assess(&record("severe bleeding", Some("2"))).await;
        assert_eq!(result.urgency_level(), UrgencyLevel::Urgent);
        assert!(result.should_go_to_hospital());
    }

    #[tokio::test]
    async fn test_mild_headache_with_pain_5_is_low() {
        let result = assess(&record("mild headache", Some("5"))).await;
        assert_eq!(result.urgency_level(), UrgencyLevel::Low);
        assert!(!result.should_go_to_hospital());
    }

    #[tokio::test]
    async fn test_empty_record_is_self_care() {
        let result = assess(&record("", None)).await;
        assert_eq!(result.urgency_level(), UrgencyLevel::SelfCare);
        assert!(!result.should_go_to_hospital());
        assert!(result.raw_response().is_none());
    }

    #[test]
    fn test_rules_are_case_insensitive_on_symptoms() {
        assert_eq!(evaluate_rules(&record("Chest Pain", None)), UrgencyLevel::Urgent);
        assert_eq!(
            evaluate_rules(&record("DIFFICULTY BREATHING", Some("1"))),
            UrgencyLevel::Urgent
        );
    }

    #[test]
    fn test_high_rule_triggers() {
        assert_eq!(evaluate_rules(&record("headache", Some("8"))), UrgencyLevel::High);
        assert_eq!(evaluate_rules(&record("fever and rash", None)), UrgencyLevel::High);
        assert_eq!(evaluate_rules(&record("broken wrist", None)), UrgencyLevel::High);
        assert_eq!(evaluate_rules(&record("possible fracture", None)), UrgencyLevel::High);
        // fever alone is not enough
        assert_eq!(evaluate_rules(&record("fever", None)), UrgencyLevel::SelfCare);
    }

    #[test]
    fn test_medium_rule_triggers() {
        assert_eq!(evaluate_rules(&record("cough", Some("6"))), UrgencyLevel::Medium);
        assert_eq!(evaluate_rules(&record("vomiting", None)), UrgencyLevel::Medium);
        assert_eq!(evaluate_rules(&record("dehydration", None)), UrgencyLevel::Medium);
        assert_eq!(evaluate_rules(&record("ear infection", None)), UrgencyLevel::Medium);
    }

    #[test]
    fn test_low_rule_triggers() {
        assert_eq!(evaluate_rules(&record("cough", Some("4"))), UrgencyLevel::Low);
        assert_eq!(evaluate_rules(&record("back pain", Some("1"))), UrgencyLevel::Low);
        assert_eq!(evaluate_rules(&record("stomach discomfort", None)), UrgencyLevel::Low);
    }

    #[test]
    fn test_first_match_wins() {
        // "chest pain" also contains "pain" (LOW) but URGENT is checked first
        assert_eq!(evaluate_rules(&record("chest pain", Some("9"))), UrgencyLevel::Urgent);
        // pain 8 outranks the "infection" keyword
        assert_eq!(evaluate_rules(&record("infection", Some("8"))), UrgencyLevel::High);
    }

    #[test]
    fn test_overlong_pain_level_is_high() {
        assert_eq!(
            evaluate_rules(&record("headache", Some("99999999999999999999"))),
            UrgencyLevel::High
        );
    }

    #[test]
    fn test_sentinel_levels_never_render_tier_wording() {
        let r = record("headache", Some("3"));
        for level in [UrgencyLevel::Unknown, UrgencyLevel::Error] {
            let text = build_narrative(&r, level);
            assert_eq!(text, ERROR_FALLBACK_NARRATIVE);
            assert!(!text.contains("SELF-CARE"));
            assert!(!text.contains("RECOMMENDATION"));
        }
    }

    #[test]
    fn test_unparseable_pain_counts_as_zero() {
        assert_eq!(evaluate_rules(&record("tired", Some("a lot"))), UrgencyLevel::SelfCare);
    }

    #[tokio::test]
    async fn test_classification_is_deterministic() {
        let r = record("vomiting since morning", Some("5"));
        let first = assess(&r).await;
        let second = assess(&r).await;
        assert_eq!(first.urgency_level(), second.urgency_level());
        assert_eq!(first.should_go_to_hospital(), second.should_go_to_hospital());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_narrative_has_all_sections_and_interpolates_input() {
        let r = SymptomRecord {
            age: Some("29".to_string()),
            gender: Some("Male".to_string()),
            primary_symptoms: Some("Broken ankle".to_string()),
            pain_level: Some("7".to_string()),
            ..Default::default()
        };
        let result = assess(&r).await;
        let text = result.full_assessment();

        assert!(text.starts_with("You are 29 years old, a male patient."));
        assert!(text.contains("RECOMMENDATION: HIGH: Go to the hospital/emergency room promptly"));
        assert!(text.contains("REASONING: Your symptoms \"Broken ankle\" with a pain level of 7/10"));
        assert!(text.contains("IMPORTANT WARNINGS: "));
        assert!(text.ends_with(SIMULATION_DISCLAIMER));
    }

    #[tokio::test]
    async fn test_narrative_for_empty_record_has_no_leakage() {
        let result = assess(&SymptomRecord::default()).await;
        let text = result.full_assessment();

        assert!(text.starts_with("Your age was not provided."));
        assert!(text.contains("\"Not provided\" with a pain level of Not provided/10"));
        assert!(text.contains("RECOMMENDATION: SELF-CARE: Manage symptoms at home with self-care"));
        assert!(!text.contains("undefined"));
        assert!(!text.contains("null"));
    }

    #[tokio::test]
    async fn test_each_tier_uses_its_own_recommendation_line() {
        let cases = [
            ("unconscious", UrgencyLevel::Urgent),
            ("fracture", UrgencyLevel::High),
            ("vomiting", UrgencyLevel::Medium),
            ("discomfort", UrgencyLevel::Low),
            ("sneezing", UrgencyLevel::SelfCare),
        ];
        for (symptom, tier) in cases {
            let result = assess(&record(symptom, None)).await;
            let expected = format!(
                "RECOMMENDATION: {}: {}",
                tier.label(),
                tier.directive().unwrap()
            );
            assert!(result.full_assessment().contains(&expected), "{symptom}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_does_not_change_result() {
        let slow = LocalHeuristicAssessor::new(Duration::from_millis(1500));
        let r = record("difficulty breathing", None);
        let delayed = slow.assess(&r).await.unwrap();
        let immediate = assess(&r).await;
        assert_eq!(delayed, immediate);
    }
}
