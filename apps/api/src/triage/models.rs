#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// Patient-entered symptom data. Every field is optional; blank strings are
/// treated as absent so they never leak into prompts or narratives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRecord {
    #[serde(default, deserialize_with = "text_or_number")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub primary_symptoms: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub duration: Option<String>,
    /// 0–10 as entered by the user; kept verbatim for display.
    #[serde(default, deserialize_with = "text_or_number")]
    pub pain_level: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub medical_conditions: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub medications: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub additional_info: Option<String>,
}

impl SymptomRecord {
    /// Pain level as an integer using leading-digit parsing ("8/10" → 8).
    /// Absent or non-numeric input yields 0.
    pub fn pain_score(&self) -> i64 {
        self.pain_level
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(0)
    }

    /// Pain level only when it was entered as a number.
    pub fn parsed_pain_level(&self) -> Option<i64> {
        self.pain_level.as_deref().and_then(parse_leading_int)
    }

    pub fn symptoms_lower(&self) -> String {
        self.primary_symptoms
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overlong digit runs saturate instead of reading as "no number".
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_blank))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(TextOrNumber::Text(s)) => non_blank(s),
        Some(TextOrNumber::Number(n)) => Some(number_text(&n)),
        None => None,
    })
}

/// Renders integral floats without an exponent so `1e20` reads back as digits.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.is_finite() && f.fract() == 0.0 => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Urgency tiers
// ────────────────────────────────────────────────────────────────────────────

/// Triage urgency tier. The first five are clinical tiers; `Unknown` and
/// `Error` are sentinels outside the clinical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UrgencyLevel {
    #[serde(rename = "URGENT")]
    Urgent,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "SELF-CARE")]
    SelfCare,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "ERROR")]
    Error,
}

/// Clinical tiers, most severe first.
pub const CLINICAL_PRIORITY: [UrgencyLevel; 5] = [
    UrgencyLevel::Urgent,
    UrgencyLevel::High,
    UrgencyLevel::Medium,
    UrgencyLevel::Low,
    UrgencyLevel::SelfCare,
];

impl UrgencyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Urgent => "URGENT",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::SelfCare => "SELF-CARE",
            UrgencyLevel::Unknown => "UNKNOWN",
            UrgencyLevel::Error => "ERROR",
        }
    }

    /// What the patient should do at this tier. `None` for sentinels.
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            UrgencyLevel::Urgent => Some("Seek immediate emergency care (call emergency services)"),
            UrgencyLevel::High => Some("Go to the hospital/emergency room promptly"),
            UrgencyLevel::Medium => Some("Schedule a same-day or urgent care appointment"),
            UrgencyLevel::Low => Some("Schedule a regular appointment with primary care"),
            UrgencyLevel::SelfCare => Some("Manage symptoms at home with self-care"),
            UrgencyLevel::Unknown | UrgencyLevel::Error => None,
        }
    }

    /// 0 is most severe. `None` for sentinels.
    pub fn clinical_rank(&self) -> Option<u8> {
        CLINICAL_PRIORITY
            .iter()
            .position(|tier| tier == self)
            .map(|i| i as u8)
    }

    /// Hospital flag table. `Unknown` deliberately does not force care; only
    /// `Error` does.
    pub fn requires_in_person_care(&self) -> bool {
        matches!(
            self,
            UrgencyLevel::Urgent | UrgencyLevel::High | UrgencyLevel::Error
        )
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

pub const ERROR_FALLBACK_NARRATIVE: &str = "There was an error processing your symptoms. \
    To be safe, please consult with a healthcare professional.";

/// Result of one assessment. Fields are private so the hospital flag can only
/// be derived from the urgency level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    urgency_level: UrgencyLevel,
    should_go_to_hospital: bool,
    full_assessment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<String>,
}

impl AssessmentResult {
    pub fn new(
        urgency_level: UrgencyLevel,
        full_assessment: String,
        raw_response: Option<String>,
    ) -> Self {
        Self {
            urgency_level,
            should_go_to_hospital: urgency_level.requires_in_person_care(),
            full_assessment,
            raw_response,
        }
    }

    /// ERROR-tier result used when the model output cannot be read.
    pub fn error_fallback() -> Self {
        Self::new(UrgencyLevel::Error, ERROR_FALLBACK_NARRATIVE.to_string(), None)
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        self.urgency_level
    }

    pub fn should_go_to_hospital(&self) -> bool {
        self.should_go_to_hospital
    }

    pub fn full_assessment(&self) -> &str {
        &self.full_assessment
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }
}
