// Triage prompt template.
// The model is asked for three labeled sections; the classifier only relies on
// the tier keywords appearing somewhere in the reply.

use crate::triage::models::{SymptomRecord, CLINICAL_PRIORITY};

const NOT_PROVIDED: &str = "Not provided";
const NONE: &str = "None";

/// Renders the triage prompt for `record`. Pure and never empty.
pub fn format_symptom_prompt(record: &SymptomRecord) -> String {
    let or = |field: &Option<String>, default: &'static str| -> String {
        field.as_deref().unwrap_or(default).to_string()
    };

    let tiers = CLINICAL_PRIORITY
        .iter()
        .filter_map(|tier| {
            tier.directive()
                .map(|clause| format!("   - {}: {}", tier.label(), clause))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "
You are a medical triage assistant helping to determine if a patient should go to the hospital based on their symptoms.
Your goal is to provide a preliminary assessment only - NOT a diagnosis.

IMPORTANT: Always err on the side of caution. When in doubt, recommend the patient seek medical attention.

Patient Information:
- Age: {age}
- Gender: {gender}
- Primary symptoms: {primary_symptoms}
- Symptom duration: {duration}
- Pain level (1-10): {pain_level}
- Existing medical conditions: {medical_conditions}
- Current medications: {medications}
- Additional notes: {additional_info}

Based only on this information, provide an assessment with these components:
1. RECOMMENDATION: Clearly state if the patient should:
{tiers}

2. REASONING: Brief explanation for your recommendation

3. IMPORTANT WARNINGS: List any red flag symptoms that would require immediate medical attention

Remember that this is not a diagnosis but a preliminary assessment to help with triage decisions.
",
        age = or(&record.age, NOT_PROVIDED),
        gender = or(&record.gender, NOT_PROVIDED),
        primary_symptoms = or(&record.primary_symptoms, NOT_PROVIDED),
        duration = or(&record.duration, NOT_PROVIDED),
        pain_level = or(&record.pain_level, NOT_PROVIDED),
        medical_conditions = or(&record.medical_conditions, NONE),
        medications = or(&record.medications, NONE),
        additional_info = or(&record.additional_info, NONE),
    )
}
