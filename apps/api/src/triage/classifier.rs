//! Response classifier — maps free model text to an urgency tier.
//!
//! Tiers are checked most-severe-first, so a reply that mentions several tiers
//! (e.g. "this is not URGENT, SELF-CARE is fine") resolves to the most severe one.

use crate::triage::models::{UrgencyLevel, CLINICAL_PRIORITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub urgency_level: UrgencyLevel,
    pub should_go_to_hospital: bool,
}

/// Case-sensitive substring scan in clinical priority order. No match → `Unknown`.
pub fn classify(raw_text: &str) -> Classification {
    let urgency_level = CLINICAL_PRIORITY
        .iter()
        .copied()
        .find(|tier| raw_text.contains(tier.label()))
        .unwrap_or(UrgencyLevel::Unknown);

    Classification {
        urgency_level,
        should_go_to_hospital: urgency_level.requires_in_person_care(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tier_is_detected() {
        assert_eq!(
            classify("RECOMMENDATION: MEDIUM: Schedule a same-day appointment").urgency_level,
            UrgencyLevel::Medium
        );
        assert_eq!(
            classify("RECOMMENDATION: SELF-CARE").urgency_level,
            UrgencyLevel::SelfCare
        );
    }

    #[test]
    fn test_priority_beats_position() {
        let text = "SELF-CARE would normally suffice, but chest pain makes this URGENT.";
        let c = classify(text);
        assert_eq!(c.urgency_level, UrgencyLevel::Urgent);
        assert!(c.should_go_to_hospital);
    }

    #[test]
    fn test_every_pair_resolves_to_more_severe_tier() {
        for (i, severe) in CLINICAL_PRIORITY.iter().enumerate() {
            for milder in &CLINICAL_PRIORITY[i + 1..] {
                let text = format!("{} ... {}", milder.label(), severe.label());
                assert_eq!(classify(&text).urgency_level, *severe, "{text}");
            }
        }
    }

    #[test]
    fn test_no_keyword_is_unknown_without_hospital() {
        let c = classify("Please drink water and rest.");
        assert_eq!(c.urgency_level, UrgencyLevel::Unknown);
        assert!(!c.should_go_to_hospital);

        let c = classify("");
        assert_eq!(c.urgency_level, UrgencyLevel::Unknown);
        assert!(!c.should_go_to_hospital);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(classify("this is urgent").urgency_level, UrgencyLevel::Unknown);
    }

    #[test]
    fn test_hospital_flag_matches_tier_for_clinical_levels() {
        for tier in CLINICAL_PRIORITY {
            let c = classify(tier.label());
            assert_eq!(c.urgency_level, tier);
            assert_eq!(
                c.should_go_to_hospital,
                matches!(tier, UrgencyLevel::Urgent | UrgencyLevel::High)
            );
        }
    }
}
