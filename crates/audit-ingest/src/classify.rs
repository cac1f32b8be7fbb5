//! Severity classifier.

use audit_types::{ActionKind, Severity};

/// Entity labels that force `High` unless a numeric safety score decides first.
pub const SENSITIVE_ENTITIES: [&str; 5] =
    ["CREDIT_CARD", "US_SSN", "API_KEY", "AWS_KEY", "AWS_SECRET_KEY"];

/// First matching rule wins: safety score < 70, safety score < 90,
/// sensitive entity present, known action kind, otherwise info.
pub fn classify(action: &ActionKind, safety_score: Option<f64>, entities: &[String]) -> Severity {
    if let Some(score) = safety_score {
        if score < 70.0 {
            return Severity::High;
        }
        if score < 90.0 {
            return Severity::Medium;
        }
    }
    if entities
        .iter()
        .any(|e| SENSITIVE_ENTITIES.contains(&e.as_str()))
    {
        return Severity::High;
    }
    if action.is_known() {
        return Severity::Low;
    }
    Severity::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn low_safety_score_is_high_regardless_of_entities() {
        assert_eq!(
            classify(&ActionKind::Audit, Some(65.0), &[]),
            Severity::High
        );
        assert_eq!(
            classify(&ActionKind::Redaction, Some(65.0), &labels(&["EMAIL"])),
            Severity::High
        );
    }

    #[test]
    fn numeric_rule_beats_sensitive_entities() {
        assert_eq!(
            classify(&ActionKind::Redaction, Some(85.0), &labels(&["CREDIT_CARD"])),
            Severity::Medium
        );
    }

    #[test]
    fn high_safety_score_falls_through_to_entity_rule() {
        assert_eq!(
            classify(&ActionKind::Redaction, Some(95.0), &labels(&["CREDIT_CARD"])),
            Severity::High
        );
        assert_eq!(
            classify(&ActionKind::Audit, Some(95.0), &[]),
            Severity::Low
        );
    }

    #[test]
    fn sensitive_entity_is_high() {
        for label in SENSITIVE_ENTITIES {
            assert_eq!(
                classify(&ActionKind::ChatProxy, None, &labels(&["EMAIL", label])),
                Severity::High
            );
        }
    }

    #[test]
    fn known_actions_are_low_and_others_info() {
        assert_eq!(
            classify(&ActionKind::Redaction, None, &labels(&["EMAIL"])),
            Severity::Low
        );
        assert_eq!(
            classify(&ActionKind::Other("login".into()), None, &[]),
            Severity::Info
        );
        assert_eq!(
            classify(&ActionKind::Other("login".into()), Some(50.0), &[]),
            Severity::High
        );
    }
}
