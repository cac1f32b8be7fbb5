//! One-line human summaries per action kind.

use crate::LogLine;
use audit_types::ActionKind;
use std::collections::BTreeSet;

const MAX_LABELS: usize = 6;
const ELLIPSIS: &str = "…";

pub fn derive_message(line: &LogLine) -> String {
    let raw = &line.raw;
    match &line.action {
        ActionKind::Redaction => {
            let mode = placeholder(&raw.mode);
            if line.entities.is_empty() {
                format!("Sanitized input ({mode})")
            } else {
                format!(
                    "Sanitized input ({mode}) - redacted {} entities: {}",
                    placeholder(&raw.entity_count),
                    label_list(&line.entities)
                )
            }
        }
        ActionKind::Audit => format!(
            "Audit completed - safety {}/100, usability {}/100",
            placeholder(&raw.safety_score),
            placeholder(&raw.usability_score)
        ),
        ActionKind::ChatProxy => {
            let mode = placeholder(&raw.mode);
            if line.entities.is_empty() {
                format!("Chat forwarded ({mode})")
            } else {
                format!(
                    "Chat forwarded ({mode}) - hidden: {}",
                    label_list(&line.entities)
                )
            }
        }
        ActionKind::Other(tag) => tag.clone(),
    }
}

fn placeholder(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("null")
}

/// Up to six sorted unique labels, with an ellipsis when more exist.
fn label_list(entities: &[String]) -> String {
    let uniq: BTreeSet<&str> = entities.iter().map(String::as_str).collect();
    let shown: Vec<&str> = uniq.iter().take(MAX_LABELS).copied().collect();
    let mut out = shown.join(", ");
    if uniq.len() > MAX_LABELS {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::decode_line;

    fn message(raw: &str) -> String {
        crate::derive_message(&decode_line(raw).unwrap())
    }

    #[test]
    fn redaction_lists_sorted_unique_labels() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event","mode_used":"mask","entity_count":3,"entities_detected":["PHONE","EMAIL","PHONE"]}"#),
            "Sanitized input (mask) - redacted 3 entities: EMAIL, PHONE"
        );
    }

    #[test]
    fn redaction_truncates_after_six_labels() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event","mode_used":"strict","entity_count":7,"entities_detected":["G","F","E","D","C","B","A"]}"#),
            "Sanitized input (strict) - redacted 7 entities: A, B, C, D, E, F…"
        );
    }

    #[test]
    fn redaction_without_entities_omits_clause() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event","mode_used":"mask","entity_count":0,"entities_detected":[]}"#),
            "Sanitized input (mask)"
        );
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event"}"#),
            "Sanitized input (null)"
        );
    }

    #[test]
    fn audit_uses_raw_scores() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"audit_event","safety_score":60,"usability_score":85.5}"#),
            "Audit completed - safety 60/100, usability 85.5/100"
        );
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"audit_event","safety_score":95}"#),
            "Audit completed - safety 95/100, usability null/100"
        );
    }

    #[test]
    fn chat_proxy_lists_hidden_labels() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"chat_proxy_event","mode":"synthetic","entities_hidden":["US_SSN","EMAIL"]}"#),
            "Chat forwarded (synthetic) - hidden: EMAIL, US_SSN"
        );
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"chat_proxy_event","mode":"mask"}"#),
            "Chat forwarded (mask)"
        );
    }

    #[test]
    fn other_action_is_its_tag() {
        assert_eq!(
            message(r#"{"timestamp":"2024-01-01T00:00:00","action":"user_login"}"#),
            "user_login"
        );
    }
}
