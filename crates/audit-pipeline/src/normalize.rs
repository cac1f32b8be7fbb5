//! Normalization of whatever the audit pipeline returns into fixed scores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SAFETY_SCORE: i64 = 50;
pub const DEFAULT_USABILITY_SCORE: i64 = 80;

const SAFETY_KEYS: [&str; 3] = ["safety_score", "safetyscore", "safety score"];
const USABILITY_KEYS: [&str; 3] = ["usability_score", "usabilityscore", "usability score"];

/// Raw result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// Free text: plain JSON, or JSON wrapped in prose or code fences.
    Text(String),
    /// Already-structured result.
    Structured(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub safety_score: i64,
    pub usability_score: i64,
    pub critique: String,
}

impl AuditOutcome {
    fn fallback(critique: &str) -> Self {
        Self {
            safety_score: DEFAULT_SAFETY_SCORE,
            usability_score: DEFAULT_USABILITY_SCORE,
            critique: critique.to_string(),
        }
    }
}

pub fn normalize_output(output: &PipelineOutput) -> AuditOutcome {
    match output {
        PipelineOutput::Text(text) => normalize_text(text),
        PipelineOutput::Structured(Value::Object(obj)) => normalize_fields(obj),
        PipelineOutput::Structured(Value::String(text)) => normalize_text(text),
        PipelineOutput::Structured(_) => AuditOutcome::fallback("Parse fallback"),
    }
}

/// Unify key variants and coerce scores; missing or unparsable scores take the defaults.
pub fn normalize_fields(raw: &Map<String, Value>) -> AuditOutcome {
    let critique = ["critique", "critique_summary"]
        .iter()
        .filter_map(|k| raw.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("Audit complete.")
        .to_string();
    AuditOutcome {
        safety_score: first_score(raw, &SAFETY_KEYS).unwrap_or(DEFAULT_SAFETY_SCORE),
        usability_score: first_score(raw, &USABILITY_KEYS).unwrap_or(DEFAULT_USABILITY_SCORE),
        critique,
    }
}

fn normalize_text(text: &str) -> AuditOutcome {
    match parse_object(text) {
        Some(obj) if SAFETY_KEYS.iter().any(|k| obj.contains_key(*k)) => normalize_fields(&obj),
        _ => {
            tracing::debug!("audit pipeline text carried no usable scores");
            AuditOutcome::fallback("JSON parse fallback")
        }
    }
}

/// The whole text as a JSON object, else the outermost `{...}` span within it.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    let text = text.trim();
    if let Ok(Value::Object(obj)) = serde_json::from_str(text) {
        return Some(obj);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

fn first_score(raw: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(coerce_score)
}

/// Integers pass through, floats and numeric strings truncate toward zero.
fn coerce_score(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(x: f64) -> Option<i64> {
    x.is_finite().then(|| x.trunc() as i64)
}
