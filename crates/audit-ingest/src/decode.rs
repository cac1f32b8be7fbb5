//! Line decoder: one JSON object per line into a typed `LogLine`.
//!
//! All "is this field present and of the right type?" checks live here; nothing
//! downstream looks at raw JSON again.

use crate::{classify, derive_message};
use audit_types::{ActionKind, EventRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Raw field values kept only for rendering the human summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    /// `mode_used` for redactions, `mode` for chat proxy events.
    pub mode: Option<String>,
    pub entity_count: Option<String>,
    pub safety_score: Option<String>,
    pub usability_score: Option<String>,
}

/// A decoded line in the fixed event shape, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub action: ActionKind,
    pub entities: Vec<String>,
    pub processing_time_ms: Option<f64>,
    pub safety_score: Option<f64>,
    pub usability_score: Option<f64>,
    pub raw: RawFields,
}

impl LogLine {
    /// Attach severity and message. `seq` is the line's position in the file.
    pub fn into_record(self, seq: u64) -> EventRecord {
        let severity = classify(&self.action, self.safety_score, &self.entities);
        let message = derive_message(&self);
        EventRecord {
            seq,
            timestamp: self.timestamp,
            action: self.action,
            severity,
            entities: self.entities,
            processing_time_ms: self.processing_time_ms,
            safety_score: self.safety_score,
            usability_score: self.usability_score,
            message,
        }
    }
}

/// Decode one raw line. Returns `None` for blank lines, invalid JSON, non-object
/// values, and objects missing a usable `timestamp` or `action`.
pub fn decode_line(raw: &str) -> Option<LogLine> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(obj)) => decode_object(&obj),
        Ok(_) => None,
        Err(e) => {
            tracing::trace!(error = %e, "skipping malformed log line");
            None
        }
    }
}

/// Map an already-parsed JSON object into a `LogLine`.
pub fn decode_object(obj: &Map<String, Value>) -> Option<LogLine> {
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    let action = match obj.get("action").and_then(Value::as_str) {
        Some(tag) if !tag.is_empty() => ActionKind::parse(tag),
        _ => return None,
    };

    let (entities_key, mode_key) = match action {
        ActionKind::Redaction => (Some("entities_detected"), Some("mode_used")),
        ActionKind::ChatProxy => (Some("entities_hidden"), Some("mode")),
        _ => (None, None),
    };
    let entities = entities_key
        .map(|k| string_list(obj.get(k)))
        .unwrap_or_default();

    let raw = RawFields {
        mode: mode_key.and_then(|k| render(obj.get(k))),
        entity_count: render(obj.get("entity_count")),
        safety_score: render(obj.get("safety_score")),
        usability_score: render(obj.get("usability_score")),
    };

    Some(LogLine {
        timestamp,
        action,
        entities,
        processing_time_ms: number(obj.get("processing_time_ms")),
        safety_score: number(obj.get("safety_score")),
        usability_score: number(obj.get("usability_score")),
        raw,
    })
}

/// Parse an ISO-8601 timestamp into UTC. Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn number(v: Option<&Value>) -> Option<f64> {
    match v {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Strings render unquoted, null renders as absent, everything else as JSON.
fn render(v: Option<&Value>) -> Option<String> {
    match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
