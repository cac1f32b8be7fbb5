//! Event record model: one decoded log line plus its derived fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse risk classification attached to every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event kinds the service writes. Anything else is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Redaction,
    Audit,
    ChatProxy,
    Other(String),
}

impl ActionKind {
    pub const REDACTION: &'static str = "redaction_event";
    pub const AUDIT: &'static str = "audit_event";
    pub const CHAT_PROXY: &'static str = "chat_proxy_event";

    pub fn parse(tag: &str) -> Self {
        match tag {
            Self::REDACTION => ActionKind::Redaction,
            Self::AUDIT => ActionKind::Audit,
            Self::CHAT_PROXY => ActionKind::ChatProxy,
            other => ActionKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Redaction => Self::REDACTION,
            ActionKind::Audit => Self::AUDIT,
            ActionKind::ChatProxy => Self::CHAT_PROXY,
            ActionKind::Other(tag) => tag,
        }
    }

    /// True for the three kinds the service itself emits.
    pub fn is_known(&self) -> bool {
        !matches!(self, ActionKind::Other(_))
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ActionKind::parse(&tag))
    }
}

/// One decoded and enriched log entry. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position of the source line in the file (0-based, counts every line).
    #[serde(skip)]
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub action: ActionKind,
    pub severity: Severity,
    pub entities: Vec<String>,
    pub processing_time_ms: Option<f64>,
    pub safety_score: Option<f64>,
    pub usability_score: Option<f64>,
    pub message: String,
}
