//! JSONL writer for the audit log. One JSON object per line, appended.

use crate::AuditOutcome;
use audit_types::ActionKind;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const CRITIQUE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum LogWriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Caller details attached to each logged event.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub client_ip: Option<String>,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// The caller's session id, or a fresh v4 UUID.
    pub fn session_id_or_new(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    fn caller_fields(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("client_ip".into(), json!(self.client_ip));
        m.insert("session_id".into(), json!(self.session_id_or_new()));
        m.insert(
            "user_agent".into(),
            json!(self.user_agent.as_deref().unwrap_or("unknown")),
        );
        m
    }
}

pub struct AuditLogWriter {
    path: PathBuf,
    append_lock: tokio::sync::Mutex<()>,
}

impl AuditLogWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `{timestamp, action, ...details}` as one line.
    pub async fn append(&self, action: &str, details: Map<String, Value>) -> Result<(), LogWriteError> {
        let mut entry = Map::new();
        entry.insert(
            "timestamp".into(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        entry.insert("action".into(), json!(action));
        entry.extend(details);
        let mut line = serde_json::to_string(&Value::Object(entry))?;
        line.push('\n');

        let _guard = self.append_lock.lock().await;
        let mut f = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        f.write_all(line.as_bytes()).await?;
        f.flush().await?;
        Ok(())
    }

    pub async fn log_redaction(
        &self,
        ctx: &RequestContext,
        mode: &str,
        entities: &[String],
        processing_time_ms: f64,
    ) -> Result<(), LogWriteError> {
        let mut details = ctx.caller_fields();
        details.insert("mode_used".into(), json!(mode));
        details.insert(
            "processing_time_ms".into(),
            json!((processing_time_ms * 100.0).round() / 100.0),
        );
        details.insert("entities_detected".into(), json!(entities));
        details.insert("entity_count".into(), json!(entities.len()));
        self.append(ActionKind::REDACTION, details).await
    }

    pub async fn log_audit(&self, ctx: &RequestContext, outcome: &AuditOutcome) -> Result<(), LogWriteError> {
        let mut details = ctx.caller_fields();
        details.insert("safety_score".into(), json!(outcome.safety_score));
        details.insert("usability_score".into(), json!(outcome.usability_score));
        details.insert(
            "critique_summary".into(),
            json!(critique_preview(&outcome.critique)),
        );
        self.append(ActionKind::AUDIT, details).await
    }

    pub async fn log_chat_proxy(
        &self,
        ctx: &RequestContext,
        mode: &str,
        original_len: usize,
        entities: &[String],
    ) -> Result<(), LogWriteError> {
        let mut details = Map::new();
        details.insert("client_ip".into(), json!(ctx.client_ip));
        details.insert("mode".into(), json!(mode));
        details.insert("original_len".into(), json!(original_len));
        details.insert("entities_hidden".into(), json!(entities));
        self.append(ActionKind::CHAT_PROXY, details).await
    }
}

/// First 50 characters followed by `...`; `None` for an empty critique.
fn critique_preview(critique: &str) -> Option<String> {
    if critique.is_empty() {
        return None;
    }
    let head: String = critique.chars().take(CRITIQUE_PREVIEW_CHARS).collect();
    Some(format!("{head}..."))
}
