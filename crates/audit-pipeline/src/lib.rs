//! Write side of the audit log and the contract for the external audit pipeline.
//!
//! The pipeline's output is retried once on rate limiting and normalized before
//! it is logged, so the analytics engine never sees ambiguous scores.

mod normalize;
mod retry;
mod writer;

pub use normalize::{normalize_fields, normalize_output, AuditOutcome, PipelineOutput};
pub use retry::{run_with_retry, AuditPipeline, PipelineError, RetryPolicy};
pub use writer::{AuditLogWriter, LogWriteError, RequestContext};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("log write: {0}")]
    Log(#[from] LogWriteError),
}

/// Run the pipeline (retrying once on rate limit), normalize its result and
/// append an `audit_event` line.
pub async fn audit_and_log(
    pipeline: &dyn AuditPipeline,
    writer: &AuditLogWriter,
    redacted_text: &str,
    ctx: &RequestContext,
    policy: &RetryPolicy,
) -> Result<AuditOutcome, AuditError> {
    let output = run_with_retry(pipeline, redacted_text, policy).await?;
    let outcome = normalize_output(&output);
    writer.log_audit(ctx, &outcome).await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;

    struct Fixed(&'static str);

    #[async_trait]
    impl AuditPipeline for Fixed {
        async fn run(&self, _redacted_text: &str) -> Result<PipelineOutput, PipelineError> {
            Ok(PipelineOutput::Text(self.0.to_string()))
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl AuditPipeline for AlwaysFails {
        async fn run(&self, _redacted_text: &str) -> Result<PipelineOutput, PipelineError> {
            Err(PipelineError::Other("provider down".into()))
        }
    }

    #[tokio::test]
    async fn audit_is_normalized_then_logged() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AuditLogWriter::new(dir.path().join("audit_log.jsonl"));
        let pipeline = Fixed("Here you go: {\"safetyscore\": 64.9, \"critique\": \"names still guessable\"}");
        let policy = RetryPolicy {
            backoff: Duration::from_millis(1),
        };

        let outcome = audit_and_log(&pipeline, &writer, "[REDACTED]", &RequestContext::default(), &policy)
            .await
            .unwrap();
        assert_eq!(outcome.safety_score, 64);
        assert_eq!(outcome.usability_score, 80);

        let text = std::fs::read_to_string(writer.path()).unwrap();
        let line: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(line["action"], "audit_event");
        assert_eq!(line["safety_score"], 64);
        assert_eq!(line["critique_summary"], "names still guessable...");
    }

    #[tokio::test]
    async fn failed_pipeline_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AuditLogWriter::new(dir.path().join("audit_log.jsonl"));
        let res = audit_and_log(
            &AlwaysFails,
            &writer,
            "text",
            &RequestContext::default(),
            &RetryPolicy::default(),
        )
        .await;
        assert!(matches!(res, Err(AuditError::Pipeline(_))));
        assert!(!writer.path().exists());
    }
}
