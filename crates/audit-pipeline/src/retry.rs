//! The external audit pipeline and its single-retry policy.

use crate::PipelineOutput;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("pipeline error: {0}")]
    Other(String),
}

impl PipelineError {
    /// Explicit rate limits, or provider messages that look like one.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            PipelineError::RateLimited(_) => true,
            PipelineError::Other(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("ratelimit") || lower.contains("rate_limit") || lower.contains("429")
            }
        }
    }
}

/// Multi-step scoring pipeline run over redacted text.
#[async_trait]
pub trait AuditPipeline: Send + Sync {
    async fn run(&self, redacted_text: &str) -> Result<PipelineOutput, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the single retry after a rate limit.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(16),
        }
    }
}

/// Run once; on a rate limit wait `policy.backoff` and run exactly one more time.
pub async fn run_with_retry(
    pipeline: &dyn AuditPipeline,
    redacted_text: &str,
    policy: &RetryPolicy,
) -> Result<PipelineOutput, PipelineError> {
    match pipeline.run(redacted_text).await {
        Err(e) if e.is_rate_limit() => {
            tracing::warn!(error = %e, backoff_ms = policy.backoff.as_millis() as u64, "audit pipeline rate limited, retrying once");
            tokio::time::sleep(policy.backoff).await;
            pipeline.run(redacted_text).await
        }
        other => other,
    }
}
