//! Query trait for the analytics engine and error types.

use crate::{EntityDistribution, EventRecord, SummaryStats, TimelineBucket};
use async_trait::async_trait;

/// Where the cached aggregate stands relative to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing has been computed yet.
    Cold,
    /// Cached aggregate matches the file on disk.
    Fresh,
    /// File changed since the aggregate was computed.
    Stale,
}

/// Read-only analytics over the audit log.
///
/// Contract: every query first refreshes the aggregate if the log changed, and
/// degrades to empty/zeroed results on I/O failure instead of returning an error.
#[async_trait]
pub trait AuditAnalytics: Send + Sync {
    /// Up to `limit` most recent events, newest first.
    async fn get_recent(&self, limit: usize) -> Vec<EventRecord>;

    /// Entity label counts over the whole log.
    async fn get_entity_distribution(&self) -> EntityDistribution;

    /// Exactly `hours` hourly buckets ending now, oldest first (capped at one year of hours).
    async fn get_timeline(&self, hours: u32) -> Vec<TimelineBucket>;

    /// Totals, rounded averages and risk-tier counts.
    async fn get_summary_stats(&self) -> SummaryStats;

    /// Current state without triggering a rebuild.
    async fn state(&self) -> EngineState;

    /// Size of the log file in bytes, 0 when it does not exist.
    async fn log_size_bytes(&self) -> u64;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("analytics error: {0}")]
    Other(String),
}
