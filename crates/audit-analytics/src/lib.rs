//! Log aggregation engine: detects log growth, rebuilds the aggregate from raw
//! lines and answers read queries under a single lock.

mod config;
mod engine;
mod query;
mod snapshot;

pub use audit_types::{AuditAnalytics, EngineState};
pub use config::EngineConfig;
pub use engine::{Fingerprint, LogAggregator};
pub use query::{recent_events, summary_stats, timeline, MAX_TIMELINE_HOURS};
pub use snapshot::{SeverityCounts, Snapshot, Totals};
