//! Engine configuration.

use std::path::PathBuf;

pub const DEFAULT_LOG_PATH: &str = "audit_log.jsonl";
pub const DEFAULT_RECENT_MAX: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// JSONL file written by the service.
    pub log_path: PathBuf,
    /// Capacity of the recent-event ring; oldest records are evicted first.
    pub recent_max: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            recent_max: DEFAULT_RECENT_MAX,
        }
    }
}

impl EngineConfig {
    pub fn new(log_path: impl Into<PathBuf>, recent_max: usize) -> Self {
        Self {
            log_path: log_path.into(),
            recent_max,
        }
    }

    /// Read `AUDIT_LOG_PATH` and `AUDIT_RECENT_MAX`; unset or invalid values use the defaults.
    pub fn from_env() -> Self {
        let log_path = std::env::var("AUDIT_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH));
        let recent_max = std::env::var("AUDIT_RECENT_MAX")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_RECENT_MAX);
        Self {
            log_path,
            recent_max,
        }
    }
}
