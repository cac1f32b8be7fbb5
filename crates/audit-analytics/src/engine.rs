//! Aggregation engine: fingerprint check, full rebuild, cached serving.

use crate::query::{recent_events, summary_stats, timeline};
use crate::{EngineConfig, Snapshot};
use async_trait::async_trait;
use audit_types::{
    AnalyticsError, AuditAnalytics, EngineState, EntityDistribution, EventRecord, SummaryStats,
    TimelineBucket,
};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;

/// Cheap proxy for "has the file changed": size plus modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Absent,
    Present {
        len: u64,
        modified: Option<SystemTime>,
    },
}

impl Fingerprint {
    /// Stat `path`. A missing file is `Absent`; any other failure is an error.
    pub async fn of(path: &Path) -> Result<Self, AnalyticsError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(Fingerprint::Present {
                len: meta.len(),
                modified: meta.modified().ok(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fingerprint::Absent),
            Err(e) => Err(e.into()),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        match self {
            Fingerprint::Absent => 0,
            Fingerprint::Present { len, .. } => *len,
        }
    }
}

struct Inner {
    /// `None` until the first successful check (Cold), and again after a failed rebuild.
    fingerprint: Option<Fingerprint>,
    snapshot: Arc<Snapshot>,
    rebuilds: u64,
}

/// Owns the cached snapshot for one log file.
///
/// Every query runs "check fingerprint, rebuild if changed, take the snapshot"
/// inside one critical section, so readers never see a half-built aggregate and
/// concurrent stale detections rebuild once.
pub struct LogAggregator {
    config: EngineConfig,
    inner: Mutex<Inner>,
}

impl LogAggregator {
    pub fn new(config: EngineConfig) -> Self {
        let snapshot = Arc::new(Snapshot::empty(config.recent_max));
        Self {
            config,
            inner: Mutex::new(Inner {
                fingerprint: None,
                snapshot,
                rebuilds: 0,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current snapshot, rebuilding first if the file changed.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        let mut inner = self.inner.lock().await;
        let path = self.config.log_path.as_path();
        match Fingerprint::of(path).await {
            Ok(fp) if inner.fingerprint == Some(fp) => {
                tracing::debug!(path = %path.display(), "audit log unchanged, serving cached snapshot");
            }
            Ok(Fingerprint::Absent) => {
                if inner.fingerprint.is_some() {
                    tracing::info!(path = %path.display(), "audit log missing, serving empty aggregate");
                }
                inner.snapshot = Arc::new(Snapshot::empty(self.config.recent_max));
                inner.fingerprint = Some(Fingerprint::Absent);
            }
            Ok(fp) => match self.rebuild(path).await {
                Ok(snapshot) => {
                    inner.snapshot = Arc::new(snapshot);
                    inner.fingerprint = Some(fp);
                    inner.rebuilds += 1;
                }
                Err(e) => self.degrade(&mut inner, path, &e),
            },
            Err(e) => self.degrade(&mut inner, path, &e),
        }
        Arc::clone(&inner.snapshot)
    }

    /// Number of full rebuilds performed so far.
    pub async fn rebuild_count(&self) -> u64 {
        self.inner.lock().await.rebuilds
    }

    async fn rebuild(&self, path: &Path) -> Result<Snapshot, AnalyticsError> {
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let snapshot = Snapshot::from_text(&text, self.config.recent_max);
        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            decoded = snapshot.totals.events(),
            skipped = snapshot.skipped,
            "rebuilt audit log aggregate"
        );
        Ok(snapshot)
    }

    /// Serve an empty aggregate and forget the fingerprint so the next query retries.
    fn degrade(&self, inner: &mut Inner, path: &Path, err: &AnalyticsError) {
        tracing::warn!(path = %path.display(), error = %err, "audit log unreadable, serving empty aggregate");
        inner.snapshot = Arc::new(Snapshot::empty(self.config.recent_max));
        inner.fingerprint = None;
    }
}

#[async_trait]
impl AuditAnalytics for LogAggregator {
    async fn get_recent(&self, limit: usize) -> Vec<EventRecord> {
        let snapshot = self.snapshot().await;
        recent_events(&snapshot, limit)
    }

    async fn get_entity_distribution(&self) -> EntityDistribution {
        self.snapshot().await.entity_counts.clone()
    }

    async fn get_timeline(&self, hours: u32) -> Vec<TimelineBucket> {
        let snapshot = self.snapshot().await;
        timeline(&snapshot, hours, Utc::now())
    }

    async fn get_summary_stats(&self) -> SummaryStats {
        let snapshot = self.snapshot().await;
        summary_stats(&snapshot)
    }

    async fn state(&self) -> EngineState {
        let inner = self.inner.lock().await;
        let Some(stored) = inner.fingerprint else {
            return EngineState::Cold;
        };
        match Fingerprint::of(&self.config.log_path).await {
            Ok(current) if current == stored => EngineState::Fresh,
            _ => EngineState::Stale,
        }
    }

    async fn log_size_bytes(&self) -> u64 {
        Fingerprint::of(&self.config.log_path)
            .await
            .map(|fp| fp.size_bytes())
            .unwrap_or(0)
    }
}
