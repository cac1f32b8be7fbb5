//! Read-only queries over a snapshot. The engine supplies the snapshot and the clock.

use crate::Snapshot;
use audit_types::{ActionKind, EventRecord, SummaryStats, TimelineBucket};
use chrono::{DateTime, Duration, DurationRound, Utc};
use std::collections::BTreeMap;

/// Up to `limit` retained records, newest timestamp first; later lines win ties.
pub fn recent_events(snapshot: &Snapshot, limit: usize) -> Vec<EventRecord> {
    let mut items: Vec<&EventRecord> = snapshot.recent.iter().collect();
    items.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.seq.cmp(&a.seq))
    });
    items.into_iter().take(limit).cloned().collect()
}

/// Upper bound on timeline buckets (one leap year of hours).
pub const MAX_TIMELINE_HOURS: u32 = 24 * 366;

/// `hours` hourly buckets for the window `[now - hours, now]`, oldest first.
/// `hours` is capped at `MAX_TIMELINE_HOURS`.
///
/// Only redaction events in the retained window contribute; detected and
/// redacted both grow by the event's entity count.
pub fn timeline(snapshot: &Snapshot, hours: u32, now: DateTime<Utc>) -> Vec<TimelineBucket> {
    let hours = hours.min(MAX_TIMELINE_HOURS);
    let Some(start) = now.checked_sub_signed(Duration::hours(i64::from(hours))) else {
        return Vec::new();
    };
    let mut buckets: BTreeMap<DateTime<Utc>, TimelineBucket> = (0..hours)
        .map(|i| hour_floor(start + Duration::hours(i64::from(i))))
        .map(|key| (key, TimelineBucket::empty(key)))
        .collect();

    for record in &snapshot.recent {
        if record.action != ActionKind::Redaction {
            continue;
        }
        if record.timestamp < start || record.timestamp > now {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&hour_floor(record.timestamp)) {
            let n = record.entities.len() as u64;
            bucket.detected += n;
            bucket.redacted += n;
        }
    }
    buckets.into_values().collect()
}

pub fn summary_stats(snapshot: &Snapshot) -> SummaryStats {
    let totals = snapshot.totals;
    let sev = snapshot.severities;
    SummaryStats {
        total_redactions: totals.redactions,
        total_audits: totals.audits,
        total_chat_proxy: totals.chat_proxy,
        total_other: totals.other,
        total_events: totals.events(),
        avg_processing_time_ms: rounded_mean(&snapshot.processing_times),
        avg_safety_score: rounded_mean(&snapshot.safety_scores),
        avg_usability_score: rounded_mean(&snapshot.usability_scores),
        high_risk_count: sev.high,
        medium_risk_count: sev.medium,
        low_risk_count: sev.low,
        info_count: sev.info,
        entity_breakdown: snapshot.entity_counts.clone(),
    }
}

fn hour_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::hours(1)).unwrap_or(t)
}

/// Mean rounded to two decimals; 0.0 for no samples.
fn rounded_mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (mean * 100.0).round() / 100.0
}
