//! Aggregation snapshot: the complete derived state for one read of the log.

use audit_ingest::ingest_line;
use audit_types::{ActionKind, EntityDistribution, EventRecord, Severity};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub redactions: u64,
    pub audits: u64,
    pub chat_proxy: u64,
    pub other: u64,
}

impl Totals {
    pub fn events(&self) -> u64 {
        self.redactions + self.audits + self.chat_proxy + self.other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub info: u64,
}

impl SeverityCounts {
    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Built from scratch on every detected change and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    recent_max: usize,
    /// Insertion (file) order, oldest first.
    pub recent: VecDeque<EventRecord>,
    pub entity_counts: EntityDistribution,
    pub processing_times: Vec<f64>,
    pub safety_scores: Vec<f64>,
    pub usability_scores: Vec<f64>,
    pub totals: Totals,
    pub severities: SeverityCounts,
    /// Non-blank lines that did not decode.
    pub skipped: u64,
}

impl Snapshot {
    pub fn empty(recent_max: usize) -> Self {
        Self {
            recent_max,
            recent: VecDeque::with_capacity(recent_max.min(1024)),
            entity_counts: EntityDistribution::new(),
            processing_times: Vec::new(),
            safety_scores: Vec::new(),
            usability_scores: Vec::new(),
            totals: Totals::default(),
            severities: SeverityCounts::default(),
            skipped: 0,
        }
    }

    /// Decode every line of `text` and fold the records in file order.
    pub fn from_text(text: &str, recent_max: usize) -> Self {
        let mut snapshot = Self::empty(recent_max);
        for (seq, raw) in text.lines().enumerate() {
            match ingest_line(raw, seq as u64) {
                Some(record) => snapshot.fold(record),
                None if !raw.trim().is_empty() => snapshot.skipped += 1,
                None => {}
            }
        }
        snapshot
    }

    pub fn recent_max(&self) -> usize {
        self.recent_max
    }

    fn fold(&mut self, record: EventRecord) {
        match record.action {
            ActionKind::Redaction => {
                self.totals.redactions += 1;
                if let Some(pt) = record.processing_time_ms {
                    self.processing_times.push(pt);
                }
            }
            ActionKind::Audit => {
                self.totals.audits += 1;
                if let Some(s) = record.safety_score {
                    self.safety_scores.push(s);
                }
                if let Some(u) = record.usability_score {
                    self.usability_scores.push(u);
                }
            }
            ActionKind::ChatProxy => self.totals.chat_proxy += 1,
            ActionKind::Other(_) => self.totals.other += 1,
        }

        for entity in &record.entities {
            *self.entity_counts.entry(entity.clone()).or_insert(0) += 1;
        }
        self.severities.bump(record.severity);

        if self.recent_max == 0 {
            return;
        }
        if self.recent.len() == self.recent_max {
            self.recent.pop_front();
        }
        self.recent.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDACTION: &str = r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event","mode_used":"mask","entity_count":2,"entities_detected":["EMAIL","PHONE"],"processing_time_ms":12.5}"#;
    const AUDIT: &str = r#"{"timestamp":"2024-01-01T00:05:00","action":"audit_event","safety_score":60,"usability_score":85}"#;

    #[test]
    fn counters_add_up_to_decoded_lines() {
        let text = [
            REDACTION,
            AUDIT,
            r#"{"timestamp":"2024-01-01T00:06:00","action":"chat_proxy_event","mode":"mask","entities_hidden":["API_KEY"]}"#,
            r#"{"timestamp":"2024-01-01T00:07:00","action":"user_login"}"#,
            "garbage",
            "",
            "[]",
        ]
        .join("\n");
        let snap = Snapshot::from_text(&text, 10);
        assert_eq!(snap.totals.redactions, 1);
        assert_eq!(snap.totals.audits, 1);
        assert_eq!(snap.totals.chat_proxy, 1);
        assert_eq!(snap.totals.other, 1);
        assert_eq!(snap.totals.events(), 4);
        assert_eq!(snap.skipped, 2);
        assert_eq!(snap.recent.len(), 4);
        assert_eq!(
            snap.severities,
            SeverityCounts {
                high: 2,
                medium: 0,
                low: 1,
                info: 1
            }
        );
        assert_eq!(snap.entity_counts.get("API_KEY"), Some(&1));
        assert_eq!(snap.entity_counts.get("EMAIL"), Some(&1));
    }

    #[test]
    fn malformed_line_between_valid_lines_is_invisible() {
        let clean = Snapshot::from_text(&format!("{REDACTION}\n{REDACTION}\n"), 10);
        let noisy = Snapshot::from_text(&format!("{REDACTION}\n{{\"timestamp\": oops\n{REDACTION}\n"), 10);
        assert_eq!(clean.totals, noisy.totals);
        assert_eq!(clean.entity_counts, noisy.entity_counts);
        assert_eq!(clean.processing_times, noisy.processing_times);
        assert_eq!(noisy.skipped, 1);
    }

    #[test]
    fn recent_ring_evicts_oldest_but_counts_everything() {
        let text: Vec<String> = (0..8)
            .map(|i| {
                format!(
                    r#"{{"timestamp":"2024-01-01T00:0{i}:00","action":"redaction_event","mode_used":"mask","entity_count":1,"entities_detected":["EMAIL"]}}"#
                )
            })
            .collect();
        let snap = Snapshot::from_text(&text.join("\n"), 3);
        assert_eq!(snap.recent.len(), 3);
        assert_eq!(snap.recent.front().map(|r| r.seq), Some(5));
        assert_eq!(snap.totals.redactions, 8);
        assert_eq!(snap.entity_counts.get("EMAIL"), Some(&8));
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let snap = Snapshot::from_text(REDACTION, 0);
        assert!(snap.recent.is_empty());
        assert_eq!(snap.totals.redactions, 1);
    }

    #[test]
    fn samples_come_only_from_their_own_action_kind() {
        let text = [
            r#"{"timestamp":"2024-01-01T00:00:00","action":"redaction_event","processing_time_ms":4,"safety_score":99}"#,
            r#"{"timestamp":"2024-01-01T00:00:00","action":"audit_event","processing_time_ms":9,"safety_score":"n/a","usability_score":70}"#,
        ]
        .join("\n");
        let snap = Snapshot::from_text(&text, 10);
        assert_eq!(snap.processing_times, vec![4.0]);
        assert!(snap.safety_scores.is_empty());
        assert_eq!(snap.usability_scores, vec![70.0]);
    }
}
