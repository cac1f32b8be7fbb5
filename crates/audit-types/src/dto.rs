//! Query results and response envelopes.

use crate::EventRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity label -> occurrence count, ordered by label.
pub type EntityDistribution = BTreeMap<String, u64>;

/// One hourly bucket of the redaction timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBucket {
    /// Top of the hour this bucket covers.
    pub time: DateTime<Utc>,
    pub detected: u64,
    pub redacted: u64,
}

impl TimelineBucket {
    pub fn empty(time: DateTime<Utc>) -> Self {
        Self {
            time,
            detected: 0,
            redacted: 0,
        }
    }
}

/// Totals, averages and risk-tier counts over the whole log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_redactions: u64,
    pub total_audits: u64,
    pub total_chat_proxy: u64,
    pub total_other: u64,
    pub total_events: u64,
    pub avg_processing_time_ms: f64,
    pub avg_safety_score: f64,
    pub avg_usability_score: f64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
    pub info_count: u64,
    #[serde(default)]
    pub entity_breakdown: EntityDistribution,
}

/// Base response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

fn default_code() -> i32 {
    200
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsData {
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionData {
    pub totals: EntityDistribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineData {
    pub hours: u32,
    pub buckets: Vec<TimelineBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub log_size_bytes: u64,
}

pub type EventsResponse = BaseResponse<EventsData>;
pub type DistributionResponse = BaseResponse<DistributionData>;
pub type TimelineResponse = BaseResponse<TimelineData>;
pub type StatsResponse = BaseResponse<SummaryStats>;
pub type HealthResponse = BaseResponse<HealthData>;
