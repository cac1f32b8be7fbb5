//! Axum server and routes.

use audit_types::{
    AuditAnalytics, BaseResponse, DistributionData, DistributionResponse, EventsData,
    EventsResponse, HealthData, HealthResponse, StatsResponse, TimelineData, TimelineResponse,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const DEFAULT_EVENTS_LIMIT: usize = 200;
pub const MAX_EVENTS_LIMIT: usize = 500;
pub const DEFAULT_TIMELINE_HOURS: u32 = 24;
pub const MAX_TIMELINE_HOURS: u32 = 168;

pub struct AppState {
    pub analytics: Arc<dyn AuditAnalytics + Send + Sync>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stats", get(handle_stats))
        .route("/events", get(handle_events))
        .route("/pii-distribution", get(handle_distribution))
        .route("/timeline", get(handle_timeline))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parse a query value and clamp it into `1..=max`; unparsable or missing values use `default`.
fn clamp_param(raw: Option<&str>, default: i64, max: i64) -> i64 {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(v)) => v.clamp(1, max),
        _ => default,
    }
}

async fn handle_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(BaseResponse::ok(state.analytics.get_summary_stats().await))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub limit: Option<String>,
}

async fn handle_events(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let limit = clamp_param(
        q.limit.as_deref(),
        DEFAULT_EVENTS_LIMIT as i64,
        MAX_EVENTS_LIMIT as i64,
    ) as usize;
    let events = state.analytics.get_recent(limit).await;
    Json(BaseResponse::ok(EventsData { events }))
}

async fn handle_distribution(State(state): State<Arc<AppState>>) -> Json<DistributionResponse> {
    let totals = state.analytics.get_entity_distribution().await;
    Json(BaseResponse::ok(DistributionData { totals }))
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub hours: Option<String>,
}

async fn handle_timeline(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TimelineQuery>,
) -> Json<TimelineResponse> {
    let hours = clamp_param(
        q.hours.as_deref(),
        i64::from(DEFAULT_TIMELINE_HOURS),
        i64::from(MAX_TIMELINE_HOURS),
    ) as u32;
    let buckets = state.analytics.get_timeline(hours).await;
    Json(BaseResponse::ok(TimelineData { hours, buckets }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(BaseResponse::ok(HealthData {
        status: "Audit analytics active".to_string(),
        log_size_bytes: state.analytics.log_size_bytes().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped_or_defaulted() {
        assert_eq!(clamp_param(None, 200, 500), 200);
        assert_eq!(clamp_param(Some("abc"), 200, 500), 200);
        assert_eq!(clamp_param(Some("0"), 200, 500), 1);
        assert_eq!(clamp_param(Some("-5"), 24, 168), 1);
        assert_eq!(clamp_param(Some("9999"), 200, 500), 500);
        assert_eq!(clamp_param(Some(" 12 "), 24, 168), 12);
    }
}
