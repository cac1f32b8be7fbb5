//! Audit analytics REST API server.

use audit_analytics::{EngineConfig, LogAggregator};
use audit_api::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        log_path = %config.log_path.display(),
        recent_max = config.recent_max,
        "audit analytics configured"
    );
    let state = Arc::new(AppState {
        analytics: Arc::new(LogAggregator::new(config)),
    });

    let app = server::router(state);
    let addr: SocketAddr = std::env::var("AUDIT_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()?;
    tracing::info!("audit analytics API listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
