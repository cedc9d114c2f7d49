//! Realtime Analytics Binary
//!
//! Starts the ingestion and query HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin realtime-analytics
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `ANALYTICS_TABLE`: Record store table name
//!
//! ## Optional
//! - `ANALYTICS_HTTP_PORT`: HTTP port (default: 8080)
//! - `ANALYTICS_ENFORCE_SEQUENCE`: Reject updates with a stale `seq` (default: false)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4318>)
//! - `OTEL_SERVICE_NAME`: Service name (default: realtime-analytics)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use realtime_analytics::infrastructure::telemetry;
use realtime_analytics::{
    AnalyticsConfig, AppState, HttpServer, InMemoryRecordStore, create_router, init_metrics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    // Initialize telemetry (tracing + optional OpenTelemetry)
    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting realtime analytics");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = AnalyticsConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let store = Arc::new(InMemoryRecordStore::new(config.table_name.clone()));
    let router = create_router(AppState::new(store, config.enforce_sequence));
    let http_server = HttpServer::new(config.server.http_port, router, shutdown_token.clone());

    let mut server = tokio::spawn(http_server.run());

    tracing::info!("Realtime analytics ready");

    tokio::select! {
        result = &mut server => {
            // Server exited before any shutdown signal (bind failure).
            result??;
            return Ok(());
        }
        () = await_shutdown(shutdown_token) => {}
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(result) => result??,
        Err(_) => tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "HTTP server did not drain before timeout"
        ),
    }

    tracing::info!("Realtime analytics stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &AnalyticsConfig) {
    tracing::info!(
        table = %config.table_name,
        http_port = config.server.http_port,
        enforce_sequence = config.enforce_sequence,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
