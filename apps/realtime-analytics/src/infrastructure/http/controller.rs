//! HTTP Controller
//!
//! Axum handlers that delegate to the application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::application::ports::RecordStorePort;
use crate::application::use_cases::{IngestBatchUseCase, IngestError, ProjectRecordsUseCase};
use crate::infrastructure::metrics::get_metrics_handle;

use super::request::StreamBatch;
use super::response::{ErrorResponse, query_cors_headers};

// =============================================================================
// Application State
// =============================================================================

/// Application state shared across handlers.
pub struct AppState<S>
where
    S: RecordStorePort,
{
    /// Use case for ingesting stream batches.
    pub ingest: Arc<IngestBatchUseCase<S>>,
    /// Use case for reading all records.
    pub query: Arc<ProjectRecordsUseCase<S>>,
}

impl<S> AppState<S>
where
    S: RecordStorePort,
{
    /// Build both use cases over one store.
    #[must_use]
    pub fn new(store: Arc<S>, enforce_sequence: bool) -> Self {
        Self {
            ingest: Arc::new(IngestBatchUseCase::new(
                Arc::clone(&store),
                enforce_sequence,
            )),
            query: Arc::new(ProjectRecordsUseCase::new(store)),
        }
    }
}

impl<S> Clone for AppState<S>
where
    S: RecordStorePort,
{
    fn clone(&self) -> Self {
        Self {
            ingest: Arc::clone(&self.ingest),
            query: Arc::clone(&self.query),
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create the HTTP router with all endpoints.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: RecordStorePort + 'static,
{
    Router::new()
        .route("/ingest", post(ingest_batch::<S>))
        .route("/items", get(list_items::<S>))
        .route("/healthz", get(liveness_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn ingest_batch<S>(
    State(state): State<AppState<S>>,
    Json(batch): Json<StreamBatch>,
) -> Response
where
    S: RecordStorePort,
{
    let payloads = batch.payloads();

    match state.ingest.execute(&payloads).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Batch aborted");
            let IngestError::Store { index, .. } = &e;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e).at_index(*index)),
            )
                .into_response()
        }
    }
}

async fn list_items<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStorePort,
{
    match state.query.execute().await {
        Ok(records) => (StatusCode::OK, query_cors_headers(), Json(records)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Record query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                query_cors_headers(),
                Json(ErrorResponse::new(&e)),
            )
                .into_response()
        }
    }
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            let body = handle.render();
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                body,
            )
        },
    )
}
