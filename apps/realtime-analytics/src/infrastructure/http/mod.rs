//! HTTP Adapter (Driver Adapter)
//!
//! Axum routes for the ingestion trigger, the query trigger, liveness and
//! Prometheus metrics.
//!
//! # Endpoints
//!
//! - `POST /ingest` - Apply a stream batch of encoded messages
//! - `GET /items` - Every record as typed JSON, with CORS headers
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `GET /metrics` - Prometheus metrics in text format

mod controller;
mod request;
mod response;
mod server;

pub use controller::{AppState, create_router};
pub use request::{StreamBatch, StreamPayload, StreamRecord};
pub use response::{ErrorResponse, query_cors_headers};
pub use server::{HttpServer, HttpServerError};
