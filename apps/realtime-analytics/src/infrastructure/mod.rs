//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer, plus the process-level plumbing.

/// Configuration loading.
pub mod config;

/// HTTP adapters for the ingestion and query triggers.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Record store adapters.
pub mod persistence;

/// Logging and OpenTelemetry tracing integration.
pub mod telemetry;
