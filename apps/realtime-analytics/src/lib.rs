#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Realtime Analytics - Market Data Record Store
//!
//! Ingests batches of base64-encoded, pipe-delimited market data messages,
//! applies each as a partial update to a per-instrument record, and serves
//! the current records back as typed JSON.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure message and record transformations
//!   - `message`: payload decoding, field extraction, typed values
//!   - `record`: update mutations, sequence guard, read projection
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: record store contract
//!   - `services`: upsert execution and failure classification
//!   - `use_cases`: batch ingestion, record projection
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `persistence`: in-memory record store
//!   - `http`: ingestion and query triggers, health, metrics
//!   - `config`: configuration from environment
//!   - `telemetry`, `metrics`: tracing and Prometheus instrumentation
//!
//! # Data Flow
//!
//! ```text
//! POST /ingest ──► decode ──► extract ──► build mutation ──► upsert ──┐
//!                                                                     ▼
//! GET /items   ◄── project ◄────────────── scan ◄──────────── record store
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Message and record transformations with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::message::{
    AttributeMap, DecodeError, ExtractedMessage, InstrumentId, MessageDecoder, ParseError,
    TypedValue, WireValue, extract,
};
pub use domain::record::{
    MutationError, ProjectedRecord, ProjectionError, SequenceGuard, StoredRecord, UpdateMutation,
    project_record,
};

// Ports and use cases
pub use application::ports::{RecordStorePort, StoreError, UpdateAck};
pub use application::use_cases::{
    BatchSummary, IngestBatchUseCase, IngestError, MessageError, ProjectRecordsUseCase,
    QueryError, SkippedMessage,
};

// Infrastructure config
pub use infrastructure::config::{AnalyticsConfig, ConfigError, ServerSettings};

// HTTP adapter
pub use infrastructure::http::{AppState, HttpServer, HttpServerError, StreamBatch, create_router};

// Record store
pub use infrastructure::persistence::InMemoryRecordStore;

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
