//! Application Use Cases
//!
//! - `IngestBatchUseCase`: apply a batch of encoded messages to the store
//! - `ProjectRecordsUseCase`: read every record back as typed JSON

mod ingest_batch;
mod project_records;

pub use ingest_batch::{
    BatchSummary, IngestBatchUseCase, IngestError, MessageError, SkippedMessage,
};
pub use project_records::{ProjectRecordsUseCase, QueryError};
