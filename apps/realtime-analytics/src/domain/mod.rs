//! Domain Layer - Market data messages and instrument records.
//!
//! Pure transformation logic with no I/O: decoding and parsing wire
//! messages, building partial-update mutations, and projecting stored
//! records for consumers.

/// Wire message decoding, extraction and value types.
pub mod message;

/// Record mutations and read-side projection.
pub mod record;
