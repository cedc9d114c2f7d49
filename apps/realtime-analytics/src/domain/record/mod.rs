//! Instrument Records
//!
//! Partial-update mutations against a single instrument record, and the
//! read-side projection of stored records.

use indexmap::IndexMap;

use crate::domain::message::WireValue;

/// Partial-update expression building.
pub mod mutation;

/// Stored record to JSON conversion.
pub mod projection;

pub use mutation::{MutationError, SequenceGuard, UpdateMutation};
pub use projection::{ProjectedRecord, ProjectionError, project_record};

/// A persisted record: attribute name to tagged value, including the
/// `instrument` key attribute.
pub type StoredRecord = IndexMap<String, WireValue>;
