//! Record Store Port (Driven Port)
//!
//! Interface for the per-instrument record store.

use async_trait::async_trait;

use crate::domain::message::InstrumentId;
use crate::domain::record::{StoredRecord, UpdateMutation};

/// Acknowledgment of an applied update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAck {
    /// Record that was written.
    pub instrument: InstrumentId,
    /// Whether this update created the record.
    pub created: bool,
    /// Number of attributes set.
    pub attributes_written: usize,
}

/// Record store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The update's write condition did not hold.
    #[error("conditional check failed for instrument {instrument}: {condition}")]
    ConditionalCheckFailed {
        /// Record the update targeted.
        instrument: InstrumentId,
        /// The condition that was evaluated.
        condition: String,
    },

    /// The store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// Any other store-side failure.
    #[error("record store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether this is a benign write-condition conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConditionalCheckFailed { .. })
    }
}

/// Port for the keyed record store.
///
/// Implementations must apply each `upsert` atomically per key; this is the
/// only concurrency primitive the pipeline relies on.
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Apply a partial update to the record for `key`, creating the record
    /// if it does not exist yet. Attributes not named by the mutation are
    /// left untouched.
    ///
    /// When the mutation carries a condition that does not hold, returns
    /// `StoreError::ConditionalCheckFailed` and writes nothing.
    async fn upsert(
        &self,
        key: InstrumentId,
        mutation: &UpdateMutation,
    ) -> Result<UpdateAck, StoreError>;

    /// Read every record with strong consistency.
    async fn scan_all(&self) -> Result<Vec<StoredRecord>, StoreError>;
}
