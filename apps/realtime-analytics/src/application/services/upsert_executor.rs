//! Upsert Executor
//!
//! Applies one mutation to the record store. Write-condition conflicts are
//! benign (a newer message already landed) and are reported as an outcome,
//! not an error; every other store failure is returned to the caller.

use std::sync::Arc;

use crate::application::ports::{RecordStorePort, StoreError, UpdateAck};
use crate::domain::message::InstrumentId;
use crate::domain::record::UpdateMutation;
use crate::infrastructure::metrics;

/// Result of applying a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The store applied the update.
    Applied(UpdateAck),
    /// The store rejected the update's write condition.
    Conflict,
}

/// Applies mutations against a record store.
pub struct UpsertExecutor<S>
where
    S: RecordStorePort,
{
    store: Arc<S>,
}

impl<S> Clone for UpsertExecutor<S>
where
    S: RecordStorePort,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> UpsertExecutor<S>
where
    S: RecordStorePort,
{
    /// Create a new executor.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Apply `mutation` to the record identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns the store error for any failure other than a conditional
    /// check failure.
    pub async fn apply(
        &self,
        key: InstrumentId,
        mutation: &UpdateMutation,
    ) -> Result<UpsertOutcome, StoreError> {
        match self.store.upsert(key, mutation).await {
            Ok(ack) => {
                tracing::debug!(
                    instrument = %key,
                    created = ack.created,
                    attributes = ack.attributes_written,
                    expression = mutation.expression(),
                    "Record updated"
                );
                Ok(UpsertOutcome::Applied(ack))
            }
            Err(e) if e.is_conflict() => {
                metrics::record_conflict();
                tracing::info!(instrument = %key, error = %e, "Ignoring message out of sync");
                Ok(UpsertOutcome::Conflict)
            }
            Err(e) => {
                metrics::record_store_error();
                tracing::error!(instrument = %key, error = %e, "Record update failed");
                Err(e)
            }
        }
    }
}
