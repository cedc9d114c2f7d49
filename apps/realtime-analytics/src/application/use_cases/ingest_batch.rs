//! Ingest Batch Use Case
//!
//! Drives decode → extract → build → upsert for every record of an incoming
//! stream batch.
//!
//! Failure policy:
//! - decode, parse and empty-mutation errors skip that message only
//! - write-condition conflicts are counted and skipped
//! - any other store error aborts the rest of the batch so the trigger can
//!   retry it

use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{RecordStorePort, StoreError};
use crate::application::services::{UpsertExecutor, UpsertOutcome};
use crate::domain::message::{
    DecodeError, ExtractedMessage, InstrumentId, MessageDecoder, ParseError,
};
use crate::domain::record::{MutationError, UpdateMutation};
use crate::infrastructure::metrics;

// =============================================================================
// Errors
// =============================================================================

/// Error confined to a single message.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// Transport payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Message text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Nothing to update.
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

impl MessageError {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Parse(_) => "parse",
            Self::Mutation(_) => "empty",
        }
    }
}

/// Batch-fatal ingestion error.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The store failed for a reason other than a write conflict.
    #[error("record {index} (instrument {instrument}) failed: {source}")]
    Store {
        /// Position of the record in the batch.
        index: usize,
        /// Record key.
        instrument: InstrumentId,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

// =============================================================================
// Summary
// =============================================================================

/// A message that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMessage {
    /// Position of the record in the batch.
    pub index: usize,
    /// Failure category (`decode`, `parse`, `empty`).
    pub kind: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Records in the batch.
    pub received: usize,
    /// Updates the store applied.
    pub applied: usize,
    /// Updates rejected by a write condition.
    pub conflicts: usize,
    /// Messages dropped before reaching the store.
    pub skipped: Vec<SkippedMessage>,
}

impl BatchSummary {
    /// Whether every message was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts == 0 && self.skipped.is_empty()
    }
}

// =============================================================================
// Use Case
// =============================================================================

/// Use case for ingesting a batch of encoded messages.
pub struct IngestBatchUseCase<S>
where
    S: RecordStorePort,
{
    executor: UpsertExecutor<S>,
    decoder: MessageDecoder,
    enforce_sequence: bool,
}

impl<S> IngestBatchUseCase<S>
where
    S: RecordStorePort,
{
    /// Create a new `IngestBatchUseCase`.
    ///
    /// With `enforce_sequence`, messages carrying `seq` only apply when their
    /// sequence is newer than the stored one.
    pub const fn new(store: Arc<S>, enforce_sequence: bool) -> Self {
        Self {
            executor: UpsertExecutor::new(store),
            decoder: MessageDecoder::new(),
            enforce_sequence,
        }
    }

    /// Decode and parse one payload into a keyed mutation.
    ///
    /// # Errors
    ///
    /// Returns `MessageError` when the payload cannot be decoded or parsed,
    /// or carries no attributes besides its key.
    pub fn prepare(
        &self,
        payload: impl AsRef<[u8]>,
    ) -> Result<(InstrumentId, UpdateMutation), MessageError> {
        let text = self.decoder.decode(payload)?;
        tracing::trace!(message = %text, "Decoded message");

        let message = ExtractedMessage::parse(&text)?;
        let mutation = UpdateMutation::build(&message.attributes)?;
        let mutation = if self.enforce_sequence {
            mutation.guarded_by_sequence(&message.attributes)
        } else {
            mutation
        };

        Ok((message.instrument, mutation))
    }

    /// Process every payload in order.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Store` on the first non-conflict store failure;
    /// records after it are not attempted.
    pub async fn execute<P>(&self, payloads: &[P]) -> Result<BatchSummary, IngestError>
    where
        P: AsRef<[u8]> + Sync,
    {
        let mut summary = BatchSummary {
            received: payloads.len(),
            ..BatchSummary::default()
        };
        metrics::record_messages_received(payloads.len() as u64);

        for (index, payload) in payloads.iter().enumerate() {
            let (instrument, mutation) = match self.prepare(payload) {
                Ok(prepared) => prepared,
                Err(e) => {
                    metrics::record_message_skipped(e.kind());
                    tracing::warn!(index, kind = e.kind(), error = %e, "Skipping message");
                    summary.skipped.push(SkippedMessage {
                        index,
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.executor.apply(instrument, &mutation).await {
                Ok(UpsertOutcome::Applied(_)) => {
                    metrics::record_message_applied();
                    summary.applied += 1;
                }
                Ok(UpsertOutcome::Conflict) => summary.conflicts += 1,
                Err(source) => {
                    return Err(IngestError::Store {
                        index,
                        instrument,
                        source,
                    });
                }
            }
        }

        tracing::info!(
            received = summary.received,
            applied = summary.applied,
            conflicts = summary.conflicts,
            skipped = summary.skipped.len(),
            "Batch processed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;

    use super::*;
    use crate::infrastructure::persistence::InMemoryRecordStore;

    fn encode(text: &str) -> String {
        BASE64.encode(text)
    }

    fn use_case(
        enforce_sequence: bool,
    ) -> (
        IngestBatchUseCase<InMemoryRecordStore>,
        Arc<InMemoryRecordStore>,
    ) {
        let store = Arc::new(InMemoryRecordStore::new("analytics"));
        let ingest = IngestBatchUseCase::new(Arc::clone(&store), enforce_sequence);
        (ingest, store)
    }

    #[test]
    fn prepare_builds_keyed_mutation() {
        let (ingest, _) = use_case(false);
        let (instrument, mutation) = ingest
            .prepare(encode("instrument=7|sequence=3|price_bid=10050"))
            .unwrap();

        assert_eq!(instrument, InstrumentId::new(7));
        assert_eq!(mutation.expression(), "SET seq = :seq, price_bid = :price_bid");
        assert!(mutation.condition().is_none());
    }

    #[test]
    fn prepare_attaches_guard_when_enforcing() {
        let (ingest, _) = use_case(true);
        let (_, mutation) = ingest.prepare(encode("instrument=7|sequence=3")).unwrap();
        assert_eq!(mutation.condition().map(|g| g.sequence()), Some(3));
    }

    #[test]
    fn prepare_classifies_errors() {
        let (ingest, _) = use_case(false);

        let err = ingest.prepare("%%%").unwrap_err();
        assert_eq!(err.kind(), "decode");

        let err = ingest.prepare(encode("instrument=x")).unwrap_err();
        assert_eq!(err.kind(), "parse");

        let err = ingest.prepare(encode("instrument=7")).unwrap_err();
        assert_eq!(err.kind(), "empty");
    }

    #[tokio::test]
    async fn bad_messages_do_not_block_the_batch() {
        let (ingest, store) = use_case(false);
        let batch = vec![
            encode("instrument=1|price_bid=100"),
            "%%%".to_string(),
            encode("instrument=2|seq=abc"),
            encode("instrument=3"),
            encode("instrument=4|price_ask=250"),
        ];

        let summary = ingest.execute(&batch).await.unwrap();

        assert_eq!(summary.received, 5);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.conflicts, 0);
        let skipped: Vec<_> = summary.skipped.iter().map(|s| (s.index, s.kind)).collect();
        assert_eq!(skipped, [(1, "decode"), (2, "parse"), (3, "empty")]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch() {
        let (ingest, _) = use_case(false);
        let summary = ingest.execute::<String>(&[]).await.unwrap();
        assert_eq!(summary, BatchSummary::default());
        assert!(summary.is_clean());
    }

    #[tokio::test]
    async fn stale_sequence_counts_as_conflict_when_enforcing() {
        let (ingest, store) = use_case(true);
        let batch = vec![
            encode("instrument=1|sequence=5|price_bid=100"),
            encode("instrument=1|sequence=4|price_bid=999"),
            encode("instrument=1|sequence=6|price_ask=200"),
        ];

        let summary = ingest.execute(&batch).await.unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.conflicts, 1);
        let record = store.get(InstrumentId::new(1)).unwrap();
        assert_eq!(record["price_bid"].as_str(), "1.00");
        assert_eq!(record["seq"].as_str(), "6");
    }

    #[tokio::test]
    async fn stale_sequence_applies_without_enforcement() {
        let (ingest, store) = use_case(false);
        let batch = vec![
            encode("instrument=1|sequence=5|price_bid=100"),
            encode("instrument=1|sequence=4|price_bid=999"),
        ];

        let summary = ingest.execute(&batch).await.unwrap();

        assert_eq!(summary.applied, 2);
        let record = store.get(InstrumentId::new(1)).unwrap();
        assert_eq!(record["price_bid"].as_str(), "9.99");
        assert_eq!(record["seq"].as_str(), "4");
    }
}
