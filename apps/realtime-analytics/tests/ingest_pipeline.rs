//! Ingestion Pipeline Integration Tests
//!
//! Runs the ingest and query use cases against a store wrapper that injects
//! conflicts and failures for chosen instruments.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use serde_json::json;

use realtime_analytics::{
    InMemoryRecordStore, IngestBatchUseCase, IngestError, InstrumentId, ProjectRecordsUseCase,
    RecordStorePort, SequenceGuard, StoreError, StoredRecord, UpdateAck, UpdateMutation,
};

// =============================================================================
// Scripted Store
// =============================================================================

/// In-memory store that rejects writes for selected instruments.
struct ScriptedStore {
    inner: InMemoryRecordStore,
    conflicts: HashSet<i64>,
    failures: HashSet<i64>,
    calls: Mutex<Vec<i64>>,
}

impl ScriptedStore {
    fn new(conflicts: &[i64], failures: &[i64]) -> Self {
        Self {
            inner: InMemoryRecordStore::new("analytics"),
            conflicts: conflicts.iter().copied().collect(),
            failures: failures.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<i64> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RecordStorePort for ScriptedStore {
    async fn upsert(
        &self,
        key: InstrumentId,
        mutation: &UpdateMutation,
    ) -> Result<UpdateAck, StoreError> {
        self.calls.lock().push(key.get());

        if self.conflicts.contains(&key.get()) {
            return Err(StoreError::ConditionalCheckFailed {
                instrument: key,
                condition: SequenceGuard::CONDITION.to_string(),
            });
        }
        if self.failures.contains(&key.get()) {
            return Err(StoreError::Backend("throughput exceeded".to_string()));
        }

        self.inner.upsert(key, mutation).await
    }

    async fn scan_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        self.inner.scan_all().await
    }
}

fn encode_all(messages: &[&str]) -> Vec<String> {
    messages.iter().map(|m| BASE64.encode(m)).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn conflict_does_not_stop_later_records() {
    let store = Arc::new(ScriptedStore::new(&[2], &[]));
    let ingest = IngestBatchUseCase::new(Arc::clone(&store), false);

    let summary = ingest
        .execute(&encode_all(&[
            "instrument=1|price_bid=100",
            "instrument=2|price_bid=200",
            "instrument=3|price_bid=300",
        ]))
        .await
        .unwrap();

    assert_eq!(summary.received, 3);
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.conflicts, 1);
    assert!(summary.skipped.is_empty());
    assert!(!summary.is_clean());
    assert_eq!(store.calls(), [1, 2, 3]);
    assert!(store.inner.get(InstrumentId::new(2)).is_none());
    assert!(store.inner.get(InstrumentId::new(3)).is_some());
}

#[tokio::test]
async fn store_failure_aborts_remaining_records() {
    let store = Arc::new(ScriptedStore::new(&[], &[2]));
    let ingest = IngestBatchUseCase::new(Arc::clone(&store), false);

    let err = ingest
        .execute(&encode_all(&[
            "instrument=1|price_bid=100",
            "instrument=2|price_bid=200",
            "instrument=3|price_bid=300",
        ]))
        .await
        .unwrap_err();

    let IngestError::Store {
        index,
        instrument,
        source,
    } = err;
    assert_eq!(index, 1);
    assert_eq!(instrument, InstrumentId::new(2));
    assert_eq!(source, StoreError::Backend("throughput exceeded".to_string()));
    assert_eq!(store.calls(), [1, 2]);
    assert_eq!(store.inner.len(), 1);
}

#[tokio::test]
async fn skipped_messages_never_reach_the_store() {
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let ingest = IngestBatchUseCase::new(Arc::clone(&store), false);

    let summary = ingest
        .execute(&encode_all(&["instrument=9", "venue=XNAS", "instrument=4|seq=2"]))
        .await
        .unwrap();

    assert_eq!(summary.applied, 1);
    assert_eq!(summary.skipped.len(), 2);
    assert_eq!(store.calls(), [4]);
}

#[tokio::test]
async fn ingested_batch_projects_to_typed_json() {
    let store = Arc::new(InMemoryRecordStore::new("analytics"));
    let ingest = IngestBatchUseCase::new(Arc::clone(&store), false);
    let query = ProjectRecordsUseCase::new(Arc::clone(&store));

    ingest
        .execute(&encode_all(&[
            "instrument=7|price_ask=10050|reception=1700000000",
            "instrument=7|seq=3",
            "instrument=-1|price_bid=-25",
        ]))
        .await
        .unwrap();

    let records = query.execute().await.unwrap();
    let records = serde_json::to_value(records).unwrap();
    assert_eq!(
        records,
        json!([
            { "instrument": -1, "price_bid": -0.25 },
            {
                "instrument": 7,
                "price_ask": 100.5,
                "reception": { "N": "1700000000" },
                "seq": { "N": "3" }
            }
        ])
    );
}

#[tokio::test]
async fn concurrent_batches_on_one_instrument_merge() {
    let store = Arc::new(InMemoryRecordStore::new("analytics"));
    let ingest = Arc::new(IngestBatchUseCase::new(Arc::clone(&store), false));

    let handles: Vec<_> = ["price_bid=100", "price_ask=200", "venue=XNAS", "level=1"]
        .into_iter()
        .map(|field| {
            let ingest = Arc::clone(&ingest);
            let message = format!("instrument=5|{field}");
            let payload = encode_all(&[message.as_str()]);
            tokio::spawn(async move { ingest.execute(&payload).await.unwrap() })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().applied, 1);
    }

    let record = store.get(InstrumentId::new(5)).unwrap();
    let mut names: Vec<_> = record.keys().cloned().collect();
    names.sort();
    assert_eq!(names, ["instrument", "l", "price_ask", "price_bid", "venue"]);
}
