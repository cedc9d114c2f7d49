//! In-memory record store.
//!
//! One table of instrument records behind a single lock. Each upsert runs
//! its condition check and attribute writes under the write lock, which gives
//! the per-key atomic partial update the pipeline relies on. Scans take the
//! read lock and so never observe a half-applied update.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{RecordStorePort, StoreError, UpdateAck};
use crate::domain::message::InstrumentId;
use crate::domain::message::extractor::INSTRUMENT_ATTRIBUTE;
use crate::domain::record::{SequenceGuard, StoredRecord, UpdateMutation};

/// In-memory implementation of `RecordStorePort`.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    table_name: String,
    records: RwLock<BTreeMap<InstrumentId, StoredRecord>>,
}

impl InMemoryRecordStore {
    /// Create an empty table.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// The table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of one record.
    #[must_use]
    pub fn get(&self, key: InstrumentId) -> Option<StoredRecord> {
        self.records.read().get(&key).cloned()
    }
}

#[async_trait]
impl RecordStorePort for InMemoryRecordStore {
    async fn upsert(
        &self,
        key: InstrumentId,
        mutation: &UpdateMutation,
    ) -> Result<UpdateAck, StoreError> {
        let mut records = self.records.write();

        if let Some(guard) = mutation.condition()
            && !guard.admits(records.get(&key))
        {
            return Err(StoreError::ConditionalCheckFailed {
                instrument: key,
                condition: SequenceGuard::CONDITION.to_string(),
            });
        }

        let created = !records.contains_key(&key);
        let record = records.entry(key).or_insert_with(|| {
            let mut record = StoredRecord::new();
            record.insert(INSTRUMENT_ATTRIBUTE.to_string(), key.to_wire());
            record
        });

        for (attribute, value) in mutation.assignments() {
            record.insert(attribute.to_string(), value.clone());
        }
        drop(records);

        Ok(UpdateAck {
            instrument: key,
            created,
            attributes_written: mutation.len(),
        })
    }

    async fn scan_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }
}
