//! Project Records Use Case
//!
//! Full consistent scan of the record store, converted for consumers.
//! Every call re-scans; there is no cursor to resume.

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{RecordStorePort, StoreError};
use crate::domain::record::{ProjectedRecord, ProjectionError, project_record};
use crate::infrastructure::metrics;

/// Read path errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The scan failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored record could not be projected.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Use case for reading every record as typed JSON.
pub struct ProjectRecordsUseCase<S>
where
    S: RecordStorePort,
{
    store: Arc<S>,
}

impl<S> ProjectRecordsUseCase<S>
where
    S: RecordStorePort,
{
    /// Create a new `ProjectRecordsUseCase`.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Scan and project all records.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the scan fails or any record holds a
    /// malformed numeric attribute.
    pub async fn execute(&self) -> Result<Vec<ProjectedRecord>, QueryError> {
        let started = Instant::now();
        let records = self.store.scan_all().await?;
        metrics::record_scan_duration(started.elapsed());

        tracing::debug!(records = records.len(), "Store scanned");

        Ok(records
            .iter()
            .map(project_record)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::domain::message::{InstrumentId, WireValue};
    use crate::domain::record::{StoredRecord, UpdateMutation};
    use crate::application::ports::UpdateAck;

    struct FixedScan(Result<Vec<StoredRecord>, StoreError>);

    #[async_trait]
    impl RecordStorePort for FixedScan {
        async fn upsert(
            &self,
            key: InstrumentId,
            mutation: &UpdateMutation,
        ) -> Result<UpdateAck, StoreError> {
            Ok(UpdateAck {
                instrument: key,
                created: false,
                attributes_written: mutation.len(),
            })
        }

        async fn scan_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn projects_every_record() {
        let mut record = StoredRecord::new();
        record.insert("instrument".to_string(), WireValue::Number("7".to_string()));
        record.insert("price_ask".to_string(), WireValue::Number("100.50".to_string()));

        let use_case = ProjectRecordsUseCase::new(Arc::new(FixedScan(Ok(vec![record]))));
        let projected = use_case.execute().await.unwrap();

        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0]["instrument"], json!(7));
        assert_eq!(projected[0]["price_ask"], json!(100.5));
    }

    #[tokio::test]
    async fn scan_failure_surfaces() {
        let use_case = ProjectRecordsUseCase::new(Arc::new(FixedScan(Err(
            StoreError::Backend("scan aborted".to_string()),
        ))));

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, QueryError::Store(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn malformed_record_surfaces() {
        let mut record = StoredRecord::new();
        record.insert("price_bid".to_string(), WireValue::Text("n/a".to_string()));

        let use_case = ProjectRecordsUseCase::new(Arc::new(FixedScan(Ok(vec![record]))));
        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, QueryError::Projection(_)));
    }
}
