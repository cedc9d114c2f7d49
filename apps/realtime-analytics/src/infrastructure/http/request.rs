//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

/// A batch of stream records, as delivered by the stream trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamBatch {
    /// Records in stream order.
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

impl StreamBatch {
    /// Encoded payloads in batch order.
    #[must_use]
    pub fn payloads(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.kinesis.data.as_str())
            .collect()
    }
}

/// One stream record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Stream payload envelope.
    pub kinesis: StreamPayload,
}

/// Stream payload envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamPayload {
    /// Base64-encoded message text.
    pub data: String,
}
