//! HTTP response DTOs and headers.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderName,
};
use serde::{Deserialize, Serialize};

/// Headers on every query response, success or failure.
#[must_use]
pub const fn query_cors_headers() -> [(HeaderName, &'static str); 5] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
        (ACCESS_CONTROL_ALLOW_METHODS, "GET"),
        (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        (CONTENT_TYPE, "application/json"),
    ]
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Batch position of the failing record, for ingestion errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ErrorResponse {
    /// Error without a batch position.
    #[must_use]
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            index: None,
        }
    }

    /// Attach the failing record's batch position.
    #[must_use]
    pub const fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_headers_allow_any_origin() {
        let headers = query_cors_headers();
        assert!(headers.contains(&(ACCESS_CONTROL_ALLOW_ORIGIN, "*")));
        assert!(headers.contains(&(ACCESS_CONTROL_ALLOW_METHODS, "GET")));
        assert!(headers.contains(&(CONTENT_TYPE, "application/json")));
    }

    #[test]
    fn index_is_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));

        let body = serde_json::to_value(ErrorResponse::new("boom").at_index(2)).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom", "index": 2}));
    }
}
