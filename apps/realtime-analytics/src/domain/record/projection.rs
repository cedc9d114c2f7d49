//! Record Projection
//!
//! Converts stored records back into natural JSON values for consumers.
//!
//! - `price_*`: numeric string to a JSON float. Lossy by intent; the store
//!   keeps the exact decimal.
//! - `instrument`: JSON integer.
//! - anything else: the stored tagged value as-is (`{"N": "3"}`).

use serde_json::{Map, Number, Value};

use super::StoredRecord;
use crate::domain::message::WireValue;
use crate::domain::message::extractor::{INSTRUMENT_ATTRIBUTE, PRICE_PREFIX};

/// One record as served to consumers.
pub type ProjectedRecord = Map<String, Value>;

/// Projection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// A numeric attribute was stored as a string.
    #[error("attribute {attribute} is stored as {found}, expected a number")]
    NotNumeric {
        /// Attribute name.
        attribute: String,
        /// Wire type tag actually stored.
        found: &'static str,
    },

    /// A numeric attribute does not parse as the expected number.
    #[error("attribute {attribute} holds unparseable number {value:?}")]
    InvalidNumber {
        /// Attribute name.
        attribute: String,
        /// Stored payload.
        value: String,
    },
}

fn numeric_payload<'a>(attribute: &str, value: &'a WireValue) -> Result<&'a str, ProjectionError> {
    value.as_number().ok_or_else(|| ProjectionError::NotNumeric {
        attribute: attribute.to_string(),
        found: value.type_tag(),
    })
}

fn invalid_number(attribute: &str, value: &str) -> ProjectionError {
    ProjectionError::InvalidNumber {
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn project_value(attribute: &str, value: &WireValue) -> Result<Value, ProjectionError> {
    if attribute.starts_with(PRICE_PREFIX) {
        let raw = numeric_payload(attribute, value)?;
        return raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid_number(attribute, raw));
    }

    if attribute == INSTRUMENT_ATTRIBUTE {
        let raw = numeric_payload(attribute, value)?;
        return raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid_number(attribute, raw));
    }

    Ok(value.to_json())
}

/// Project one stored record, keeping its attribute order.
///
/// # Errors
///
/// Returns `ProjectionError` if a `price_*` or `instrument` attribute is not
/// a parseable number.
pub fn project_record(record: &StoredRecord) -> Result<ProjectedRecord, ProjectionError> {
    record
        .iter()
        .map(|(attribute, value)| Ok((attribute.clone(), project_value(attribute, value)?)))
        .collect()
}
