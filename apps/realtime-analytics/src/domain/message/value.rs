//! Attribute Values
//!
//! The closed set of value shapes a market data attribute can take, both as
//! extracted from a message (`TypedValue`) and as persisted in the record
//! store (`WireValue`).

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Typed Values
// =============================================================================

/// A coerced attribute value produced by the field extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// Whole number (instrument, reception, seq, t, l).
    Integer(i64),
    /// Fixed-point decimal, always scale 2 for `price_*` attributes.
    Decimal(Decimal),
    /// Any attribute without a numeric coercion.
    String(String),
}

impl TypedValue {
    /// Convert to the tagged representation the record store persists.
    #[must_use]
    pub fn to_wire(&self) -> WireValue {
        match self {
            Self::Integer(v) => WireValue::Number(v.to_string()),
            Self::Decimal(v) => WireValue::Number(v.to_string()),
            Self::String(v) => WireValue::Text(v.clone()),
        }
    }

    /// Integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

/// Attribute name to typed value, in first-insertion order.
///
/// Re-inserting an existing name overwrites the value in place, so the last
/// occurrence of a duplicated field wins without moving its position.
pub type AttributeMap = IndexMap<String, TypedValue>;

// =============================================================================
// Wire Values
// =============================================================================

/// A store attribute tagged with its wire type.
///
/// Numbers are carried as their exact decimal string so no precision is lost
/// between write and read. Serializes as `{"N": "..."}` or `{"S": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireValue {
    /// Numeric value (integers and decimals).
    #[serde(rename = "N")]
    Number(String),
    /// String value.
    #[serde(rename = "S")]
    Text(String),
}

impl WireValue {
    /// The one-letter wire type tag (`"N"` or `"S"`).
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Number(_) => "N",
            Self::Text(_) => "S",
        }
    }

    /// The raw payload regardless of type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(v) | Self::Text(v) => v,
        }
    }

    /// The numeric payload, or `None` for string values.
    #[must_use]
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// JSON form of the tagged value, e.g. `{"N": "42"}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut tagged = serde_json::Map::with_capacity(1);
        tagged.insert(
            self.type_tag().to_string(),
            serde_json::Value::String(self.as_str().to_string()),
        );
        serde_json::Value::Object(tagged)
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_tag(), self.as_str())
    }
}

// =============================================================================
// Instrument Key
// =============================================================================

/// Unique identifier of a tradable instrument, the record store's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(i64);

impl InstrumentId {
    /// Wrap a raw instrument number.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw instrument number.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The key as a numeric wire value.
    #[must_use]
    pub fn to_wire(self) -> WireValue {
        WireValue::Number(self.0.to_string())
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
