//! Field Extractor
//!
//! Parses decoded message text into typed attributes.
//!
//! # Message Format
//!
//! ```text
//! instrument=7|sequence=42|price_bid=10050|price_ask=10075|venue=XNAS
//! ```
//!
//! Tokens are separated by `|` and carry `name=value`. Tokens of three bytes
//! or fewer are dropped before parsing, which also discards short but
//! well-formed tokens such as `a=1`.
//!
//! # Coercion Table
//!
//! | Wire field   | Attribute    | Type                      |
//! |--------------|--------------|---------------------------|
//! | `instrument` | `instrument` | integer                   |
//! | `reception`  | `reception`  | integer                   |
//! | `sequence`   | `seq`        | integer                   |
//! | `seq`        | `seq`        | integer                   |
//! | `type`       | `t`          | integer                   |
//! | `level`      | `l`          | integer                   |
//! | `price_*`    | unchanged    | decimal, wire value / 100 |
//! | other        | unchanged    | string                    |

use rust_decimal::Decimal;

use super::value::{AttributeMap, InstrumentId, TypedValue};

/// Separator between tokens.
pub const FIELD_DELIMITER: char = '|';

/// Separator between a token's name and value.
pub const NAME_VALUE_SEPARATOR: char = '=';

/// Prefix marking a cents-denominated price field.
pub const PRICE_PREFIX: &str = "price_";

/// Attribute holding the record key.
pub const INSTRUMENT_ATTRIBUTE: &str = "instrument";

/// Tokens must be strictly longer than this many bytes.
const MAX_DISCARDED_TOKEN_LEN: usize = 3;

/// Decimal scale of price attributes (cents to units).
const PRICE_SCALE: u32 = 2;

// =============================================================================
// Errors
// =============================================================================

/// Extraction errors. Any of these aborts the current message only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Token is not of the form `name=value`.
    #[error("malformed token: {0:?}")]
    MalformedToken(String),

    /// A numeric field did not carry an integer.
    #[error("field {field} expects an integer, got {value:?}")]
    InvalidInteger {
        /// Wire field name.
        field: String,
        /// Offending payload.
        value: String,
    },

    /// No `instrument` field in the message.
    #[error("message has no instrument field")]
    MissingInstrument,
}

// =============================================================================
// Coercion
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    Integer,
    Price,
    Text,
}

/// Canonical attribute name and coercion for a wire field name.
fn coercion_for(field: &str) -> (&str, Coercion) {
    match field {
        "instrument" => (INSTRUMENT_ATTRIBUTE, Coercion::Integer),
        "reception" => ("reception", Coercion::Integer),
        "sequence" | "seq" => ("seq", Coercion::Integer),
        "type" => ("t", Coercion::Integer),
        "level" => ("l", Coercion::Integer),
        name if name.starts_with(PRICE_PREFIX) => (name, Coercion::Price),
        name => (name, Coercion::Text),
    }
}

fn parse_integer(field: &str, raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidInteger {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

impl Coercion {
    fn apply(self, field: &str, raw: &str) -> Result<TypedValue, ParseError> {
        match self {
            Self::Integer => parse_integer(field, raw).map(TypedValue::Integer),
            Self::Price => parse_integer(field, raw)
                .map(|cents| TypedValue::Decimal(Decimal::new(cents, PRICE_SCALE))),
            Self::Text => Ok(TypedValue::String(raw.to_string())),
        }
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Parse decoded message text into an attribute map.
///
/// The returned map still contains `instrument` when present; use
/// [`ExtractedMessage::from_attributes`] to split off the key.
///
/// # Errors
///
/// Returns `ParseError` on a token without `=` or an empty name, or when an
/// integer or price field carries a non-integer payload.
pub fn extract(decoded: &str) -> Result<AttributeMap, ParseError> {
    let mut attributes = AttributeMap::new();

    for token in decoded
        .split(FIELD_DELIMITER)
        .filter(|token| token.len() > MAX_DISCARDED_TOKEN_LEN)
    {
        let (field, raw) = token
            .split_once(NAME_VALUE_SEPARATOR)
            .filter(|(field, _)| !field.is_empty())
            .ok_or_else(|| ParseError::MalformedToken(token.to_string()))?;

        let (attribute, coercion) = coercion_for(field);
        let value = coercion.apply(field, raw)?;
        attributes.insert(attribute.to_string(), value);
    }

    Ok(attributes)
}

/// A parsed message split into its record key and data attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    /// Record key.
    pub instrument: InstrumentId,
    /// Data attributes, without `instrument`.
    pub attributes: AttributeMap,
}

impl ExtractedMessage {
    /// Remove the instrument from an extracted attribute map.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingInstrument` if the map has no integer
    /// `instrument` attribute.
    pub fn from_attributes(mut attributes: AttributeMap) -> Result<Self, ParseError> {
        let instrument = attributes
            .shift_remove(INSTRUMENT_ATTRIBUTE)
            .and_then(|value| value.as_integer())
            .map(InstrumentId::new)
            .ok_or(ParseError::MissingInstrument)?;

        Ok(Self {
            instrument,
            attributes,
        })
    }

    /// Parse message text straight into key and attributes.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`extract`] or [`Self::from_attributes`].
    pub fn parse(decoded: &str) -> Result<Self, ParseError> {
        Self::from_attributes(extract(decoded)?)
    }
}
