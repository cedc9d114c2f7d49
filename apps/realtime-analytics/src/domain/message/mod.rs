//! Market Data Messages
//!
//! Wire message handling: transport decoding, field extraction and the
//! value types both steps produce.

/// Base64 payload decoding and artifact cleanup.
pub mod decoder;

/// Pipe-delimited field parsing and type coercion.
pub mod extractor;

/// Typed and wire attribute values.
pub mod value;

pub use decoder::{DecodeError, MessageDecoder};
pub use extractor::{ExtractedMessage, ParseError, extract};
pub use value::{AttributeMap, InstrumentId, TypedValue, WireValue};
