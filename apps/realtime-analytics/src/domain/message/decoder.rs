//! Message Decoder
//!
//! Turns a transport-encoded record payload (standard base64) into the clean
//! pipe-delimited message text.
//!
//! Producers print messages before encoding them, so payloads routinely carry
//! quoting and newline artifacts. Those are stripped here and never
//! interpreted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Literal backslash-n sequence left behind by the printing layer.
const ESCAPED_NEWLINE: &str = "\\n";

/// Decoder errors.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Base64 payload decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageDecoder;

impl MessageDecoder {
    /// Create a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one record payload into message text.
    ///
    /// Leading and trailing ASCII whitespace around the encoded payload is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the payload is not base64 or does not decode
    /// to UTF-8.
    pub fn decode(&self, payload: impl AsRef<[u8]>) -> Result<String, DecodeError> {
        let bytes = BASE64.decode(payload.as_ref().trim_ascii())?;
        let text = String::from_utf8(bytes)?;
        Ok(strip_artifacts(&text))
    }
}

/// Remove quote characters and newline artifacts.
fn strip_artifacts(text: &str) -> String {
    text.replace(ESCAPED_NEWLINE, "")
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\n' | '\r'))
        .collect()
}
