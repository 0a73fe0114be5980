//! Payload errors

use thiserror::Error;

/// Payload result type
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Errors that can occur while encoding or decoding bet payloads
#[derive(Error, Debug)]
pub enum PayloadError {
    /// Serialized compact payload exceeds the word budget
    #[error("Bet payload too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    /// Decrypted plaintext is not valid UTF-8
    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Decrypted plaintext matches neither wire format
    #[error("Payload JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}
