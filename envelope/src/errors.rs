//! Envelope errors

use thiserror::Error;

/// Envelope result type
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Errors that can occur while building or parsing envelopes
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Envelope carries no ciphertext blocks
    #[error("Envelope has an empty ciphertext block list")]
    EmptyCiphertext,

    /// A field failed base64 decoding
    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The nonce failed hex decoding
    #[error("Hex decode failed: {0}")]
    Hex(#[from] hex::FromHexError),

    /// A ciphertext block has the wrong size
    #[error("Ciphertext block {index} has {len} bytes, expected 16")]
    BlockLength { index: usize, len: usize },

    /// The nonce has the wrong size
    #[error("Nonce has {len} bytes, expected 16")]
    NonceLength { len: usize },

    /// The sender public key has the wrong size
    #[error("Sender public key has {len} bytes, expected 32")]
    KeyLength { len: usize },
}
