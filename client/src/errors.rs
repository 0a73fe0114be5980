//! Client errors

use thiserror::Error;

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the confidential bet pipeline
#[derive(Error, Debug)]
pub enum ClientError {
    /// Required configuration is missing or malformed; fatal for the
    /// affected operation, never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The enclave public key was unavailable after exhausting retries.
    /// The caller may retry the whole request later.
    #[error("Enclave public key is not yet finalized after {attempts} attempts; the enclave may still be initializing")]
    EnclaveNotReady { attempts: u32 },

    /// Enclave key RPC transport failure
    #[error("Enclave RPC error: {0}")]
    Rpc(String),

    /// Word codec error
    #[error("Codec error: {0}")]
    Codec(#[from] punt_codec::CodecError),

    /// Cipher error
    #[error("Cipher error: {0}")]
    Cipher(#[from] punt_cipher::CipherError),

    /// Payload compaction/decoding error
    #[error("Payload error: {0}")]
    Payload(#[from] punt_payload::PayloadError),

    /// Envelope encoding/decoding error
    #[error("Envelope error: {0}")]
    Envelope(#[from] punt_envelope::EnvelopeError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] punt_store::StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
