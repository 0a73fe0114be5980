//! PUNT: Confidential Bet Pipeline
//!
//! This is the root crate that re-exports the pipeline components for
//! integration testing and provides unified access to the protocol
//! primitives.
//!
//! ## Architecture Overview
//!
//! Bets are encrypted client-side before they ever reach storage: the
//! payload is compacted to fit a fixed budget of 128-bit words,
//! encrypted with a shared-secret Rescue cipher derived from an x25519
//! key agreement with the compute enclave, and wrapped in a transport
//! envelope stored next to plaintext indexing columns.
//!
//! ## Crate Organization
//!
//! - `punt-codec`: byte buffer <-> 128-bit word conversion with padding
//! - `punt-cipher`: x25519 key agreement + Rescue keystream cipher
//! - `punt-payload`: domain model, compaction policy, wire formats
//! - `punt-envelope`: transport envelope and on-chain argument builder
//! - `punt-store`: embedded row store with plaintext indices
//! - `punt-client`: enclave key cache, entry points and the bet vault

// Re-export all crates for integration testing
pub use punt_cipher as cipher;
pub use punt_codec as codec;
pub use punt_client as client;
pub use punt_envelope as envelope;
pub use punt_payload as payload;
pub use punt_store as store;

/// Pipeline version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use punt_cipher::{derive_public_key, generate_nonce, RescueCipher, SharedSecret};
    pub use punt_codec::{compress, decompress, pad, trim, MAX_PLAINTEXT_BYTES, MAX_WORDS};
    pub use punt_client::{
        BetVault, ClientConfig, ClientError, ClientSecret, EnclaveKeyCache, EnclaveKeyProvider,
        NewBet, PollTransition, PuntClient,
    };
    pub use punt_envelope::{build_computation_arguments, EncryptedEnvelope};
    pub use punt_payload::{compact, expand, BetData, BetPayload, Outcome, WirePayload};
    pub use punt_store::{BetStore, StoredBet};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_word_budget_matches_cipher_block() {
        assert_eq!(codec::WORD_BYTES, cipher::NONCE_BYTES);
    }
}
