//! Punt Cipher Session
//!
//! Derives a symmetric cipher from an x25519 key agreement between the
//! client secret key and the compute-enclave public key, then encrypts
//! 128-bit word sequences under per-call random nonces.
//!
//! # Construction
//!
//! - Key agreement: curve25519 Montgomery multiplication with explicit
//!   clamping, expanded through HKDF-SHA256 with a domain label
//! - Cipher: Rescue-style keyed permutation over GF(2^128 - 159) driven
//!   in counter mode; each plaintext word is masked by wrapping 128-bit
//!   addition of a keystream word
//!
//! The cipher provides confidentiality only. There is no authentication
//! tag: corrupted ciphertext or nonces decrypt to garbage words and are
//! only caught by downstream envelope/JSON decoding.

mod errors;
mod rescue;
mod session;

pub use errors::{CipherError, CipherResult};
pub use session::{
    clamp_secret, derive_public_key, generate_nonce, CiphertextBlock, Nonce, RescueCipher,
    SharedSecret, NONCE_BYTES,
};
