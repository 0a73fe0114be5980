//! Punt Bet Payload Model
//!
//! The domain bet payload, the size-minimized compact representation
//! that must fit the fixed ciphertext word budget, and the wire-format
//! sum type covering both the compact and the earlier full-payload
//! encodings.
//!
//! Compaction is lossy on purpose: only a wallet/poll-id prefix is
//! retained inside the ciphertext. Full identifiers live in plaintext
//! store columns and are the source of truth for lookups.

mod bet;
mod compact;
mod errors;
mod wire;

pub use bet::{BetData, BetPayload, Outcome};
pub use compact::{compact, expand, CompactPayload};
pub use errors::{PayloadError, PayloadResult};
pub use wire::WirePayload;

/// Wallet prefix length retained in the ciphertext.
pub const WALLET_PREFIX_CHARS: usize = 8;

/// Poll id prefix length retained in the ciphertext.
pub const POLL_ID_PREFIX_CHARS: usize = 20;
