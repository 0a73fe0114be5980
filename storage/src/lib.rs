//! Punt Storage Layer
//!
//! Persistent storage for encrypted bets.
//!
//! # Architecture
//!
//! The storage layer uses redb (an embedded database) for:
//! - Bet rows keyed by a monotonic record id
//! - Secondary indices by wallet and by poll id
//!
//! Each row holds the encryption envelope fields next to the plaintext
//! indexing columns (wallet, poll id, side, amount, title, outcome).
//! The plaintext columns are the source of truth for lookups; the
//! ciphertext only retains identifier prefixes.

pub mod bets;
mod error;

pub use bets::{BetStore, EnvelopeUpdate, NewStoredBet, StoredBet};
pub use error::{StoreError, StoreResult};
