//! Punt Confidential Bet Client
//!
//! Ties the codec, cipher, payload and envelope layers together behind
//! the two entry points the surrounding application calls —
//! [`PuntClient::encrypt_bet_payload`] and
//! [`PuntClient::decrypt_bet_payload`] — and the [`BetVault`] persistence
//! adapter that stores, retrieves and re-encrypts bets.
//!
//! # Enclave key lifecycle
//!
//! The compute-enclave public key is fetched lazily on first use,
//! retried while the enclave initializes, and cached for the process
//! lifetime. Concurrent first callers share a single fetch (the cache is
//! single-flight). Key rotation on the enclave side requires a process
//! restart to pick up.

mod client;
mod config;
mod enclave;
mod errors;
mod metrics;
mod vault;

pub use client::PuntClient;
pub use config::{decode_secret_key, ClientConfig, ClientSecret};
pub use enclave::{
    EnclaveKeyCache, EnclaveKeyProvider, RpcEnclaveProvider, DEFAULT_FETCH_ATTEMPTS,
    DEFAULT_FETCH_DELAY,
};
pub use errors::{ClientError, ClientResult};
pub use metrics::{ClientMetrics, Counter};
pub use vault::{
    BatchOutcome, BetRecord, BetVault, DecryptFailure, NewBet, PollTransition, UpdateSummary,
};
