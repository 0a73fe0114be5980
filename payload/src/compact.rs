//! Compaction policy: domain payload <-> size-minimized wire form

use serde::{Deserialize, Serialize};

use punt_codec::MAX_PLAINTEXT_BYTES;

use crate::bet::{BetData, BetPayload, Outcome};
use crate::{PayloadError, PayloadResult, POLL_ID_PREFIX_CHARS, WALLET_PREFIX_CHARS};

/// The minimal representation that must fit the ciphertext word budget.
///
/// Single-letter keys keep the serialized form small; the wallet and
/// poll-id fields hold prefixes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactPayload {
    /// Wallet prefix (8 chars).
    pub w: String,
    /// Poll id prefix (20 chars).
    pub p: String,
    /// Side, 0 or 1.
    pub s: u8,
    /// Stake amount.
    pub a: f64,
    /// Outcome code: P, W or L.
    #[serde(default = "default_outcome_code")]
    pub o: char,
    /// Stored-at timestamp.
    pub t: String,
}

fn default_outcome_code() -> char {
    Outcome::Pending.code()
}

impl CompactPayload {
    /// JSON-serialize and enforce the plaintext size ceiling.
    ///
    /// Runs before padding so an oversized payload fails loudly instead
    /// of being partially encrypted or silently truncated.
    pub fn to_plaintext(&self) -> PayloadResult<Vec<u8>> {
        let serialized = serde_json::to_vec(self)?;
        if serialized.len() > MAX_PLAINTEXT_BYTES {
            return Err(PayloadError::TooLarge {
                size: serialized.len(),
                max: MAX_PLAINTEXT_BYTES,
            });
        }
        Ok(serialized)
    }
}

/// Truncate to a character prefix without splitting a code point.
fn char_prefix(value: &str, chars: usize) -> String {
    match value.char_indices().nth(chars) {
        Some((index, _)) => value[..index].to_string(),
        None => value.to_string(),
    }
}

/// Map a domain payload to its compact form.
///
/// Lossy: the wallet keeps its first 8 characters, the poll id its first
/// 20, labels and title are dropped entirely, and the outcome becomes a
/// single-letter code (unknown statuses become Pending).
pub fn compact(payload: &BetPayload) -> CompactPayload {
    CompactPayload {
        w: char_prefix(&payload.wallet, WALLET_PREFIX_CHARS),
        p: char_prefix(&payload.poll_id, POLL_ID_PREFIX_CHARS),
        s: payload.bet_data.side,
        a: payload.bet_data.amount,
        o: Outcome::from_name(payload.bet_data.outcome.as_deref()).code(),
        t: payload.stored_at.clone(),
    }
}

/// Rebuild a domain payload from its compact form.
///
/// The returned wallet and poll id are partial; callers needing exact
/// identifiers must read them from the plaintext store columns.
pub fn expand(compact: CompactPayload) -> BetPayload {
    let outcome = Outcome::from_code(compact.o);
    BetPayload {
        wallet: compact.w,
        poll_id: compact.p,
        bet_data: BetData {
            side: compact.s,
            amount: compact.a,
            label_yes: None,
            label_no: None,
            title: None,
            timestamp: None,
            outcome: Some(outcome.name().to_string()),
        },
        stored_at: compact.t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> BetPayload {
        BetPayload {
            wallet: "9xQWalletAddressBase58".into(),
            poll_id: "poll-abc123def456ghi789jkl".into(),
            bet_data: BetData {
                outcome: Some("Win".into()),
                title: Some("Will it rain?".into()),
                ..BetData::new(1, 0.25)
            },
            stored_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_compact_truncates_prefixes() {
        let compacted = compact(&sample_payload());
        assert_eq!(compacted.w, "9xQWalle");
        assert_eq!(compacted.p, "poll-abc123def456ghi");
        assert_eq!(compacted.o, 'W');
    }

    #[test]
    fn test_compact_short_values_kept_whole() {
        let mut payload = sample_payload();
        payload.wallet = "abc".into();
        payload.poll_id = "p1".into();
        let compacted = compact(&payload);
        assert_eq!(compacted.w, "abc");
        assert_eq!(compacted.p, "p1");
    }

    #[test]
    fn test_compact_multibyte_wallet() {
        let mut payload = sample_payload();
        payload.wallet = "héllo wörld".into();
        assert_eq!(compact(&payload).w, "héllo wö");
    }

    #[test]
    fn test_expand_reverses_outcome_code() {
        let expanded = expand(compact(&sample_payload()));
        assert_eq!(expanded.bet_data.outcome.as_deref(), Some("Win"));
        assert_eq!(expanded.bet_data.side, 1);
        assert_eq!(expanded.bet_data.amount, 0.25);
        assert_eq!(expanded.stored_at, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_unknown_outcome_compacts_to_pending() {
        let mut payload = sample_payload();
        payload.bet_data.outcome = Some("Frozen".into());
        let compacted = compact(&payload);
        assert_eq!(compacted.o, 'P');
        assert_eq!(
            expand(compacted).bet_data.outcome.as_deref(),
            Some("Pending")
        );
    }

    #[test]
    fn test_to_plaintext_fits_budget() {
        let plaintext = compact(&sample_payload()).to_plaintext().unwrap();
        assert!(plaintext.len() <= MAX_PLAINTEXT_BYTES);
    }

    #[test]
    fn test_to_plaintext_boundary() {
        // Grow the timestamp field until the serialized form lands
        // exactly on the ceiling, then one byte past it.
        let mut compacted = compact(&sample_payload());
        compacted.t = String::new();
        let base = serde_json::to_vec(&compacted).unwrap().len();
        compacted.t = "x".repeat(MAX_PLAINTEXT_BYTES - base);
        assert!(compacted.to_plaintext().is_ok());

        compacted.t.push('x');
        match compacted.to_plaintext() {
            Err(PayloadError::TooLarge { size, max }) => {
                assert_eq!(size, MAX_PLAINTEXT_BYTES + 1);
                assert_eq!(max, MAX_PLAINTEXT_BYTES);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }
}
