//! Bet vault: the persistence adapter
//!
//! Runs the full store/retrieve/update round-trip: compaction,
//! encryption and envelope handling on the way in, and the inverse on
//! the way out, against the redb row store. Batch retrieval isolates
//! per-record decrypt failures; poll transitions re-encrypt every
//! affected row under a fresh nonce.

use tracing::{info, warn};

use punt_envelope::EncryptedEnvelope;
use punt_payload::{BetData, BetPayload, Outcome};
use punt_store::{BetStore, EnvelopeUpdate, NewStoredBet, StoredBet};

use crate::client::PuntClient;
use crate::enclave::EnclaveKeyProvider;
use crate::{ClientError, ClientResult};

/// Placeholder title older clients wrote when no real title was known.
const PLACEHOLDER_TITLE: &str = "Prediction Market";

/// A bet as submitted by the caller.
#[derive(Debug, Clone)]
pub struct NewBet {
    pub wallet: String,
    pub poll_id: String,
    pub bet_data: BetData,
    /// ISO-8601 placement timestamp, produced by the caller.
    pub stored_at: String,
}

/// A decrypted bet joined with its record id.
#[derive(Debug, Clone, PartialEq)]
pub struct BetRecord {
    pub bet_id: u64,
    pub payload: BetPayload,
}

/// One record that could not be decrypted during batch retrieval.
#[derive(Debug)]
pub struct DecryptFailure {
    pub bet_id: u64,
    pub error: ClientError,
}

/// Result of a batch retrieval: decrypted records plus the rows that
/// were skipped.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub bets: Vec<BetRecord>,
    pub failures: Vec<DecryptFailure>,
}

/// A poll lifecycle transition to apply to all of its bets.
#[derive(Debug, Clone, Copy)]
pub enum PollTransition {
    /// Betting frozen; outcomes stay pending inside the ciphertext.
    Frozen,
    /// Poll resolved; bets on `winning_side` win, the rest lose.
    Resolved { winning_side: u8 },
}

impl PollTransition {
    fn outcome_for(&self, side: u8) -> String {
        match self {
            PollTransition::Frozen => "Frozen".to_string(),
            PollTransition::Resolved { winning_side } => {
                if side == *winning_side {
                    Outcome::Win.name().to_string()
                } else {
                    Outcome::Loss.name().to_string()
                }
            }
        }
    }

    fn winning_side(&self) -> Option<u8> {
        match self {
            PollTransition::Frozen => None,
            PollTransition::Resolved { winning_side } => Some(*winning_side),
        }
    }
}

/// Per-poll update tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated: usize,
    pub total: usize,
}

/// Encrypting persistence adapter over the row store.
pub struct BetVault<P> {
    client: PuntClient<P>,
    store: BetStore,
}

impl<P: EnclaveKeyProvider> BetVault<P> {
    pub fn new(client: PuntClient<P>, store: BetStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &PuntClient<P> {
        &self.client
    }

    pub fn store(&self) -> &BetStore {
        &self.store
    }

    /// Encrypt and store a new bet, returning the record id.
    ///
    /// If encryption fails nothing is written — plaintext is never
    /// stored as a fallback.
    pub async fn store_bet(&self, bet: NewBet) -> ClientResult<u64> {
        let payload = BetPayload {
            wallet: bet.wallet.clone(),
            poll_id: bet.poll_id.clone(),
            bet_data: bet.bet_data.clone(),
            stored_at: bet.stored_at.clone(),
        };

        let envelope = self.client.encrypt_bet_payload(&payload).await?;
        let encrypted_data = serde_json::to_string(&envelope.ciphertext)?;

        let id = self.store.insert(&NewStoredBet {
            wallet: bet.wallet,
            poll_id: bet.poll_id,
            side: bet.bet_data.side,
            amount: bet.bet_data.amount,
            poll_title: bet.bet_data.title,
            outcome: Outcome::Pending.name().to_string(),
            encrypted_data,
            nonce: envelope.nonce,
            arcis_public_key: envelope.arcis_public_key,
            stored_at: bet.stored_at,
        })?;

        info!(id, blocks = envelope.ciphertext.len(), "stored encrypted bet");
        Ok(id)
    }

    /// Retrieve and decrypt all bets for a wallet, newest first.
    ///
    /// A row that fails to decrypt (corrupt envelope, enclave key
    /// mismatch) is logged, counted and skipped; it never aborts the
    /// batch.
    pub async fn bets_for_wallet(&self, wallet: &str) -> ClientResult<BatchOutcome> {
        let rows = self.store.by_wallet(wallet)?;
        let total = rows.len();

        let mut outcome = BatchOutcome::default();
        for row in rows {
            match self.decrypt_row(&row).await {
                Ok(mut payload) => {
                    apply_title_fallback(&mut payload, &row);
                    outcome.bets.push(BetRecord {
                        bet_id: row.id,
                        payload,
                    });
                }
                Err(error) => {
                    self.client.metrics().decrypt_failures.inc();
                    warn!(id = row.id, %error, "failed to decrypt stored bet; skipping");
                    outcome.failures.push(DecryptFailure {
                        bet_id: row.id,
                        error,
                    });
                }
            }
        }

        info!(
            wallet_prefix = %wallet.chars().take(8).collect::<String>(),
            decrypted = outcome.bets.len(),
            total,
            "retrieved bets"
        );
        Ok(outcome)
    }

    /// Apply a poll transition to every bet on the poll.
    ///
    /// Each row is decrypted, its outcome mutated, re-encrypted under a
    /// fresh nonce and overwritten together with the denormalized
    /// plaintext columns. Rows that fail are skipped and tallied.
    pub async fn update_poll(
        &self,
        poll_id: &str,
        transition: PollTransition,
    ) -> ClientResult<UpdateSummary> {
        let rows = self.store.by_poll(poll_id)?;
        let total = rows.len();

        let mut updated = 0;
        for row in rows {
            match self.update_row(&row, &transition).await {
                Ok(()) => updated += 1,
                Err(error) => {
                    warn!(id = row.id, %error, "failed to update bet; skipping");
                }
            }
        }

        info!(poll_id, updated, total, "applied poll transition");
        Ok(UpdateSummary { updated, total })
    }

    async fn decrypt_row(&self, row: &StoredBet) -> ClientResult<BetPayload> {
        let ciphertext: Vec<String> = serde_json::from_str(&row.encrypted_data)?;
        let envelope = EncryptedEnvelope {
            ciphertext,
            nonce: row.nonce.clone(),
            arcis_public_key: row.arcis_public_key.clone(),
        };
        self.client.decrypt_bet_payload(&envelope).await
    }

    async fn update_row(&self, row: &StoredBet, transition: &PollTransition) -> ClientResult<()> {
        let new_outcome = transition.outcome_for(row.side);

        let mut payload = self.decrypt_row(row).await?;
        payload.bet_data.outcome = Some(new_outcome.clone());

        let envelope = self.client.encrypt_bet_payload(&payload).await?;
        let encrypted_data = serde_json::to_string(&envelope.ciphertext)?;

        self.store.update_outcome(
            row.id,
            &EnvelopeUpdate {
                outcome: &new_outcome,
                winning_side: transition.winning_side(),
                encrypted_data: &encrypted_data,
                nonce: &envelope.nonce,
                arcis_public_key: &envelope.arcis_public_key,
            },
        )?;
        Ok(())
    }
}

/// Prefer the stored poll title when the decrypted payload has none, or
/// only the placeholder older clients wrote.
fn apply_title_fallback(payload: &mut BetPayload, row: &StoredBet) {
    if let Some(title) = &row.poll_title {
        let decrypted_title = payload.bet_data.title.as_deref();
        if decrypted_title.is_none() || decrypted_title == Some(PLACEHOLDER_TITLE) {
            payload.bet_data.title = Some(title.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_outcomes() {
        let frozen = PollTransition::Frozen;
        assert_eq!(frozen.outcome_for(0), "Frozen");
        assert_eq!(frozen.winning_side(), None);

        let resolved = PollTransition::Resolved { winning_side: 1 };
        assert_eq!(resolved.outcome_for(1), "Win");
        assert_eq!(resolved.outcome_for(0), "Loss");
        assert_eq!(resolved.winning_side(), Some(1));
    }

    #[test]
    fn test_title_fallback() {
        let mut payload = BetPayload {
            wallet: "w".into(),
            poll_id: "p".into(),
            bet_data: BetData::new(0, 1.0),
            stored_at: "t".into(),
        };
        let mut row = StoredBet {
            id: 1,
            wallet: "w".into(),
            poll_id: "p".into(),
            side: 0,
            amount: 1.0,
            poll_title: Some("Real title".into()),
            outcome: "Pending".into(),
            winning_side: None,
            encrypted_data: "[]".into(),
            nonce: String::new(),
            arcis_public_key: String::new(),
            stored_at: "t".into(),
        };

        apply_title_fallback(&mut payload, &row);
        assert_eq!(payload.bet_data.title.as_deref(), Some("Real title"));

        payload.bet_data.title = Some(PLACEHOLDER_TITLE.into());
        apply_title_fallback(&mut payload, &row);
        assert_eq!(payload.bet_data.title.as_deref(), Some("Real title"));

        payload.bet_data.title = Some("Kept".into());
        apply_title_fallback(&mut payload, &row);
        assert_eq!(payload.bet_data.title.as_deref(), Some("Kept"));

        row.poll_title = None;
        payload.bet_data.title = None;
        apply_title_fallback(&mut payload, &row);
        assert_eq!(payload.bet_data.title, None);
    }
}
