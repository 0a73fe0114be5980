//! Encrypted bet row storage

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::{StoreError, StoreResult};

/// Table for bet rows by record id
const BETS: TableDefinition<u64, &[u8]> = TableDefinition::new("bets");

/// Index: wallet -> list of record ids
const BETS_BY_WALLET: TableDefinition<&str, &[u8]> = TableDefinition::new("bets_by_wallet");

/// Index: poll id -> list of record ids
const BETS_BY_POLL: TableDefinition<&str, &[u8]> = TableDefinition::new("bets_by_poll");

/// Store metadata (id counter)
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_ID_KEY: &str = "next_id";

/// A persisted encrypted bet row.
///
/// The envelope fields (`encrypted_data`, `nonce`, `arcis_public_key`)
/// sit next to plaintext columns used for indexing and display.
/// `encrypted_data` is the JSON-encoded list of base64 ciphertext blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBet {
    pub id: u64,
    pub wallet: String,
    pub poll_id: String,
    pub side: u8,
    pub amount: f64,
    pub poll_title: Option<String>,
    /// Denormalized status string (Pending, Frozen, Win, Loss).
    pub outcome: String,
    pub winning_side: Option<u8>,
    pub encrypted_data: String,
    /// Hex-encoded encryption nonce.
    pub nonce: String,
    /// Base64-encoded sender public key.
    pub arcis_public_key: String,
    pub stored_at: String,
}

/// Column values for a new row; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewStoredBet {
    pub wallet: String,
    pub poll_id: String,
    pub side: u8,
    pub amount: f64,
    pub poll_title: Option<String>,
    pub outcome: String,
    pub encrypted_data: String,
    pub nonce: String,
    pub arcis_public_key: String,
    pub stored_at: String,
}

/// Replacement envelope and status for an existing row.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeUpdate<'a> {
    pub outcome: &'a str,
    pub winning_side: Option<u8>,
    pub encrypted_data: &'a str,
    pub nonce: &'a str,
    pub arcis_public_key: &'a str,
}

/// Bet storage interface
pub struct BetStore {
    db: Arc<Database>,
}

impl BetStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::with_database(Arc::new(db))
    }

    /// Wrap an already-open database.
    pub fn with_database(db: Arc<Database>) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(BETS)?;
            let _ = write_txn.open_table(BETS_BY_WALLET)?;
            let _ = write_txn.open_table(BETS_BY_POLL)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a new bet row, returning the assigned record id.
    ///
    /// The row and both index entries are written in one transaction.
    pub fn insert(&self, bet: &NewStoredBet) -> StoreResult<u64> {
        let wallet_ids = self.index_ids(BETS_BY_WALLET, &bet.wallet)?;
        let poll_ids = self.index_ids(BETS_BY_POLL, &bet.poll_id)?;

        let write_txn = self.db.begin_write()?;
        let id;
        {
            let mut meta = write_txn.open_table(META)?;
            id = meta.get(NEXT_ID_KEY)?.map(|v| v.value()).unwrap_or(1);
            meta.insert(NEXT_ID_KEY, id + 1)?;

            let row = StoredBet {
                id,
                wallet: bet.wallet.clone(),
                poll_id: bet.poll_id.clone(),
                side: bet.side,
                amount: bet.amount,
                poll_title: bet.poll_title.clone(),
                outcome: bet.outcome.clone(),
                winning_side: None,
                encrypted_data: bet.encrypted_data.clone(),
                nonce: bet.nonce.clone(),
                arcis_public_key: bet.arcis_public_key.clone(),
                stored_at: bet.stored_at.clone(),
            };
            let encoded = bincode::serialize(&row)?;

            let mut bets = write_txn.open_table(BETS)?;
            bets.insert(id, encoded.as_slice())?;

            let mut by_wallet = write_txn.open_table(BETS_BY_WALLET)?;
            let mut ids = wallet_ids;
            ids.push(id);
            by_wallet.insert(bet.wallet.as_str(), bincode::serialize(&ids)?.as_slice())?;

            let mut by_poll = write_txn.open_table(BETS_BY_POLL)?;
            let mut ids = poll_ids;
            ids.push(id);
            by_poll.insert(bet.poll_id.as_str(), bincode::serialize(&ids)?.as_slice())?;
        }
        write_txn.commit()?;

        Ok(id)
    }

    /// Get a bet row by record id.
    pub fn get(&self, id: u64) -> StoreResult<Option<StoredBet>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BETS)?;

        let result = match table.get(id)? {
            Some(data) => {
                let bytes = data.value().to_vec();
                Some(bincode::deserialize(&bytes)?)
            }
            None => None,
        };

        Ok(result)
    }

    /// All bets for a wallet, newest stored_at first.
    pub fn by_wallet(&self, wallet: &str) -> StoreResult<Vec<StoredBet>> {
        let mut rows = self.rows_for_index(BETS_BY_WALLET, wallet)?;
        rows.sort_by(|a, b| b.stored_at.cmp(&a.stored_at));
        Ok(rows)
    }

    /// All bets placed on a poll, in insertion order.
    pub fn by_poll(&self, poll_id: &str) -> StoreResult<Vec<StoredBet>> {
        self.rows_for_index(BETS_BY_POLL, poll_id)
    }

    /// Overwrite a row's envelope and denormalized status columns.
    pub fn update_outcome(&self, id: u64, update: &EnvelopeUpdate<'_>) -> StoreResult<()> {
        let mut row = self.get(id)?.ok_or(StoreError::BetNotFound(id))?;
        row.outcome = update.outcome.to_string();
        row.winning_side = update.winning_side;
        row.encrypted_data = update.encrypted_data.to_string();
        row.nonce = update.nonce.to_string();
        row.arcis_public_key = update.arcis_public_key.to_string();
        let encoded = bincode::serialize(&row)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut bets = write_txn.open_table(BETS)?;
            bets.insert(id, encoded.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Total number of stored bets.
    pub fn count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BETS)?;
        Ok(table.len()?)
    }

    fn index_ids(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
    ) -> StoreResult<Vec<u64>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(table)?;
        let ids = match index.get(key)? {
            Some(data) => {
                let bytes = data.value().to_vec();
                bincode::deserialize(&bytes).unwrap_or_default()
            }
            None => Vec::new(),
        };
        Ok(ids)
    }

    fn rows_for_index(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
    ) -> StoreResult<Vec<StoredBet>> {
        let ids = self.index_ids(table, key)?;

        let read_txn = self.db.begin_read()?;
        let bets = read_txn.open_table(BETS)?;

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(data) = bets.get(id)? {
                let bytes = data.value().to_vec();
                rows.push(bincode::deserialize(&bytes)?);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_bet(wallet: &str, poll_id: &str, stored_at: &str) -> NewStoredBet {
        NewStoredBet {
            wallet: wallet.to_string(),
            poll_id: poll_id.to_string(),
            side: 0,
            amount: 0.5,
            poll_title: Some("Test poll".to_string()),
            outcome: "Pending".to_string(),
            encrypted_data: r#"["AAAA"]"#.to_string(),
            nonce: "00".repeat(16),
            arcis_public_key: "cGs=".to_string(),
            stored_at: stored_at.to_string(),
        }
    }

    fn open_store(dir: &tempfile::TempDir) -> BetStore {
        BetStore::open(dir.path().join("bets.redb")).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let id = store
            .insert(&test_bet("wallet-a", "poll-1", "2025-01-01T00:00:00Z"))
            .unwrap();

        let row = store.get(id).unwrap().unwrap();
        assert_eq!(row.wallet, "wallet-a");
        assert_eq!(row.outcome, "Pending");
        assert_eq!(row.winning_side, None);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let first = store
            .insert(&test_bet("w", "p", "2025-01-01T00:00:00Z"))
            .unwrap();
        let second = store
            .insert(&test_bet("w", "p", "2025-01-01T00:00:01Z"))
            .unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_by_wallet_newest_first() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store
            .insert(&test_bet("wallet-a", "poll-1", "2025-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert(&test_bet("wallet-a", "poll-2", "2025-01-02T00:00:00Z"))
            .unwrap();
        store
            .insert(&test_bet("wallet-b", "poll-1", "2025-01-03T00:00:00Z"))
            .unwrap();

        let rows = store.by_wallet("wallet-a").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].poll_id, "poll-2");
        assert_eq!(rows[1].poll_id, "poll-1");
    }

    #[test]
    fn test_by_poll() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        for i in 0..3 {
            store
                .insert(&test_bet(
                    &format!("wallet-{i}"),
                    "poll-1",
                    "2025-01-01T00:00:00Z",
                ))
                .unwrap();
        }
        store
            .insert(&test_bet("wallet-x", "poll-2", "2025-01-01T00:00:00Z"))
            .unwrap();

        assert_eq!(store.by_poll("poll-1").unwrap().len(), 3);
        assert_eq!(store.by_poll("poll-2").unwrap().len(), 1);
    }

    #[test]
    fn test_update_outcome() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let id = store
            .insert(&test_bet("wallet-a", "poll-1", "2025-01-01T00:00:00Z"))
            .unwrap();

        store
            .update_outcome(
                id,
                &EnvelopeUpdate {
                    outcome: "Win",
                    winning_side: Some(0),
                    encrypted_data: r#"["BBBB"]"#,
                    nonce: "11".repeat(16).as_str(),
                    arcis_public_key: "cGsy",
                },
            )
            .unwrap();

        let row = store.get(id).unwrap().unwrap();
        assert_eq!(row.outcome, "Win");
        assert_eq!(row.winning_side, Some(0));
        assert_eq!(row.encrypted_data, r#"["BBBB"]"#);
        // Indexing columns are untouched
        assert_eq!(row.wallet, "wallet-a");
        assert_eq!(row.stored_at, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_update_missing_row() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let result = store.update_outcome(
            99,
            &EnvelopeUpdate {
                outcome: "Win",
                winning_side: None,
                encrypted_data: "[]",
                nonce: "",
                arcis_public_key: "",
            },
        );
        assert!(matches!(result, Err(StoreError::BetNotFound(99))));
    }

    #[test]
    fn test_empty_wallet_lookup() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        assert!(store.by_wallet("nobody").unwrap().is_empty());
    }
}
