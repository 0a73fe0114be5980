//! Store Command - Encrypt and persist a bet

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use clap::Args;

use punt_client::NewBet;
use punt_payload::BetData;

/// Encrypt and store a bet
#[derive(Args)]
pub struct StoreCommand {
    /// Bettor wallet address
    #[arg(short, long)]
    wallet: String,

    /// Poll identifier
    #[arg(short, long)]
    poll: String,

    /// Chosen side (0 or 1)
    #[arg(short, long)]
    side: u8,

    /// Stake amount
    #[arg(short, long)]
    amount: f64,

    /// Human-readable poll title
    #[arg(short, long)]
    title: Option<String>,

    /// Placement timestamp (ISO-8601); defaults to now
    #[arg(long)]
    stored_at: Option<String>,
}

impl StoreCommand {
    pub async fn execute(self, db_path: PathBuf) -> anyhow::Result<()> {
        if self.side > 1 {
            anyhow::bail!("side must be 0 or 1, got {}", self.side);
        }

        let vault = super::open_vault(&db_path)?;

        let stored_at = self
            .stored_at
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        let mut bet_data = BetData::new(self.side, self.amount);
        bet_data.title = self.title;

        let id = vault
            .store_bet(NewBet {
                wallet: self.wallet,
                poll_id: self.poll,
                bet_data,
                stored_at,
            })
            .await?;

        println!("Stored encrypted bet #{id}");
        Ok(())
    }
}
