//! List Command - Retrieve and decrypt a wallet's bets

use std::path::PathBuf;

use clap::Args;

/// List and decrypt a wallet's bets
#[derive(Args)]
pub struct ListCommand {
    /// Bettor wallet address
    #[arg(short, long)]
    wallet: String,

    /// Print full decrypted payloads as JSON
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    pub async fn execute(self, db_path: PathBuf) -> anyhow::Result<()> {
        let vault = super::open_vault(&db_path)?;
        let outcome = vault.bets_for_wallet(&self.wallet).await?;

        if self.json {
            let payloads: Vec<_> = outcome.bets.iter().map(|bet| &bet.payload).collect();
            println!("{}", serde_json::to_string_pretty(&payloads)?);
        } else {
            for bet in &outcome.bets {
                let data = &bet.payload.bet_data;
                println!(
                    "#{:<6} {}  side={} amount={} outcome={} placed={}",
                    bet.bet_id,
                    bet.payload.poll_id,
                    data.side,
                    data.amount,
                    data.outcome.as_deref().unwrap_or("Pending"),
                    bet.payload.stored_at,
                );
            }
        }

        println!(
            "{} bet(s) decrypted, {} skipped",
            outcome.bets.len(),
            outcome.failures.len()
        );
        Ok(())
    }
}
