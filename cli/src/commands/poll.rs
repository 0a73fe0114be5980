//! Poll Commands - Freeze or resolve a poll's bets

use std::path::PathBuf;

use clap::Args;

use punt_client::PollTransition;

/// Freeze all bets on a poll
#[derive(Args)]
pub struct FreezeCommand {
    /// Poll identifier
    #[arg(short, long)]
    poll: String,
}

impl FreezeCommand {
    pub async fn execute(self, db_path: PathBuf) -> anyhow::Result<()> {
        let vault = super::open_vault(&db_path)?;
        let summary = vault.update_poll(&self.poll, PollTransition::Frozen).await?;
        println!("Froze {}/{} bet(s)", summary.updated, summary.total);
        Ok(())
    }
}

/// Resolve a poll and settle outcomes
#[derive(Args)]
pub struct ResolveCommand {
    /// Poll identifier
    #[arg(short, long)]
    poll: String,

    /// Winning side (0 or 1)
    #[arg(short, long)]
    winning_side: u8,
}

impl ResolveCommand {
    pub async fn execute(self, db_path: PathBuf) -> anyhow::Result<()> {
        if self.winning_side > 1 {
            anyhow::bail!("winning-side must be 0 or 1, got {}", self.winning_side);
        }

        let vault = super::open_vault(&db_path)?;
        let summary = vault
            .update_poll(
                &self.poll,
                PollTransition::Resolved {
                    winning_side: self.winning_side,
                },
            )
            .await?;
        println!("Resolved {}/{} bet(s)", summary.updated, summary.total);
        Ok(())
    }
}
