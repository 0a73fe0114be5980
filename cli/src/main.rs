//! Punt CLI
//!
//! Operator interface for the confidential bet pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Store an encrypted bet
//! punt store --wallet 9xQW... --poll poll-abc123 --side 0 --amount 0.5
//!
//! # List and decrypt a wallet's bets
//! punt list --wallet 9xQW...
//!
//! # Freeze a poll (no more bets, outcomes stay pending)
//! punt freeze --poll poll-abc123
//!
//! # Resolve a poll
//! punt resolve --poll poll-abc123 --winning-side 1
//!
//! # Verify environment configuration
//! punt config-check
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::{ConfigCheckCommand, FreezeCommand, ListCommand, ResolveCommand, StoreCommand};

/// Punt confidential bet pipeline
#[derive(Parser)]
#[command(name = "punt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Encrypted bet storage and retrieval", long_about = None)]
struct Cli {
    /// Path to the bet database
    #[arg(short, long, global = true, env = "PUNT_DB_PATH", default_value = "./punt_bets.redb")]
    db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt and store a bet
    Store(StoreCommand),

    /// List and decrypt a wallet's bets
    List(ListCommand),

    /// Freeze all bets on a poll
    Freeze(FreezeCommand),

    /// Resolve a poll and settle outcomes
    Resolve(ResolveCommand),

    /// Verify environment configuration
    ConfigCheck(ConfigCheckCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Store(cmd) => cmd.execute(cli.db_path).await,
        Commands::List(cmd) => cmd.execute(cli.db_path).await,
        Commands::Freeze(cmd) => cmd.execute(cli.db_path).await,
        Commands::Resolve(cmd) => cmd.execute(cli.db_path).await,
        Commands::ConfigCheck(cmd) => cmd.execute(),
    }
}
