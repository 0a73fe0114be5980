//! CLI commands

mod config_check;
mod list;
mod poll;
mod store;

pub use config_check::ConfigCheckCommand;
pub use list::ListCommand;
pub use poll::{FreezeCommand, ResolveCommand};
pub use store::StoreCommand;

use std::path::Path;

use punt_client::{BetVault, ClientConfig, PuntClient, RpcEnclaveProvider};
use punt_store::BetStore;

/// Build a vault from env configuration and the database path.
pub(crate) fn open_vault(db_path: &Path) -> anyhow::Result<BetVault<RpcEnclaveProvider>> {
    let config = ClientConfig::from_env()?;
    let provider = RpcEnclaveProvider::new(config.rpc_url.as_str(), config.mxe_program_id.as_str());
    let client = PuntClient::new(config, provider);
    let store = BetStore::open(db_path)?;
    Ok(BetVault::new(client, store))
}
