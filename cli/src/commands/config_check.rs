//! Config Check Command - Verify environment configuration

use clap::Args;

use punt_client::{ClientConfig, PuntClient, RpcEnclaveProvider};

/// Verify environment configuration
#[derive(Args)]
pub struct ConfigCheckCommand {}

impl ConfigCheckCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let config = ClientConfig::from_env()?;

        println!("RPC endpoint:       {}", config.rpc_url);
        println!("MXE account:        {}", config.mxe_program_id);
        println!(
            "Store computation:  {}",
            config.store_computation.as_deref().unwrap_or("(not set)")
        );

        let provider =
            RpcEnclaveProvider::new(config.rpc_url.as_str(), config.mxe_program_id.as_str());
        let client = PuntClient::new(config, provider);
        println!("Client public key:  {}", client.client_public_key_base64());
        println!();
        println!("Configuration OK");
        Ok(())
    }
}
