//! Client configuration
//!
//! All values come from the environment. The client secret key accepts
//! base58 or base64 encoding and must decode to exactly 32 bytes.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{ClientError, ClientResult};

/// Primary RPC endpoint variable.
pub const ENV_RPC_URL: &str = "ARCIUM_SOLANA_RPC_URL";
/// Fallback RPC endpoint variable.
pub const ENV_RPC_URL_FALLBACK: &str = "PUNT_NETWORK_URL";
/// Address of the MXE account holding the enclave cluster key.
pub const ENV_MXE_PROGRAM_ID: &str = "ARCIUM_MXE_PROGRAM_ID";
/// Client x25519 secret key (base58 or base64).
pub const ENV_CLIENT_SECRET: &str = "ARCIUM_CLIENT_SECRET_KEY";
/// Optional name of the store computation definition.
pub const ENV_STORE_COMPUTATION: &str = "ARCIUM_STORE_COMP_NAME";

/// The client's long-lived x25519 secret key. Wiped on drop, redacted in
/// debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ClientSecret([u8; 32]);

impl ClientSecret {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret").finish_non_exhaustive()
    }
}

/// Configuration for the confidential bet client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// JSON-RPC endpoint used to read the enclave public key.
    pub rpc_url: String,
    /// Address of the MXE account.
    pub mxe_program_id: String,
    /// Client x25519 secret key.
    pub client_secret: ClientSecret,
    /// Computation definition invoked when submitting on-chain.
    pub store_computation: Option<String>,
}

impl ClientConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> ClientResult<Self> {
        let rpc_url = std::env::var(ENV_RPC_URL)
            .or_else(|_| std::env::var(ENV_RPC_URL_FALLBACK))
            .map_err(|_| {
                ClientError::Config(format!(
                    "{ENV_RPC_URL} or {ENV_RPC_URL_FALLBACK} must be configured"
                ))
            })?;
        let mxe_program_id = require_env(ENV_MXE_PROGRAM_ID)?;
        let raw_secret = require_env(ENV_CLIENT_SECRET)?;
        let client_secret = ClientSecret::new(decode_secret_key(&raw_secret)?);
        let store_computation = std::env::var(ENV_STORE_COMPUTATION).ok();

        Ok(Self {
            rpc_url,
            mxe_program_id,
            client_secret,
            store_computation,
        })
    }
}

fn require_env(name: &str) -> ClientResult<String> {
    std::env::var(name).map_err(|_| ClientError::Config(format!("{name} is not set")))
}

/// Decode a secret key from base58, falling back to base64.
pub fn decode_secret_key(raw: &str) -> ClientResult<[u8; 32]> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let decoded = match bs58::decode(raw).into_vec() {
        Ok(bytes) => bytes,
        Err(_) => BASE64.decode(raw).map_err(|_| {
            ClientError::Config(
                "Failed to decode client secret key; expected base58 or base64".to_string(),
            )
        })?,
    };

    decoded.try_into().map_err(|bytes: Vec<u8>| {
        ClientError::Config(format!(
            "Client secret key must be 32 bytes, got {}",
            bytes.len()
        ))
    })
}
