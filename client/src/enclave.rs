//! Enclave public key provider and process-wide cache

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::metrics::ClientMetrics;
use crate::{ClientError, ClientResult};

/// Retry attempts while the enclave initializes.
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 10;

/// Delay between fetch attempts.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(500);

/// Byte offset of the x25519 cluster key inside the MXE account data:
/// past the 8-byte discriminator and the 32-byte authority.
const MXE_CLUSTER_KEY_OFFSET: usize = 40;

/// Source of the compute-enclave public key.
///
/// `Ok(None)` means the enclave has not finished initializing yet and
/// the caller should retry; `Err` is a transport failure.
#[async_trait::async_trait]
pub trait EnclaveKeyProvider: Send + Sync {
    async fn fetch_public_key(&self) -> ClientResult<Option<[u8; 32]>>;
}

/// Process-lifetime cache around a key provider.
///
/// The first caller triggers a fetch-and-retry sequence; concurrent
/// callers await the same in-flight attempt instead of issuing their
/// own (single flight). Once populated the key is never invalidated —
/// enclave key rotation requires a restart.
pub struct EnclaveKeyCache<P> {
    provider: P,
    key: OnceCell<[u8; 32]>,
    attempts: u32,
    delay: Duration,
    metrics: Arc<ClientMetrics>,
}

impl<P: EnclaveKeyProvider> EnclaveKeyCache<P> {
    pub fn new(provider: P, metrics: Arc<ClientMetrics>) -> Self {
        Self::with_retry_policy(provider, metrics, DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_DELAY)
    }

    pub fn with_retry_policy(
        provider: P,
        metrics: Arc<ClientMetrics>,
        attempts: u32,
        delay: Duration,
    ) -> Self {
        Self {
            provider,
            key: OnceCell::new(),
            attempts,
            delay,
            metrics,
        }
    }

    /// Get the enclave public key, fetching it on first use.
    pub async fn get(&self) -> ClientResult<[u8; 32]> {
        self.key
            .get_or_try_init(|| self.fetch_with_retry())
            .await
            .copied()
    }

    async fn fetch_with_retry(&self) -> ClientResult<[u8; 32]> {
        for attempt in 1..=self.attempts {
            match self.provider.fetch_public_key().await {
                Ok(Some(key)) => {
                    debug!(attempt, "fetched enclave public key");
                    return Ok(key);
                }
                Ok(None) => {
                    warn!(attempt, max = self.attempts, "enclave public key not yet available");
                }
                Err(err) => {
                    warn!(attempt, max = self.attempts, %err, "enclave public key fetch failed");
                }
            }

            if attempt < self.attempts {
                self.metrics.enclave_retries.inc();
                tokio::time::sleep(self.delay).await;
            }
        }

        Err(ClientError::EnclaveNotReady {
            attempts: self.attempts,
        })
    }
}

/// Reads the enclave key from the MXE account over Solana JSON-RPC.
pub struct RpcEnclaveProvider {
    http: reqwest::Client,
    rpc_url: String,
    mxe_account: String,
}

impl RpcEnclaveProvider {
    pub fn new(rpc_url: impl Into<String>, mxe_account: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
            mxe_account: mxe_account.into(),
        }
    }
}

#[async_trait::async_trait]
impl EnclaveKeyProvider for RpcEnclaveProvider {
    async fn fetch_public_key(&self) -> ClientResult<Option<[u8; 32]>> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "getAccountInfo",
            "params": [
                &self.mxe_account,
                { "encoding": "base64", "commitment": "confirmed" },
            ],
            "id": 1,
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Rpc(format!("HTTP error: {}", response.status())));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        if let Some(error) = body.get("error") {
            return Err(ClientError::Rpc(format!("RPC error: {error}")));
        }

        // A missing account, short data or all-zero key all mean the
        // enclave has not published its cluster key yet.
        let Some(encoded) = body
            .pointer("/result/value/data/0")
            .and_then(|v| v.as_str())
        else {
            return Ok(None);
        };

        let data = BASE64
            .decode(encoded)
            .map_err(|e| ClientError::Rpc(format!("Account data decode failed: {e}")))?;

        let Some(raw) = data.get(MXE_CLUSTER_KEY_OFFSET..MXE_CLUSTER_KEY_OFFSET + 32) else {
            return Ok(None);
        };

        let key: [u8; 32] = raw.try_into().expect("slice is 32 bytes");
        if key == [0u8; 32] {
            return Ok(None);
        }
        Ok(Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StaticProvider {
        key: [u8; 32],
        fetches: AtomicU32,
    }

    #[async_trait::async_trait]
    impl EnclaveKeyProvider for StaticProvider {
        async fn fetch_public_key(&self) -> ClientResult<Option<[u8; 32]>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.key))
        }
    }

    struct SlowStartProvider {
        key: [u8; 32],
        ready_after: u32,
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl EnclaveKeyProvider for SlowStartProvider {
        async fn fetch_public_key(&self) -> ClientResult<Option<[u8; 32]>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.ready_after {
                Ok(Some(self.key))
            } else {
                Ok(None)
            }
        }
    }

    struct NeverReadyProvider;

    #[async_trait::async_trait]
    impl EnclaveKeyProvider for NeverReadyProvider {
        async fn fetch_public_key(&self) -> ClientResult<Option<[u8; 32]>> {
            Ok(None)
        }
    }

    fn metrics() -> Arc<ClientMetrics> {
        Arc::new(ClientMetrics::default())
    }

    #[tokio::test]
    async fn test_get_caches_key() {
        let cache = EnclaveKeyCache::new(
            StaticProvider {
                key: [5u8; 32],
                fetches: AtomicU32::new(0),
            },
            metrics(),
        );

        assert_eq!(cache.get().await.unwrap(), [5u8; 32]);
        assert_eq!(cache.get().await.unwrap(), [5u8; 32]);
        assert_eq!(cache.provider.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_ready() {
        let cache = EnclaveKeyCache::with_retry_policy(
            SlowStartProvider {
                key: [6u8; 32],
                ready_after: 3,
                calls: AtomicU32::new(0),
            },
            metrics(),
            5,
            Duration::from_millis(1),
        );

        assert_eq!(cache.get().await.unwrap(), [6u8; 32]);
        assert_eq!(cache.provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_error() {
        let cache = EnclaveKeyCache::with_retry_policy(
            NeverReadyProvider,
            metrics(),
            3,
            Duration::from_millis(1),
        );

        match cache.get().await {
            Err(ClientError::EnclaveNotReady { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected EnclaveNotReady, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_use_is_single_flight() {
        let cache = Arc::new(EnclaveKeyCache::new(
            StaticProvider {
                key: [7u8; 32],
                fetches: AtomicU32::new(0),
            },
            metrics(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get().await.unwrap() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), [7u8; 32]);
        }
        assert_eq!(cache.provider.fetches.load(Ordering::SeqCst), 1);
    }
}
