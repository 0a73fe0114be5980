//! Encryption entry points

use std::sync::Arc;

use tracing::{debug, warn};

use punt_cipher::{derive_public_key, generate_nonce, RescueCipher, SharedSecret};
use punt_codec::{compress, decompress, pad, trim};
use punt_envelope::EncryptedEnvelope;
use punt_payload::{compact, BetPayload, WirePayload};

use crate::config::ClientConfig;
use crate::enclave::{EnclaveKeyCache, EnclaveKeyProvider};
use crate::metrics::ClientMetrics;
use crate::ClientResult;

/// The confidential bet client.
///
/// Owns the configuration, the enclave key cache and the pipeline
/// counters. Encryption and decryption are pure CPU once the enclave
/// key is cached; the only suspension point is the first key fetch.
pub struct PuntClient<P> {
    config: ClientConfig,
    enclave: EnclaveKeyCache<P>,
    metrics: Arc<ClientMetrics>,
}

impl<P: EnclaveKeyProvider> PuntClient<P> {
    /// Build a client over a key provider with the default retry policy.
    pub fn new(config: ClientConfig, provider: P) -> Self {
        let metrics = Arc::new(ClientMetrics::default());
        let enclave = EnclaveKeyCache::new(provider, metrics.clone());
        Self {
            config,
            enclave,
            metrics,
        }
    }

    /// Build a client with an explicit enclave cache (tests use this to
    /// shrink the retry delay).
    pub fn with_enclave_cache(
        config: ClientConfig,
        enclave: EnclaveKeyCache<P>,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self {
            config,
            enclave,
            metrics,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    /// The client's x25519 public key, base64-encoded as it appears in
    /// envelopes.
    pub fn client_public_key_base64(&self) -> String {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine as _;
        BASE64.encode(derive_public_key(self.config.client_secret.bytes()))
    }

    async fn cipher(&self) -> ClientResult<RescueCipher> {
        let enclave_key = self.enclave.get().await?;
        let shared = SharedSecret::derive(self.config.client_secret.bytes(), &enclave_key);
        Ok(RescueCipher::new(&shared))
    }

    /// Encrypt a bet payload into its transport envelope.
    ///
    /// Compacts the payload, enforces the word-budget ceiling before any
    /// cipher call, and encrypts under a fresh random nonce.
    pub async fn encrypt_bet_payload(
        &self,
        payload: &BetPayload,
    ) -> ClientResult<EncryptedEnvelope> {
        let compacted = compact(payload);
        let plaintext = compacted.to_plaintext()?;
        let words = compress(&pad(&plaintext))?;

        let cipher = self.cipher().await?;
        let nonce = generate_nonce()?;
        let blocks = cipher.encrypt(&words, &nonce);

        debug!(
            plaintext_bytes = plaintext.len(),
            blocks = blocks.len(),
            "encrypted bet payload"
        );

        Ok(punt_envelope::build(
            &blocks,
            &nonce,
            &derive_public_key(self.config.client_secret.bytes()),
        ))
    }

    /// Decrypt a transport envelope back into a bet payload.
    ///
    /// Accepts both the compact and the legacy plaintext encodings; the
    /// returned wallet and poll id hold only the retained prefixes for
    /// compact envelopes.
    pub async fn decrypt_bet_payload(
        &self,
        envelope: &EncryptedEnvelope,
    ) -> ClientResult<BetPayload> {
        let parsed = punt_envelope::parse(envelope)?;

        let cipher = self.cipher().await?;
        let words = cipher.decrypt(&parsed.blocks, &parsed.nonce);
        let bytes = decompress(&words);

        let wire = WirePayload::decode(trim(&bytes))?;
        if wire.is_legacy() {
            self.metrics.legacy_payloads.inc();
            warn!("decrypted a legacy-format bet payload; schedule re-encryption");
        }
        Ok(wire.into_payload())
    }
}
