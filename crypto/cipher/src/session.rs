//! Shared-secret derivation and the word cipher session

use curve25519_dalek::constants::X25519_BASEPOINT;
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::Scalar;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::rescue;
use crate::{CipherError, CipherResult};

/// Nonce size in bytes.
pub const NONCE_BYTES: usize = 16;

/// Per-encryption nonce.
pub type Nonce = [u8; NONCE_BYTES];

/// One encrypted 128-bit word on the wire.
pub type CiphertextBlock = [u8; 16];

/// Domain separation labels for HKDF
mod hkdf_labels {
    pub const SHARED_SECRET: &[u8] = b"punt-ecdh-shared-secret";
    pub const CIPHER_KEY: &[u8] = b"punt-rescue-cipher-key";
}

/// Clamp a secret key per X25519 spec.
/// Sets bits 0,1,2 to 0, bit 255 to 0, bit 254 to 1.
pub fn clamp_secret(secret: &[u8; 32]) -> [u8; 32] {
    let mut clamped = *secret;
    clamped[0] &= 248;
    clamped[31] &= 127;
    clamped[31] |= 64;
    clamped
}

/// Derive the x25519 public key for a secret key.
pub fn derive_public_key(secret: &[u8; 32]) -> [u8; 32] {
    let clamped = clamp_secret(secret);
    let scalar = Scalar::from_bytes_mod_order(clamped);
    (scalar * X25519_BASEPOINT).to_bytes()
}

/// Generate a fresh 16-byte nonce from the OS CSPRNG.
///
/// Nonce reuse under one shared secret breaks confidentiality; callers
/// must generate a new nonce for every encryption, including re-encrypt
/// on update.
pub fn generate_nonce() -> CipherResult<Nonce> {
    let mut nonce = [0u8; NONCE_BYTES];
    getrandom::getrandom(&mut nonce).map_err(|e| CipherError::Rng(e.to_string()))?;
    Ok(nonce)
}

/// Symmetric key material agreed between the client and the enclave.
///
/// Computed as HKDF-SHA256 over the curve25519 Montgomery product of the
/// clamped client secret and the enclave public key. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Run the key agreement against the enclave public key.
    pub fn derive(client_secret: &[u8; 32], enclave_public: &[u8; 32]) -> Self {
        let clamped = clamp_secret(client_secret);
        let scalar = Scalar::from_bytes_mod_order(clamped);
        let point = MontgomeryPoint(*enclave_public);
        let raw = (scalar * point).to_bytes();

        let hkdf = Hkdf::<Sha256>::new(None, &raw);
        let mut output = [0u8; 32];
        hkdf.expand(hkdf_labels::SHARED_SECRET, &mut output)
            .expect("HKDF output length is valid");
        SharedSecret(output)
    }

    /// Raw shared-secret bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

/// Rescue-permutation keystream cipher over 128-bit words.
///
/// Encryption masks word `i` with the keystream word at position
/// `(nonce, i)` by wrapping addition; decryption subtracts the same
/// keystream. Confidentiality only — there is no authentication tag, so
/// tampering is undetected until a downstream decode fails.
pub struct RescueCipher {
    key: [u128; 2],
}

impl RescueCipher {
    /// Key the cipher from a derived shared secret.
    pub fn new(secret: &SharedSecret) -> Self {
        let hkdf = Hkdf::<Sha256>::new(None, secret.as_bytes());
        let mut okm = [0u8; 32];
        hkdf.expand(hkdf_labels::CIPHER_KEY, &mut okm)
            .expect("HKDF output length is valid");

        let k0 = u128::from_le_bytes(okm[..16].try_into().expect("okm is 32 bytes"));
        let k1 = u128::from_le_bytes(okm[16..].try_into().expect("okm is 32 bytes"));
        okm.zeroize();

        Self {
            key: [rescue::reduce_once(k0), rescue::reduce_once(k1)],
        }
    }

    /// Encrypt a word sequence under a fresh nonce.
    pub fn encrypt(&self, words: &[u128], nonce: &Nonce) -> Vec<CiphertextBlock> {
        let nonce_word = u128::from_le_bytes(*nonce);
        words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let keystream = rescue::keystream_word(&self.key, nonce_word, i as u64);
                word.wrapping_add(keystream).to_le_bytes()
            })
            .collect()
    }

    /// Decrypt ciphertext blocks produced by [`Self::encrypt`].
    ///
    /// A corrupted block or nonce yields garbage words rather than an
    /// error; this layer has no integrity check.
    pub fn decrypt(&self, blocks: &[CiphertextBlock], nonce: &Nonce) -> Vec<u128> {
        let nonce_word = u128::from_le_bytes(*nonce);
        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let keystream = rescue::keystream_word(&self.key, nonce_word, i as u64);
                u128::from_le_bytes(*block).wrapping_sub(keystream)
            })
            .collect()
    }
}

impl std::fmt::Debug for RescueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RescueCipher").finish_non_exhaustive()
    }
}
