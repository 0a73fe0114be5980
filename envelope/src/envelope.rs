//! Envelope building and parsing

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{EnvelopeError, EnvelopeResult};

/// The persisted and transported encryption envelope.
///
/// Each ciphertext block is base64-encoded independently — the list
/// length is semantically meaningful (it equals the word count of the
/// padded plaintext). The nonce is hex, the sender key base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    pub ciphertext: Vec<String>,
    pub nonce: String,
    pub arcis_public_key: String,
}

/// The decoded contents of an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    pub blocks: Vec<[u8; 16]>,
    pub nonce: [u8; 16],
    pub sender_public_key: [u8; 32],
}

/// Package ciphertext blocks, nonce and sender key into an envelope.
pub fn build(blocks: &[[u8; 16]], nonce: &[u8; 16], sender_public_key: &[u8; 32]) -> EncryptedEnvelope {
    EncryptedEnvelope {
        ciphertext: blocks.iter().map(|block| BASE64.encode(block)).collect(),
        nonce: hex::encode(nonce),
        arcis_public_key: BASE64.encode(sender_public_key),
    }
}

/// Decode an envelope back into ciphertext blocks, nonce and sender key.
pub fn parse(envelope: &EncryptedEnvelope) -> EnvelopeResult<ParsedEnvelope> {
    if envelope.ciphertext.is_empty() {
        return Err(EnvelopeError::EmptyCiphertext);
    }

    let mut blocks = Vec::with_capacity(envelope.ciphertext.len());
    for (index, encoded) in envelope.ciphertext.iter().enumerate() {
        let raw = BASE64.decode(encoded)?;
        let block: [u8; 16] = raw
            .try_into()
            .map_err(|raw: Vec<u8>| EnvelopeError::BlockLength {
                index,
                len: raw.len(),
            })?;
        blocks.push(block);
    }

    let raw_nonce = hex::decode(&envelope.nonce)?;
    let nonce: [u8; 16] = raw_nonce
        .try_into()
        .map_err(|raw: Vec<u8>| EnvelopeError::NonceLength { len: raw.len() })?;

    let raw_key = BASE64.decode(&envelope.arcis_public_key)?;
    let sender_public_key: [u8; 32] = raw_key
        .try_into()
        .map_err(|raw: Vec<u8>| EnvelopeError::KeyLength { len: raw.len() })?;

    Ok(ParsedEnvelope {
        blocks,
        nonce,
        sender_public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envelope() -> EncryptedEnvelope {
        build(&[[1u8; 16], [2u8; 16]], &[3u8; 16], &[4u8; 32])
    }

    #[test]
    fn test_build_encodings() {
        let envelope = sample_envelope();
        assert_eq!(envelope.ciphertext.len(), 2);
        assert_eq!(envelope.nonce, "03".repeat(16));
        assert_eq!(envelope.nonce.len(), 32);
    }

    #[test]
    fn test_parse_roundtrip() {
        let parsed = parse(&sample_envelope()).unwrap();
        assert_eq!(parsed.blocks, vec![[1u8; 16], [2u8; 16]]);
        assert_eq!(parsed.nonce, [3u8; 16]);
        assert_eq!(parsed.sender_public_key, [4u8; 32]);
    }

    #[test]
    fn test_parse_rejects_empty_ciphertext() {
        let mut envelope = sample_envelope();
        envelope.ciphertext.clear();
        assert!(matches!(
            parse(&envelope),
            Err(EnvelopeError::EmptyCiphertext)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_block_length() {
        let mut envelope = sample_envelope();
        envelope.ciphertext[1] = BASE64.encode([9u8; 8]);
        assert!(matches!(
            parse(&envelope),
            Err(EnvelopeError::BlockLength { index: 1, len: 8 })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_nonce() {
        let mut envelope = sample_envelope();
        envelope.nonce = "zz".into();
        assert!(matches!(parse(&envelope), Err(EnvelopeError::Hex(_))));

        envelope.nonce = "0102".into();
        assert!(matches!(
            parse(&envelope),
            Err(EnvelopeError::NonceLength { len: 2 })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_key() {
        let mut envelope = sample_envelope();
        envelope.arcis_public_key = BASE64.encode([1u8; 31]);
        assert!(matches!(
            parse(&envelope),
            Err(EnvelopeError::KeyLength { len: 31 })
        ));
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_string(&sample_envelope()).unwrap();
        assert!(json.contains("\"ciphertext\""));
        assert!(json.contains("\"nonce\""));
        assert!(json.contains("\"arcisPublicKey\""));
    }
}
