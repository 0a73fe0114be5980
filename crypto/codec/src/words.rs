//! Byte buffer <-> 128-bit word conversion

use crate::{CodecError, CodecResult, MAX_WORDS, WORD_BYTES};

/// Right-pad a buffer with zero bytes to the next word boundary.
///
/// An already-aligned buffer is returned unchanged, so padding never
/// introduces an extra all-zero word that [`trim`] could not distinguish
/// from data.
pub fn pad(bytes: &[u8]) -> Vec<u8> {
    let remainder = bytes.len() % WORD_BYTES;
    let mut padded = bytes.to_vec();
    if remainder != 0 {
        padded.resize(bytes.len() + (WORD_BYTES - remainder), 0);
    }
    padded
}

/// Strip trailing zero bytes from a decompressed buffer.
///
/// Known limitation: plaintext that legitimately ends with zero bytes is
/// truncated. Payloads run through this codec are JSON text, which never
/// ends in `0x00`, so the case does not occur in practice.
pub fn trim(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    &bytes[..end]
}

/// Pack an aligned buffer into little-endian 128-bit words.
///
/// Fails on unaligned input and on buffers beyond the [`MAX_WORDS`]
/// capacity; both are caller errors that must surface before encryption.
pub fn compress(bytes: &[u8]) -> CodecResult<Vec<u128>> {
    if bytes.len() % WORD_BYTES != 0 {
        return Err(CodecError::Unaligned {
            len: bytes.len(),
            word_bytes: WORD_BYTES,
        });
    }

    let words = bytes.len() / WORD_BYTES;
    if words > MAX_WORDS {
        return Err(CodecError::CapacityExceeded {
            words,
            max: MAX_WORDS,
        });
    }

    Ok(bytes
        .chunks_exact(WORD_BYTES)
        .map(|chunk| u128::from_le_bytes(chunk.try_into().expect("chunk is 16 bytes")))
        .collect())
}

/// Unpack words back into their little-endian byte representation.
pub fn decompress(words: &[u128]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * WORD_BYTES);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PLAINTEXT_BYTES;

    #[test]
    fn test_pad_unaligned() {
        let padded = pad(b"hello");
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..5], b"hello");
        assert!(padded[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_aligned_is_identity() {
        let input = vec![7u8; 32];
        assert_eq!(pad(&input), input);
    }

    #[test]
    fn test_pad_empty() {
        assert!(pad(&[]).is_empty());
    }

    #[test]
    fn test_trim_strips_padding() {
        let mut buf = b"payload".to_vec();
        buf.resize(16, 0);
        assert_eq!(trim(&buf), b"payload");
    }

    #[test]
    fn test_trim_all_zeros() {
        assert_eq!(trim(&[0u8; 32]), &[] as &[u8]);
    }

    #[test]
    fn test_trim_is_lossy_on_trailing_zero() {
        // Documented limitation: a real trailing zero byte is removed.
        let buf = [1u8, 2, 0];
        assert_eq!(trim(&buf), &[1, 2]);
    }

    #[test]
    fn test_compress_rejects_unaligned() {
        let err = compress(&[0u8; 17]).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unaligned {
                len: 17,
                word_bytes: 16
            }
        );
    }

    #[test]
    fn test_compress_rejects_over_capacity() {
        let err = compress(&vec![0u8; MAX_PLAINTEXT_BYTES + 16]).unwrap_err();
        assert_eq!(err, CodecError::CapacityExceeded { words: 19, max: 18 });
    }

    #[test]
    fn test_compress_at_capacity() {
        let words = compress(&vec![0xABu8; MAX_PLAINTEXT_BYTES]).unwrap();
        assert_eq!(words.len(), 18);
    }

    #[test]
    fn test_word_packing_is_little_endian() {
        let mut bytes = [0u8; 16];
        bytes[0] = 1;
        let words = compress(&bytes).unwrap();
        assert_eq!(words, vec![1u128]);
    }

    #[test]
    fn test_roundtrip() {
        let padded = pad(b"the quick brown fox jumps over the lazy dog");
        let words = compress(&padded).unwrap();
        let bytes = decompress(&words);
        assert_eq!(
            trim(&bytes),
            b"the quick brown fox jumps over the lazy dog"
        );
    }
}
