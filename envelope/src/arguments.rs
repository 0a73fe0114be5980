//! Computation argument list for on-chain submission

use crate::envelope::{parse, EncryptedEnvelope};
use crate::EnvelopeResult;

/// One argument of the confidential-compute instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputationArgument {
    /// Sender x25519 public key.
    ArcisPubkey([u8; 32]),
    /// One encrypted 128-bit word.
    EncryptedU128([u8; 16]),
    /// A public 128-bit value, used for the nonce.
    PlaintextU128(u128),
}

/// Flatten an envelope into the argument order the computation expects:
/// sender key first, then every ciphertext block, then the nonce as a
/// big-endian public word.
pub fn build_computation_arguments(
    envelope: &EncryptedEnvelope,
) -> EnvelopeResult<Vec<ComputationArgument>> {
    let parsed = parse(envelope)?;

    let mut arguments = Vec::with_capacity(parsed.blocks.len() + 2);
    arguments.push(ComputationArgument::ArcisPubkey(parsed.sender_public_key));
    arguments.extend(
        parsed
            .blocks
            .iter()
            .map(|block| ComputationArgument::EncryptedU128(*block)),
    );
    arguments.push(ComputationArgument::PlaintextU128(u128::from_be_bytes(
        parsed.nonce,
    )));
    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::build;

    #[test]
    fn test_argument_order_and_count() {
        let envelope = build(&[[1u8; 16], [2u8; 16], [3u8; 16]], &[0u8; 16], &[7u8; 32]);
        let arguments = build_computation_arguments(&envelope).unwrap();

        assert_eq!(arguments.len(), 5);
        assert_eq!(arguments[0], ComputationArgument::ArcisPubkey([7u8; 32]));
        assert_eq!(arguments[1], ComputationArgument::EncryptedU128([1u8; 16]));
        assert_eq!(
            arguments.last(),
            Some(&ComputationArgument::PlaintextU128(0))
        );
    }

    #[test]
    fn test_nonce_is_big_endian() {
        let mut nonce = [0u8; 16];
        nonce[15] = 1;
        let envelope = build(&[[0u8; 16]], &nonce, &[0u8; 32]);
        let arguments = build_computation_arguments(&envelope).unwrap();
        assert_eq!(
            arguments.last(),
            Some(&ComputationArgument::PlaintextU128(1))
        );
    }
}
