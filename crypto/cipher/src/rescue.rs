//! Rescue-style permutation over GF(2^128 - 159)
//!
//! A sponge-shaped keyed permutation used as a keystream generator:
//! the state holds two key words, the nonce and a block counter, and
//! one permutation call yields one keystream word. Only the forward
//! power map is needed because decryption reuses the same keystream.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// Field modulus, the largest 128-bit prime: 2^128 - 159.
pub(crate) const P: u128 = 0xffff_ffff_ffff_ffff_ffff_ffff_ffff_ff61;

/// Permutation state width in field elements.
const STATE_WIDTH: usize = 4;

/// Number of rounds.
const ROUNDS: usize = 14;

/// Circulant mixing matrix applied after each S-box layer.
const MDS: [[u128; STATE_WIDTH]; STATE_WIDTH] = [
    [2, 3, 1, 1],
    [1, 2, 3, 1],
    [1, 1, 2, 3],
    [3, 1, 1, 2],
];

/// Per-round additive constants, derived from SHA-256 so the table is
/// reproducible without shipping magic numbers.
static ROUND_CONSTANTS: Lazy<[[u128; STATE_WIDTH]; ROUNDS]> = Lazy::new(|| {
    let mut constants = [[0u128; STATE_WIDTH]; ROUNDS];
    for (round, row) in constants.iter_mut().enumerate() {
        for (lane, constant) in row.iter_mut().enumerate() {
            let digest = Sha256::new()
                .chain_update(b"punt-rescue-round-constant")
                .chain_update([round as u8, lane as u8])
                .finalize();
            let bytes: [u8; 16] = digest[..16].try_into().expect("digest is 32 bytes");
            *constant = reduce_once(u128::from_le_bytes(bytes));
        }
    }
    constants
});

/// Fold a raw 128-bit value into the field. One conditional subtraction
/// suffices because P > 2^127.
pub(crate) fn reduce_once(x: u128) -> u128 {
    if x >= P {
        x - P
    } else {
        x
    }
}

/// Full 256-bit product of two 128-bit values as (hi, lo) limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let a0 = a as u64 as u128;
    let a1 = a >> 64;
    let b0 = b as u64 as u128;
    let b1 = b >> 64;

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    let mid = (p00 >> 64) + (p01 as u64 as u128) + (p10 as u64 as u128);
    let lo = (mid << 64) | (p00 as u64 as u128);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

/// Modular multiplication. Uses 2^128 = 159 (mod P) to fold the high
/// limb back into range; the loop runs at most three times.
fn mul_mod(a: u128, b: u128) -> u128 {
    let (mut hi, mut lo) = mul_wide(a, b);
    while hi != 0 {
        let (fold_hi, fold_lo) = mul_wide(hi, 159);
        let (sum, carry) = fold_lo.overflowing_add(lo);
        hi = fold_hi + carry as u128;
        lo = sum;
    }
    reduce_once(lo)
}

/// Modular addition.
fn add_mod(a: u128, b: u128) -> u128 {
    let (sum, carry) = a.overflowing_add(b);
    if carry {
        // sum + 2^128 = sum + P + 159, so the residue is sum + 159
        sum + 159
    } else {
        reduce_once(sum)
    }
}

/// The S-box: x^5, the smallest power map invertible in this field.
fn pow5(x: u128) -> u128 {
    let x2 = mul_mod(x, x);
    let x4 = mul_mod(x2, x2);
    mul_mod(x4, x)
}

fn apply_mds(state: &[u128; STATE_WIDTH]) -> [u128; STATE_WIDTH] {
    let mut mixed = [0u128; STATE_WIDTH];
    for (row, out) in MDS.iter().zip(mixed.iter_mut()) {
        for (coefficient, lane) in row.iter().zip(state.iter()) {
            *out = add_mod(*out, mul_mod(*coefficient, *lane));
        }
    }
    mixed
}

/// Run the full permutation in place.
pub(crate) fn permute(state: &mut [u128; STATE_WIDTH]) {
    for round in ROUND_CONSTANTS.iter() {
        for lane in state.iter_mut() {
            *lane = pow5(*lane);
        }
        *state = apply_mds(state);
        for (lane, constant) in state.iter_mut().zip(round.iter()) {
            *lane = add_mod(*lane, *constant);
        }
    }
}

/// Produce the keystream word for one (nonce, counter) position.
pub(crate) fn keystream_word(key: &[u128; 2], nonce: u128, counter: u64) -> u128 {
    let mut state = [key[0], key[1], reduce_once(nonce), counter as u128];
    permute(&mut state);
    state[0]
}
