//! SHA-256 *compression without padding*: the Merkle–Damgård block
//! function applied to a single 512-bit block, used here as a
//! fixed-input-size compression primitive rather than a general-purpose
//! hash.
//!
//! This is the one place the standard SHA-256 initialization vector is
//! named; every PRF/SN/CM calculator and the Merkle tree's inner hash
//! both compress exactly one 64-byte block through it, so keeping a
//! single implementation here is what keeps the circuit's in-circuit
//! gadget and its out-of-circuit twin from drifting apart.

use sha2::compress256;

/// The standard SHA-256 initialization vector.
const IV: [u32; 8] = [
    0x6a09_e667,
    0xbb67_ae85,
    0x3c6e_f372,
    0xa54f_f53a,
    0x510e_527f,
    0x9b05_688c,
    0x1f83_d9ab,
    0x5be0_cd19,
];

/// Compresses a single 512-bit (64-byte) block with the SHA-256
/// compression function, starting from the standard IV and without any
/// length padding or block counting.
#[must_use]
pub fn compress_block(block: &[u8; 64]) -> [u8; 32] {
    let mut state = IV;
    let generic_block = (*block).into();
    compress256(&mut state, std::slice::from_ref(&generic_block));
    let mut out = [0u8; 32];
    for (i, word) in state.iter().enumerate() {
        #[allow(clippy::indexing_slicing, reason = "fixed 8-word state into a fixed 32-byte output")]
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Compresses two concatenated 256-bit halves, `left || right`, as one
/// 512-bit block. The shape used by the Merkle tree's inner hash.
#[must_use]
pub fn compress_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut block = [0u8; 64];
    block[..32].copy_from_slice(left);
    block[32..].copy_from_slice(right);
    compress_block(&block)
}
