//! Compile-time circuit parameters and the distinguished hex constants
//! fixed by convention (`§6`).

use crate::Bytes32;

/// Depth of the windowed incremental Merkle tree (`INCREMENTAL_MERKLE_TREE_DEPTH`).
pub const MERKLE_DEPTH: usize = 4;

/// Capacity of the windowed tree, `2^MERKLE_DEPTH`.
#[must_use]
pub const fn merkle_capacity() -> usize {
    1_usize << MERKLE_DEPTH
}

/// Number of input notes in the (2,2) transaction circuit.
pub const N_IN: usize = 2;

/// Number of output notes in the (2,2) transaction circuit.
pub const N_OUT: usize = 2;

/// Exponent width for the modular-exponentiation gadget: the scalar
/// field's bit capacity (254 for BLS12-381, matching BN-128's 254-bit
/// scalar field in the reference implementation).
pub const EXP_SIZE: usize = 254;

/// Clears the high `256 - EXP_SIZE` bits of a big-endian value so it is
/// canonically `< 2^EXP_SIZE`.
///
/// The exponentiation gadget packs its witnessed exponent into exactly
/// `EXP_SIZE` bits (`num_to_bits`), which only has a satisfying assignment
/// when the exponent's canonical representative is already below
/// `2^EXP_SIZE`. BLS12-381's scalar modulus is not a power of two
/// (`p ≈ 1.8 · 2^254`), so an unmasked 256-bit draw reduces mod `p` to a
/// value `>= 2^254` on a sizeable fraction of draws, which the packing
/// gadget cannot represent. Masking before use keeps every exponent the
/// circuit and its out-of-circuit twins see bit-identical and within
/// range by construction.
#[must_use]
pub fn mask_to_exp_size(value: Bytes32) -> Bytes32 {
    let mut bytes = value.to_be_bytes();
    let mut clear_bits = (bytes.len() * 8) - EXP_SIZE;
    for byte in &mut bytes {
        if clear_bits >= 8 {
            *byte = 0;
            clear_bits -= 8;
        } else if clear_bits > 0 {
            *byte &= 0xFFu8 >> clear_bits;
            clear_bits = 0;
        } else {
            break;
        }
    }
    Bytes32::from_be_bytes(bytes)
}

/// ElGamal message-box size in bits (`M`), strictly below field capacity.
pub const MESSAGE_BOX_BITS: usize = 248;

/// ElGamal message-box size in bytes.
pub const MESSAGE_BOX_BYTES: usize = MESSAGE_BOX_BITS / 8;

/// Distinguished "no commitment" sentinel occupying pool position 0.
pub fn zero_cm() -> Bytes32 {
    Bytes32::from_hex(
        "ZERO_CM",
        "ed6dd816927506bf94f63865d5792bfca5a1a14237494b74367e143df2caf7c6",
    )
    .expect("ZERO_CM constant is valid hex")
}

/// Root of a depth-`MERKLE_DEPTH` tree whose every leaf is [`zero_cm`].
pub fn zero_cm_root() -> Bytes32 {
    Bytes32::from_hex(
        "ZERO_CM_ROOT",
        "a7927ccee105a1ef28862f9bd501ac50c675809ec13880e1cbe1cd889834f160",
    )
    .expect("ZERO_CM_ROOT constant is valid hex")
}

/// Serial number produced by spending a zero-value note with `ask = r = 0`.
pub fn zero_sn() -> Bytes32 {
    Bytes32::from_hex(
        "ZERO_SN",
        "d8a93718eaf9feba4362d2c091d4e58ccabe9f779957336269b4b917be9856da",
    )
    .expect("ZERO_SN constant is valid hex")
}

/// Default per-deployment ElGamal generator.
pub fn default_g() -> Bytes32 {
    Bytes32::from_hex(
        "DEFAULT_G",
        "39061f1c854fae629b599d29cefe1f12bc4809aa681809bfaaeb1b7087be6fed",
    )
    .expect("DEFAULT_G constant is valid hex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguished_constants_parse() {
        let _ = zero_cm();
        let _ = zero_cm_root();
        let _ = zero_sn();
        let default_g = default_g();
        assert!(Bytes32::validate_generator(&default_g.to_hex()).is_ok());
    }

    #[test]
    fn merkle_capacity_matches_depth() {
        assert_eq!(merkle_capacity(), 16);
    }

    #[test]
    fn mask_to_exp_size_clears_top_two_bits() {
        let all_ones = Bytes32::from_be_bytes([0xFFu8; 32]);
        let masked = mask_to_exp_size(all_ones);
        assert_eq!(masked.to_be_bytes()[0], 0x3F);
        assert_eq!(masked.to_be_bytes()[1..], [0xFFu8; 31]);
    }

    #[test]
    fn mask_to_exp_size_is_idempotent_on_small_values() {
        let small = Bytes32::from_hex("small", "02").expect("valid hex");
        assert_eq!(mask_to_exp_size(small), small);
    }
}
