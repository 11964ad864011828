//! The governance gadget (`C10`): assembles the canonical plaintext
//! layout from the transaction's public and note-level witnesses and
//! delegates to the ElGamal gadget (`C6`) for encryption.
//!
//! Plaintext layout (`§6`, bit concatenation):
//! `vpub_old(64) || (in_apk_i(256) || in_value_i(64))* || vpub_new(64)
//! || (out_apk_j(256) || out_value_j(64))*`, zero-padded up to a
//! multiple of `MESSAGE_BOX_BITS`.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use zktx_core::constants::MESSAGE_BOX_BITS;

use crate::elgamal::{self, Ciphertext};

/// One note's `(apk, value)` pair as circuit bits, independent of
/// whether it is an input or an output note.
pub struct NoteBits<'a> {
    /// 256 bits, MSB-first.
    pub apk_bits: &'a [Boolean],
    /// 64 bits, MSB-first.
    pub v_bits: &'a [Boolean],
}

/// Total plaintext bit length for `n_in` inputs and `n_out` outputs,
/// before zero-padding to a message-box multiple.
#[must_use]
pub const fn plaintext_bit_size(n_in: usize, n_out: usize) -> usize {
    64 + n_in * (256 + 64) + 64 + n_out * (256 + 64)
}

/// Total ciphertext bit length for `n_in` inputs and `n_out` outputs:
/// one 256-bit `c1` box plus one 256-bit `c2` box per padded message
/// block.
#[must_use]
pub const fn gov_data_bit_size(n_in: usize, n_out: usize) -> usize {
    let plaintext = plaintext_bit_size(n_in, n_out);
    let blocks = plaintext.div_ceil(MESSAGE_BOX_BITS);
    256 + 256 * blocks
}

/// Assembles the plaintext and encrypts it under `(g, Gpk, y)`.
///
/// # Errors
/// Propagates `SynthesisError` from the ElGamal gadget.
pub fn synthesize<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    vpub_old_bits: &[Boolean],
    inputs: &[NoteBits<'_>],
    vpub_new_bits: &[Boolean],
    outputs: &[NoteBits<'_>],
    g: &AllocatedNum<Scalar>,
    gpk: &AllocatedNum<Scalar>,
    y: &AllocatedNum<Scalar>,
) -> Result<Ciphertext, SynthesisError> {
    assert_eq!(vpub_old_bits.len(), 64);
    assert_eq!(vpub_new_bits.len(), 64);

    let mut plaintext = Vec::with_capacity(plaintext_bit_size(inputs.len(), outputs.len()));
    plaintext.extend_from_slice(vpub_old_bits);
    for note in inputs {
        assert_eq!(note.apk_bits.len(), 256);
        assert_eq!(note.v_bits.len(), 64);
        plaintext.extend_from_slice(note.apk_bits);
        plaintext.extend_from_slice(note.v_bits);
    }
    plaintext.extend_from_slice(vpub_new_bits);
    for note in outputs {
        assert_eq!(note.apk_bits.len(), 256);
        assert_eq!(note.v_bits.len(), 64);
        plaintext.extend_from_slice(note.apk_bits);
        plaintext.extend_from_slice(note.v_bits);
    }

    let padded = elgamal::zero_pad_to_message_boxes(&plaintext);
    elgamal::encrypt(cs.namespace(|| "governance ciphertext"), &padded, g, gpk, y)
}

/// Out-of-circuit plaintext assembly, the twin of [`synthesize`]'s
/// layout — used by the façade to build the same plaintext the circuit
/// witnesses, for encryption and for `decrypt_tx_info` parsing.
#[must_use]
pub fn plaintext_bits(
    vpub_old: u64,
    in_apks: &[zktx_core::Bytes32],
    in_values: &[u64],
    vpub_new: u64,
    out_apks: &[zktx_core::Bytes32],
    out_values: &[u64],
) -> Vec<bool> {
    assert_eq!(in_apks.len(), in_values.len());
    assert_eq!(out_apks.len(), out_values.len());

    let mut bits = Vec::with_capacity(plaintext_bit_size(in_apks.len(), out_apks.len()));
    bits.extend(zktx_core::bits::u64_to_bits(vpub_old));
    for (apk, v) in in_apks.iter().zip(in_values.iter()) {
        bits.extend(zktx_core::bits::bytes_to_bits(&apk.to_be_bytes()));
        bits.extend(zktx_core::bits::u64_to_bits(*v));
    }
    bits.extend(zktx_core::bits::u64_to_bits(vpub_new));
    for (apk, v) in out_apks.iter().zip(out_values.iter()) {
        bits.extend(zktx_core::bits::bytes_to_bits(&apk.to_be_bytes()));
        bits.extend(zktx_core::bits::u64_to_bits(*v));
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_size_matches_formula() {
        let bits = plaintext_bits(
            1,
            &[zktx_core::Bytes32::ZERO, zktx_core::Bytes32::ZERO],
            &[1, 2],
            3,
            &[zktx_core::Bytes32::ZERO, zktx_core::Bytes32::ZERO],
            &[4, 5],
        );
        assert_eq!(bits.len(), plaintext_bit_size(2, 2));
    }

    #[test]
    fn gov_data_size_accounts_for_padding() {
        // (2,2): plaintext = 64 + 2*320 + 64 + 2*320 = 1408 bits -> ceil(1408/248) = 6 blocks.
        assert_eq!(plaintext_bit_size(2, 2), 1408);
        assert_eq!(gov_data_bit_size(2, 2), 256 + 256 * 6);
    }
}
