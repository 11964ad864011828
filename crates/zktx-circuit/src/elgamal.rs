//! The ElGamal gadget (`C6`): multi-block ElGamal encryption expressed
//! as constraints, plus the out-of-circuit encrypt/decrypt companions
//! the overseer (and tests) use directly.
//!
//! Message boxes are `MESSAGE_BOX_BITS` (248) wide, strictly below the
//! field's bit capacity, so each box packs losslessly into one scalar.
//! The ciphertext is `c1 || c2_1 || c2_2 || ...`, one 256-bit box per
//! entry, all sharing one fresh `y` per transaction.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;
use ff::{Field, PrimeField};

use zktx_core::constants::MESSAGE_BOX_BITS;

use crate::binary_gadget::{bits_to_num, num_to_bits};
use crate::exp_gadget::pow;

/// In-circuit ciphertext: `c1` followed by one `c2` box per message
/// block, each 256 bits, MSB-first.
pub struct Ciphertext {
    /// `c1 = g^y`, as bits.
    pub c1_bits: Vec<Boolean>,
    /// `c2_k = m_k · Gpk^y` per block, as bits, in block order.
    pub c2_bits: Vec<Boolean>,
}

/// Zero-pads `bits` up to a multiple of [`MESSAGE_BOX_BITS`] with
/// constant (not witnessed) zero bits — these carry no prover-supplied
/// value, so no separate booleanness constraint is needed for them.
#[must_use]
pub fn zero_pad_to_message_boxes(bits: &[Boolean]) -> Vec<Boolean> {
    let mut padded = bits.to_vec();
    let remainder = padded.len() % MESSAGE_BOX_BITS;
    if remainder != 0 {
        for _ in 0..(MESSAGE_BOX_BITS - remainder) {
            padded.push(Boolean::constant(false));
        }
    }
    padded
}

/// Encrypts `plaintext_bits` (already zero-padded to a multiple of
/// `MESSAGE_BOX_BITS`, see [`zero_pad_to_message_boxes`]) under `(g,
/// Gpk, y)`.
///
/// # Errors
/// Propagates `SynthesisError` from witness allocation.
pub fn encrypt<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    plaintext_bits: &[Boolean],
    g: &AllocatedNum<Scalar>,
    gpk: &AllocatedNum<Scalar>,
    y: &AllocatedNum<Scalar>,
) -> Result<Ciphertext, SynthesisError> {
    assert_eq!(
        plaintext_bits.len() % MESSAGE_BOX_BITS,
        0,
        "plaintext must be pre-padded to a multiple of the message box width"
    );

    let c1 = pow(cs.namespace(|| "c1 = g^y"), g, y)?;
    let c1_bits = num_to_bits(cs.namespace(|| "c1 bits"), &c1, 256)?;

    let shared_secret = pow(cs.namespace(|| "s = Gpk^y"), gpk, y)?;

    let mut c2_bits = Vec::with_capacity(plaintext_bits.len() / MESSAGE_BOX_BITS * 256);
    for (k, block) in plaintext_bits.chunks(MESSAGE_BOX_BITS).enumerate() {
        let m_k = bits_to_num(cs.namespace(|| format!("m_{k}")), block)?;
        let c2_k = m_k.mul(cs.namespace(|| format!("c2_{k} = m * s")), &shared_secret)?;
        let c2_k_bits = num_to_bits(cs.namespace(|| format!("c2_{k} bits")), &c2_k, 256)?;
        c2_bits.extend(c2_k_bits);
    }

    Ok(Ciphertext { c1_bits, c2_bits })
}

/// Variable-time `base^exponent` over the scalar field — the out-of-circuit
/// twin of [`pow`], also reused by the façade for key derivation (`Gpk =
/// g^Gsk`).
#[must_use]
pub fn field_pow(base: Scalar, exponent: Scalar) -> Scalar {
    let repr = exponent.to_repr();
    let bytes: &[u8] = repr.as_ref();
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8)) {
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        *limb = u64::from_le_bytes(buf);
    }
    base.pow_vartime(limbs)
}

/// Interprets a big-endian byte string (up to 31 bytes, as produced by
/// bit-packing a message box) as a field element: byte-swap to the
/// curve's native little-endian limb order, zero-extend to 32 bytes.
fn bytes31_to_field(bytes: &[u8]) -> Scalar {
    debug_assert!(bytes.len() <= 31);
    let mut le = [0u8; 32];
    le[..bytes.len()].copy_from_slice(bytes);
    le[..bytes.len()].reverse();
    Scalar::from_repr(le_bytes_to_repr(le)).unwrap_or(Scalar::ZERO)
}

/// Inverse of [`bytes31_to_field`]: recovers the 31 big-endian bytes a
/// field element known to be below `2^248` was packed from.
fn field_to_bytes31(value: Scalar) -> [u8; 31] {
    let repr = value.to_repr();
    let le: &[u8] = repr.as_ref();
    let mut be = [0u8; 31];
    be.copy_from_slice(&le[..31]);
    be.reverse();
    be
}

/// Byte-swaps a field element's native little-endian repr into the
/// big-endian `c1`/`c2` box encoding (`§4.6`).
fn field_to_bytes32_swapped(value: Scalar) -> [u8; 32] {
    let repr = value.to_repr();
    let mut be: [u8; 32] = repr.as_ref().try_into().expect("repr is 32 bytes");
    be.reverse();
    be
}

/// Inverse of [`field_to_bytes32_swapped`].
fn bytes32_swapped_to_field(bytes: &[u8; 32]) -> Scalar {
    let mut le = *bytes;
    le.reverse();
    Scalar::from_repr(le_bytes_to_repr(le)).unwrap_or(Scalar::ZERO)
}

fn le_bytes_to_repr(le_bytes: [u8; 32]) -> <Scalar as PrimeField>::Repr {
    let mut repr = Scalar::ZERO.to_repr();
    repr.as_mut().copy_from_slice(&le_bytes);
    repr
}

/// Out-of-circuit ElGamal encryption, the twin of [`encrypt`].
///
/// `plaintext_bits` need not be pre-padded; this function pads to a
/// multiple of `MESSAGE_BOX_BITS` itself.
#[must_use]
pub fn encrypt_bits(plaintext_bits: &[bool], gpk: Scalar, y: Scalar, g: Scalar) -> Vec<bool> {
    let mut padded = plaintext_bits.to_vec();
    let remainder = padded.len() % MESSAGE_BOX_BITS;
    if remainder != 0 {
        padded.resize(padded.len() + (MESSAGE_BOX_BITS - remainder), false);
    }

    let c1 = field_pow(g, y);
    let shared_secret = field_pow(gpk, y);

    let mut out_bits = Vec::with_capacity(256 + padded.len() / MESSAGE_BOX_BITS * 256);
    out_bits.extend(zktx_core::bits::bytes_to_bits(&field_to_bytes32_swapped(c1)));

    for block in padded.chunks(MESSAGE_BOX_BITS) {
        let block_bytes = zktx_core::bits::bits_to_bytes(block);
        let m_k = bytes31_to_field(&block_bytes);
        let c2_k = m_k * shared_secret;
        out_bits.extend(zktx_core::bits::bytes_to_bits(&field_to_bytes32_swapped(
            c2_k,
        )));
    }

    out_bits
}

/// Out-of-circuit ElGamal decryption, the twin of [`encrypt`].
///
/// Returns one `31`-byte plaintext chunk per ciphertext block (caller
/// trims trailing zero padding as needed).
///
/// # Panics
/// Panics if `ciphertext_bits.len()` is not `256 * (1 + k)` for some
/// `k >= 0`.
#[must_use]
pub fn decrypt_bits(ciphertext_bits: &[bool], gsk: Scalar) -> Vec<u8> {
    assert_eq!(
        ciphertext_bits.len() % 256,
        0,
        "ciphertext must be a whole number of 256-bit boxes"
    );
    let boxes: Vec<[u8; 32]> = ciphertext_bits
        .chunks(256)
        .map(|chunk| {
            let bytes = zktx_core::bits::bits_to_bytes(chunk);
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&bytes);
            arr
        })
        .collect();

    let (c1_bytes, c2_boxes) = boxes.split_first().expect("ciphertext has at least c1");
    let c1 = bytes32_swapped_to_field(c1_bytes);
    let shared_secret = field_pow(c1, gsk);
    let shared_secret_inv = shared_secret.invert().unwrap_or(Scalar::ZERO);

    let mut plaintext = Vec::with_capacity(c2_boxes.len() * 31);
    for c2_bytes in c2_boxes {
        let c2 = bytes32_swapped_to_field(c2_bytes);
        let m = c2 * shared_secret_inv;
        plaintext.extend_from_slice(&field_to_bytes31(m));
    }
    plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: u64) -> Scalar {
        Scalar::from(v)
    }

    #[test]
    fn round_trips_for_varied_lengths() {
        let gsk = scalar(12345);
        let g = scalar(5);
        let gpk = field_pow(g, gsk);
        let y = scalar(999);

        for len in [0usize, 1, 247, 248, 249, 500, 4096] {
            let plaintext: Vec<bool> = (0..len).map(|i| i % 3 == 0).collect();
            let ciphertext = encrypt_bits(&plaintext, gpk, y, g);

            let expected_boxes = len.div_ceil(MESSAGE_BOX_BITS);
            assert_eq!(ciphertext.len(), 256 + 256 * expected_boxes);

            let decrypted_bytes = decrypt_bits(&ciphertext, gsk);
            let decrypted_bits = zktx_core::bits::bytes_to_bits(&decrypted_bytes);

            let mut expected = plaintext.clone();
            let remainder = expected.len() % MESSAGE_BOX_BITS;
            if remainder != 0 {
                expected.resize(expected.len() + (MESSAGE_BOX_BITS - remainder), false);
            }
            assert_eq!(decrypted_bits, expected);
        }
    }

    #[test]
    fn ciphertext_size_matches_formula() {
        let gsk = scalar(7);
        let g = scalar(3);
        let gpk = field_pow(g, gsk);
        let y = scalar(42);

        for len in [0usize, 248, 500] {
            let plaintext = vec![true; len];
            let ciphertext = encrypt_bits(&plaintext, gpk, y, g);
            let expected_blocks = len.div_ceil(MESSAGE_BOX_BITS);
            assert_eq!(ciphertext.len(), 256 + 256 * expected_blocks);
        }
    }
}
