//! The field/curve bridge (`C1`): conversions between 256-bit opaque
//! scalars, raw little-endian bytes and elements of the BLS12-381 scalar
//! field used as the proof system's scalar field throughout the circuit.
//!
//! Two distinct byte-order universes meet here and must never be
//! confused: [`Bytes32`] is always big-endian when stringified (`§3`),
//! while [`bytes_to_field`]/[`field_to_bytes`] operate on the curve
//! library's native little-endian limb order. Callers crossing between
//! the two must go through [`u256_to_field`]/[`field_to_u256`], which do
//! the byte-order flip explicitly.

use bls12_381::Scalar;
use ff::{Field, PrimeField};

use crate::Bytes32;

/// Converts a big-endian [`Bytes32`] to a scalar-field element.
///
/// The conversion is total: values at or above the field modulus are
/// reduced by Horner evaluation of the bit representation, the same
/// technique an arithmetic circuit uses to range-reduce a bit array into
/// a field element.
#[must_use]
pub fn u256_to_field(value: Bytes32) -> Scalar {
    let mut acc = Scalar::ZERO;
    for byte in value.to_be_bytes() {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            acc = acc.double();
            if bit {
                acc += Scalar::ONE;
            }
        }
    }
    acc
}

/// Converts a scalar-field element back to a big-endian [`Bytes32`].
///
/// `field_to_u256(u256_to_field(x)) == x` only when `x` was already
/// canonically reduced mod the field modulus; for arbitrary 256-bit
/// inputs the round trip reduces `x` mod p, as expected of a field
/// conversion.
#[must_use]
pub fn field_to_u256(value: Scalar) -> Bytes32 {
    // `Scalar::to_repr` is little-endian; flip to the big-endian
    // Bytes32 convention.
    let mut le = value.to_repr().as_ref().to_vec();
    le.reverse();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&le);
    Bytes32::from_be_bytes(bytes)
}

/// Interprets 32 raw bytes as a little-endian integer and reduces it to a
/// scalar-field element (the curve library's native byte order).
#[must_use]
pub fn bytes_to_field(bytes: &[u8; 32]) -> Scalar {
    let mut be = *bytes;
    be.reverse();
    u256_to_field(Bytes32::from_be_bytes(be))
}

/// Serializes a scalar-field element to 32 raw little-endian bytes (the
/// curve library's native byte order).
#[must_use]
pub fn field_to_bytes(value: Scalar) -> [u8; 32] {
    let repr = value.to_repr();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(repr.as_ref());
    bytes
}

/// Bit capacity of the scalar field (254 for BLS12-381, matching the
/// 254-bit exponent used by the modular-exponentiation gadget).
#[must_use]
pub fn field_capacity() -> usize {
    usize::try_from(Scalar::CAPACITY).expect("field capacity fits in usize")
}

/// Horner-packs an MSB-first bit slice (length at most [`field_capacity`])
/// into a single scalar-field element: `Σ 2^i · bits[len-1-i]`.
///
/// This is the out-of-circuit twin of the transaction gadget's
/// multipacking gadget ([`crate`]'s `binary_gadget`/transaction circuit
/// in `zktx-circuit`), used by the façade to rebuild the public-input
/// vector from a transaction bundle without re-running the circuit.
#[must_use]
pub fn pack_bits_to_field(bits: &[bool]) -> Scalar {
    let mut acc = Scalar::ZERO;
    for bit in bits {
        acc = acc.double();
        if *bit {
            acc += Scalar::ONE;
        }
    }
    acc
}

/// Chunks an MSB-first bit buffer into [`field_capacity`]-sized pieces
/// (the final chunk may be shorter) and packs each into a scalar, in
/// order — the out-of-circuit twin of the transaction gadget's
/// public-input multipacking.
#[must_use]
pub fn multipack_bits(bits: &[bool]) -> Vec<Scalar> {
    let capacity = field_capacity();
    bits.chunks(capacity).map(pack_bits_to_field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_round_trips() {
        let zero = Bytes32::ZERO;
        assert_eq!(field_to_u256(u256_to_field(zero)), zero);
    }

    #[test]
    fn small_value_round_trips() {
        let value = Bytes32::from_hex("v", "2a").expect("valid hex");
        let field = u256_to_field(value);
        assert_eq!(field, Scalar::from(42_u64));
        assert_eq!(field_to_u256(field), value);
    }

    #[test]
    fn bytes_to_field_matches_native_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 7;
        assert_eq!(bytes_to_field(&bytes), Scalar::from(7_u64));
    }

    #[test]
    fn field_capacity_is_254() {
        assert_eq!(field_capacity(), 254);
    }
}
