//! Witness-allocation helpers shared by every gadget that moves 256-bit
//! digests, 64-bit values or arbitrary bit buffers in and out of the
//! constraint system.
//!
//! All bit vectors here follow the MSB-first-at-byte-granularity
//! convention fixed by [`zktx_core::bits`]; a `Boolean` at index 0 is the
//! most significant bit of byte 0.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::{AllocatedBit, Boolean};
use ff::PrimeField;

/// Allocates one witness bit per entry of `bits` (or unknown witnesses if
/// `bits` is `None`), in MSB-first order.
///
/// # Errors
/// Propagates `SynthesisError` from bit allocation.
pub fn alloc_bits<Scalar, CS>(
    mut cs: CS,
    bits: Option<&[bool]>,
    len: usize,
) -> Result<Vec<Boolean>, SynthesisError>
where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
{
    (0..len)
        .map(|i| {
            let value = bits.and_then(|b| b.get(i)).copied();
            AllocatedBit::alloc(cs.namespace(|| format!("bit {i}")), value).map(Boolean::from)
        })
        .collect()
}

/// Allocates 256 witness bits from an optional big-endian 32-byte value.
///
/// # Errors
/// Propagates `SynthesisError` from bit allocation.
pub fn alloc_bytes32_bits<Scalar, CS>(
    cs: CS,
    bytes: Option<[u8; 32]>,
) -> Result<Vec<Boolean>, SynthesisError>
where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
{
    let bits = bytes.map(|b| zktx_core::bits::bytes_to_bits(&b));
    alloc_bits(cs, bits.as_deref(), 256)
}

/// Allocates 64 witness bits from an optional `u64`, using the
/// little-endian-byte/MSB-first-bit convention of `u64_to_bits`.
///
/// # Errors
/// Propagates `SynthesisError` from bit allocation.
pub fn alloc_u64_bits<Scalar, CS>(
    cs: CS,
    value: Option<u64>,
) -> Result<Vec<Boolean>, SynthesisError>
where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
{
    let bits = value.map(zktx_core::bits::u64_to_bits);
    alloc_bits(cs, bits.as_deref(), 64)
}

/// Reads off the witnessed boolean value of every bit, panicking if any
/// is unassigned. Test-only: production code must never unwrap a
/// witness this way.
#[cfg(test)]
pub fn bits_to_bool_vec(bits: &[Boolean]) -> Vec<bool> {
    bits.iter()
        .map(|b| b.get_value().expect("bit witnessed in test"))
        .collect()
}

/// Reads off the witnessed boolean value of every bit, returning `None`
/// if any bit is unassigned (the prover-not-yet-run case).
#[must_use]
pub fn bits_to_bool_vec_opt(bits: &[Boolean]) -> Option<Vec<bool>> {
    bits.iter().map(Boolean::get_value).collect()
}

/// Recovers the big-endian bytes behind 256 witnessed bits, if every bit
/// has a value.
#[must_use]
pub fn bits_to_bytes32_opt(bits: &[Boolean]) -> Option<[u8; 32]> {
    let values: Option<Vec<bool>> = bits.iter().map(Boolean::get_value).collect();
    values.map(|v| {
        let bytes = zktx_core::bits::bits_to_bytes(&v);
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        out
    })
}
