//! The in-circuit SHA-256 compression primitive: the Merkle–Damgård
//! block function applied to exactly one 512-bit block, with no length
//! padding — the in-circuit twin of [`crate::note_calc`] and the inner
//! hash of the windowed Merkle tree.
//!
//! `bellman`'s sha256 gadget module already exposes this primitive
//! (the padded `sha256` gadget is built from it, one block at a time);
//! this module is a thin, purpose-named wrapper so call sites read in
//! terms of "compress a block", not "the internals of a padded hash".

use bellman::ConstraintSystem;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::sha256::sha256_block_no_padding;
use bellman::SynthesisError;
use ff::PrimeField;

/// Compresses exactly 512 input bits into 256 output bits using the
/// standard SHA-256 compression function and IV, with no padding.
///
/// # Errors
/// Propagates any `SynthesisError` raised while allocating the
/// compression function's internal wires.
///
/// # Panics
/// Panics if `input.len() != 512` (mirrors the assertion in the
/// underlying gadget — a circuit-construction bug, not a runtime input
/// error).
pub fn compress_block<Scalar, CS>(cs: CS, input: &[Boolean]) -> Result<Vec<Boolean>, SynthesisError>
where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
{
    assert_eq!(input.len(), 512, "sha256 compression takes exactly one 512-bit block");
    sha256_block_no_padding(cs, input)
}

/// Concatenates `left` and `right` (256 bits each) into one 512-bit
/// block and compresses it — the shape used by the commitment gadget's
/// second stage and the Merkle tree's inner hash.
///
/// # Errors
/// See [`compress_block`].
pub fn compress_pair<Scalar, CS>(
    mut cs: CS,
    left: &[Boolean],
    right: &[Boolean],
) -> Result<Vec<Boolean>, SynthesisError>
where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
{
    assert_eq!(left.len(), 256);
    assert_eq!(right.len(), 256);
    let mut block = Vec::with_capacity(512);
    block.extend_from_slice(left);
    block.extend_from_slice(right);
    compress_block(cs.namespace(|| "compress pair"), &block)
}
