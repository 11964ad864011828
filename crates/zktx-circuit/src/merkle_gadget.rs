//! The windowed-Merkle membership half of `C8`: recomputes a tree root
//! in-circuit from a leaf and its authentication path, using the same
//! SHA-256-compression inner hash as [`crate::sha256_compress::compress_pair`]
//! and the out-of-circuit twin in [`zktx_pool::merkle`].
//!
//! The authentication path is leaf-to-root, one sibling and one
//! left/right flag per tree level, exactly mirroring
//! [`zktx_pool::merkle::MerkleWitness`].

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use crate::binary_gadget::bits_to_num;

/// Selects `a` when `condition` is true, `b` otherwise, bit by bit:
/// `b XOR (condition AND (a XOR b))`.
fn mux_bit<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    condition: &Boolean,
    a: &Boolean,
    b: &Boolean,
) -> Result<Boolean, SynthesisError> {
    let a_xor_b = Boolean::xor(cs.namespace(|| "a xor b"), a, b)?;
    let cond_and = Boolean::and(cs.namespace(|| "condition and (a xor b)"), condition, &a_xor_b)?;
    Boolean::xor(cs.namespace(|| "b xor selected"), b, &cond_and)
}

/// Recomputes the Merkle root from `leaf_bits` (256, MSB-first) and an
/// authentication path of `(sibling_bits, is_right)` pairs, leaf to
/// root, combining levels with [`crate::sha256_compress::compress_pair`].
///
/// `is_right` selects whether the running node is the right child at
/// that level (mirrors [`zktx_pool::merkle::MerkleWitness::index_bits`]).
///
/// # Errors
/// Propagates `SynthesisError` from the underlying hash and mux gadgets.
pub fn compute_root<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    leaf_bits: &[Boolean],
    path: &[(Vec<Boolean>, Boolean)],
) -> Result<AllocatedNum<Scalar>, SynthesisError> {
    assert_eq!(leaf_bits.len(), 256, "leaf must be 256 bits");

    let mut node = leaf_bits.to_vec();
    for (depth, (sibling_bits, is_right)) in path.iter().enumerate() {
        assert_eq!(sibling_bits.len(), 256, "sibling must be 256 bits");
        let mut cs = cs.namespace(|| format!("level {depth}"));

        let mut left = Vec::with_capacity(256);
        let mut right = Vec::with_capacity(256);
        for (i, (node_bit, sibling_bit)) in node.iter().zip(sibling_bits.iter()).enumerate() {
            let mut bit_cs = cs.namespace(|| format!("bit {i}"));
            // left = is_right ? sibling : node ; right = is_right ? node : sibling
            left.push(mux_bit(
                bit_cs.namespace(|| "left"),
                is_right,
                sibling_bit,
                node_bit,
            )?);
            right.push(mux_bit(
                bit_cs.namespace(|| "right"),
                is_right,
                node_bit,
                sibling_bit,
            )?);
        }

        node = crate::sha256_compress::compress_pair(cs.namespace(|| "combine"), &left, &right)?;
    }

    bits_to_num(cs.namespace(|| "pack root"), &node)
}
