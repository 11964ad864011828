//! The input-note gadget (`C8`): binds `(ask, r, v)` to `(apk, cm, sn)`,
//! proves `cm` is a member of the tree rooted at the publicly witnessed
//! `rt` (scaled by the zero-value escape), and exposes `(apk, v)` to the
//! governance gadget.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::{AllocatedBit, Boolean};
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use crate::bit_utils::{alloc_bytes32_bits, alloc_u64_bits};
use crate::binary_gadget::bits_to_num;
use crate::commitment_gadget::commitment;
use crate::merkle_gadget;
use crate::sha256_compress::compress_pair;

/// Out-of-circuit witness material for one input note.
#[derive(Debug, Clone)]
pub struct InputNoteWitness {
    /// Spend authority `ask`.
    pub ask: Option<[u8; 32]>,
    /// Per-note randomness `r`.
    pub r: Option<[u8; 32]>,
    /// Note value.
    pub v: Option<u64>,
    /// Sibling hash and right-child flag per tree level, leaf to root.
    /// `None` entries are used when no witness is available (setup).
    pub path: Vec<Option<([u8; 32], bool)>>,
}

impl InputNoteWitness {
    /// An all-`None` witness of the right shape, for circuit setup.
    #[must_use]
    pub fn unknown(depth: usize) -> Self {
        Self {
            ask: None,
            r: None,
            v: None,
            path: vec![None; depth],
        }
    }
}

/// Witnesses produced by one input-note gadget instance, handed to the
/// governance gadget and the transaction-level value-balance check.
pub struct InputNoteOutput {
    /// `apk`, 256 bits MSB-first.
    pub apk_bits: Vec<Boolean>,
    /// `v`, 64 bits MSB-first.
    pub v_bits: Vec<Boolean>,
    /// `v` packed into a scalar, for the value-balance constraint.
    pub v_num: AllocatedNum<Scalar>,
}

/// Builds one input-note gadget instance.
///
/// `rt_bits` and `sn_bits` are the caller-allocated public-input bit
/// buffers this note must prove consistent with: `sn` must equal the
/// internally computed serial number bit-for-bit, and the Merkle root
/// recomputed from `cm` and `witness.path` must equal `rt` whenever
/// `value_enforce = 1` (i.e. `v != 0`).
///
/// # Errors
/// Propagates `SynthesisError` from any nested gadget.
pub fn synthesize<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    rt_bits: &[Boolean],
    sn_bits: &[Boolean],
    witness: &InputNoteWitness,
) -> Result<InputNoteOutput, SynthesisError> {
    assert_eq!(rt_bits.len(), 256, "rt must be 256 bits");
    assert_eq!(sn_bits.len(), 256, "sn must be 256 bits");

    let ask_bits = alloc_bytes32_bits(cs.namespace(|| "ask"), witness.ask)?;
    let r_bits = alloc_bytes32_bits(cs.namespace(|| "r"), witness.r)?;
    let v_bits = alloc_u64_bits(cs.namespace(|| "v"), witness.v)?;

    // apk = PRF(ask) = H(ask || ask).
    let apk_bits = compress_pair(cs.namespace(|| "apk = PRF(ask)"), &ask_bits, &ask_bits)?;

    // sn = H(ask || r), constrained equal to the publicly witnessed sn.
    let sn_internal_bits = compress_pair(cs.namespace(|| "sn = H(ask || r)"), &ask_bits, &r_bits)?;
    for (i, (internal, public)) in sn_internal_bits.iter().zip(sn_bits.iter()).enumerate() {
        Boolean::enforce_equal(
            cs.namespace(|| format!("sn bit {i} matches public input")),
            internal,
            public,
        )?;
    }

    // cm = CM(apk, v, r).
    let cm = commitment(cs.namespace(|| "cm"), &apk_bits, &v_bits, &r_bits)?;

    // value_enforce = (v != 0), boolean witness; constrained against v
    // by the zero-value-escape equation below, not computed in-circuit.
    let value_enforce_bit = AllocatedBit::alloc(
        cs.namespace(|| "value_enforce"),
        witness.v.map(|v| v != 0),
    )?;
    let value_enforce = Boolean::from(value_enforce_bit);

    let v_num = bits_to_num(cs.namespace(|| "pack v"), &v_bits)?;

    // Zero-value escape: v * (1 - value_enforce) = 0, rearranged as
    // v * value_enforce = v so every term is additive.
    cs.enforce(
        || "zero-value escape",
        |lc| lc + v_num.get_variable(),
        |lc| lc + &value_enforce.lc(CS::one(), Scalar::from(1u64)),
        |lc| lc + v_num.get_variable(),
    );

    // Merkle membership, gated by value_enforce: enforce_bit * (root - rt) = 0.
    let path: Vec<(Vec<Boolean>, Boolean)> = witness
        .path
        .iter()
        .enumerate()
        .map(|(depth, entry)| {
            let sibling_bits = alloc_bytes32_bits(
                cs.namespace(|| format!("sibling {depth}")),
                entry.map(|(sibling, _)| sibling),
            )?;
            let flag = Boolean::from(AllocatedBit::alloc(
                cs.namespace(|| format!("is_right {depth}")),
                entry.map(|(_, is_right)| is_right),
            )?);
            Ok((sibling_bits, flag))
        })
        .collect::<Result<_, SynthesisError>>()?;

    let computed_root = merkle_gadget::compute_root(cs.namespace(|| "merkle root"), &cm.bits, &path)?;
    let rt_num = bits_to_num(cs.namespace(|| "pack rt"), rt_bits)?;

    cs.enforce(
        || "merkle membership gated by value_enforce",
        |lc| lc + &value_enforce.lc(CS::one(), Scalar::from(1u64)),
        |lc| lc + computed_root.get_variable() - rt_num.get_variable(),
        |lc| lc,
    );

    Ok(InputNoteOutput {
        apk_bits,
        v_bits,
        v_num,
    })
}

#[cfg(test)]
mod tests {
    use bellman::gadgets::test::TestConstraintSystem;
    use zktx_core::Bytes32;
    use zktx_core::constants::{MERKLE_DEPTH, zero_cm, zero_cm_root};
    use zktx_pool::{CommitmentPool, build_witness};

    use super::*;
    use crate::bit_utils::alloc_bytes32_bits;

    fn scalar(byte: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        bytes
    }

    #[test]
    fn spends_a_real_note_against_its_tree_root() {
        let mut pool = CommitmentPool::new();
        let ask = scalar(2);
        let r = scalar(1);
        let v = 10u64;
        let apk = zktx_core::Bytes32::from_be_bytes(
            zktx_core::hash::compress_pair(&ask, &ask),
        );
        let cm = crate::note_calc::commitment(apk, v, Bytes32::from_be_bytes(r));
        for i in 1..=6u8 {
            if i == 3 {
                pool.append(cm);
            } else {
                let mut bytes = [0u8; 32];
                bytes[31] = i;
                pool.append(Bytes32::from_be_bytes(bytes));
            }
        }
        let target = pool.get_index(&cm).expect("present");
        let merkle_witness = build_witness(&pool, 0, pool.size() - 1, target).expect("window");

        let mut cs = TestConstraintSystem::<Scalar>::new();
        let rt_bits =
            alloc_bytes32_bits(cs.namespace(|| "rt"), Some(merkle_witness.root.to_be_bytes()))
                .unwrap();
        let sn = crate::note_calc::serial_number(Bytes32::from_be_bytes(ask), Bytes32::from_be_bytes(r));
        let sn_bits = alloc_bytes32_bits(cs.namespace(|| "sn"), Some(sn.to_be_bytes())).unwrap();

        let witness = InputNoteWitness {
            ask: Some(ask),
            r: Some(r),
            v: Some(v),
            path: merkle_witness
                .path
                .iter()
                .zip(merkle_witness.index_bits.iter())
                .map(|(sibling, is_right)| Some((sibling.to_be_bytes(), *is_right)))
                .collect(),
        };

        let output = synthesize(cs.namespace(|| "input note"), &rt_bits, &sn_bits, &witness).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(output.v_bits.len(), 64);
    }

    #[test]
    fn zero_value_escape_skips_membership() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let rt_bits =
            alloc_bytes32_bits(cs.namespace(|| "rt"), Some(zero_cm_root().to_be_bytes())).unwrap();
        let ask = [0u8; 32];
        let r = [0u8; 32];
        let sn = crate::note_calc::serial_number(Bytes32::ZERO, Bytes32::ZERO);
        let sn_bits = alloc_bytes32_bits(cs.namespace(|| "sn"), Some(sn.to_be_bytes())).unwrap();

        // Path is all zero_cm siblings / left turns: the zero-value note
        // need not actually be present in any pool.
        let witness = InputNoteWitness {
            ask: Some(ask),
            r: Some(r),
            v: Some(0),
            path: vec![Some((zero_cm().to_be_bytes(), false)); MERKLE_DEPTH],
        };

        let output = synthesize(cs.namespace(|| "zero input note"), &rt_bits, &sn_bits, &witness).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(output.v_bits.len(), 64);
    }
}
