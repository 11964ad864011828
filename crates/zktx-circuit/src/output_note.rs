//! The output-note gadget (`C9`): binds `(apk, v, r)` to a commitment
//! `cm`, sampling a fresh `r` for the note. `apk` bits come from the
//! outer transaction context (the payer's own key for the change
//! output, the peer's for the payment output); this gadget treats both
//! symmetrically, as the spec requires.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use crate::bit_utils::alloc_bytes32_bits;
use crate::binary_gadget::bits_to_num;
use crate::commitment_gadget::commitment;

/// Witness material for one output note.
#[derive(Debug, Clone)]
pub struct OutputNoteWitness {
    /// The note value.
    pub v: Option<u64>,
    /// Fresh per-note randomness, sampled by the prover.
    pub r: Option<[u8; 32]>,
}

/// Witnesses produced by one output-note gadget instance.
pub struct OutputNoteOutput {
    /// `cm`, 256 bits MSB-first — one entry of the public `cms` vector.
    pub cm_bits: Vec<Boolean>,
    /// `v`, 64 bits MSB-first, exposed to the governance gadget.
    pub v_bits: Vec<Boolean>,
    /// `v` packed into a scalar, for the value-balance constraint.
    pub v_num: AllocatedNum<Scalar>,
}

/// Builds one output-note gadget instance.
///
/// `apk_bits` (256 bits, MSB-first) is supplied by the caller — the
/// transaction gadget decides which key each output pays to; this
/// gadget does not care whether that is the payer's own key or a peer's.
///
/// # Errors
/// Propagates `SynthesisError` from the underlying commitment gadget.
pub fn synthesize<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    apk_bits: &[Boolean],
    witness: &OutputNoteWitness,
) -> Result<OutputNoteOutput, SynthesisError> {
    assert_eq!(apk_bits.len(), 256, "apk must be 256 bits");

    let v_bits = crate::bit_utils::alloc_u64_bits(cs.namespace(|| "v"), witness.v)?;
    let r_bits = alloc_bytes32_bits(cs.namespace(|| "r"), witness.r)?;

    let cm = commitment(cs.namespace(|| "cm"), apk_bits, &v_bits, &r_bits)?;
    let v_num = bits_to_num(cs.namespace(|| "pack v"), &v_bits)?;

    Ok(OutputNoteOutput {
        cm_bits: cm.bits,
        v_bits,
        v_num,
    })
}
