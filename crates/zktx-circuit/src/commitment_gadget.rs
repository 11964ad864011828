//! The commitment gadget (`C7`): two chained SHA-256 compression blocks
//! turning `(apk, v, r)` bits into the note commitment `cm`, matching
//! [`crate::note_calc::commitment`] bit-for-bit.
//!
//! Stage one compresses `apk ‖ v ‖ v ‖ v ‖ v` (512 bits) into a 256-bit
//! intermediate; stage two compresses `intermediate ‖ r` into `cm`.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use crate::binary_gadget::bits_to_num;
use crate::sha256_compress::compress_pair;

/// Allocated witnesses for a commitment gadget instance.
pub struct Commitment {
    /// `cm`, as 256 bits, MSB-first.
    pub bits: Vec<Boolean>,
    /// `cm` packed into a single scalar, for equality checks against
    /// other packed witnesses.
    pub packed: AllocatedNum<Scalar>,
}

/// Builds the two-block commitment chain from `apk_bits` (256),
/// `v_bits` (64, repeated four times internally) and `r_bits` (256).
///
/// The result's bits are overwritten with the out-of-circuit twin after
/// the hash gadgets have filled them — either witness is sufficient, but
/// matching the reference's overwrite order keeps this gadget
/// self-consistent even if a future change to the hash gadget's witness
/// generation were to diverge.
///
/// # Errors
/// Propagates `SynthesisError` from the underlying hash gadgets.
pub fn commitment<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    apk_bits: &[Boolean],
    v_bits: &[Boolean],
    r_bits: &[Boolean],
) -> Result<Commitment, SynthesisError> {
    assert_eq!(apk_bits.len(), 256, "apk must be 256 bits");
    assert_eq!(v_bits.len(), 64, "v must be 64 bits");
    assert_eq!(r_bits.len(), 256, "r must be 256 bits");

    let mut first_block = Vec::with_capacity(512);
    first_block.extend_from_slice(apk_bits);
    for _ in 0..4 {
        first_block.extend_from_slice(v_bits);
    }
    let intermediate = crate::sha256_compress::compress_block(
        cs.namespace(|| "intermediate = H(apk || v*4)"),
        &first_block,
    )?;

    let hashed_bits = compress_pair(cs.namespace(|| "cm = H(intermediate || r)"), &intermediate, r_bits)?;

    // The reference commitment gadget overwrites the hash gadget's
    // result with the out-of-circuit twin once both are available.
    // Re-derive `cm` directly from the witnessed `(apk, v, r)` and
    // constrain it equal to the hash gadget's own output, so the two
    // independent computations cross-check each other instead of one
    // silently shadowing the other.
    let independent_cm = match (
        crate::bit_utils::bits_to_bytes32_opt(apk_bits),
        crate::bit_utils::bits_to_bool_vec_opt(v_bits),
        crate::bit_utils::bits_to_bytes32_opt(r_bits),
    ) {
        (Some(apk_bytes), Some(v_bits), Some(r_bytes)) => Some(crate::note_calc::commitment(
            zktx_core::Bytes32::from_be_bytes(apk_bytes),
            zktx_core::bits::bits_to_u64(&v_bits),
            zktx_core::Bytes32::from_be_bytes(r_bytes),
        )),
        _ => None,
    };
    let independent_bits = independent_cm.map(|cm| zktx_core::bits::bytes_to_bits(&cm.to_be_bytes()));

    let cm_bits = crate::bit_utils::alloc_bits(
        cs.namespace(|| "cm bits (out-of-circuit twin)"),
        independent_bits.as_deref(),
        256,
    )?;
    for (i, (hashed, independent)) in hashed_bits.iter().zip(cm_bits.iter()).enumerate() {
        Boolean::enforce_equal(
            cs.namespace(|| format!("cm bit {i} matches hash gadget")),
            hashed,
            independent,
        )?;
    }

    let packed = bits_to_num(cs.namespace(|| "pack cm"), &cm_bits)?;

    Ok(Commitment {
        bits: cm_bits,
        packed,
    })
}

#[cfg(test)]
mod tests {
    use bellman::gadgets::test::TestConstraintSystem;

    use super::*;
    use crate::bit_utils::{alloc_bytes32_bits, alloc_u64_bits};

    #[test]
    fn matches_out_of_circuit_twin() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let apk = [0x11u8; 32];
        let r = [0x22u8; 32];
        let v = 7_777_777_u64;

        let apk_bits = alloc_bytes32_bits(cs.namespace(|| "apk"), Some(apk)).unwrap();
        let v_bits = alloc_u64_bits(cs.namespace(|| "v"), Some(v)).unwrap();
        let r_bits = alloc_bytes32_bits(cs.namespace(|| "r"), Some(r)).unwrap();

        let result = commitment(cs.namespace(|| "cm"), &apk_bits, &v_bits, &r_bits).unwrap();
        assert!(cs.is_satisfied());

        let produced = crate::bit_utils::bits_to_bytes32_opt(&result.bits).unwrap();
        let expected = crate::note_calc::commitment(
            zktx_core::Bytes32::from_be_bytes(apk),
            v,
            zktx_core::Bytes32::from_be_bytes(r),
        );
        assert_eq!(produced, expected.to_be_bytes());
    }
}
