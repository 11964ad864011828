//! The binary (packing) gadget (`C4`): a bidirectional relationship
//! between a bit array and a scalar witness, enforced by a single R1CS
//! constraint `r = Σ 2^i · A[i]`.
//!
//! `A` is MSB-first; the constraint sums weights with the array
//! reversed so that the least significant bit carries weight `2^0`.

use bellman::ConstraintSystem;
use bellman::LinearCombination;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;
use ff::Field;

use zktx_core::field::field_to_u256;

fn packing_lc<CS: ConstraintSystem<Scalar>>(bits_msb: &[Boolean]) -> LinearCombination<Scalar> {
    let mut coeff = Scalar::ONE;
    let mut lc = LinearCombination::zero();
    for bit in bits_msb.iter().rev() {
        lc = lc + &bit.lc(CS::one(), coeff);
        coeff = coeff.double();
    }
    lc
}

/// Forward direction: packs an MSB-first bit array into a scalar
/// witness `r = Σ 2^i · A[i]`.
///
/// # Errors
/// Propagates `SynthesisError` from witness allocation.
pub fn bits_to_num<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    bits_msb: &[Boolean],
) -> Result<AllocatedNum<Scalar>, SynthesisError> {
    let value = crate::bit_utils::bits_to_bool_vec_opt(bits_msb).map(|bits| {
        let mut acc = Scalar::ZERO;
        for bit in bits {
            acc = acc.double();
            if bit {
                acc += Scalar::ONE;
            }
        }
        acc
    });

    let num = AllocatedNum::alloc(cs.namespace(|| "packed"), || {
        value.ok_or(SynthesisError::AssignmentMissing)
    })?;

    cs.enforce(
        || "packing constraint",
        |_| packing_lc::<CS>(bits_msb),
        |lc| lc + CS::one(),
        |lc| lc + num.get_variable(),
    );

    Ok(num)
}

/// Reverse direction: unpacks a scalar witness into `bit_len`
/// MSB-first bits, tied to the scalar by the same single constraint.
///
/// # Errors
/// Propagates `SynthesisError` from witness allocation.
pub fn num_to_bits<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    num: &AllocatedNum<Scalar>,
    bit_len: usize,
) -> Result<Vec<Boolean>, SynthesisError> {
    let bits_value = num.get_value().map(|value| {
        let u256 = field_to_u256(value);
        let all_bits = zktx_core::bits::bytes_to_bits(&u256.to_be_bytes());
        all_bits[all_bits.len() - bit_len..].to_vec()
    });

    let bits = crate::bit_utils::alloc_bits(
        cs.namespace(|| "unpacked bits"),
        bits_value.as_deref(),
        bit_len,
    )?;

    cs.enforce(
        || "unpacking constraint",
        |_| packing_lc::<CS>(&bits),
        |lc| lc + CS::one(),
        |lc| lc + num.get_variable(),
    );

    Ok(bits)
}

/// Chunks `bits` (MSB-first) into [`zktx_core::field::field_capacity`]-sized
/// pieces, packs each into a scalar via [`bits_to_num`], and exposes every
/// chunk as a public input, in order.
///
/// This is the transaction gadget's multipacking step (`§4.11` step 3):
/// the unpacked public-input bit buffer is witnessed privately, then this
/// function is what actually makes the transaction's public inputs.
///
/// # Errors
/// Propagates `SynthesisError` from [`bits_to_num`] or `inputize`.
pub fn multipack_and_inputize<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    bits: &[Boolean],
) -> Result<Vec<AllocatedNum<Scalar>>, SynthesisError> {
    let capacity = zktx_core::field::field_capacity();
    bits.chunks(capacity)
        .enumerate()
        .map(|(i, chunk)| {
            let mut cs = cs.namespace(|| format!("chunk {i}"));
            let num = bits_to_num(cs.namespace(|| "pack"), chunk)?;
            num.inputize(cs.namespace(|| "inputize"))?;
            Ok(num)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bellman::gadgets::boolean::AllocatedBit;
    use bellman::gadgets::test::TestConstraintSystem;

    use super::*;

    #[test]
    fn pack_then_unpack_round_trips() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let byte = 0b1010_1100u8;
        let bits_in = zktx_core::bits::bytes_to_bits(&[byte]);

        let allocated: Vec<Boolean> = bits_in
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Boolean::from(
                    AllocatedBit::alloc(cs.namespace(|| format!("in {i}")), Some(*b)).unwrap(),
                )
            })
            .collect();

        let num = bits_to_num(cs.namespace(|| "pack"), &allocated).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(num.get_value().unwrap(), Scalar::from(u64::from(byte)));

        let round_tripped = num_to_bits(cs.namespace(|| "unpack"), &num, 8).unwrap();
        assert!(cs.is_satisfied());
        let round_tripped_bits: Vec<bool> = round_tripped
            .iter()
            .map(|b| b.get_value().unwrap())
            .collect();
        assert_eq!(round_tripped_bits, bits_in);
    }
}
