//! The exponentiation gadget (`C5`): `y = a^x` over the scalar field,
//! `x` interpreted as a `EXP_SIZE`-bit exponent, unrolled into
//! `EXP_SIZE` square-and-multiply stages.
//!
//! Per stage `i`: `a_exps[i] = a^(2^i)` (stage 0 is `a` itself, each
//! later stage squares the previous one); `x_bins[i]` is bit `i` of `x`
//! (LSB first); the stage's contribution is `x_bins[i] · a_exps[i]`
//! when the bit is set, or `1` when it is not, folded into a running
//! product `tmps3`. Avoiding a selector division keeps every stage to a
//! single multiplication constraint.

use bellman::ConstraintSystem;
use bellman::SynthesisError;
use bellman::gadgets::boolean::Boolean;
use bellman::gadgets::num::AllocatedNum;
use bls12_381::Scalar;

use zktx_core::constants::EXP_SIZE;

use crate::binary_gadget::num_to_bits;

/// Computes `a^x` in-circuit, `x` treated as an `EXP_SIZE`-bit exponent.
///
/// # Errors
/// Propagates `SynthesisError` from witness allocation.
pub fn pow<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    a: &AllocatedNum<Scalar>,
    x: &AllocatedNum<Scalar>,
) -> Result<AllocatedNum<Scalar>, SynthesisError> {
    let x_bits_msb = num_to_bits(cs.namespace(|| "exponent bits"), x, EXP_SIZE)?;
    // x_bins is LSB-first: bit 0 carries weight 2^0.
    let x_bins: Vec<Boolean> = x_bits_msb.into_iter().rev().collect();

    let mut a_exp = a.clone();
    let mut tmps3: Option<AllocatedNum<Scalar>> = None;

    for i in 0..EXP_SIZE {
        if i > 0 {
            let squared = a_exp.mul(cs.namespace(|| format!("square stage {i}")), &a_exp)?;
            a_exp = squared;
        }

        #[allow(clippy::indexing_slicing, reason = "i < EXP_SIZE == x_bins.len() by loop bound")]
        let bit = &x_bins[i];
        let x_inv_bin = bit.not();

        let tmps1 = AllocatedNum::alloc(cs.namespace(|| format!("tmps1 stage {i}")), || {
            let bit_val = bit.get_value().ok_or(SynthesisError::AssignmentMissing)?;
            let a_val = a_exp.get_value().ok_or(SynthesisError::AssignmentMissing)?;
            Ok(if bit_val { a_val } else { Scalar::ZERO })
        })?;
        cs.enforce(
            || format!("tmps1 constraint stage {i}"),
            |lc| lc + &bit.lc(CS::one(), Scalar::ONE),
            |lc| lc + a_exp.get_variable(),
            |lc| lc + tmps1.get_variable(),
        );

        let contribution_value = match (bit.get_value(), tmps1.get_value()) {
            (Some(true), Some(t)) => Some(t),
            (Some(false), Some(_)) => Some(Scalar::ONE),
            _ => None,
        };

        tmps3 = Some(match tmps3 {
            None => {
                let stage = AllocatedNum::alloc(cs.namespace(|| format!("tmps3 stage {i}")), || {
                    contribution_value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                cs.enforce(
                    || format!("tmps3 constraint stage {i}"),
                    |lc| lc + tmps1.get_variable() + &x_inv_bin.lc(CS::one(), Scalar::ONE),
                    |lc| lc + CS::one(),
                    |lc| lc + stage.get_variable(),
                );
                stage
            }
            Some(prev) => {
                let value = match (contribution_value, prev.get_value()) {
                    (Some(c), Some(p)) => Some(c * p),
                    _ => None,
                };
                let stage = AllocatedNum::alloc(cs.namespace(|| format!("tmps3 stage {i}")), || {
                    value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                cs.enforce(
                    || format!("tmps3 constraint stage {i}"),
                    |lc| lc + tmps1.get_variable() + &x_inv_bin.lc(CS::one(), Scalar::ONE),
                    |lc| lc + prev.get_variable(),
                    |lc| lc + stage.get_variable(),
                );
                stage
            }
        });
    }

    Ok(tmps3.expect("EXP_SIZE > 0 guarantees at least one stage"))
}

#[cfg(test)]
mod tests {
    use bellman::gadgets::test::TestConstraintSystem;
    use ff::Field;

    use super::*;

    fn alloc_scalar<CS: ConstraintSystem<Scalar>>(cs: CS, value: Scalar) -> AllocatedNum<Scalar> {
        AllocatedNum::alloc(cs, || Ok(value)).unwrap()
    }

    #[test]
    fn matches_native_pow_for_small_exponent() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let a = Scalar::from(3u64);
        let x = Scalar::from(5u64);

        let a_num = alloc_scalar(cs.namespace(|| "a"), a);
        let x_num = alloc_scalar(cs.namespace(|| "x"), x);

        let y = pow(cs.namespace(|| "pow"), &a_num, &x_num).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(y.get_value().unwrap(), a * a * a * a * a);
    }

    #[test]
    fn matches_native_pow_for_zero_exponent() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let a = Scalar::from(7u64);
        let x = Scalar::ZERO;

        let a_num = alloc_scalar(cs.namespace(|| "a"), a);
        let x_num = alloc_scalar(cs.namespace(|| "x"), x);

        let y = pow(cs.namespace(|| "pow"), &a_num, &x_num).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(y.get_value().unwrap(), Scalar::ONE);
    }
}
