//! The `prove` entry point (`§4.12`): builds the transaction circuit's
//! witness from a pool and a payer's secrets, creates the Groth16 proof,
//! and assembles the public bundle plus the governance ciphertext.

use bellman::groth16::create_random_proof;
use rand::RngCore;
use rand::rngs::OsRng;

use zktx_circuit::elgamal::encrypt_bits;
use zktx_circuit::transaction::{OutputWitness, Transaction};
use zktx_circuit::{governance, input_note::InputNoteWitness, note_calc};
use zktx_core::bits::bits_to_bytes;
use zktx_core::constants::{MERKLE_DEPTH, N_IN, N_OUT, mask_to_exp_size, zero_cm, zero_cm_root};
use zktx_core::field::u256_to_field;
use zktx_core::{Bytes32, TxError};
use zktx_pool::{CommitmentPool, build_witness, select_window};

use crate::error::ProofError;
use crate::params::TxParameters;
use crate::types::{GROTH_PROOF_SIZE, TxData};

/// Prepared material for one input note, before it is folded into the
/// circuit witness.
struct InputPlan {
    rt: Bytes32,
    sn: Bytes32,
    witness: InputNoteWitness,
}

/// Resolves input `i`'s `(ask, v, r)` per the zero-value-escape
/// substitution, then either locates its commitment in the pool and
/// builds a real membership witness, or returns the all-zero witness for
/// a zero-valued placeholder input.
fn plan_input(
    pool: &CommitmentPool,
    ask: Bytes32,
    v: u64,
    r: Bytes32,
    is_zero: bool,
) -> Result<InputPlan, TxError> {
    let (ask, v, r) = if is_zero {
        (Bytes32::ZERO, 0, Bytes32::ZERO)
    } else {
        (ask, v, r)
    };

    let sn = note_calc::serial_number(ask, r);

    if is_zero {
        return Ok(InputPlan {
            rt: zero_cm_root(),
            sn,
            witness: InputNoteWitness {
                ask: Some(ask.to_be_bytes()),
                r: Some(r.to_be_bytes()),
                v: Some(v),
                path: vec![Some((zero_cm().to_be_bytes(), false)); MERKLE_DEPTH],
            },
        });
    }

    let apk = note_calc::prf_apk(ask);
    let cm = note_calc::commitment(apk, v, r);
    let target = pool.get_index(&cm)?;
    let mut rng = rand::rng();
    let (from, to) = select_window(&mut rng, pool.size(), target);
    let merkle_witness = build_witness(pool, from, to, target)?;

    let path = merkle_witness
        .path
        .iter()
        .zip(merkle_witness.index_bits.iter())
        .map(|(sibling, is_right)| Some((sibling.to_be_bytes(), *is_right)))
        .collect();

    Ok(InputPlan {
        rt: merkle_witness.root,
        sn,
        witness: InputNoteWitness {
            ask: Some(ask.to_be_bytes()),
            r: Some(r.to_be_bytes()),
            v: Some(v),
            path,
        },
    })
}

/// Checks `vpub_old + Σ v_in >= vpub_new + r_v` without risking overflow,
/// and returns the change value `vpub_old + Σ v_in - vpub_new - r_v`.
fn value_balance(
    vpub_old: u64,
    effective_v: [u64; N_IN],
    vpub_new: u64,
    r_v: u64,
) -> Result<u64, ProofError> {
    let total_in = effective_v
        .iter()
        .try_fold(vpub_old, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| ProofError::Tx(TxError::ProveValue("input value overflowed u64".to_owned())))?;
    let total_out_fixed = vpub_new
        .checked_add(r_v)
        .ok_or_else(|| ProofError::Tx(TxError::ProveValue("output value overflowed u64".to_owned())))?;
    total_in.checked_sub(total_out_fixed).ok_or_else(|| {
        ProofError::Tx(TxError::ProveValue(format!(
            "insufficient value: vpub_old + inputs = {total_in}, vpub_new + r_v = {total_out_fixed}"
        )))
    })
}

#[allow(
    clippy::too_many_arguments,
    reason = "mirrors the reference Tx1To1API::prove signature"
)]
fn try_prove(
    params: &TxParameters,
    pool: &CommitmentPool,
    ask: Bytes32,
    vpub_old: u64,
    v: [u64; N_IN],
    r: [Bytes32; N_IN],
    zero_cm: [bool; N_IN],
    peer_apk: Bytes32,
    vpub_new: u64,
    r_v: u64,
    g: Bytes32,
    gpk: Bytes32,
) -> Result<TxData, ProofError> {
    Bytes32::validate_generator(&g.to_hex()).map_err(ProofError::Tx)?;

    let effective_v = {
        let mut out = [0u64; N_IN];
        for (slot, (value, zero)) in out.iter_mut().zip(v.iter().zip(zero_cm.iter())) {
            *slot = if *zero { 0 } else { *value };
        }
        out
    };
    let change = value_balance(vpub_old, effective_v, vpub_new, r_v)?;

    let mut plans = Vec::with_capacity(N_IN);
    for i in 0..N_IN {
        #[allow(clippy::indexing_slicing, reason = "i < N_IN by loop bound")]
        let plan = plan_input(pool, ask, v[i], r[i], zero_cm[i])?;
        plans.push(plan);
    }

    let payer_apk = note_calc::prf_apk(ask);

    let mut rng = OsRng;
    let mut r_to_payee = [0u8; 32];
    let mut r_change = [0u8; 32];
    rng.fill_bytes(&mut r_to_payee);
    rng.fill_bytes(&mut r_change);
    let r_to_payee = Bytes32::from_be_bytes(r_to_payee);
    let r_change = Bytes32::from_be_bytes(r_change);

    let mut y = [0u8; 32];
    rng.fill_bytes(&mut y);
    // Masked to fit the exponentiation gadget's EXP_SIZE-bit packing constraint;
    // the same masked value feeds both the circuit witness and encrypt_bits below.
    let y = mask_to_exp_size(Bytes32::from_be_bytes(y));

    let in_apks: Vec<Bytes32> = plans
        .iter()
        .map(|plan| plan.witness.ask.map(Bytes32::from_be_bytes).unwrap_or(Bytes32::ZERO))
        .map(note_calc::prf_apk)
        .collect();
    let in_values: Vec<u64> = plans.iter().map(|plan| plan.witness.v.unwrap_or(0)).collect();

    let circuit = Transaction {
        inputs: plans.iter().map(|plan| plan.witness.clone()).collect(),
        rts: plans.iter().map(|plan| Some(plan.rt.to_be_bytes())).collect(),
        sns: plans.iter().map(|plan| Some(plan.sn.to_be_bytes())).collect(),
        outputs: vec![
            OutputWitness {
                apk: Some(peer_apk.to_be_bytes()),
                v: Some(r_v),
                r: Some(r_to_payee.to_be_bytes()),
            },
            OutputWitness {
                apk: Some(payer_apk.to_be_bytes()),
                v: Some(change),
                r: Some(r_change.to_be_bytes()),
            },
        ],
        vpub_old: Some(vpub_old),
        vpub_new: Some(vpub_new),
        g: Some(g.to_be_bytes()),
        gpk: Some(gpk.to_be_bytes()),
        y: Some(y.to_be_bytes()),
    };

    let proof = create_random_proof(circuit, &params.0, &mut rng)?;
    let mut proof_bytes = [0u8; GROTH_PROOF_SIZE];
    proof.write(&mut proof_bytes[..])?;

    let plaintext = governance::plaintext_bits(
        vpub_old,
        &in_apks,
        &in_values,
        vpub_new,
        &[peer_apk, payer_apk],
        &[r_v, change],
    );
    let g_scalar = u256_to_field(g);
    let gpk_scalar = u256_to_field(gpk);
    let y_scalar = u256_to_field(y);
    let ciphertext_bits = encrypt_bits(&plaintext, gpk_scalar, y_scalar, g_scalar);
    let g_data = zktx_core::transport::encode_base64(&bits_to_bytes(&ciphertext_bits));

    let cm_to_payee = note_calc::commitment(peer_apk, r_v, r_to_payee);
    let cm_change = note_calc::commitment(payer_apk, change, r_change);

    Ok(TxData {
        rts: plans.iter().map(|plan| plan.rt).collect(),
        sns: plans.iter().map(|plan| plan.sn).collect(),
        cms: vec![cm_to_payee, cm_change],
        vpub_old,
        vpub_new,
        g,
        gpk,
        proof: zktx_core::transport::encode_base64(&proof_bytes),
        g_data,
        v_to_payee: r_v,
        v_to_payee_r: r_to_payee,
        v_change: change,
        v_change_r: r_change,
        error_code: 0,
        description: String::new(),
    })
}

/// Proves a `(2,2)` shielded transfer: spends up to two input notes
/// (using `zero_cm[i]` to substitute a zero-valued placeholder for an
/// input that does not exist), pays `r_v` to `peer_apk`, and returns the
/// remainder as a change note back to the payer's own `apk`.
///
/// Never panics and never returns a `Result`: any failure (missing
/// commitment, unbalanced values, invalid generator, circuit synthesis
/// failure) is reported through [`TxData::error_code`]/`description`
/// with every other field zeroed, per the façade's error-handling policy
/// (`§4.12`).
#[allow(
    clippy::too_many_arguments,
    reason = "mirrors the reference Tx1To1API::prove signature"
)]
#[must_use]
pub fn prove(
    params: &TxParameters,
    pool: &CommitmentPool,
    ask: Bytes32,
    vpub_old: u64,
    v: [u64; N_IN],
    r: [Bytes32; N_IN],
    zero_cm: [bool; N_IN],
    peer_apk: Bytes32,
    vpub_new: u64,
    r_v: u64,
    g: Bytes32,
    gpk: Bytes32,
) -> TxData {
    match try_prove(params, pool, ask, vpub_old, v, r, zero_cm, peer_apk, vpub_new, r_v, g, gpk) {
        Ok(bundle) => bundle,
        Err(err) => {
            tracing::warn!(error = %err, "prove failed");
            TxData::failed(1, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use zktx_core::constants::default_g;

    use super::*;

    fn scalar(byte: u8) -> Bytes32 {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        Bytes32::from_be_bytes(bytes)
    }

    fn seeded_pool_with_note(ask: Bytes32, r: Bytes32, v: u64) -> CommitmentPool {
        let mut pool = CommitmentPool::new();
        let apk = note_calc::prf_apk(ask);
        let cm = note_calc::commitment(apk, v, r);
        for i in 1..=6u8 {
            if i == 3 {
                pool.append(cm);
            } else {
                pool.append(scalar(i));
            }
        }
        pool
    }

    #[test]
    fn proves_and_verifies_a_real_spend() {
        let params = crate::generate_parameters().expect("parameter generation succeeds");
        let ask = scalar(2);
        let r0 = scalar(1);
        let pool = seeded_pool_with_note(ask, r0, 10);

        let bundle = prove(
            &params,
            &pool,
            ask,
            0,
            [10, 0],
            [r0, Bytes32::ZERO],
            [false, true],
            scalar(20),
            0,
            4,
            default_g(),
            default_g(),
        );

        assert_eq!(bundle.error_code, 0, "{}", bundle.description);
        assert_eq!(bundle.v_to_payee, 4);
        assert_eq!(bundle.v_change, 6);

        let pvk = params.prepared_verifying_key();
        assert!(crate::verify(&pvk, &bundle));
    }

    #[test]
    fn unbalanced_values_fail_cleanly() {
        let params = crate::generate_parameters().expect("parameter generation succeeds");
        let pool = CommitmentPool::new();
        let ask = scalar(9);

        let bundle = prove(
            &params,
            &pool,
            ask,
            0,
            [0, 0],
            [Bytes32::ZERO, Bytes32::ZERO],
            [true, true],
            scalar(1),
            0,
            5,
            default_g(),
            default_g(),
        );

        assert_ne!(bundle.error_code, 0);
        assert!(bundle.proof.is_empty());
    }

    #[test]
    fn invalid_generator_is_rejected_before_proving() {
        let params = crate::generate_parameters().expect("parameter generation succeeds");
        let pool = CommitmentPool::new();
        let ask = scalar(9);

        let bundle = prove(
            &params,
            &pool,
            ask,
            5,
            [0, 0],
            [Bytes32::ZERO, Bytes32::ZERO],
            [true, true],
            scalar(1),
            5,
            0,
            Bytes32::ZERO,
            default_g(),
        );

        assert_ne!(bundle.error_code, 0);
    }
}
