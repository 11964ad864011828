//! Public-input reconstruction and Groth16 verification (`§7`).
//!
//! `verify` rebuilds the exact public-input bit buffer the transaction
//! circuit allocates in [`zktx_circuit::transaction::Transaction::synthesize`]
//! from a [`TxData`] bundle, multipacks it the same way the circuit's
//! `multipack_and_inputize` does, and checks the proof against it.

use bellman::groth16::{PreparedVerifyingKey, Proof, verify_proof};
use bls12_381::Bls12;

use zktx_circuit::governance::gov_data_bit_size;
use zktx_core::bits::{bytes_to_bits, u64_to_bits};
use zktx_core::constants::{N_IN, N_OUT};
use zktx_core::field::multipack_bits;
use zktx_core::transport::decode_base64;

use crate::types::{GROTH_PROOF_SIZE, TxData};

/// Rebuilds the public-input bit buffer in allocation order: `(rt_i,
/// sn_i)` per input, `cm_j` per output, `vpub_old`, `vpub_new`, `g`,
/// `Gpk`, then the governance ciphertext bits.
///
/// Returns `None` if the bundle's field lengths don't match the fixed
/// `(2,2)` shape or `g_data` isn't valid base64 of the expected bit
/// length — a malformed bundle rather than a synthesis failure.
fn rebuild_public_bits(bundle: &TxData) -> Option<Vec<bool>> {
    if bundle.rts.len() != N_IN || bundle.sns.len() != N_IN || bundle.cms.len() != N_OUT {
        return None;
    }

    let mut bits = Vec::new();
    for (rt, sn) in bundle.rts.iter().zip(bundle.sns.iter()) {
        bits.extend(bytes_to_bits(&rt.to_be_bytes()));
        bits.extend(bytes_to_bits(&sn.to_be_bytes()));
    }
    for cm in &bundle.cms {
        bits.extend(bytes_to_bits(&cm.to_be_bytes()));
    }

    bits.extend(u64_to_bits(bundle.vpub_old));
    bits.extend(u64_to_bits(bundle.vpub_new));
    bits.extend(bytes_to_bits(&bundle.g.to_be_bytes()));
    bits.extend(bytes_to_bits(&bundle.gpk.to_be_bytes()));

    let g_data = decode_base64(&bundle.g_data).ok()?;
    let g_data_bits = bytes_to_bits(&g_data);
    if g_data_bits.len() != gov_data_bit_size(N_IN, N_OUT) {
        return None;
    }
    bits.extend(g_data_bits);

    Some(bits)
}

/// Verifies a transaction bundle's Groth16 proof against the prepared
/// verifying key.
///
/// Never panics and never propagates an error: a malformed bundle
/// (wrong lengths, invalid base64, wrong proof size) is simply rejected
/// as `false`, per the façade's catch-everything error policy.
#[must_use]
pub fn verify(pvk: &PreparedVerifyingKey<Bls12>, bundle: &TxData) -> bool {
    let Ok(proof_bytes) = decode_base64(&bundle.proof) else {
        return false;
    };
    if proof_bytes.len() != GROTH_PROOF_SIZE {
        return false;
    }
    let Ok(proof) = Proof::<Bls12>::read(&proof_bytes[..]) else {
        return false;
    };

    let Some(public_bits) = rebuild_public_bits(bundle) else {
        return false;
    };
    let public_inputs = multipack_bits(&public_bits);

    verify_proof(pvk, &proof, &public_inputs).is_ok()
}

#[cfg(test)]
mod tests {
    use zktx_core::Bytes32;

    use super::*;

    #[test]
    fn rejects_invalid_base64_proof() {
        let params = crate::generate_parameters().expect("params");
        let pvk = params.prepared_verifying_key();
        let mut bundle = TxData::failed(0, "");
        bundle.proof = "not base64!!".to_owned();
        assert!(!verify(&pvk, &bundle));
    }

    #[test]
    fn rejects_wrong_length_proof() {
        let params = crate::generate_parameters().expect("params");
        let pvk = params.prepared_verifying_key();
        let bundle = TxData::failed(0, "");
        assert!(bundle.proof.is_empty());
        assert!(!verify(&pvk, &bundle));
    }

    #[test]
    fn rejects_wrong_shape_bundle() {
        let params = crate::generate_parameters().expect("params");
        let pvk = params.prepared_verifying_key();
        let mut bundle = TxData::failed(0, "");
        bundle.rts = vec![Bytes32::ZERO];
        assert!(!verify(&pvk, &bundle));
    }
}
