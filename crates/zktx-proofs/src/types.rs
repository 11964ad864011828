//! Bundle types shared between the prover and the verifier, modeled on
//! the reference implementation's `Tx1To1Param`/`Tx1To1GovInfo`.

use serde::{Deserialize, Serialize};

use zktx_circuit::governance::gov_data_bit_size;
use zktx_core::Bytes32;

/// Groth16 proof size in bytes (2 G1 points + 1 G2 point = 2*48 + 96 = 192).
pub const GROTH_PROOF_SIZE: usize = 192;

/// Groth16 proof bytes.
pub type GrothProofBytes = [u8; GROTH_PROOF_SIZE];

/// Standard-base64 length of an encoded Groth16 proof, computed (not
/// hard-coded, per the reference implementation's Open Question on
/// `Tx1To1Data::set_proof`'s `408`/`300` sanity checks) from
/// [`GROTH_PROOF_SIZE`]: `4 * ceil(n/3)`, padded to a multiple of 4.
#[must_use]
pub const fn expected_proof_base64_len() -> usize {
    GROTH_PROOF_SIZE.div_ceil(3) * 4
}

/// Standard-base64 length of an encoded governance ciphertext for
/// `n_in` inputs and `n_out` outputs, computed from
/// [`gov_data_bit_size`] rather than hard-coded.
#[must_use]
pub fn expected_gdata_base64_len(n_in: usize, n_out: usize) -> usize {
    let bytes = gov_data_bit_size(n_in, n_out).div_ceil(8);
    bytes.div_ceil(3) * 4
}

/// A `(2,2)` shielded transfer bundle: everything `verify` needs to check
/// a proof, plus the secret change/payment randomness the caller needs to
/// spend the new notes later.
///
/// On failure (per the error-handling policy), `prove` still returns one
/// of these with `error_code != 0` and a human-readable `description`,
/// rather than a `Result`; every other field is then zeroed/empty and
/// must not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxData {
    /// Merkle root per input, positional with `sns`.
    pub rts: Vec<Bytes32>,
    /// Serial number per input.
    pub sns: Vec<Bytes32>,
    /// Note commitment per output.
    pub cms: Vec<Bytes32>,
    /// Transparent value entering the shielded set.
    pub vpub_old: u64,
    /// Transparent value leaving the shielded set.
    pub vpub_new: u64,
    /// ElGamal generator used for the governance ciphertext.
    pub g: Bytes32,
    /// Overseer's ElGamal public key.
    pub gpk: Bytes32,
    /// Base64-encoded Groth16 proof.
    pub proof: String,
    /// Base64-encoded governance ciphertext (`G_data`).
    pub g_data: String,
    /// Value of the payment output.
    pub v_to_payee: u64,
    /// Randomness of the payment output's commitment.
    pub v_to_payee_r: Bytes32,
    /// Value of the change output.
    pub v_change: u64,
    /// Randomness of the change output's commitment.
    pub v_change_r: Bytes32,
    /// `0` on success; a nonzero code identifies the failure class.
    pub error_code: u64,
    /// Human-readable description, set together with `error_code`.
    pub description: String,
}

impl TxData {
    /// A zeroed bundle carrying an error, per the façade's
    /// catch-everything error policy.
    #[must_use]
    pub fn failed(error_code: u64, description: impl Into<String>) -> Self {
        Self {
            rts: vec![Bytes32::ZERO; zktx_core::constants::N_IN],
            sns: vec![Bytes32::ZERO; zktx_core::constants::N_IN],
            cms: vec![Bytes32::ZERO; zktx_core::constants::N_OUT],
            vpub_old: 0,
            vpub_new: 0,
            g: Bytes32::ZERO,
            gpk: Bytes32::ZERO,
            proof: String::new(),
            g_data: String::new(),
            v_to_payee: 0,
            v_to_payee_r: Bytes32::ZERO,
            v_change: 0,
            v_change_r: Bytes32::ZERO,
            error_code,
            description: description.into(),
        }
    }
}

/// The governance authority's decrypted view of one transaction: every
/// input and output note's `(apk, value)` pair in the clear, plus the two
/// transparent values. Mirrors `Tx1To1GovInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxGovInfo {
    /// Transparent value entering the shielded set.
    pub vpub_old: u64,
    /// Transparent value leaving the shielded set.
    pub vpub_new: u64,
    /// Input notes' `apk`s, in circuit order.
    pub in_apks: Vec<Bytes32>,
    /// Input notes' values, positional with `in_apks`.
    pub in_values: Vec<u64>,
    /// Output notes' `apk`s, in circuit order.
    pub out_apks: Vec<Bytes32>,
    /// Output notes' values, positional with `out_apks`.
    pub out_values: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_base64_len_matches_the_2_2_circuit() {
        // 192-byte proof -> ceil(192/3)*4 = 256 base64 characters, no padding.
        assert_eq!(expected_proof_base64_len(), 256);
    }

    #[test]
    fn gdata_base64_len_matches_the_2_2_circuit() {
        // gov_data_bit_size(2, 2) = 256 + 256*6 = 1792 bits = 224 bytes.
        // ceil(224/3)*4 = 300 base64 characters.
        assert_eq!(expected_gdata_base64_len(2, 2), 300);
    }

    #[test]
    fn tx_data_round_trips_through_json() {
        let bundle = TxData::failed(1, "test");
        let json = serde_json::to_string(&bundle).expect("serializes");
        let back: TxData = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(bundle, back);
    }
}
