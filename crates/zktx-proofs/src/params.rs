//! Groth16 parameter generation and persistence for the transaction
//! circuit (`setup`/`generate`, `§5`).

use std::path::Path;

use bellman::groth16::{
    Parameters, PreparedVerifyingKey, VerifyingKey, generate_random_parameters,
    prepare_verifying_key,
};
use bls12_381::Bls12;
use rand::rngs::OsRng;

use zktx_circuit::Transaction;

use crate::error::ProofError;

/// The proving key, together with its embedded verifying key.
pub struct TxParameters(pub Parameters<Bls12>);

impl TxParameters {
    /// Returns the verifying key.
    #[must_use]
    pub const fn verifying_key(&self) -> &VerifyingKey<Bls12> {
        &self.0.vk
    }

    /// Returns a prepared verifying key for efficient verification.
    #[must_use]
    pub fn prepared_verifying_key(&self) -> PreparedVerifyingKey<Bls12> {
        prepare_verifying_key(&self.0.vk)
    }
}

/// Generates fresh Groth16 parameters for the `(2,2)` transaction
/// circuit. Computationally expensive; callers should run this once and
/// persist the result with [`save_parameters`].
///
/// # Errors
/// Returns an error if circuit synthesis fails.
pub fn generate_parameters() -> Result<TxParameters, ProofError> {
    let mut rng = OsRng;
    let empty_circuit = Transaction::unknown();
    let params = generate_random_parameters::<Bls12, _, _>(empty_circuit, &mut rng)?;
    Ok(TxParameters(params))
}

/// Writes the proving key and its verifying key to separate files.
///
/// # Errors
/// Returns an error if either file cannot be created or written.
pub fn save_parameters(
    params: &TxParameters,
    proving_key_path: &Path,
    verifying_key_path: &Path,
) -> Result<(), ProofError> {
    let mut proving_file = std::fs::File::create(proving_key_path)?;
    params.0.write(&mut proving_file)?;

    let mut verifying_file = std::fs::File::create(verifying_key_path)?;
    params.0.vk.write(&mut verifying_file)?;

    Ok(())
}

/// Reads a proving key (and its embedded verifying key) from a file.
///
/// `checked` controls whether curve points are subgroup-checked on load;
/// pass `true` unless the file is known to come from a trusted setup run
/// in this process.
///
/// # Errors
/// Returns an error if the file cannot be read or does not contain valid
/// parameters.
pub fn load_parameters(proving_key_path: &Path, checked: bool) -> Result<TxParameters, ProofError> {
    let file = std::fs::File::open(proving_key_path)?;
    let reader = std::io::BufReader::new(file);
    let params = Parameters::read(reader, checked).map_err(ProofError::Io)?;
    Ok(TxParameters(params))
}

/// Reads only a verifying key from a file (the `vk`-only half of a
/// persisted parameter pair, for verifier-only deployments).
///
/// # Errors
/// Returns an error if the file cannot be read or does not contain a
/// valid verifying key.
pub fn load_verifying_key(verifying_key_path: &Path) -> Result<VerifyingKey<Bls12>, ProofError> {
    let file = std::fs::File::open(verifying_key_path)?;
    let reader = std::io::BufReader::new(file);
    VerifyingKey::read(reader).map_err(ProofError::Io)
}
