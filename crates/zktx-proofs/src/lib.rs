//! Groth16 setup, proving and verification façade for the shielded
//! two-input/two-output transfer circuit in [`zktx_circuit`].
//!
//! This is the crate a wallet or service actually links against: it owns
//! the process-wide proving/verifying key [`registry`], the `setup` /
//! `prove` / `verify` / `decrypt_tx_info` entry points, and the bundle
//! types ([`TxData`], [`TxGovInfo`]) those entry points speak. Everything
//! below it — [`zktx_circuit`], [`zktx_pool`], [`zktx_core`] — is pure
//! value types and constraint-system plumbing with no I/O or process
//! state; this crate is where those two worlds meet.

mod decrypt;
mod error;
mod params;
mod prover;
mod types;
mod verifier;
mod zkg_tool;

pub mod registry;

pub use decrypt::decrypt_tx_info;
pub use error::ProofError;
pub use params::{TxParameters, generate_parameters, load_parameters, load_verifying_key, save_parameters};
pub use prover::prove;
pub use types::{
    GROTH_PROOF_SIZE, GrothProofBytes, TxData, TxGovInfo, expected_gdata_base64_len,
    expected_proof_base64_len,
};
pub use verifier::verify;
pub use zkg_tool::{generate_apk, generate_gpk, is_same_uint256_str, is_uint256_hex, is_valid_fp_generator};
