//! Error types for the proving/verification façade.

use zktx_core::TxError;

/// Errors surfaced by [`crate::generate_parameters`], [`crate::save_parameters`]
/// and [`crate::load_parameters`].
///
/// `prove`/`verify` do not return this type directly: per the façade's
/// error-handling policy they catch every [`TxError`] (and the variants
/// below) and report failure through `TxData::error_code`/`description`
/// or a plain `false`, rather than propagating a `Result`.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// A pool/witness/encoding failure shared with the rest of the workspace.
    #[error(transparent)]
    Tx(#[from] TxError),

    /// The constraint system could not be satisfied, or parameter
    /// generation failed, inside `bellman`.
    #[error("circuit synthesis failed: {0}")]
    Synthesis(#[from] bellman::SynthesisError),

    /// Reading or writing a proving/verifying key file failed.
    #[error("key file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
