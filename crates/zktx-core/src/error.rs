//! Error kinds shared by the pool, circuit and façade crates.
//!
//! Every fallible boundary in the workspace returns one of these variants;
//! keeping them in one enum (rather than one per crate) means the façade
//! can catch everything with a single `match` at the `prove`/`verify`
//! boundary, as required by the error-handling policy.

use std::path::PathBuf;

/// Errors surfaced anywhere in the shielded-transfer stack.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// A commitment pool range query fell outside `[0, size())`.
    #[error("commitment pool range out of bounds: from={from}, to={to}, size={size}")]
    CmPoolRange {
        /// Requested lower bound.
        from: usize,
        /// Requested upper bound.
        to: usize,
        /// Current pool size.
        size: usize,
    },

    /// A commitment was not found in the pool's reverse index.
    #[error("commitment not found in pool")]
    CmNotFound,

    /// The witness-map public-input vector had the wrong length.
    #[error("prove parameters length mismatch: expected {expected}, got {actual}")]
    ProveParamsLength {
        /// Expected length.
        expected: usize,
        /// Actual length supplied.
        actual: usize,
    },

    /// The constraint system rejected the witness (invalid inputs).
    #[error("witness does not satisfy the constraint system")]
    ProveNotSatisfied,

    /// Value-balance validation failed before a proof was attempted.
    #[error("value balance does not hold: {0}")]
    ProveValue(String),

    /// The ElGamal generator `g` failed its format/range test.
    #[error("generator g is not a valid group element: {0}")]
    GovGenerator(String),

    /// A named 256-bit scalar was not valid hex.
    #[error("{0} is not a valid 256-bit hex scalar")]
    NotUint256(String),

    /// A transport string was not valid base64.
    #[error("value is not valid base64")]
    NotBase64,

    /// A decoded proof had the wrong byte length.
    #[error("proof has unexpected length: {0} bytes")]
    ProofLength(usize),

    /// A decoded governance ciphertext had the wrong bit length.
    #[error("G_data has unexpected length: {0} bits")]
    GDataLength(usize),

    /// A persisted key file was not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Generic encoding failure (wrong width, malformed hex, ...).
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Underlying filesystem I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
