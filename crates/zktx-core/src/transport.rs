//! Base64/hex transport helpers for the bundle wire format (`§6`).
//!
//! These are thin wrappers around the `base64`/`hex` crates; the system
//! treats the codecs themselves as external collaborators, but the
//! length/format checks around them are part of the façade's error
//! contract and live here so both the proofs and circuit crates agree on
//! one implementation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::TxError;

/// Encodes raw bytes as standard base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard base64 string.
///
/// # Errors
/// Returns [`TxError::NotBase64`] if `s` is not valid base64.
pub fn decode_base64(s: &str) -> Result<Vec<u8>, TxError> {
    STANDARD.decode(s).map_err(|_| TxError::NotBase64)
}

/// Checks whether a string is valid standard base64 without decoding it
/// into an owned buffer the caller has to discard.
#[must_use]
pub fn is_base64(s: &str) -> bool {
    STANDARD.decode(s).is_ok()
}
