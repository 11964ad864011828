//! Key-derivation and validation helpers, mirroring the reference
//! implementation's `ZkgTool` (`§4.13`).

use zktx_circuit::elgamal::field_pow;
use zktx_circuit::note_calc;
use zktx_core::Bytes32;
use zktx_core::constants::default_g;
use zktx_core::field::{field_to_u256, u256_to_field};

/// Derives a spend authority's `apk` from its `ask`.
#[must_use]
pub fn generate_apk(ask: Bytes32) -> Bytes32 {
    note_calc::prf_apk(ask)
}

/// Derives an ElGamal public key `Gpk = generator^gsk`, defaulting to
/// [`default_g`] when `generator` is `None`.
#[must_use]
pub fn generate_gpk(gsk: Bytes32, generator: Option<Bytes32>) -> Bytes32 {
    let generator = generator.unwrap_or_else(default_g);
    let gpk_scalar = field_pow(u256_to_field(generator), u256_to_field(gsk));
    field_to_u256(gpk_scalar)
}

/// Checks whether `s` is at most 64 hex characters (the `uint256S`
/// parsing convention, zero-extended on the high side).
#[must_use]
pub fn is_uint256_hex(s: &str) -> bool {
    s.len() <= 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Checks whether `s` is a valid ElGamal generator: exactly 64 hex
/// characters whose leading nibble is `3`.
#[must_use]
pub fn is_valid_fp_generator(s: &str) -> bool {
    Bytes32::validate_generator(s).is_ok()
}

/// Compares two `uint256S`-style hex strings for equality as 256-bit
/// values (zero-extension aware, not a literal string comparison).
#[must_use]
pub fn is_same_uint256_str(a: &str, b: &str) -> bool {
    match (Bytes32::from_hex("a", a), Bytes32::from_hex("b", b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
