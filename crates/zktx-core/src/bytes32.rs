//! The 256-bit opaque scalar type used for keys, randomness, commitments,
//! serial numbers and roots throughout the system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TxError;

/// A 256-bit value, stored big-endian, hex-serialized big-endian.
///
/// Hex parsing follows `uint256S` semantics: up to 64 case-insensitive hex
/// characters, zero-extended on the high side when shorter. No `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Bytes32(pub [u8; 32]);

impl Bytes32 {
    /// The all-zero value.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wraps a raw big-endian byte array.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw big-endian bytes.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Parses a hex string, zero-extending on the high side like `uint256S`.
    ///
    /// # Errors
    /// Returns [`TxError::NotUint256`] if the string is longer than 64
    /// characters or contains non-hex digits.
    pub fn from_hex(name: &str, s: &str) -> Result<Self, TxError> {
        if s.len() > 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxError::NotUint256(name.to_owned()));
        }
        let mut padded = String::with_capacity(64);
        for _ in 0..(64 - s.len()) {
            padded.push('0');
        }
        padded.push_str(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|_| TxError::NotUint256(name.to_owned()))?;
        Ok(Self(bytes))
    }

    /// Renders as a lowercase, zero-padded 64-character hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Validates the ElGamal generator convention: exactly 64 hex chars
    /// whose leading nibble is `3`, i.e. `g ∈ (2^254, 2^255)`.
    ///
    /// # Errors
    /// Returns [`TxError::GovGenerator`] if the nibble check fails.
    pub fn validate_generator(s: &str) -> Result<Self, TxError> {
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxError::GovGenerator(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let leading = s
            .as_bytes()
            .first()
            .copied()
            .ok_or_else(|| TxError::GovGenerator("empty generator".to_owned()))?;
        if !leading.eq_ignore_ascii_case(&b'3') {
            return Err(TxError::GovGenerator(format!(
                "leading nibble must be 3, got {}",
                leading as char
            )));
        }
        Self::from_hex("g", s)
    }
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes32({})", self.to_hex())
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Bytes32 {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex("Bytes32", s)
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Bytes32> for [u8; 32] {
    fn from(value: Bytes32) -> Self {
        value.0
    }
}

impl Serialize for Bytes32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex("Bytes32", &s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_full_width_hex() {
        let hex = "ed6dd816927506bf94f63865d5792bfca5a1a14237494b74367e143df2caf7c6";
        let value = Bytes32::from_hex("cm", hex).expect("valid hex");
        assert_eq!(value.to_hex(), hex);
    }

    #[test]
    fn zero_extends_short_hex_on_high_side() {
        let value = Bytes32::from_hex("ask", "02").expect("valid hex");
        assert_eq!(value.to_be_bytes()[31], 0x02);
        assert_eq!(value.to_be_bytes()[..31], [0u8; 31]);
    }

    #[test]
    fn rejects_overlong_hex() {
        let too_long = "0".repeat(65);
        assert!(Bytes32::from_hex("x", &too_long).is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Bytes32::from_hex("x", "zz").is_err());
    }

    #[test]
    fn default_generator_validates() {
        let g = "39061f1c854fae629b599d29cefe1f12bc4809aa681809bfaaeb1b7087be6fed";
        assert!(Bytes32::validate_generator(g).is_ok());
    }

    #[test]
    fn generator_rejects_wrong_leading_nibble() {
        let bad = "40061f1c854fae629b599d29cefe1f12bc4809aa681809bfaaeb1b7087be6fed";
        assert!(matches!(
            Bytes32::validate_generator(bad),
            Err(TxError::GovGenerator(_))
        ));
        let bad2 = "20061f1c854fae629b599d29cefe1f12bc4809aa681809bfaaeb1b7087be6fed";
        assert!(matches!(
            Bytes32::validate_generator(bad2),
            Err(TxError::GovGenerator(_))
        ));
    }
}
