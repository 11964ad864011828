//! PRF / SN / CM calculators (`C3`): the out-of-circuit SHA-256
//! compression chains that the circuit gadgets in [`crate::sha256_compress`]
//! and [`crate::commitment_gadget`] must reproduce bit-for-bit.
//!
//! Each function here consumes exactly one or two 512-bit compression
//! blocks, per the byte layouts fixed by `§3`.

use zktx_core::hash::{compress_block, compress_pair};
use zktx_core::Bytes32;

/// `apk = H(ask ‖ ask)` — one compression block.
#[must_use]
pub fn prf_apk(ask: Bytes32) -> Bytes32 {
    let ask_bytes = ask.to_be_bytes();
    Bytes32::from_be_bytes(compress_pair(&ask_bytes, &ask_bytes))
}

/// `sn = H(ask ‖ r)` — one compression block.
#[must_use]
pub fn serial_number(ask: Bytes32, r: Bytes32) -> Bytes32 {
    Bytes32::from_be_bytes(compress_pair(&ask.to_be_bytes(), &r.to_be_bytes()))
}

/// `cm = H( H(apk ‖ v ‖ v ‖ v ‖ v) ‖ r )`, `v` as its 8-byte
/// little-endian encoding repeated four times.
#[must_use]
pub fn commitment(apk: Bytes32, v: u64, r: Bytes32) -> Bytes32 {
    let mut block = [0u8; 64];
    block[..32].copy_from_slice(&apk.to_be_bytes());
    let v_bytes = v.to_le_bytes();
    for chunk in block[32..].chunks_mut(8) {
        chunk.copy_from_slice(&v_bytes);
    }
    let intermediate = compress_block(&block);
    Bytes32::from_be_bytes(compress_pair(&intermediate, &r.to_be_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(byte: u8) -> Bytes32 {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        Bytes32::from_be_bytes(bytes)
    }

    #[test]
    fn prf_is_deterministic_and_key_sensitive() {
        let ask = scalar(7);
        assert_eq!(prf_apk(ask), prf_apk(ask));
        assert_ne!(prf_apk(ask), prf_apk(scalar(8)));
    }

    #[test]
    fn serial_number_depends_on_both_inputs() {
        let ask = scalar(1);
        let r = scalar(2);
        assert_ne!(serial_number(ask, r), serial_number(r, ask));
    }

    #[test]
    fn commitment_is_deterministic_for_randomized_triples() {
        for i in 0u8..100 {
            let apk = scalar(i);
            let r = scalar(i.wrapping_add(1));
            let v = u64::from(i) * 997;
            assert_eq!(commitment(apk, v, r), commitment(apk, v, r));
        }
    }

    #[test]
    fn commitment_is_sensitive_to_value() {
        let apk = scalar(3);
        let r = scalar(4);
        assert_ne!(commitment(apk, 10, r), commitment(apk, 11, r));
    }
}
