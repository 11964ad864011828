//! Governance decryption (`§4.13`): recovers a transaction's plaintext
//! view from `Gsk` and its `G_data` ciphertext, for the overseer.

use zktx_circuit::elgamal::decrypt_bits;
use zktx_circuit::governance::gov_data_bit_size;
use zktx_core::Bytes32;
use zktx_core::bits::{bits_to_bytes, bits_to_u64, bytes_to_bits};
use zktx_core::constants::{N_IN, N_OUT};
use zktx_core::field::u256_to_field;
use zktx_core::transport::decode_base64;

use crate::types::TxGovInfo;

/// Decrypts `g_data` under `gsk` and parses the plaintext back into a
/// [`TxGovInfo`].
///
/// Never panics: an invalid `gsk`, malformed `g_data`, or a ciphertext
/// that does not match the fixed `(2,2)` layout returns
/// [`TxGovInfo::default`]. Decryption under the wrong `gsk` does not
/// itself fail — it recovers garbage `apk`/value pairs — since ElGamal
/// gives no built-in way to detect that; only a shape/length mismatch is
/// treated as an error here.
#[must_use]
pub fn decrypt_tx_info(gsk: &str, g_data: &str) -> TxGovInfo {
    try_decrypt(gsk, g_data).unwrap_or_default()
}

fn take<'a>(bits: &'a [bool], cursor: &mut usize, len: usize) -> Option<&'a [bool]> {
    let end = cursor.checked_add(len)?;
    let slice = bits.get(*cursor..end)?;
    *cursor = end;
    Some(slice)
}

fn read_apk(bits: &[bool], cursor: &mut usize) -> Option<Bytes32> {
    let slice = take(bits, cursor, 256)?;
    let bytes: [u8; 32] = bits_to_bytes(slice).try_into().ok()?;
    Some(Bytes32::from_be_bytes(bytes))
}

fn read_value(bits: &[bool], cursor: &mut usize) -> Option<u64> {
    let slice = take(bits, cursor, 64)?;
    Some(bits_to_u64(slice))
}

fn try_decrypt(gsk: &str, g_data: &str) -> Option<TxGovInfo> {
    let gsk = Bytes32::from_hex("Gsk", gsk).ok()?;
    let gsk_scalar = u256_to_field(gsk);

    let ciphertext = decode_base64(g_data).ok()?;
    let ciphertext_bits = bytes_to_bits(&ciphertext);
    if ciphertext_bits.len() != gov_data_bit_size(N_IN, N_OUT) {
        return None;
    }

    let plaintext_bytes = decrypt_bits(&ciphertext_bits, gsk_scalar);
    let plaintext_bits = bytes_to_bits(&plaintext_bytes);

    let mut cursor = 0usize;
    let vpub_old = read_value(&plaintext_bits, &mut cursor)?;
    let mut in_apks = Vec::with_capacity(N_IN);
    let mut in_values = Vec::with_capacity(N_IN);
    for _ in 0..N_IN {
        in_apks.push(read_apk(&plaintext_bits, &mut cursor)?);
        in_values.push(read_value(&plaintext_bits, &mut cursor)?);
    }
    let vpub_new = read_value(&plaintext_bits, &mut cursor)?;
    let mut out_apks = Vec::with_capacity(N_OUT);
    let mut out_values = Vec::with_capacity(N_OUT);
    for _ in 0..N_OUT {
        out_apks.push(read_apk(&plaintext_bits, &mut cursor)?);
        out_values.push(read_value(&plaintext_bits, &mut cursor)?);
    }

    Some(TxGovInfo {
        vpub_old,
        vpub_new,
        in_apks,
        in_values,
        out_apks,
        out_values,
    })
}

#[cfg(test)]
mod tests {
    use zktx_circuit::elgamal::{encrypt_bits, field_pow};
    use zktx_circuit::governance::plaintext_bits;
    use zktx_core::field::field_to_u256;
    use zktx_core::transport::encode_base64;

    use super::*;

    fn scalar(byte: u8) -> Bytes32 {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        Bytes32::from_be_bytes(bytes)
    }

    #[test]
    fn round_trips_a_plaintext_through_encryption() {
        let gsk = scalar(7);
        let gsk_scalar = u256_to_field(gsk);
        let g = zktx_core::constants::default_g();
        let g_scalar = u256_to_field(g);
        let gpk_scalar = field_pow(g_scalar, gsk_scalar);
        let gpk = field_to_u256(gpk_scalar);
        let y = scalar(42);
        let y_scalar = u256_to_field(y);

        let apk0 = scalar(1);
        let apk1 = scalar(2);
        let apk2 = scalar(3);
        let apk3 = scalar(4);

        let plaintext = plaintext_bits(10, &[apk0, apk1], &[5, 6], 3, &[apk2, apk3], &[7, 8]);
        let ciphertext_bits = encrypt_bits(&plaintext, gpk_scalar, y_scalar, g_scalar);
        let g_data = encode_base64(&bits_to_bytes(&ciphertext_bits));

        let info = decrypt_tx_info(&gsk.to_hex(), &g_data);
        assert_eq!(info.vpub_old, 10);
        assert_eq!(info.vpub_new, 3);
        assert_eq!(info.in_apks, vec![apk0, apk1]);
        assert_eq!(info.in_values, vec![5, 6]);
        assert_eq!(info.out_apks, vec![apk2, apk3]);
        assert_eq!(info.out_values, vec![7, 8]);
    }

    #[test]
    fn invalid_gsk_hex_returns_default() {
        let info = decrypt_tx_info("not hex!!", "");
        assert_eq!(info, TxGovInfo::default());
    }

    #[test]
    fn invalid_base64_returns_default() {
        let info = decrypt_tx_info(&scalar(1).to_hex(), "not base64!!");
        assert_eq!(info, TxGovInfo::default());
    }
}
