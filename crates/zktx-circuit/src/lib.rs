//! The arithmetic circuit for a shielded, regulated value-transfer
//! transaction: commitment/serial-number calculators, windowed
//! Merkle-tree membership, in-circuit modular exponentiation, an
//! ElGamal encryption gadget, and the top-level transaction circuit
//! that ties them together.

pub mod bit_utils;
pub mod binary_gadget;
pub mod commitment_gadget;
pub mod elgamal;
pub mod exp_gadget;
pub mod governance;
pub mod input_note;
pub mod merkle_gadget;
pub mod note_calc;
pub mod output_note;
pub mod sha256_compress;
pub mod transaction;

pub use transaction::Transaction;
