//! Shared scalar types, bit/byte codecs and error kinds for the shielded
//! two-input/two-output transfer circuit and its surrounding façade.
//!
//! This crate carries no circuit logic; it is the vocabulary every other
//! crate in the workspace speaks: [`Bytes32`] for 256-bit opaque scalars,
//! the bit-packing helpers in [`bits`], the field bridge in [`field`], the
//! transport codecs in [`transport`], and the [`error::TxError`] kinds
//! returned at every fallible boundary.

pub mod bits;
pub mod bytes32;
pub mod constants;
pub mod error;
pub mod field;
pub mod hash;
pub mod transport;

pub use bytes32::Bytes32;
pub use error::TxError;
