//! Lighter Core Library
//!
//! Transaction types, validation, canonical hashing and signing for the
//! Lighter L2 exchange. The Poseidon2 hash and Schnorr signature primitives
//! are supplied by the caller through [`hash::FieldHasher`] and
//! [`signing::TxSigner`].

pub mod api;
pub mod config;
pub mod error;
pub mod field;
pub mod hash;
pub mod output;
pub mod signing;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{Error, Result, ValidationError};
