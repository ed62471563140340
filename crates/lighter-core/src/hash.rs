//! Hashing seam for canonical transaction encodings.
//!
//! The Poseidon2 permutation over Goldilocks lives outside this crate; callers
//! plug it in through [`FieldHasher`]. Everything above this module only
//! depends on the trait and on the 40-byte [`Digest`] it produces.

use crate::field::{FieldElement, HashOut, QuinticExtension, DIGEST_LENGTH, EMPTY_HASH_OUT};
use crate::{Error, Result};

/// External hash primitive over Goldilocks field elements.
pub trait FieldHasher: Send + Sync {
    /// Variable-length sponge hash into one quintic extension element.
    fn hash_to_quintic_extension(&self, elements: &[FieldElement]) -> QuinticExtension;

    /// Fixed-arity hash without padding, four-element output.
    fn hash_no_pad(&self, elements: &[FieldElement]) -> HashOut;

    /// Compress several hash outputs into one.
    fn hash_n_to_one(&self, hashes: &[HashOut]) -> HashOut;
}

/// Message digest: the little-endian bytes of a quintic extension element.
///
/// This is exactly what the signer receives and what the exchange re-derives.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// Hash a canonical element list into a digest.
    pub fn compute(hasher: &dyn FieldHasher, elements: &[FieldElement]) -> Self {
        Self(hasher.hash_to_quintic_extension(elements).to_le_bytes())
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a hex digest, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| Error::encoding(format!("invalid digest hex: {}", e)))?;
        let bytes: [u8; DIGEST_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::encoding(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LENGTH,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// Lower-case hex without a prefix, the form recorded as the signed hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Interpret the digest as a field extension element.
    pub fn to_quintic_extension(&self) -> Result<QuinticExtension> {
        QuinticExtension::from_canonical_le_bytes(&self.0)
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fold per-item hashes left to right: `h0`, then `H(h0, h1)`, then `H(acc, h2)`.
///
/// An empty input yields the all-zero hash.
pub fn fold_hashes(hasher: &dyn FieldHasher, hashes: &[HashOut]) -> HashOut {
    let mut iter = hashes.iter();
    let Some(first) = iter.next() else {
        return EMPTY_HASH_OUT;
    };
    iter.fold(*first, |acc, next| hasher.hash_n_to_one(&[acc, *next]))
}

/// Hash UTF-8 text by packing it into 8-byte little-endian elements.
pub fn hash_message_bytes(hasher: &dyn FieldHasher, message: &[u8]) -> Result<Digest> {
    let elements = FieldElement::array_from_canonical_le_bytes(message)?;
    Ok(Digest::compute(hasher, &elements))
}
