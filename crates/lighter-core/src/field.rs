//! # Goldilocks field elements
//!
//! Prime field with p = 2^64 - 2^32 + 1. Every transaction is encoded as a
//! sequence of these elements before hashing; the external Poseidon2 hash
//! consumes them directly, so the element *values* (not a byte layout) are
//! what must match the exchange bit for bit.

use crate::{Error, Result};

/// Goldilocks prime: p = 2^64 - 2^32 + 1
pub const GOLDILOCKS_PRIME: u64 = 0xFFFF_FFFF_0000_0001;

/// Bytes per element in the little-endian byte encoding.
pub const ELEMENT_BYTES: usize = 8;

/// Degree of the quintic extension the digest lives in.
pub const QUINTIC_DEGREE: usize = 5;

/// Byte length of a digest (one quintic extension element).
pub const DIGEST_LENGTH: usize = QUINTIC_DEGREE * ELEMENT_BYTES;

/// Element in the Goldilocks field, always stored reduced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldElement(u64);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(0);

    /// Create a field element, reducing mod p.
    ///
    /// A single conditional subtraction suffices because 2p > 2^64.
    pub fn from_u64(value: u64) -> Self {
        if value >= GOLDILOCKS_PRIME {
            Self(value - GOLDILOCKS_PRIME)
        } else {
            Self(value)
        }
    }

    pub fn from_u32(value: u32) -> Self {
        Self(value as u64)
    }

    pub fn from_u8(value: u8) -> Self {
        Self(value as u64)
    }

    /// Two's-complement reinterpretation, then reduction.
    pub fn from_i64(value: i64) -> Self {
        Self::from_u64(value as u64)
    }

    /// Create from a value that must already be below p.
    pub fn from_canonical_u64(value: u64) -> Result<Self> {
        if value >= GOLDILOCKS_PRIME {
            return Err(Error::encoding(format!(
                "value {:#x} is not a canonical Goldilocks element",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Get the raw value.
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; ELEMENT_BYTES] {
        self.0.to_le_bytes()
    }

    /// Split a 64-bit quantity into its low and high 32-bit halves.
    ///
    /// Amounts that can exceed the field modulus are encoded this way; the
    /// order (low, then high) is part of the protocol.
    pub fn split_u64(value: u64) -> [FieldElement; 2] {
        [
            FieldElement(value & 0xFFFF_FFFF),
            FieldElement(value >> 32),
        ]
    }

    /// Parse bytes as consecutive little-endian 8-byte elements.
    ///
    /// A trailing partial chunk is zero-padded. Every chunk must be canonical.
    pub fn array_from_canonical_le_bytes(bytes: &[u8]) -> Result<Vec<FieldElement>> {
        bytes
            .chunks(ELEMENT_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; ELEMENT_BYTES];
                buf[..chunk.len()].copy_from_slice(chunk);
                FieldElement::from_canonical_u64(u64::from_le_bytes(buf))
            })
            .collect()
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of the fixed-arity hash mode: four field elements.
pub type HashOut = [FieldElement; 4];

/// The all-zero hash output.
pub const EMPTY_HASH_OUT: HashOut = [FieldElement::ZERO; 4];

/// Element of the degree-5 extension of the Goldilocks field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QuinticExtension(pub [FieldElement; QUINTIC_DEGREE]);

impl QuinticExtension {
    /// Little-endian encoding, limb 0 first.
    pub fn to_le_bytes(&self) -> [u8; DIGEST_LENGTH] {
        let mut out = [0u8; DIGEST_LENGTH];
        for (i, limb) in self.0.iter().enumerate() {
            out[i * ELEMENT_BYTES..(i + 1) * ELEMENT_BYTES].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    pub fn from_canonical_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != DIGEST_LENGTH {
            return Err(Error::encoding(format!(
                "expected {} bytes for a quintic extension element, got {}",
                DIGEST_LENGTH,
                bytes.len()
            )));
        }
        let limbs = FieldElement::array_from_canonical_le_bytes(bytes)?;
        let mut out = [FieldElement::ZERO; QUINTIC_DEGREE];
        out.copy_from_slice(&limbs);
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(limbs: [FieldElement; 2]) -> u64 {
        limbs[0].value() | (limbs[1].value() << 32)
    }

    #[test]
    fn test_reduction() {
        assert_eq!(FieldElement::from_u64(GOLDILOCKS_PRIME).value(), 0);
        assert_eq!(FieldElement::from_u64(GOLDILOCKS_PRIME + 5).value(), 5);
        assert_eq!(FieldElement::from_u64(u64::MAX).value(), u64::MAX - GOLDILOCKS_PRIME);
        assert_eq!(FieldElement::from_i64(42).value(), 42);
    }

    #[test]
    fn test_split_round_trip() {
        for amount in [0u64, 1, (1 << 32) - 1, 1 << 32, (1 << 60) - 1] {
            let limbs = FieldElement::split_u64(amount);
            assert!(limbs[0].value() <= u32::MAX as u64);
            assert!(limbs[1].value() <= u32::MAX as u64);
            assert_eq!(join(limbs), amount, "amount {}", amount);
        }
    }

    #[test]
    fn test_split_order_is_low_then_high() {
        let limbs = FieldElement::split_u64(0x0000_0002_0000_0001);
        assert_eq!(limbs[0].value(), 1);
        assert_eq!(limbs[1].value(), 2);
    }

    #[test]
    fn test_canonical_bytes() {
        let mut bytes = [0u8; 16];
        bytes[0] = 7;
        bytes[8] = 9;
        let elems = FieldElement::array_from_canonical_le_bytes(&bytes).unwrap();
        assert_eq!(elems, vec![FieldElement::from_u64(7), FieldElement::from_u64(9)]);

        let err = FieldElement::array_from_canonical_le_bytes(&u64::MAX.to_le_bytes());
        assert!(matches!(err, Err(Error::Encoding { .. })));
    }

    #[test]
    fn test_partial_chunk_is_zero_padded() {
        let elems = FieldElement::array_from_canonical_le_bytes(b"abcdefghij").unwrap();
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[1].value(), u64::from_le_bytes(*b"ij\0\0\0\0\0\0"));
    }

    #[test]
    fn test_quintic_bytes() {
        let ext = QuinticExtension([
            FieldElement::from_u64(1),
            FieldElement::from_u64(2),
            FieldElement::from_u64(3),
            FieldElement::from_u64(4),
            FieldElement::from_u64(5),
        ]);
        let bytes = ext.to_le_bytes();
        assert_eq!(bytes.len(), DIGEST_LENGTH);
        assert_eq!(QuinticExtension::from_canonical_le_bytes(&bytes).unwrap(), ext);
        assert!(QuinticExtension::from_canonical_le_bytes(&bytes[..39]).is_err());
    }
}
