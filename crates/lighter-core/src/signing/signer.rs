//! Signing-key seam and private key handling.
//!
//! Schnorr signatures over ECgFp5 are produced outside this crate. A
//! [`TxSigner`] wraps one API key; the orchestrator only ever hands it a
//! 40-byte [`Digest`]. Fresh API keys come from a [`KeyGenerator`], the same
//! external curve code behind a second seam.

use crate::hash::Digest;
use crate::{Error, Result};

/// Length of an API private key in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 40;

/// Length of an API public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 40;

/// External signature primitive bound to one API key.
pub trait TxSigner: Send + Sync {
    /// Sign a transaction digest.
    fn sign(&self, digest: &Digest) -> Result<Vec<u8>>;

    /// Public key of this signer, little-endian encoded.
    fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH];

    /// Check a signature over `digest` against this signer's public key.
    fn verify(&self, digest: &Digest, signature: &[u8]) -> Result<()>;
}

/// External key generation for new API keys.
pub trait KeyGenerator: Send + Sync {
    /// Sample a key pair. The same seed always yields the same pair.
    fn generate(&self, seed: Option<&str>) -> Result<ApiKeyPair>;
}

/// Generate an API key, treating an empty seed as no seed.
pub fn generate_api_key(generator: &dyn KeyGenerator, seed: &str) -> Result<ApiKeyPair> {
    let seed = Some(seed).filter(|s| !s.is_empty());
    generator.generate(seed)
}

/// A freshly generated API key and its public key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyPair {
    pub private_key: PrivateKeyBytes,
    pub public_key: [u8; PUBLIC_KEY_LENGTH],
}

impl ApiKeyPair {
    /// `0x`-prefixed hex, accepted by [`PrivateKeyBytes::from_hex`].
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.private_key.as_bytes()))
    }

    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.public_key))
    }
}

impl std::fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field("private_key", &self.private_key)
            .field("public_key", &hex::encode(self.public_key))
            .finish()
    }
}

/// Raw API private key bytes.
///
/// The bytes are handed to whichever [`TxSigner`] implementation the caller
/// uses; this type only parses and guards them.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyBytes([u8; PRIVATE_KEY_LENGTH]);

impl PrivateKeyBytes {
    /// Parse a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - 80 hex characters, optionally prefixed with "0x"
    ///
    /// # Errors
    ///
    /// Returns a configuration error for empty, non-hex or wrong-length keys.
    pub fn from_hex(key: &str) -> Result<Self> {
        let key_clean = key.trim();
        let key_clean = key_clean.strip_prefix("0x").unwrap_or(key_clean);
        if key_clean.is_empty() {
            return Err(Error::configuration("empty private key"));
        }

        let bytes = hex::decode(key_clean)
            .map_err(|e| Error::configuration(format!("invalid private key hex: {}", e)))?;
        let bytes: [u8; PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::configuration(format!(
                "invalid private key length. expected: {} got: {}",
                PRIVATE_KEY_LENGTH,
                b.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.write_str("PrivateKeyBytes(<redacted>)")
    }
}
