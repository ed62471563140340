//! Deterministic stand-ins for the external hash and signature primitives.
//!
//! These are NOT Poseidon2 or Schnorr. They are SHA-256 / HMAC based and only
//! share the shapes (element counts, byte lengths, determinism) of the real
//! primitives, which is what the encoding and orchestration code depends on.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::{Digest as _, Sha256};

use crate::api::{AccountApiKeys, ApiKey, ApiKeySource, NonceSource, ResultCode};
use crate::field::{FieldElement, HashOut, QuinticExtension, QUINTIC_DEGREE};
use crate::hash::{Digest, FieldHasher};
use crate::signing::{
    ApiKeyPair, KeyGenerator, PrivateKeyBytes, TxSigner, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
};
use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signature length of the real Schnorr scheme.
pub const FAKE_SIGNATURE_LENGTH: usize = 80;

/// Squeeze `n` reduced field elements out of SHA-256 over `tag || input`.
fn squeeze(tag: &[u8], input: &[u8], n: usize) -> Vec<FieldElement> {
    let mut out = Vec::with_capacity(n);
    let mut counter = 0u8;
    while out.len() < n {
        let mut hasher = Sha256::new();
        hasher.update(tag);
        hasher.update([counter]);
        hasher.update(input);
        let block = hasher.finalize();
        for chunk in block.chunks(8) {
            if out.len() == n {
                break;
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            out.push(FieldElement::from_u64(u64::from_le_bytes(buf)));
        }
        counter = counter.wrapping_add(1);
    }
    out
}

fn elements_to_bytes(elements: &[FieldElement]) -> Vec<u8> {
    elements.iter().flat_map(|e| e.to_le_bytes()).collect()
}

/// SHA-256 based [`FieldHasher`] with per-mode domain separation.
#[derive(Debug, Default)]
pub struct FakeHasher {
    calls: AtomicUsize,
}

impl FakeHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hash invocations so far, across all modes.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FieldHasher for FakeHasher {
    fn hash_to_quintic_extension(&self, elements: &[FieldElement]) -> QuinticExtension {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let limbs = squeeze(b"quintic", &elements_to_bytes(elements), QUINTIC_DEGREE);
        let mut out = [FieldElement::ZERO; QUINTIC_DEGREE];
        out.copy_from_slice(&limbs);
        QuinticExtension(out)
    }

    fn hash_no_pad(&self, elements: &[FieldElement]) -> HashOut {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let limbs = squeeze(b"no_pad", &elements_to_bytes(elements), 4);
        [limbs[0], limbs[1], limbs[2], limbs[3]]
    }

    fn hash_n_to_one(&self, hashes: &[HashOut]) -> HashOut {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let flat: Vec<FieldElement> = hashes.iter().flatten().copied().collect();
        let limbs = squeeze(b"n_to_one", &elements_to_bytes(&flat), 4);
        [limbs[0], limbs[1], limbs[2], limbs[3]]
    }
}

/// HMAC-SHA256 based [`TxSigner`].
///
/// The public key is derived from the private key so that each limb is a
/// canonical field element, as a real ECgFp5 public key would be.
pub struct FakeSigner {
    key: PrivateKeyBytes,
    public_key: [u8; PUBLIC_KEY_LENGTH],
    sign_calls: AtomicUsize,
    fail_signing: bool,
}

impl FakeSigner {
    pub fn from_private_key(key: &PrivateKeyBytes) -> Self {
        let limbs = squeeze(b"public_key", key.as_bytes(), QUINTIC_DEGREE);
        let mut public_key = [0u8; PUBLIC_KEY_LENGTH];
        public_key.copy_from_slice(&elements_to_bytes(&limbs));
        Self {
            key: key.clone(),
            public_key,
            sign_calls: AtomicUsize::new(0),
            fail_signing: false,
        }
    }

    /// Signer whose private key is `seed` repeated.
    pub fn from_seed(seed: u8) -> Self {
        Self::from_private_key(&PrivateKeyBytes::from_bytes([seed; PRIVATE_KEY_LENGTH]))
    }

    /// Signer whose `sign` always fails.
    pub fn failing(seed: u8) -> Self {
        Self {
            fail_signing: true,
            ..Self::from_seed(seed)
        }
    }

    /// Number of successful and failed `sign` calls.
    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    fn mac(&self, digest: &Digest) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(FAKE_SIGNATURE_LENGTH + 32);
        let mut block = 0u8;
        while out.len() < FAKE_SIGNATURE_LENGTH {
            let mut mac =
                HmacSha256::new_from_slice(self.key.as_bytes()).map_err(|e| Error::Signature {
                    message: format!("invalid signing key: {}", e),
                })?;
            mac.update(&[block]);
            mac.update(digest.as_bytes());
            out.extend_from_slice(&mac.finalize().into_bytes());
            block += 1;
        }
        out.truncate(FAKE_SIGNATURE_LENGTH);
        Ok(out)
    }
}

impl std::fmt::Debug for FakeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeSigner")
            .field("public_key", &hex::encode(self.public_key))
            .finish()
    }
}

impl TxSigner for FakeSigner {
    fn sign(&self, digest: &Digest) -> Result<Vec<u8>> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_signing {
            return Err(Error::Signature {
                message: "signer unavailable".to_string(),
            });
        }
        self.mac(digest)
    }

    fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public_key
    }

    fn verify(&self, digest: &Digest, signature: &[u8]) -> Result<()> {
        if self.mac(digest)? == signature {
            Ok(())
        } else {
            Err(Error::Signature {
                message: "signature does not verify against public key".to_string(),
            })
        }
    }
}

/// Key generator deriving keys from the seed, or from a call counter when unseeded.
#[derive(Debug, Default)]
pub struct FakeKeyGenerator {
    unseeded: AtomicUsize,
}

impl FakeKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unseeded_calls(&self) -> usize {
        self.unseeded.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for FakeKeyGenerator {
    fn generate(&self, seed: Option<&str>) -> Result<ApiKeyPair> {
        let material = match seed {
            Some(seed) => seed.as_bytes().to_vec(),
            None => {
                let call = self.unseeded.fetch_add(1, Ordering::SeqCst);
                format!("unseeded-{}", call).into_bytes()
            }
        };
        let limbs = squeeze(b"private_key", &material, QUINTIC_DEGREE);
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        bytes.copy_from_slice(&elements_to_bytes(&limbs));
        let private_key = PrivateKeyBytes::from_bytes(bytes);
        let public_key = FakeSigner::from_private_key(&private_key).public_key();
        Ok(ApiKeyPair {
            private_key,
            public_key,
        })
    }
}

/// Nonce source handing out increasing nonces from a starting value.
#[derive(Debug)]
pub struct FakeNonceSource {
    next: AtomicI64,
    calls: AtomicUsize,
}

impl FakeNonceSource {
    pub fn starting_at(nonce: i64) -> Self {
        Self {
            next: AtomicI64::new(nonce),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NonceSource for FakeNonceSource {
    async fn next_nonce(&self, _account_index: i64, _api_key_index: u8) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// API key registry answering from an in-memory list.
#[derive(Debug, Default)]
pub struct FakeApiKeySource {
    keys: Mutex<Vec<ApiKey>>,
}

impl FakeApiKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `public_key` for (account, key slot).
    pub fn with_key(self, account_index: i64, api_key_index: u8, public_key: &[u8]) -> Self {
        if let Ok(mut keys) = self.keys.lock() {
            keys.push(ApiKey {
                account_index,
                api_key_index,
                nonce: 0,
                public_key: hex::encode(public_key),
            });
        }
        self
    }
}

#[async_trait]
impl ApiKeySource for FakeApiKeySource {
    async fn api_keys(&self, account_index: i64, api_key_index: u8) -> Result<AccountApiKeys> {
        let keys = self.keys.lock().map_err(|_| Error::Api {
            message: "api key registry poisoned".to_string(),
            status: None,
        })?;
        Ok(AccountApiKeys {
            result: ResultCode::ok(),
            api_keys: keys
                .iter()
                .filter(|k| k.account_index == account_index && k.api_key_index == api_key_index)
                .cloned()
                .collect(),
        })
    }
}
