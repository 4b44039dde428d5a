//! # Key Derivation Functions
//!
//! Deterministic 32-byte values derived from caller-supplied factors.
//!
//! ## Derivations
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KEY DERIVATION                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  derive_key(factors)                                                   │
//! │  ───────────────────                                                   │
//! │    SHA-256( factor_1 || factor_2 || ... || factor_n )                 │
//! │                                                                         │
//! │  derive_keyed_secret(key, factors)                                     │
//! │  ─────────────────────────────────                                     │
//! │    HMAC-SHA256( key_material(key), factor_1 || ... || factor_n )      │
//! │                                                                         │
//! │  derive_session_key(shared_secret, salt, info)                         │
//! │  ─────────────────────────────────────────────                         │
//! │    HKDF-SHA256( ikm = shared_secret, salt, info ) → 32 bytes          │
//! │    usable directly as an AES-256-GCM key                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! | Derivation | Property |
//! |------------|----------|
//! | `derive_key` | Plain hash. Factors are concatenated without framing, so `["ab","c"]` and `["a","bc"]` collide |
//! | `derive_keyed_secret` | Keyed PRF over the same concatenation |
//! | `derive_session_key` | Proper KDF for turning a DH output into a cipher key |
//!
//! None of these stretch low-entropy input. Passwords need a dedicated
//! password hash, which this crate does not provide.

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::{Zeroizing, ZeroizeOnDrop};

use super::ecdh::SharedSecret;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Size of every derived key in bytes
pub const DERIVED_KEY_SIZE: usize = 32;

/// A 32-byte derived value
///
/// Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_SIZE]);

impl DerivedKey {
    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_SIZE] {
        &self.0
    }

    /// Lowercase hex (64 characters)
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }
}

/// How an HMAC key string is interpreted
///
/// A string that is valid hex (even length, hex digits only, either case)
/// is decoded to bytes. Anything else is used as its raw UTF-8 bytes. This
/// makes `"00112233"` a 4-byte key while `"passphrase"` is a 10-byte key.
/// The empty string is valid hex and yields an empty key.
pub enum KeyMaterial {
    /// The string decoded as hex
    Hex(Zeroizing<Vec<u8>>),
    /// The string's UTF-8 bytes, because it was not hex
    Raw(Zeroizing<Vec<u8>>),
}

impl KeyMaterial {
    /// Classify and decode a key string
    pub fn parse(key: &str) -> Self {
        match hex::decode(key) {
            Ok(bytes) => Self::Hex(Zeroizing::new(bytes)),
            Err(_) => Self::Raw(Zeroizing::new(key.as_bytes().to_vec())),
        }
    }

    /// The key bytes, whichever way they were obtained
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Hex(bytes) | Self::Raw(bytes) => bytes,
        }
    }
}

/// Hash the factors in order with SHA-256
///
/// An empty factor list is valid and yields SHA-256 of the empty string.
pub fn derive_key<F: AsRef<[u8]>>(factors: &[F]) -> DerivedKey {
    let mut hasher = Sha256::new();
    for factor in factors {
        hasher.update(factor.as_ref());
    }

    let mut key = [0u8; DERIVED_KEY_SIZE];
    key.copy_from_slice(&hasher.finalize());
    DerivedKey(key)
}

/// HMAC-SHA256 over the factors in order, keyed by `key`
///
/// See [`KeyMaterial`] for how `key` is interpreted.
pub fn derive_keyed_secret<F: AsRef<[u8]>>(key: &str, factors: &[F]) -> Result<DerivedKey> {
    let material = KeyMaterial::parse(key);
    if matches!(material, KeyMaterial::Raw(_)) {
        tracing::debug!("HMAC key is not hex, using raw bytes");
    }

    // HMAC accepts keys of any length; the error arm is unreachable in practice
    let mut mac = HmacSha256::new_from_slice(material.as_bytes())
        .map_err(|e| Error::KeyDerivationFailed(format!("HMAC key rejected: {}", e)))?;

    for factor in factors {
        mac.update(factor.as_ref());
    }

    let mut key = [0u8; DERIVED_KEY_SIZE];
    key.copy_from_slice(&mac.finalize().into_bytes());
    Ok(DerivedKey(key))
}

/// Expand a key-agreement output into a 32-byte cipher key
///
/// ## Parameters
///
/// - `shared_secret`: output of [`super::ecdh::compute_shared_secret`]
/// - `salt`: optional context binding, e.g. a conversation identifier
/// - `info`: domain separation label
pub fn derive_session_key(shared_secret: &SharedSecret, salt: &[u8], info: &[u8]) -> Result<DerivedKey> {
    let salt = if salt.is_empty() { None } else { Some(salt) };
    let hkdf = Hkdf::<Sha256>::new(salt, shared_secret.as_bytes());

    let mut key = [0u8; DERIVED_KEY_SIZE];
    hkdf.expand(info, &mut key)
        .map_err(|_| Error::KeyDerivationFailed("Failed to expand session key".into()))?;

    Ok(DerivedKey(key))
}

// ============================================================================
// TESTS
// ============================================================================
