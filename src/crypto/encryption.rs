//! # Encryption Module
//!
//! Provides AES-256-GCM encryption for confidentiality and integrity.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CIPHERTEXT ENVELOPE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────┬──────────────────────────────┬──────────────────┐    │
//! │  │ nonce        │ ciphertext                   │ tag              │    │
//! │  │ 12 bytes     │ len(plaintext) bytes         │ 16 bytes         │    │
//! │  └──────────────┴──────────────────────────────┴──────────────────┘    │
//! │                                                                         │
//! │  hex( nonce || ciphertext || tag )   — one lowercase string            │
//! │                                                                         │
//! │  The tag is appended by the AEAD itself; the nonce is prepended here.  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Only holders of the key can read the plaintext |
//! | Integrity | Any modification is detected before plaintext is released |
//! | Nonce freshness | 96 random bits per message, never derived or reused |
//! | Uniform failure | All decryption failures look the same at the boundary |

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce as AesNonce,
};
use rand_core::CryptoRngCore;
use zeroize::{Zeroizing, ZeroizeOnDrop};

use super::keys::decode_hex;
use super::random::{self, OsRng};
use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// A nonce (number used once) for AES-GCM encryption
///
/// ## Critical Security Requirement
///
/// **NEVER reuse a nonce with the same key!**
///
/// Nonce reuse completely breaks AES-GCM security:
/// - Allows recovering the authentication key
/// - Allows forging messages
/// - May allow recovering plaintext
///
/// We use random nonces, which are safe for up to 2^32 messages
/// per key (birthday bound for 96-bit nonces).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Draw a fresh nonce from `rng`
    pub fn random<R: CryptoRngCore>(rng: &mut R) -> Result<Self> {
        random::array(rng).map(Self)
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// An AES-256-GCM encryption key
///
/// Zeroized when dropped. No weak-key screening is done: any 32 bytes,
/// including all zeros, are accepted.
#[derive(ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice that must be exactly [`KEY_SIZE`] bytes
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_SIZE] = slice.try_into().map_err(|_| Error::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: slice.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Decode from a hex string of exactly 64 characters
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_hex("key", hex_str)?);
        Self::from_slice(&bytes)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }
}

/// A sealed message: nonce plus ciphertext with the tag appended
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Nonce used for this message
    pub nonce: Nonce,
    /// Ciphertext followed by the 16-byte tag
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize as `nonce || ciphertext || tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(self.nonce.as_bytes());
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split `nonce || ciphertext || tag`
    ///
    /// Only the nonce length is checked here; a body too short to hold a
    /// tag is left for the AEAD to reject.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < NONCE_SIZE {
            return Err(Error::TruncatedInput {
                minimum: NONCE_SIZE,
                actual: bytes.len(),
            });
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        nonce_bytes.copy_from_slice(nonce);

        Ok(Self {
            nonce: Nonce(nonce_bytes),
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Wire format: lowercase hex of [`Envelope::to_bytes`]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse the wire format
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = decode_hex("ciphertext", hex_str)?;
        Self::from_bytes(&bytes)
    }
}

/// Encrypt with a hex key, returning the hex wire format
///
/// The key must decode to exactly 32 bytes. No associated data is bound;
/// use [`seal`] when the caller has context to authenticate.
pub fn encrypt(plaintext: &[u8], key_hex: &str) -> Result<String> {
    encrypt_with_rng(plaintext, key_hex, &mut OsRng)
}

/// [`encrypt`] with an injected random source for the nonce
pub fn encrypt_with_rng<R: CryptoRngCore>(plaintext: &[u8], key_hex: &str, rng: &mut R) -> Result<String> {
    let key = EncryptionKey::from_hex(key_hex)?;
    seal(&key, plaintext, &[], rng).map(|envelope| envelope.to_hex())
}

/// Decrypt the hex wire format with a hex key
///
/// ## Errors
///
/// - `InvalidEncoding` / `InvalidKeyLength` for a bad key
/// - `InvalidEncoding` for ciphertext that is not hex
/// - `TruncatedInput` for fewer than 12 bytes
/// - `AuthenticationFailed` for anything the tag check rejects
pub fn decrypt(ciphertext_hex: &str, key_hex: &str) -> Result<Vec<u8>> {
    let key = EncryptionKey::from_hex(key_hex)?;
    let envelope = Envelope::from_hex(ciphertext_hex)?;
    open(&key, &envelope, &[])
}

/// Encrypt a message using AES-256-GCM
///
/// ## Parameters
///
/// - `key`: 256-bit encryption key
/// - `plaintext`: Message to encrypt
/// - `aad`: Additional authenticated data (not encrypted, but authenticated)
/// - `rng`: Source for the fresh nonce
///
/// ## Example
///
/// ```ignore
/// let key = EncryptionKey::from_bytes([0u8; 32]);
/// let envelope = seal(&key, b"Hello, Bob!", b"context", &mut OsRng)?;
/// ```
pub fn seal<R: CryptoRngCore>(
    key: &EncryptionKey,
    plaintext: &[u8],
    aad: &[u8],
    rng: &mut R,
) -> Result<Envelope> {
    let nonce = Nonce::random(rng)?;

    let payload = Payload {
        msg: plaintext,
        aad,
    };

    let ciphertext = key
        .cipher()
        .encrypt(AesNonce::from_slice(nonce.as_bytes()), payload)
        .map_err(|e| Error::EncryptionFailed(e.to_string()))?;

    Ok(Envelope { nonce, ciphertext })
}

/// Decrypt a message using AES-256-GCM
///
/// The tag is verified before any plaintext is produced. Every rejection is
/// reported as `AuthenticationFailed`: wrong key, wrong AAD, tampering, or a
/// body shorter than the tag.
pub fn open(key: &EncryptionKey, envelope: &Envelope, aad: &[u8]) -> Result<Vec<u8>> {
    let payload = Payload {
        msg: &envelope.ciphertext,
        aad,
    };

    key.cipher()
        .decrypt(AesNonce::from_slice(envelope.nonce.as_bytes()), payload)
        .map_err(|_| Error::AuthenticationFailed)
}

// ============================================================================
// TESTS
// ============================================================================
