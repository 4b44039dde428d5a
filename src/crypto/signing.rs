//! # Digital Signatures Module
//!
//! ECDSA over NIST P-256 with SHA-256.
//!
//! ## Signature Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SIGNER                                                                │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  message ──► SHA-256 ──► ECDSA sign (hedged RFC 6979)       │       │
//! │  │                               ▲                              │       │
//! │  │       SEC1 private key ───────┘      + fresh entropy         │       │
//! │  │                               │                              │       │
//! │  │                               ▼                              │       │
//! │  │                    DER ECDSA-Sig-Value (70-72 bytes)         │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  VERIFIER                                                              │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  message ──► SHA-256 ──► ECDSA verify ──► true / false      │       │
//! │  │                               ▲                              │       │
//! │  │       PKIX public key ────────┘                              │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Properties
//!
//! | Property | Description |
//! |----------|-------------|
//! | Randomized | Two signatures over the same message differ |
//! | Nonce safety | RFC 6979 keeps the nonce secret even if the RNG is weak |
//! | Uniform verify | Every malformed input is plain `false` |

use p256::ecdsa::signature::{DigestVerifier, RandomizedDigestSigner};
use p256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePublicKey, EncodePublicKey};
use p256::SecretKey;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::keys::{decode_hex, random_secret_key, KeyPair};
use super::random::{self, OsRng};
use crate::error::{Error, Result};

/// Largest DER encoding of a P-256 ECDSA signature
pub const MAX_SIGNATURE_SIZE: usize = 72;

/// Entropy drawn per signature for nonce hedging
const HEDGE_SEED_SIZE: usize = 32;

/// A DER-encoded ECDSA signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap DER bytes without validating them
    pub fn from_der_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw DER bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        decode_hex("signature", hex_str).map(Self)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Generate a signing key pair using the OS generator
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_rng(&mut OsRng)
}

/// Generate a signing key pair from `rng`
///
/// Public half: DER SubjectPublicKeyInfo. Private half: DER SEC1
/// `ECPrivateKey`, which embeds the curve OID and the public point.
pub fn generate_keypair_with_rng<R: CryptoRngCore>(rng: &mut R) -> Result<KeyPair> {
    let secret = random_secret_key(rng)?;

    let private_der = secret
        .to_sec1_der()
        .map_err(|e| Error::Serialization(format!("SEC1 encoding failed: {}", e)))?;
    let public_der = secret
        .public_key()
        .to_public_key_der()
        .map_err(|e| Error::Serialization(format!("SPKI encoding failed: {}", e)))?;

    Ok(KeyPair::new(public_der.as_bytes().to_vec(), private_der))
}

/// Sign a message using the OS generator for nonce hedging
pub fn sign(message: &[u8], private_key_hex: &str) -> Result<Signature> {
    sign_with_rng(message, private_key_hex, &mut OsRng)
}

/// Sign a message
///
/// ## Parameters
///
/// - `message`: Arbitrary bytes, hashed with SHA-256 before signing
/// - `private_key_hex`: Hex of a DER SEC1 P-256 private key
/// - `rng`: Entropy mixed into the RFC 6979 nonce derivation
///
/// ## Errors
///
/// `InvalidEncoding` for bad hex, `InvalidKey` when the DER does not hold a
/// P-256 private key, `RandomSourceExhausted` when `rng` fails.
pub fn sign_with_rng<R: CryptoRngCore>(
    message: &[u8],
    private_key_hex: &str,
    rng: &mut R,
) -> Result<Signature> {
    let signing_key = parse_private_key(private_key_hex)?;
    let digest = Sha256::new_with_prefix(message);

    // The signer draws through the infallible `fill_bytes`, so the entropy is
    // taken here and replayed from a generator that cannot fail
    let seed = Zeroizing::new(random::array::<HEDGE_SEED_SIZE, R>(rng)?);
    let mut hedge = StdRng::from_seed(*seed);

    let signature: EcdsaSignature = signing_key
        .try_sign_digest_with_rng(&mut hedge, digest)
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

    Ok(Signature(signature.to_der().as_bytes().to_vec()))
}

/// Verify a signature
///
/// Returns `false` for any problem: bad hex, a key that is not a P-256
/// SPKI, a signature that is not DER, or a signature that does not match.
/// Callers get a single predicate; the reason is only logged.
pub fn verify(message: &[u8], public_key_hex: &str, signature_hex: &str) -> bool {
    match verify_detailed(message, public_key_hex, signature_hex) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(kind = e.kind(), "signature rejected");
            false
        }
    }
}

/// Verify a signature, reporting why it was rejected
pub fn verify_detailed(message: &[u8], public_key_hex: &str, signature_hex: &str) -> Result<()> {
    let verifying_key = parse_public_key(public_key_hex)?;

    let signature_bytes = decode_hex("signature", signature_hex)?;
    let signature =
        EcdsaSignature::from_der(&signature_bytes).map_err(|_| Error::InvalidSignature)?;

    verifying_key
        .verify_digest(Sha256::new_with_prefix(message), &signature)
        .map_err(|_| Error::VerificationFailed)
}

/// Parse a hex DER SEC1 private key into a signing key
fn parse_private_key(private_key_hex: &str) -> Result<SigningKey> {
    let der = Zeroizing::new(decode_hex("private key", private_key_hex)?);
    let secret = SecretKey::from_sec1_der(&der)
        .map_err(|e| Error::InvalidKey(format!("Invalid SEC1 private key: {}", e)))?;
    Ok(SigningKey::from(secret))
}

/// Parse a hex DER SPKI public key into a verifying key
fn parse_public_key(public_key_hex: &str) -> Result<VerifyingKey> {
    let der = decode_hex("public key", public_key_hex)?;
    VerifyingKey::from_public_key_der(&der)
        .map_err(|e| Error::InvalidKey(format!("Invalid SPKI public key: {}", e)))
}

// ============================================================================
// TESTS
// ============================================================================
