//! # Key Agreement
//!
//! Elliptic-curve Diffie-Hellman over NIST P-256.
//!
//! ## Exchange Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEY AGREEMENT FLOW                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Alice                                   Bob                          │
//! │     │── public key (65 bytes, SEC1) ──────►│                            │
//! │     │◄────────────────────── public key ───│                            │
//! │     ▼                                      ▼                            │
//! │  a × B                                  b × A                          │
//! │     │                                      │                            │
//! │     └──────────────┐        ┌──────────────┘                            │
//! │                    ▼        ▼                                           │
//! │              x-coordinate (32 bytes)                                   │
//! │              SAME SHARED SECRET                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Peer Key Validation
//!
//! | Check | Failure |
//! |-------|---------|
//! | Hex decodes | `InvalidEncoding` |
//! | 65-byte uncompressed SEC1 tag | `InvalidKey` |
//! | Not the identity encoding | `IdentityResult` |
//! | Satisfies the curve equation | `PointNotOnCurve` |
//!
//! P-256 has cofactor 1, so any point that passes these checks has full
//! order and there are no small-subgroup points to reject separately.

use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{AffinePoint, EncodedPoint, FieldBytes, PublicKey, SecretKey};
use rand_core::CryptoRngCore;
use zeroize::{Zeroizing, ZeroizeOnDrop};

use super::keys::{decode_hex, random_secret_key, KeyPair};
use super::random::OsRng;
use crate::error::{Error, Result};

/// Size of a private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an uncompressed SEC1 public point in bytes
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Size of the shared secret in bytes
pub const SHARED_SECRET_SIZE: usize = 32;

/// Output of a P-256 Diffie-Hellman exchange
///
/// Always exactly 32 bytes; leading zero bytes of the x-coordinate are
/// kept. Zeroized when dropped and deliberately not `Debug` or `Clone`.
#[derive(ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes (for key derivation)
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }

    /// Lowercase hex of the secret
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }
}

/// Generate a key-agreement key pair using the OS generator
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_rng(&mut OsRng)
}

/// Generate a key-agreement key pair from `rng`
///
/// Public half: uncompressed SEC1 point. Private half: 32-byte scalar.
pub fn generate_keypair_with_rng<R: CryptoRngCore>(rng: &mut R) -> Result<KeyPair> {
    let secret = random_secret_key(rng)?;
    let public = secret.public_key().to_encoded_point(false);

    Ok(KeyPair::new(
        public.as_bytes().to_vec(),
        Zeroizing::new(secret.to_bytes().to_vec()),
    ))
}

/// Compute the shared secret between our private key and a peer's public key
///
/// Both arguments are hex. The peer key is fully validated before any
/// scalar multiplication takes place.
pub fn compute_shared_secret(private_key_hex: &str, peer_public_key_hex: &str) -> Result<SharedSecret> {
    let private_bytes = Zeroizing::new(decode_hex("private key", private_key_hex)?);
    let peer_bytes = decode_hex("peer public key", peer_public_key_hex)?;

    let secret = parse_private_key(&private_bytes)?;
    let peer = parse_public_key(&peer_bytes)?;

    Ok(diffie_hellman(&secret, &peer))
}

/// Scalar-multiply a validated peer key by our secret
pub fn diffie_hellman(secret: &SecretKey, peer: &PublicKey) -> SharedSecret {
    let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());

    let mut bytes = [0u8; SHARED_SECRET_SIZE];
    bytes.copy_from_slice(shared.raw_secret_bytes().as_slice());
    SharedSecret(bytes)
}

/// Parse a 32-byte big-endian private scalar
pub fn parse_private_key(bytes: &[u8]) -> Result<SecretKey> {
    if bytes.len() != PRIVATE_KEY_SIZE {
        return Err(Error::InvalidKey(format!(
            "Private key must be {} bytes, got {}",
            PRIVATE_KEY_SIZE,
            bytes.len()
        )));
    }

    SecretKey::from_bytes(FieldBytes::from_slice(bytes))
        .map_err(|_| Error::InvalidKey("Private scalar is zero or out of range".into()))
}

/// Parse and validate a peer's uncompressed SEC1 public key
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey> {
    let encoded = EncodedPoint::from_bytes(bytes)
        .map_err(|e| Error::InvalidKey(format!("Malformed public key: {}", e)))?;

    if encoded.is_identity() {
        return Err(Error::IdentityResult);
    }

    if encoded.is_compressed() || bytes.len() != PUBLIC_KEY_SIZE {
        return Err(Error::InvalidKey(format!(
            "Public key must be a {}-byte uncompressed point",
            PUBLIC_KEY_SIZE
        )));
    }

    let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(Error::PointNotOnCurve)?;

    PublicKey::from_affine(point).map_err(|_| Error::IdentityResult)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::testing::ExhaustedRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Public key of the P-256 generator point G (private scalar = 1)
    const GENERATOR_HEX: &str = "046b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296\
                                 4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";

    fn one_hex() -> String {
        let mut scalar = [0u8; 32];
        scalar[31] = 1;
        hex::encode(scalar)
    }

    #[test]
    fn test_keypair_encodings() {
        let pair = generate_keypair().unwrap();

        assert_eq!(pair.public_key().len(), PUBLIC_KEY_SIZE);
        assert_eq!(pair.public_key()[0], 0x04);
        assert_eq!(pair.private_key().len(), PRIVATE_KEY_SIZE);
        assert_eq!(pair.public_key_hex(), pair.public_key_hex().to_lowercase());
    }

    #[test]
    fn test_keypair_generation_differs() {
        let a = generate_keypair().unwrap();
        let b = generate_keypair().unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_keypair_with_rng(&mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate_keypair_with_rng(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_exhausted_source_fails_generation() {
        assert!(matches!(
            generate_keypair_with_rng(&mut ExhaustedRng),
            Err(Error::RandomSourceExhausted)
        ));
    }

    #[test]
    fn test_shared_secret_is_commutative() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();

        let alice_shared =
            compute_shared_secret(&alice.private_key_hex(), &bob.public_key_hex()).unwrap();
        let bob_shared =
            compute_shared_secret(&bob.private_key_hex(), &alice.public_key_hex()).unwrap();

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
        assert_eq!(alice_shared.to_hex().len(), SHARED_SECRET_SIZE * 2);
    }

    #[test]
    fn test_scalar_one_times_generator_is_generator_x() {
        let shared = compute_shared_secret(&one_hex(), GENERATOR_HEX).unwrap();
        assert_eq!(shared.to_hex().as_str(), &GENERATOR_HEX[2..66]);
    }

    #[test]
    fn test_invalid_hex_is_invalid_encoding() {
        let bob = generate_keypair().unwrap();
        assert!(matches!(
            compute_shared_secret("not hex", &bob.public_key_hex()),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            compute_shared_secret(&one_hex(), "0x04"),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_private_key_validation() {
        let zero = hex::encode([0u8; 32]);
        let too_large = hex::encode([0xffu8; 32]);
        let short = hex::encode([1u8; 31]);

        for key in [&zero, &too_large, &short] {
            assert!(matches!(
                compute_shared_secret(key, GENERATOR_HEX),
                Err(Error::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_identity_point_is_rejected() {
        assert!(matches!(
            compute_shared_secret(&one_hex(), "00"),
            Err(Error::IdentityResult)
        ));
    }

    #[test]
    fn test_point_off_curve_is_rejected() {
        // Generator with the last byte of Y altered
        let mut bytes = hex::decode(GENERATOR_HEX).unwrap();
        bytes[64] ^= 0x01;

        assert!(matches!(
            compute_shared_secret(&one_hex(), &hex::encode(bytes)),
            Err(Error::PointNotOnCurve)
        ));
    }

    #[test]
    fn test_compressed_point_is_rejected() {
        let compressed = format!("03{}", &GENERATOR_HEX[2..66]);
        assert!(matches!(
            compute_shared_secret(&one_hex(), &compressed),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_truncated_point_is_rejected() {
        assert!(matches!(
            compute_shared_secret(&one_hex(), &GENERATOR_HEX[..64]),
            Err(Error::InvalidKey(_))
        ));
    }
}
