//! # Key Management
//!
//! Key-pair container and the helpers shared by the two P-256 components.
//!
//! ## Key Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY ENCODINGS                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Key agreement (ECDH, P-256)                                    │   │
//! │  │  ───────────────────────────                                    │   │
//! │  │  • Private key: 32-byte big-endian scalar                       │   │
//! │  │  • Public key:  65-byte uncompressed SEC1 point (04 || X || Y)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Signatures (ECDSA, P-256)                                      │   │
//! │  │  ─────────────────────────                                      │   │
//! │  │  • Private key: DER SEC1 ECPrivateKey (RFC 5915)                │   │
//! │  │  • Public key:  DER SubjectPublicKeyInfo (RFC 5280)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Both cross the boundary as lowercase hex. The curve is the same but   │
//! │  the encodings are not, so a key from one side is rejected by the      │
//! │  other.                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use p256::{FieldBytes, SecretKey};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::random;
use crate::error::{Error, Result};

/// Upper bound on scalar draws before giving up on the generator
///
/// A uniform 256-bit draw falls outside `[1, n)` with probability below
/// 2^-32, so reaching this bound means the generator is broken.
const MAX_SCALAR_ATTEMPTS: usize = 64;

/// An asymmetric key pair in its encoded form
///
/// ## Security
///
/// - The private half is zeroized when this struct is dropped
/// - No copy is retained by the library after it is returned
pub struct KeyPair {
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    pub(crate) fn new(public_key: Vec<u8>, private_key: Zeroizing<Vec<u8>>) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    /// Encoded public key bytes
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Encoded private key bytes
    ///
    /// ## Security Warning
    ///
    /// Never log or transmit these bytes.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Private key as lowercase hex
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.private_key.as_slice()))
    }

    /// Hex record for the foreign boundary
    pub fn to_hex_record(&self) -> HexKeyPair {
        HexKeyPair {
            public_key: self.public_key_hex(),
            private_key: self.private_key_hex(),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Key pair as two named hex fields
///
/// Serializes to `{"public_key": "<hex>", "private_key": "<hex>"}`.
#[derive(Serialize, Deserialize)]
pub struct HexKeyPair {
    /// Hex-encoded public key
    pub public_key: String,
    /// Hex-encoded private key
    #[serde(with = "zeroizing_string")]
    pub private_key: Zeroizing<String>,
}

/// Decode a hex string, naming the field in the error
pub(crate) fn decode_hex(field: &'static str, input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|e| {
        tracing::debug!(field, error = %e, "rejected hex input");
        Error::InvalidEncoding(field)
    })
}

/// Draw a P-256 secret scalar uniformly from `[1, n)`
///
/// Rejection sampling: 32 bytes are drawn and reinterpreted as a big-endian
/// integer; zero and values at or above the group order are discarded.
pub(crate) fn random_secret_key<R: CryptoRngCore>(rng: &mut R) -> Result<SecretKey> {
    for _ in 0..MAX_SCALAR_ATTEMPTS {
        let candidate = Zeroizing::new(random::array::<32, R>(rng)?);
        if let Ok(secret) = SecretKey::from_bytes(FieldBytes::from_slice(candidate.as_slice())) {
            return Ok(secret);
        }
    }

    tracing::error!("secure random source produced no valid scalar");
    Err(Error::RandomSourceExhausted)
}

/// Serde helper for zeroizing string fields
mod zeroizing_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S>(value: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Zeroizing<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Zeroizing::new)
    }
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
    use rand_core::{CryptoRng, RngCore};

    /// Emits all-zero bytes for the first `zeros` draws, then ones
    struct ZeroThenOnes {
        zeros: usize,
    }

    impl RngCore for ZeroThenOnes {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.try_fill_bytes(dest).unwrap()
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
            let byte = if self.zeros > 0 {
                self.zeros -= 1;
                0x00
            } else {
                0x01
            };
            dest.fill(byte);
            Ok(())
        }
    }

    impl CryptoRng for ZeroThenOnes {}

    #[test]
    fn test_random_secret_key_is_reproducible_with_seed() {
        let a = random_secret_key(&mut StdRng::seed_from_u64(1)).unwrap();
        let b = random_secret_key(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_zero_scalar_is_rejected_and_redrawn() {
        let mut rng = ZeroThenOnes { zeros: 3 };
        let secret = random_secret_key(&mut rng).unwrap();
        assert_eq!(secret.to_bytes().as_slice(), &[0x01u8; 32]);
    }

    #[test]
    fn test_out_of_range_scalar_is_rejected() {
        // 0xff..ff exceeds the P-256 group order
        assert!(SecretKey::from_bytes(FieldBytes::from_slice(&[0xffu8; 32])).is_err());
    }

    #[test]
    fn test_broken_generator_never_yields_a_key() {
        let mut rng = ZeroThenOnes { zeros: usize::MAX };
        assert!(matches!(
            random_secret_key(&mut rng),
            Err(Error::RandomSourceExhausted)
        ));
    }

    #[test]
    fn test_exhausted_generator() {
        assert!(matches!(
            random_secret_key(&mut ExhaustedRng),
            Err(Error::RandomSourceExhausted)
        ));
    }

    #[test]
    fn test_hex_record_serialization() {
        let pair = KeyPair::new(vec![0xab, 0xcd], Zeroizing::new(vec![0x01, 0x02]));
        let json = serde_json::to_string(&pair.to_hex_record()).unwrap();
        assert_eq!(json, r#"{"public_key":"abcd","private_key":"0102"}"#);

        let restored: HexKeyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.public_key, "abcd");
        assert_eq!(restored.private_key.as_str(), "0102");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let pair = KeyPair::new(vec![0xab], Zeroizing::new(vec![0x42]));
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("42"));
    }

    #[test]
    fn test_decode_hex_accepts_either_case() {
        assert_eq!(decode_hex("key", "ABcd").unwrap(), vec![0xab, 0xcd]);
        assert!(matches!(decode_hex("key", "abc"), Err(Error::InvalidEncoding("key"))));
        assert!(matches!(decode_hex("key", "zz"), Err(Error::InvalidEncoding("key"))));
    }
}
