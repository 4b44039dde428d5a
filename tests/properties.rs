//! Property tests for the public primitives.
//!
//! Round trips, commutativity, tamper detection and derivation
//! determinism over generated inputs.

use conncrypt_core::crypto::{decrypt, derive_key, derive_keyed_secret, ecdh, encrypt, signing};
use conncrypt_core::Error;
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────

/// Arbitrary 32-byte key as 64 hex characters
fn arb_key_hex() -> impl Strategy<Value = String> {
    prop::array::uniform32(any::<u8>()).prop_map(hex::encode)
}

fn arb_plaintext() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

fn arb_factors() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..6)
}

// ── Encryption ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Decrypting what was encrypted returns the plaintext.
    #[test]
    fn aead_round_trip(key in arb_key_hex(), plaintext in arb_plaintext()) {
        let ciphertext = encrypt(&plaintext, &key).unwrap();
        prop_assert_eq!(ciphertext.len(), (12 + plaintext.len() + 16) * 2);
        prop_assert_eq!(decrypt(&ciphertext, &key).unwrap(), plaintext);
    }

    /// Any single flipped bit is caught by the tag.
    #[test]
    fn aead_rejects_any_bit_flip(
        key in arb_key_hex(),
        plaintext in arb_plaintext(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut bytes = hex::decode(encrypt(&plaintext, &key).unwrap()).unwrap();
        let index = position.index(bytes.len());
        bytes[index] ^= 1 << bit;

        let result = decrypt(&hex::encode(bytes), &key);
        prop_assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    /// Inputs shorter than a nonce are truncated, never a panic.
    #[test]
    fn short_ciphertext_is_truncated(key in arb_key_hex(), bytes in prop::collection::vec(any::<u8>(), 0..12)) {
        let result = decrypt(&hex::encode(bytes), &key);
        let truncated = matches!(result, Err(Error::TruncatedInput { .. }));
        prop_assert!(truncated);
    }

    /// Arbitrary strings as ciphertext are rejected without panicking.
    #[test]
    fn garbage_ciphertext_is_rejected(key in arb_key_hex(), garbage in "\\PC{0,200}") {
        let result = decrypt(&garbage, &key);
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_decryption_failure());
    }
}

// ── Key agreement and signatures ─────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Both sides of an exchange compute the same secret.
    #[test]
    fn ecdh_is_commutative(_run in 0u8..1) {
        let alice = ecdh::generate_keypair().unwrap();
        let bob = ecdh::generate_keypair().unwrap();

        let ab = ecdh::compute_shared_secret(&alice.private_key_hex(), &bob.public_key_hex()).unwrap();
        let ba = ecdh::compute_shared_secret(&bob.private_key_hex(), &alice.public_key_hex()).unwrap();
        prop_assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    /// Random 65-byte strings starting with 0x04 are almost never on the
    /// curve, and are always rejected rather than multiplied.
    #[test]
    fn ecdh_rejects_random_points(x in prop::array::uniform32(any::<u8>()), y in prop::array::uniform32(any::<u8>())) {
        let alice = ecdh::generate_keypair().unwrap();

        let mut point = vec![0x04];
        point.extend_from_slice(&x);
        point.extend_from_slice(&y);

        let result = ecdh::compute_shared_secret(&alice.private_key_hex(), &hex::encode(point));
        prop_assert!(matches!(result, Err(Error::PointNotOnCurve) | Err(Error::InvalidKey(_))));
    }

    /// A signature verifies for its message and fails for any other.
    #[test]
    fn signature_binds_message(message in arb_plaintext(), other in arb_plaintext()) {
        let pair = signing::generate_keypair().unwrap();
        let signature = signing::sign(&message, &pair.private_key_hex()).unwrap();

        prop_assert!(signing::verify(&message, &pair.public_key_hex(), &signature.to_hex()));
        if other != message {
            prop_assert!(!signing::verify(&other, &pair.public_key_hex(), &signature.to_hex()));
        }
    }

    /// Malformed public keys verify as false.
    #[test]
    fn verify_with_garbage_key_is_false(message in arb_plaintext(), garbage in "\\PC{0,160}") {
        let pair = signing::generate_keypair().unwrap();
        let signature = signing::sign(&message, &pair.private_key_hex()).unwrap();

        prop_assert!(!signing::verify(&message, &garbage, &signature.to_hex()));
    }
}

// ── Key derivation ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Same factors, same key.
    #[test]
    fn derivation_is_deterministic(factors in arb_factors()) {
        let first = derive_key(&factors);
        let second = derive_key(&factors);
        prop_assert_eq!(first.as_bytes(), second.as_bytes());
    }

    /// Swapping two distinct factors changes the key.
    #[test]
    fn derivation_is_order_sensitive(a in "[a-z]{1,16}", b in "[A-Z]{1,16}") {
        let ab = derive_key(&[&a, &b]);
        let ba = derive_key(&[&b, &a]);
        prop_assert_ne!(ab.as_bytes(), ba.as_bytes());
    }

    /// Any key string is usable for the keyed derivation.
    #[test]
    fn keyed_secret_accepts_any_key(key in "\\PC{0,80}", factors in arb_factors()) {
        let first = derive_keyed_secret(&key, &factors).unwrap();
        let second = derive_keyed_secret(&key, &factors).unwrap();
        prop_assert_eq!(first.as_bytes(), second.as_bytes());
    }
}
