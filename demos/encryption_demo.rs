//! # Encryption Demo
//!
//! Demonstrates AES-256-GCM encryption with a key agreed over P-256.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example encryption_demo
//! ```

use conncrypt_core::crypto::{decrypt, derive_session_key, ecdh, encrypt, open, seal, EncryptionKey, OsRng};

fn main() {
    println!("=== Conncrypt Core: Encryption Demo ===\n");

    // Step 1: Agree on a key
    println!("Step 1: Agreeing on a session key...");

    let alice = ecdh::generate_keypair().expect("Failed to create Alice's key pair");
    let bob = ecdh::generate_keypair().expect("Failed to create Bob's key pair");

    let shared = ecdh::compute_shared_secret(&alice.private_key_hex(), &bob.public_key_hex())
        .expect("Failed to compute shared secret");
    let key = derive_session_key(&shared, b"", b"conncrypt-session-v1").expect("Failed to derive key");
    let key_hex = key.to_hex();

    println!("  Key: {}...", &key_hex[..16]);
    println!();

    // Step 2: Encrypt
    println!("Step 2: Alice encrypts a message...");

    let message = "Hello Bob! This message is end-to-end encrypted.";
    let ciphertext = encrypt(message.as_bytes(), &key_hex).expect("Encryption failed");

    println!("  Plaintext:  \"{}\"", message);
    println!("  Ciphertext: {}...", &ciphertext[..48]);
    println!("  Layout:     nonce(12) || ciphertext({}) || tag(16)", message.len());
    println!();
    println!("  ┌──────────────┬──────────────────────────────┬──────────────────┐");
    println!("  │ nonce        │ ciphertext                   │ tag              │");
    println!("  │ 12 bytes     │ len(plaintext) bytes         │ 16 bytes         │");
    println!("  └──────────────┴──────────────────────────────┴──────────────────┘");
    println!();

    // Step 3: Decrypt
    println!("Step 3: Bob decrypts...");

    let plaintext = decrypt(&ciphertext, &key_hex).expect("Decryption failed");
    println!("  Decrypted: \"{}\"", String::from_utf8_lossy(&plaintext));
    assert_eq!(plaintext, message.as_bytes());
    println!("  ✓ Message matches");
    println!();

    // Step 4: Same plaintext, different ciphertext
    println!("Step 4: Encrypting the same message again...");

    let again = encrypt(message.as_bytes(), &key_hex).expect("Encryption failed");
    assert_ne!(ciphertext, again);
    println!("  ✓ Fresh nonce, different ciphertext");
    println!();

    // Step 5: Tampering
    println!("Step 5: Flipping one bit of the ciphertext...");

    let mut tampered = hex::decode(&ciphertext).expect("ciphertext is hex");
    tampered[20] ^= 0x01;
    match decrypt(&hex::encode(tampered), &key_hex) {
        Ok(_) => println!("  ✗ Tampered message was accepted!"),
        Err(e) => println!("  ✓ Rejected: {}", e),
    }
    println!();

    // Step 6: Associated data
    println!("Step 6: Binding a header with associated data...");

    let raw_key = EncryptionKey::from_bytes(*key.as_bytes());
    let envelope = seal(&raw_key, b"payload", b"header:v1", &mut OsRng).expect("Seal failed");

    let opened = open(&raw_key, &envelope, b"header:v1").expect("Open failed");
    assert_eq!(opened, b"payload");
    println!("  ✓ Opens with the same header");

    match open(&raw_key, &envelope, b"header:v2") {
        Ok(_) => println!("  ✗ Opened with the wrong header!"),
        Err(e) => println!("  ✓ Wrong header rejected: {}", e),
    }
    println!();

    println!("=== Demo Complete ===");
}
