//! # Key Agreement Demo
//!
//! Two parties agree on a secret over P-256 and turn it into a cipher key.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example key_agreement_demo
//! ```

use conncrypt_core::crypto::{derive_session_key, ecdh};

fn main() {
    conncrypt_core::init(&conncrypt_core::CoreConfig::from_env()).expect("Failed to initialize logging");

    println!("=== Conncrypt Core: Key Agreement Demo ===\n");

    // Step 1: Each side generates a key pair
    println!("Step 1: Generating P-256 key pairs for Alice and Bob...");

    let alice = ecdh::generate_keypair().expect("Failed to create Alice's key pair");
    let bob = ecdh::generate_keypair().expect("Failed to create Bob's key pair");

    println!("  Alice's public key: {}...", &alice.public_key_hex()[..18]);
    println!("  Bob's public key:   {}...", &bob.public_key_hex()[..18]);
    println!("  ({} bytes, uncompressed SEC1)", alice.public_key().len());
    println!();

    // Step 2: Exchange public keys, compute the secret on both sides
    println!("Step 2: Computing the shared secret on both sides...");

    let alice_shared = ecdh::compute_shared_secret(&alice.private_key_hex(), &bob.public_key_hex())
        .expect("Alice failed to compute the shared secret");
    let bob_shared = ecdh::compute_shared_secret(&bob.private_key_hex(), &alice.public_key_hex())
        .expect("Bob failed to compute the shared secret");

    println!("  Alice's view: {}...", &alice_shared.to_hex()[..16]);
    println!("  Bob's view:   {}...", &bob_shared.to_hex()[..16]);
    assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    println!("  ✓ Secrets match");
    println!();

    // Step 3: A hostile peer key is rejected before any multiplication
    println!("Step 3: Offering the point at infinity as a peer key...");

    match ecdh::compute_shared_secret(&alice.private_key_hex(), "00") {
        Ok(_) => println!("  ✗ Identity point was accepted!"),
        Err(e) => println!("  ✓ Rejected: {} (code {})", e, e.code()),
    }
    println!();

    // Step 4: Expand into a session key
    println!("Step 4: Expanding the secret with HKDF-SHA256...");

    let alice_key = derive_session_key(&alice_shared, b"demo-conversation", b"conncrypt-session-v1")
        .expect("Failed to derive Alice's session key");
    let bob_key = derive_session_key(&bob_shared, b"demo-conversation", b"conncrypt-session-v1")
        .expect("Failed to derive Bob's session key");

    assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
    println!("  Session key: {}...", &alice_key.to_hex()[..16]);
    println!("  ✓ Both sides hold the same AES-256-GCM key");
    println!();

    println!("=== Demo Complete ===");
}
