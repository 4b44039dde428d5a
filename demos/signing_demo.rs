//! # Digital Signature Demo
//!
//! Demonstrates ECDSA P-256 signatures for message authentication.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example signing_demo
//! ```

use conncrypt_core::crypto::{signing, verify_detailed};

fn main() {
    println!("=== Conncrypt Core: Digital Signature Demo ===\n");

    // Step 1: Create a key pair
    println!("Step 1: Creating ECDSA P-256 key pair...");

    let keypair = signing::generate_keypair().expect("Failed to create key pair");

    println!("  Public key (PKIX DER):  {} bytes", keypair.public_key().len());
    println!("  Private key (SEC1 DER): {} bytes", keypair.private_key().len());
    println!();

    // Step 2: Explain the signing process
    println!("Step 2: Understanding ECDSA Signatures");
    println!();
    println!("  ┌─────────────────────────────────────────────────────────────┐");
    println!("  │                   SIGNATURE FLOW                            │");
    println!("  ├─────────────────────────────────────────────────────────────┤");
    println!("  │                                                             │");
    println!("  │    Message ─► SHA-256 ─┐                                   │");
    println!("  │                        ▼                                   │");
    println!("  │    Private ──────► ECDSA ─► DER signature (≤ 72 bytes)     │");
    println!("  │    Key             Sign     fresh random nonce each time   │");
    println!("  │                                                             │");
    println!("  │    Message ─► SHA-256 ─┐                                   │");
    println!("  │                        ▼                                   │");
    println!("  │    Public ───────► ECDSA ─► Valid / Invalid                │");
    println!("  │    Key  Signature ─► Verify                                │");
    println!("  │                                                             │");
    println!("  └─────────────────────────────────────────────────────────────┘");
    println!();

    // Step 3: Sign a message
    println!("Step 3: Signing a message...");

    let message = b"I, Alice, agree to the terms.";
    let private_hex = keypair.private_key_hex();
    let public_hex = keypair.public_key_hex();

    let signature = signing::sign(message, &private_hex).expect("Signing failed");
    println!("  Message:   \"{}\"", String::from_utf8_lossy(message));
    println!("  Signature: {}...", &signature.to_hex()[..32]);
    println!();

    // Step 4: Verify
    println!("Step 4: Verifying...");

    let valid = signing::verify(message, &public_hex, &signature.to_hex());
    println!("  {} Signature is valid", if valid { "✓" } else { "✗" });

    let again = signing::sign(message, &private_hex).expect("Signing failed");
    println!(
        "  {} Signing again gives a different signature",
        if again.as_bytes() != signature.as_bytes() { "✓" } else { "✗" }
    );
    println!();

    // Step 5: Tampering
    println!("Step 5: Verifying a modified message...");

    let forged = b"I, Alice, agree to the terms!";
    match verify_detailed(forged, &public_hex, &signature.to_hex()) {
        Ok(()) => println!("  ✗ Forgery accepted!"),
        Err(e) => println!("  ✓ Rejected: {} ({})", e, e.kind()),
    }

    let valid = signing::verify(message, "not-a-key", &signature.to_hex());
    println!("  {} Malformed public key reports invalid", if valid { "✗" } else { "✓" });
    println!();

    println!("=== Demo Complete ===");
}
