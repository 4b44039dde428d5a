//! # Cryptography Module
//!
//! The four primitive components: key agreement, signatures, authenticated
//! encryption, and key derivation.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC COMPONENTS                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │  ecdh                    │      │  signing                 │        │
//! │  │  P-256 key agreement     │      │  P-256 ECDSA / SHA-256   │        │
//! │  │  raw scalar / SEC1 point │      │  SEC1 / PKIX / DER       │        │
//! │  └────────────┬─────────────┘      └──────────────────────────┘        │
//! │               │ shared secret                                           │
//! │               ▼                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │  kdf                     │─────►│  encryption              │        │
//! │  │  SHA-256 / HMAC / HKDF   │ key  │  AES-256-GCM             │        │
//! │  └──────────────────────────┘      └──────────────────────────┘        │
//! │                                                                         │
//! │  keys    : KeyPair container shared by ecdh and signing                │
//! │  random  : injected CryptoRngCore, OsRng by default                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose | Encoding |
//! |-----------|---------|----------|
//! | ECDH P-256 | Key agreement | 32-byte scalar, 65-byte uncompressed point |
//! | ECDSA P-256 + SHA-256 | Signatures | SEC1 private, PKIX public, DER signature |
//! | AES-256-GCM | Encryption | `nonce(12) ‖ ciphertext ‖ tag(16)` |
//! | SHA-256 / HMAC-SHA256 | Derivation | 32 bytes |
//! | HKDF-SHA256 | Session keys | 32 bytes |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: private keys, shared secrets and derived keys are zeroized when dropped
//! 2. **Secure Random**: `OsRng` unless the caller injects a generator
//! 3. **No Key Reuse**: a fresh random nonce for every encryption
//! 4. **Stateless**: nothing is cached between calls

mod keys;
mod random;

pub mod ecdh;
pub mod encryption;
pub mod kdf;
pub mod signing;

pub use ecdh::SharedSecret;
pub use encryption::{decrypt, encrypt, open, seal, EncryptionKey, Envelope, Nonce};
pub use kdf::{derive_key, derive_keyed_secret, derive_session_key, DerivedKey, KeyMaterial};
pub use keys::{HexKeyPair, KeyPair};
pub use random::OsRng;
pub use signing::{sign, verify, verify_detailed, Signature};
