//! # Error Handling
//!
//! This module provides the error type shared by every component.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Lifecycle Errors (100-199)                                        │
//! │  │   ├── AlreadyInitialized    - Logging already installed             │
//! │  │   └── InvalidConfig         - Configuration could not be parsed     │
//! │  │                                                                      │
//! │  ├── Encoding Errors (200-299)                                         │
//! │  │   ├── InvalidEncoding       - Input is not valid hex                │
//! │  │   └── InvalidKeyLength      - Wrong byte count for a fixed key      │
//! │  │                                                                      │
//! │  ├── Key Agreement Errors (300-399)                                    │
//! │  │   ├── InvalidKey            - Malformed or out-of-range key         │
//! │  │   ├── PointNotOnCurve       - Peer point fails curve equation       │
//! │  │   └── IdentityResult        - Identity point / identity product     │
//! │  │                                                                      │
//! │  ├── Signature Errors (400-499)                                        │
//! │  │   ├── InvalidSignature      - Signature is not valid DER            │
//! │  │   ├── VerificationFailed    - Signature does not match              │
//! │  │   └── SigningFailed         - Primitive refused to sign             │
//! │  │                                                                      │
//! │  ├── Cipher Errors (500-599)                                           │
//! │  │   ├── TruncatedInput        - Shorter than the nonce                │
//! │  │   ├── AuthenticationFailed  - AEAD tag mismatch                     │
//! │  │   └── EncryptionFailed      - Primitive refused to encrypt          │
//! │  │                                                                      │
//! │  ├── Derivation Errors (600-699)                                       │
//! │  │   └── KeyDerivationFailed   - MAC / HKDF initialisation failed      │
//! │  │                                                                      │
//! │  └── Internal Errors (900-999)                                         │
//! │      ├── RandomSourceExhausted - Entropy source unavailable            │
//! │      └── Serialization         - JSON encoding failed                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flattening at the Boundary
//!
//! ```text
//! Internal (Rust)                 FFI Boundary             Foreign caller
//! ────────────────────────────────────────────────────────────────────────
//! Result<T, Error>  ── log kind ──►  "" / 0 / code  ──────►  empty string
//! ```
//!
//! Decryption failures must look identical from outside, otherwise the
//! caller gets an oracle on the ciphertext. The boundary reports all of them
//! the same way; [`Error::is_decryption_failure`] identifies the group.

use thiserror::Error;

/// Result type alias for conncrypt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conncrypt
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Lifecycle Errors (100-199)
    // ========================================================================

    /// Logging was already installed for this process
    #[error("conncrypt has already been initialized.")]
    AlreadyInitialized,

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Encoding Errors (200-299)
    // ========================================================================

    /// Input is not valid hexadecimal
    #[error("Invalid hex encoding for {0}")]
    InvalidEncoding(&'static str),

    /// Decoded key has the wrong length
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required byte count
        expected: usize,
        /// Decoded byte count
        actual: usize,
    },

    // ========================================================================
    // Key Agreement Errors (300-399)
    // ========================================================================

    /// Structurally or numerically invalid key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Peer point does not satisfy the curve equation
    #[error("Public key point is not on the curve")]
    PointNotOnCurve,

    /// Peer point is the identity, or the product is the identity
    #[error("Key agreement produced or received the identity point")]
    IdentityResult,

    // ========================================================================
    // Signature Errors (400-499)
    // ========================================================================

    /// Signature bytes are not a valid DER ECDSA signature
    #[error("Invalid signature encoding")]
    InvalidSignature,

    /// Signature does not verify against the message and key
    #[error("Signature verification failed")]
    VerificationFailed,

    /// The signing primitive rejected the input
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ========================================================================
    // Cipher Errors (500-599)
    // ========================================================================

    /// Ciphertext is shorter than the nonce
    #[error("Ciphertext too short: {actual} bytes, need at least {minimum}")]
    TruncatedInput {
        /// Minimum length in bytes
        minimum: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// AEAD authentication tag did not verify
    #[error("Decryption failed: authentication tag mismatch")]
    AuthenticationFailed,

    /// The cipher rejected the input
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // ========================================================================
    // Derivation Errors (600-699)
    // ========================================================================

    /// MAC or HKDF initialisation failed
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// The secure random source could not supply bytes
    #[error("Secure random source unavailable")]
    RandomSourceExhausted,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Get the error code for FFI
    ///
    /// Error codes are organized by category:
    /// - 100-199: Lifecycle
    /// - 200-299: Encoding
    /// - 300-399: Key agreement
    /// - 400-499: Signatures
    /// - 500-599: Cipher
    /// - 600-699: Derivation
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            Error::AlreadyInitialized => 100,
            Error::InvalidConfig(_) => 101,

            Error::InvalidEncoding(_) => 200,
            Error::InvalidKeyLength { .. } => 201,

            Error::InvalidKey(_) => 300,
            Error::PointNotOnCurve => 301,
            Error::IdentityResult => 302,

            Error::InvalidSignature => 400,
            Error::VerificationFailed => 401,
            Error::SigningFailed(_) => 402,

            Error::TruncatedInput { .. } => 500,
            Error::AuthenticationFailed => 501,
            Error::EncryptionFailed(_) => 502,

            Error::KeyDerivationFailed(_) => 600,

            Error::RandomSourceExhausted => 900,
            Error::Serialization(_) => 901,
        }
    }

    /// Whether this error can come out of a decryption attempt on
    /// attacker-supplied ciphertext
    pub fn is_decryption_failure(&self) -> bool {
        matches!(
            self,
            Error::TruncatedInput { .. } | Error::AuthenticationFailed | Error::InvalidEncoding(_)
        )
    }

    /// Short, stable name of the variant for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Error::AlreadyInitialized => "already_initialized",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidEncoding(_) => "invalid_encoding",
            Error::InvalidKeyLength { .. } => "invalid_key_length",
            Error::InvalidKey(_) => "invalid_key",
            Error::PointNotOnCurve => "point_not_on_curve",
            Error::IdentityResult => "identity_result",
            Error::InvalidSignature => "invalid_signature",
            Error::VerificationFailed => "verification_failed",
            Error::SigningFailed(_) => "signing_failed",
            Error::TruncatedInput { .. } => "truncated_input",
            Error::AuthenticationFailed => "authentication_failed",
            Error::EncryptionFailed(_) => "encryption_failed",
            Error::KeyDerivationFailed(_) => "key_derivation_failed",
            Error::RandomSourceExhausted => "random_source_exhausted",
            Error::Serialization(_) => "serialization",
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<rand_core::Error> for Error {
    fn from(_: rand_core::Error) -> Self {
        Error::RandomSourceExhausted
    }
}

// ============================================================================
// TESTS
// ============================================================================
