//! # Conncrypt Core
//!
//! Stateless cryptographic primitives for establishing and protecting a
//! two-party channel, with a C-callable surface for foreign hosts.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CONNCRYPT CORE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐   │
//! │  │  ECDH       │  │  Signing    │  │ Encryption  │  │  KDF         │   │
//! │  │             │  │             │  │             │  │              │   │
//! │  │ - Keypairs  │  │ - Keypairs  │  │ - AES-GCM   │  │ - SHA-256    │   │
//! │  │ - Shared    │  │ - Sign      │  │ - Envelope  │  │ - HMAC       │   │
//! │  │   secret    │  │ - Verify    │  │ - AAD       │  │ - HKDF       │   │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘   │
//! │         └────────────────┴────────────────┴────────────────┘           │
//! │                                   │                                     │
//! │                          ┌────────┴────────┐                           │
//! │                          │  FFI (C API)    │  feature = "ffi"          │
//! │                          │  hex / JSON     │                           │
//! │                          └─────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type and numeric codes
//! - [`crypto`] - Key agreement, signatures, encryption, derivation
//! - `ffi` - C exports (feature `ffi`)
//!
//! ## Quick Start
//!
//! ```ignore
//! use conncrypt_core::crypto::{ecdh, encrypt, decrypt, derive_session_key};
//!
//! let alice = ecdh::generate_keypair()?;
//! let bob = ecdh::generate_keypair()?;
//!
//! let shared = ecdh::compute_shared_secret(&alice.private_key_hex(), &bob.public_key_hex())?;
//! let key = derive_session_key(&shared, b"", b"conncrypt-session-v1")?;
//!
//! let ciphertext = encrypt(b"hello", &key.to_hex())?;
//! assert_eq!(decrypt(&ciphertext, &key.to_hex())?, b"hello");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod error;

#[cfg(feature = "ffi")]
pub mod ffi;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{KeyPair, SharedSecret};
pub use error::{Error, Result};

// ============================================================================
// INITIALIZATION
// ============================================================================

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "CONNCRYPT_LOG";

/// Environment variable switching log output to JSON (`1` or `true`)
pub const LOG_JSON_ENV: &str = "CONNCRYPT_LOG_JSON";

/// Filter used when neither the environment nor the config names one
pub const DEFAULT_LOG_FILTER: &str = "conncrypt_core=info";

/// Set once by [`init`]
static INITIALIZED: OnceCell<CoreConfig> = OnceCell::new();

/// Configuration for initializing Conncrypt Core
///
/// The cryptographic operations take no configuration; this only controls
/// how diagnostics are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// `tracing` filter directive, e.g. `"conncrypt_core=debug"`
    pub log_filter: Option<String>,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl CoreConfig {
    /// Parse from a JSON object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read [`LOG_ENV`] and [`LOG_JSON_ENV`]
    pub fn from_env() -> Self {
        let log_filter = std::env::var(LOG_ENV).ok().filter(|f| !f.trim().is_empty());
        let json_logs = std::env::var(LOG_JSON_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            log_filter,
            json_logs,
        }
    }

    /// Build the log filter
    ///
    /// Precedence: [`LOG_ENV`], then `log_filter`, then [`DEFAULT_LOG_FILTER`].
    fn env_filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
            return Ok(filter);
        }

        let directive = self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
        EnvFilter::try_new(directive)
            .map_err(|e| Error::InvalidConfig(format!("Invalid log filter '{}': {}", directive, e)))
    }
}

/// Install the logging subscriber
///
/// Call once at process startup. A second call returns
/// [`Error::AlreadyInitialized`]. If the host has already installed its
/// own global subscriber, that one is kept and events flow to it.
///
/// ## Example
///
/// ```ignore
/// conncrypt_core::init(&conncrypt_core::CoreConfig::from_env())?;
/// ```
pub fn init(config: &CoreConfig) -> Result<()> {
    let filter = config.env_filter()?;

    INITIALIZED
        .set(config.clone())
        .map_err(|_| Error::AlreadyInitialized)?;

    let installed = if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already set by host, keeping it");
    }

    tracing::info!("Conncrypt Core v{} initialized", version());
    Ok(())
}

/// Check whether [`init`] has completed
pub fn is_initialized() -> bool {
    INITIALIZED.get().is_some()
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Conncrypt Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns build information for debugging
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        #[cfg(target_os = "ios")]
        target: "ios",
        #[cfg(target_os = "android")]
        target: "android",
        #[cfg(target_os = "macos")]
        target: "macos",
        #[cfg(target_os = "linux")]
        target: "linux",
        #[cfg(target_os = "windows")]
        target: "windows",
        #[cfg(not(any(
            target_os = "ios",
            target_os = "android",
            target_os = "macos",
            target_os = "linux",
            target_os = "windows"
        )))]
        target: "unknown",
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Build information for debugging
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Crate version
    pub version: &'static str,
    /// Target operating system
    pub target: &'static str,
    /// Build profile (debug/release)
    pub profile: &'static str,
}

// ============================================================================
// TESTS
// ============================================================================
