//! # FFI Bindings
//!
//! C ABI exports for hosts that load the library dynamically or link it
//! statically.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FFI ARCHITECTURE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Host (Go / Python / Swift / C)                                        │
//! │         │  NUL-terminated strings                                      │
//! │         ▼                                                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    c_api (conncrypt_*)                          │   │
//! │  │                                                                 │   │
//! │  │  parse args → call crypto → flatten Result                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Conncrypt Core                             │   │
//! │  │                                                                 │   │
//! │  │  ECDH │ Signing │ Encryption │ KDF                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every string-returning function returns the empty string on failure and
//! `conncrypt_ecdsa_verify` returns `0`. The structured error is logged at
//! `warn` level and then discarded, so a caller cannot tell an
//! authentication failure from a malformed ciphertext. `conncrypt_init` is
//! the exception: it returns the numeric error code.
//!
//! ## Memory
//!
//! Every non-null `*mut c_char` returned must be released exactly once with
//! `conncrypt_string_free`.

mod c_api;
mod types;

pub use c_api::*;
pub use types::*;
