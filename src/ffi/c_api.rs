//! # C API
//!
//! C-compatible FFI functions for hosts that load the shared library.
//!
//! All functions follow the naming convention: `conncrypt_<module>_<action>`
//!
//! ## Conventions
//!
//! | Direction | Encoding |
//! |-----------|----------|
//! | Arguments | NUL-terminated; keys, signatures and ciphertexts as UTF-8 hex, payloads as raw bytes |
//! | Returns | Heap-allocated C string, freed with `conncrypt_string_free` |
//! | Key pairs | `{"public_key":"<hex>","private_key":"<hex>"}` |
//! | Failure | Empty string (verify returns `0`) |
//!
//! The failure kind is logged through `tracing` and never returned.

use std::os::raw::{c_char, c_int};

use super::types::{cstr_to_string, flatten, into_c_string, log_failure, required_arg, required_bytes};
use crate::crypto::{ecdh, encryption, kdf, signing, KeyPair};
use crate::error::Result;
use crate::CoreConfig;

fn keypair_json(pair: KeyPair) -> Result<String> {
    Ok(serde_json::to_string(&pair.to_hex_record())?)
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize logging
///
/// # Arguments
/// * `config_json` - `CoreConfig` as JSON, or null to read the environment
///
/// # Returns
/// `0` on success, otherwise the error code
///
/// # Safety
/// `config_json` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_init(config_json: *const c_char) -> c_int {
    let config = if config_json.is_null() {
        Ok(CoreConfig::from_env())
    } else {
        required_arg(config_json, "config").and_then(|json| CoreConfig::from_json(&json))
    };

    match config.and_then(|config| crate::init(&config)) {
        Ok(()) => 0,
        Err(e) => {
            log_failure("init", &e);
            e.code()
        }
    }
}

/// Get Conncrypt Core version
#[no_mangle]
pub extern "C" fn conncrypt_version() -> *mut c_char {
    into_c_string(crate::version())
}

// ============================================================================
// KEY AGREEMENT
// ============================================================================

/// Generate an ECDH P-256 key pair
///
/// # Returns
/// Key-pair JSON: 65-byte uncompressed public point and 32-byte scalar, hex
#[no_mangle]
pub extern "C" fn conncrypt_ecdh_generate_keypair() -> *mut c_char {
    flatten(
        "ecdh_generate_keypair",
        ecdh::generate_keypair().and_then(keypair_json),
    )
}

/// Compute the shared secret from our private key and a peer's public key
///
/// # Returns
/// 32-byte shared secret as hex
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_ecdh_shared_secret(
    private_key: *const c_char,
    peer_public_key: *const c_char,
) -> *mut c_char {
    let result = (|| -> Result<String> {
        let private_key = required_arg(private_key, "private key")?;
        let peer_public_key = required_arg(peer_public_key, "peer public key")?;

        let shared = ecdh::compute_shared_secret(&private_key, &peer_public_key)?;
        Ok(shared.to_hex().as_str().to_owned())
    })();

    flatten("ecdh_shared_secret", result)
}

// ============================================================================
// SIGNATURES
// ============================================================================

/// Generate an ECDSA P-256 key pair
///
/// # Returns
/// Key-pair JSON: PKIX public key and SEC1 private key, DER as hex
#[no_mangle]
pub extern "C" fn conncrypt_ecdsa_generate_keypair() -> *mut c_char {
    flatten(
        "ecdsa_generate_keypair",
        signing::generate_keypair().and_then(keypair_json),
    )
}

/// Sign the bytes of `data` with a hex SEC1 private key
///
/// # Returns
/// DER signature as hex
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_ecdsa_sign(data: *const c_char, private_key: *const c_char) -> *mut c_char {
    let result = (|| -> Result<String> {
        let data = required_bytes(data, "data")?;
        let private_key = required_arg(private_key, "private key")?;

        signing::sign(&data, &private_key).map(|sig| sig.to_hex())
    })();

    flatten("ecdsa_sign", result)
}

/// Verify a hex DER signature over `data` with a hex PKIX public key
///
/// # Returns
/// `1` if valid, `0` otherwise (including any malformed or null input)
///
/// # Safety
/// All arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_ecdsa_verify(
    data: *const c_char,
    public_key: *const c_char,
    signature: *const c_char,
) -> c_int {
    let (Ok(data), Some(public_key), Some(signature)) = (
        required_bytes(data, "data"),
        cstr_to_string(public_key),
        cstr_to_string(signature),
    ) else {
        tracing::warn!(operation = "ecdsa_verify", "null or non-UTF-8 argument");
        return 0;
    };

    c_int::from(signing::verify(&data, &public_key, &signature))
}

// ============================================================================
// ENCRYPTION
// ============================================================================

/// Encrypt `plaintext` with a 64-character hex key
///
/// # Returns
/// `hex(nonce || ciphertext || tag)`
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_aes_encrypt(plaintext: *const c_char, key: *const c_char) -> *mut c_char {
    let result = (|| -> Result<String> {
        let plaintext = required_bytes(plaintext, "plaintext")?;
        let key = required_arg(key, "key")?;

        encryption::encrypt(&plaintext, &key)
    })();

    flatten("aes_encrypt", result)
}

/// Decrypt the hex wire format with a 64-character hex key
///
/// # Returns
/// The plaintext, or the empty string for any failure
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_aes_decrypt(ciphertext: *const c_char, key: *const c_char) -> *mut c_char {
    let result = (|| -> Result<Vec<u8>> {
        let ciphertext = required_arg(ciphertext, "ciphertext")?;
        let key = required_arg(key, "key")?;

        encryption::decrypt(&ciphertext, &key)
    })();

    flatten("aes_decrypt", result)
}

// ============================================================================
// KEY DERIVATION
// ============================================================================

/// SHA-256 of a single factor
///
/// # Returns
/// 32-byte digest as hex
///
/// # Safety
/// `factor` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_kdf_derive_key(factor: *const c_char) -> *mut c_char {
    let result = required_bytes(factor, "factor")
        .map(|factor| kdf::derive_key(&[factor]).to_hex().as_str().to_owned());

    flatten("kdf_derive_key", result)
}

/// HMAC-SHA256 of a single factor
///
/// `key` is hex-decoded when it is valid hex, otherwise used as raw bytes.
///
/// # Returns
/// 32-byte MAC as hex
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_kdf_keyed_secret(key: *const c_char, factor: *const c_char) -> *mut c_char {
    let result = (|| -> Result<String> {
        let key = required_arg(key, "key")?;
        let factor = required_bytes(factor, "factor")?;

        let secret = kdf::derive_keyed_secret(&key, &[factor])?;
        Ok(secret.to_hex().as_str().to_owned())
    })();

    flatten("kdf_keyed_secret", result)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HexKeyPair;
    use crate::ffi::conncrypt_string_free;
    use std::ffi::{CStr, CString};

    const ZERO_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    unsafe fn take(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        conncrypt_string_free(ptr);
        s
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_version() {
        unsafe {
            assert_eq!(take(conncrypt_version()), crate::version());
        }
    }

    #[test]
    fn test_ecdh_through_c_api() {
        unsafe {
            let alice: HexKeyPair = serde_json::from_str(&take(conncrypt_ecdh_generate_keypair())).unwrap();
            let bob: HexKeyPair = serde_json::from_str(&take(conncrypt_ecdh_generate_keypair())).unwrap();

            assert_eq!(alice.public_key.len(), 130);
            assert_eq!(alice.private_key.len(), 64);

            let ab = take(conncrypt_ecdh_shared_secret(
                c(&alice.private_key).as_ptr(),
                c(&bob.public_key).as_ptr(),
            ));
            let ba = take(conncrypt_ecdh_shared_secret(
                c(&bob.private_key).as_ptr(),
                c(&alice.public_key).as_ptr(),
            ));

            assert_eq!(ab.len(), 64);
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn test_ecdh_failure_is_empty() {
        unsafe {
            let result = take(conncrypt_ecdh_shared_secret(c("zz").as_ptr(), c("00").as_ptr()));
            assert_eq!(result, "");

            let result = take(conncrypt_ecdh_shared_secret(std::ptr::null(), c("00").as_ptr()));
            assert_eq!(result, "");
        }
    }

    #[test]
    fn test_ecdsa_through_c_api() {
        unsafe {
            let pair: HexKeyPair = serde_json::from_str(&take(conncrypt_ecdsa_generate_keypair())).unwrap();
            let data = c("payload");

            let signature = take(conncrypt_ecdsa_sign(data.as_ptr(), c(&pair.private_key).as_ptr()));
            assert!(!signature.is_empty());

            let public_key = c(&pair.public_key);
            let sig = c(&signature);
            assert_eq!(conncrypt_ecdsa_verify(data.as_ptr(), public_key.as_ptr(), sig.as_ptr()), 1);
            assert_eq!(
                conncrypt_ecdsa_verify(c("payload!").as_ptr(), public_key.as_ptr(), sig.as_ptr()),
                0
            );
            assert_eq!(conncrypt_ecdsa_verify(data.as_ptr(), c("nothex").as_ptr(), sig.as_ptr()), 0);
            assert_eq!(conncrypt_ecdsa_verify(data.as_ptr(), std::ptr::null(), sig.as_ptr()), 0);
        }
    }

    #[test]
    fn test_aes_through_c_api() {
        unsafe {
            let key = c(ZERO_KEY);
            let ciphertext = take(conncrypt_aes_encrypt(c("secret message").as_ptr(), key.as_ptr()));
            assert_eq!(ciphertext.len(), (12 + 14 + 16) * 2);

            let plaintext = take(conncrypt_aes_decrypt(c(&ciphertext).as_ptr(), key.as_ptr()));
            assert_eq!(plaintext, "secret message");
        }
    }

    #[test]
    fn test_binary_payloads_pass_through() {
        let payload = CString::new(vec![0xff, 0xfe, b'a']).unwrap();

        unsafe {
            let key = c(ZERO_KEY);
            let ciphertext = take(conncrypt_aes_encrypt(payload.as_ptr(), key.as_ptr()));
            assert_eq!(ciphertext.len(), (12 + 3 + 16) * 2);

            let plaintext = conncrypt_aes_decrypt(c(&ciphertext).as_ptr(), key.as_ptr());
            assert_eq!(CStr::from_ptr(plaintext).to_bytes(), &[0xff, 0xfe, b'a']);
            conncrypt_string_free(plaintext);

            let derived = take(conncrypt_kdf_derive_key(payload.as_ptr()));
            assert_eq!(derived, kdf::derive_key(&[[0xffu8, 0xfe, b'a']]).to_hex().as_str());

            let pair: HexKeyPair = serde_json::from_str(&take(conncrypt_ecdsa_generate_keypair())).unwrap();
            let signature = c(&take(conncrypt_ecdsa_sign(payload.as_ptr(), c(&pair.private_key).as_ptr())));
            assert_eq!(
                conncrypt_ecdsa_verify(payload.as_ptr(), c(&pair.public_key).as_ptr(), signature.as_ptr()),
                1
            );
        }
    }

    #[test]
    fn test_aes_failures_are_indistinguishable() {
        unsafe {
            let key = c(ZERO_KEY);
            let mut tampered = take(conncrypt_aes_encrypt(c("secret").as_ptr(), key.as_ptr()));
            let last = tampered.pop().unwrap();
            tampered.push(if last == '0' { '1' } else { '0' });

            for ciphertext in ["", "abc", "00", tampered.as_str()] {
                assert_eq!(take(conncrypt_aes_decrypt(c(ciphertext).as_ptr(), key.as_ptr())), "");
            }
            assert_eq!(take(conncrypt_aes_encrypt(c("x").as_ptr(), c("00").as_ptr())), "");
        }
    }

    #[test]
    fn test_kdf_through_c_api() {
        unsafe {
            assert_eq!(
                take(conncrypt_kdf_derive_key(c("").as_ptr())),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
            assert_eq!(
                take(conncrypt_kdf_keyed_secret(
                    c("Jefe").as_ptr(),
                    c("what do ya want for nothing?").as_ptr()
                )),
                "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
            );
            assert_eq!(take(conncrypt_kdf_derive_key(std::ptr::null())), "");
        }
    }

    #[test]
    fn test_init_rejects_bad_config() {
        unsafe {
            let code = conncrypt_init(c("not json").as_ptr());
            assert_eq!(code, crate::Error::Serialization(String::new()).code());
        }
    }
}
