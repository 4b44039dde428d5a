//! # Secure Randomness
//!
//! Every operation that needs entropy takes the generator as a parameter
//! (`&mut impl CryptoRngCore`). The convenience wrappers in the sibling
//! modules pass [`OsRng`], a zero-sized handle onto the operating system
//! generator that is safe to use from any thread.
//!
//! Tests inject a seeded `StdRng` for reproducibility, or a generator that
//! always fails to exercise [`crate::error::Error::RandomSourceExhausted`].

use rand_core::CryptoRngCore;

pub use rand::rngs::OsRng;

use crate::error::Result;

/// Fill `dest` from `rng`, surfacing generator failure instead of panicking
pub(crate) fn fill<R: CryptoRngCore>(rng: &mut R, dest: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(dest).map_err(|e| {
        tracing::error!(error = %e, "secure random source failed");
        e
    })?;
    Ok(())
}

/// Draw `N` random bytes
pub(crate) fn array<const N: usize, R: CryptoRngCore>(rng: &mut R) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    fill(rng, &mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Generators for exercising failure paths.

    use rand_core::{CryptoRng, RngCore};

    /// A generator whose every draw fails
    pub struct ExhaustedRng;

    impl RngCore for ExhaustedRng {
        fn next_u32(&mut self) -> u32 {
            panic!("ExhaustedRng used through an infallible method")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("ExhaustedRng used through an infallible method")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("ExhaustedRng used through an infallible method")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
            Err(rand_core::Error::new("entropy source exhausted"))
        }
    }

    impl CryptoRng for ExhaustedRng {}
}
