//! Cryptographic primitives shared by both DP-3T designs.
//!
//! Everything here is a pure function of its inputs (plus, where noted, an
//! injected [`rng::SecureRng`]). Nothing reads the system clock and nothing
//! retries on failure: a failing CSPRNG read is the one way these functions
//! can fail, and it is surfaced as [`CryptoError::Unavailable`] rather than
//! swallowed.

pub mod primitives;
pub mod rng;

pub use primitives::{
    aes128_ctr_keystream, broadcast_keystream, hmac_sha256, random_bytes, secure_shuffle, sha256,
};
pub use rng::{DeterministicRng, OsCsprng, SecureRng};

use thiserror::Error;

/// Errors from the crypto primitives layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS CSPRNG could not be read. Per spec, this makes the whole
    /// tracer unusable — there is no degraded mode.
    #[error("CSPRNG unavailable: {0}")]
    Unavailable(String),
}
