//! Unlinkable design: one independent random seed per epoch, hashed into an
//! EphID and, for stored observations, into a hash that already binds the
//! epoch it was seen in.

use super::EphId;
use crate::config::LENGTH_EPHID;
use crate::crypto::rng::SecureRng;
use crate::crypto::{sha256, CryptoError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte secret behind exactly one epoch's EphID.
///
/// Unlike [`crate::ephid::lowcost::DayKey`], seeds are independent across
/// epochs — there is no chain, so no relation can be derived between them.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 32]);

impl Seed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn generate(rng: &mut dyn SecureRng) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// `ephid_from_seed(seed) = SHA256(seed)[0..16]`.
    pub fn to_ephid(&self) -> EphId {
        let digest = sha256(&self.0);
        let mut id = [0u8; LENGTH_EPHID];
        id.copy_from_slice(&digest[..LENGTH_EPHID]);
        EphId(id)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed").finish()
    }
}

/// `SHA256(ephid || epoch_u32_be)`.
///
/// Binding the epoch into the hash is what makes replay protection
/// intrinsic for this design: replaying an EphID later attributes it to a
/// later epoch, which hashes to something different.
pub fn hashed_observation(ephid: &EphId, epoch: u32) -> [u8; 32] {
    let mut input = Vec::with_capacity(LENGTH_EPHID + 4);
    input.extend_from_slice(ephid.as_bytes());
    input.extend_from_slice(&epoch.to_be_bytes());
    sha256(&input)
}

/// `hashed_observation(ephid_from_seed(seed), epoch)`.
pub fn hashed_observation_from_seed(seed: &Seed, epoch: u32) -> [u8; 32] {
    hashed_observation(&seed.to_ephid(), epoch)
}
