//! Ephemeral identifier derivation for both DP-3T designs.
//!
//! Low-cost derives a day's worth of EphIDs from one day-key via an
//! HMAC-seeded AES-CTR keystream ([`lowcost`]); unlinkable draws an
//! independent random seed per epoch and hashes it ([`unlinkable`]).

pub mod lowcost;
pub mod unlinkable;

use crate::config::LENGTH_EPHID;

/// A 16-byte ephemeral identifier, opaque to observers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EphId(pub [u8; LENGTH_EPHID]);

impl EphId {
    pub fn as_bytes(&self) -> &[u8; LENGTH_EPHID] {
        &self.0
    }
}

impl std::fmt::Debug for EphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EphId({})", hex::encode(self.0))
    }
}

impl From<[u8; LENGTH_EPHID]> for EphId {
    fn from(bytes: [u8; LENGTH_EPHID]) -> Self {
        Self(bytes)
    }
}
