//! Low-cost design: a day-key hash chain expands into a day of EphIDs via
//! an HMAC-seeded AES-CTR keystream.

use super::EphId;
use crate::config::{BROADCAST_KEY, LENGTH_EPHID, NUM_EPOCHS_PER_DAY};
use crate::crypto::rng::SecureRng;
use crate::crypto::{broadcast_keystream, hmac_sha256, secure_shuffle, sha256, CryptoError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte secret from which an entire day's EphIDs are derived.
///
/// `next(k) = SHA256(k)`: the chain is forward-only, which is what lets
/// [`crate::tracer::lowcost::LowCostTracer::get_tracing_information`]
/// reveal a past key without revealing anything about keys before it.
#[derive(Clone, Zeroize, ZeroizeOnDrop, serde::Serialize, serde::Deserialize)]
pub struct DayKey([u8; 32]);

impl DayKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Draw a fresh random day-key.
    pub fn generate(rng: &mut dyn SecureRng) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// `next_day_key(k) = SHA256(k)`.
    pub fn next(&self) -> Self {
        Self(sha256(&self.0))
    }
}

impl std::fmt::Debug for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayKey").finish()
    }
}

/// Derive the day's `NUM_EPOCHS_PER_DAY` EphIDs from `key`.
///
/// 1. `stream_key = HMAC-SHA256(key, "broadcast key")`.
/// 2. `keystream = AES-CTR(stream_key, iv=0, NUM_EPOCHS_PER_DAY * LENGTH_EPHID)`.
/// 3. Slice into EphIDs, list index = epoch-within-day, before shuffling.
/// 4. If `shuffle`, cryptographically shuffle in place.
///
/// `shuffle` must be `false` to reproduce the spec's test vectors; set it to
/// `true` for anything that is actually broadcast, so the wire order does
/// not leak which epoch an EphID belongs to.
pub fn generate_ephids_for_day(
    key: &DayKey,
    shuffle: bool,
    rng: &mut dyn SecureRng,
) -> Result<[EphId; NUM_EPOCHS_PER_DAY], CryptoError> {
    let stream_key = hmac_sha256(key.as_bytes(), BROADCAST_KEY);
    let keystream = broadcast_keystream(&stream_key, LENGTH_EPHID * NUM_EPOCHS_PER_DAY);

    let mut ephids = [EphId([0u8; LENGTH_EPHID]); NUM_EPOCHS_PER_DAY];
    for (i, chunk) in keystream.chunks_exact(LENGTH_EPHID).enumerate() {
        let mut id = [0u8; LENGTH_EPHID];
        id.copy_from_slice(chunk);
        ephids[i] = EphId(id);
    }

    if shuffle {
        secure_shuffle(rng, &mut ephids)?;
    }

    Ok(ephids)
}
