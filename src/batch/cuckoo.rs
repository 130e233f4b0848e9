//! A from-scratch cuckoo filter over 32-byte hashed observations.
//!
//! The reference implementation depends on a third-party `cuckoo.filter`
//! Python package for the unlinkable design's published membership test.
//! That package is unvetted and has no portable wire format, so this module
//! builds the filter directly: an 8-bit fingerprint (the leading byte of
//! the hashed observation, which is already a uniform SHA-256 output) held
//! in one of two candidate buckets, in the standard partial-key cuckoo
//! construction.
//!
//! The achievable false-positive rate with a one-byte fingerprint and two
//! candidate buckets is about `2/256` per lookup — nowhere near the
//! reference's aspirational [`crate::config::CUCKOO_FPR`] of `2^-42`. No
//! portable, fixed-size bucketed filter reaches that target; it is kept
//! only as the capacity-sizing constant.

use super::BatchError;
use crate::crypto::rng::SecureRng;

const BUCKET_SIZE: usize = 4;
const MAX_KICKS: usize = 500;

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn fingerprint_of(item: &[u8; 32]) -> u8 {
    item[0]
}

/// A fixed-capacity cuckoo filter storing 8-bit fingerprints of 32-byte
/// hashed observations.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CuckooFilter {
    buckets: Vec<[Option<u8>; BUCKET_SIZE]>,
}

impl CuckooFilter {
    /// Build an empty filter sized to hold `item_count` items at the
    /// standard `1.2x` capacity multiplier.
    pub fn with_capacity(item_count: usize) -> Self {
        let target_buckets = (((item_count.max(1)) as f64) * 1.2 / BUCKET_SIZE as f64).ceil();
        let num_buckets = (target_buckets as usize).max(1).next_power_of_two();
        Self {
            buckets: vec![[None; BUCKET_SIZE]; num_buckets],
        }
    }

    fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn index1(&self, item: &[u8; 32]) -> usize {
        (fnv1a(item) as usize) % self.num_buckets()
    }

    /// The partner of `index` for a fingerprint: applying this again to the
    /// result recovers `index`, so a displaced fingerprint can be relocated
    /// to its other bucket without access to the original item.
    fn alternate(&self, index: usize, fingerprint: u8) -> usize {
        let n = self.num_buckets();
        index ^ ((fnv1a(&[fingerprint]) as usize) % n)
    }

    fn bucket_contains(&self, bucket: usize, fingerprint: u8) -> bool {
        self.buckets[bucket]
            .iter()
            .any(|slot| *slot == Some(fingerprint))
    }

    fn try_insert_into(&mut self, bucket: usize, fingerprint: u8) -> bool {
        for slot in self.buckets[bucket].iter_mut() {
            if slot.is_none() {
                *slot = Some(fingerprint);
                return true;
            }
        }
        false
    }

    /// Insert `item`'s fingerprint, relocating existing fingerprints as
    /// needed. Fails with [`BatchError::FilterFull`] if no placement is
    /// found within [`MAX_KICKS`] relocations.
    pub fn insert(&mut self, item: &[u8; 32], rng: &mut dyn SecureRng) -> Result<(), BatchError> {
        let fingerprint = fingerprint_of(item);
        let i1 = self.index1(item);
        if self.try_insert_into(i1, fingerprint) {
            return Ok(());
        }
        let i2 = self.alternate(i1, fingerprint);
        if self.try_insert_into(i2, fingerprint) {
            return Ok(());
        }

        // Both candidate buckets are now full (the two try_insert_into calls
        // above both failed), so every slot we evict from below is Some.
        let mut index = if pick_bit(rng)? { i1 } else { i2 };
        let mut fingerprint = fingerprint;
        for _ in 0..MAX_KICKS {
            let slot = pick_slot(rng)?;
            fingerprint = self.buckets[index][slot]
                .replace(fingerprint)
                .expect("bucket was full before eviction");
            index = self.alternate(index, fingerprint);
            if self.try_insert_into(index, fingerprint) {
                return Ok(());
            }
        }
        Err(BatchError::FilterFull)
    }

    /// Test whether `item`'s fingerprint is present in either of its
    /// candidate buckets. A `true` result can be a false positive; a
    /// `false` result is always correct (no false negatives).
    pub fn contains(&self, item: &[u8; 32]) -> bool {
        let fingerprint = fingerprint_of(item);
        let i1 = self.index1(item);
        let i2 = self.alternate(i1, fingerprint);
        self.bucket_contains(i1, fingerprint) || self.bucket_contains(i2, fingerprint)
    }
}

fn pick_bit(rng: &mut dyn SecureRng) -> Result<bool, BatchError> {
    let mut byte = [0u8; 1];
    rng.fill_bytes(&mut byte)
        .map_err(|_| BatchError::FilterFull)?;
    Ok(byte[0] & 1 == 1)
}

fn pick_slot(rng: &mut dyn SecureRng) -> Result<usize, BatchError> {
    let mut byte = [0u8; 1];
    rng.fill_bytes(&mut byte)
        .map_err(|_| BatchError::FilterFull)?;
    Ok((byte[0] as usize) % BUCKET_SIZE)
}
