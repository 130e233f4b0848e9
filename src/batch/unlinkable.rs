//! Unlinkable design's published batch: a membership filter over hashed
//! observations, with no per-item key disclosure.

use super::cuckoo::CuckooFilter;
use super::BatchError;
use crate::crypto::rng::SecureRng;

/// A published membership filter over infected users' hashed observations.
///
/// Unlike [`super::lowcost::LowCostBatch`], nothing here identifies which
/// EphID or epoch produced a given entry — membership is all a recipient
/// can test for. `release_time` is optional because the unlinkable design's
/// replay protection is intrinsic to the hash (see
/// [`crate::ephid::unlinkable::hashed_observation`]) and does not need a
/// receive-time cutoff to be sound.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UnlinkableBatch {
    release_time: Option<i64>,
    filter: CuckooFilter,
}

impl UnlinkableBatch {
    /// Build a batch by inserting every hashed observation in `items` into a
    /// filter sized for `items.len()` at the standard capacity multiplier.
    ///
    /// [`crate::config::CUCKOO_FPR`] names the reference's aspirational
    /// target; see [`super::cuckoo`] for what this filter actually achieves.
    pub fn build(
        release_time: Option<i64>,
        items: &[[u8; 32]],
        rng: &mut dyn SecureRng,
    ) -> Result<Self, BatchError> {
        let mut filter = CuckooFilter::with_capacity(items.len());
        for item in items {
            filter.insert(item, rng)?;
        }
        Ok(Self {
            release_time,
            filter,
        })
    }

    pub fn release_time(&self) -> Option<i64> {
        self.release_time
    }

    pub fn contains(&self, item: &[u8; 32]) -> bool {
        self.filter.contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DeterministicRng;

    #[test]
    fn build_and_match_round_trip() {
        let mut rng = DeterministicRng::from_seed(9);
        let items: Vec<[u8; 32]> = (0..10u8)
            .map(|tag| {
                let mut item = [0u8; 32];
                item[0] = tag;
                item
            })
            .collect();
        let batch = UnlinkableBatch::build(Some(1_000), &items, &mut rng).unwrap();
        for item in &items {
            assert!(batch.contains(item));
        }
        assert_eq!(batch.release_time(), Some(1_000));
    }

    #[test]
    fn release_time_is_optional() {
        let mut rng = DeterministicRng::from_seed(10);
        let batch = UnlinkableBatch::build(None, &[], &mut rng).unwrap();
        assert_eq!(batch.release_time(), None);
    }
}
