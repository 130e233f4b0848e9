//! Low-cost tracer state machine: a day-key hash chain, a day of EphIDs
//! derived from it, and a receive-time-bucketed observation log.

use std::collections::{BTreeMap, VecDeque};

use super::{Tracer, TracerError};
use crate::batch::lowcost::LowCostBatch;
use crate::config::{NUM_EPOCHS_PER_DAY, RETENTION_PERIOD_DAYS, SECONDS_PER_DAY, SECONDS_PER_EPOCH};
use crate::crypto::rng::SecureRng;
use crate::ephid::lowcost::{generate_ephids_for_day, DayKey};
use crate::ephid::EphId;
use crate::error::Dp3tError;
use crate::time::{batch_start, day_start};

/// The low-cost design's per-user tracer state.
///
/// `observations` is keyed by *batch start*, not by raw receive time: the
/// replay check in [`Self::matches_with_key`] needs receive-time
/// granularity only until the batch covering it is processed, at which
/// point [`Self::housekeeping_after_batch`] coarsens the key down to a day.
pub struct LowCostTracer {
    current_day_key: DayKey,
    current_ephids: [EphId; NUM_EPOCHS_PER_DAY],
    past_keys: VecDeque<DayKey>,
    observations: BTreeMap<i64, Vec<EphId>>,
    start_of_today: i64,
}

impl LowCostTracer {
    /// Reconstruct one day's worth of EphIDs from `key`, without a
    /// shuffle — membership doesn't care about broadcast order, only
    /// which EphIDs exist, so paying for a shuffle here is wasted.
    fn ephids_for_key_unshuffled(
        key: &DayKey,
        rng: &mut dyn SecureRng,
    ) -> Result<[EphId; NUM_EPOCHS_PER_DAY], Dp3tError> {
        Ok(generate_ephids_for_day(key, false, rng)?)
    }

    /// Count observations matching the chain starting at `key` on
    /// `start_time_seconds`, ignoring anything at or after `release_time_seconds`.
    pub fn matches_with_key(
        &self,
        key: &DayKey,
        start_time_seconds: i64,
        release_time_seconds: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<u64, Dp3tError> {
        let mut ephids_per_day: BTreeMap<i64, [EphId; NUM_EPOCHS_PER_DAY]> = BTreeMap::new();
        let mut chain_key = key.clone();
        let mut d = day_start(start_time_seconds);
        while d <= release_time_seconds {
            ephids_per_day.insert(d, Self::ephids_for_key_unshuffled(&chain_key, rng)?);
            chain_key = chain_key.next();
            d += SECONDS_PER_DAY;
        }

        let mut count = 0u64;
        for (&t, observed) in &self.observations {
            if t >= release_time_seconds {
                continue;
            }
            let d = day_start(t);
            let Some(day_ephids) = ephids_per_day.get(&d) else {
                continue;
            };
            for candidate in day_ephids {
                if observed.contains(candidate) {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Coarsen every receive-time-bucketed observation older than
    /// `batch.release_time()` down to day granularity, merging and
    /// reshuffling. Must be called with batches in increasing
    /// `release_time` order (see the crate's ordering notes).
    pub fn housekeeping_after_batch(
        &mut self,
        batch: &LowCostBatch,
        rng: &mut dyn SecureRng,
    ) -> Result<(), Dp3tError> {
        let to_coarsen: Vec<i64> = self
            .observations
            .keys()
            .copied()
            .filter(|&t| t < batch.release_time() && t % SECONDS_PER_DAY != 0)
            .collect();

        for t in to_coarsen {
            let Some(mut bucket) = self.observations.remove(&t) else {
                continue;
            };
            let day = day_start(t);
            let merged = self.observations.entry(day).or_default();
            merged.append(&mut bucket);
            crate::crypto::secure_shuffle(rng, merged)?;
        }
        Ok(())
    }
}

impl Tracer for LowCostTracer {
    type TracingInfo = (i64, DayKey);
    type Batch = LowCostBatch;

    fn new(start_time: i64, rng: &mut dyn SecureRng) -> Result<Self, Dp3tError> {
        let current_day_key = DayKey::generate(rng)?;
        let current_ephids = generate_ephids_for_day(&current_day_key, true, rng)?;
        Ok(Self {
            current_day_key,
            current_ephids,
            past_keys: VecDeque::new(),
            observations: BTreeMap::new(),
            start_of_today: day_start(start_time),
        })
    }

    fn current_day_ephids(&self) -> &[EphId] {
        &self.current_ephids
    }

    fn get_ephid_for_time(&self, time: i64) -> Result<EphId, TracerError> {
        if day_start(time) != self.start_of_today {
            return Err(TracerError::UnavailableEphid);
        }
        let epoch_of_day = ((time - self.start_of_today) / SECONDS_PER_EPOCH) as usize;
        self.current_ephids
            .get(epoch_of_day)
            .copied()
            .ok_or(TracerError::UnavailableEphid)
    }

    fn add_observation(
        &mut self,
        ephid: EphId,
        time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<(), Dp3tError> {
        let bucket_start = batch_start(time);
        if bucket_start < self.start_of_today || bucket_start >= self.start_of_today + SECONDS_PER_DAY {
            return Err(TracerError::OutOfDayObservation.into());
        }
        let bucket = self.observations.entry(bucket_start).or_default();
        bucket.push(ephid);
        // Shuffle after every append to destroy receive order within the
        // bucket; a non-cryptographic reorder would leak it.
        crate::crypto::secure_shuffle(rng, bucket)?;
        Ok(())
    }

    fn next_day(&mut self, rng: &mut dyn SecureRng) -> Result<(), Dp3tError> {
        self.past_keys.push_front(self.current_day_key.clone());
        self.past_keys.truncate(RETENTION_PERIOD_DAYS as usize);

        self.current_day_key = self.current_day_key.next();
        self.current_ephids = generate_ephids_for_day(&self.current_day_key, true, rng)?;
        self.start_of_today += SECONDS_PER_DAY;

        let cutoff = self.start_of_today - RETENTION_PERIOD_DAYS * SECONDS_PER_DAY;
        let before = self.observations.len();
        self.observations.retain(|&t, _| t >= cutoff);
        log::debug!(
            "lowcost tracer rolled to day {}, dropped {} stale observation bucket(s)",
            self.start_of_today,
            before - self.observations.len()
        );
        Ok(())
    }

    fn get_tracing_information(
        &mut self,
        first: i64,
        _last: Option<i64>,
        rng: &mut dyn SecureRng,
    ) -> Result<Self::TracingInfo, Dp3tError> {
        let start_day = day_start(first);
        let days_back = (self.start_of_today - start_day) / SECONDS_PER_DAY;
        if days_back < 0 || days_back as usize > self.past_keys.len() {
            return Err(TracerError::UnavailableTracingKey.into());
        }
        let disclosed_key = if days_back == 0 {
            self.current_day_key.clone()
        } else {
            self.past_keys[(days_back - 1) as usize].clone()
        };

        // Forward privacy: once a key chain has been disclosed, every key
        // derivable from it is compromised, so the chain is broken here —
        // a fresh, unrelated key takes over for everything from now on.
        let new_key = DayKey::generate(rng)?;
        self.current_ephids = generate_ephids_for_day(&new_key, true, rng)?;
        self.current_day_key = new_key;
        self.past_keys.clear();

        log::info!("disclosed tracing key for day {start_day}, key chain reset for forward privacy");
        Ok((start_day, disclosed_key))
    }

    fn matches_with_batch(&self, batch: &Self::Batch) -> u64 {
        let mut rng = crate::crypto::OsCsprng;
        let mut total = 0u64;
        for (start, key) in batch.entries() {
            total += self
                .matches_with_key(key, *start, batch.release_time(), &mut rng)
                .unwrap_or(0);
        }
        log::trace!("batch released at {} matched {total} observation(s)", batch.release_time());
        total
    }
}
