//! Unlinkable tracer state machine: one independent seed per epoch, hashed
//! observations, and a retention window keyed by epoch number rather than
//! by receive-time bucket.

use std::collections::BTreeMap;

use super::{Tracer, TracerError};
use crate::batch::unlinkable::UnlinkableBatch;
use crate::config::{NUM_EPOCHS_PER_DAY, RETENTION_PERIOD_DAYS, SECONDS_PER_DAY};
use crate::crypto::rng::SecureRng;
use crate::ephid::unlinkable::{hashed_observation, Seed};
use crate::ephid::EphId;
use crate::error::Dp3tError;
use crate::time::{day_start, epoch_from_time};

/// The unlinkable design's per-user tracer state.
///
/// Unlike [`crate::tracer::lowcost::LowCostTracer`], there is no key chain:
/// every epoch's seed is drawn independently, so retention and export both
/// work epoch-by-epoch rather than day-by-day-plus-chain-walk.
pub struct UnlinkableTracer {
    seeds_per_epoch: BTreeMap<u32, Seed>,
    ephids_per_epoch: BTreeMap<u32, EphId>,
    /// Today's EphIDs, cached contiguously (epoch order) so
    /// `current_day_ephids` can hand back a slice without reshaping
    /// `ephids_per_epoch`, which also holds retained past-day epochs.
    today_ephids: Vec<EphId>,
    observations_per_day: BTreeMap<i64, Vec<[u8; 32]>>,
    start_of_today: i64,
}

impl UnlinkableTracer {
    /// Draw fresh seeds/EphIDs for every epoch of the day starting at
    /// `day_start_time`, and refresh the `today_ephids` cache to match.
    fn populate_day(
        &mut self,
        day_start_time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<(), Dp3tError> {
        let first_epoch = epoch_from_time(day_start_time);
        self.today_ephids.clear();
        for offset in 0..NUM_EPOCHS_PER_DAY as u32 {
            let epoch = first_epoch + offset;
            let seed = Seed::generate(rng)?;
            let ephid = seed.to_ephid();
            self.seeds_per_epoch.insert(epoch, seed);
            self.ephids_per_epoch.insert(epoch, ephid);
            self.today_ephids.push(ephid);
        }
        Ok(())
    }
}

impl Tracer for UnlinkableTracer {
    /// `(first_epoch..=last_epoch, seeds)`, one seed per epoch in range.
    type TracingInfo = (std::ops::RangeInclusive<u32>, Vec<Seed>);
    type Batch = UnlinkableBatch;

    fn new(start_time: i64, rng: &mut dyn SecureRng) -> Result<Self, Dp3tError> {
        let start_of_today = day_start(start_time);
        let mut tracer = Self {
            seeds_per_epoch: BTreeMap::new(),
            ephids_per_epoch: BTreeMap::new(),
            today_ephids: Vec::with_capacity(NUM_EPOCHS_PER_DAY),
            observations_per_day: BTreeMap::new(),
            start_of_today,
        };
        tracer.populate_day(start_of_today, rng)?;
        Ok(tracer)
    }

    fn current_day_ephids(&self) -> &[EphId] {
        &self.today_ephids
    }

    fn get_ephid_for_time(&self, time: i64) -> Result<EphId, TracerError> {
        let epoch = epoch_from_time(time);
        self.ephids_per_epoch
            .get(&epoch)
            .copied()
            .ok_or(TracerError::UnavailableEphid)
    }

    fn add_observation(
        &mut self,
        ephid: EphId,
        time: i64,
        _rng: &mut dyn SecureRng,
    ) -> Result<(), Dp3tError> {
        if day_start(time) != self.start_of_today {
            return Err(TracerError::OutOfDayObservation.into());
        }
        let epoch = epoch_from_time(time);
        let hashed = hashed_observation(&ephid, epoch);
        self.observations_per_day
            .entry(self.start_of_today)
            .or_default()
            .push(hashed);
        Ok(())
    }

    fn next_day(&mut self, rng: &mut dyn SecureRng) -> Result<(), Dp3tError> {
        self.start_of_today += SECONDS_PER_DAY;
        self.populate_day(self.start_of_today, rng)?;

        let day_cutoff = self.start_of_today - RETENTION_PERIOD_DAYS * SECONDS_PER_DAY;
        self.observations_per_day.retain(|&day, _| day >= day_cutoff);

        // `epoch_from_time` casts to u32; guard against a pre-epoch cutoff
        // (possible for the first RETENTION_PERIOD_DAYS of any tracer's
        // life) wrapping around to a huge epoch number that would evict
        // everything.
        let epoch_cutoff = if day_cutoff <= 0 {
            0
        } else {
            epoch_from_time(day_cutoff)
        };
        self.seeds_per_epoch.retain(|&epoch, _| epoch >= epoch_cutoff);
        self.ephids_per_epoch.retain(|&epoch, _| epoch >= epoch_cutoff);
        log::debug!(
            "unlinkable tracer rolled to day {}, {} seed(s) retained",
            self.start_of_today,
            self.seeds_per_epoch.len()
        );
        Ok(())
    }

    fn get_tracing_information(
        &mut self,
        first: i64,
        last: Option<i64>,
        _rng: &mut dyn SecureRng,
    ) -> Result<Self::TracingInfo, Dp3tError> {
        // `None` means "through today" — the end of today, not its start,
        // so an export with no explicit upper bound still covers every
        // epoch generated for the current day.
        let last = last.unwrap_or(self.start_of_today + SECONDS_PER_DAY - 1);
        if last < first {
            return Err(TracerError::InvalidRange.into());
        }

        let first_epoch = epoch_from_time(first);
        let last_epoch = epoch_from_time(last);

        let mut seeds = Vec::with_capacity((last_epoch - first_epoch + 1) as usize);
        for epoch in first_epoch..=last_epoch {
            let seed = self
                .seeds_per_epoch
                .get(&epoch)
                .ok_or(TracerError::UnavailableTracingKey)?;
            seeds.push(seed.clone());
        }

        log::info!("disclosed tracing seeds for epochs {first_epoch}..={last_epoch}");
        Ok((first_epoch..=last_epoch, seeds))
    }

    fn matches_with_batch(&self, batch: &Self::Batch) -> u64 {
        let mut count = 0u64;
        for observations in self.observations_per_day.values() {
            for observed in observations {
                if batch.contains(observed) {
                    count += 1;
                }
            }
        }
        log::trace!("filter membership test matched {count} observation(s)");
        count
    }
}
