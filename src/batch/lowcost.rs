//! Low-cost design's published batch: one infected user's day-keys, tagged
//! with the batch release time that bounds which receive-times can match.

use super::BatchError;
use crate::config::SECONDS_PER_BATCH;
use crate::ephid::lowcost::DayKey;

/// One infected user's disclosed day-keys, as published by the backend.
///
/// `entries` pairs each key with the Unix-seconds start of the day it is
/// valid for — the same shape
/// [`crate::tracer::lowcost::LowCostTracer::get_tracing_information`]
/// returns.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LowCostBatch {
    release_time: i64,
    entries: Vec<(i64, DayKey)>,
}

impl LowCostBatch {
    /// Build a batch. Fails if `release_time` is not a multiple of
    /// `SECONDS_PER_BATCH` — the receive-time replay check at match time
    /// depends on every batch's release time landing on a batch boundary.
    pub fn new(release_time: i64, entries: Vec<(i64, DayKey)>) -> Result<Self, BatchError> {
        if release_time % SECONDS_PER_BATCH != 0 {
            return Err(BatchError::NotBatchAligned);
        }
        Ok(Self {
            release_time,
            entries,
        })
    }

    pub fn release_time(&self) -> i64 {
        self.release_time
    }

    pub fn entries(&self) -> &[(i64, DayKey)] {
        &self.entries
    }
}
