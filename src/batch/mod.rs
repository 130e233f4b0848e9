//! Published batches and the cuckoo filter backing the unlinkable design's
//! membership test.

pub mod cuckoo;
pub mod lowcost;
pub mod unlinkable;

use thiserror::Error;

/// Errors from constructing a published batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Low-cost only: `release_time` is not a multiple of `SECONDS_PER_BATCH`.
    #[error("release_time must be batch-aligned")]
    NotBatchAligned,

    /// Unlinkable only: the cuckoo filter ran out of relocation kicks while
    /// inserting. Should not happen when the filter is sized with the
    /// standard 1.2x capacity multiplier; indicates the caller under-sized
    /// the filter for the number of items it is inserting.
    #[error("cuckoo filter exceeded its relocation-kick budget during insert")]
    FilterFull,
}
