//! Global protocol constants shared by both DP-3T designs.
//!
//! Mirrors the reference implementation's `dp3t/config.py`: one place that
//! holds the numbers every other module imports, rather than scattering
//! magic constants through the tracer and batch code.

/// Length of an epoch, in minutes.
pub const EPOCH_LENGTH_MINUTES: i64 = 15;

/// Number of epochs in a day (`1440 / EPOCH_LENGTH_MINUTES`).
pub const NUM_EPOCHS_PER_DAY: usize = (24 * 60 / EPOCH_LENGTH_MINUTES) as usize;

/// Length of an EphID, in bytes.
pub const LENGTH_EPHID: usize = 16;

/// Seconds in a day.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Length of a low-cost batch, in seconds (2 hours).
pub const SECONDS_PER_BATCH: i64 = 2 * 60 * 60;

/// How many days keys, seeds, EphIDs and observations are retained.
///
/// The reference implementation's standalone `LowCostDP3T.py` demo uses 14
/// days; the `dp3t` library itself uses 21. This crate follows the library.
pub const RETENTION_PERIOD_DAYS: i64 = 21;

/// Domain-separation string mixed into the low-cost broadcast-key HMAC.
pub const BROADCAST_KEY: &[u8] = b"broadcast key";

/// Target false-positive rate for the unlinkable design's membership
/// filter, used to size filter capacity. See [`crate::batch::cuckoo`] for
/// why the filter's *achieved* FPR does not reach this figure.
pub const CUCKOO_FPR: f64 = 1.0 / ((1u64 << 42) as f64);

/// Seconds in an epoch (`EPOCH_LENGTH_MINUTES * 60`).
pub const SECONDS_PER_EPOCH: i64 = EPOCH_LENGTH_MINUTES * 60;
