//! The shared tracer contract both designs implement.
//!
//! Expressed as a trait parameterized by associated `TracingInfo` and
//! `Batch` types rather than a shared enum, because the two designs'
//! tracing-information shapes and batch formats are genuinely different
//! data (a day-key vs. a list of seeds; a batch-aligned key list vs. a
//! membership filter) and forcing them into one type would mean every
//! caller matches on a variant that can never apply to the other design.

pub mod lowcost;
pub mod unlinkable;

use crate::crypto::rng::SecureRng;
use crate::ephid::EphId;
use crate::error::Dp3tError;
use thiserror::Error;

/// Errors from tracer operations (observation recording, EphID lookup,
/// tracing-information export).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TracerError {
    /// Requested time is not within the tracer's current day (or, for the
    /// unlinkable design, not within a stored epoch).
    #[error("EphID not available for the requested time — did you call next_day()?")]
    UnavailableEphid,

    /// Observation time does not fall within the current day's window.
    #[error("observation time does not correspond to the current day")]
    OutOfDayObservation,

    /// Requested tracing range crosses outside the stored keys/seeds.
    #[error("requested tracing key/seed is not available")]
    UnavailableTracingKey,

    /// Unlinkable design only: `last_contagious_time < first_contagious_time`.
    #[error("last_contagious_time must not be before first_contagious_time")]
    InvalidRange,
}

/// The common surface of both DP-3T tracer designs.
///
/// `new`/`next_day`/`get_tracing_information` take `rng: &mut dyn
/// SecureRng` explicitly rather than reading a hidden global generator —
/// the same injected-capability convention
/// [`crate::crypto::primitives`] uses for entropy-consuming functions.
pub trait Tracer: Sized {
    /// Design-specific shape of what an infected user publishes.
    type TracingInfo;
    /// Design-specific published batch shape.
    type Batch;

    /// Start a fresh tracer anchored at `start_time` (Unix seconds). The
    /// core never reads the system clock, so there is no defaulted "now" —
    /// every caller supplies it.
    fn new(start_time: i64, rng: &mut dyn SecureRng) -> Result<Self, Dp3tError>;

    /// Today's EphIDs, in broadcast order.
    fn current_day_ephids(&self) -> &[EphId];

    /// The EphID valid at `time`. Errors if `time` falls outside the
    /// tracer's current day (low-cost) or has no stored epoch (unlinkable).
    fn get_ephid_for_time(&self, time: i64) -> Result<EphId, TracerError>;

    /// Record having observed `ephid` at `time`. Errors if `time` does not
    /// correspond to the current day. Can also fail with a crypto error —
    /// see the note on `rng` below — which is why this returns the
    /// crate-level [`Dp3tError`] rather than [`TracerError`] alone.
    ///
    /// Takes `rng` because the low-cost design reshuffles the receive-time
    /// bucket after every append, to destroy receive order within it (see
    /// [`crate::tracer::lowcost::LowCostTracer`]). The unlinkable design
    /// ignores it — a hashed observation already carries no order to leak.
    fn add_observation(
        &mut self,
        ephid: EphId,
        time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<(), Dp3tError>;

    /// Roll the tracer's clock forward by one day.
    fn next_day(&mut self, rng: &mut dyn SecureRng) -> Result<(), Dp3tError>;

    /// Export what an infected user discloses, covering `first` through
    /// `last` (inclusive; `None` means "through today").
    fn get_tracing_information(
        &mut self,
        first: i64,
        last: Option<i64>,
        rng: &mut dyn SecureRng,
    ) -> Result<Self::TracingInfo, Dp3tError>;

    /// Count how many stored observations match entries in `batch`.
    fn matches_with_batch(&self, batch: &Self::Batch) -> u64;
}
