//! Time helpers.
//!
//! The core never reads the system clock: every public operation in this
//! crate takes an explicit Unix-seconds timestamp from the caller. These
//! free functions just bucket a timestamp into the granularities the two
//! designs care about.

use crate::config::{SECONDS_PER_BATCH, SECONDS_PER_DAY, SECONDS_PER_EPOCH};

/// Start of the UTC day containing `unix_seconds`, in Unix seconds.
pub fn day_start(unix_seconds: i64) -> i64 {
    unix_seconds.div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY
}

/// Start of the 2-hour batch containing `unix_seconds`, in Unix seconds.
///
/// Low-cost design only; the unlinkable design has no batch granularity.
pub fn batch_start(unix_seconds: i64) -> i64 {
    unix_seconds.div_euclid(SECONDS_PER_BATCH) * SECONDS_PER_BATCH
}

/// Absolute epoch number of `unix_seconds`, counted from the Unix epoch.
///
/// Unlinkable design only; the low-cost design numbers epochs within a day
/// instead (see [`crate::tracer::lowcost`]).
pub fn epoch_from_time(unix_seconds: i64) -> u32 {
    (unix_seconds.div_euclid(SECONDS_PER_EPOCH)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2020-04-10T07:15:00Z and 2020-04-15T14:32:00Z, computed independently
    // of any date library (see SPEC_FULL.md §2 item 8 on avoiding chrono for
    // a pure-integer time model).
    const TIME0: i64 = 1_586_502_900;
    const TIME1: i64 = 1_586_961_120;

    #[test]
    fn epoch_vectors() {
        assert_eq!(epoch_from_time(TIME0), 1_762_781);
        assert_eq!(epoch_from_time(TIME1), 1_763_290);
    }

    #[test]
    fn day_start_is_idempotent_within_a_day() {
        let start = day_start(TIME0);
        assert_eq!(day_start(start), start);
        assert_eq!(day_start(start + SECONDS_PER_DAY - 1), start);
        assert_eq!(day_start(start + SECONDS_PER_DAY), start + SECONDS_PER_DAY);
    }

    #[test]
    fn batch_start_is_aligned() {
        let start = batch_start(TIME0);
        assert_eq!(start % SECONDS_PER_BATCH, 0);
        assert!(start <= TIME0 && TIME0 < start + SECONDS_PER_BATCH);
    }
}
