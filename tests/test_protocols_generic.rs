//! Cross-protocol behavior shared by both DP-3T designs (spec.md §8,
//! properties 1–10), exercised once per design through a small harness
//! trait that knows how to turn a disclosure into that design's batch
//! shape. Mirrors the reference implementation's
//! `tests/test_protocols_generic.py`, which parameterizes the same
//! properties over both `ContactTracer` implementations.

mod support;

use dp3t_core::batch::lowcost::LowCostBatch;
use dp3t_core::batch::unlinkable::UnlinkableBatch;
use dp3t_core::config::SECONDS_PER_DAY;
use dp3t_core::crypto::rng::SecureRng;
use dp3t_core::ephid::unlinkable::hashed_observation;
use dp3t_core::time::day_start;
use dp3t_core::tracer::lowcost::LowCostTracer;
use dp3t_core::tracer::unlinkable::UnlinkableTracer;
use dp3t_core::{Dp3tError, Tracer};
use support::{init_logging, rng, START_TIME};

/// Turns a disclosure (`first..=last`) into the design's published batch
/// shape. `release_time` is a day-aligned timestamp at or after the
/// disclosing tracer's current day — batch-aligned by construction, since
/// `SECONDS_PER_DAY` is a multiple of `SECONDS_PER_BATCH`.
trait Harness: Tracer {
    fn disclose_as_batch(
        &mut self,
        first: i64,
        last: Option<i64>,
        release_time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<Self::Batch, Dp3tError>;
}

impl Harness for LowCostTracer {
    fn disclose_as_batch(
        &mut self,
        first: i64,
        last: Option<i64>,
        release_time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<Self::Batch, Dp3tError> {
        let (start, key) = self.get_tracing_information(first, last, rng)?;
        Ok(LowCostBatch::new(release_time, vec![(start, key)])
            .expect("day-aligned release_time is always batch-aligned"))
    }
}

impl Harness for UnlinkableTracer {
    fn disclose_as_batch(
        &mut self,
        first: i64,
        last: Option<i64>,
        _release_time: i64,
        rng: &mut dyn SecureRng,
    ) -> Result<Self::Batch, Dp3tError> {
        let (epochs, seeds) = self.get_tracing_information(first, last, rng)?;
        let items: Vec<[u8; 32]> = epochs
            .zip(seeds.iter())
            .map(|(epoch, seed)| hashed_observation(&seed.to_ephid(), epoch))
            .collect();
        Ok(UnlinkableBatch::build(None, &items, rng).expect("filter never runs out of kicks here"))
    }
}

fn ephid_length_is_always_sixteen<T: Tracer>() {
    init_logging();
    let mut rng = rng(1);
    let tracer = T::new(START_TIME, &mut rng).unwrap();
    for ephid in tracer.current_day_ephids() {
        assert_eq!(ephid.as_bytes().len(), 16);
    }
}

fn current_day_has_96_ephids<T: Tracer>() {
    init_logging();
    let mut rng = rng(2);
    let tracer = T::new(START_TIME, &mut rng).unwrap();
    assert_eq!(tracer.current_day_ephids().len(), 96);
}

fn cross_day_access_errors<T: Tracer>() {
    init_logging();
    let mut rng = rng(3);
    let tracer = T::new(START_TIME, &mut rng).unwrap();
    assert!(tracer.get_ephid_for_time(day_start(START_TIME) - 1).is_err());
    assert!(tracer
        .get_ephid_for_time(day_start(START_TIME) + SECONDS_PER_DAY)
        .is_err());
}

fn late_observation_errors<T: Tracer>() {
    init_logging();
    let mut rng = rng(4);
    let mut tracer = T::new(START_TIME, &mut rng).unwrap();
    let ephid = tracer.current_day_ephids()[0];
    let tomorrow = day_start(START_TIME) + SECONDS_PER_DAY + 10;
    assert!(tracer.add_observation(ephid, tomorrow, &mut rng).is_err());
}

fn self_match_single_interaction<T: Tracer + Harness>() {
    init_logging();
    let mut rng = rng(5);
    let mut infected = T::new(START_TIME, &mut rng).unwrap();
    let mut peer = T::new(START_TIME, &mut rng).unwrap();

    let interaction_time = START_TIME + 20 * 60;
    let ephid_infected = infected.get_ephid_for_time(interaction_time).unwrap();
    peer.add_observation(ephid_infected, interaction_time, &mut rng)
        .unwrap();

    for _ in 0..4 {
        infected.next_day(&mut rng).unwrap();
        peer.next_day(&mut rng).unwrap();
    }

    let release_time = day_start(START_TIME) + 4 * SECONDS_PER_DAY;
    let batch = infected
        .disclose_as_batch(START_TIME, None, release_time, &mut rng)
        .unwrap();

    assert_eq!(peer.matches_with_batch(&batch), 1);
}

fn self_match_multiple_interactions<T: Tracer + Harness>() {
    init_logging();
    let mut rng = rng(6);
    let mut infected = T::new(START_TIME, &mut rng).unwrap();
    let mut peer = T::new(START_TIME, &mut rng).unwrap();

    for minutes in [20i64, 100, 240] {
        let t = START_TIME + minutes * 60;
        let ephid = infected.get_ephid_for_time(t).unwrap();
        peer.add_observation(ephid, t, &mut rng).unwrap();
    }

    for _ in 0..4 {
        infected.next_day(&mut rng).unwrap();
        peer.next_day(&mut rng).unwrap();
    }

    let release_time = day_start(START_TIME) + 4 * SECONDS_PER_DAY;
    let batch = infected
        .disclose_as_batch(START_TIME, None, release_time, &mut rng)
        .unwrap();

    assert_eq!(peer.matches_with_batch(&batch), 3);
}

fn contact_before_contagious_window_does_not_match<T: Tracer + Harness>() {
    init_logging();
    let mut rng = rng(7);
    let mut infected = T::new(START_TIME, &mut rng).unwrap();
    let mut peer = T::new(START_TIME, &mut rng).unwrap();

    let interaction_time = START_TIME + 20 * 60;
    let ephid = infected.get_ephid_for_time(interaction_time).unwrap();
    peer.add_observation(ephid, interaction_time, &mut rng)
        .unwrap();

    for _ in 0..2 {
        infected.next_day(&mut rng).unwrap();
        peer.next_day(&mut rng).unwrap();
    }

    // Disclose only from day 1 onward — the interaction happened on day 0.
    let contagious_from = day_start(START_TIME) + SECONDS_PER_DAY;
    let release_time = day_start(START_TIME) + 2 * SECONDS_PER_DAY;
    let batch = infected
        .disclose_as_batch(contagious_from, None, release_time, &mut rng)
        .unwrap();

    assert_eq!(peer.matches_with_batch(&batch), 0);
}

fn replay_after_release_is_ignored<T: Tracer + Harness>() {
    init_logging();
    let mut rng = rng(8);
    let mut infected = T::new(START_TIME, &mut rng).unwrap();
    let mut peer = T::new(START_TIME, &mut rng).unwrap();

    let interaction_time = START_TIME + 20 * 60;
    let ephid = infected.get_ephid_for_time(interaction_time).unwrap();
    peer.add_observation(ephid, interaction_time, &mut rng)
        .unwrap();

    for _ in 0..4 {
        infected.next_day(&mut rng).unwrap();
        peer.next_day(&mut rng).unwrap();
    }

    let release_time = day_start(START_TIME) + 4 * SECONDS_PER_DAY;
    let batch = infected
        .disclose_as_batch(START_TIME, None, release_time, &mut rng)
        .unwrap();

    // Replay the same EphID today, after the batch's release time. A
    // real adversary could not have recorded it before release, so this
    // must not count as a second match.
    let replay_time = day_start(START_TIME) + 4 * SECONDS_PER_DAY + 60;
    peer.add_observation(ephid, replay_time, &mut rng).unwrap();

    assert_eq!(peer.matches_with_batch(&batch), 1);
}

fn outside_retention_contact_does_not_match<T: Tracer + Harness>() {
    use dp3t_core::config::RETENTION_PERIOD_DAYS;

    init_logging();
    let mut rng = rng(9);
    let mut infected = T::new(START_TIME, &mut rng).unwrap();
    let mut peer = T::new(START_TIME, &mut rng).unwrap();

    let interaction_time = START_TIME + 20 * 60;
    let ephid = infected.get_ephid_for_time(interaction_time).unwrap();
    peer.add_observation(ephid, interaction_time, &mut rng)
        .unwrap();

    // Capture the disclosure immediately, before either tracer's own
    // retention window has a chance to forget anything.
    let release_time = day_start(START_TIME) + SECONDS_PER_DAY;
    let batch = infected
        .disclose_as_batch(START_TIME, None, release_time, &mut rng)
        .unwrap();

    for _ in 0..(RETENTION_PERIOD_DAYS + 1) {
        peer.next_day(&mut rng).unwrap();
    }

    assert_eq!(peer.matches_with_batch(&batch), 0);
}

macro_rules! protocol_properties {
    ($module:ident, $Trc:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn ephid_length_is_always_sixteen() {
                super::ephid_length_is_always_sixteen::<$Trc>();
            }

            #[test]
            fn current_day_has_96_ephids() {
                super::current_day_has_96_ephids::<$Trc>();
            }

            #[test]
            fn cross_day_access_errors() {
                super::cross_day_access_errors::<$Trc>();
            }

            #[test]
            fn late_observation_errors() {
                super::late_observation_errors::<$Trc>();
            }

            #[test]
            fn self_match_single_interaction() {
                super::self_match_single_interaction::<$Trc>();
            }

            #[test]
            fn self_match_multiple_interactions() {
                super::self_match_multiple_interactions::<$Trc>();
            }

            #[test]
            fn contact_before_contagious_window_does_not_match() {
                super::contact_before_contagious_window_does_not_match::<$Trc>();
            }

            #[test]
            fn replay_after_release_is_ignored() {
                super::replay_after_release_is_ignored::<$Trc>();
            }

            #[test]
            fn outside_retention_contact_does_not_match() {
                super::outside_retention_contact_does_not_match::<$Trc>();
            }
        }
    };
}

protocol_properties!(lowcost, LowCostTracer);
protocol_properties!(unlinkable, UnlinkableTracer);
