//! Shared fixtures for the cross-protocol integration tests.

use std::sync::Once;

use dp3t_core::crypto::DeterministicRng;

static LOGGER: Once = Once::new();

/// Initialize `env_logger` once per test binary, so `RUST_LOG=debug cargo
/// test -- --nocapture` surfaces the crate's `log::debug!`/`log::trace!`
/// rollover and match-count output.
pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// 2020-04-25T15:17:00Z, in Unix seconds — the reference test suite's
/// fixed start time.
pub const START_TIME: i64 = 1_587_827_820;

/// A fresh deterministic RNG seeded from a test-local counter, so each
/// caller gets independent-looking randomness without touching the OS
/// CSPRNG.
pub fn rng(seed: u64) -> DeterministicRng {
    DeterministicRng::from_seed(seed)
}
