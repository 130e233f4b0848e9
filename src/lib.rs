//! Cryptographic and bookkeeping core of the DP-3T proximity-tracing
//! protocol suite.
//!
//! Two reference designs share the [`tracer::Tracer`] contract:
//!
//! - [`ephid::lowcost`] / [`tracer::lowcost`] — a deterministic day-key
//!   hash chain expands into a day of EphIDs via an HMAC-seeded AES-CTR
//!   keystream.
//! - [`ephid::unlinkable`] / [`tracer::unlinkable`] — independent
//!   per-epoch random seeds, matched server-side through a probabilistic
//!   membership filter ([`batch::cuckoo`]) over hashed (EphID, epoch)
//!   pairs.
//!
//! Bluetooth radio handling, proximity metrics, backend transport and
//! persistence are all out of scope — this crate is the math and the
//! bookkeeping state machine, nothing else. No function here reads the
//! system clock; every time-sensitive operation takes an explicit Unix
//! timestamp, and every entropy-consuming operation takes an explicit
//! [`crypto::rng::SecureRng`].

pub mod batch;
pub mod config;
pub mod crypto;
pub mod ephid;
pub mod error;
pub mod time;
pub mod tracer;

pub use error::Dp3tError;
pub use tracer::Tracer;
