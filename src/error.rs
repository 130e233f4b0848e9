//! Top-level error type.
//!
//! Each subsystem (`crypto`, `tracer`, `batch`) defines its own focused
//! error enum rather than funneling everything through one giant enum.
//! [`Dp3tError`] exists only for call sites — `new`, `next_day`,
//! `get_tracing_information` with key reset — that can fail for reasons
//! spanning more than one subsystem (a validation error or a CSPRNG
//! failure), so callers who don't care which subsystem failed can match
//! one type.

use crate::batch::BatchError;
use crate::crypto::CryptoError;
use crate::tracer::TracerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Dp3tError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Tracer(#[from] TracerError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}
