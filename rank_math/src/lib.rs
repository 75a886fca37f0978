//! # Rank Math
//!
//! Pure calculations behind search traffic forecasting.
//! This crate provides the click-through-rate curve model and the
//! ranking position projector. Nothing here performs I/O or keeps state
//! between calls.

use thiserror::Error;

pub mod ctr_curve;
pub mod projection;

pub use crate::ctr_curve::{BucketSource, CtrCurve, CurveSettings, PositionObservation};
pub use crate::projection::{Dampening, PositionProjector, Realization};

/// Errors that can occur in ranking calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Result type for ranking math operations
pub type Result<T> = std::result::Result<T, MathError>;
