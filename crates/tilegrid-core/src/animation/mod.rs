#![forbid(unsafe_code)]

//! Position animation: interpolation and frame pacing.
//!
//! - [`interpolate_positions`] is the pure interpolator. It produces the
//!   intermediate points between two positions, optionally overshooting the
//!   destination before settling on it.
//! - [`Translation`] turns those points into a sequential chain of frames,
//!   each due one frame interval after the previous one.
//! - [`AnimationSpeed`] picks the frame interval.
//!
//! # Invariants
//!
//! 1. The last interpolated point is always exactly the destination.
//! 2. A translation yields frames in order and never yields a frame before
//!    it is due.
//! 3. Non-finite input positions are rejected up front; no frames are
//!    produced for them.

mod interpolate;
mod translation;

use std::fmt;
use std::time::Duration;

pub use interpolate::{INTERPOLATE_STEPS, interpolate_axis, interpolate_positions};
pub use translation::{Frame, Translation};

use crate::geometry::Point;

/// How fast a translation steps through its frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationSpeed {
    /// 4 ms per frame.
    Fast,
    /// 8 ms per frame.
    #[default]
    Normal,
    /// 16 ms per frame.
    Slow,
    /// Spread the whole animation over roughly this total duration.
    Custom(Duration),
}

impl AnimationSpeed {
    /// Delay between consecutive frames.
    pub fn frame_interval(self) -> Result<Duration, AnimationError> {
        match self {
            Self::Fast => Ok(Duration::from_millis(4)),
            Self::Normal => Ok(Duration::from_millis(8)),
            Self::Slow => Ok(Duration::from_millis(16)),
            Self::Custom(total) if total.is_zero() => Err(AnimationError::InvalidSpeed(total)),
            Self::Custom(total) => Ok(total / INTERPOLATE_STEPS),
        }
    }
}

/// Validation faults that abort a single animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationError {
    /// A start or end coordinate was NaN or infinite.
    InvalidPosition(Point),
    /// A custom speed with zero total duration.
    InvalidSpeed(Duration),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition(p) => {
                write!(f, "invalid animation position ({}, {})", p.x, p.y)
            }
            Self::InvalidSpeed(d) => write!(f, "invalid animation duration {d:?}"),
        }
    }
}

impl std::error::Error for AnimationError {}
