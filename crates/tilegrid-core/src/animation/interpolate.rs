#![forbid(unsafe_code)]

//! Pure position interpolator.
//!
//! The path is split into [`INTERPOLATE_STEPS`] equal gaps. The first nine
//! points advance linearly, then the motion decelerates (`dest - 0.6 gap`),
//! optionally passes the destination (`dest + 0.2 gap`), and finally lands on
//! `dest`. The origin itself is not part of the output.

use super::AnimationError;
use crate::geometry::Point;

/// Number of equal gaps the path is divided into.
pub const INTERPOLATE_STEPS: u32 = 10;

/// Deceleration point, as a fraction of one gap short of the destination.
const SETTLE_FRACTION: f64 = 0.6;

/// Overshoot distance, as a fraction of one gap past the destination.
const OVERSHOOT_FRACTION: f64 = 0.2;

/// Interpolate a single axis. Returns `None` for non-finite input.
#[must_use]
pub fn interpolate_axis(orig: f64, dest: f64, overshoot: bool) -> Option<Vec<f64>> {
    if !orig.is_finite() || !dest.is_finite() {
        return None;
    }
    let gap = (dest - orig) / f64::from(INTERPOLATE_STEPS);
    let mut out = Vec::with_capacity(INTERPOLATE_STEPS as usize + 2);
    for i in 1..INTERPOLATE_STEPS {
        out.push(orig + gap * f64::from(i));
    }
    out.push(dest - gap * SETTLE_FRACTION);
    if overshoot {
        out.push(dest + gap * OVERSHOOT_FRACTION);
    }
    out.push(dest);
    Some(out)
}

/// Interpolate between two positions.
///
/// Yields 11 points, or 12 with `overshoot`. The last point equals `dest`.
pub fn interpolate_positions(
    orig: Point,
    dest: Point,
    overshoot: bool,
) -> Result<Vec<Point>, AnimationError> {
    if !orig.is_finite() {
        return Err(AnimationError::InvalidPosition(orig));
    }
    let xs = interpolate_axis(orig.x, dest.x, overshoot)
        .ok_or(AnimationError::InvalidPosition(dest))?;
    let ys = interpolate_axis(orig.y, dest.y, overshoot)
        .ok_or(AnimationError::InvalidPosition(dest))?;
    Ok(xs.into_iter().zip(ys).map(|(x, y)| Point::new(x, y)).collect())
}
