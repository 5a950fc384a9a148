#![forbid(unsafe_code)]

//! A sequential chain of deferred position updates.

use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

use super::{AnimationError, AnimationSpeed, interpolate_positions};
use crate::geometry::Point;

/// A position released by a [`Translation`], stamped with its due time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub due: Instant,
    pub position: Point,
}

/// One in-flight translation from `from` to `to`.
///
/// Frame `k` (1-based) is due at `started + k * interval`. Late polling
/// releases every overdue frame at once, still in order.
#[derive(Debug, Clone)]
pub struct Translation {
    frames: VecDeque<Point>,
    interval: Duration,
    next_due: Instant,
    destination: Point,
}

impl Translation {
    /// Build a translation starting at `now`.
    pub fn new(
        from: Point,
        to: Point,
        overshoot: bool,
        speed: AnimationSpeed,
        now: Instant,
    ) -> Result<Self, AnimationError> {
        let interval = speed.frame_interval()?;
        let frames: VecDeque<Point> = interpolate_positions(from, to, overshoot)?.into();
        Ok(Self {
            frames,
            interval,
            next_due: now + interval,
            destination: to,
        })
    }

    /// Final resting position.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Frames not yet released.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Whether every frame has been released.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.frames.is_empty()
    }

    /// When the next frame becomes due, if any remain.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        (!self.frames.is_empty()).then_some(self.next_due)
    }

    /// Release every frame due at `now`, in order.
    pub fn due_frames(&mut self, now: Instant) -> Vec<Frame> {
        let mut out = Vec::new();
        while now >= self.next_due {
            let Some(position) = self.frames.pop_front() else {
                break;
            };
            out.push(Frame {
                due: self.next_due,
                position,
            });
            self.next_due += self.interval;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_8: Duration = Duration::from_millis(8);

    #[test]
    fn frames_release_one_interval_apart() {
        let t0 = Instant::now();
        let mut tr = Translation::new(
            Point::ZERO,
            Point::new(100.0, 0.0),
            false,
            AnimationSpeed::Normal,
            t0,
        )
        .unwrap();
        assert_eq!(tr.remaining(), 11);
        assert!(tr.due_frames(t0).is_empty());
        assert!(tr.due_frames(t0 + Duration::from_millis(7)).is_empty());
        assert_eq!(
            tr.due_frames(t0 + MS_8),
            vec![Frame {
                due: t0 + MS_8,
                position: Point::new(10.0, 0.0)
            }]
        );
        assert_eq!(tr.next_due(), Some(t0 + MS_8 * 2));
    }

    #[test]
    fn late_poll_releases_backlog_in_order() {
        let t0 = Instant::now();
        let mut tr =
            Translation::new(Point::ZERO, Point::new(0.0, 50.0), true, AnimationSpeed::Fast, t0)
                .unwrap();
        let frames = tr.due_frames(t0 + Duration::from_secs(1));
        assert_eq!(frames.len(), 12);
        assert!(frames.windows(2).all(|w| w[0].due < w[1].due));
        assert!(
            frames
                .windows(2)
                .take(9)
                .all(|w| w[0].position.y < w[1].position.y)
        );
        assert_eq!(frames.last().unwrap().position, Point::new(0.0, 50.0));
        assert!(tr.is_complete());
        assert_eq!(tr.next_due(), None);
    }

    #[test]
    fn invalid_input_never_builds() {
        let t0 = Instant::now();
        assert!(
            Translation::new(
                Point::new(f64::NAN, 0.0),
                Point::ZERO,
                false,
                AnimationSpeed::Normal,
                t0
            )
            .is_err()
        );
        assert!(
            Translation::new(
                Point::ZERO,
                Point::ZERO,
                false,
                AnimationSpeed::Custom(Duration::ZERO),
                t0
            )
            .is_err()
        );
    }
}
