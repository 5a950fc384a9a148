#![forbid(unsafe_code)]

//! Canonical touch input types.
//!
//! A host platform translates its native responder callbacks into
//! [`TouchEvent`]s addressed to a single cell. Page coordinates are absolute
//! pixels relative to the root surface.

use crate::geometry::Point;

/// Phase of a touch interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    /// The cell was granted the touch (finger down).
    Start,
    /// A finger moved.
    Move,
    /// A finger was lifted.
    Release,
    /// The system took the gesture away (e.g. a parent scroll view claimed it).
    Terminate,
}

/// A single touch event delivered to a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Event phase.
    pub kind: TouchKind,
    /// Platform identifier of the finger that produced the event.
    pub identifier: u64,
    /// Absolute page position of that finger.
    pub page: Point,
}

impl TouchEvent {
    /// Create a touch event.
    #[must_use]
    pub const fn new(kind: TouchKind, identifier: u64, page: Point) -> Self {
        Self {
            kind,
            identifier,
            page,
        }
    }

    /// Finger down at `page`.
    #[must_use]
    pub const fn start(identifier: u64, page: Point) -> Self {
        Self::new(TouchKind::Start, identifier, page)
    }

    /// Finger moved to `page`.
    #[must_use]
    pub const fn moved(identifier: u64, page: Point) -> Self {
        Self::new(TouchKind::Move, identifier, page)
    }

    /// Finger lifted at `page`.
    #[must_use]
    pub const fn release(identifier: u64, page: Point) -> Self {
        Self::new(TouchKind::Release, identifier, page)
    }

    /// Gesture stolen by the system.
    #[must_use]
    pub const fn terminate() -> Self {
        Self::new(TouchKind::Terminate, 0, Point::ZERO)
    }
}
