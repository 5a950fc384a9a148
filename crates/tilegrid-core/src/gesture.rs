#![forbid(unsafe_code)]

//! Hold-to-drag gesture recognition for a single grid cell.
//!
//! [`HoldDragRecognizer`] is a stateful processor that converts raw
//! [`TouchEvent`] sequences delivered to one cell into [`CellGesture`]s, plus
//! the [`LiveStyle`] updates the cell should show while the gesture runs.
//!
//! # State Machine
//!
//! ```text
//! Idle --start--> Pending --hold timer, still pressed--> Dragging --release--> Idle
//!                    |
//!                    +--release--> AwaitingTap --hold timer--> (Tap) Idle
//! any --terminate--> Idle
//! ```
//!
//! The hold timer is the only tap/drag discriminator: there is no movement
//! threshold. A press released before the delay becomes a `Tap` when the
//! timer fires; a press still held when it fires becomes a drag.
//!
//! # Invariants
//!
//! 1. Every drag is well-formed: `DragStart` → zero or more `Dragging` →
//!    exactly one of `DragEnd` or `DragTerminated`.
//! 2. `Tap` and `DragStart` never both emit for the same press.
//! 3. Once a [`TouchSelection`] is latched it does not change until the
//!    gesture ends; moves from other fingers are ignored.
//! 4. After `reset()` the recognizer is idle and emits nothing until the next
//!    start.
//!
//! # Failure Modes
//!
//! - Release by a finger other than the latched one (or before any move was
//!   latched) does not count as a drag end: the emphasis is cleared and
//!   `DragTerminated` closes the drag.
//! - A start while a previous press still awaits its tap timer is ignored.

use std::time::Duration;

use web_time::Instant;

use crate::event::{TouchEvent, TouchKind};
use crate::geometry::Point;
use crate::style::LiveStyle;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing and emphasis parameters for hold-to-drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldConfig {
    /// How long a press must be held before it becomes a drag (default: 200ms).
    pub hold_delay: Duration,
    /// Scale applied while dragging (default: 1.1).
    pub active_scale: f64,
    /// Opacity applied while dragging (default: 0.8).
    pub active_opacity: f64,
    /// Resting stacking order; a dragged cell is raised one above it.
    pub base_z_index: i32,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            hold_delay: Duration::from_millis(200),
            active_scale: 1.1,
            active_opacity: 0.8,
            base_z_index: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Semantic gesture emitted by a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellGesture {
    /// Press released before the hold delay.
    Tap,
    /// Press held past the hold delay; the cell is now draggable.
    DragStart,
    /// Latched finger moved; offset relative to its first tracked position.
    Dragging { dx: f64, dy: f64 },
    /// Latched finger released after the hold delay.
    DragEnd,
    /// The drag (or pending press) ended without a valid release.
    DragTerminated,
}

/// One effect produced while processing input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutput {
    /// Apply this style to the cell right away.
    Style(LiveStyle),
    /// Report this gesture to the owner of the cell.
    Gesture(CellGesture),
}

/// The single touch point a dragging cell follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSelection {
    /// Finger identifier.
    pub identifier: u64,
    /// Page position of the first move after the drag began.
    pub origin: Point,
}

/// Observable phase of a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Pending,
    AwaitingTap,
    Dragging,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Pending {
        started: Instant,
    },
    AwaitingTap {
        started: Instant,
    },
    Dragging {
        started: Instant,
        selection: Option<TouchSelection>,
    },
}

// ---------------------------------------------------------------------------
// HoldDragRecognizer
// ---------------------------------------------------------------------------

/// Per-cell tap / hold-to-drag recognizer.
///
/// Call [`process`](HoldDragRecognizer::process) for each touch event and
/// [`poll`](HoldDragRecognizer::poll) on every frame so the hold timer can
/// fire without input.
#[derive(Debug, Clone)]
pub struct HoldDragRecognizer {
    config: HoldConfig,
    phase: Phase,
}

impl HoldDragRecognizer {
    /// Create an idle recognizer.
    #[must_use]
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Process one touch event.
    ///
    /// A hold timer that is already due fires before the event is handled.
    pub fn process(&mut self, event: &TouchEvent, now: Instant) -> Vec<GestureOutput> {
        let mut out = Vec::with_capacity(2);
        self.fire_timer(now, &mut out);

        match event.kind {
            TouchKind::Start => self.on_start(now),
            TouchKind::Move => self.on_move(event, &mut out),
            TouchKind::Release => self.on_release(event, now, &mut out),
            TouchKind::Terminate => self.on_terminate(&mut out),
        }

        out
    }

    /// Fire the hold timer if it is due.
    pub fn poll(&mut self, now: Instant) -> Vec<GestureOutput> {
        let mut out = Vec::new();
        self.fire_timer(now, &mut out);
        out
    }

    /// When the pending hold timer fires, if one is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Pending { started } | Phase::AwaitingTap { started } => {
                Some(started + self.config.hold_delay)
            }
            Phase::Idle | Phase::Dragging { .. } => None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self.phase {
            Phase::Idle => GesturePhase::Idle,
            Phase::Pending { .. } => GesturePhase::Pending,
            Phase::AwaitingTap { .. } => GesturePhase::AwaitingTap,
            Phase::Dragging { .. } => GesturePhase::Dragging,
        }
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The latched touch point, if any.
    #[must_use]
    pub fn selection(&self) -> Option<TouchSelection> {
        match self.phase {
            Phase::Dragging { selection, .. } => selection,
            _ => None,
        }
    }

    /// Drop all per-gesture state without emitting anything.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Configuration in use.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HoldConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl HoldDragRecognizer {
    fn fire_timer(&mut self, now: Instant, out: &mut Vec<GestureOutput>) {
        let Some(deadline) = self.next_deadline() else {
            return;
        };
        if now < deadline {
            return;
        }
        match self.phase {
            Phase::Pending { started } => {
                tracing::trace!(target: "tilegrid.gesture", "hold delay elapsed, drag armed");
                self.phase = Phase::Dragging {
                    started,
                    selection: None,
                };
                out.push(GestureOutput::Style(LiveStyle::emphasized(
                    self.config.active_scale,
                    self.config.active_opacity,
                )));
                out.push(GestureOutput::Gesture(CellGesture::DragStart));
            }
            Phase::AwaitingTap { .. } => {
                tracing::trace!(target: "tilegrid.gesture", "released before hold delay, tap");
                self.phase = Phase::Idle;
                out.push(GestureOutput::Gesture(CellGesture::Tap));
            }
            Phase::Idle | Phase::Dragging { .. } => {}
        }
    }

    fn on_start(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Pending { started: now };
        } else {
            tracing::trace!(
                target: "tilegrid.gesture",
                phase = ?self.phase(),
                "start ignored, gesture already pending"
            );
        }
    }

    fn on_move(&mut self, event: &TouchEvent, out: &mut Vec<GestureOutput>) {
        let Phase::Dragging { selection, .. } = &mut self.phase else {
            return;
        };
        let latched = *selection.get_or_insert(TouchSelection {
            identifier: event.identifier,
            origin: event.page,
        });
        if latched.identifier != event.identifier {
            return;
        }

        let dx = event.page.x - latched.origin.x;
        let dy = event.page.y - latched.origin.y;
        out.push(GestureOutput::Style(LiveStyle {
            translate_x: dx,
            translate_y: dy,
            scale: self.config.active_scale,
            opacity: self.config.active_opacity,
            z_index: Some(self.config.base_z_index + 1),
        }));
        out.push(GestureOutput::Gesture(CellGesture::Dragging { dx, dy }));
    }

    fn on_release(&mut self, event: &TouchEvent, now: Instant, out: &mut Vec<GestureOutput>) {
        match self.phase {
            Phase::Pending { started } => {
                // Timer still armed; it reports the tap.
                self.phase = Phase::AwaitingTap { started };
            }
            Phase::Dragging { started, selection } => {
                self.phase = Phase::Idle;
                out.push(GestureOutput::Style(LiveStyle::neutral()));
                let held = now.duration_since(started) > self.config.hold_delay;
                let same_finger = selection.is_some_and(|s| s.identifier == event.identifier);
                if held && same_finger {
                    out.push(GestureOutput::Gesture(CellGesture::DragEnd));
                } else {
                    tracing::debug!(
                        target: "tilegrid.gesture",
                        identifier = event.identifier,
                        latched = ?selection.map(|s| s.identifier),
                        "release does not match drag, terminating"
                    );
                    out.push(GestureOutput::Gesture(CellGesture::DragTerminated));
                }
            }
            Phase::Idle | Phase::AwaitingTap { .. } => {}
        }
    }

    fn on_terminate(&mut self, out: &mut Vec<GestureOutput>) {
        if matches!(self.phase, Phase::Idle) {
            return;
        }
        tracing::debug!(target: "tilegrid.gesture", phase = ?self.phase(), "gesture terminated");
        self.phase = Phase::Idle;
        out.push(GestureOutput::Style(LiveStyle::neutral()));
        out.push(GestureOutput::Gesture(CellGesture::DragTerminated));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_199: Duration = Duration::from_millis(199);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_300: Duration = Duration::from_millis(300);
    const MS_400: Duration = Duration::from_millis(400);

    fn recognizer() -> HoldDragRecognizer {
        HoldDragRecognizer::new(HoldConfig::default())
    }

    fn gestures(out: &[GestureOutput]) -> Vec<CellGesture> {
        out.iter()
            .filter_map(|o| match o {
                GestureOutput::Gesture(g) => Some(*g),
                GestureOutput::Style(_) => None,
            })
            .collect()
    }

    fn styles(out: &[GestureOutput]) -> Vec<LiveStyle> {
        out.iter()
            .filter_map(|o| match o {
                GestureOutput::Style(s) => Some(*s),
                GestureOutput::Gesture(_) => None,
            })
            .collect()
    }

    fn at(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    // --- Tap ---

    #[test]
    fn quick_release_taps_when_timer_fires() {
        let mut gr = recognizer();
        let t = Instant::now();

        assert!(gr.process(&TouchEvent::start(1, at(10.0, 10.0)), t).is_empty());
        assert!(gr.process(&TouchEvent::release(1, at(10.0, 10.0)), t + MS_50).is_empty());
        assert_eq!(gr.phase(), GesturePhase::AwaitingTap);

        assert!(gr.poll(t + MS_199).is_empty());
        let out = gr.poll(t + MS_200);
        assert_eq!(gestures(&out), vec![CellGesture::Tap]);
        assert_eq!(gr.phase(), GesturePhase::Idle);
    }

    #[test]
    fn tap_fires_exactly_once() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.process(&TouchEvent::release(1, at(0.0, 0.0)), t + MS_50);
        assert_eq!(gestures(&gr.poll(t + MS_300)), vec![CellGesture::Tap]);
        assert!(gr.poll(t + MS_400).is_empty());
    }

    #[test]
    fn start_while_tap_pending_is_ignored() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.process(&TouchEvent::release(1, at(0.0, 0.0)), t + MS_50);
        gr.process(&TouchEvent::start(2, at(0.0, 0.0)), t + Duration::from_millis(100));
        assert_eq!(gr.phase(), GesturePhase::AwaitingTap);
        assert_eq!(gr.next_deadline(), Some(t + MS_200));
    }

    // --- Drag ---

    #[test]
    fn hold_arms_drag_with_emphasis() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);

        let out = gr.poll(t + MS_200);
        assert_eq!(gestures(&out), vec![CellGesture::DragStart]);
        assert_eq!(styles(&out), vec![LiveStyle::emphasized(1.1, 0.8)]);
        assert!(gr.is_dragging());
        assert_eq!(gr.next_deadline(), None);
    }

    #[test]
    fn moves_before_hold_are_ignored() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        let out = gr.process(&TouchEvent::moved(1, at(30.0, 0.0)), t + MS_50);
        assert!(out.is_empty());
        assert!(gr.selection().is_none());
    }

    #[test]
    fn first_move_latches_origin() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(7, at(5.0, 5.0)), t);
        gr.poll(t + MS_200);

        let out = gr.process(&TouchEvent::moved(7, at(40.0, 60.0)), t + MS_300);
        assert_eq!(gestures(&out), vec![CellGesture::Dragging { dx: 0.0, dy: 0.0 }]);
        assert_eq!(
            gr.selection(),
            Some(TouchSelection {
                identifier: 7,
                origin: at(40.0, 60.0)
            })
        );

        let out = gr.process(&TouchEvent::moved(7, at(25.0, 80.0)), t + MS_400);
        assert_eq!(gestures(&out), vec![CellGesture::Dragging { dx: -15.0, dy: 20.0 }]);
        let style = styles(&out)[0];
        assert_eq!(style.translate_x, -15.0);
        assert_eq!(style.translate_y, 20.0);
        assert_eq!(style.z_index, Some(2));
        assert_eq!(style.scale, 1.1);
    }

    #[test]
    fn other_fingers_are_ignored_once_latched() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.poll(t + MS_200);
        gr.process(&TouchEvent::moved(1, at(0.0, 0.0)), t + MS_300);

        let out = gr.process(&TouchEvent::moved(2, at(100.0, 100.0)), t + MS_300);
        assert!(out.is_empty());
        assert_eq!(gr.selection().map(|s| s.identifier), Some(1));
    }

    #[test]
    fn release_by_latched_finger_ends_drag() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.poll(t + MS_200);
        gr.process(&TouchEvent::moved(1, at(10.0, 0.0)), t + MS_300);

        let out = gr.process(&TouchEvent::release(1, at(10.0, 0.0)), t + MS_400);
        assert_eq!(gestures(&out), vec![CellGesture::DragEnd]);
        assert_eq!(styles(&out), vec![LiveStyle::neutral()]);
        assert_eq!(gr.phase(), GesturePhase::Idle);
        assert!(gr.selection().is_none());
    }

    #[test]
    fn release_by_other_finger_terminates() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.poll(t + MS_200);
        gr.process(&TouchEvent::moved(1, at(10.0, 0.0)), t + MS_300);

        let out = gr.process(&TouchEvent::release(2, at(10.0, 0.0)), t + MS_400);
        assert_eq!(gestures(&out), vec![CellGesture::DragTerminated]);
        assert_eq!(gr.phase(), GesturePhase::Idle);
    }

    #[test]
    fn release_without_any_move_terminates() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.poll(t + MS_200);
        let out = gr.process(&TouchEvent::release(1, at(0.0, 0.0)), t + MS_300);
        assert_eq!(gestures(&out), vec![CellGesture::DragTerminated]);
        assert_eq!(styles(&out), vec![LiveStyle::neutral()]);
    }

    #[test]
    fn overdue_timer_fires_before_release() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        // No poll in between: the release itself observes the overdue timer.
        let out = gr.process(&TouchEvent::release(1, at(0.0, 0.0)), t + MS_300);
        assert_eq!(
            gestures(&out),
            vec![CellGesture::DragStart, CellGesture::DragTerminated]
        );
    }

    // --- Termination ---

    #[test]
    fn terminate_mid_drag_resets_style() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.poll(t + MS_200);
        gr.process(&TouchEvent::moved(1, at(3.0, 3.0)), t + MS_300);

        let out = gr.process(&TouchEvent::terminate(), t + MS_400);
        assert_eq!(gestures(&out), vec![CellGesture::DragTerminated]);
        assert_eq!(styles(&out), vec![LiveStyle::neutral()]);
        assert!(!gr.is_dragging());
    }

    #[test]
    fn terminate_cancels_pending_tap() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.process(&TouchEvent::release(1, at(0.0, 0.0)), t + MS_50);
        gr.process(&TouchEvent::terminate(), t + Duration::from_millis(100));
        assert!(gr.poll(t + MS_400).is_empty());
    }

    #[test]
    fn terminate_while_idle_is_silent() {
        let mut gr = recognizer();
        assert!(gr.process(&TouchEvent::terminate(), Instant::now()).is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut gr = recognizer();
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        gr.reset();
        assert_eq!(gr.phase(), GesturePhase::Idle);
        assert!(gr.poll(t + MS_400).is_empty());
    }

    #[test]
    fn custom_hold_delay() {
        let mut gr = HoldDragRecognizer::new(HoldConfig {
            hold_delay: Duration::from_millis(500),
            ..HoldConfig::default()
        });
        let t = Instant::now();
        gr.process(&TouchEvent::start(1, at(0.0, 0.0)), t);
        assert!(gr.poll(t + MS_400).is_empty());
        assert_eq!(
            gestures(&gr.poll(t + Duration::from_millis(500))),
            vec![CellGesture::DragStart]
        );
    }
}
