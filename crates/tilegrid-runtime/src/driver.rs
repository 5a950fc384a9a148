#![forbid(unsafe_code)]

//! Animation driver and join barriers.
//!
//! [`AnimationDriver`] owns every in-flight [`Translation`]. The host calls
//! [`tick`](AnimationDriver::tick) once per frame; due frames come back as
//! [`FrameUpdate`]s ordered by due time, then by start order. Each translation
//! is a sequential chain: frame k+1 is never released before frame k.
//!
//! [`TaskGroup`] is the all-complete barrier: a phase records the animations
//! it started and waits until none of them is still running.
//!
//! # Supersession
//!
//! There is no cancellation. Starting a second translation for a target that
//! is already moving leaves both running; the later one's frames land last
//! and win.

use tilegrid_core::animation::{AnimationError, AnimationSpeed, Translation};
use tilegrid_core::geometry::Point;
use tilegrid_core::item::ItemId;
use web_time::Instant;

/// Identifier of one started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

/// What an animation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTarget {
    /// The cell showing this item.
    Cell(ItemId),
    /// The floating header of the unselected section.
    UnselectedHeader,
}

/// Parameters for one translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub target: AnimationTarget,
    pub from: Point,
    pub to: Point,
    pub overshoot: bool,
    pub speed: AnimationSpeed,
}

impl AnimationRequest {
    /// Move `target` from `from` to `to` at normal speed with overshoot.
    #[must_use]
    pub fn new(target: AnimationTarget, from: Point, to: Point) -> Self {
        Self {
            target,
            from,
            to,
            overshoot: true,
            speed: AnimationSpeed::Normal,
        }
    }

    /// Set overshoot (builder pattern).
    #[must_use]
    pub fn overshoot(mut self, overshoot: bool) -> Self {
        self.overshoot = overshoot;
        self
    }

    /// Set speed (builder pattern).
    #[must_use]
    pub fn speed(mut self, speed: AnimationSpeed) -> Self {
        self.speed = speed;
        self
    }
}

/// A position to apply to a target now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub animation: AnimationId,
    pub target: AnimationTarget,
    pub position: Point,
}

#[derive(Debug)]
struct Running {
    id: AnimationId,
    target: AnimationTarget,
    translation: Translation,
}

/// Drives all in-flight translations.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    next_id: u64,
    running: Vec<Running>,
    started_total: u64,
    faults_total: u64,
}

impl AnimationDriver {
    /// Create an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a translation at `now`.
    ///
    /// Validation faults abort only this animation and are counted.
    pub fn start(
        &mut self,
        request: AnimationRequest,
        now: Instant,
    ) -> Result<AnimationId, AnimationError> {
        let translation = match Translation::new(
            request.from,
            request.to,
            request.overshoot,
            request.speed,
            now,
        ) {
            Ok(t) => t,
            Err(err) => {
                self.faults_total += 1;
                tracing::error!(
                    target: "tilegrid.animation",
                    target_kind = ?request.target,
                    error = %err,
                    "animation rejected"
                );
                return Err(err);
            }
        };

        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.started_total += 1;
        tracing::trace!(
            target: "tilegrid.animation",
            animation = id.0,
            target_kind = ?request.target,
            from_x = request.from.x,
            from_y = request.from.y,
            to_x = request.to.x,
            to_y = request.to.y,
            "animation started"
        );
        self.running.push(Running {
            id,
            target: request.target,
            translation,
        });
        Ok(id)
    }

    /// Release every frame due at `now` and retire finished animations.
    pub fn tick(&mut self, now: Instant) -> Vec<FrameUpdate> {
        let mut due = Vec::new();
        for (order, run) in self.running.iter_mut().enumerate() {
            for frame in run.translation.due_frames(now) {
                due.push((
                    frame.due,
                    order,
                    FrameUpdate {
                        animation: run.id,
                        target: run.target,
                        position: frame.position,
                    },
                ));
            }
        }
        // Stable: equal due times keep start order, and a chain's own frames
        // keep their sequence.
        due.sort_by_key(|(at, order, _)| (*at, *order));

        self.running.retain(|run| {
            let done = run.translation.is_complete();
            if done {
                tracing::trace!(target: "tilegrid.animation", animation = run.id.0, "animation finished");
            }
            !done
        });

        due.into_iter().map(|(_, _, update)| update).collect()
    }

    /// Whether `id` still has frames to release.
    #[must_use]
    pub fn is_running(&self, id: AnimationId) -> bool {
        self.running.iter().any(|run| run.id == id)
    }

    /// Whether nothing is animating.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Number of in-flight animations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    /// Earliest pending frame.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.running
            .iter()
            .filter_map(|run| run.translation.next_due())
            .min()
    }

    /// Animations started since creation.
    #[must_use]
    pub fn started_total(&self) -> u64 {
        self.started_total
    }

    /// Animations rejected by validation since creation.
    #[must_use]
    pub fn faults_total(&self) -> u64 {
        self.faults_total
    }
}

/// All-complete join barrier over a set of animations.
#[derive(Debug, Clone, Default)]
pub struct TaskGroup {
    members: Vec<AnimationId>,
    faults: usize,
}

impl TaskGroup {
    /// Create an empty (already complete) group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an animation and add it to the group.
    ///
    /// A rejected animation counts as finished; the fault is already logged
    /// by the driver.
    pub fn spawn(&mut self, driver: &mut AnimationDriver, request: AnimationRequest, now: Instant) {
        match driver.start(request, now) {
            Ok(id) => self.members.push(id),
            Err(_) => self.faults += 1,
        }
    }

    /// Animations started through this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no animation was started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Animations that failed validation.
    #[must_use]
    pub fn faults(&self) -> usize {
        self.faults
    }

    /// Whether every member has drained.
    #[must_use]
    pub fn is_complete(&self, driver: &AnimationDriver) -> bool {
        self.members.iter().all(|id| !driver.is_running(*id))
    }
}
