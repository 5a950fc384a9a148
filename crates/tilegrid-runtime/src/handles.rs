#![forbid(unsafe_code)]

//! Per-target imperative handles.
//!
//! The renderer mounts one [`CellHandle`] per visible cell (keyed by item id)
//! and one for the floating unselected header. The editor writes live styles
//! and animation frames through them; it never reads rendering state back.

use std::collections::HashMap;
use std::fmt;

use tilegrid_core::geometry::Point;
use tilegrid_core::style::LiveStyle;

use crate::driver::{AnimationTarget, FrameUpdate};

/// Imperative surface of one rendered element.
pub trait CellHandle {
    /// Apply a transient visual style (translate, scale, opacity, stacking).
    fn apply_live_style(&mut self, style: LiveStyle);

    /// Move the element's top-left corner to `position`.
    fn set_position(&mut self, position: Point);
}

struct Mounted {
    handle: Box<dyn CellHandle>,
    position: Point,
}

/// Map from animation target to its mounted handle.
#[derive(Default)]
pub struct HandleRegistry {
    mounted: HashMap<AnimationTarget, Mounted>,
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("mounted", &self.mounted.len())
            .finish()
    }
}

impl HandleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the handle for `target` and place it.
    pub fn mount(&mut self, target: AnimationTarget, mut handle: Box<dyn CellHandle>, position: Point) {
        handle.set_position(position);
        if self
            .mounted
            .insert(target, Mounted { handle, position })
            .is_some()
        {
            tracing::debug!(target: "tilegrid.animation", target_kind = ?target, "handle replaced");
        }
    }

    /// Remove the handle for `target`.
    pub fn unmount(&mut self, target: AnimationTarget) -> Option<Box<dyn CellHandle>> {
        self.mounted.remove(&target).map(|m| m.handle)
    }

    #[must_use]
    pub fn is_mounted(&self, target: AnimationTarget) -> bool {
        self.mounted.contains_key(&target)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Last position written to `target`.
    #[must_use]
    pub fn position(&self, target: AnimationTarget) -> Option<Point> {
        self.mounted.get(&target).map(|m| m.position)
    }

    /// Apply a live style. Returns `false` if nothing is mounted.
    pub fn apply_live_style(&mut self, target: AnimationTarget, style: LiveStyle) -> bool {
        match self.mounted.get_mut(&target) {
            Some(m) => {
                m.handle.apply_live_style(style);
                true
            }
            None => false,
        }
    }

    /// Move a handle. Returns `false` if nothing is mounted.
    pub fn set_position(&mut self, target: AnimationTarget, position: Point) -> bool {
        match self.mounted.get_mut(&target) {
            Some(m) => {
                m.handle.set_position(position);
                m.position = position;
                true
            }
            None => false,
        }
    }

    /// Apply frames in order; returns how many reached a handle.
    pub fn apply_frames(&mut self, frames: &[FrameUpdate]) -> usize {
        let mut applied = 0;
        for frame in frames {
            if self.set_position(frame.target, frame.position) {
                applied += 1;
            } else {
                tracing::warn!(
                    target: "tilegrid.animation",
                    target_kind = ?frame.target,
                    "frame for unmounted handle dropped"
                );
            }
        }
        applied
    }
}
