#![forbid(unsafe_code)]

//! tilegrid public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a prelude
//! for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use tilegrid_core::{
    AnimationError, AnimationSpeed, CellGesture, GestureOutput, GesturePhase, HoldConfig,
    HoldDragRecognizer, Item, ItemId, LiveStyle, Point, Rect, TouchEvent, TouchKind,
    TouchSelection, interpolate_positions,
};

// --- Layout re-exports -----------------------------------------------------

pub use tilegrid_layout::{Grid, GridSlot, SectionMetrics};

// --- Runtime re-exports ----------------------------------------------------

pub use tilegrid_runtime::{
    AnimationDriver, AnimationRequest, AnimationTarget, Catalog, CellHandle, CellView,
    CollaboratorError, ConfigError, EditorConfig, EditorStats, GridEditor, IgnoredReason,
    NoopObserver, OperationState, SelectionObserver, SelectionStore, TaskGroup, ViewModel,
};
#[cfg(feature = "state-persistence")]
pub use tilegrid_runtime::JsonFileStore;

pub mod prelude {
    pub use crate::{
        CellHandle, EditorConfig, GridEditor, Item, ItemId, Point, SelectionObserver,
        SelectionStore, TouchEvent, ViewModel,
    };

    pub use crate::{core, layout, runtime};
}

pub use tilegrid_core as core;
pub use tilegrid_layout as layout;
pub use tilegrid_runtime as runtime;
