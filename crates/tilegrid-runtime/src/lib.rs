#![forbid(unsafe_code)]

//! Runtime: animation driver and the two-section grid editor.
//!
//! # Role in tilegrid
//! `tilegrid-runtime` is the orchestration layer. It turns cell gestures from
//! `tilegrid-core` into reorder steps and structural changes, drives every
//! position animation through a tick-based [`AnimationDriver`], and talks to
//! the outside world only through the traits in [`collaborators`].
//!
//! # Primary responsibilities
//! - **GridEditor**: drag-to-reorder, add, remove, select, edit mode.
//! - **AnimationDriver / TaskGroup**: sequential frame chains and join barriers.
//! - **HandleRegistry**: item id to imperative cell handle.
//! - **EditorConfig**: tunables as data, optionally loaded from TOML/JSON.
//!
//! # How it fits in the system
//! The host owns the clock. It forwards touch events to
//! [`GridEditor::handle_touch`], calls [`GridEditor::tick`] once per frame,
//! and renders from [`GridEditor::view_model`]. Nothing here spawns threads
//! or sleeps.

pub mod collaborators;
pub mod config;
pub mod driver;
pub mod editor;
pub mod handles;
#[cfg(feature = "state-persistence")]
pub mod persistence;
pub mod view;

pub use collaborators::{
    Catalog, CollaboratorError, NoopObserver, SelectionObserver, SelectionStore,
};
pub use config::{ConfigError, EditorConfig, HoldPolicyConfig, LayoutConfig, SpeedConfig};
pub use driver::{
    AnimationDriver, AnimationId, AnimationRequest, AnimationTarget, FrameUpdate, TaskGroup,
};
pub use editor::{DraggedCell, EditorStats, GridEditor, IgnoredReason, OperationState};
pub use handles::{CellHandle, HandleRegistry};
#[cfg(feature = "state-persistence")]
pub use persistence::JsonFileStore;
pub use view::{CellView, ViewModel};
