// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: pixel geometry, items, touch events, gestures, and interpolation.
//!
//! # Role in tilegrid
//! `tilegrid-core` is the input and motion layer. It owns the per-cell
//! hold-to-drag gesture machine, the canonical touch event types, and the
//! pure position interpolator used by the animation driver.
//!
//! # Primary responsibilities
//! - **HoldDragRecognizer**: tap vs. press-and-hold disambiguation for one cell.
//! - **TouchEvent**: normalized touch input (start, move, release, terminate).
//! - **Interpolation**: intermediate frames between two pixel positions.
//! - **Item**: the catalog entry shown in a grid cell.
//!
//! # How it fits in the system
//! The runtime (`tilegrid-runtime`) feeds `TouchEvent`s into recognizers,
//! turns the resulting `CellGesture`s into reorder steps, and drives
//! `Translation`s built from interpolated frames. Grid math lives in
//! `tilegrid-layout`, which only depends on the geometry here.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod item;
pub mod style;

pub use animation::{AnimationError, AnimationSpeed, Frame, Translation, interpolate_positions};
pub use event::{TouchEvent, TouchKind};
pub use geometry::{Point, Rect};
pub use gesture::{
    CellGesture, GestureOutput, GesturePhase, HoldConfig, HoldDragRecognizer, TouchSelection,
};
pub use item::{Item, ItemId};
pub use style::LiveStyle;
