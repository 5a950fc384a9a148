#![forbid(unsafe_code)]

//! Headless harness for the tilegrid editor.
//!
//! - [`doubles`]: in-memory store, catalogs, observer, and recording handles.
//! - [`scenario`]: [`EditorHarness`], a virtual-clock driver for scripted
//!   touch sequences.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut h = EditorHarness::new(EditorConfig::default(), store, catalog);
//! h.editor.toggle_editing()?;
//! h.drag(3, -200.0, 0.0)?;
//! assert_eq!(h.editor.view_model().selected_ids(), vec![0, 3, 1, 2, 4, 5]);
//! ```

pub mod doubles;
pub mod scenario;

pub use doubles::{
    FailingCatalog, HandleEvent, MemoryStore, RecordingHandle, RecordingObserver, StaticCatalog,
    numbered_items,
};
pub use scenario::{EditorHarness, HarnessEditor, VirtualClock};
