#![forbid(unsafe_code)]

//! Scripted touch scenarios against a real [`GridEditor`].
//!
//! [`EditorHarness`] owns an editor wired to in-memory collaborators, mounts
//! a [`RecordingHandle`] for every item and the header, and advances a
//! [`VirtualClock`] one frame at a time so hold timers and animations run
//! deterministically.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tilegrid_core::event::TouchEvent;
use tilegrid_core::geometry::Point;
use tilegrid_core::item::{Item, ItemId};
use tilegrid_runtime::{EditorConfig, GridEditor, IgnoredReason};
use tracing::info_span;
use web_time::Instant;

use crate::doubles::{MemoryStore, RecordingHandle, RecordingObserver};

/// Upper bound on frames [`EditorHarness::settle`] will step.
const MAX_SETTLE_FRAMES: usize = 100_000;

/// Manually advanced monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct VirtualClock {
    now: Instant,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Move forward by `by` and return the new time.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }
}

pub type HarnessEditor = GridEditor<MemoryStore, RecordingObserver>;

/// Editor plus clock plus recording handles.
pub struct EditorHarness {
    pub editor: HarnessEditor,
    pub clock: VirtualClock,
    frame: Duration,
    cells: BTreeMap<ItemId, RecordingHandle>,
    header: RecordingHandle,
    anchors: HashMap<u64, Point>,
}

impl EditorHarness {
    /// Editor over `store`, with `catalog` applied and every handle mounted.
    #[must_use]
    pub fn new(config: EditorConfig, store: MemoryStore, catalog: Vec<Item>) -> Self {
        let mut editor = GridEditor::new(config, store, RecordingObserver::default());
        let _ = editor.apply_catalog(Ok(catalog));
        let mut harness = Self {
            editor,
            clock: VirtualClock::new(),
            frame: Duration::from_millis(4),
            cells: BTreeMap::new(),
            header: RecordingHandle::new(),
            anchors: HashMap::new(),
        };
        harness.mount_all();
        harness
    }

    /// Mount a fresh recording handle for every item not yet mounted.
    pub fn mount_all(&mut self) {
        let ids: Vec<ItemId> = self
            .editor
            .selected()
            .iter()
            .chain(self.editor.unselected())
            .map(|item| item.id)
            .collect();
        for id in ids {
            if !self.cells.contains_key(&id) {
                let handle = RecordingHandle::new();
                self.editor.mount_cell(id, Box::new(handle.clone()));
                self.cells.insert(id, handle);
            }
        }
        self.editor.mount_header(Box::new(self.header.clone()));
    }

    #[must_use]
    pub fn handle(&self, id: impl Into<ItemId>) -> Option<&RecordingHandle> {
        self.cells.get(&id.into())
    }

    #[must_use]
    pub fn header(&self) -> &RecordingHandle {
        &self.header
    }

    /// Advance by `duration` in frame-sized ticks.
    pub fn step(&mut self, duration: Duration) {
        let mut left = duration;
        while !left.is_zero() {
            let dt = left.min(self.frame);
            let now = self.clock.advance(dt);
            self.editor.tick(now);
            left -= dt;
        }
    }

    /// Tick until no timer or animation is pending. Returns frames stepped.
    pub fn settle(&mut self) -> usize {
        let mut frames = 0;
        while self.editor.next_deadline().is_some() && frames < MAX_SETTLE_FRAMES {
            let now = self.clock.advance(self.frame);
            self.editor.tick(now);
            frames += 1;
        }
        frames
    }

    fn touch(&mut self, id: ItemId, event: TouchEvent) -> Result<(), IgnoredReason> {
        let now = self.clock.now();
        self.editor.handle_touch(id, &event, now)
    }

    /// Put `finger` down on the center of cell `id`.
    pub fn press(&mut self, id: impl Into<ItemId>, finger: u64) -> Result<(), IgnoredReason> {
        let id = id.into();
        let anchor = self
            .editor
            .view_model()
            .cell(id)
            .map(|cell| {
                let m = self.editor.metrics();
                cell.position.offset(m.cell_width / 2.0, m.cell_height / 2.0)
            })
            .unwrap_or(Point::ZERO);
        self.anchors.insert(finger, anchor);
        self.touch(id, TouchEvent::start(finger, anchor))
    }

    /// Press and keep holding until the drag is armed.
    pub fn press_and_hold(&mut self, id: impl Into<ItemId>, finger: u64) -> Result<(), IgnoredReason> {
        let id = id.into();
        self.press(id, finger)?;
        let hold = self.editor.config().hold_config().hold_delay;
        self.step(hold + self.frame);
        // First move latches the finger at the anchor.
        self.move_by(id, finger, 0.0, 0.0)
    }

    /// Move `finger` to its anchor plus `(dx, dy)`.
    pub fn move_by(
        &mut self,
        id: impl Into<ItemId>,
        finger: u64,
        dx: f64,
        dy: f64,
    ) -> Result<(), IgnoredReason> {
        let anchor = self.anchors.get(&finger).copied().unwrap_or(Point::ZERO);
        self.touch(id.into(), TouchEvent::moved(finger, anchor.offset(dx, dy)))
    }

    pub fn release(&mut self, id: impl Into<ItemId>, finger: u64) -> Result<(), IgnoredReason> {
        let anchor = self.anchors.remove(&finger).unwrap_or(Point::ZERO);
        self.touch(id.into(), TouchEvent::release(finger, anchor))
    }

    pub fn terminate(&mut self, id: impl Into<ItemId>) -> Result<(), IgnoredReason> {
        self.touch(id.into(), TouchEvent::terminate())
    }

    /// Quick press and release, then let the tap timer fire.
    pub fn tap(&mut self, id: impl Into<ItemId>) -> Result<(), IgnoredReason> {
        let id = id.into();
        self.press(id, 99)?;
        self.step(Duration::from_millis(20));
        self.release(id, 99)?;
        self.settle();
        Ok(())
    }

    /// Full drag of cell `id` by `(dx, dy)`, settling after the move and
    /// after the release.
    pub fn drag(&mut self, id: impl Into<ItemId>, dx: f64, dy: f64) -> Result<(), IgnoredReason> {
        let id = id.into();
        let _span = info_span!("harness.drag", item = id.0, dx, dy).entered();
        self.press_and_hold(id, 1)?;
        self.move_by(id, 1, dx, dy)?;
        self.settle();
        self.release(id, 1)?;
        self.settle();
        Ok(())
    }

    /// View model as JSON, for snapshot-style assertions and logs.
    #[must_use]
    pub fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.editor.view_model()).unwrap_or(serde_json::Value::Null)
    }
}
