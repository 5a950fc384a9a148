#![forbid(unsafe_code)]

//! In-memory collaborators and recording handles.

use std::cell::RefCell;
use std::rc::Rc;

use tilegrid_core::geometry::Point;
use tilegrid_core::item::{Item, ItemId};
use tilegrid_core::style::LiveStyle;
use tilegrid_runtime::{Catalog, CellHandle, CollaboratorError, SelectionObserver, SelectionStore};

// ---------------------------------------------------------------------------
// RecordingHandle
// ---------------------------------------------------------------------------

/// One call received by a [`RecordingHandle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleEvent {
    Style(LiveStyle),
    Position(Point),
}

/// Cell handle that records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandle {
    log: Rc<RefCell<Vec<HandleEvent>>>,
}

impl RecordingHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<HandleEvent> {
        self.log.borrow().clone()
    }

    /// Positions written so far, in order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HandleEvent::Position(p) => Some(*p),
                HandleEvent::Style(_) => None,
            })
            .collect()
    }

    /// Most recent position, if any.
    #[must_use]
    pub fn last_position(&self) -> Option<Point> {
        self.positions().last().copied()
    }

    /// Most recent live style, if any.
    #[must_use]
    pub fn last_style(&self) -> Option<LiveStyle> {
        self.log.borrow().iter().rev().find_map(|e| match e {
            HandleEvent::Style(s) => Some(*s),
            HandleEvent::Position(_) => None,
        })
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl CellHandle for RecordingHandle {
    fn apply_live_style(&mut self, style: LiveStyle) {
        self.log.borrow_mut().push(HandleEvent::Style(style));
    }

    fn set_position(&mut self, position: Point) {
        self.log.borrow_mut().push(HandleEvent::Position(position));
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Selection store held in memory, with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub selection: Option<Vec<Item>>,
    pub active_id: Option<ItemId>,
    /// Make every load fail.
    pub fail_reads: bool,
    /// Make every save fail.
    pub fail_writes: bool,
    /// Successful saves of the selection, oldest first.
    pub selection_writes: Vec<Vec<Item>>,
    /// Successful saves of the active id, oldest first.
    pub active_writes: Vec<ItemId>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `selection` and `active_id`.
    #[must_use]
    pub fn with_selection(selection: Vec<Item>, active_id: impl Into<ItemId>) -> Self {
        Self {
            selection: Some(selection),
            active_id: Some(active_id.into()),
            ..Self::default()
        }
    }

    fn unavailable(op: &str) -> CollaboratorError {
        CollaboratorError::Unavailable(format!("memory store {op} disabled"))
    }
}

impl SelectionStore for MemoryStore {
    fn load_selection(&mut self) -> Result<Option<Vec<Item>>, CollaboratorError> {
        if self.fail_reads {
            return Err(Self::unavailable("read"));
        }
        Ok(self.selection.clone())
    }

    fn load_active_id(&mut self) -> Result<Option<ItemId>, CollaboratorError> {
        if self.fail_reads {
            return Err(Self::unavailable("read"));
        }
        Ok(self.active_id)
    }

    fn save_selection(&mut self, items: &[Item]) -> Result<(), CollaboratorError> {
        if self.fail_writes {
            return Err(Self::unavailable("write"));
        }
        self.selection = Some(items.to_vec());
        self.selection_writes.push(items.to_vec());
        Ok(())
    }

    fn save_active_id(&mut self, id: ItemId) -> Result<(), CollaboratorError> {
        if self.fail_writes {
            return Err(Self::unavailable("write"));
        }
        self.active_id = Some(id);
        self.active_writes.push(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Catalog that always returns the same items.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    pub items: Vec<Item>,
    pub fetches: usize,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items, fetches: 0 }
    }
}

impl Catalog for StaticCatalog {
    fn fetch(&mut self) -> Result<Vec<Item>, CollaboratorError> {
        self.fetches += 1;
        Ok(self.items.clone())
    }
}

/// Catalog whose fetch always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCatalog;

impl Catalog for FailingCatalog {
    fn fetch(&mut self) -> Result<Vec<Item>, CollaboratorError> {
        Err(CollaboratorError::Unavailable("catalog offline".into()))
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// Observer that remembers every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub changes: Vec<ItemId>,
}

impl SelectionObserver for RecordingObserver {
    fn on_active_item_changed(&mut self, id: ItemId) {
        self.changes.push(id);
    }
}

/// Items `0..count` named `item-<id>`.
#[must_use]
pub fn numbered_items(count: u64) -> Vec<Item> {
    (0..count).map(|i| Item::new(i, format!("item-{i}"))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_clones_share_a_log() {
        let handle = RecordingHandle::new();
        let mut boxed: Box<dyn CellHandle> = Box::new(handle.clone());
        boxed.set_position(Point::new(1.0, 2.0));
        boxed.apply_live_style(LiveStyle::neutral());
        assert_eq!(handle.last_position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(handle.last_style(), Some(LiveStyle::neutral()));
        assert_eq!(handle.events().len(), 2);
    }

    #[test]
    fn failing_store_reports_unavailable() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        assert!(store.save_active_id(ItemId(1)).is_err());
        assert!(store.active_writes.is_empty());
        assert_eq!(store.load_active_id().unwrap(), None);
    }
}
