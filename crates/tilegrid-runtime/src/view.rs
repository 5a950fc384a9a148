#![forbid(unsafe_code)]

//! Render-ready snapshot of the editor.

use serde::Serialize;
use tilegrid_core::geometry::Point;
use tilegrid_core::item::Item;

/// One cell as the renderer should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub item: Item,
    /// Committed top-left corner.
    pub position: Point,
    /// Shows the remove affordance and accepts drags.
    pub is_editable: bool,
    pub is_active: bool,
}

/// Both sections plus the edit-mode flag.
///
/// `generation` changes on every commit. Renderers key their cell tree on it
/// so nothing from the previous layout survives a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub generation: u64,
    pub editing: bool,
    pub selected: Vec<CellView>,
    pub unselected: Vec<CellView>,
    /// Top of the floating unselected header.
    pub unselected_header_top: f64,
    /// Height needed to show everything.
    pub content_height: f64,
}

impl ViewModel {
    /// Cell for `id` in either section.
    #[must_use]
    pub fn cell(&self, id: impl Into<tilegrid_core::item::ItemId>) -> Option<&CellView> {
        let id = id.into();
        self.selected
            .iter()
            .chain(&self.unselected)
            .find(|cell| cell.item.id == id)
    }

    /// Ids of the selected section, in order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<u64> {
        self.selected.iter().map(|c| c.item.id.0).collect()
    }

    /// Ids of the unselected section, in order.
    #[must_use]
    pub fn unselected_ids(&self) -> Vec<u64> {
        self.unselected.iter().map(|c| c.item.id.0).collect()
    }
}
