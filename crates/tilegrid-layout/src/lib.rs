#![forbid(unsafe_code)]

//! Grid coordinate engine.
//!
//! Converts between a linear list index, a two-dimensional [`GridSlot`], and
//! absolute pixel positions for a fixed-width grid. [`SectionMetrics`] derives
//! the two grids of the editor (selected above, unselected below) from a
//! single set of cell dimensions.
//!
//! Everything here is pure and stateless. Offsets derived from the selected
//! section's row count go stale whenever that count changes; callers must
//! recompute them rather than cache pixel positions across such a change.

pub mod section;

pub use section::SectionMetrics;
pub use tilegrid_core::geometry::{Point, Rect};

use serde::{Deserialize, Serialize};

/// A cell coordinate. Signed so that positions dragged outside the grid
/// still map to a (rejected) slot instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSlot {
    pub row: i32,
    pub col: i32,
}

impl GridSlot {
    /// Create a slot.
    #[inline]
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// One fixed-width grid laid out row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    line_size: usize,
    cell_width: f64,
    cell_height: f64,
    vertical_offset: f64,
}

impl Grid {
    /// Create a grid with `line_size` cells per row. A zero line size is
    /// clamped to 1.
    #[must_use]
    pub fn new(line_size: usize, cell_width: f64, cell_height: f64) -> Self {
        Self {
            line_size: line_size.max(1),
            cell_width,
            cell_height,
            vertical_offset: 0.0,
        }
    }

    /// Shift the whole grid down by `offset` pixels (builder pattern).
    #[must_use]
    pub fn with_vertical_offset(mut self, offset: f64) -> Self {
        self.vertical_offset = offset;
        self
    }

    #[inline]
    #[must_use]
    pub fn line_size(&self) -> usize {
        self.line_size
    }

    #[inline]
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    #[inline]
    #[must_use]
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    #[inline]
    #[must_use]
    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    /// Slot holding list index `index`.
    #[must_use]
    pub fn slot_of(&self, index: usize) -> GridSlot {
        GridSlot::new(
            (index / self.line_size) as i32,
            (index % self.line_size) as i32,
        )
    }

    /// Linear index of `slot`. May be negative or past the end for slots
    /// outside the populated area.
    #[must_use]
    pub fn index_of(&self, slot: GridSlot) -> i64 {
        i64::from(slot.col) + i64::from(slot.row) * self.line_size as i64
    }

    /// Top-left pixel of `slot`.
    #[must_use]
    pub fn slot_origin(&self, slot: GridSlot) -> Point {
        Point::new(
            f64::from(slot.col) * self.cell_width,
            f64::from(slot.row) * self.cell_height + self.vertical_offset,
        )
    }

    /// Top-left pixel of list index `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Point {
        self.slot_origin(self.slot_of(index))
    }

    /// Pixel bounds of list index `index`.
    #[must_use]
    pub fn cell_rect(&self, index: usize) -> Rect {
        Rect::at(self.position_of(index), self.cell_width, self.cell_height)
    }

    /// Slot whose area contains the center of a cell whose top-left corner
    /// is at `top_left`.
    ///
    /// A dragged cell snaps to the slot its center occupies, not the slot
    /// its leading corner touches. Non-finite input maps to `(-1, -1)`.
    #[must_use]
    pub fn slot_at(&self, top_left: Point) -> GridSlot {
        if !top_left.is_finite() {
            return GridSlot::new(-1, -1);
        }
        let x = top_left.x + self.cell_width / 2.0;
        let y = top_left.y - self.vertical_offset + self.cell_height / 2.0;
        GridSlot::new(
            (y / self.cell_height).floor() as i32,
            (x / self.cell_width).floor() as i32,
        )
    }

    /// Rows needed to show `item_count` items.
    #[must_use]
    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.line_size)
    }

    /// Whether `slot` is a legal drop target among `item_count` items.
    ///
    /// Index 0 holds the sentinel and is never a target; neither is any
    /// slot outside the populated rows and columns.
    #[must_use]
    pub fn is_valid_target(&self, slot: GridSlot, item_count: usize) -> bool {
        self.target_index(slot, item_count).is_some()
    }

    /// The list index for `slot` if it is a legal drop target.
    #[must_use]
    pub fn target_index(&self, slot: GridSlot, item_count: usize) -> Option<usize> {
        let col_ok = slot.col >= 0 && (slot.col as usize) < self.line_size;
        let row_ok = slot.row >= 0 && (slot.row as usize) < self.row_count(item_count);
        if !col_ok || !row_ok {
            return None;
        }
        let index = self.index_of(slot);
        (index > 0 && index < item_count as i64).then_some(index as usize)
    }
}
