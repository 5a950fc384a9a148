#![forbid(unsafe_code)]

//! Metrics shared by the selected and unselected sections.
//!
//! ```text
//! y = 0                 selected header            (header_height)
//! y = header            selected grid              (rows(selected) * cell_height)
//! y = header + rows*ch  unselected header          (header_height)
//! y = 2*header + rows*ch  unselected grid
//! ```

use serde::{Deserialize, Serialize};

use crate::Grid;

/// Cell and header dimensions for both sections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionMetrics {
    /// Cells per row.
    pub line_size: usize,
    /// Width of one cell.
    pub cell_width: f64,
    /// Height of one cell.
    pub cell_height: f64,
    /// Height of each section header.
    pub header_height: f64,
}

impl Default for SectionMetrics {
    fn default() -> Self {
        Self::for_width(375.0, 4, 50.0, 50.0)
    }
}

impl SectionMetrics {
    /// Split `total_width` evenly into `line_size` columns.
    #[must_use]
    pub fn for_width(total_width: f64, line_size: usize, cell_height: f64, header_height: f64) -> Self {
        let line_size = line_size.max(1);
        Self {
            line_size,
            cell_width: total_width / line_size as f64,
            cell_height,
            header_height,
        }
    }

    /// Rows occupied by `item_count` items.
    #[must_use]
    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.line_size.max(1))
    }

    /// Grid of the selected section, directly below its header.
    #[must_use]
    pub fn selected_grid(&self) -> Grid {
        Grid::new(self.line_size, self.cell_width, self.cell_height)
            .with_vertical_offset(self.header_height)
    }

    /// Vertical offset of the unselected grid for a given selected count.
    #[must_use]
    pub fn unselected_offset(&self, selected_count: usize) -> f64 {
        self.row_count(selected_count) as f64 * self.cell_height + 2.0 * self.header_height
    }

    /// Grid of the unselected section for a given selected count.
    #[must_use]
    pub fn unselected_grid(&self, selected_count: usize) -> Grid {
        Grid::new(self.line_size, self.cell_width, self.cell_height)
            .with_vertical_offset(self.unselected_offset(selected_count))
    }

    /// Top of the unselected section header for a given selected count.
    #[must_use]
    pub fn unselected_header_top(&self, selected_count: usize) -> f64 {
        self.header_height + self.row_count(selected_count) as f64 * self.cell_height
    }

    /// Whether appending one item to `selected_count` items opens a new row.
    #[must_use]
    pub fn append_opens_row(&self, selected_count: usize) -> bool {
        selected_count % self.line_size.max(1) == 0
    }

    /// Whether removing one item from `selected_count` items closes a row.
    #[must_use]
    pub fn removal_closes_row(&self, selected_count: usize) -> bool {
        selected_count % self.line_size.max(1) == 1 % self.line_size.max(1)
    }

    /// Total height needed to show both sections.
    #[must_use]
    pub fn content_height(&self, selected_count: usize, unselected_count: usize) -> f64 {
        self.unselected_offset(selected_count) + self.row_count(unselected_count) as f64 * self.cell_height
    }
}
