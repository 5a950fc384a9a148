//! Property tests for the grid coordinate engine.
//!
//! ## Invariants
//!
//! 1. Index → slot → index is the identity for every populated index.
//! 2. Any point within half a cell of a slot's top-left snaps to that slot.
//! 3. Laying out a committed order yields a strictly increasing, gap-free
//!    row-major sequence of positions.
//! 4. Only populated, non-sentinel slots are drop targets.

use proptest::prelude::*;
use tilegrid_layout::{Grid, GridSlot, Point, SectionMetrics};

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..=8, 10u32..=200, 10u32..=120, 0u32..=400).prop_map(|(line, w, h, off)| {
        Grid::new(line, f64::from(w), f64::from(h)).with_vertical_offset(f64::from(off))
    })
}

// ── 1. Index round trip ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn index_round_trips(grid in arb_grid(), count in 1usize..200) {
        for i in 0..count {
            let slot = grid.slot_of(i);
            prop_assert_eq!(grid.index_of(slot), i as i64);
            prop_assert!(slot.col >= 0 && (slot.col as usize) < grid.line_size());
        }
    }

    // ── 2. Center snap ────────────────────────────────────────────────────

    #[test]
    fn points_near_top_left_snap_to_slot(
        grid in arb_grid(),
        index in 0usize..64,
        fx in -0.499f64..0.499,
        fy in -0.499f64..0.499,
    ) {
        let origin = grid.position_of(index);
        let p = Point::new(
            origin.x + fx * grid.cell_width(),
            origin.y + fy * grid.cell_height(),
        );
        prop_assert_eq!(grid.slot_at(p), grid.slot_of(index));
    }

    // ── 3. Committed layout is row-major ──────────────────────────────────

    #[test]
    fn committed_layout_is_gap_free(grid in arb_grid(), count in 1usize..64) {
        let mut prev: Option<(i64, GridSlot, Point)> = None;
        for i in 0..count {
            let slot = grid.slot_of(i);
            let pos = grid.slot_origin(slot);
            let idx = grid.index_of(slot);
            prop_assert_eq!(grid.slot_at(pos), slot);
            if let Some((pidx, pslot, ppos)) = prev {
                prop_assert_eq!(idx, pidx + 1);
                if slot.row == pslot.row {
                    prop_assert_eq!(slot.col, pslot.col + 1);
                    prop_assert!(pos.x > ppos.x);
                } else {
                    prop_assert_eq!(slot.row, pslot.row + 1);
                    prop_assert_eq!(slot.col, 0);
                    prop_assert!(pos.y > ppos.y);
                }
            }
            prev = Some((idx, slot, pos));
        }
        prop_assert_eq!(grid.row_count(count), (count - 1) / grid.line_size() + 1);
    }

    // ── 4. Drop targets ───────────────────────────────────────────────────

    #[test]
    fn only_populated_non_sentinel_slots_are_targets(
        grid in arb_grid(),
        count in 0usize..40,
        row in -3i32..10,
        col in -3i32..10,
    ) {
        let slot = GridSlot::new(row, col);
        let valid = grid.is_valid_target(slot, count);
        let expected = col >= 0
            && (col as usize) < grid.line_size()
            && row >= 0
            && grid.index_of(slot) > 0
            && grid.index_of(slot) < count as i64;
        prop_assert_eq!(valid, expected);
    }

    #[test]
    fn unselected_offset_grows_by_one_row_per_new_selected_row(count in 0usize..64) {
        let m = SectionMetrics::for_width(400.0, 4, 50.0, 50.0);
        let delta = m.unselected_offset(count + 1) - m.unselected_offset(count);
        if m.append_opens_row(count) {
            prop_assert_eq!(delta, m.cell_height);
        } else {
            prop_assert_eq!(delta, 0.0);
        }
    }
}
