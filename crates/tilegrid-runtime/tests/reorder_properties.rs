//! Property tests for committed orders under random edit sessions.
//!
//! ## Invariants
//!
//! 1. Any sequence of drags leaves the selection a permutation of what it
//!    was, with the sentinel still first.
//! 2. Any sequence of adds and removes keeps the two sections disjoint and
//!    together equal to the catalog.
//! 3. After every commit the view lays the selection out row-major without
//!    gaps, and every mounted handle rests on its committed position.

use proptest::prelude::*;
use tilegrid_harness::{EditorHarness, MemoryStore, numbered_items};
use tilegrid_runtime::{EditorConfig, OperationState};

const CATALOG: u64 = 12;

fn harness(selected: u64) -> EditorHarness {
    let mut config = EditorConfig::default();
    config.layout.width = 400.0;
    let store = MemoryStore::with_selection(numbered_items(selected), 0u64);
    let mut h = EditorHarness::new(config, store, numbered_items(CATALOG));
    h.editor.toggle_editing().unwrap();
    h
}

fn assert_settled_layout(h: &EditorHarness) -> Result<(), TestCaseError> {
    prop_assert_eq!(h.editor.operation_state(), OperationState::Idle);
    let view = h.editor.view_model();
    let grid = h.editor.metrics().selected_grid();
    prop_assert!(view.selected.first().is_some_and(|c| c.item.id.is_sentinel()));
    for (i, cell) in view.selected.iter().chain(&view.unselected).enumerate() {
        let expected = if i < view.selected.len() {
            grid.position_of(i)
        } else {
            h.editor
                .metrics()
                .unselected_grid(view.selected.len())
                .position_of(i - view.selected.len())
        };
        prop_assert_eq!(cell.position, expected);
        if let Some(handle) = h.handle(cell.item.id) {
            prop_assert_eq!(handle.last_position(), Some(expected));
        }
    }
    Ok(())
}

// ── 1. Drags permute ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn drags_only_permute(
        selected in 2u64..10,
        drags in prop::collection::vec((0usize..16, -4i32..=4, -3i32..=3), 1..6),
    ) {
        let mut h = harness(selected);
        let mut before = h.editor.view_model().selected_ids();
        before.sort_unstable();

        for (pick, cols, rows) in drags {
            let ids = h.editor.view_model().selected_ids();
            let id = ids[1 + pick % (ids.len() - 1)];
            // Half-cell jitter keeps targets off slot boundaries.
            let dx = f64::from(cols) * 100.0 + 10.0;
            let dy = f64::from(rows) * 50.0 + 5.0;
            h.drag(id, dx, dy).unwrap();
            assert_settled_layout(&h)?;
        }

        let mut after = h.editor.view_model().selected_ids();
        prop_assert_eq!(after[0], 0);
        after.sort_unstable();
        prop_assert_eq!(after, before);
    }
}

// ── 2. Adds and removes partition the catalog ────────────────────────────

#[derive(Debug, Clone)]
enum Change {
    Add(usize),
    Remove(usize),
}

fn arb_change() -> impl Strategy<Value = Change> {
    prop_oneof![
        (0usize..16).prop_map(Change::Add),
        (0usize..16).prop_map(Change::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn structural_changes_partition_catalog(
        selected in 1u64..8,
        changes in prop::collection::vec(arb_change(), 1..8),
    ) {
        let mut h = harness(selected);
        for change in changes {
            let view = h.editor.view_model();
            let now = h.clock.now();
            match change {
                Change::Add(pick) if !view.unselected.is_empty() => {
                    let id = view.unselected[pick % view.unselected.len()].item.id;
                    h.editor.add_item(id, now).unwrap();
                }
                Change::Remove(pick) if view.selected.len() > 1 => {
                    let id = view.selected[1 + pick % (view.selected.len() - 1)].item.id;
                    h.editor.remove_item(id, now).unwrap();
                }
                _ => continue,
            }
            h.settle();
            assert_settled_layout(&h)?;

            let view = h.editor.view_model();
            let mut all: Vec<u64> = view
                .selected_ids()
                .into_iter()
                .chain(view.unselected_ids())
                .collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..CATALOG).collect::<Vec<_>>());

            let header = view.unselected_header_top;
            let rows = view.selected.len().div_ceil(4) as f64;
            prop_assert_eq!(header, 50.0 + rows * 50.0);
            prop_assert!(view.selected.iter().any(|c| c.item.id == h.editor.active_id()));
        }
        prop_assert_eq!(
            h.editor.store().selection.as_ref().map(Vec::len),
            Some(h.editor.selected().len())
        );
    }
}
