#![forbid(unsafe_code)]

//! Moving items between the two sections.
//!
//! Adding and removing each start one [`TaskGroup`] holding every animation
//! the change needs; the lists are swapped when the group drains.
//!
//! Let `S` be the selected count before the change and `ch` the cell height.
//!
//! | Change | Moving cell | Header | Other cells |
//! |--------|-------------|--------|-------------|
//! | add unselected `k` | unselected `k` → selected `S` | `+ch` if `S % L == 0` | unselected `j > k` → `j - 1`; all shift `+ch` if the header moves |
//! | remove selected `k` | selected `k` → unselected tail | `-ch` if `S % L == 1` | selected `j > k` → `j - 1`; unselected shift `-ch` if the header moves |

use tilegrid_core::geometry::Point;
use tilegrid_core::item::{Item, ItemId};
use web_time::Instant;

use super::{GridEditor, IgnoredReason, Operation, OperationState};
use crate::collaborators::{SelectionObserver, SelectionStore};
use crate::driver::{AnimationRequest, AnimationTarget, TaskGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeKind {
    Add,
    Remove,
}

#[derive(Debug)]
pub(super) struct PendingChange {
    kind: ChangeKind,
    item: Item,
    index: usize,
    group: TaskGroup,
}

impl PendingChange {
    pub(super) fn state(&self) -> OperationState {
        match self.kind {
            ChangeKind::Add => OperationState::Adding,
            ChangeKind::Remove => OperationState::Removing,
        }
    }
}

impl<S: SelectionStore, O: SelectionObserver> GridEditor<S, O> {
    /// Move unselected item `id` to the end of the selected section.
    ///
    /// Requires edit mode and no other operation in flight.
    pub fn add_item(&mut self, id: ItemId, now: Instant) -> Result<(), IgnoredReason> {
        if !self.editing {
            return self.ignore(IgnoredReason::NotEditing);
        }
        self.ensure_idle()?;
        let Some(index) = self.unselected.iter().position(|item| item.id == id) else {
            return self.ignore(IgnoredReason::UnknownItem(id));
        };

        let m = self.metrics;
        let speed = self.config.structural_speed.to_speed();
        let count = self.selected.len();
        let opens_row = m.append_opens_row(count);
        let shift_down = if opens_row { m.cell_height } else { 0.0 };
        let sel = m.selected_grid();
        let uns = m.unselected_grid(count);

        let mut requests = vec![AnimationRequest::new(
            AnimationTarget::Cell(id),
            uns.position_of(index),
            sel.position_of(count),
        )];
        if opens_row {
            let top = m.unselected_header_top(count);
            requests.push(AnimationRequest::new(
                AnimationTarget::UnselectedHeader,
                Point::new(0.0, top),
                Point::new(0.0, top + m.cell_height),
            ));
            for (i, item) in self.unselected.iter().enumerate().take(index) {
                let p = uns.position_of(i);
                requests.push(AnimationRequest::new(
                    AnimationTarget::Cell(item.id),
                    p,
                    p.offset(0.0, shift_down),
                ));
            }
        }
        for (j, item) in self.unselected.iter().enumerate().skip(index + 1) {
            requests.push(AnimationRequest::new(
                AnimationTarget::Cell(item.id),
                uns.position_of(j),
                uns.position_of(j - 1).offset(0.0, shift_down),
            ));
        }

        let item = self.unselected[index].clone();
        self.start_change(ChangeKind::Add, item, index, requests, speed, now);
        Ok(())
    }

    /// Move selected item `id` to the end of the unselected section.
    ///
    /// Requires edit mode and no other operation in flight. If `id` was the
    /// active item, the item that takes its slot becomes active (or the
    /// previous one if it was last).
    pub fn remove_item(&mut self, id: ItemId, now: Instant) -> Result<(), IgnoredReason> {
        if !self.editing {
            return self.ignore(IgnoredReason::NotEditing);
        }
        self.ensure_idle()?;
        let Some(index) = self.selected.iter().position(|item| item.id == id) else {
            return self.ignore(IgnoredReason::UnknownItem(id));
        };
        if self.selected[index].is_sentinel() {
            return self.ignore(IgnoredReason::Sentinel);
        }

        let m = self.metrics;
        let speed = self.config.structural_speed.to_speed();
        let count = self.selected.len();
        let closes_row = m.removal_closes_row(count);
        let lift = if closes_row { -m.cell_height } else { 0.0 };
        let sel = m.selected_grid();
        let uns = m.unselected_grid(count);

        let mut requests = vec![AnimationRequest::new(
            AnimationTarget::Cell(id),
            sel.position_of(index),
            uns.position_of(self.unselected.len()).offset(0.0, lift),
        )];
        for (j, item) in self.selected.iter().enumerate().skip(index + 1) {
            requests.push(AnimationRequest::new(
                AnimationTarget::Cell(item.id),
                sel.position_of(j),
                sel.position_of(j - 1),
            ));
        }
        if closes_row {
            let top = m.unselected_header_top(count);
            requests.push(AnimationRequest::new(
                AnimationTarget::UnselectedHeader,
                Point::new(0.0, top),
                Point::new(0.0, top - m.cell_height),
            ));
            for (i, item) in self.unselected.iter().enumerate() {
                let p = uns.position_of(i);
                requests.push(AnimationRequest::new(
                    AnimationTarget::Cell(item.id),
                    p,
                    p.offset(0.0, lift),
                ));
            }
        }

        let item = self.selected[index].clone();
        self.start_change(ChangeKind::Remove, item, index, requests, speed, now);
        Ok(())
    }

    fn start_change(
        &mut self,
        kind: ChangeKind,
        item: Item,
        index: usize,
        requests: Vec<AnimationRequest>,
        speed: tilegrid_core::animation::AnimationSpeed,
        now: Instant,
    ) {
        let mut group = TaskGroup::new();
        for request in requests {
            group.spawn(&mut self.driver, request.speed(speed), now);
        }
        tracing::info!(
            target: "tilegrid.reorder",
            ?kind,
            item = %item.id,
            index,
            animations = group.len(),
            "structural change started"
        );
        self.operation = Operation::Structural(PendingChange {
            kind,
            item,
            index,
            group,
        });
    }

    /// Swap the lists once the pending change's barrier has drained.
    pub(super) fn settle_structural(&mut self) {
        match &self.operation {
            Operation::Structural(change) if change.group.is_complete(&self.driver) => {}
            _ => return,
        }
        let Operation::Structural(change) = std::mem::replace(&mut self.operation, Operation::Idle)
        else {
            return;
        };
        match change.kind {
            ChangeKind::Add => self.finish_add(change),
            ChangeKind::Remove => self.finish_remove(change),
        }
        self.stats.commits += 1;
        self.rebuild();
        self.persist_focus();
        self.persist_selection();
    }

    fn finish_add(&mut self, change: PendingChange) {
        let id = change.item.id;
        if self.unselected.get(change.index).map(|item| item.id) == Some(id) {
            self.unselected.remove(change.index);
        } else {
            self.unselected.retain(|item| item.id != id);
        }
        self.selected.push(change.item);
        self.recently_added.push(id);
        self.stats.adds += 1;
        tracing::info!(target: "tilegrid.reorder", item = %id, "item added");
    }

    fn finish_remove(&mut self, change: PendingChange) {
        let id = change.item.id;
        let index = change.index;
        if self.selected.get(index).map(|item| item.id) == Some(id) {
            self.selected.remove(index);
        } else {
            self.selected.retain(|item| item.id != id);
        }
        self.unselected.push(change.item);
        self.recently_added.retain(|added| *added != id);

        if id == self.active_id {
            let successor = if index >= self.selected.len() {
                index.checked_sub(1).and_then(|i| self.selected.get(i))
            } else {
                self.selected.get(index)
            };
            self.active_id = successor.map_or(ItemId::SENTINEL, |item| item.id);
            tracing::debug!(target: "tilegrid.reorder", active = %self.active_id, "active item reassigned");
        }
        self.stats.removes += 1;
        tracing::info!(target: "tilegrid.reorder", item = %id, "item removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, NoopObserver};
    use crate::config::EditorConfig;
    use std::time::Duration;

    struct FixedStore {
        selected: usize,
        active: u64,
    }

    impl SelectionStore for FixedStore {
        fn load_selection(&mut self) -> Result<Option<Vec<Item>>, CollaboratorError> {
            Ok(Some(
                (0..self.selected as u64)
                    .map(|i| Item::new(i, format!("s{i}")))
                    .collect(),
            ))
        }
        fn load_active_id(&mut self) -> Result<Option<ItemId>, CollaboratorError> {
            Ok(Some(ItemId(self.active)))
        }
        fn save_selection(&mut self, _items: &[Item]) -> Result<(), CollaboratorError> {
            Ok(())
        }
        fn save_active_id(&mut self, _id: ItemId) -> Result<(), CollaboratorError> {
            Ok(())
        }
    }

    fn editor(selected: usize, active: u64) -> GridEditor<FixedStore, NoopObserver> {
        let mut config = EditorConfig::default();
        config.layout.width = 400.0;
        let mut ed = GridEditor::new(config, FixedStore { selected, active }, NoopObserver);
        let catalog = (0..10u64).map(|i| Item::new(i, format!("s{i}"))).collect();
        ed.apply_catalog(Ok(catalog)).unwrap();
        ed.toggle_editing().unwrap();
        ed
    }

    fn settle(ed: &mut GridEditor<FixedStore, NoopObserver>, t0: Instant) {
        ed.advance(t0 + Duration::from_secs(1));
    }

    #[test]
    fn add_moves_item_after_barrier() {
        let mut ed = editor(3, 0);
        let t0 = Instant::now();
        ed.add_item(ItemId(5), t0).unwrap();
        assert_eq!(ed.operation_state(), OperationState::Adding);
        assert_eq!(ed.selected().len(), 3);

        settle(&mut ed, t0);
        assert_eq!(ed.operation_state(), OperationState::Idle);
        assert_eq!(
            ed.selected().iter().map(|i| i.id.0).collect::<Vec<_>>(),
            vec![0, 1, 2, 5]
        );
        assert!(!ed.unselected().iter().any(|i| i.id == ItemId(5)));
        assert_eq!(ed.stats().adds, 1);
    }

    #[test]
    fn second_request_while_adding_is_ignored() {
        let mut ed = editor(3, 0);
        let t0 = Instant::now();
        ed.add_item(ItemId(5), t0).unwrap();
        assert_eq!(
            ed.add_item(ItemId(6), t0),
            Err(IgnoredReason::Busy(OperationState::Adding))
        );
        assert_eq!(
            ed.remove_item(ItemId(1), t0),
            Err(IgnoredReason::Busy(OperationState::Adding))
        );
        assert_eq!(ed.stats().ignored, 2);
    }

    #[test]
    fn removing_last_active_item_picks_previous() {
        let mut ed = editor(4, 3);
        let t0 = Instant::now();
        ed.remove_item(ItemId(3), t0).unwrap();
        settle(&mut ed, t0);
        assert_eq!(ed.active_id(), ItemId(2));
        assert_eq!(ed.unselected().last().map(|i| i.id), Some(ItemId(3)));
    }

    #[test]
    fn removing_inner_active_item_picks_successor() {
        let mut ed = editor(4, 1);
        let t0 = Instant::now();
        ed.remove_item(ItemId(1), t0).unwrap();
        settle(&mut ed, t0);
        assert_eq!(ed.active_id(), ItemId(2));
    }

    #[test]
    fn sentinel_cannot_be_removed() {
        let mut ed = editor(4, 0);
        assert_eq!(
            ed.remove_item(ItemId(0), Instant::now()),
            Err(IgnoredReason::Sentinel)
        );
    }

    #[test]
    fn changes_need_edit_mode() {
        let mut ed = editor(4, 0);
        ed.toggle_editing().unwrap();
        assert_eq!(
            ed.add_item(ItemId(7), Instant::now()),
            Err(IgnoredReason::NotEditing)
        );
    }
}
