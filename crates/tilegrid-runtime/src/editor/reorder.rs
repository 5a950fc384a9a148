#![forbid(unsafe_code)]

//! Drag-to-reorder within the selected section.
//!
//! A drag owns a working copy of the selected list. Each `Dragging` offset is
//! mapped to a grid slot by the dragged cell's center; crossing into a new
//! legal slot starts one shift step:
//!
//! ```text
//! new > old:  cells old+1..=new each move one slot toward old
//! new < old:  cells new..old   each move one slot toward old
//! ```
//!
//! The step's animations join on a [`TaskGroup`]; only when it drains is the
//! working order rotated. Offsets that arrive mid-step are coalesced (the
//! latest wins) and evaluated after the barrier. A drag end during a step
//! commits after the barrier.

use tilegrid_core::item::{Item, ItemId};
use tilegrid_layout::GridSlot;
use web_time::Instant;

use super::{GridEditor, IgnoredReason, Operation, OperationState};
use crate::collaborators::{SelectionObserver, SelectionStore};
use crate::driver::{AnimationRequest, AnimationTarget, TaskGroup};

/// Where the dragged cell is currently parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraggedCell {
    pub item_id: ItemId,
    /// Committed index the drag offsets are measured from.
    pub origin_index: usize,
    /// Slot the cell occupies in the working order. Changes only when the
    /// live position enters a different legal slot.
    pub placed: GridSlot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct DragOffset {
    item_id: ItemId,
    dx: f64,
    dy: f64,
}

#[derive(Debug)]
pub(super) struct ShiftStep {
    group: TaskGroup,
    from: usize,
    to: usize,
}

#[derive(Debug)]
pub(super) struct DragSession {
    tracked: DraggedCell,
    working: Vec<Item>,
    step: Option<ShiftStep>,
    pending: Option<DragOffset>,
    end_requested: bool,
}

impl DragSession {
    fn new(tracked: DraggedCell, working: Vec<Item>) -> Self {
        Self {
            tracked,
            working,
            step: None,
            pending: None,
            end_requested: false,
        }
    }

    /// Move the cell at `step.from` to `step.to`, shifting the cells between.
    fn finish_step(&mut self, step: ShiftStep) {
        if step.to > step.from {
            self.working[step.from..=step.to].rotate_left(1);
        } else {
            self.working[step.to..=step.from].rotate_right(1);
        }
    }
}

impl<S: SelectionStore, O: SelectionObserver> GridEditor<S, O> {
    /// In-flight order of the selected section, while a drag is active.
    #[must_use]
    pub fn working_order(&self) -> Option<&[Item]> {
        match &self.operation {
            Operation::Dragging(session) => Some(&session.working),
            _ => None,
        }
    }

    /// Parked state of the dragged cell, while a drag is active.
    #[must_use]
    pub fn dragged_cell(&self) -> Option<DraggedCell> {
        match &self.operation {
            Operation::Dragging(session) => Some(session.tracked),
            _ => None,
        }
    }

    pub(super) fn begin_drag(&mut self, id: ItemId) -> Result<(), IgnoredReason> {
        self.ensure_idle()?;
        let Some(index) = self.selected.iter().position(|item| item.id == id) else {
            return self.ignore(IgnoredReason::UnknownItem(id));
        };
        if self.selected[index].is_sentinel() {
            return self.ignore(IgnoredReason::Sentinel);
        }
        let tracked = DraggedCell {
            item_id: id,
            origin_index: index,
            placed: self.metrics.selected_grid().slot_of(index),
        };
        self.operation = Operation::Dragging(DragSession::new(tracked, self.selected.clone()));
        tracing::debug!(target: "tilegrid.reorder", item = %id, index, "drag started");
        Ok(())
    }

    pub(super) fn drag_moved(&mut self, id: ItemId, dx: f64, dy: f64, now: Instant) {
        match self.operation_state() {
            OperationState::Idle => {
                if self.begin_drag(id).is_err() {
                    return;
                }
            }
            OperationState::Dragging => {}
            busy @ (OperationState::Adding | OperationState::Removing) => {
                let _ = self.ignore::<()>(IgnoredReason::Busy(busy));
                return;
            }
        }

        let offset = DragOffset { item_id: id, dx, dy };
        if let Operation::Dragging(session) = &mut self.operation {
            if session.end_requested {
                return;
            }
            if session.step.is_some() {
                session.pending = Some(offset);
                return;
            }
        }
        self.evaluate_offset(offset, now);
    }

    pub(super) fn drag_finished(&mut self, id: ItemId, terminated: bool) {
        let Operation::Dragging(session) = &mut self.operation else {
            tracing::trace!(target: "tilegrid.reorder", item = %id, "drag end without an active drag");
            return;
        };
        let pending_from = session.pending.map(|offset| offset.item_id);
        if id != session.tracked.item_id && pending_from != Some(id) {
            tracing::trace!(
                target: "tilegrid.reorder",
                item = %id,
                dragged = %session.tracked.item_id,
                "drag end from a cell that is not being dragged"
            );
            return;
        }
        session.pending = None;
        if session.step.is_some() {
            tracing::debug!(target: "tilegrid.reorder", item = %id, "drag ended mid-step, committing after barrier");
            session.end_requested = true;
            return;
        }
        if terminated {
            tracing::debug!(target: "tilegrid.reorder", item = %id, "drag terminated, committing working order");
        }
        self.commit_drag();
    }

    /// Drain a finished shift step, then replay a coalesced offset or a
    /// deferred end.
    pub(super) fn settle_drag(&mut self, now: Instant) {
        loop {
            let Operation::Dragging(session) = &mut self.operation else {
                return;
            };
            if let Some(step) = &session.step {
                if !step.group.is_complete(&self.driver) {
                    return;
                }
            }
            if let Some(step) = session.step.take() {
                session.finish_step(step);
            }
            if session.end_requested {
                self.commit_drag();
                return;
            }
            match session.pending.take() {
                Some(offset) => self.evaluate_offset(offset, now),
                None => return,
            }
        }
    }

    fn evaluate_offset(&mut self, offset: DragOffset, now: Instant) {
        let grid = self.metrics.selected_grid();
        let speed = self.config.drag_speed.to_speed();
        let Operation::Dragging(session) = &mut self.operation else {
            return;
        };

        if offset.item_id != session.tracked.item_id {
            let Some(index) = session
                .working
                .iter()
                .position(|item| item.id == offset.item_id)
            else {
                return;
            };
            let origin_index = self
                .selected
                .iter()
                .position(|item| item.id == offset.item_id)
                .unwrap_or(index);
            tracing::debug!(
                target: "tilegrid.reorder",
                stale = %session.tracked.item_id,
                item = %offset.item_id,
                "drag event from another cell, re-seeding"
            );
            session.tracked = DraggedCell {
                item_id: offset.item_id,
                origin_index,
                placed: grid.slot_of(index),
            };
            return;
        }

        let live = grid
            .position_of(session.tracked.origin_index)
            .offset(offset.dx, offset.dy);
        let slot = grid.slot_at(live);
        let Some(new_index) = grid.target_index(slot, session.working.len()) else {
            self.stats.rejected_targets += 1;
            tracing::trace!(target: "tilegrid.reorder", row = slot.row, col = slot.col, "drag target rejected");
            return;
        };
        if slot == session.tracked.placed {
            return;
        }
        let Ok(old_index) = usize::try_from(grid.index_of(session.tracked.placed)) else {
            return;
        };
        session.tracked.placed = slot;

        let moves: Vec<(usize, usize)> = if new_index > old_index {
            (old_index + 1..=new_index).map(|i| (i, i - 1)).collect()
        } else {
            (new_index..old_index).map(|j| (j, j + 1)).collect()
        };
        let mut group = TaskGroup::new();
        for (from, to) in moves {
            let target = AnimationTarget::Cell(session.working[from].id);
            group.spawn(
                &mut self.driver,
                AnimationRequest::new(target, grid.position_of(from), grid.position_of(to))
                    .overshoot(false)
                    .speed(speed),
                now,
            );
        }
        tracing::debug!(
            target: "tilegrid.reorder",
            item = %offset.item_id,
            from = old_index,
            to = new_index,
            animations = group.len(),
            "shift step started"
        );
        session.step = Some(ShiftStep {
            group,
            from: old_index,
            to: new_index,
        });
        self.stats.shift_steps += 1;
    }

    fn commit_drag(&mut self) {
        let Operation::Dragging(session) = std::mem::replace(&mut self.operation, Operation::Idle)
        else {
            return;
        };
        self.selected = session.working;
        self.stats.commits += 1;
        tracing::info!(
            target: "tilegrid.reorder",
            order = ?self.selected.iter().map(|item| item.id.0).collect::<Vec<_>>(),
            "drag committed"
        );
        self.persist_selection();
        self.rebuild();
    }
}
