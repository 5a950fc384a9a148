#![forbid(unsafe_code)]

//! The two-section grid editor.
//!
//! [`GridEditor`] owns the committed selected and unselected lists, one
//! [`HoldDragRecognizer`] per draggable cell, the [`AnimationDriver`], and the
//! handle registry. It is driven entirely by the host:
//!
//! - [`handle_touch`](GridEditor::handle_touch) for every touch on a cell,
//! - [`tick`](GridEditor::tick) once per frame,
//! - the request methods ([`select`](GridEditor::select),
//!   [`add_item`](GridEditor::add_item), [`remove_item`](GridEditor::remove_item),
//!   [`toggle_editing`](GridEditor::toggle_editing),
//!   [`apply_catalog`](GridEditor::apply_catalog)).
//!
//! # Operations
//!
//! Drag, add and remove are mutually exclusive. While one runs, the others
//! are refused with [`IgnoredReason::Busy`]. Each operation animates first and
//! mutates the committed lists only after its [`TaskGroup`] barrier drains;
//! every commit rebuilds the view (new `generation`, handles snapped back to
//! their committed positions, recognizers recreated).
//!
//! # Invariants
//!
//! 1. The sentinel item is never removed and never moved.
//! 2. A drag's working order is a permutation of the committed order at drag
//!    start.
//! 3. No committed list changes while a barrier is pending.
//! 4. Collaborator failures are logged and never surface as errors.

mod reorder;
mod structural;

pub use reorder::DraggedCell;

use std::collections::BTreeMap;
use std::fmt;

use tilegrid_core::animation::{AnimationError, AnimationSpeed};
use tilegrid_core::event::TouchEvent;
use tilegrid_core::geometry::Point;
use tilegrid_core::gesture::{CellGesture, GestureOutput, GesturePhase, HoldDragRecognizer};
use tilegrid_core::item::{Item, ItemId};
use tilegrid_core::style::LiveStyle;
use tilegrid_layout::SectionMetrics;
use web_time::Instant;

use crate::collaborators::{Catalog, CollaboratorError, SelectionObserver, SelectionStore};
use crate::config::EditorConfig;
use crate::driver::{AnimationDriver, AnimationId, AnimationRequest, AnimationTarget};
use crate::handles::{CellHandle, HandleRegistry};
use crate::view::{CellView, ViewModel};

use reorder::DragSession;
use structural::PendingChange;

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// Which operation currently owns the lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Dragging,
    Adding,
    Removing,
}

/// Why a request had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Another operation is in flight.
    Busy(OperationState),
    /// The request needs edit mode.
    NotEditing,
    /// The request is only valid outside edit mode.
    Editing,
    /// No such item in the relevant section.
    UnknownItem(ItemId),
    /// The sentinel cannot be removed or dragged.
    Sentinel,
    /// The cell has no gesture recognizer right now.
    NotDraggable(ItemId),
}

impl fmt::Display for IgnoredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy(state) => write!(f, "busy ({state:?})"),
            Self::NotEditing => write!(f, "not in edit mode"),
            Self::Editing => write!(f, "in edit mode"),
            Self::UnknownItem(id) => write!(f, "unknown item {id}"),
            Self::Sentinel => write!(f, "sentinel item is locked"),
            Self::NotDraggable(id) => write!(f, "item {id} is not draggable"),
        }
    }
}

/// Counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorStats {
    /// Shift steps started during drags.
    pub shift_steps: u64,
    /// Drag positions that mapped to no legal target.
    pub rejected_targets: u64,
    /// Commits of any kind (drag end, add, remove).
    pub commits: u64,
    pub adds: u64,
    pub removes: u64,
    /// Requests refused with an [`IgnoredReason`].
    pub ignored: u64,
}

#[derive(Debug)]
enum Operation {
    Idle,
    Dragging(DragSession),
    Structural(PendingChange),
}

// ---------------------------------------------------------------------------
// GridEditor
// ---------------------------------------------------------------------------

/// Orchestrates gestures, animations, and commits for both sections.
pub struct GridEditor<S, O> {
    config: EditorConfig,
    metrics: SectionMetrics,
    store: S,
    observer: O,

    selected: Vec<Item>,
    unselected: Vec<Item>,
    active_id: ItemId,
    editing: bool,
    generation: u64,
    recently_added: Vec<ItemId>,

    recognizers: BTreeMap<ItemId, HoldDragRecognizer>,
    handles: HandleRegistry,
    driver: AnimationDriver,
    operation: Operation,
    stats: EditorStats,
}

impl<S: SelectionStore, O: SelectionObserver> fmt::Debug for GridEditor<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridEditor")
            .field("selected", &self.selected.len())
            .field("unselected", &self.unselected.len())
            .field("active_id", &self.active_id)
            .field("editing", &self.editing)
            .field("generation", &self.generation)
            .field("operation", &self.operation_state())
            .finish()
    }
}

impl<S: SelectionStore, O: SelectionObserver> GridEditor<S, O> {
    /// Create an editor and load the persisted selection and active id.
    ///
    /// A missing or unreadable selection falls back to
    /// [`EditorConfig::default_selection`]; a missing active id falls back to
    /// the sentinel. The unselected section stays empty until a catalog is
    /// applied.
    pub fn new(config: EditorConfig, store: S, observer: O) -> Self {
        let metrics = config.metrics();
        let mut editor = Self {
            config,
            metrics,
            store,
            observer,
            selected: Vec::new(),
            unselected: Vec::new(),
            active_id: ItemId::SENTINEL,
            editing: false,
            generation: 0,
            recently_added: Vec::new(),
            recognizers: BTreeMap::new(),
            handles: HandleRegistry::new(),
            driver: AnimationDriver::new(),
            operation: Operation::Idle,
            stats: EditorStats::default(),
        };
        editor.load_persisted();
        editor
    }

    fn load_persisted(&mut self) {
        self.active_id = match self.store.load_active_id() {
            Ok(id) => id.unwrap_or(ItemId::SENTINEL),
            Err(err) => {
                tracing::warn!(target: "tilegrid.persist", error = %err, "failed to load active id");
                ItemId::SENTINEL
            }
        };

        let persisted = match self.store.load_selection() {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(target: "tilegrid.persist", error = %err, "failed to load selection");
                None
            }
        };
        match persisted {
            Some(items) => self.selected = items,
            None => {
                tracing::debug!(target: "tilegrid.persist", "no persisted selection, using defaults");
                self.selected = self.config.default_selection.clone();
                self.persist_selection();
            }
        }

        if !self.selected.iter().any(Item::is_sentinel) {
            let sentinel = self
                .config
                .default_selection
                .iter()
                .find(|item| item.is_sentinel())
                .cloned()
                .unwrap_or_else(|| Item::new(ItemId::SENTINEL, ""));
            self.selected.insert(0, sentinel);
        }
    }

    // -----------------------------------------------------------------------
    // Catalog, edit mode, selection
    // -----------------------------------------------------------------------

    /// Apply the result of a catalog fetch.
    ///
    /// On success, selected items missing from the catalog are dropped (the
    /// sentinel always stays), the cleaned selection is persisted, and the
    /// unselected section becomes every catalog item not selected, in catalog
    /// order. On failure the unselected section is empty and the selection
    /// is left alone.
    pub fn apply_catalog(
        &mut self,
        fetched: Result<Vec<Item>, CollaboratorError>,
    ) -> Result<(), IgnoredReason> {
        self.ensure_idle()?;
        match fetched {
            Ok(catalog) => {
                let active = self.active_id;
                let mut active_dropped = false;
                self.selected.retain(|item| {
                    let keep = item.is_sentinel() || catalog.iter().any(|c| c.id == item.id);
                    if !keep {
                        tracing::debug!(target: "tilegrid.reorder", item = %item.id, "dropping item no longer in catalog");
                        active_dropped |= item.id == active;
                    }
                    keep
                });
                if active_dropped {
                    self.active_id = ItemId::SENTINEL;
                }
                let selected = &self.selected;
                self.unselected = catalog
                    .into_iter()
                    .filter(|item| !selected.iter().any(|s| s.id == item.id))
                    .collect();
                self.persist_selection();
            }
            Err(err) => {
                tracing::warn!(target: "tilegrid.persist", error = %err, "catalog fetch failed, treating as empty");
                self.unselected.clear();
            }
        }
        self.rebuild();
        Ok(())
    }

    /// Fetch from `catalog` and apply the result.
    pub fn refresh_catalog(&mut self, catalog: &mut dyn Catalog) -> Result<(), IgnoredReason> {
        self.ensure_idle()?;
        let fetched = catalog.fetch();
        self.apply_catalog(fetched)
    }

    /// Enter or leave edit mode. Returns the new mode.
    pub fn toggle_editing(&mut self) -> Result<bool, IgnoredReason> {
        self.ensure_idle()?;
        self.editing = !self.editing;
        self.reset_recognizers();
        tracing::debug!(target: "tilegrid.reorder", editing = self.editing, "edit mode toggled");
        Ok(self.editing)
    }

    /// Make `id` the active item (outside edit mode).
    ///
    /// The observer is notified only once the new id has been persisted.
    pub fn select(&mut self, id: ItemId) -> Result<(), IgnoredReason> {
        if self.editing {
            return self.ignore(IgnoredReason::Editing);
        }
        if !self.selected.iter().any(|item| item.id == id) {
            return self.ignore(IgnoredReason::UnknownItem(id));
        }
        match self.store.save_active_id(id) {
            Ok(()) => {
                self.active_id = id;
                tracing::debug!(target: "tilegrid.persist", item = %id, "active item changed");
                self.observer.on_active_item_changed(id);
            }
            Err(err) => {
                tracing::warn!(target: "tilegrid.persist", item = %id, error = %err, "failed to save active id");
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input and frames
    // -----------------------------------------------------------------------

    /// Feed one touch event to the recognizer of cell `id`.
    pub fn handle_touch(
        &mut self,
        id: ItemId,
        event: &TouchEvent,
        now: Instant,
    ) -> Result<(), IgnoredReason> {
        self.advance(now);
        let Some(recognizer) = self.recognizers.get_mut(&id) else {
            return self.ignore(IgnoredReason::NotDraggable(id));
        };
        let outputs = recognizer.process(event, now);
        self.route(id, outputs, now);
        Ok(())
    }

    /// Fire due hold timers, release due animation frames, and settle any
    /// operation whose barrier has drained.
    pub fn tick(&mut self, now: Instant) {
        let mut fired = Vec::new();
        for (id, recognizer) in &mut self.recognizers {
            let outputs = recognizer.poll(now);
            if !outputs.is_empty() {
                fired.push((*id, outputs));
            }
        }
        for (id, outputs) in fired {
            self.route(id, outputs, now);
        }
        self.advance(now);
    }

    fn advance(&mut self, now: Instant) {
        let frames = self.driver.tick(now);
        if !frames.is_empty() {
            self.handles.apply_frames(&frames);
        }
        self.settle_drag(now);
        self.settle_structural();
    }

    fn route(&mut self, id: ItemId, outputs: Vec<GestureOutput>, now: Instant) {
        for output in outputs {
            match output {
                GestureOutput::Style(style) => {
                    self.handles
                        .apply_live_style(AnimationTarget::Cell(id), style);
                }
                GestureOutput::Gesture(gesture) => self.on_gesture(id, gesture, now),
            }
        }
    }

    fn on_gesture(&mut self, id: ItemId, gesture: CellGesture, now: Instant) {
        tracing::trace!(target: "tilegrid.gesture", item = %id, ?gesture, "cell gesture");
        match gesture {
            // A tap on a selected cell in edit mode is the remove affordance.
            CellGesture::Tap => {
                if let Err(reason) = self.remove_item(id, now) {
                    tracing::trace!(target: "tilegrid.gesture", item = %id, ?reason, "tap not applied");
                }
            }
            CellGesture::DragStart => {
                if let Err(reason) = self.begin_drag(id) {
                    tracing::trace!(target: "tilegrid.gesture", item = %id, ?reason, "drag start not applied");
                }
            }
            CellGesture::Dragging { dx, dy } => self.drag_moved(id, dx, dy, now),
            CellGesture::DragEnd => self.drag_finished(id, false),
            CellGesture::DragTerminated => self.drag_finished(id, true),
        }
    }

    // -----------------------------------------------------------------------
    // Handles
    // -----------------------------------------------------------------------

    /// Mount the handle for cell `id` at its committed position.
    pub fn mount_cell(&mut self, id: ItemId, handle: Box<dyn CellHandle>) {
        let position = self.committed_position(id).unwrap_or(Point::ZERO);
        self.handles
            .mount(AnimationTarget::Cell(id), handle, position);
    }

    /// Mount the handle of the floating unselected header.
    pub fn mount_header(&mut self, handle: Box<dyn CellHandle>) {
        let position = self.header_position();
        self.handles
            .mount(AnimationTarget::UnselectedHeader, handle, position);
    }

    pub fn unmount_cell(&mut self, id: ItemId) -> Option<Box<dyn CellHandle>> {
        self.handles.unmount(AnimationTarget::Cell(id))
    }

    pub fn unmount_header(&mut self) -> Option<Box<dyn CellHandle>> {
        self.handles.unmount(AnimationTarget::UnselectedHeader)
    }

    /// Animate a mounted target from its last known position to `to`.
    pub fn animate_to(
        &mut self,
        target: AnimationTarget,
        to: Point,
        overshoot: bool,
        speed: AnimationSpeed,
        now: Instant,
    ) -> Result<AnimationId, AnimationError> {
        let from = self.handles.position(target).unwrap_or(to);
        self.driver.start(
            AnimationRequest::new(target, from, to)
                .overshoot(overshoot)
                .speed(speed),
            now,
        )
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Render-ready snapshot of the committed layout.
    #[must_use]
    pub fn view_model(&self) -> ViewModel {
        let sel_grid = self.metrics.selected_grid();
        let uns_grid = self.metrics.unselected_grid(self.selected.len());
        let selected = self
            .selected
            .iter()
            .enumerate()
            .map(|(i, item)| CellView {
                item: item.clone(),
                position: sel_grid.position_of(i),
                is_editable: self.editing && !item.is_sentinel(),
                is_active: item.id == self.active_id,
            })
            .collect();
        let unselected = self
            .unselected
            .iter()
            .enumerate()
            .map(|(i, item)| CellView {
                item: item.clone(),
                position: uns_grid.position_of(i),
                is_editable: false,
                is_active: false,
            })
            .collect();
        ViewModel {
            generation: self.generation,
            editing: self.editing,
            selected,
            unselected,
            unselected_header_top: self.metrics.unselected_header_top(self.selected.len()),
            content_height: self
                .metrics
                .content_height(self.selected.len(), self.unselected.len()),
        }
    }

    /// Committed selected list.
    #[must_use]
    pub fn selected(&self) -> &[Item] {
        &self.selected
    }

    /// Committed unselected list.
    #[must_use]
    pub fn unselected(&self) -> &[Item] {
        &self.unselected
    }

    #[must_use]
    pub fn active_id(&self) -> ItemId {
        self.active_id
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn stats(&self) -> EditorStats {
        self.stats
    }

    #[must_use]
    pub fn metrics(&self) -> &SectionMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn operation_state(&self) -> OperationState {
        match &self.operation {
            Operation::Idle => OperationState::Idle,
            Operation::Dragging(_) => OperationState::Dragging,
            Operation::Structural(change) => change.state(),
        }
    }

    /// Whether no operation and no animation is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.operation, Operation::Idle) && self.driver.is_idle()
    }

    /// Gesture phase of cell `id`, if it has a recognizer.
    #[must_use]
    pub fn gesture_phase(&self, id: ItemId) -> Option<GesturePhase> {
        self.recognizers.get(&id).map(HoldDragRecognizer::phase)
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.recognizers
            .values()
            .filter_map(HoldDragRecognizer::next_deadline)
            .chain(self.driver.next_due())
            .min()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ignore<T>(&mut self, reason: IgnoredReason) -> Result<T, IgnoredReason> {
        self.stats.ignored += 1;
        tracing::debug!(target: "tilegrid.reorder", %reason, "request ignored");
        Err(reason)
    }

    fn ensure_idle(&mut self) -> Result<(), IgnoredReason> {
        match self.operation_state() {
            OperationState::Idle => Ok(()),
            busy => self.ignore(IgnoredReason::Busy(busy)),
        }
    }

    fn committed_position(&self, id: ItemId) -> Option<Point> {
        if let Some(i) = self.selected.iter().position(|item| item.id == id) {
            return Some(self.metrics.selected_grid().position_of(i));
        }
        self.unselected
            .iter()
            .position(|item| item.id == id)
            .map(|i| self.metrics.unselected_grid(self.selected.len()).position_of(i))
    }

    fn header_position(&self) -> Point {
        Point::new(0.0, self.metrics.unselected_header_top(self.selected.len()))
    }

    /// Start a new view generation from the committed lists.
    fn rebuild(&mut self) {
        self.generation += 1;
        let sel_grid = self.metrics.selected_grid();
        let uns_grid = self.metrics.unselected_grid(self.selected.len());
        let placements = self
            .selected
            .iter()
            .enumerate()
            .map(|(i, item)| (AnimationTarget::Cell(item.id), sel_grid.position_of(i)))
            .chain(
                self.unselected
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (AnimationTarget::Cell(item.id), uns_grid.position_of(i))),
            )
            .chain(std::iter::once((
                AnimationTarget::UnselectedHeader,
                self.header_position(),
            )))
            .collect::<Vec<_>>();
        for (target, position) in placements {
            self.handles.set_position(target, position);
            self.handles.apply_live_style(target, LiveStyle::neutral());
        }
        self.reset_recognizers();
        tracing::debug!(target: "tilegrid.reorder", generation = self.generation, "view rebuilt");
    }

    fn reset_recognizers(&mut self) {
        self.recognizers.clear();
        if !self.editing {
            return;
        }
        let hold = self.config.hold_config();
        for item in self.selected.iter().filter(|item| !item.is_sentinel()) {
            self.recognizers
                .insert(item.id, HoldDragRecognizer::new(hold));
        }
    }

    fn persist_selection(&mut self) {
        if let Err(err) = self.store.save_selection(&self.selected) {
            tracing::warn!(target: "tilegrid.persist", error = %err, "failed to save selection");
        }
    }

    /// Persist the most recently added item that is still selected, or the
    /// active item if there is none.
    fn persist_focus(&mut self) {
        let focus = self
            .recently_added
            .iter()
            .rev()
            .copied()
            .find(|id| self.selected.iter().any(|item| item.id == *id))
            .unwrap_or(self.active_id);
        if let Err(err) = self.store.save_active_id(focus) {
            tracing::warn!(target: "tilegrid.persist", item = %focus, error = %err, "failed to save active id");
        }
    }
}
