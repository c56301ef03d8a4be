// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-reorder: long press to pick an item up, pan to move it, release to drop.
//!
//! While dragged, a cell lives in the overlay but stays bound to the index it
//! will land on, so the index map never has a hole and a load pass never
//! materializes a second cell for that slot.

use core::time::Duration;

use kurbo::{Point, Vec2};
use mosaic_layout::Layout;
use mosaic_pool::{CellContent, CellHost, CellId};

use crate::request::{Animation, Transition};
use crate::{AnimationSubject, DataSource, GesturePhase, GridView, HostRequest, SortStyle};

/// Progress of the drag-reorder interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortState {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// A long press picked up `cell`; no pan has started yet.
    Armed {
        /// The picked-up cell.
        cell: CellId,
    },
    /// `cell` follows the touch.
    Dragging {
        /// The dragged cell.
        cell: CellId,
    },
    /// `cell` was released and is animating into its slot.
    Settling {
        /// The dropped cell.
        cell: CellId,
    },
}

impl SortState {
    /// The cell involved, if any.
    pub fn cell(self) -> Option<CellId> {
        match self {
            Self::Idle => None,
            Self::Armed { cell } | Self::Dragging { cell } | Self::Settling { cell } => Some(cell),
        }
    }

    /// The cell following the touch, if one is picked up.
    pub fn moving(self) -> Option<CellId> {
        match self {
            Self::Armed { cell } | Self::Dragging { cell } => Some(cell),
            Self::Idle | Self::Settling { .. } => None,
        }
    }

    /// Returns `true` when no drag is in progress or settling.
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Bookkeeping for the autoscroll loop that runs while dragging.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Autoscroll {
    /// The loop keeps rescheduling itself while set.
    pub(crate) active: bool,
    /// Bumped per drag so that ticks left over from an earlier drag die.
    pub(crate) session: u32,
    /// Last known touch, in viewport coordinates.
    pub(crate) touch: Point,
}

impl<V: CellContent, D: DataSource<V>> GridView<V, D> {
    /// The index the dragged item will land on if released now.
    pub fn sort_future_position(&self) -> Option<usize> {
        self.sort.cell().and_then(|id| self.pool.index_of(id))
    }

    /// Feeds the long-press recognizer. `point` is in content coordinates.
    pub fn long_press(&mut self, phase: GesturePhase, point: Point) {
        if self.config.enable_edit_on_long_press && !self.editing {
            if phase == GesturePhase::Began && self.layout.index_at_point(point).is_some() {
                self.set_editing(true);
            }
            return;
        }
        match phase {
            GesturePhase::Began => {
                self.long_press_active = true;
                if self.sort.is_idle() {
                    if let Some(index) = self.layout.index_at_point(point) {
                        self.sorting_start(index);
                    }
                }
            }
            GesturePhase::Changed => {}
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed => {
                self.long_press_active = false;
                self.autoscroll.active = false;
                self.sorting_stop();
            }
        }
    }

    /// Feeds the pan recognizer that drives a picked-up item.
    ///
    /// `point` is the touch in content coordinates and `translation` the
    /// distance travelled since the pan began.
    pub fn sorting_pan(&mut self, phase: GesturePhase, point: Point, translation: Vec2) {
        match phase {
            GesturePhase::Began => {
                if let SortState::Armed { cell } = self.sort {
                    self.sort = SortState::Dragging { cell };
                }
                self.autoscroll.session = self.autoscroll.session.wrapping_add(1);
                self.autoscroll.active = true;
                self.autoscroll.touch = point - self.content_offset.to_vec2();
                self.autoscroll_check();
            }
            GesturePhase::Changed => {
                self.autoscroll.touch = point - self.content_offset.to_vec2();
                let Some(id) = self.sort.moving() else {
                    return;
                };
                if let Some(cell) = self.pool.get_mut(id) {
                    cell.drag_translation = translation;
                }
                self.sorting_continue(point);
            }
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed => {
                self.autoscroll.active = false;
            }
        }
    }

    fn sorting_start(&mut self, index: usize) {
        let Some(id) = self.pool.cell_at(index) else {
            return;
        };
        let Some(delegate) = self.sorting.as_mut() else {
            return;
        };
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        cell.frame = self.overlay.to_overlay(cell.frame, self.content_offset);
        cell.host = CellHost::Overlay;
        cell.drag_translation = Vec2::ZERO;
        delegate.on_drag_start(cell);
        cell.shaking = delegate.allow_shaking(cell, index);
        self.sort = SortState::Armed { cell: id };
        log::debug!("drag armed at index {index}");
    }

    fn sorting_continue(&mut self, point: Point) {
        let Some(id) = self.sort.moving() else {
            return;
        };
        let Some(future) = self.pool.index_of(id) else {
            return;
        };
        let Some(position) = self.layout.index_at_point(point) else {
            return;
        };
        if position == future || position >= self.item_count {
            return;
        }
        // The target slot may be empty if its cell was never supplied.
        let occupant = self.pool.cell_at(position);
        let vacated = self.layout.frame_for_index(future);
        let Some(delegate) = self.sorting.as_mut() else {
            log::warn!("sorting delegate went away during a drag");
            return;
        };
        match self.config.style {
            SortStyle::Push => {
                self.pool.move_index(future, position);
                delegate.on_move(future, position);
                self.relayout(true);
            }
            SortStyle::Swap => {
                self.pool.swap_indices(future, position);
                delegate.on_exchange(future, position);
                if let Some(occupant) = occupant {
                    if let Some(cell) = self.pool.get_mut(occupant) {
                        cell.frame = vacated;
                    }
                    let duration = self.config.animation_duration;
                    self.animate(AnimationSubject::Cell(occupant), duration, None);
                }
            }
        }
        log::trace!("drag target moved from {future} to {position}");
    }

    fn sorting_stop(&mut self) {
        let Some(id) = self.sort.moving() else {
            return;
        };
        let Some(future) = self.pool.index_of(id) else {
            self.sort = SortState::Idle;
            return;
        };
        let frame = self.layout.frame_for_index(future);
        if let Some(cell) = self.pool.get_mut(id) {
            cell.shaking = false;
            cell.host = CellHost::Container;
            cell.drag_translation = Vec2::ZERO;
            cell.frame = frame;
        }
        self.sort = SortState::Settling { cell: id };
        log::debug!("drag released at index {future}");
        let duration = self.config.animation_duration;
        self.animate(
            AnimationSubject::Cell(id),
            duration,
            Some(Transition::DragSettled { cell: id }),
        );
    }

    pub(crate) fn finish_drag(&mut self, id: CellId) {
        if self.sort != (SortState::Settling { cell: id }) {
            return;
        }
        if let (Some(delegate), Some(cell)) = (self.sorting.as_mut(), self.pool.get(id)) {
            delegate.on_drag_end(cell);
        }
        self.sort = SortState::Idle;
        log::debug!("drag settled");
    }

    /// Nudges the scroll offset when the touch nears a viewport edge, or
    /// schedules the next check.
    fn autoscroll_check(&mut self) {
        if !self.autoscroll.active || self.sort.moving().is_none() {
            return;
        }
        let touch = self.autoscroll.touch;
        let item = self.item_size;
        let max = self.max_offset();
        let mut target = self.content_offset;
        if touch.x + item.width > self.viewport.width {
            target.x = (target.x + item.width / 2.0).min(max.x);
        } else if touch.x - item.width <= 0.0 {
            target.x = (target.x - item.width / 2.0).max(0.0);
        }
        if touch.y + item.height > self.viewport.height {
            target.y = (target.y + item.height / 2.0).min(max.y);
        } else if touch.y - item.height <= 0.0 {
            target.y = (target.y - item.height / 2.0).max(0.0);
        }

        let session = self.autoscroll.session;
        if target != self.content_offset {
            self.content_offset = target;
            self.load_required_items();
            // Always round-trips through the host so a run of nudges cannot recurse.
            let token = self
                .outbox
                .park(Transition::AutoscrollStep { session, touch });
            self.outbox.push(HostRequest::Animate(Animation {
                token: Some(token),
                duration: self.config.animation_duration,
                delay: Duration::ZERO,
                subject: AnimationSubject::ContentOffset,
            }));
        } else {
            let token = self.outbox.park(Transition::AutoscrollPoll { session });
            self.outbox.push(HostRequest::Timer {
                token,
                delay: self.config.autoscroll_poll_interval,
            });
        }
    }

    pub(crate) fn autoscroll_step(&mut self, session: u32, touch: Point) {
        if session != self.autoscroll.session || !self.autoscroll.active {
            return;
        }
        self.sorting_continue(touch + self.content_offset.to_vec2());
        self.autoscroll_check();
    }

    pub(crate) fn autoscroll_poll(&mut self, session: u32) {
        if session != self.autoscroll.session {
            return;
        }
        self.autoscroll_check();
    }
}
