// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture admission, taps and editing mode.

use kurbo::Point;
use mosaic_layout::Layout;
use mosaic_pool::{CellContent, CellId};

use crate::{DataSource, GridView};

/// The recognizers a host wires to a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Single tap.
    Tap,
    /// Press and hold; arms drag-reorder.
    LongPress,
    /// Pan that moves a picked-up item.
    SortingPan,
    /// Two-finger pinch.
    Pinch,
    /// Two-finger rotation.
    Rotation,
    /// Two-finger pan of a transforming item.
    TransformPan,
}

impl GestureKind {
    /// Returns `true` for the two-finger transform gestures.
    pub const fn is_transform(self) -> bool {
        matches!(self, Self::Pinch | Self::Rotation | Self::TransformPan)
    }
}

/// Lifecycle phase of a continuous gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// The recognizer started.
    Began,
    /// The touch moved.
    Changed,
    /// The touch lifted.
    Ended,
    /// The platform cancelled the gesture.
    Cancelled,
    /// The recognizer gave up.
    Failed,
}

impl GesturePhase {
    /// Returns `true` for `Ended`, `Cancelled` and `Failed`, which the grid
    /// treats alike.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

impl<V: CellContent, D: DataSource<V>> GridView<V, D> {
    /// Decides whether a recognizer may begin.
    ///
    /// Hosts call this before letting any recognizer start; `touches` are the
    /// touch locations in content coordinates.
    pub fn should_begin(&self, kind: GestureKind, touches: &[Point]) -> bool {
        let first = touches.first().copied();
        match kind {
            GestureKind::Tap => {
                if self.editing && self.config.disable_edit_on_empty_space_tap {
                    first.is_some_and(|point| self.layout.index_at_point(point).is_none())
                } else {
                    !self.scrolling && !self.editing && !self.long_press_active
                }
            }
            GestureKind::LongPress => {
                (self.sorting.is_some() || self.config.enable_edit_on_long_press)
                    && !self.scrolling
                    && !self.editing
                    && !self.transform.is_active()
            }
            GestureKind::SortingPan => self.sort.moving().is_some() && self.long_press_active,
            GestureKind::Pinch | GestureKind::Rotation | GestureKind::TransformPan => {
                if self.transformer.is_none() || touches.len() != 2 || self.editing {
                    return false;
                }
                if !self.sort.is_idle() {
                    return false;
                }
                if self.transform.is_transforming() {
                    return true;
                }
                if self.transform.is_active() {
                    return false;
                }
                let first = self.layout.index_at_point(touches[0]);
                first.is_some() && first == self.layout.index_at_point(touches[1])
            }
        }
    }

    /// Feeds a recognized tap at `point`.
    pub fn tap(&mut self, point: Point) {
        match self.layout.index_at_point(point) {
            Some(index) => {
                if self.editing {
                    return;
                }
                if let Some(id) = self.pool.cell_at(index) {
                    if let Some(cell) = self.pool.get_mut(id) {
                        cell.highlighted = false;
                    }
                }
                if let Some(delegate) = self.action.as_mut() {
                    delegate.on_tap(index);
                }
            }
            None => {
                if let Some(delegate) = self.action.as_mut() {
                    delegate.on_tap_empty_space();
                }
                if self.editing && self.config.disable_edit_on_empty_space_tap {
                    self.set_editing(false);
                }
            }
        }
    }

    /// Shows or clears touch-down feedback on a cell.
    pub fn set_highlighted(&mut self, id: CellId, highlighted: bool) {
        if let Some(cell) = self.pool.get_mut(id) {
            cell.highlighted = highlighted;
        }
    }

    /// Switches editing mode.
    ///
    /// Has no effect without an action delegate or while an item is being
    /// transformed.
    pub fn set_editing(&mut self, editing: bool) {
        if editing == self.editing || self.transform.is_active() {
            return;
        }
        let Some(delegate) = self.action.as_mut() else {
            return;
        };
        self.editing = editing;
        for (_, cell) in self.pool.iter_mut() {
            cell.editing = editing
                && cell
                    .index()
                    .is_some_and(|index| self.data_source.can_delete(index));
        }
        delegate.on_editing_changed(editing);
        log::debug!("editing {}", if editing { "on" } else { "off" });
    }

    /// Reports that the delete affordance of `id` was pressed.
    pub fn request_delete(&mut self, id: CellId) {
        let Some(index) = self.pool.index_of(id) else {
            return;
        };
        if !self.data_source.can_delete(index) {
            return;
        }
        if let Some(delegate) = self.action.as_mut() {
            delegate.on_delete_requested(index);
        }
    }
}
