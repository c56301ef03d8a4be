// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits implemented by the embedding application.
//!
//! Only [`DataSource`] is required. The other delegates are optional; leaving
//! one unset disables the feature it drives (taps and editing, drag-reorder,
//! pinch-to-expand) without any other effect.

use kurbo::Size;
use mosaic_pool::{Cell, CellProvider};

use crate::SizeHint;

/// Supplies item count, geometry and cells.
///
/// Cells come from the [`CellProvider`] supertrait, which is handed the reuse
/// pool so that recycled cells are preferred over new ones.
pub trait DataSource<V>: CellProvider<V> {
    /// Number of items in the backing store.
    fn item_count(&self) -> usize;

    /// Size of every item for the given orientation and form factor.
    fn item_size(&self, hint: SizeHint) -> Size;

    /// Whether the item at `index` may be deleted while editing.
    fn can_delete(&self, index: usize) -> bool {
        let _ = index;
        true
    }
}

/// Receives taps and editing-mode changes.
pub trait ActionDelegate {
    /// An item was tapped outside editing mode.
    fn on_tap(&mut self, index: usize);

    /// A tap landed between items or outside the grid.
    fn on_tap_empty_space(&mut self) {}

    /// The delete affordance of a deletable item was pressed.
    ///
    /// The grid does not remove anything itself; call
    /// [`GridView::remove_at`](crate::GridView::remove_at) once the backing
    /// store has been updated.
    fn on_delete_requested(&mut self, index: usize) {
        let _ = index;
    }

    /// Editing mode was switched on or off.
    fn on_editing_changed(&mut self, editing: bool) {
        let _ = editing;
    }
}

/// Keeps the backing store in step with drag-reorder.
pub trait SortingDelegate<V> {
    /// The item at `from` now lives at `to`; items in between moved by one.
    fn on_move(&mut self, from: usize, to: usize);

    /// The items at `a` and `b` traded places.
    fn on_exchange(&mut self, a: usize, b: usize);

    /// A drag picked up `cell`.
    fn on_drag_start(&mut self, cell: &Cell<V>) {
        let _ = cell;
    }

    /// The dragged `cell` has settled into its slot.
    fn on_drag_end(&mut self, cell: &Cell<V>) {
        let _ = cell;
    }

    /// Whether the picked-up `cell` should wobble while it is dragged.
    fn allow_shaking(&mut self, cell: &Cell<V>, index: usize) -> bool {
        let _ = (cell, index);
        true
    }
}

/// Provides full-size content for pinch-to-expand.
pub trait TransformDelegate<V> {
    /// Size the full-size content wants.
    fn full_size(&mut self, cell: &Cell<V>, index: usize, hint: SizeHint) -> Size;

    /// Builds the full-size content for the item at `index`.
    fn full_size_view(&mut self, cell: &Cell<V>, index: usize) -> V;

    /// A transform started on `cell`.
    fn on_transform_start(&mut self, cell: &Cell<V>) {
        let _ = cell;
    }

    /// `cell` committed to full size.
    fn on_enter_full_size(&mut self, cell: &Cell<V>) {
        let _ = cell;
    }

    /// `cell` is back in the grid.
    fn on_transform_end(&mut self, cell: &Cell<V>) {
        let _ = cell;
    }
}
