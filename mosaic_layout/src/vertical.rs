// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use kurbo::{Point, Rect, Size, Vec2};

use crate::util::{ceil, ceil_to_isize, cell_coord, fit_count, floor_to_isize};
use crate::{Layout, LayoutConfig, LayoutKind, LayoutState};

/// Rows of items that fill left to right, scrolling vertically.
///
/// As many items as fit the viewport width (minus the minimum horizontal
/// insets) go in each row; item `i` lands in row `i / per_row`, column
/// `i % per_row`.
#[derive(Clone, Debug, Default)]
pub struct VerticalLayout {
    config: LayoutConfig,
    state: LayoutState,
    items_per_row: usize,
}

impl VerticalLayout {
    /// Creates an unconfigured vertical layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in each row, as of the last rebase.
    #[must_use]
    pub fn items_per_row(&self) -> usize {
        self.items_per_row.max(1)
    }
}

impl Layout for VerticalLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Vertical
    }

    fn configure(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn rebase(&mut self, item_count: usize, bounds: Rect) {
        self.state.begin(item_count, bounds);
        let config = self.config;
        let pitch = config.pitch();
        let available = bounds.width() - config.min_insets.x0 - config.min_insets.x1;
        self.items_per_row = fit_count(available, config.item_size.width, config.spacing);

        let per_row = self.items_per_row();
        let rows = item_count.div_ceil(per_row);
        let actual = Size::new(
            ceil(item_count.min(per_row) as f64 * pitch.x) - config.spacing,
            ceil(rows as f64 * pitch.y) - config.spacing,
        );
        self.state.settle(&config, bounds.size(), actual);
    }

    fn state(&self) -> &LayoutState {
        &self.state
    }

    fn origin_for_index(&self, index: usize) -> Point {
        let per_row = self.items_per_row();
        let pitch = self.config.pitch();
        let column = (index % per_row) as f64;
        let row = (index / per_row) as f64;
        self.state.tile_origin() + Vec2::new(column * pitch.x, row * pitch.y)
    }

    fn index_at_point(&self, point: Point) -> Option<usize> {
        let pitch = self.config.pitch();
        let local = point - self.state.tile_origin();
        let column = cell_coord(local.x, pitch.x)?;
        let row = cell_coord(local.y, pitch.y)?;
        let per_row = self.items_per_row();
        if column >= per_row {
            return None;
        }
        let index = row.checked_mul(per_row)?.checked_add(column)?;
        if index >= self.state.item_count || !self.frame_for_index(index).contains(point) {
            return None;
        }
        Some(index)
    }

    fn visible_range(&self, offset: Point) -> Range<usize> {
        let count = self.state.item_count;
        let pitch = self.config.pitch().y;
        if pitch <= 0.0 {
            return 0..count;
        }
        let per_row = self.items_per_row();
        let top = offset.y - self.state.edge_insets.y0;
        let first_row = floor_to_isize(top / pitch).saturating_sub(1).max(0);
        let last_row = ceil_to_isize((top + self.state.bounds.height()) / pitch).max(0);
        let start = (first_row as usize).saturating_mul(per_row).min(count);
        let end = (last_row as usize)
            .saturating_add(1)
            .saturating_mul(per_row)
            .min(count);
        start..end.max(start)
    }
}
