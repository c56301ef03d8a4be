// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use kurbo::{Point, Rect, Size, Vec2};

use crate::util::{ceil, ceil_to_isize, cell_coord, fit_count, floor_to_isize};
use crate::{Layout, LayoutConfig, LayoutKind, LayoutState};

/// Columns of items that fill top to bottom, scrolling horizontally.
///
/// The mirror image of [`VerticalLayout`](crate::VerticalLayout): as many items
/// as fit the viewport height go in each column, and item `i` lands in column
/// `i / per_column`, row `i % per_column`.
#[derive(Clone, Debug, Default)]
pub struct HorizontalLayout {
    config: LayoutConfig,
    state: LayoutState,
    items_per_column: usize,
}

impl HorizontalLayout {
    /// Creates an unconfigured horizontal layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in each column, as of the last rebase.
    #[must_use]
    pub fn items_per_column(&self) -> usize {
        self.items_per_column.max(1)
    }
}

impl Layout for HorizontalLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Horizontal
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
        let available = bounds.height() - config.min_insets.y0 - config.min_insets.y1;
        self.items_per_column = fit_count(available, config.item_size.height, config.spacing);

        let per_column = self.items_per_column();
        let columns = item_count.div_ceil(per_column);
        let actual = Size::new(
            ceil(columns as f64 * pitch.x) - config.spacing,
            ceil(item_count.min(per_column) as f64 * pitch.y) - config.spacing,
        );
        self.state.settle(&config, bounds.size(), actual);
    }

    fn state(&self) -> &LayoutState {
        &self.state
    }

    fn origin_for_index(&self, index: usize) -> Point {
        let per_column = self.items_per_column();
        let pitch = self.config.pitch();
        let column = (index / per_column) as f64;
        let row = (index % per_column) as f64;
        self.state.tile_origin() + Vec2::new(column * pitch.x, row * pitch.y)
    }

    fn index_at_point(&self, point: Point) -> Option<usize> {
        let pitch = self.config.pitch();
        let local = point - self.state.tile_origin();
        let column = cell_coord(local.x, pitch.x)?;
        let row = cell_coord(local.y, pitch.y)?;
        let per_column = self.items_per_column();
        if row >= per_column {
            return None;
        }
        let index = column.checked_mul(per_column)?.checked_add(row)?;
        if index >= self.state.item_count || !self.frame_for_index(index).contains(point) {
            return None;
        }
        Some(index)
    }

    fn visible_range(&self, offset: Point) -> Range<usize> {
        let count = self.state.item_count;
        let pitch = self.config.pitch().x;
        if pitch <= 0.0 {
            return 0..count;
        }
        let per_column = self.items_per_column();
        let left = offset.x - self.state.edge_insets.x0;
        let first_column = floor_to_isize(left / pitch).saturating_sub(1).max(0);
        let last_column = ceil_to_isize((left + self.state.bounds.width()) / pitch).max(0);
        let start = (first_column as usize)
            .saturating_mul(per_column)
            .min(count);
        let end = (last_column as usize)
            .saturating_add(1)
            .saturating_mul(per_column)
            .min(count);
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::HorizontalLayout;
    use crate::{Layout, LayoutConfig};
    use kurbo::{Insets, Point, Rect, Size};

    fn strip(height: f64, count: usize) -> HorizontalLayout {
        let mut layout = HorizontalLayout::new();
        layout.configure(LayoutConfig::new(
            Size::new(80.0, 50.0),
            10.0,
            Insets::uniform(5.0),
            false,
        ));
        layout.rebase(count, Rect::new(0.0, 0.0, 320.0, height));
        layout
    }

    #[test]
    fn fills_columns_top_to_bottom() {
        // 190 - 10 leaves 180; three 50px items and two gaps need 170.
        let layout = strip(190.0, 10);
        assert_eq!(layout.items_per_column(), 3);
        assert_eq!(layout.origin_for_index(1), Point::new(5.0, 65.0));
        assert_eq!(layout.origin_for_index(3), Point::new(95.0, 5.0));
        assert_eq!(layout.index_at_point(Point::new(100.0, 70.0)), Some(4));
    }

    #[test]
    fn content_grows_along_x() {
        let layout = strip(190.0, 10);
        // Four columns of three.
        assert_eq!(layout.content_size(), Size::new(350.0 + 10.0, 170.0 + 10.0));
    }

    #[test]
    fn points_below_the_last_row_miss() {
        let layout = strip(400.0, 100);
        let per_column = layout.items_per_column();
        let below = layout.frame_for_index(per_column - 1).y1 + 20.0;
        assert_eq!(layout.index_at_point(Point::new(10.0, below)), None);
    }

    #[test]
    fn visible_range_tracks_the_x_offset() {
        let layout = strip(190.0, 300);
        // Column 10 starts at 5 + 10 * 90 = 905.
        let range = layout.visible_range(Point::new(905.0, 0.0));
        assert_eq!(range.start, 9 * 3);
        assert!(range.end >= 14 * 3);
    }
}
