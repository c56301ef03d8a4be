// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use kurbo::{Point, Rect, Size, Vec2};

use crate::util::{ceil, ceil_to_isize, cell_coord, fit_count, floor_to_isize};
use crate::{Layout, LayoutConfig, LayoutKind, LayoutState};

/// The order in which items fill a single page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PageOrder {
    /// Fill each row left to right, then move down.
    RowMajor,
    /// Fill each column top to bottom, then move right.
    ColumnMajor,
}

impl PageOrder {
    /// Splits an in-page index into `(column, row)`.
    #[must_use]
    pub const fn column_row(
        self,
        in_page: usize,
        per_row: usize,
        per_column: usize,
    ) -> (usize, usize) {
        match self {
            Self::RowMajor => (in_page % per_row, in_page / per_row),
            Self::ColumnMajor => (in_page / per_column, in_page % per_column),
        }
    }

    /// Combines `(column, row)` into an in-page index.
    #[must_use]
    pub const fn in_page_index(
        self,
        column: usize,
        row: usize,
        per_row: usize,
        per_column: usize,
    ) -> usize {
        match self {
            Self::RowMajor => column + row * per_row,
            Self::ColumnMajor => row + column * per_column,
        }
    }
}

/// Viewport-sized pages of items, laid out side by side along x.
///
/// Each page holds `per_row * per_column` items. Pages are exactly one viewport
/// wide, so a paging scroll container lands on page boundaries.
#[derive(Clone, Debug)]
pub struct PagedLayout {
    order: PageOrder,
    config: LayoutConfig,
    state: LayoutState,
    items_per_row: usize,
    items_per_column: usize,
}

impl PagedLayout {
    /// Creates an unconfigured paged layout that fills pages in `order`.
    #[must_use]
    pub fn new(order: PageOrder) -> Self {
        Self {
            order,
            config: LayoutConfig::default(),
            state: LayoutState::default(),
            items_per_row: 1,
            items_per_column: 1,
        }
    }

    /// The in-page fill order.
    #[must_use]
    pub fn order(&self) -> PageOrder {
        self.order
    }

    /// Items in each row of a page.
    #[must_use]
    pub fn items_per_row(&self) -> usize {
        self.items_per_row.max(1)
    }

    /// Items in each column of a page.
    #[must_use]
    pub fn items_per_column(&self) -> usize {
        self.items_per_column.max(1)
    }

    /// Items on each page.
    #[must_use]
    pub fn items_per_page(&self) -> usize {
        self.items_per_row().saturating_mul(self.items_per_column())
    }

    /// Number of pages needed for the current item count.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.state.item_count.div_ceil(self.items_per_page())
    }

    /// Width of one page.
    #[must_use]
    pub fn page_width(&self) -> f64 {
        self.state.bounds.width()
    }

    /// The page holding `index`.
    #[must_use]
    pub fn page_for_index(&self, index: usize) -> usize {
        index / self.items_per_page()
    }

    /// Column of `index` within its page.
    #[must_use]
    pub fn column_for_index(&self, index: usize) -> usize {
        self.decompose(index).0
    }

    /// Row of `index` within its page.
    #[must_use]
    pub fn row_for_index(&self, index: usize) -> usize {
        self.decompose(index).1
    }

    /// Flat index of the item at `(column, row)` on `page`.
    ///
    /// Returns `None` if the column or row lies outside a page.
    #[must_use]
    pub fn index_for(&self, column: usize, row: usize, page: usize) -> Option<usize> {
        let (per_row, per_column) = (self.items_per_row(), self.items_per_column());
        if column >= per_row || row >= per_column {
            return None;
        }
        let in_page = self.order.in_page_index(column, row, per_row, per_column);
        page.checked_mul(self.items_per_page())?.checked_add(in_page)
    }

    fn decompose(&self, index: usize) -> (usize, usize) {
        self.order.column_row(
            index % self.items_per_page(),
            self.items_per_row(),
            self.items_per_column(),
        )
    }

    /// The page containing content x-coordinate `x`.
    ///
    /// This is the smallest page `p` whose right edge `(p + 1) * width` is at
    /// or past `x`, so a point exactly on a boundary belongs to the page on its
    /// left. Returns `None` when pages have no width.
    #[must_use]
    pub fn page_at_x(&self, x: f64) -> Option<usize> {
        let width = self.page_width();
        if width <= 0.0 || !x.is_finite() {
            return None;
        }
        let page = ceil_to_isize(x / width).saturating_sub(1).max(0);
        usize::try_from(page).ok()
    }

    /// Left edge of `page` in content coordinates.
    #[must_use]
    pub fn page_origin_x(&self, page: usize) -> f64 {
        page as f64 * self.page_width()
    }
}

impl Layout for PagedLayout {
    fn kind(&self) -> LayoutKind {
        match self.order {
            PageOrder::RowMajor => LayoutKind::HorizontalPagedLeftToRight,
            PageOrder::ColumnMajor => LayoutKind::HorizontalPagedTopToBottom,
        }
    }

    fn requires_paging(&self) -> bool {
        true
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
        let min = config.min_insets;
        self.items_per_row = fit_count(
            bounds.width() - min.x0 - min.x1,
            config.item_size.width,
            config.spacing,
        );
        self.items_per_column = fit_count(
            bounds.height() - min.y0 - min.y1,
            config.item_size.height,
            config.spacing,
        );

        // Insets are derived from one full page, whatever its fill; every page
        // shares them.
        let page = Size::new(
            ceil(self.items_per_row() as f64 * pitch.x) - config.spacing,
            ceil(self.items_per_column() as f64 * pitch.y) - config.spacing,
        );
        self.state.settle(&config, bounds.size(), page);
        self.state.content_size = Size::new(
            self.page_width() * self.page_count() as f64,
            bounds.height(),
        );
    }

    fn state(&self) -> &LayoutState {
        &self.state
    }

    fn origin_for_index(&self, index: usize) -> Point {
        let page = self.page_for_index(index);
        let (column, row) = self.decompose(index);
        let pitch = self.config.pitch();
        self.state.tile_origin()
            + Vec2::new(
                self.page_origin_x(page) + column as f64 * pitch.x,
                row as f64 * pitch.y,
            )
    }

    fn index_at_point(&self, point: Point) -> Option<usize> {
        let page = self.page_at_x(point.x)?;
        let pitch = self.config.pitch();
        let local = point - self.state.tile_origin() - Vec2::new(self.page_origin_x(page), 0.0);
        let column = cell_coord(local.x, pitch.x)?;
        let row = cell_coord(local.y, pitch.y)?;
        let index = self.index_for(column, row, page)?;
        if index >= self.state.item_count || !self.frame_for_index(index).contains(point) {
            return None;
        }
        Some(index)
    }

    fn visible_range(&self, offset: Point) -> Range<usize> {
        let count = self.state.item_count;
        let width = self.page_width();
        if width <= 0.0 {
            return 0..count;
        }
        let per_page = self.items_per_page();
        let page = floor_to_isize(offset.x / width).max(0) as usize;
        let start = page
            .saturating_sub(1)
            .saturating_mul(per_page)
            .min(count);
        let end = start
            .saturating_add(per_page.saturating_mul(3))
            .min(count);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::{PageOrder, PagedLayout};
    use crate::{Layout, LayoutConfig};
    use kurbo::{Insets, Point, Rect, Size};

    fn pages(order: PageOrder, count: usize) -> PagedLayout {
        let mut layout = PagedLayout::new(order);
        layout.configure(LayoutConfig::new(
            Size::new(100.0, 100.0),
            10.0,
            Insets::uniform(5.0),
            false,
        ));
        // 3 x 2 items per page.
        layout.rebase(count, Rect::new(0.0, 0.0, 330.0, 225.0));
        layout
    }

    #[test]
    fn page_order_round_trips() {
        for order in [PageOrder::RowMajor, PageOrder::ColumnMajor] {
            for in_page in 0..12 {
                let (column, row) = order.column_row(in_page, 4, 3);
                assert!(column < 4 && row < 3);
                assert_eq!(order.in_page_index(column, row, 4, 3), in_page);
            }
        }
    }

    #[test]
    fn row_major_fills_rows_first() {
        let layout = pages(PageOrder::RowMajor, 20);
        assert_eq!(layout.items_per_row(), 3);
        assert_eq!(layout.items_per_column(), 2);
        assert_eq!(layout.origin_for_index(1), Point::new(115.0, 5.0));
        assert_eq!(layout.origin_for_index(3), Point::new(5.0, 115.0));
        // Index 6 starts the second page.
        assert_eq!(layout.origin_for_index(6), Point::new(335.0, 5.0));
    }

    #[test]
    fn column_major_fills_columns_first() {
        let layout = pages(PageOrder::ColumnMajor, 20);
        assert_eq!(layout.origin_for_index(1), Point::new(5.0, 115.0));
        assert_eq!(layout.origin_for_index(2), Point::new(115.0, 5.0));
        assert_eq!(layout.origin_for_index(7), Point::new(335.0, 115.0));
    }

    #[test]
    fn decomposition_helpers_agree() {
        for order in [PageOrder::RowMajor, PageOrder::ColumnMajor] {
            let layout = pages(order, 20);
            for index in 0..20 {
                let page = layout.page_for_index(index);
                let column = layout.column_for_index(index);
                let row = layout.row_for_index(index);
                assert_eq!(layout.index_for(column, row, page), Some(index));
            }
            assert_eq!(layout.index_for(3, 0, 0), None);
            assert_eq!(layout.index_for(0, 2, 0), None);
        }
    }

    #[test]
    fn content_is_whole_pages() {
        let layout = pages(PageOrder::RowMajor, 13);
        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.content_size(), Size::new(990.0, 225.0));
    }

    #[test]
    fn page_boundaries_belong_to_the_left_page() {
        let layout = pages(PageOrder::RowMajor, 20);
        assert_eq!(layout.page_at_x(0.0), Some(0));
        assert_eq!(layout.page_at_x(330.0), Some(0));
        assert_eq!(layout.page_at_x(330.5), Some(1));
        assert_eq!(layout.page_at_x(-40.0), Some(0));
    }

    #[test]
    fn hits_resolve_on_later_pages() {
        for order in [PageOrder::RowMajor, PageOrder::ColumnMajor] {
            let layout = pages(order, 20);
            for index in 0..20 {
                let center = layout.frame_for_index(index).center();
                assert_eq!(layout.index_at_point(center), Some(index), "{order:?}");
            }
        }
    }

    #[test]
    fn visible_range_spans_three_pages() {
        let layout = pages(PageOrder::RowMajor, 40);
        assert_eq!(layout.visible_range(Point::ZERO), 0..18);
        assert_eq!(layout.visible_range(Point::new(660.0, 0.0)), 6..24);
        assert_eq!(layout.visible_range(Point::new(2000.0, 0.0)), 30..40);
    }

    #[test]
    fn centering_uses_a_full_page_at_any_fill() {
        let mut layout = PagedLayout::new(PageOrder::RowMajor);
        layout.configure(LayoutConfig::new(
            Size::new(100.0, 100.0),
            10.0,
            Insets::uniform(5.0),
            true,
        ));
        let bounds = Rect::new(0.0, 0.0, 330.0, 225.0);
        for count in [1, 2, 6, 7, 13] {
            layout.rebase(count, bounds);
            assert_eq!(layout.origin_for_index(0), Point::new(5.0, 7.0), "{count} items");
        }
        layout.rebase(2, bounds);
        assert_eq!(layout.origin_for_index(1), Point::new(115.0, 7.0));
    }

    #[test]
    fn zero_width_pages_do_not_hang() {
        let mut layout = PagedLayout::new(PageOrder::RowMajor);
        layout.configure(LayoutConfig::default());
        layout.rebase(5, Rect::ZERO);
        assert_eq!(layout.page_at_x(100.0), None);
        assert_eq!(layout.index_at_point(Point::new(100.0, 0.0)), None);
        assert_eq!(layout.visible_range(Point::ZERO), 0..5);
    }
}
