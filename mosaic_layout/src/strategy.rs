// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout contract and the tagged union over concrete strategies.

use core::ops::Range;

use kurbo::{Insets, Point, Rect, Size};

use crate::util::centered_insets;
use crate::{
    HorizontalLayout, LayoutConfig, LayoutKind, PageOrder, PagedLayout, VerticalLayout,
};

/// Geometry every strategy derives during [`Layout::rebase`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutState {
    /// Number of items being laid out.
    pub item_count: usize,
    /// Viewport bounds the layout was rebased against.
    pub bounds: Rect,
    /// Effective edge insets (the minimum insets, widened when centering).
    pub edge_insets: Insets,
    /// Total scrollable content size, insets included.
    pub content_size: Size,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            item_count: 0,
            bounds: Rect::ZERO,
            edge_insets: Insets::ZERO,
            content_size: Size::ZERO,
        }
    }
}

impl LayoutState {
    /// Resets the count and bounds ahead of a rebase.
    pub(crate) fn begin(&mut self, item_count: usize, bounds: Rect) {
        self.item_count = item_count;
        self.bounds = bounds;
    }

    /// Derives the edge insets from `actual` (the tiled extent without
    /// insets) and sets the content size to `actual` plus those insets.
    pub(crate) fn settle(&mut self, config: &LayoutConfig, centering_area: Size, actual: Size) {
        let actual = Size::new(actual.width.max(0.0), actual.height.max(0.0));
        self.edge_insets = if config.centered {
            centered_insets(config.min_insets, centering_area, actual)
        } else {
            config.min_insets
        };
        let insets = self.edge_insets;
        self.content_size = Size::new(
            actual.width + insets.x0 + insets.x1,
            actual.height + insets.y0 + insets.y1,
        );
    }

    /// Top-left corner of the tiled area.
    pub(crate) fn tile_origin(&self) -> Point {
        Point::new(self.edge_insets.x0, self.edge_insets.y0)
    }
}

/// Common contract for tiling strategies.
///
/// Implementations are pure functions of the last [`configure`](Self::configure)
/// and [`rebase`](Self::rebase) calls; queries never mutate.
///
/// For every `index < item_count`, the frame at
/// [`origin_for_index`](Self::origin_for_index) has the configured item size,
/// and [`index_at_point`](Self::index_at_point) maps any point inside that frame
/// back to `index`.
pub trait Layout {
    /// Which strategy this is.
    fn kind(&self) -> LayoutKind;

    /// Whether the scroll container should snap to viewport-sized pages.
    fn requires_paging(&self) -> bool {
        false
    }

    /// Replaces the layout parameters. Call [`rebase`](Self::rebase) afterwards.
    fn configure(&mut self, config: LayoutConfig);

    /// Current layout parameters.
    fn config(&self) -> &LayoutConfig;

    /// Recomputes derived geometry for `item_count` items inside `bounds`.
    fn rebase(&mut self, item_count: usize, bounds: Rect);

    /// Geometry derived by the last rebase.
    fn state(&self) -> &LayoutState;

    /// Total scrollable content size.
    fn content_size(&self) -> Size {
        self.state().content_size
    }

    /// Effective edge insets.
    fn edge_insets(&self) -> Insets {
        self.state().edge_insets
    }

    /// Number of items the layout was last rebased with.
    fn item_count(&self) -> usize {
        self.state().item_count
    }

    /// Top-left corner of the item at `index`, in content coordinates.
    ///
    /// Indices at or past [`item_count`](Self::item_count) are extrapolated
    /// along the same grid.
    fn origin_for_index(&self, index: usize) -> Point;

    /// Frame of the item at `index`, in content coordinates.
    fn frame_for_index(&self, index: usize) -> Rect {
        Rect::from_origin_size(self.origin_for_index(index), self.config().item_size)
    }

    /// Index of the item whose frame contains `point`.
    ///
    /// Returns `None` for points in spacing, in insets, or past the last item.
    fn index_at_point(&self, point: Point) -> Option<usize>;

    /// Indices whose frames may intersect the viewport at `offset`.
    ///
    /// The result is a superset of the truly visible indices, bounded by
    /// [`item_count`](Self::item_count).
    fn visible_range(&self, offset: Point) -> Range<usize>;
}

/// One of the concrete strategies, selected by [`LayoutKind`].
#[derive(Clone, Debug)]
pub enum LayoutStrategy {
    /// See [`VerticalLayout`].
    Vertical(VerticalLayout),
    /// See [`HorizontalLayout`].
    Horizontal(HorizontalLayout),
    /// See [`PagedLayout`].
    Paged(PagedLayout),
}

impl LayoutStrategy {
    /// Creates an unconfigured strategy for `kind`.
    #[must_use]
    pub fn from_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Vertical => Self::Vertical(VerticalLayout::default()),
            LayoutKind::Horizontal => Self::Horizontal(HorizontalLayout::default()),
            LayoutKind::HorizontalPagedLeftToRight => {
                Self::Paged(PagedLayout::new(PageOrder::RowMajor))
            }
            LayoutKind::HorizontalPagedTopToBottom => {
                Self::Paged(PagedLayout::new(PageOrder::ColumnMajor))
            }
        }
    }

    /// The paged layout, if this is one.
    #[must_use]
    pub fn as_paged(&self) -> Option<&PagedLayout> {
        match self {
            Self::Paged(paged) => Some(paged),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Layout {
        match self {
            Self::Vertical(layout) => layout,
            Self::Horizontal(layout) => layout,
            Self::Paged(layout) => layout,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Layout {
        match self {
            Self::Vertical(layout) => layout,
            Self::Horizontal(layout) => layout,
            Self::Paged(layout) => layout,
        }
    }
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::from_kind(LayoutKind::default())
    }
}

impl Layout for LayoutStrategy {
    fn kind(&self) -> LayoutKind {
        self.inner().kind()
    }

    fn requires_paging(&self) -> bool {
        self.inner().requires_paging()
    }

    fn configure(&mut self, config: LayoutConfig) {
        self.inner_mut().configure(config);
    }

    fn config(&self) -> &LayoutConfig {
        self.inner().config()
    }

    fn rebase(&mut self, item_count: usize, bounds: Rect) {
        self.inner_mut().rebase(item_count, bounds);
    }

    fn state(&self) -> &LayoutState {
        self.inner().state()
    }

    fn origin_for_index(&self, index: usize) -> Point {
        self.inner().origin_for_index(index)
    }

    fn index_at_point(&self, point: Point) -> Option<usize> {
        self.inner().index_at_point(point)
    }

    fn visible_range(&self, offset: Point) -> Range<usize> {
        self.inner().visible_range(offset)
    }
}
