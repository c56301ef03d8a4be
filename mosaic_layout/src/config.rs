// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout parameters and strategy selection.

use kurbo::{Insets, Size, Vec2};

/// The four tiling strategies a grid can use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LayoutKind {
    /// Rows of items, scrolling vertically.
    #[default]
    Vertical,
    /// Columns of items, scrolling horizontally.
    Horizontal,
    /// Viewport-sized pages laid out horizontally; each page fills row by row.
    HorizontalPagedLeftToRight,
    /// Viewport-sized pages laid out horizontally; each page fills column by column.
    HorizontalPagedTopToBottom,
}

impl LayoutKind {
    /// Returns `true` for the paged variants.
    #[must_use]
    pub const fn is_paged(self) -> bool {
        matches!(
            self,
            Self::HorizontalPagedLeftToRight | Self::HorizontalPagedTopToBottom
        )
    }
}

/// Parameters shared by every layout strategy.
///
/// A config is immutable for the duration of a layout pass. Hosts rebuild it
/// (and call [`Layout::configure`](crate::Layout::configure) followed by
/// [`Layout::rebase`](crate::Layout::rebase)) whenever any input changes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Size of every item.
    pub item_size: Size,
    /// Gap between adjacent items, on both axes.
    pub spacing: f64,
    /// Minimum distance between the content and each viewport edge.
    ///
    /// `x0` is the left inset, `y0` the top, `x1` the right and `y1` the bottom.
    pub min_insets: Insets,
    /// Center the grid in the viewport when it does not fill it.
    pub centered: bool,
}

impl LayoutConfig {
    /// Creates a new config.
    #[must_use]
    pub const fn new(item_size: Size, spacing: f64, min_insets: Insets, centered: bool) -> Self {
        Self {
            item_size,
            spacing,
            min_insets,
            centered,
        }
    }

    /// Distance from the origin of one item to the origin of its neighbor, per axis.
    #[must_use]
    pub fn pitch(&self) -> Vec2 {
        Vec2::new(
            self.item_size.width + self.spacing,
            self.item_size.height + self.spacing,
        )
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_size: Size::ZERO,
            spacing: 0.0,
            min_insets: Insets::ZERO,
            centered: false,
        }
    }
}
