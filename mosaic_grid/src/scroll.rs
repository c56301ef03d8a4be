// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation animation flags, scroll alignment and the overlay space.

use kurbo::{Point, Rect, Size, Vec2};

bitflags::bitflags! {
    /// How an index-space mutation is presented.
    ///
    /// The empty set applies the mutation without animation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ItemAnimation: u8 {
        /// Cross-fade affected cells.
        const FADE   = 0b0000_0001;
        /// Scroll the affected index into view.
        const SCROLL = 0b0000_0010;
    }
}

/// Where [`GridView::scroll_to`](crate::GridView::scroll_to) places an item
/// along the scroll axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollPosition {
    /// Move just enough to make the item fully visible.
    #[default]
    Nearest,
    /// Align the leading edge of the item with the viewport's.
    Start,
    /// Center the item in the viewport.
    Middle,
    /// Align the trailing edge of the item with the viewport's.
    End,
}

impl ScrollPosition {
    /// Offset along one axis that places `[start, end)` in a viewport of
    /// length `extent` currently scrolled to `current`.
    pub(crate) fn resolve(self, start: f64, end: f64, current: f64, extent: f64) -> f64 {
        match self {
            Self::Start => start,
            Self::End => (end - extent).max(0.0),
            Self::Middle => (start - (extent - (end - start)) / 2.0).max(0.0),
            Self::Nearest => {
                if start >= current && end <= current + extent {
                    current
                } else if start < current {
                    start
                } else {
                    (end - extent).max(0.0)
                }
            }
        }
    }
}

/// The coordinate space dragged and transforming cells are moved into.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Overlay {
    /// The container's own content space.
    #[default]
    Container,
    /// A view above the container.
    External {
        /// Bounds of the overlay in its own coordinates.
        bounds: Rect,
        /// Where the container's top-left corner sits in the overlay.
        container_origin: Point,
    },
}

impl Overlay {
    fn shift(&self, offset: Point) -> Vec2 {
        match self {
            Self::Container => Vec2::ZERO,
            Self::External {
                container_origin, ..
            } => container_origin.to_vec2() - offset.to_vec2(),
        }
    }

    /// Converts a rect in container content coordinates to overlay coordinates.
    pub fn to_overlay(&self, rect: Rect, offset: Point) -> Rect {
        rect + self.shift(offset)
    }

    /// Converts a rect in overlay coordinates to container content coordinates.
    pub fn to_container(&self, rect: Rect, offset: Point) -> Rect {
        rect - self.shift(offset)
    }

    /// The overlay's bounds in its own coordinates.
    ///
    /// For [`Overlay::Container`] this is the visible part of the content.
    pub fn bounds(&self, viewport: Size, offset: Point) -> Rect {
        match self {
            Self::Container => Rect::from_origin_size(offset, viewport),
            Self::External { bounds, .. } => *bounds,
        }
    }
}
