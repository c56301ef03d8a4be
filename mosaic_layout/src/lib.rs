// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Layout: tiling strategies for fixed-size grid items.
//!
//! A layout strategy turns an item index and the viewport geometry into pixel
//! positions, and answers the two queries a virtualized grid needs on every
//! scroll step: "which item is under this point?" and "which indices can be
//! visible at this offset?".
//!
//! The core concepts are:
//!
//! - [`LayoutConfig`]: item size, spacing, minimum edge insets, and whether the
//!   grid should be centered inside its viewport.
//! - [`Layout`]: the contract every strategy implements. Call
//!   [`Layout::configure`] with the parameters, [`Layout::rebase`] with the item
//!   count and viewport bounds, then issue queries.
//! - [`LayoutStrategy`]: a tagged union over the four concrete strategies,
//!   built from a [`LayoutKind`] with [`LayoutStrategy::from_kind`].
//! - [`VerticalLayout`] and [`HorizontalLayout`]: continuous flows that scroll
//!   along one axis.
//! - [`PagedLayout`]: a horizontally paged grid; the order items fill a page is
//!   a [`PageOrder`] (row-major for left-to-right, column-major for
//!   top-to-bottom).
//!
//! This crate does not know about cells, views, or scrolling. Host code feeds
//! it the item count and bounds whenever either changes and reads positions
//! back out.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Insets, Point, Rect, Size};
//! use mosaic_layout::{Layout, LayoutConfig, LayoutKind, LayoutStrategy};
//!
//! let mut layout = LayoutStrategy::from_kind(LayoutKind::Vertical);
//! layout.configure(LayoutConfig::new(
//!     Size::new(100.0, 100.0),
//!     10.0,
//!     Insets::uniform(5.0),
//!     false,
//! ));
//! layout.rebase(250, Rect::new(0.0, 0.0, 340.0, 480.0));
//!
//! // Three 100px items and two 10px gaps fit into 340 - 2 * 5.
//! assert_eq!(layout.origin_for_index(0), Point::new(5.0, 5.0));
//! assert_eq!(layout.origin_for_index(3), Point::new(5.0, 115.0));
//! assert_eq!(layout.index_at_point(Point::new(6.0, 116.0)), Some(3));
//!
//! // Points in the gaps between items do not resolve to an index.
//! assert_eq!(layout.index_at_point(Point::new(108.0, 50.0)), None);
//!
//! let range = layout.visible_range(Point::ZERO);
//! assert_eq!(range.start, 0);
//! assert!(range.end >= 15);
//! ```
//!
//! All coordinates are in the scrollable content space of the grid (typically
//! logical pixels). Inputs are expected to be finite; degenerate sizes are
//! clamped rather than rejected.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod horizontal;
mod paged;
mod strategy;
mod util;
mod vertical;

pub use config::{LayoutConfig, LayoutKind};
pub use horizontal::HorizontalLayout;
pub use paged::{PageOrder, PagedLayout};
pub use strategy::{Layout, LayoutState, LayoutStrategy};
pub use vertical::VerticalLayout;
