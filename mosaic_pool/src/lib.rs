// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Pool: cell recycling and visible-window virtualization.
//!
//! A grid of thousands of items only ever materializes the cells near the
//! viewport. This crate owns those cells and keeps the live set in step with a
//! [`mosaic_layout::Layout`] as the scroll offset moves.
//!
//! - [`Cell`]: host content plus the visual state a grid drives (frame, host
//!   layer, opacity, content transform, full-size presentation, editing and
//!   shaking flags). A cell knows the item index it displays.
//! - [`CellPool`]: live cells keyed by generational [`CellId`]s, with an index
//!   map that is kept consistent with each cell's own index. It offers the index
//!   shuffles a grid needs (shift, swap, move) and the load/evict passes.
//! - [`ReusePool`]: detached cells waiting for reuse, partitioned by an optional
//!   reuse identifier.
//! - [`CellProvider`]: the hook through which a load pass asks the host for
//!   cells; providers draw from the reuse pool first.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Insets, Point, Rect, Size};
//! use mosaic_layout::{Layout, LayoutConfig, LayoutKind, LayoutStrategy};
//! use mosaic_pool::{Cell, CellContent, CellPool, CellProvider, ReusePool};
//!
//! struct Swatch(usize);
//! impl CellContent for Swatch {}
//!
//! struct Swatches;
//! impl CellProvider<Swatch> for Swatches {
//!     fn cell_for_index(
//!         &mut self,
//!         index: usize,
//!         reusable: &mut ReusePool<Swatch>,
//!     ) -> Option<Cell<Swatch>> {
//!         let mut cell = reusable
//!             .dequeue(None)
//!             .unwrap_or_else(|| Cell::new(Swatch(0)));
//!         cell.content.0 = index;
//!         Some(cell)
//!     }
//! }
//!
//! let mut layout = LayoutStrategy::from_kind(LayoutKind::Vertical);
//! layout.configure(LayoutConfig::new(Size::new(50.0, 50.0), 0.0, Insets::ZERO, false));
//! layout.rebase(1_000, Rect::new(0.0, 0.0, 200.0, 200.0));
//!
//! let mut pool = CellPool::new();
//! pool.load_required_items(&layout, Point::ZERO, &mut Swatches);
//! let first = pool.len();
//!
//! // Scrolling far away recycles the same cells.
//! pool.load_required_items(&layout, Point::new(0.0, 10_000.0), &mut Swatches);
//! assert!(pool.cell_at(0).is_none());
//! assert!(pool.len() <= first + 4);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod pool;
mod reuse;

pub use cell::{Cell, CellContent, CellHost, ContentTransform, FullSizeContent};
pub use pool::{CellId, CellPool, CellProvider};
pub use reuse::ReusePool;
