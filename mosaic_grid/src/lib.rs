// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Grid: a renderer-agnostic grid view controller.
//!
//! [`GridView`] owns the model of a scrollable grid of equally sized items:
//! which cells exist, where they sit, and what the user is doing to them. It
//! draws nothing. A host toolkit feeds it viewport changes, scroll offsets and
//! recognized gestures, renders the cells it exposes, and runs the animations
//! it asks for.
//!
//! The pieces:
//!
//! - [`GridConfig`]: layout kind, spacing, insets, timings and the
//!   pinch-to-expand tuning in [`TransformConfig`].
//! - [`DataSource`]: the one required collaborator. It reports the item count
//!   and size and hands out cells, drawing from the reuse pool first.
//! - [`ActionDelegate`], [`SortingDelegate`] and [`TransformDelegate`]:
//!   optional collaborators for taps and editing, drag-reorder, and
//!   pinch-to-expand.
//! - [`HostRequest`]: what the grid wants the host to do. Drain them with
//!   [`GridView::drain_requests`] after every call.
//!
//! ## Animations
//!
//! Model state always jumps straight to its final value. When a change should
//! be animated the grid queues a [`HostRequest::Animate`]; if more work has to
//! happen once it finishes, the request carries an [`AnimationToken`] that the
//! host hands back through [`GridView::complete`]. Timers work the same way.
//! Zero-length animations complete before the call that queued them returns.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mosaic_grid::{DataSource, GridConfig, GridView, ItemAnimation, SizeHint};
//! use mosaic_pool::{Cell, CellContent, CellProvider, ReusePool};
//!
//! #[derive(Default)]
//! struct Label(String);
//! impl CellContent for Label {}
//!
//! struct Names(Vec<String>);
//!
//! impl CellProvider<Label> for Names {
//!     fn cell_for_index(
//!         &mut self,
//!         index: usize,
//!         reusable: &mut ReusePool<Label>,
//!     ) -> Option<Cell<Label>> {
//!         let mut cell = reusable.dequeue(None).unwrap_or_else(|| Cell::new(Label::default()));
//!         cell.content.0.clone_from(self.0.get(index)?);
//!         Some(cell)
//!     }
//! }
//!
//! impl DataSource<Label> for Names {
//!     fn item_count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn item_size(&self, _hint: SizeHint) -> Size {
//!         Size::new(100.0, 100.0)
//!     }
//! }
//!
//! let names = (0..500).map(|i| format!("item {i}")).collect();
//! let mut grid = GridView::new(Names(names), GridConfig::default());
//! grid.set_viewport(Size::new(320.0, 480.0));
//!
//! // Only the cells near the viewport exist.
//! assert!(grid.live_cells().len() < 30);
//!
//! // Scrolling recycles them.
//! grid.set_content_offset(Point::new(0.0, 5_000.0));
//! let id = grid.cell_at_index(92).unwrap();
//! assert_eq!(grid.cell(id).unwrap().content.0, "item 92");
//!
//! // Mutations are mirrored in the data source first, then reported.
//! grid.data_source_mut().0.insert(0, String::from("new"));
//! grid.insert_at(0, ItemAnimation::FADE);
//! for request in grid.drain_requests() {
//!     // Hand these to the host's animation system.
//!     let _ = request;
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod delegate;
mod gesture;
mod grid;
mod request;
mod scroll;
mod sort;
mod transform;

#[cfg(test)]
mod testing;

pub use config::{DeviceIdiom, GridConfig, Orientation, SizeHint, SortStyle, TransformConfig};
pub use delegate::{ActionDelegate, DataSource, SortingDelegate, TransformDelegate};
pub use gesture::{GestureKind, GesturePhase};
pub use grid::GridView;
pub use request::{Animation, AnimationSubject, AnimationToken, GestureTarget, HostRequest};
pub use scroll::{ItemAnimation, Overlay, ScrollPosition};
pub use sort::SortState;
pub use transform::{TransformGestures, TransformState};
