// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless photo wall driven by a simulated host.
//!
//! This example shows the host side of a `mosaic_grid::GridView`:
//! - a data source that recycles cells,
//! - a tiny animation "runtime" that answers `HostRequest`s,
//! - drag-reorder and pinch-to-expand delegates that keep the backing store
//!   in step with the grid.
//!
//! Run:
//! - `cargo run -p mosaic_demos --example photo_wall`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use mosaic_grid::{
    ActionDelegate, DataSource, GesturePhase, GridConfig, GridView, HostRequest, ItemAnimation,
    SizeHint, SortingDelegate, TransformDelegate,
};
use mosaic_layout::Layout;
use mosaic_pool::{Cell, CellContent, CellProvider, ReusePool};

type Photos = Rc<RefCell<Vec<String>>>;

/// What a cell shows. A real host would hold a view handle here.
#[derive(Clone, Debug, Default)]
struct Thumb {
    title: String,
}

impl CellContent for Thumb {
    fn prepare_for_reuse(&mut self) {
        self.title.clear();
    }
}

struct Library {
    photos: Photos,
    created: usize,
}

impl CellProvider<Thumb> for Library {
    fn cell_for_index(
        &mut self,
        index: usize,
        reusable: &mut ReusePool<Thumb>,
    ) -> Option<Cell<Thumb>> {
        let title = self.photos.borrow().get(index)?.clone();
        let mut cell = reusable.dequeue(None).unwrap_or_else(|| {
            self.created += 1;
            Cell::new(Thumb::default())
        });
        cell.content.title = title;
        Some(cell)
    }
}

impl DataSource<Thumb> for Library {
    fn item_count(&self) -> usize {
        self.photos.borrow().len()
    }

    fn item_size(&self, _hint: SizeHint) -> Size {
        Size::new(100.0, 100.0)
    }
}

struct Reorder {
    photos: Photos,
}

impl SortingDelegate<Thumb> for Reorder {
    fn on_move(&mut self, from: usize, to: usize) {
        let mut photos = self.photos.borrow_mut();
        let photo = photos.remove(from);
        photos.insert(to, photo);
    }

    fn on_exchange(&mut self, a: usize, b: usize) {
        self.photos.borrow_mut().swap(a, b);
        println!("exchanged {a} and {b}");
    }
}

struct Viewer;

impl TransformDelegate<Thumb> for Viewer {
    fn full_size(&mut self, _cell: &Cell<Thumb>, _index: usize, _hint: SizeHint) -> Size {
        Size::new(300.0, 420.0)
    }

    fn full_size_view(&mut self, cell: &Cell<Thumb>, _index: usize) -> Thumb {
        Thumb {
            title: format!("{} (full)", cell.content.title),
        }
    }

    fn on_enter_full_size(&mut self, cell: &Cell<Thumb>) {
        println!("showing {} full size", cell.content.title);
    }
}

struct Taps;

impl ActionDelegate for Taps {
    fn on_tap(&mut self, index: usize) {
        println!("tapped {index}");
    }
}

/// Plays every animation to completion immediately.
fn pump(grid: &mut GridView<Thumb, Library>) {
    loop {
        let requests = grid.drain_requests();
        if requests.is_empty() {
            return;
        }
        for request in requests {
            match request {
                HostRequest::Animate(animation) => {
                    if let Some(token) = animation.token {
                        grid.complete(token);
                    }
                }
                // A real host would arm a timer; the demo lets it lapse.
                HostRequest::Timer { .. } => {}
                HostRequest::TransferGestures(target) => println!("gestures -> {target:?}"),
                HostRequest::SetScrollEnabled(enabled) => println!("scrolling enabled: {enabled}"),
            }
        }
    }
}

fn center(grid: &GridView<Thumb, Library>, index: usize) -> Point {
    grid.layout_strategy().frame_for_index(index).center()
}

fn main() {
    let photos: Photos = Rc::new(RefCell::new(
        (0..1_000).map(|i| format!("IMG_{i:04}")).collect(),
    ));
    let library = Library {
        photos: photos.clone(),
        created: 0,
    };
    let mut grid = GridView::new(library, GridConfig::default());
    grid.set_action_delegate(Some(Box::new(Taps)));
    grid.set_sorting_delegate(Some(Box::new(Reorder {
        photos: photos.clone(),
    })));
    grid.set_transform_delegate(Some(Box::new(Viewer)));
    grid.set_viewport(Size::new(375.0, 667.0));
    pump(&mut grid);
    println!(
        "{} items, content {:?}, {} live cells",
        grid.item_count(),
        grid.content_size(),
        grid.live_cells().len()
    );

    // Fling through the whole wall; the live set stays small.
    let mut y = 0.0;
    while y < grid.content_size().height {
        grid.set_content_offset(Point::new(0.0, y));
        y += 250.0;
    }
    grid.set_content_offset(Point::ZERO);
    println!("cells created while scrolling: {}", grid.data_source().created);

    grid.tap(center(&grid, 4));

    // Drag the first photo onto the fifth.
    let from = center(&grid, 0);
    let to = center(&grid, 4);
    grid.long_press(GesturePhase::Began, from);
    grid.sorting_pan(GesturePhase::Began, from, Vec2::ZERO);
    grid.sorting_pan(GesturePhase::Changed, to, to - from);
    grid.sorting_pan(GesturePhase::Ended, to, to - from);
    grid.long_press(GesturePhase::Ended, to);
    pump(&mut grid);
    println!("first photo is now {}", photos.borrow()[0]);

    // Pinch the second photo open.
    let at = center(&grid, 1);
    grid.pinch(GesturePhase::Began, 1.0, at);
    grid.pinch(GesturePhase::Changed, 2.6, at);
    grid.pinch(GesturePhase::Ended, 2.6, at);
    pump(&mut grid);
    println!("transform: {:?}", grid.transform_state());

    // Delete a photo: mirror it in the store, then tell the grid.
    photos.borrow_mut().remove(2);
    grid.remove_at(2, ItemAnimation::FADE);
    pump(&mut grid);
    println!("{} items after delete", grid.item_count());

    println!("dropped {} pooled cells", grid.on_low_memory());
}
