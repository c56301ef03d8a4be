// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A paged app launcher that rotates between portrait and landscape.
//!
//! Shows how a host reports orientation changes: announce the rotation, then
//! deliver the new viewport. The grid re-queries the item size for the new
//! orientation and snaps back onto a page boundary.
//!
//! Run:
//! - `cargo run -p mosaic_demos --example paged_launcher`

use kurbo::{Point, Size, Vec2};
use mosaic_grid::{
    DataSource, GridConfig, GridView, HostRequest, Orientation, ScrollPosition, SizeHint,
};
use mosaic_layout::{Layout, LayoutKind};
use mosaic_pool::{Cell, CellContent, CellProvider, ReusePool};

#[derive(Debug, Default)]
struct Icon(usize);

impl CellContent for Icon {}

struct Apps(usize);

impl CellProvider<Icon> for Apps {
    fn cell_for_index(
        &mut self,
        index: usize,
        reusable: &mut ReusePool<Icon>,
    ) -> Option<Cell<Icon>> {
        let mut cell = reusable
            .dequeue(None)
            .unwrap_or_else(|| Cell::new(Icon::default()));
        cell.content.0 = index;
        Some(cell)
    }
}

impl DataSource<Icon> for Apps {
    fn item_count(&self) -> usize {
        self.0
    }

    fn item_size(&self, hint: SizeHint) -> Size {
        match hint.orientation {
            Orientation::Portrait => Size::new(72.0, 90.0),
            Orientation::Landscape => Size::new(80.0, 80.0),
        }
    }
}

fn describe(grid: &GridView<Icon, Apps>) {
    let strategy = grid.layout_strategy();
    let Some(paged) = strategy.as_paged() else {
        return;
    };
    println!(
        "{:?}: {} per page over {} pages, offset {:?}",
        grid.viewport(),
        paged.items_per_page(),
        paged.page_count(),
        grid.content_offset(),
    );
}

fn main() {
    let config = GridConfig {
        layout: LayoutKind::HorizontalPagedLeftToRight,
        item_spacing: 16.0,
        ..GridConfig::default()
    };
    let mut grid = GridView::new(Apps(60), config);
    grid.set_viewport(Size::new(375.0, 667.0));
    describe(&grid);

    grid.scroll_to(40, ScrollPosition::Nearest, true);
    for request in grid.drain_requests() {
        if let HostRequest::Animate(animation) = request {
            println!("animate {:?} over {:?}", animation.subject, animation.duration);
        }
    }
    describe(&grid);

    // The user lets go halfway between pages; the scroller reports where it
    // stopped, then the device rotates.
    let stopped = grid.content_offset().x - 150.0;
    grid.set_content_offset(Point::new(stopped, 0.0));
    grid.on_orientation_will_change(Orientation::Landscape);
    grid.set_viewport(Size::new(667.0, 375.0));
    grid.drain_requests();
    describe(&grid);

    let hit = grid
        .layout_strategy()
        .index_at_point(grid.content_offset() + Vec2::new(60.0, 60.0));
    println!("top-left icon after rotation: {hit:?}");
}
