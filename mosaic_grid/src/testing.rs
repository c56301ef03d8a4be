// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording data source and delegates shared by the unit tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Size;
use mosaic_pool::{Cell, CellContent, CellProvider, ReusePool};

use crate::{
    ActionDelegate, DataSource, GridConfig, GridView, HostRequest, SizeHint, SortingDelegate,
    TransformDelegate,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Tap(usize),
    TapEmptySpace,
    DeleteRequested(usize),
    EditingChanged(bool),
    Move(usize, usize),
    Exchange(usize, usize),
    DragStart(usize),
    DragEnd(usize),
    TransformStart(usize),
    EnterFullSize(usize),
    TransformEnd(usize),
}

#[derive(Debug)]
pub(crate) struct Record {
    pub(crate) events: Vec<Event>,
    pub(crate) created: usize,
    pub(crate) hints: Vec<SizeHint>,
    pub(crate) size: Size,
    pub(crate) undeletable: Vec<usize>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            created: 0,
            hints: Vec::new(),
            size: Size::new(100.0, 100.0),
            undeletable: Vec::new(),
        }
    }
}

pub(crate) type Log = Rc<RefCell<Record>>;

/// Cell content: the item id it shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tile {
    pub(crate) item: Option<usize>,
}

impl CellContent for Tile {
    fn prepare_for_reuse(&mut self) {
        self.item = None;
    }
}

/// Items are ids; new items get ids past every existing one.
#[derive(Debug)]
pub(crate) struct Source {
    items: Vec<usize>,
    next: usize,
    shared: Log,
}

impl Source {
    pub(crate) fn insert(&mut self, index: usize) {
        self.items.insert(index, self.next);
        self.next += 1;
    }

    pub(crate) fn remove(&mut self, index: usize) {
        self.items.remove(index);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }
}

impl CellProvider<Tile> for Source {
    fn cell_for_index(
        &mut self,
        index: usize,
        reusable: &mut ReusePool<Tile>,
    ) -> Option<Cell<Tile>> {
        let item = *self.items.get(index)?;
        let mut cell = reusable.dequeue(None).unwrap_or_else(|| {
            self.shared.borrow_mut().created += 1;
            Cell::new(Tile::default())
        });
        cell.content.item = Some(item);
        Some(cell)
    }
}

impl DataSource<Tile> for Source {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item_size(&self, hint: SizeHint) -> Size {
        let mut shared = self.shared.borrow_mut();
        shared.hints.push(hint);
        shared.size
    }

    fn can_delete(&self, index: usize) -> bool {
        !self.shared.borrow().undeletable.contains(&index)
    }
}

/// A grid of `count` items in a 330x480 viewport, laid out from the top-left
/// corner.
pub(crate) fn fixture(count: usize) -> (GridView<Tile, Source>, Log) {
    fixture_with(
        count,
        Size::new(330.0, 480.0),
        GridConfig {
            center_grid: false,
            ..GridConfig::default()
        },
    )
}

pub(crate) fn fixture_with(
    count: usize,
    viewport: Size,
    config: GridConfig,
) -> (GridView<Tile, Source>, Log) {
    let shared = Log::default();
    let source = Source {
        items: (0..count).collect(),
        next: count,
        shared: shared.clone(),
    };
    let mut grid = GridView::new(source, config);
    grid.set_viewport(viewport);
    (grid, shared)
}

/// Completes every animation the grid asks for until it stops asking.
/// Timers are left pending.
pub(crate) fn settle(grid: &mut GridView<Tile, Source>) {
    for _ in 0..64 {
        let tokens: Vec<_> = grid
            .drain_requests()
            .into_iter()
            .filter_map(|request| match request {
                HostRequest::Animate(animation) => animation.token,
                _ => None,
            })
            .collect();
        if tokens.is_empty() {
            return;
        }
        for token in tokens {
            grid.complete(token);
        }
    }
    panic!("grid kept animating");
}

struct Recorder {
    log: Log,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.log.borrow_mut().events.push(event);
    }
}

fn index_of(cell: &Cell<Tile>) -> usize {
    cell.index().unwrap_or(usize::MAX)
}

impl ActionDelegate for Recorder {
    fn on_tap(&mut self, index: usize) {
        self.push(Event::Tap(index));
    }

    fn on_tap_empty_space(&mut self) {
        self.push(Event::TapEmptySpace);
    }

    fn on_delete_requested(&mut self, index: usize) {
        self.push(Event::DeleteRequested(index));
    }

    fn on_editing_changed(&mut self, editing: bool) {
        self.push(Event::EditingChanged(editing));
    }
}

impl SortingDelegate<Tile> for Recorder {
    fn on_move(&mut self, from: usize, to: usize) {
        self.push(Event::Move(from, to));
    }

    fn on_exchange(&mut self, a: usize, b: usize) {
        self.push(Event::Exchange(a, b));
    }

    fn on_drag_start(&mut self, cell: &Cell<Tile>) {
        self.push(Event::DragStart(index_of(cell)));
    }

    fn on_drag_end(&mut self, cell: &Cell<Tile>) {
        self.push(Event::DragEnd(index_of(cell)));
    }
}

impl TransformDelegate<Tile> for Recorder {
    fn full_size(&mut self, _cell: &Cell<Tile>, _index: usize, _hint: SizeHint) -> Size {
        Size::new(300.0, 400.0)
    }

    fn full_size_view(&mut self, _cell: &Cell<Tile>, index: usize) -> Tile {
        Tile {
            item: Some(1_000 + index),
        }
    }

    fn on_transform_start(&mut self, cell: &Cell<Tile>) {
        self.push(Event::TransformStart(index_of(cell)));
    }

    fn on_enter_full_size(&mut self, cell: &Cell<Tile>) {
        self.push(Event::EnterFullSize(index_of(cell)));
    }

    fn on_transform_end(&mut self, cell: &Cell<Tile>) {
        self.push(Event::TransformEnd(index_of(cell)));
    }
}

pub(crate) fn with_actions(grid: &mut GridView<Tile, Source>, log: &Log) {
    grid.set_action_delegate(Some(Box::new(Recorder { log: log.clone() })));
}

pub(crate) fn with_sorting(grid: &mut GridView<Tile, Source>, log: &Log) {
    grid.set_sorting_delegate(Some(Box::new(Recorder { log: log.clone() })));
}

pub(crate) fn with_transform(grid: &mut GridView<Tile, Source>, log: &Log) {
    grid.set_transform_delegate(Some(Box::new(Recorder { log: log.clone() })));
}
