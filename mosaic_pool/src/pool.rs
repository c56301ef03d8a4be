// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live cells, their index map, and the visible-window load/evict passes.

use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use kurbo::Point;
use mosaic_layout::Layout;
use smallvec::SmallVec;

use crate::{Cell, CellContent, CellHost, ReusePool};

/// Identifier for a live cell in a [`CellPool`] (generational).
///
/// Ids stay valid while the cell is live. Once a cell is detached or enqueued
/// its id goes stale, and a later cell reusing the same slot gets a newer
/// generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CellId(u32, u32);

impl CellId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "CellId uses 32-bit slot indices by design."
    )]
    const fn new(slot: usize, generation: u32) -> Self {
        Self(slot as u32, generation)
    }

    const fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Produces cells for item indices on behalf of a [`CellPool`].
///
/// Implementations should draw from `reusable` (see [`ReusePool::dequeue`])
/// before creating new content. Returning `None` leaves the index empty until
/// the next load pass.
pub trait CellProvider<V> {
    /// Returns a cell for `index`, or `None` if none can be supplied right now.
    fn cell_for_index(&mut self, index: usize, reusable: &mut ReusePool<V>) -> Option<Cell<V>>;
}

struct Slot<V> {
    generation: u32,
    cell: Cell<V>,
}

/// Owns every live cell and the mapping from item index to cell.
///
/// A live cell is either bound to an index (and reachable through
/// [`cell_at`](Self::cell_at)) or temporarily unindexed while an animation
/// finishes with it. Cells leave the pool through [`enqueue`](Self::enqueue),
/// which recycles them, or [`detach`](Self::detach), which hands them back.
pub struct CellPool<V> {
    /// slots
    slots: Vec<Option<Slot<V>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    by_index: HashMap<usize, CellId>,
    reusable: ReusePool<V>,
    loaded: Option<Range<usize>>,
    live: Vec<CellId>,
    live_dirty: bool,
}

impl<V> core::fmt::Debug for CellPool<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("CellPool")
            .field("slots_total", &self.slots.len())
            .field("slots_alive", &alive)
            .field("indexed", &self.by_index.len())
            .field("loaded", &self.loaded)
            .field("reusable", &self.reusable)
            .finish_non_exhaustive()
    }
}

impl<V> Default for CellPool<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            by_index: HashMap::new(),
            reusable: ReusePool::new(),
            loaded: None,
            live: Vec::new(),
            live_dirty: false,
        }
    }
}

impl<V> CellPool<V> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `cell` live, bound to `index` if given.
    ///
    /// The index must not already be bound to another live cell.
    pub fn attach(&mut self, mut cell: Cell<V>, index: Option<usize>) -> CellId {
        self.live_dirty = true;
        cell.index = index;
        let (slot, generation) = if let Some(slot) = self.free_list.pop() {
            let generation = self.generations[slot].saturating_add(1);
            self.generations[slot] = generation;
            self.slots[slot] = Some(Slot { generation, cell });
            (slot, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot { generation, cell }));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        let id = CellId::new(slot, generation);
        if let Some(index) = index {
            let previous = self.by_index.insert(index, id);
            debug_assert!(previous.is_none(), "index {index} was already bound");
        }
        id
    }

    /// Removes a live cell and returns it, unindexed.
    pub fn detach(&mut self, id: CellId) -> Option<Cell<V>> {
        if !self.is_alive(id) {
            return None;
        }
        self.live_dirty = true;
        let mut slot = self.slots[id.slot()].take()?;
        self.free_list.push(id.slot());
        if let Some(index) = slot.cell.index.take() {
            if self.by_index.get(&index) == Some(&id) {
                self.by_index.remove(&index);
            }
        }
        Some(slot.cell)
    }

    /// Returns `true` if `id` refers to a live cell.
    pub fn is_alive(&self, id: CellId) -> bool {
        self.slots
            .get(id.slot())
            .and_then(Option::as_ref)
            .is_some_and(|slot| slot.generation == id.1)
    }

    /// The live cell for `id`.
    pub fn get(&self, id: CellId) -> Option<&Cell<V>> {
        self.slots
            .get(id.slot())?
            .as_ref()
            .filter(|slot| slot.generation == id.1)
            .map(|slot| &slot.cell)
    }

    /// The live cell for `id`, mutably.
    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell<V>> {
        self.slots
            .get_mut(id.slot())?
            .as_mut()
            .filter(|slot| slot.generation == id.1)
            .map(|slot| &mut slot.cell)
    }

    /// The live cell bound to `index`.
    pub fn cell_at(&self, index: usize) -> Option<CellId> {
        self.by_index.get(&index).copied()
    }

    /// The index `id` is bound to.
    pub fn index_of(&self, id: CellId) -> Option<usize> {
        self.get(id).and_then(Cell::index)
    }

    /// Rebinds a live cell to `index`, or unbinds it with `None`.
    ///
    /// The new index must not be bound to a different live cell.
    pub fn set_index(&mut self, id: CellId, index: Option<usize>) {
        let Some(slot) = self.slots.get_mut(id.slot()).and_then(Option::as_mut) else {
            return;
        };
        if slot.generation != id.1 {
            return;
        }
        self.live_dirty = true;
        if let Some(old) = slot.cell.index {
            if self.by_index.get(&old) == Some(&id) {
                self.by_index.remove(&old);
            }
        }
        slot.cell.index = index;
        if let Some(index) = index {
            let previous = self.by_index.insert(index, id);
            debug_assert!(
                previous.is_none_or(|other| other == id),
                "index {index} was already bound"
            );
        }
    }

    /// Adds `delta` to the index of every bound cell at or after `from`.
    ///
    /// Shifting is done as one remap, so cells never collide with each other
    /// mid-shift. A cell shifted below zero is unbound.
    pub fn shift_indices(&mut self, from: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let moved: SmallVec<[(usize, CellId); 32]> = self
            .by_index
            .iter()
            .filter(|(index, _)| **index >= from)
            .map(|(index, id)| (*index, *id))
            .collect();
        if moved.is_empty() {
            return;
        }
        self.live_dirty = true;
        for (index, _) in &moved {
            self.by_index.remove(index);
        }
        for (index, id) in moved {
            let target = index.checked_add_signed(delta);
            if let Some(cell) = self.get_mut(id) {
                cell.index = target;
            }
            if let Some(target) = target {
                let previous = self.by_index.insert(target, id);
                debug_assert!(previous.is_none(), "shift collided at index {target}");
            }
        }
    }

    /// Exchanges the cells bound to `a` and `b`. Either may be unbound.
    pub fn swap_indices(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.live_dirty = true;
        let first = self.by_index.remove(&a);
        let second = self.by_index.remove(&b);
        if let Some(id) = first {
            self.rebind(id, b);
        }
        if let Some(id) = second {
            self.rebind(id, a);
        }
    }

    /// Moves the cell bound to `from` to `to`, sliding every cell in between
    /// one slot towards `from`.
    pub fn move_index(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.live_dirty = true;
        let moving = self.by_index.remove(&from);
        if from < to {
            for index in from + 1..=to {
                if let Some(id) = self.by_index.remove(&index) {
                    self.rebind(id, index - 1);
                }
            }
        } else {
            for index in (to..from).rev() {
                if let Some(id) = self.by_index.remove(&index) {
                    self.rebind(id, index + 1);
                }
            }
        }
        if let Some(id) = moving {
            self.rebind(id, to);
        }
    }

    fn rebind(&mut self, id: CellId, index: usize) {
        if let Some(cell) = self.get_mut(id) {
            cell.index = Some(index);
            self.by_index.insert(index, id);
        }
    }

    /// Takes a cell out of the reuse pool.
    pub fn dequeue(&mut self, identifier: Option<&str>) -> Option<Cell<V>> {
        self.reusable.dequeue(identifier)
    }

    /// The reuse pool.
    pub fn reusable(&self) -> &ReusePool<V> {
        &self.reusable
    }

    /// The reuse pool, mutably.
    pub fn reusable_mut(&mut self) -> &mut ReusePool<V> {
        &mut self.reusable
    }

    /// Drops every pooled cell outright. Live cells are untouched.
    pub fn purge_reusable(&mut self) -> usize {
        let dropped = self.reusable.clear();
        log::debug!("purged {dropped} reusable cells");
        dropped
    }

    /// The contiguous index interval currently materialized.
    pub fn loaded_range(&self) -> Option<Range<usize>> {
        self.loaded.clone()
    }

    /// Forgets the loaded interval; the next load pass starts fresh.
    pub fn reset_loaded_range(&mut self) {
        self.loaded = None;
    }

    /// Number of live cells, bound or not.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Returns `true` if no cells are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live cell ids ordered by index, unbound cells last.
    ///
    /// The list is cached and rebuilt after any change to the live set or
    /// index assignment.
    pub fn live_cells(&mut self) -> &[CellId] {
        if self.live_dirty || self.live.len() != self.len() {
            self.live.clear();
            for (slot, entry) in self.slots.iter().enumerate() {
                if let Some(entry) = entry {
                    self.live.push(CellId::new(slot, entry.generation));
                }
            }
            let slots = &self.slots;
            self.live.sort_by_key(|id| {
                let index = slots[id.slot()].as_ref().and_then(|slot| slot.cell.index);
                (index.is_none(), index, id.slot())
            });
            self.live_dirty = false;
        }
        &self.live
    }

    /// Iterates live cells in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell<V>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            let entry = entry.as_ref()?;
            Some((CellId::new(slot, entry.generation), &entry.cell))
        })
    }

    /// Iterates live cells mutably, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CellId, &mut Cell<V>)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(slot, entry)| {
            let entry = entry.as_mut()?;
            Some((CellId::new(slot, entry.generation), &mut entry.cell))
        })
    }
}

impl<V: CellContent> CellPool<V> {
    /// Detaches a live cell, prepares it for reuse, and pools it.
    pub fn enqueue(&mut self, id: CellId) -> bool {
        let Some(mut cell) = self.detach(id) else {
            return false;
        };
        cell.prepare_for_reuse();
        cell.reset_transient_state();
        self.reusable.push(cell);
        true
    }

    /// Enqueues every live cell and forgets the loaded interval.
    pub fn evict_all(&mut self) -> usize {
        let ids: SmallVec<[CellId; 32]> = self.iter().map(|(id, _)| id).collect();
        let evicted = ids.len();
        for id in ids {
            self.enqueue(id);
        }
        self.loaded = None;
        log::trace!("evicted all {evicted} live cells");
        evicted
    }

    /// Recycles container-hosted cells whose index falls outside `visible`,
    /// then contracts the loaded interval to it.
    ///
    /// Cells in the overlay (dragged or transforming) and unbound cells
    /// (finishing an animation) are kept.
    pub fn cleanup_unseen_items(&mut self, visible: &Range<usize>) -> usize {
        let unseen: SmallVec<[CellId; 32]> = self
            .iter()
            .filter(|(_, cell)| cell.host == CellHost::Container)
            .filter(|(_, cell)| cell.index.is_some_and(|index| !visible.contains(&index)))
            .map(|(id, _)| id)
            .collect();
        let evicted = unseen.len();
        for id in unseen {
            self.enqueue(id);
        }
        if self.loaded.is_some() {
            self.loaded = Some(visible.clone());
        }
        if evicted > 0 {
            log::trace!("evicted {evicted} cells outside {visible:?}");
        }
        evicted
    }

    /// Brings the live set in line with the visible range at `offset`.
    ///
    /// Cells outside the range are recycled first, then every visible index
    /// without a cell is requested from `provider`, positioned at its layout
    /// frame and attached. Returns the newly attached cells.
    pub fn load_required_items(
        &mut self,
        layout: &impl Layout,
        offset: Point,
        provider: &mut impl CellProvider<V>,
    ) -> Vec<CellId> {
        let visible = layout.visible_range(offset);
        self.cleanup_unseen_items(&visible);
        self.loaded = Some(match self.loaded.take() {
            Some(loaded) => loaded.start.min(visible.start)..loaded.end.max(visible.end),
            None => visible.clone(),
        });

        let mut loaded = Vec::new();
        for index in visible.clone() {
            if self.by_index.contains_key(&index) {
                continue;
            }
            let Some(mut cell) = provider.cell_for_index(index, &mut self.reusable) else {
                log::debug!("no cell supplied for index {index}; retrying on the next pass");
                continue;
            };
            cell.frame = layout.frame_for_index(index);
            cell.content_frame = cell.bounds();
            cell.host = CellHost::Container;
            loaded.push(self.attach(cell, Some(index)));
        }
        if !loaded.is_empty() {
            log::trace!("loaded {} cells for {visible:?}", loaded.len());
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::{CellPool, CellProvider};
    use crate::{Cell, CellContent, CellHost, ReusePool};
    use alloc::vec::Vec;
    use kurbo::{Insets, Point, Rect, Size};
    use mosaic_layout::{Layout, LayoutConfig, LayoutKind, LayoutStrategy};

    #[derive(Debug, Default, PartialEq)]
    struct Tile {
        label: Option<usize>,
    }

    impl CellContent for Tile {
        fn prepare_for_reuse(&mut self) {
            self.label = None;
        }
    }

    #[derive(Default)]
    struct Source {
        created: usize,
        reused: usize,
        refuse: Vec<usize>,
    }

    impl CellProvider<Tile> for Source {
        fn cell_for_index(
            &mut self,
            index: usize,
            reusable: &mut ReusePool<Tile>,
        ) -> Option<Cell<Tile>> {
            if self.refuse.contains(&index) {
                return None;
            }
            let mut cell = if let Some(cell) = reusable.dequeue(None) {
                self.reused += 1;
                cell
            } else {
                self.created += 1;
                Cell::new(Tile::default())
            };
            cell.content.label = Some(index);
            Some(cell)
        }
    }

    fn layout(count: usize) -> LayoutStrategy {
        let mut layout = LayoutStrategy::from_kind(LayoutKind::Vertical);
        layout.configure(LayoutConfig::new(
            Size::new(100.0, 100.0),
            10.0,
            Insets::uniform(5.0),
            false,
        ));
        layout.rebase(count, Rect::new(0.0, 0.0, 330.0, 480.0));
        layout
    }

    fn assert_consistent(pool: &mut CellPool<Tile>) {
        let ids: Vec<_> = pool.live_cells().to_vec();
        for id in ids {
            if let Some(index) = pool.index_of(id) {
                assert_eq!(pool.cell_at(index), Some(id), "index map out of sync");
            }
        }
    }

    #[test]
    fn first_load_fills_the_visible_range() {
        let layout = layout(250);
        let mut pool = CellPool::new();
        let mut source = Source::default();
        let loaded = pool.load_required_items(&layout, Point::ZERO, &mut source);
        let visible = layout.visible_range(Point::ZERO);
        assert_eq!(loaded.len(), visible.len());
        assert_eq!(pool.len(), visible.len());
        assert_eq!(pool.loaded_range(), Some(visible.clone()));
        for index in visible {
            let id = pool.cell_at(index).unwrap();
            let cell = pool.get(id).unwrap();
            assert_eq!(cell.content.label, Some(index));
            assert_eq!(cell.frame, layout.frame_for_index(index));
        }
        assert_consistent(&mut pool);
    }

    #[test]
    fn scrolling_recycles_instead_of_creating() {
        let layout = layout(250);
        let mut pool = CellPool::new();
        let mut source = Source::default();
        pool.load_required_items(&layout, Point::ZERO, &mut source);
        let created = source.created;
        pool.load_required_items(&layout, Point::new(0.0, 2_000.0), &mut source);
        let visible = layout.visible_range(Point::new(0.0, 2_000.0));
        assert_eq!(pool.len(), visible.len());
        // Eviction runs first, so only the extra row of the deeper window is new.
        assert_eq!(source.reused, created);
        assert_eq!(source.created, visible.len());
        assert!(pool.reusable().is_empty());
        assert_consistent(&mut pool);
    }

    #[test]
    fn live_count_tracks_visible_range_while_scrolling() {
        let layout = layout(250);
        let mut pool = CellPool::new();
        let mut source = Source::default();
        let mut y = 0.0;
        while y < layout.content_size().height {
            pool.load_required_items(&layout, Point::new(0.0, y), &mut source);
            let visible = layout.visible_range(Point::new(0.0, y));
            assert_eq!(pool.len(), visible.len(), "offset {y}");
            for (_, cell) in pool.iter() {
                let index = cell.index().unwrap();
                assert!(visible.contains(&index) && index < 250);
            }
            y += 45.0;
        }
    }

    #[test]
    fn refused_indices_are_retried() {
        let layout = layout(30);
        let mut pool = CellPool::new();
        let mut source = Source {
            refuse: alloc::vec![4],
            ..Source::default()
        };
        pool.load_required_items(&layout, Point::ZERO, &mut source);
        assert!(pool.cell_at(4).is_none());
        assert!(pool.cell_at(5).is_some());
        source.refuse.clear();
        let loaded = pool.load_required_items(&layout, Point::ZERO, &mut source);
        assert_eq!(loaded.len(), 1);
        assert!(pool.cell_at(4).is_some());
    }

    #[test]
    fn overlay_cells_survive_cleanup() {
        let layout = layout(250);
        let mut pool = CellPool::new();
        let mut source = Source::default();
        pool.load_required_items(&layout, Point::ZERO, &mut source);
        let dragged = pool.cell_at(1).unwrap();
        pool.get_mut(dragged).unwrap().host = CellHost::Overlay;
        pool.load_required_items(&layout, Point::new(0.0, 3_000.0), &mut source);
        assert!(pool.is_alive(dragged));
        assert_eq!(pool.cell_at(1), Some(dragged));
    }

    #[test]
    fn enqueue_resets_visual_state() {
        let mut pool = CellPool::new();
        let mut cell = Cell::new(Tile { label: Some(3) });
        cell.alpha = 0.2;
        cell.backdrop_alpha = 0.7;
        cell.editing = true;
        let id = pool.attach(cell, Some(3));
        assert!(pool.enqueue(id));
        assert!(!pool.is_alive(id));
        assert!(pool.cell_at(3).is_none());
        let cell = pool.dequeue(None).unwrap();
        assert_eq!(cell.index(), None);
        assert_eq!(cell.alpha, 1.0);
        assert_eq!(cell.backdrop_alpha, 0.0);
        assert!(!cell.editing);
        assert_eq!(cell.content.label, None);
    }

    #[test]
    fn stale_ids_do_not_alias_reused_slots() {
        let mut pool = CellPool::new();
        let a = pool.attach(Cell::new(Tile::default()), Some(0));
        pool.detach(a);
        let b = pool.attach(Cell::new(Tile::default()), Some(1));
        assert_ne!(a, b);
        assert!(pool.get(a).is_none());
        assert!(pool.get(b).is_some());
    }

    #[test]
    fn shift_then_unshift_restores_indices() {
        let mut pool = CellPool::new();
        let ids: Vec<_> = (0..6)
            .map(|i| pool.attach(Cell::new(Tile::default()), Some(i)))
            .collect();
        pool.shift_indices(2, 1);
        assert_eq!(pool.index_of(ids[1]), Some(1));
        assert_eq!(pool.index_of(ids[2]), Some(3));
        assert_eq!(pool.index_of(ids[5]), Some(6));
        assert!(pool.cell_at(2).is_none());
        pool.shift_indices(3, -1);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(pool.index_of(*id), Some(i));
        }
        assert_consistent(&mut pool);
    }

    #[test]
    fn move_index_slides_the_cells_in_between() {
        let mut pool = CellPool::new();
        let ids: Vec<_> = (0..5)
            .map(|i| pool.attach(Cell::new(Tile::default()), Some(i)))
            .collect();
        pool.move_index(1, 3);
        assert_eq!(pool.index_of(ids[1]), Some(3));
        assert_eq!(pool.index_of(ids[2]), Some(1));
        assert_eq!(pool.index_of(ids[3]), Some(2));
        assert_eq!(pool.index_of(ids[4]), Some(4));
        pool.move_index(3, 0);
        assert_eq!(pool.index_of(ids[1]), Some(0));
        assert_eq!(pool.index_of(ids[0]), Some(1));
        assert_eq!(pool.index_of(ids[2]), Some(2));
        assert_consistent(&mut pool);
    }

    #[test]
    fn swap_exchanges_exactly_two() {
        let mut pool = CellPool::new();
        let ids: Vec<_> = (0..3)
            .map(|i| pool.attach(Cell::new(Tile::default()), Some(i)))
            .collect();
        pool.swap_indices(0, 2);
        assert_eq!(pool.index_of(ids[0]), Some(2));
        assert_eq!(pool.index_of(ids[2]), Some(0));
        assert_eq!(pool.index_of(ids[1]), Some(1));
        assert_eq!(pool.live_cells(), &[ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn purge_leaves_live_cells_alone() {
        let layout = layout(250);
        let mut pool = CellPool::new();
        let mut source = Source::default();
        pool.load_required_items(&layout, Point::ZERO, &mut source);
        let live = pool.len();
        for _ in 0..5 {
            pool.reusable_mut().push(Cell::new(Tile::default()));
        }
        assert_eq!(pool.purge_reusable(), 5);
        assert_eq!(pool.len(), live);
        let created = source.created;
        pool.evict_all();
        pool.purge_reusable();
        pool.load_required_items(&layout, Point::ZERO, &mut source);
        assert_eq!(source.created, created + live);
    }
}
