// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid view controller: geometry, virtualization and index-space edits.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Point, Rect, Size};
use mosaic_layout::{Layout, LayoutKind, LayoutStrategy};
use mosaic_pool::{Cell, CellContent, CellHost, CellId, CellPool};

use crate::request::{Animation, Outbox, Transition};
use crate::sort::Autoscroll;
use crate::transform::TransformTracker;
use crate::{
    ActionDelegate, AnimationSubject, AnimationToken, DataSource, GridConfig, HostRequest,
    ItemAnimation, Orientation, Overlay, ScrollPosition, SizeHint, SortState, SortingDelegate,
    TransformDelegate, TransformState,
};

/// A virtualized, scrollable grid of equally sized items.
///
/// The grid owns the cells near the viewport and the interaction state, and
/// nothing else: the host owns the scroller, the gesture recognizers, the
/// animation clock and the rendering. The host feeds it viewport and offset
/// changes and gesture events, renders the cells it exposes, and runs the
/// [`HostRequest`]s it queues.
///
/// All points passed in are in container content coordinates (the scroll
/// offset is already included).
pub struct GridView<V, D> {
    pub(crate) data_source: D,
    pub(crate) config: GridConfig,
    pub(crate) layout: LayoutStrategy,
    pub(crate) pool: CellPool<V>,
    pub(crate) item_count: usize,
    pub(crate) item_size: Size,
    pub(crate) content_size: Size,
    pub(crate) viewport: Size,
    pub(crate) content_offset: Point,
    pub(crate) overlay: Overlay,
    pub(crate) orientation: Orientation,
    pub(crate) pending_orientation: Option<Orientation>,
    pub(crate) action: Option<Box<dyn ActionDelegate>>,
    pub(crate) sorting: Option<Box<dyn SortingDelegate<V>>>,
    pub(crate) transformer: Option<Box<dyn TransformDelegate<V>>>,
    pub(crate) editing: bool,
    pub(crate) scrolling: bool,
    pub(crate) long_press_active: bool,
    pub(crate) sort: SortState,
    pub(crate) autoscroll: Autoscroll,
    pub(crate) transform: TransformState,
    pub(crate) gestures: TransformTracker,
    pub(crate) outbox: Outbox,
}

impl<V, D> core::fmt::Debug for GridView<V, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridView")
            .field("layout", &self.layout.kind())
            .field("item_count", &self.item_count)
            .field("item_size", &self.item_size)
            .field("viewport", &self.viewport)
            .field("content_offset", &self.content_offset)
            .field("pool", &self.pool)
            .field("editing", &self.editing)
            .field("sort", &self.sort)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}

impl<V: CellContent, D: DataSource<V>> GridView<V, D> {
    /// Creates a grid over `data_source`.
    ///
    /// Nothing is loaded until the host reports a viewport with
    /// [`set_viewport`](Self::set_viewport).
    pub fn new(data_source: D, config: GridConfig) -> Self {
        let orientation = Orientation::default();
        let hint = SizeHint {
            orientation,
            idiom: config.idiom,
        };
        let item_count = data_source.item_count();
        let item_size = data_source.item_size(hint);
        let mut layout = LayoutStrategy::from_kind(config.layout);
        layout.configure(config.layout_config(item_size));
        layout.rebase(item_count, Rect::ZERO);
        Self {
            data_source,
            config,
            content_size: layout.content_size(),
            layout,
            pool: CellPool::new(),
            item_count,
            item_size,
            viewport: Size::ZERO,
            content_offset: Point::ZERO,
            overlay: Overlay::Container,
            orientation,
            pending_orientation: None,
            action: None,
            sorting: None,
            transformer: None,
            editing: false,
            scrolling: false,
            long_press_active: false,
            sort: SortState::Idle,
            autoscroll: Autoscroll::default(),
            transform: TransformState::Idle,
            gestures: TransformTracker::default(),
            outbox: Outbox::default(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the configuration and lays the grid out again.
    pub fn set_config(&mut self, config: GridConfig) {
        if config.layout != self.layout.kind() {
            self.layout = LayoutStrategy::from_kind(config.layout);
        }
        self.config = config;
        self.layout_with_animation(ItemAnimation::empty());
    }

    /// Installs or removes the tap and editing delegate.
    pub fn set_action_delegate(&mut self, delegate: Option<Box<dyn ActionDelegate>>) {
        self.action = delegate;
    }

    /// Installs or removes the drag-reorder delegate.
    pub fn set_sorting_delegate(&mut self, delegate: Option<Box<dyn SortingDelegate<V>>>) {
        self.sorting = delegate;
    }

    /// Installs or removes the pinch-to-expand delegate.
    pub fn set_transform_delegate(&mut self, delegate: Option<Box<dyn TransformDelegate<V>>>) {
        self.transformer = delegate;
    }

    /// Sets the space dragged and transforming cells are moved into.
    pub fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    /// The data source.
    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    /// The data source, mutably. Call [`reload`](Self::reload) or one of the
    /// index-space edits afterwards to bring the grid in line.
    pub fn data_source_mut(&mut self) -> &mut D {
        &mut self.data_source
    }

    /// The active layout strategy.
    pub fn layout_strategy(&self) -> &LayoutStrategy {
        &self.layout
    }

    /// Number of items the grid believes the data source holds.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Current item size.
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Total scrollable extent.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Current scroll offset.
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    /// Whether the host's scroller should snap to pages.
    pub fn paging_enabled(&self) -> bool {
        self.layout.requires_paging()
    }

    /// Whether editing mode is on.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// State of the drag-reorder interaction.
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// State of the pinch-to-expand interaction.
    pub fn transform_state(&self) -> TransformState {
        self.transform
    }

    /// The live cell for `id`.
    pub fn cell(&self, id: CellId) -> Option<&Cell<V>> {
        self.pool.get(id)
    }

    /// The live cell for `id`, mutably.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell<V>> {
        self.pool.get_mut(id)
    }

    /// The live cell showing `index`.
    pub fn cell_at_index(&self, index: usize) -> Option<CellId> {
        self.pool.cell_at(index)
    }

    /// Every live cell ordered by index, cells without one last.
    pub fn live_cells(&mut self) -> &[CellId] {
        self.pool.live_cells()
    }

    /// Takes a recycled cell, for use from
    /// [`CellProvider::cell_for_index`](mosaic_pool::CellProvider::cell_for_index)
    /// outside a load pass.
    pub fn dequeue_reusable_cell(&mut self, identifier: Option<&str>) -> Option<Cell<V>> {
        self.pool.dequeue(identifier)
    }

    /// Number of cells waiting in the reuse pool.
    pub fn reusable_count(&self) -> usize {
        self.pool.reusable().len()
    }

    /// Takes every request queued since the last call.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        self.outbox.drain()
    }

    /// Number of completions the grid is waiting for.
    pub fn pending_completions(&self) -> usize {
        self.outbox.pending()
    }

    /// Reports that the animation or timer behind `token` has finished.
    pub fn complete(&mut self, token: AnimationToken) {
        match self.outbox.take(token) {
            Some(transition) => self.run(transition),
            None => log::warn!("completion for unknown token {token:?}"),
        }
    }

    fn run(&mut self, transition: Transition) {
        match transition {
            Transition::DragSettled { cell } => self.finish_drag(cell),
            Transition::TransformCollapsed { cell } => self.finish_collapse(cell),
            Transition::RemovalFinished { cell, animated } => self.finish_removal(cell, animated),
            Transition::ReloadFinished { cell } => {
                self.pool.enqueue(cell);
            }
            Transition::AutoscrollStep { session, touch } => self.autoscroll_step(session, touch),
            Transition::AutoscrollPoll { session } => self.autoscroll_poll(session),
        }
    }

    pub(crate) fn duration(&self, animated: bool) -> Duration {
        if animated {
            self.config.animation_duration
        } else {
            Duration::ZERO
        }
    }

    /// Queues an animation and runs `then` once it completes.
    ///
    /// Zero-length animations complete before this returns.
    pub(crate) fn animate(
        &mut self,
        subject: AnimationSubject,
        duration: Duration,
        then: Option<Transition>,
    ) {
        if duration.is_zero() {
            self.outbox.push(HostRequest::Animate(Animation {
                token: None,
                duration,
                delay: Duration::ZERO,
                subject,
            }));
            if let Some(transition) = then {
                self.run(transition);
            }
            return;
        }
        let token = then.map(|transition| self.outbox.park(transition));
        self.outbox.push(HostRequest::Animate(Animation {
            token,
            duration,
            delay: Duration::ZERO,
            subject,
        }));
    }

    pub(crate) fn size_hint(&self) -> SizeHint {
        SizeHint {
            orientation: self.orientation,
            idiom: self.config.idiom,
        }
    }

    pub(crate) fn max_offset(&self) -> Point {
        Point::new(
            (self.content_size.width - self.viewport.width).max(0.0),
            (self.content_size.height - self.viewport.height).max(0.0),
        )
    }

    pub(crate) fn clamp_offset(&self, offset: Point) -> Point {
        let max = self.max_offset();
        Point::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y))
    }

    /// Moves the scroll offset on the grid's own initiative and tells the host.
    pub(crate) fn move_content_offset(&mut self, offset: Point, animated: bool) -> bool {
        if offset == self.content_offset {
            return false;
        }
        self.content_offset = offset;
        self.load_required_items();
        let duration = self.duration(animated);
        self.animate(AnimationSubject::ContentOffset, duration, None);
        true
    }

    /// Reports that the host's scroller moved.
    pub fn set_content_offset(&mut self, offset: Point) {
        if offset != self.content_offset {
            self.content_offset = offset;
            self.load_required_items();
        }
    }

    /// Reports whether the user is dragging or the scroller is decelerating.
    pub fn set_scrolling(&mut self, scrolling: bool) {
        self.scrolling = scrolling;
    }

    /// Reports a new viewport size and lays the grid out again.
    pub fn set_viewport(&mut self, size: Size) {
        if size != self.viewport {
            self.viewport = size;
            self.layout();
        }
    }

    /// Marks a rotation; the next [`layout`](Self::layout) applies it.
    pub fn on_orientation_will_change(&mut self, orientation: Orientation) {
        self.pending_orientation = Some(orientation);
    }

    /// The host's layout pass.
    pub fn layout(&mut self) {
        match self.pending_orientation.take() {
            Some(orientation) => {
                self.orientation = orientation;
                self.apply_rotation();
            }
            None => self.layout_with_animation(ItemAnimation::empty()),
        }
    }

    /// Recomputes geometry, moves every cell to its slot and loads what is
    /// now visible. Cells animate only with [`ItemAnimation::FADE`].
    pub fn layout_with_animation(&mut self, animation: ItemAnimation) {
        self.recompute_size(!animation.is_empty());
        self.relayout(animation.contains(ItemAnimation::FADE));
        self.load_required_items();
    }

    fn apply_rotation(&mut self) {
        let hint = self.size_hint();
        let size = self.data_source.item_size(hint);
        if size != self.item_size {
            self.item_size = size;
            let transforming = self.transform.cell();
            for (id, cell) in self.pool.iter_mut() {
                if Some(id) == transforming {
                    continue;
                }
                cell.set_size_keeping_center(size);
                cell.content_frame = cell.bounds();
            }
        }
        if let TransformState::FullSize { cell: id } = self.transform {
            if let (Some(delegate), Some(cell)) =
                (self.transformer.as_mut(), self.pool.get_mut(id))
            {
                if let Some(index) = cell.index() {
                    let full = delegate.full_size(cell, index, hint);
                    if let Some(content) = cell.full_size.as_mut() {
                        content.size = full;
                        content.frame = Rect::from_center_size(content.frame.center(), full);
                    }
                }
            }
        }
        self.recompute_size(false);
        self.relayout(false);
        self.load_required_items();
        log::debug!("applied {:?} layout", self.orientation);

        if let Some(paged) = self.layout.as_paged() {
            let width = paged.page_width();
            let page = paged
                .page_at_x(self.content_offset.x + width / 2.0)
                .unwrap_or(0);
            let target = Point::new(paged.page_origin_x(page), self.content_offset.y);
            let target = self.clamp_offset(target);
            self.move_content_offset(target, true);
        }
    }

    pub(crate) fn recompute_size(&mut self, animated: bool) {
        self.layout.configure(self.config.layout_config(self.item_size));
        self.layout
            .rebase(self.item_count, Rect::from_origin_size(Point::ZERO, self.viewport));
        let size = self.layout.content_size();
        if size != self.content_size {
            self.content_size = size;
            let duration = self.duration(animated);
            self.animate(AnimationSubject::ContentSize, duration, None);
        }
    }

    /// Moves every container-hosted cell to its layout frame. The dragged and
    /// transforming cells are left alone.
    pub(crate) fn relayout(&mut self, animated: bool) {
        let held = [self.sort.cell(), self.transform.cell()];
        for (id, cell) in self.pool.iter_mut() {
            if held.contains(&Some(id)) || cell.host != CellHost::Container {
                continue;
            }
            if let Some(index) = cell.index() {
                cell.frame = self.layout.frame_for_index(index);
            }
        }
        if animated {
            let duration = self.config.animation_duration;
            self.animate(AnimationSubject::Relayout, duration, None);
        }
    }

    pub(crate) fn load_required_items(&mut self) {
        let loaded =
            self.pool
                .load_required_items(&self.layout, self.content_offset, &mut self.data_source);
        if !self.editing {
            return;
        }
        for id in loaded {
            if let Some(cell) = self.pool.get_mut(id) {
                cell.editing = cell
                    .index()
                    .is_some_and(|index| self.data_source.can_delete(index));
            }
        }
    }

    /// Drops interaction state whose cell is no longer live.
    fn forget_dead_interactions(&mut self) {
        if self.sort.cell().is_some_and(|id| !self.pool.is_alive(id)) {
            log::debug!("drag target disappeared; dropping the drag");
            self.sort = SortState::Idle;
            self.autoscroll.active = false;
        }
        if self
            .transform
            .cell()
            .is_some_and(|id| !self.pool.is_alive(id))
        {
            log::debug!("transform target disappeared; dropping the transform");
            self.transform = TransformState::Idle;
            self.gestures = TransformTracker::default();
        }
    }

    /// Throws away every cell and re-reads count and item size.
    ///
    /// The scroll offset is kept where possible.
    pub fn reload(&mut self) {
        let previous = self.content_offset;
        self.pool.evict_all();
        self.forget_dead_interactions();
        self.item_count = self.data_source.item_count();
        self.item_size = self.data_source.item_size(self.size_hint());
        self.recompute_size(false);
        let target = self.clamp_offset(previous);
        if !self.move_content_offset(target, false) {
            self.load_required_items();
        }
        log::debug!("reloaded {} items", self.item_count);
    }

    /// Inserts an item at `index`, moving later items back by one.
    ///
    /// # Panics
    ///
    /// Panics if `index > item_count`.
    pub fn insert_at(&mut self, index: usize, animation: ItemAnimation) {
        assert!(
            index <= self.item_count,
            "insert index {index} out of range for {} items",
            self.item_count
        );
        let loaded = self.pool.loaded_range();
        self.pool.shift_indices(index, 1);
        self.item_count += 1;
        self.recompute_size(!animation.is_empty());

        if loaded.is_some_and(|range| range.contains(&index)) {
            if let Some(mut cell) = self
                .data_source
                .cell_for_index(index, self.pool.reusable_mut())
            {
                cell.frame = self.layout.frame_for_index(index);
                cell.content_frame = cell.bounds();
                cell.editing = self.editing && self.data_source.can_delete(index);
                let id = self.pool.attach(cell, Some(index));
                if animation.contains(ItemAnimation::FADE) {
                    let duration = self.config.animation_duration;
                    self.outbox.push(HostRequest::Animate(Animation {
                        token: None,
                        duration,
                        delay: duration,
                        subject: AnimationSubject::FadeIn(id),
                    }));
                }
            }
        }
        if animation.contains(ItemAnimation::SCROLL) {
            self.scroll_to(index, ScrollPosition::Nearest, true);
        }
        self.layout_with_animation(animation);
    }

    /// Removes the item at `index`, moving later items forward by one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= item_count`.
    pub fn remove_at(&mut self, index: usize, animation: ItemAnimation) {
        assert!(
            index < self.item_count,
            "remove index {index} out of range for {} items",
            self.item_count
        );
        let removed = self.pool.cell_at(index);
        if let Some(id) = removed {
            self.pool.set_index(id, None);
            if let Some(cell) = self.pool.get_mut(id) {
                cell.alpha = 0.0;
            }
        }
        self.pool.shift_indices(index + 1, -1);
        self.item_count -= 1;

        let animated = animation.contains(ItemAnimation::FADE);
        if animation.contains(ItemAnimation::SCROLL) {
            self.scroll_to(index, ScrollPosition::Nearest, animated);
        }
        self.recompute_size(animated);
        let subject = removed.map_or(AnimationSubject::Relayout, AnimationSubject::FadeOut);
        let duration = self.duration(animated);
        self.animate(
            subject,
            duration,
            Some(Transition::RemovalFinished {
                cell: removed,
                animated,
            }),
        );
    }

    fn finish_removal(&mut self, cell: Option<CellId>, animated: bool) {
        if let Some(id) = cell {
            self.pool.enqueue(id);
        }
        self.forget_dead_interactions();
        self.pool.reset_loaded_range();
        self.load_required_items();
        self.relayout(animated);
    }

    /// Replaces the cell showing `index` with a fresh one from the data source.
    ///
    /// # Panics
    ///
    /// Panics if `index >= item_count`.
    pub fn reload_at(&mut self, index: usize, animation: ItemAnimation) {
        assert!(
            index < self.item_count,
            "reload index {index} out of range for {} items",
            self.item_count
        );
        let Some(old) = self.pool.cell_at(index) else {
            return;
        };
        self.pool.set_index(old, None);
        let Some(mut cell) = self
            .data_source
            .cell_for_index(index, self.pool.reusable_mut())
        else {
            log::debug!("no replacement cell for index {index}; keeping the old one");
            self.pool.set_index(old, Some(index));
            return;
        };
        cell.frame = self.layout.frame_for_index(index);
        cell.content_frame = cell.bounds();
        cell.editing = self.editing && self.data_source.can_delete(index);
        let fresh = self.pool.attach(cell, Some(index));
        if let Some(cell) = self.pool.get_mut(old) {
            cell.alpha = 0.0;
        }

        if animation.contains(ItemAnimation::SCROLL) {
            self.scroll_to(index, ScrollPosition::Nearest, false);
        }
        let duration = self.duration(animation.contains(ItemAnimation::FADE));
        self.animate(AnimationSubject::FadeIn(fresh), duration, None);
        self.animate(
            AnimationSubject::FadeOut(old),
            duration,
            Some(Transition::ReloadFinished { cell: old }),
        );
    }

    /// Exchanges the items at `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= item_count`.
    pub fn swap(&mut self, a: usize, b: usize, animation: ItemAnimation) {
        assert!(
            a < self.item_count && b < self.item_count,
            "swap indices {a} and {b} out of range for {} items",
            self.item_count
        );
        let moved = [self.pool.cell_at(a), self.pool.cell_at(b)];
        self.pool.swap_indices(a, b);
        for id in moved.into_iter().flatten() {
            if let Some(cell) = self.pool.get_mut(id) {
                if let Some(index) = cell.index() {
                    cell.frame = self.layout.frame_for_index(index);
                }
            }
        }
        if animation.contains(ItemAnimation::SCROLL) {
            let visible = Rect::from_origin_size(self.content_offset, self.viewport);
            let shown = |index| visible.intersect(self.layout.frame_for_index(index)).area() > 0.0;
            let (a_shown, b_shown) = (shown(a), shown(b));
            if !a_shown {
                self.scroll_to(a, ScrollPosition::Nearest, true);
            } else if !b_shown {
                self.scroll_to(b, ScrollPosition::Nearest, true);
            }
        }
        let duration = self.config.animation_duration;
        self.animate(AnimationSubject::Relayout, duration, None);
    }

    /// Scrolls so that `index` is placed at `position`.
    ///
    /// Out-of-range indices are clamped to the last item. Paged layouts
    /// always scroll to the start of the page holding the item.
    pub fn scroll_to(&mut self, index: usize, position: ScrollPosition, animated: bool) {
        if self.item_count == 0 {
            return;
        }
        let index = index.min(self.item_count - 1);
        let frame = self.layout.frame_for_index(index);
        let current = self.content_offset;
        let target = if let Some(paged) = self.layout.as_paged() {
            Point::new(paged.page_origin_x(paged.page_for_index(index)), current.y)
        } else if self.layout.kind() == LayoutKind::Horizontal {
            let x = position.resolve(frame.x0, frame.x1, current.x, self.viewport.width);
            Point::new(x, current.y)
        } else {
            let y = position.resolve(frame.y0, frame.y1, current.y, self.viewport.height);
            Point::new(current.x, y)
        };
        let target = self.clamp_offset(target);
        self.move_content_offset(target, animated);
    }

    /// Responds to memory pressure: recycles everything off screen, then
    /// drops the whole reuse pool. Returns how many pooled cells were dropped.
    pub fn on_low_memory(&mut self) -> usize {
        let visible = self.layout.visible_range(self.content_offset);
        self.pool.cleanup_unseen_items(&visible);
        self.pool.purge_reusable()
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{Source, Tile, fixture, fixture_with, settle};
    use crate::{
        AnimationSubject, GridConfig, GridView, HostRequest, ItemAnimation, Orientation,
        ScrollPosition,
    };
    use alloc::vec::Vec;
    use kurbo::{Point, Size};
    use mosaic_layout::{Layout, LayoutKind};
    use mosaic_pool::Cell;

    fn indices(grid: &mut GridView<Tile, Source>) -> Vec<(usize, usize)> {
        let ids: Vec<_> = grid.live_cells().to_vec();
        ids.into_iter()
            .filter_map(|id| {
                let cell = grid.cell(id)?;
                Some((cell.index()?, cell.content.item?))
            })
            .collect()
    }

    #[test]
    fn viewport_loads_the_visible_range() {
        let (mut grid, _) = fixture(250);
        assert_eq!(grid.live_cells().len(), 18);
        let frame = grid.cell(grid.cell_at_index(3).unwrap()).unwrap().frame;
        assert_eq!(frame.origin(), Point::new(5.0, 115.0));
        assert!(!grid.paging_enabled());
    }

    #[test]
    fn scrolling_keeps_live_cells_within_the_visible_range() {
        let (mut grid, _) = fixture(250);
        let mut y = 0.0;
        while y < grid.content_size().height {
            grid.set_content_offset(Point::new(0.0, y));
            let visible = grid.layout_strategy().visible_range(Point::new(0.0, y));
            let live = grid.live_cells().to_vec();
            assert_eq!(live.len(), visible.len(), "offset {y}");
            for id in live {
                let index = grid.cell(id).unwrap().index().unwrap();
                assert!(visible.contains(&index) && index < 250);
            }
            y += 70.0;
        }
    }

    #[test]
    fn insert_then_remove_restores_every_index() {
        let (mut grid, _) = fixture(30);
        let before = indices(&mut grid);
        grid.data_source_mut().insert(4);
        grid.insert_at(4, ItemAnimation::empty());
        assert_eq!(grid.item_count(), 31);
        let id = grid.cell_at_index(5).unwrap();
        assert_eq!(grid.cell(id).unwrap().content.item, Some(4));

        grid.data_source_mut().remove(4);
        grid.remove_at(4, ItemAnimation::empty());
        assert_eq!(grid.item_count(), 30);
        assert_eq!(indices(&mut grid), before);
    }

    #[test]
    fn appending_shifts_nothing() {
        let (mut grid, _) = fixture(6);
        let before: Vec<_> = (0..6).map(|i| grid.cell_at_index(i).unwrap()).collect();
        grid.data_source_mut().insert(6);
        grid.insert_at(6, ItemAnimation::empty());
        assert_eq!(grid.item_count(), 7);
        for (index, id) in before.into_iter().enumerate() {
            assert_eq!(grid.cell(id).unwrap().index(), Some(index));
        }
        assert!(grid.cell_at_index(6).is_some());
    }

    #[test]
    fn inserting_past_the_loaded_window_creates_nothing() {
        let (mut grid, log) = fixture(250);
        assert_eq!(grid.pool.loaded_range(), Some(0..18));
        grid.drain_requests();
        let created = log.borrow().created;
        grid.data_source_mut().insert(18);
        grid.insert_at(18, ItemAnimation::FADE);
        assert!(grid.cell_at_index(18).is_none());
        assert_eq!(log.borrow().created, created);
        let fades = |requests: Vec<HostRequest>| {
            requests
                .into_iter()
                .filter_map(|r| match r {
                    HostRequest::Animate(a) => match a.subject {
                        AnimationSubject::FadeIn(id) => Some(id),
                        _ => None,
                    },
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert!(fades(grid.drain_requests()).is_empty());

        // The last loaded slot still gets a live, fading cell.
        grid.data_source_mut().insert(17);
        grid.insert_at(17, ItemAnimation::FADE);
        let faded = fades(grid.drain_requests());
        assert_eq!(faded.len(), 1);
        assert_eq!(grid.cell_at_index(17), Some(faded[0]));
    }

    #[test]
    fn faded_removal_keeps_the_cell_until_it_completes() {
        let (mut grid, _) = fixture(30);
        grid.drain_requests();
        let removed = grid.cell_at_index(2).unwrap();
        grid.data_source_mut().remove(2);
        grid.remove_at(2, ItemAnimation::FADE);
        assert!(grid.cell(removed).is_some_and(|c| c.index().is_none() && c.alpha == 0.0));
        assert_eq!(grid.pending_completions(), 1);
        let requests = grid.drain_requests();
        assert!(requests.iter().any(|r| matches!(
            r,
            HostRequest::Animate(a)
                if a.subject == AnimationSubject::FadeOut(removed) && a.token.is_some()
        )));
        for request in requests {
            if let HostRequest::Animate(animation) = request {
                if let Some(token) = animation.token {
                    grid.complete(token);
                }
            }
        }
        assert!(grid.cell(removed).is_none());
        assert_eq!(grid.pending_completions(), 0);
        let live = grid.live_cells().len();
        let visible = grid.layout_strategy().visible_range(grid.content_offset());
        assert_eq!(live, visible.len());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn removing_past_the_end_panics() {
        let (mut grid, _) = fixture(3);
        grid.remove_at(3, ItemAnimation::empty());
    }

    #[test]
    fn swap_exchanges_two_cells_and_their_frames() {
        let (mut grid, _) = fixture(30);
        let a = grid.cell_at_index(0).unwrap();
        let b = grid.cell_at_index(4).unwrap();
        grid.swap(0, 4, ItemAnimation::empty());
        settle(&mut grid);
        assert_eq!(grid.cell_at_index(0), Some(b));
        assert_eq!(grid.cell_at_index(4), Some(a));
        let layout = grid.layout_strategy();
        assert_eq!(grid.cell(a).unwrap().frame, layout.frame_for_index(4));
        assert_eq!(grid.cell(b).unwrap().frame, layout.frame_for_index(0));
    }

    #[test]
    fn reload_at_fades_out_the_old_cell() {
        let (mut grid, _) = fixture(30);
        let old = grid.cell_at_index(1).unwrap();
        grid.reload_at(1, ItemAnimation::FADE);
        let fresh = grid.cell_at_index(1).unwrap();
        assert_ne!(fresh, old);
        assert!(grid.cell(old).is_some());
        settle(&mut grid);
        assert!(grid.cell(old).is_none());
        assert_eq!(grid.cell_at_index(1), Some(fresh));
    }

    #[test]
    fn low_memory_purges_the_pool_only() {
        let (mut grid, source) = fixture_with(
            250,
            Size::new(330.0, 250.0),
            GridConfig {
                center_grid: false,
                ..GridConfig::default()
            },
        );
        assert_eq!(grid.live_cells().len(), 12);
        for _ in 0..5 {
            grid.pool.reusable_mut().push(Cell::new(Tile::default()));
        }
        assert_eq!(grid.reusable_count(), 5);
        assert_eq!(grid.on_low_memory(), 5);
        assert_eq!(grid.reusable_count(), 0);
        assert_eq!(grid.live_cells().len(), 12);

        let created = source.borrow().created;
        grid.set_content_offset(Point::new(0.0, 1_100.0));
        // The first pass recycles the cells it evicts; nothing fails.
        assert!(grid.cell_at_index(30).is_some());
        grid.on_low_memory();
        grid.set_content_offset(Point::new(0.0, 0.0));
        assert!(grid.cell_at_index(0).is_some());
        assert!(source.borrow().created > created);
    }

    #[test]
    fn scroll_to_aligns_on_the_scroll_axis() {
        let (mut grid, _) = fixture(250);
        grid.scroll_to(30, ScrollPosition::Start, false);
        assert_eq!(grid.content_offset(), Point::new(0.0, 1_105.0));
        grid.scroll_to(30, ScrollPosition::Nearest, false);
        assert_eq!(grid.content_offset(), Point::new(0.0, 1_105.0));
        grid.scroll_to(0, ScrollPosition::End, false);
        assert_eq!(grid.content_offset(), Point::ZERO);
        // Clamped to the last item, whose bottom edge sits 5 above the content end.
        grid.scroll_to(10_000, ScrollPosition::End, false);
        let max = grid.content_size().height - grid.viewport().height;
        assert_eq!(grid.content_offset().y, max - 5.0);
    }

    #[test]
    fn paged_scroll_lands_on_page_starts() {
        let (mut grid, _) = fixture_with(
            100,
            Size::new(330.0, 225.0),
            GridConfig {
                layout: LayoutKind::HorizontalPagedLeftToRight,
                center_grid: false,
                ..GridConfig::default()
            },
        );
        assert!(grid.paging_enabled());
        grid.scroll_to(13, ScrollPosition::Nearest, false);
        assert_eq!(grid.content_offset(), Point::new(660.0, 0.0));
    }

    #[test]
    fn rotation_requeries_the_item_size() {
        let (mut grid, source) = fixture(250);
        source.borrow_mut().size = Size::new(150.0, 150.0);
        grid.on_orientation_will_change(Orientation::Landscape);
        grid.set_viewport(Size::new(480.0, 330.0));
        assert_eq!(grid.item_size(), Size::new(150.0, 150.0));
        let id = grid.cell_at_index(0).unwrap();
        assert_eq!(grid.cell(id).unwrap().frame.size(), Size::new(150.0, 150.0));
        assert_eq!(
            source.borrow().hints.last().map(|h| h.orientation),
            Some(Orientation::Landscape)
        );
    }

    #[test]
    fn reload_rereads_the_count_and_clamps_the_offset() {
        let (mut grid, _) = fixture(250);
        grid.set_content_offset(Point::new(0.0, 5_000.0));
        grid.data_source_mut().truncate(10);
        grid.reload();
        assert_eq!(grid.item_count(), 10);
        assert_eq!(grid.content_offset(), Point::ZERO);
        assert!(grid.cell_at_index(9).is_some());
        assert!(grid.cell_at_index(10).is_none());
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let (mut grid, _) = fixture(10);
        grid.remove_at(0, ItemAnimation::FADE);
        let token = grid
            .drain_requests()
            .into_iter()
            .find_map(|r| match r {
                HostRequest::Animate(a) => a.token,
                _ => None,
            })
            .unwrap();
        grid.complete(token);
        assert_eq!(grid.pending_completions(), 0);
        grid.complete(token);
        assert_eq!(grid.item_count(), 9);
    }
}
