// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch-to-expand: two-finger gestures lift an item into the overlay, scale,
//! rotate and pan its content, and on release either commit it to a
//! full-size presentation or send it back to its slot.
//!
//! Pinch, rotation and two-finger pan are tracked as a set of active
//! recognizers. The commit-or-collapse decision runs when the last of them
//! ends. The commit decision looks at the accumulated content scale, so a
//! full-size item that is pinched again restarts from
//! [`TransformConfig::reentry_scale`](crate::TransformConfig::reentry_scale)
//! and collapses only if pinched back below the commit threshold.

use kurbo::{Point, Rect, Vec2};
use mosaic_layout::Layout;
use mosaic_pool::{CellContent, CellHost, CellId, ContentTransform, FullSizeContent};

use crate::request::Transition;
use crate::{
    AnimationSubject, DataSource, GesturePhase, GestureTarget, GridView, HostRequest,
    ScrollPosition,
};

bitflags::bitflags! {
    /// The transform recognizers currently in progress.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TransformGestures: u8 {
        /// Pinch.
        const PINCH    = 0b0000_0001;
        /// Rotation.
        const ROTATION = 0b0000_0010;
        /// Two-finger pan.
        const PAN      = 0b0000_0100;
    }
}

/// Progress of the pinch-to-expand interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TransformState {
    /// No item is transformed.
    #[default]
    Idle,
    /// Gestures are driving `cell`'s content.
    Live {
        /// The lifted cell.
        cell: CellId,
    },
    /// `cell` shows its full-size content.
    FullSize {
        /// The expanded cell.
        cell: CellId,
    },
    /// `cell` is animating back to its slot.
    Collapsing {
        /// The released cell.
        cell: CellId,
    },
}

impl TransformState {
    /// The cell involved, if any.
    pub fn cell(self) -> Option<CellId> {
        match self {
            Self::Idle => None,
            Self::Live { cell } | Self::FullSize { cell } | Self::Collapsing { cell } => {
                Some(cell)
            }
        }
    }

    /// Returns `true` while gestures drive an item or it is expanded.
    pub fn is_transforming(self) -> bool {
        matches!(self, Self::Live { .. } | Self::FullSize { .. })
    }

    /// Returns `true` in any state but `Idle`.
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }
}

/// Per-gesture values needed to turn absolute recognizer readings into deltas.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TransformTracker {
    pub(crate) active: TransformGestures,
    pub(crate) last_scale: f64,
    pub(crate) last_rotation: f64,
}

impl Default for TransformTracker {
    fn default() -> Self {
        Self {
            active: TransformGestures::empty(),
            last_scale: 1.0,
            last_rotation: 0.0,
        }
    }
}

impl TransformTracker {
    fn rebase(&mut self) {
        self.last_scale = 1.0;
        self.last_rotation = 0.0;
    }
}

impl<V: CellContent, D: DataSource<V>> GridView<V, D> {
    /// Feeds the pinch recognizer.
    ///
    /// `scale` is the recognizer's cumulative scale (1.0 at `Began`) and
    /// `location` its centroid in content coordinates.
    pub fn pinch(&mut self, phase: GesturePhase, scale: f64, location: Point) {
        match phase {
            GesturePhase::Began => self.transform_began(TransformGestures::PINCH, location),
            GesturePhase::Changed => self.pinch_changed(scale),
            _ => self.transform_ended(TransformGestures::PINCH),
        }
    }

    /// Feeds the rotation recognizer. `rotation` is cumulative, in radians.
    pub fn rotation(&mut self, phase: GesturePhase, rotation: f64, location: Point) {
        match phase {
            GesturePhase::Began => self.transform_began(TransformGestures::ROTATION, location),
            GesturePhase::Changed => {
                let delta = rotation - self.gestures.last_rotation;
                self.gestures.last_rotation = rotation;
                if let Some(cell) = self.live_cell() {
                    cell.content_transform.rotation += delta;
                }
            }
            _ => self.transform_ended(TransformGestures::ROTATION),
        }
    }

    /// Feeds the two-finger pan recognizer.
    ///
    /// `delta` is the movement since the previous event and `touches` the
    /// number of fingers down. Losing a finger ends the pan.
    pub fn transform_pan(
        &mut self,
        phase: GesturePhase,
        delta: Vec2,
        touches: usize,
        location: Point,
    ) {
        match phase {
            GesturePhase::Began => {
                self.outbox.push(HostRequest::SetScrollEnabled(false));
                self.transform_began(TransformGestures::PAN, location);
            }
            GesturePhase::Changed if touches != 2 => self.transform_ended(TransformGestures::PAN),
            GesturePhase::Changed => {
                if let Some(cell) = self.live_cell() {
                    cell.content_transform.translation += delta;
                }
            }
            _ => self.transform_ended(TransformGestures::PAN),
        }
    }

    fn live_cell(&mut self) -> Option<&mut mosaic_pool::Cell<V>> {
        match self.transform {
            TransformState::Live { cell } => self.pool.get_mut(cell),
            _ => None,
        }
    }

    fn transform_began(&mut self, gesture: TransformGestures, location: Point) {
        self.gestures.active.insert(gesture);
        match self.transform {
            TransformState::FullSize { cell } => self.reenter_transform(cell),
            TransformState::Idle => {
                if let Some(index) = self.layout.index_at_point(location) {
                    self.transform_begin_at(index);
                }
            }
            TransformState::Live { .. } | TransformState::Collapsing { .. } => {}
        }
    }

    /// Lifts the cell at `index` into the overlay and fetches its full-size
    /// content.
    fn transform_begin_at(&mut self, index: usize) {
        let Some(id) = self.pool.cell_at(index) else {
            return;
        };
        let hint = self.size_hint();
        let bounds = self.overlay.bounds(self.viewport, self.content_offset);
        let Some(delegate) = self.transformer.as_mut() else {
            return;
        };
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        let slot = self.overlay.to_overlay(cell.frame, self.content_offset);
        cell.host = CellHost::Overlay;
        cell.frame = bounds;
        cell.content_frame = slot - bounds.origin().to_vec2();
        cell.content_transform = ContentTransform::IDENTITY;
        cell.backdrop_alpha = 0.0;
        let size = delegate.full_size(cell, index, hint);
        let view = delegate.full_size_view(cell, index);
        cell.full_size = Some(FullSizeContent {
            view,
            size,
            frame: cell.bounds(),
            alpha: 0.0,
        });
        delegate.on_transform_start(cell);
        self.transform = TransformState::Live { cell: id };
        self.gestures.rebase();
        log::debug!("transform began at index {index}");
    }

    fn reenter_transform(&mut self, id: CellId) {
        let config = self.config.transform;
        let crossfade = self.config.show_full_size_while_transforming;
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        let center = cell
            .full_size
            .as_ref()
            .map_or_else(|| cell.bounds().center(), |content| content.frame.center());
        cell.full_size_mode = false;
        cell.content_transform = ContentTransform {
            scale: config.reentry_scale,
            rotation: 0.0,
            translation: center - cell.content_frame.center(),
        };
        let alpha = config.crossfade_alpha(config.reentry_scale);
        cell.backdrop_alpha = alpha.min(config.max_backdrop_alpha);
        if crossfade {
            if let Some(content) = cell.full_size.as_mut() {
                content.alpha = alpha;
            }
            cell.content_alpha = 1.0 - alpha;
        }
        self.transform = TransformState::Live { cell: id };
        self.gestures.rebase();
        log::debug!("transform resumed from full size");
    }

    fn pinch_changed(&mut self, scale: f64) {
        let config = self.config.transform;
        let crossfade = self.config.show_full_size_while_transforming;
        let last = self.gestures.last_scale;
        self.gestures.last_scale = scale;
        let Some(cell) = self.live_cell() else {
            return;
        };
        let current = cell.content_transform.scale;
        if current <= 0.0 || !current.is_finite() || !scale.is_finite() {
            return;
        }
        let factor = (1.0 - (last - scale))
            .max(config.min_scale / current)
            .min(config.max_scale / current);
        let next = current * factor;
        cell.content_transform.scale = next;

        let alpha = config.crossfade_alpha(next);
        cell.backdrop_alpha = alpha.min(config.max_backdrop_alpha);
        if crossfade {
            if let Some(content) = cell.full_size.as_mut() {
                content.alpha = alpha;
            }
            cell.content_alpha = 1.0 - alpha;
        }
    }

    fn transform_ended(&mut self, gesture: TransformGestures) {
        if !self.gestures.active.contains(gesture) {
            return;
        }
        self.gestures.active.remove(gesture);
        if gesture == TransformGestures::PAN {
            self.outbox.push(HostRequest::SetScrollEnabled(true));
        }
        if self.gestures.active.is_empty() {
            self.transform_finish();
        }
    }

    fn transform_finish(&mut self) {
        let TransformState::Live { cell } = self.transform else {
            return;
        };
        let scale = self
            .pool
            .get(cell)
            .map_or(1.0, |cell| cell.content_transform.scale);
        if scale > self.config.transform.commit_scale {
            self.enter_full_size(cell);
        } else {
            self.collapse_transform(cell);
        }
    }

    fn enter_full_size(&mut self, id: CellId) {
        let backdrop = self.config.transform.max_backdrop_alpha;
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        cell.content_transform = ContentTransform::IDENTITY;
        cell.full_size_mode = true;
        cell.backdrop_alpha = backdrop;
        cell.content_alpha = 0.0;
        if let Some(content) = cell.full_size.as_mut() {
            content.alpha = 1.0;
            content.frame = Rect::from_center_size(content.frame.center(), content.size);
        }
        if let Some(delegate) = self.transformer.as_mut() {
            delegate.on_enter_full_size(cell);
        }
        self.transform = TransformState::FullSize { cell: id };
        self.gestures.rebase();
        self.outbox
            .push(HostRequest::TransferGestures(GestureTarget::FullSizeContent(id)));
        let duration = self.config.animation_duration;
        self.animate(AnimationSubject::Cell(id), duration, None);
        log::debug!("transform committed to full size");
    }

    fn collapse_transform(&mut self, id: CellId) {
        let slot = self
            .pool
            .index_of(id)
            .map(|index| {
                self.overlay
                    .to_overlay(self.layout.frame_for_index(index), self.content_offset)
            });
        let Some(cell) = self.pool.get_mut(id) else {
            return;
        };
        cell.full_size_mode = false;
        cell.content_transform = ContentTransform::IDENTITY;
        cell.content_alpha = 1.0;
        cell.backdrop_alpha = 0.0;
        if let Some(content) = cell.full_size.as_mut() {
            content.alpha = 0.0;
        }
        if let Some(slot) = slot {
            cell.content_frame = slot - cell.frame.origin().to_vec2();
        }
        self.transform = TransformState::Collapsing { cell: id };
        self.gestures.rebase();
        log::debug!("transform collapsing");
        let duration = self.config.animation_duration;
        self.animate(
            AnimationSubject::Cell(id),
            duration,
            Some(Transition::TransformCollapsed { cell: id }),
        );
    }

    pub(crate) fn finish_collapse(&mut self, id: CellId) {
        if self.transform != (TransformState::Collapsing { cell: id }) {
            return;
        }
        self.transform = TransformState::Idle;
        self.gestures = TransformTracker::default();
        self.return_transformed_cell(id);
        log::debug!("transform ended");
    }

    /// Puts a cell that left the container for a transform back in its slot,
    /// or recycles it if its item is gone.
    fn return_transformed_cell(&mut self, id: CellId) {
        let index = self.pool.index_of(id);
        let frame = index.map(|index| self.layout.frame_for_index(index));
        if let Some(cell) = self.pool.get_mut(id) {
            if let Some(frame) = frame {
                cell.host = CellHost::Container;
                cell.frame = frame;
            }
            cell.backdrop_alpha = 0.0;
            cell.reset_transform();
            if let Some(delegate) = self.transformer.as_mut() {
                delegate.on_transform_end(cell);
            }
        }
        if index.is_none() {
            self.pool.enqueue(id);
        }
        self.outbox
            .push(HostRequest::TransferGestures(GestureTarget::Container));
    }

    /// Shows the item at `index` at full size straight away, ending any
    /// transform already in progress.
    ///
    /// # Panics
    ///
    /// Panics if `index >= item_count`.
    pub fn display_full_screen(&mut self, index: usize) {
        assert!(
            index < self.item_count,
            "full-screen index {index} out of range for {} items",
            self.item_count
        );
        if let Some(id) = self.transform.cell() {
            self.transform = TransformState::Idle;
            self.gestures = TransformTracker::default();
            self.return_transformed_cell(id);
            self.reload();
        }
        if self.pool.cell_at(index).is_none() {
            self.scroll_to(index, ScrollPosition::Nearest, false);
        }
        self.transform_begin_at(index);
        if let TransformState::Live { cell } = self.transform {
            self.enter_full_size(cell);
        }
    }
}
