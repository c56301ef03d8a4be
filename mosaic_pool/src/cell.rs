// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cell record: host content plus the visual state the grid drives.

use alloc::string::String;

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Host-side content displayed by a [`Cell`].
///
/// Implement this for whatever the host uses as a view handle. The hook runs
/// every time the cell is returned to the reuse pool.
pub trait CellContent {
    /// Clears per-item state before the content is bound to another index.
    fn prepare_for_reuse(&mut self) {}
}

/// Which coordinate space a cell's frame is expressed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellHost {
    /// Scroll container content coordinates. Clipped by the viewport.
    #[default]
    Container,
    /// The overlay above the container, used while a cell is dragged or
    /// transformed.
    Overlay,
}

/// Scale, rotation and translation accumulated on a cell's content.
///
/// The three components compose independently; [`to_affine`](Self::to_affine)
/// applies them about a center point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContentTransform {
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Translation applied after scaling and rotating.
    pub translation: Vec2,
}

impl ContentTransform {
    /// No scale, rotation, or translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation: 0.0,
        translation: Vec2::ZERO,
    };

    /// Returns `true` if this transform leaves content untouched.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns the affine transform that scales and rotates about `center`,
    /// then translates.
    #[must_use]
    pub fn to_affine(&self, center: Point) -> Affine {
        Affine::translate(center.to_vec2() + self.translation)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(-center.to_vec2())
    }
}

impl Default for ContentTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A larger presentation of a cell's item, supplied by the host on demand.
#[derive(Clone, Debug)]
pub struct FullSizeContent<V> {
    /// The full-size view.
    pub view: V,
    /// The size the view wants when fully expanded.
    pub size: Size,
    /// Current frame, in the cell's local coordinates.
    pub frame: Rect,
    /// Current opacity.
    pub alpha: f64,
}

/// A reusable view slot bound to at most one item index.
///
/// The index is owned by [`CellPool`](crate::CellPool): a cell learns its index
/// when it is attached and loses it when it is enqueued for reuse. Everything
/// else is visual state the grid sets and the host renders.
#[derive(Clone, Debug)]
pub struct Cell<V> {
    /// Host content.
    pub content: V,
    reuse_identifier: Option<String>,
    pub(crate) index: Option<usize>,
    /// Frame in the coordinate space named by `host`.
    pub frame: Rect,
    /// The coordinate space of `frame`.
    pub host: CellHost,
    /// Opacity of the whole cell.
    pub alpha: f64,
    /// Opacity of the dark backing tint shown behind a transforming cell.
    pub backdrop_alpha: f64,
    /// Offset applied on top of `frame` while the cell follows a drag.
    pub drag_translation: Vec2,
    /// Frame of the content inside the cell, in cell-local coordinates.
    pub content_frame: Rect,
    /// Transform accumulated by pinch, rotation and pan gestures.
    pub content_transform: ContentTransform,
    /// Opacity of the thumbnail content.
    pub content_alpha: f64,
    /// Full-size content, present while a transform is in progress.
    pub full_size: Option<FullSizeContent<V>>,
    /// The cell presents its full-size content at full size.
    pub full_size_mode: bool,
    /// Editing mode is on and the item can be deleted.
    pub editing: bool,
    /// A wobble cue is running.
    pub shaking: bool,
    /// Touch-down feedback is showing.
    pub highlighted: bool,
}

impl<V> Cell<V> {
    /// Creates a detached cell with no reuse identifier.
    pub fn new(content: V) -> Self {
        Self {
            content,
            reuse_identifier: None,
            index: None,
            frame: Rect::ZERO,
            host: CellHost::Container,
            alpha: 1.0,
            backdrop_alpha: 0.0,
            drag_translation: Vec2::ZERO,
            content_frame: Rect::ZERO,
            content_transform: ContentTransform::IDENTITY,
            content_alpha: 1.0,
            full_size: None,
            full_size_mode: false,
            editing: false,
            shaking: false,
            highlighted: false,
        }
    }

    /// Creates a detached cell that recycles into the partition `identifier`.
    pub fn with_reuse_identifier(content: V, identifier: impl Into<String>) -> Self {
        let mut cell = Self::new(content);
        cell.reuse_identifier = Some(identifier.into());
        cell
    }

    /// The item index this cell currently displays.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The reuse partition this cell returns to.
    pub fn reuse_identifier(&self) -> Option<&str> {
        self.reuse_identifier.as_deref()
    }

    /// Cell bounds in its own coordinate space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame.size())
    }

    /// Resizes the frame about its center.
    pub fn set_size_keeping_center(&mut self, size: Size) {
        self.frame = Rect::from_center_size(self.frame.center(), size);
    }

    /// Restores full opacity and removes the backing tint.
    pub fn reset_transient_state(&mut self) {
        self.alpha = 1.0;
        self.backdrop_alpha = 0.0;
    }

    /// Clears transform state and the full-size presentation.
    pub fn reset_transform(&mut self) {
        self.content_transform = ContentTransform::IDENTITY;
        self.content_alpha = 1.0;
        self.full_size = None;
        self.full_size_mode = false;
        self.content_frame = self.bounds();
    }
}

impl<V: CellContent> Cell<V> {
    /// Clears every per-item flag and runs the content's own reuse hook.
    pub fn prepare_for_reuse(&mut self) {
        self.reset_transform();
        self.drag_translation = Vec2::ZERO;
        self.editing = false;
        self.shaking = false;
        self.highlighted = false;
        self.host = CellHost::Container;
        self.content.prepare_for_reuse();
    }
}
