// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Requests the grid makes of its host, and the continuations behind them.
//!
//! The grid never animates anything itself. It sets its model to the final
//! state, queues a [`HostRequest`] describing what changed, and if something
//! has to happen afterwards it parks a continuation under an
//! [`AnimationToken`]. The host interpolates, then reports back through
//! [`GridView::complete`](crate::GridView::complete).

use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Point;
use mosaic_pool::CellId;

/// Identifies a pending completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationToken(u64);

/// What an [`Animation`] moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimationSubject {
    /// Every live cell moves to its current frame.
    Relayout,
    /// One cell's frame, transform or tint changes.
    Cell(CellId),
    /// One cell fades in to its current opacity.
    FadeIn(CellId),
    /// One cell fades out.
    FadeOut(CellId),
    /// The scroll offset moves to [`GridView::content_offset`](crate::GridView::content_offset).
    ContentOffset,
    /// The scrollable extent changes to [`GridView::content_size`](crate::GridView::content_size).
    ContentSize,
}

/// An animation the host should run from its current presentation to the
/// grid's model state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Animation {
    /// Report this token through `complete` when finished. `None` means no
    /// continuation is waiting.
    pub token: Option<AnimationToken>,
    /// Length of the animation. Zero means "apply immediately".
    pub duration: Duration,
    /// Wait before starting.
    pub delay: Duration,
    /// What moves.
    pub subject: AnimationSubject,
}

/// Which view the transform gestures should be attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureTarget {
    /// The scroll container.
    Container,
    /// The full-size content of the given cell.
    FullSizeContent(CellId),
}

/// Something the host must do on the grid's behalf.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HostRequest {
    /// Run an animation.
    Animate(Animation),
    /// Call back after `delay`.
    Timer {
        /// Report this through `complete` when the timer fires.
        token: AnimationToken,
        /// How long to wait.
        delay: Duration,
    },
    /// Move the pinch, rotation and two-finger pan recognizers.
    TransferGestures(GestureTarget),
    /// Enable or disable user scrolling of the container.
    SetScrollEnabled(bool),
}

/// A named continuation run when its token completes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Transition {
    /// A dropped cell reached its slot.
    DragSettled { cell: CellId },
    /// A released thumbnail is back at its slot.
    TransformCollapsed { cell: CellId },
    /// A removed cell finished fading out.
    RemovalFinished { cell: Option<CellId>, animated: bool },
    /// The replaced cell of a reload finished fading out.
    ReloadFinished { cell: CellId },
    /// An autoscroll nudge finished; `touch` is in viewport coordinates.
    AutoscrollStep { session: u32, touch: Point },
    /// The autoscroll poll delay elapsed.
    AutoscrollPoll { session: u32 },
}

/// Queued requests plus the continuations waiting on them.
#[derive(Debug, Default)]
pub(crate) struct Outbox {
    requests: Vec<HostRequest>,
    pending: HashMap<AnimationToken, Transition>,
    next: u64,
}

impl Outbox {
    pub(crate) fn push(&mut self, request: HostRequest) {
        self.requests.push(request);
    }

    /// Parks `transition` and returns the token that releases it.
    pub(crate) fn park(&mut self, transition: Transition) -> AnimationToken {
        self.next += 1;
        let token = AnimationToken(self.next);
        self.pending.insert(token, transition);
        token
    }

    pub(crate) fn take(&mut self, token: AnimationToken) -> Option<Transition> {
        self.pending.remove(&token)
    }

    pub(crate) fn drain(&mut self) -> Vec<HostRequest> {
        core::mem::take(&mut self.requests)
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.len()
    }
}
