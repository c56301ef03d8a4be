// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Insets, Size};

/// Upper bound on the number of items fitted into one row or column.
const MAX_FIT: usize = 1 << 20;

#[allow(
    clippy::cast_possible_truncation,
    reason = "Saturating float-to-int cast; callers clamp the result immediately"
)]
#[inline]
pub(crate) fn floor_to_isize(value: f64) -> isize {
    let truncated = value as isize;
    // Round towards -∞ (the cast above has already truncated).
    if (truncated as f64) > value {
        truncated.saturating_sub(1)
    } else {
        truncated
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Saturating float-to-int cast; callers clamp the result immediately"
)]
#[inline]
pub(crate) fn ceil_to_isize(value: f64) -> isize {
    let truncated = value as isize;
    if (truncated as f64) < value {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}

#[inline]
pub(crate) fn floor(value: f64) -> f64 {
    floor_to_isize(value) as f64
}

#[inline]
pub(crate) fn ceil(value: f64) -> f64 {
    ceil_to_isize(value) as f64
}

/// Floors a non-negative ratio into an index, returning `None` for negatives.
#[inline]
pub(crate) fn cell_coord(value: f64, pitch: f64) -> Option<usize> {
    if pitch <= 0.0 || value < 0.0 || !value.is_finite() {
        return None;
    }
    usize::try_from(floor_to_isize(value / pitch)).ok()
}

/// Largest `n >= 1` such that `n * (item + spacing) - spacing <= available`.
///
/// A non-positive pitch or a non-finite extent yields `1`.
pub(crate) fn fit_count(available: f64, item: f64, spacing: f64) -> usize {
    let pitch = item + spacing;
    if pitch <= 0.0 || !pitch.is_finite() || !available.is_finite() {
        return 1;
    }
    let fits = |n: usize| (n as f64) * pitch - spacing <= available;
    let estimate = floor_to_isize((available + spacing) / pitch);
    let mut n = usize::try_from(estimate).unwrap_or(1).clamp(1, MAX_FIT);
    // The division can land one step off in either direction.
    while n > 1 && !fits(n) {
        n -= 1;
    }
    while n < MAX_FIT && fits(n + 1) {
        n += 1;
    }
    n
}

/// Edge insets that center `content` inside `bounds`, never smaller than `min`.
pub(crate) fn centered_insets(min: Insets, bounds: Size, content: Size) -> Insets {
    let width_space = floor((bounds.width - content.width) / 2.0);
    let height_space = floor((bounds.height - content.height) / 2.0);
    Insets::new(
        width_space.max(min.x0),
        height_space.max(min.y0),
        width_space.max(min.x1),
        height_space.max(min.y1),
    )
}
