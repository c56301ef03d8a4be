// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use core::time::Duration;

use kurbo::{Insets, Size};
use mosaic_layout::{LayoutConfig, LayoutKind};

/// How a dragged item rearranges its neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortStyle {
    /// Items between the old and new position slide over by one slot.
    Push,
    /// The dragged item trades places with the item it is dropped on.
    #[default]
    Swap,
}

/// The device form factor the host runs on.
///
/// Passed to the data source with every size query so that item and
/// full-size geometry can differ between form factors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DeviceIdiom {
    /// A handheld, small-screen device.
    #[default]
    Phone,
    /// A large-screen device.
    Tablet,
}

/// Interface orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

/// Context handed to size queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SizeHint {
    /// The orientation the size is for.
    pub orientation: Orientation,
    /// The device form factor.
    pub idiom: DeviceIdiom,
}

/// Tuning for the pinch-to-expand interaction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformConfig {
    /// Smallest content scale a pinch can reach.
    pub min_scale: f64,
    /// Largest content scale a pinch can reach.
    pub max_scale: f64,
    /// Releasing above this scale commits to full size.
    pub commit_scale: f64,
    /// Fraction of the way from 1x to `max_scale` at which the cross-fade to
    /// full-size content starts.
    pub crossfade_fraction: f64,
    /// Content scale a full-size item restarts from when pinched again.
    pub reentry_scale: f64,
    /// Upper bound of the backing tint's opacity.
    pub max_backdrop_alpha: f64,
}

impl TransformConfig {
    /// Scale at which the cross-fade starts.
    pub fn crossfade_start(&self) -> f64 {
        1.0 + self.crossfade_fraction * (self.max_scale - 1.0)
    }

    /// Cross-fade progress for a content `scale`, clamped to `[0, 1]`.
    pub fn crossfade_alpha(&self, scale: f64) -> f64 {
        let start = self.crossfade_start();
        let span = self.max_scale - start;
        if span <= 0.0 || !span.is_finite() {
            return if scale >= self.max_scale { 1.0 } else { 0.0 };
        }
        ((scale - start) / span).clamp(0.0, 1.0)
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            commit_scale: 2.0,
            crossfade_fraction: 0.5,
            reentry_scale: 2.5,
            max_backdrop_alpha: 0.9,
        }
    }
}

/// Everything a [`GridView`](crate::GridView) needs to know that is not data.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Layout strategy.
    pub layout: LayoutKind,
    /// Drag-reorder style.
    pub style: SortStyle,
    /// Gap between neighbouring items, in both directions.
    pub item_spacing: f64,
    /// Smallest allowed margin around the grid.
    pub min_edge_insets: Insets,
    /// Spread leftover space evenly on both sides of the grid.
    pub center_grid: bool,
    /// Form factor passed to size queries.
    pub idiom: DeviceIdiom,
    /// Hold time before a press arms a drag. The host configures its
    /// long-press recognizer with this.
    pub minimum_press_duration: Duration,
    /// Duration of every animation the grid requests.
    pub animation_duration: Duration,
    /// Delay between autoscroll checks while the drag sits away from an edge.
    pub autoscroll_poll_interval: Duration,
    /// Cross-fade to the full-size content while pinching.
    pub show_full_size_while_transforming: bool,
    /// A long press on an item enters editing mode instead of arming a drag.
    pub enable_edit_on_long_press: bool,
    /// While editing, only taps on empty space are admitted and they leave
    /// editing mode.
    pub disable_edit_on_empty_space_tap: bool,
    /// Pinch-to-expand tuning.
    pub transform: TransformConfig,
}

impl GridConfig {
    pub(crate) fn layout_config(&self, item_size: Size) -> LayoutConfig {
        LayoutConfig::new(
            item_size,
            self.item_spacing,
            self.min_edge_insets,
            self.center_grid,
        )
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Vertical,
            style: SortStyle::Swap,
            item_spacing: 10.0,
            min_edge_insets: Insets::uniform(5.0),
            center_grid: true,
            idiom: DeviceIdiom::Phone,
            minimum_press_duration: Duration::from_millis(200),
            animation_duration: Duration::from_millis(300),
            autoscroll_poll_interval: Duration::from_millis(500),
            show_full_size_while_transforming: true,
            enable_edit_on_long_press: false,
            disable_edit_on_empty_space_tap: false,
            transform: TransformConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GridConfig, TransformConfig};

    #[test]
    fn crossfade_runs_from_the_start_scale_to_max() {
        let transform = TransformConfig::default();
        assert_eq!(transform.crossfade_start(), 2.0);
        assert_eq!(transform.crossfade_alpha(1.0), 0.0);
        assert_eq!(transform.crossfade_alpha(2.5), 0.5);
        assert_eq!(transform.crossfade_alpha(3.0), 1.0);
        assert_eq!(transform.crossfade_alpha(9.0), 1.0);
    }

    #[test]
    fn degenerate_crossfade_is_a_step() {
        let transform = TransformConfig {
            crossfade_fraction: 1.0,
            ..TransformConfig::default()
        };
        assert_eq!(transform.crossfade_alpha(2.9), 0.0);
        assert_eq!(transform.crossfade_alpha(3.0), 1.0);
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = GridConfig::default();
        assert_eq!(config.item_spacing, 10.0);
        assert!(config.center_grid);
        assert_eq!(config.animation_duration.as_millis(), 300);
        assert_eq!(config.autoscroll_poll_interval.as_millis(), 500);
        assert_eq!(config.transform.commit_scale, 2.0);
    }
}
