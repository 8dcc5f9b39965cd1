//! Bubble geometry and encoding
//!
//! Projects a [`FrequencyTable`] into bubbles. For the entry at index `i`:
//! - radius: `clamp(base + count * scale, min, max)`
//! - position: `(i + 1, count)`
//! - hue: `(i * hue_step) mod 360`

use crate::config::{BubblePalette, BubbleScale};
use crate::types::{BubbleDatum, FrequencyTable, HslColor, Position};

/// Encoder for bubble geometry
pub struct BubbleEncoder;

impl BubbleEncoder {
    /// Project a frequency table into bubbles, preserving table order
    pub fn project(
        table: &FrequencyTable,
        scale: &BubbleScale,
        palette: &BubblePalette,
    ) -> Vec<BubbleDatum> {
        table
            .iter()
            .enumerate()
            .map(|(index, entry)| BubbleDatum {
                label: entry.reason.clone(),
                count: entry.count,
                radius: radius(entry.count, scale),
                position: Position {
                    x: index + 1,
                    y: entry.count,
                },
                color: color(index, palette),
            })
            .collect()
    }
}

/// Saturating linear radius for a bubble of `count` occurrences
pub fn radius(count: usize, scale: &BubbleScale) -> f64 {
    let raw = scale.base_radius + count as f64 * scale.scale_factor;
    // not f64::clamp: it panics when min > max
    raw.max(scale.min_radius).min(scale.max_radius)
}

/// Hue for the bubble at `index`
pub fn color(index: usize, palette: &BubblePalette) -> HslColor {
    let hue = (index as u64 * palette.hue_step as u64) % 360;
    HslColor {
        hue: hue as u16,
        saturation: palette.saturation,
        lightness: palette.lightness,
    }
}
