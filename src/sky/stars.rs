use std::f64::consts::TAU;

use crate::sky::rng::SeededRng;

/// Default number of background stars per field.
pub const DEFAULT_STAR_COUNT: usize = 80;

/// One static background star.
///
/// Positions are percent-space (`0..=100` of canvas width/height), sizes are points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Star {
    /// Horizontal position in percent of canvas width.
    pub x: f64,
    /// Vertical position in percent of canvas height.
    pub y: f64,
    /// Core diameter in points before twinkle.
    pub base_size: f64,
    /// Opacity before twinkle, in `(0, 1)`.
    pub base_opacity: f64,
    /// Twinkle frequency in Hz.
    pub twinkle_frequency: f64,
    /// Twinkle phase offset in radians, `[0, 2π)`.
    pub twinkle_phase: f64,
}

const SIZE_MIN: f64 = 0.8;
const SIZE_SPAN: f64 = 1.2;
const OPACITY_MIN: f64 = 0.3;
const OPACITY_SPAN: f64 = 0.4;
const FREQUENCY_MIN_HZ: f64 = 0.08;
const FREQUENCY_SPAN_HZ: f64 = 0.12;

/// Generate exactly `count` stars from `seed`.
pub fn generate_star_field(seed: &str, count: usize) -> Vec<Star> {
    let mut rng = SeededRng::new(seed);
    (0..count).map(|_| next_star(&mut rng)).collect()
}

// Draw order is part of the output contract.
fn next_star(rng: &mut SeededRng) -> Star {
    let x = rng.next_in(0.0, 100.0);
    let y = rng.next_in(0.0, 100.0);
    let base_size = rng.next_in(SIZE_MIN, SIZE_SPAN);
    let base_opacity = rng.next_in(OPACITY_MIN, OPACITY_SPAN);
    let twinkle_frequency = rng.next_in(FREQUENCY_MIN_HZ, FREQUENCY_SPAN_HZ);
    let twinkle_phase = rng.next_in(0.0, TAU);
    Star {
        x,
        y,
        base_size,
        base_opacity,
        twinkle_frequency,
        twinkle_phase,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sky/stars.rs"]
mod tests;
