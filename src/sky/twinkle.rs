use std::f64::consts::TAU;

use crate::foundation::math::lerp;
use crate::sky::stars::Star;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
const THIRD_RATE: f64 = 2.71;

/// Rate multipliers of the three interfering components.
const COMPONENT_RATES: [f64; 3] = [1.0, GOLDEN_RATIO, THIRD_RATE];
/// Mixing weights; they sum to one so the mix stays in `[-1, 1]`.
const COMPONENT_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

const OPACITY_BAND: (f64, f64) = (0.65, 1.0);
const SIZE_BAND: (f64, f64) = (0.6, 1.4);

/// Per-frame twinkle modulation of one star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twinkle {
    /// Absolute opacity in `[0, 1]`.
    pub opacity: f64,
    /// Multiplier applied to the star's base size.
    pub size_multiplier: f64,
}

/// Evaluate twinkle for `star` at `time_secs`.
///
/// Three sines at non-integer rate ratios (1, φ, 2.71) with phase and position cross-terms
/// avoid any visible period inside a loop window while staying fully reproducible.
pub fn evaluate_twinkle(star: &Star, time_secs: f64) -> Twinkle {
    let frequencies = COMPONENT_RATES.map(|rate| star.twinkle_frequency * rate);
    twinkle_from_frequencies(star, time_secs, frequencies)
}

/// Like [`evaluate_twinkle`], but each component frequency is snapped to a whole number of
/// cycles (at least one) over `loop_secs`, so `t = 0` and `t = loop_secs` match exactly.
pub fn evaluate_twinkle_looped(star: &Star, time_secs: f64, loop_secs: f64) -> Twinkle {
    if !(loop_secs.is_finite() && loop_secs > 0.0) {
        return evaluate_twinkle(star, time_secs);
    }
    let frequencies = COMPONENT_RATES.map(|rate| {
        let cycles = (star.twinkle_frequency * rate * loop_secs).round().max(1.0);
        cycles / loop_secs
    });
    twinkle_from_frequencies(star, time_secs, frequencies)
}

fn twinkle_from_frequencies(star: &Star, time_secs: f64, frequencies: [f64; 3]) -> Twinkle {
    let offsets = component_offsets(star);
    let mut signal = 0.0;
    for i in 0..3 {
        let arg = TAU * frequencies[i] * time_secs + offsets[i];
        signal += COMPONENT_WEIGHTS[i] * arg.sin();
    }
    let level = ((signal + 1.0) / 2.0).clamp(0.0, 1.0);

    let opacity = (star.base_opacity * lerp(OPACITY_BAND.0, OPACITY_BAND.1, level)).clamp(0.0, 1.0);
    let opacity = if opacity.is_nan() { 0.0 } else { opacity };
    Twinkle {
        opacity,
        size_multiplier: lerp(SIZE_BAND.0, SIZE_BAND.1, level),
    }
}

// Component 2 carries an extra phase cross-term, component 3 a positional one.
fn component_offsets(star: &Star) -> [f64; 3] {
    let phase = star.twinkle_phase;
    [
        phase,
        phase * GOLDEN_RATIO + phase * 0.5,
        phase * THIRD_RATE + star.x * 0.13 + star.y * 0.07,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/sky/twinkle.rs"]
mod tests;
