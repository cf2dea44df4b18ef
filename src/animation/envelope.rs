//! Piecewise envelopes over normalized progress.
//!
//! Every meteor curve is a small constant table so it can be checked without rendering.

use crate::animation::ease::Ease;
use crate::foundation::math::lerp;

/// One envelope key: at `at` progress the envelope equals `value`.
///
/// `ease` shapes the segment that *ends* at this key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeKey {
    /// Normalized progress in `[0, 1]`.
    pub at: f64,
    /// Envelope value at `at`.
    pub value: f64,
    /// Easing of the segment arriving at this key.
    pub ease: Ease,
}

/// Continuous piecewise curve over `[0, 1]`, clamped outside its first/last key.
#[derive(Clone, Copy, Debug)]
pub struct Envelope {
    keys: &'static [EnvelopeKey],
}

impl Envelope {
    /// Wrap a key table. Keys must be sorted by `at`.
    pub const fn new(keys: &'static [EnvelopeKey]) -> Self {
        Self { keys }
    }

    /// Borrow the key table.
    pub fn keys(&self) -> &'static [EnvelopeKey] {
        self.keys
    }

    /// Sample the envelope at `progress`.
    pub fn sample(&self, progress: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if progress.is_nan() || progress <= first.at {
            return first.value;
        }
        if progress >= last.at {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if progress <= b.at {
                let span = b.at - a.at;
                if span <= 0.0 {
                    return b.value;
                }
                let t = b.ease.apply((progress - a.at) / span);
                return lerp(a.value, b.value, t);
            }
        }
        last.value
    }
}

const fn key(at: f64, value: f64, ease: Ease) -> EnvelopeKey {
    EnvelopeKey { at, value, ease }
}

/// Trail length as a fraction of the meteor's base length.
///
/// Grows 30% → 100% over the first fifth, holds, then shrinks back over the last fifth as the
/// mirror image of the growth.
pub const TRAIL_LENGTH_ENVELOPE: Envelope = Envelope::new(&TRAIL_LENGTH_KEYS);

const TRAIL_LENGTH_KEYS: [EnvelopeKey; 4] = [
    key(0.0, 0.3, Ease::Linear),
    key(0.2, 1.0, Ease::OutCubic),
    key(0.8, 1.0, Ease::Linear),
    key(1.0, 0.3, Ease::InCubic),
];

/// Burn-up brightness: soft entry, peak at the midpoint, fast burnout.
pub const BRIGHTNESS_ENVELOPE: Envelope = Envelope::new(&BRIGHTNESS_KEYS);

const BRIGHTNESS_KEYS: [EnvelopeKey; 5] = [
    key(0.0, 0.3, Ease::Linear),
    key(0.15, 0.7, Ease::Linear),
    key(0.5, 1.0, Ease::OutQuad),
    key(0.75, 0.9, Ease::InOutQuad),
    key(1.0, 0.0, Ease::Linear),
];

#[cfg(test)]
#[path = "../../tests/unit/animation/envelope.rs"]
mod tests;
