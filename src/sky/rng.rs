/// Seed-string driven linear congruential generator.
///
/// The seed is folded into a wrapping 32-bit hash (`hash * 31 + unit` over UTF-16 code units),
/// then each draw advances `state = (state * 1103515245 + 12345) mod 2^31`. Independent streams
/// are derived by suffixing the seed (see [`SeededRng::substream`]), never by sharing state.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    const MULTIPLIER: u32 = 1_103_515_245;
    const INCREMENT: u32 = 12_345;
    const MODULUS_MASK: u32 = 0x7fff_ffff;
    const MODULUS: f64 = 2_147_483_648.0;

    /// Create a generator from a seed string.
    pub fn new(seed: &str) -> Self {
        Self {
            state: fold_seed(seed) as u32,
        }
    }

    /// Create a generator for the `name` sub-stream of `seed` (`"{seed}-{name}"`).
    pub fn substream(seed: &str, name: &str) -> Self {
        Self::new(&format!("{seed}-{name}"))
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MODULUS_MASK;
        f64::from(self.state) / Self::MODULUS
    }

    /// Next float in `[lo, lo + span)`.
    pub fn next_in(&mut self, lo: f64, span: f64) -> f64 {
        lo + self.next_f64() * span
    }

    /// Next index in `0..len` (`0` when `len == 0`).
    pub fn next_index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64).floor() as usize;
        i.min(len.saturating_sub(1))
    }
}

/// Polynomial string hash with 32-bit signed wraparound.
pub(crate) fn fold_seed(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sky/rng.rs"]
mod tests;
