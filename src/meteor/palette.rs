use crate::foundation::core::Rgba8;

/// Head/tail coloration of one burn-up composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorGroup {
    /// Bright head color.
    pub head: Rgba8,
    /// Tail color; its alpha is the tail's peak opacity.
    pub tail: Rgba8,
}

const fn group(head: (u8, u8, u8), tail: (u8, u8, u8, u8)) -> ColorGroup {
    ColorGroup {
        head: Rgba8::rgb(head.0, head.1, head.2),
        tail: Rgba8 {
            r: tail.0,
            g: tail.1,
            b: tail.2,
            a: tail.3,
        },
    }
}

/// Fixed meteor coloration table, indexed by `MeteorEvent::color_group`.
///
/// Tail alphas 102 and 89 are 0.40 and 0.35 opacity.
pub const METEOR_COLOR_GROUPS: [ColorGroup; 7] = [
    // iron / nickel
    group((0xff, 0xf4, 0xe0), (255, 200, 120, 102)),
    // magnesium
    group((0xe8, 0xf4, 0xff), (180, 210, 255, 102)),
    // sodium
    group((0xff, 0xe8, 0xd0), (255, 180, 100, 89)),
    // calcium
    group((0xf0, 0xe8, 0xff), (200, 170, 255, 89)),
    // silicon
    group((0xff, 0xe0, 0xd8), (255, 160, 130, 89)),
    // white, twice so it is the most common
    group((0xff, 0xff, 0xff), (255, 255, 255, 102)),
    group((0xff, 0xff, 0xff), (255, 255, 255, 89)),
];

/// Look up a color group, wrapping out-of-range indices.
pub fn color_group(index: usize) -> ColorGroup {
    METEOR_COLOR_GROUPS[index % METEOR_COLOR_GROUPS.len()]
}
