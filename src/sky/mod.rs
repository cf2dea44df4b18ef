//! Background sky: seeded randomness, the static star field, and twinkle modulation.

pub(crate) mod rng;
pub(crate) mod stars;
pub(crate) mod twinkle;
