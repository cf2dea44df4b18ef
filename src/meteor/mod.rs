//! Meteor events: color table, seeded schedule, and per-frame trail rendering.

pub(crate) mod palette;
pub(crate) mod schedule;
pub(crate) mod trail;
