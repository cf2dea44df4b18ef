use smallvec::SmallVec;

use crate::foundation::core::{Point, Rgba8};
use crate::meteor::schedule::{MeteorEvent, schedule_meteors};
use crate::meteor::trail::render_meteor;
use crate::scene::model::{Primitive, SceneFrame};
use crate::sky::stars::{Star, generate_star_field};
use crate::sky::twinkle::{Twinkle, evaluate_twinkle, evaluate_twinkle_looped};

/// Opacity above which a star gets its faint outer glow.
pub const STAR_GLOW_THRESHOLD: f64 = 0.5;

const HALO_RADIUS_FACTOR: f64 = 2.2;
const HALO_ALPHA: f64 = 0.35;
const GLOW_RADIUS_FACTOR: f64 = 4.0;
const GLOW_ALPHA: f64 = 0.15;

/// Immutable inputs shared by every frame of one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneParams {
    /// Static background stars.
    pub stars: Vec<Star>,
    /// Time-ordered meteor schedule.
    pub meteors: Vec<MeteorEvent>,
    /// Star color (alpha ignored; opacity comes from twinkle).
    pub star_tint: Rgba8,
    /// When set, twinkle frequencies snap to whole cycles over this window.
    pub twinkle_loop_secs: Option<f64>,
}

impl SceneParams {
    /// Stars from `seed`, meteors from the independent `"{seed}-meteors"` stream.
    pub fn generate(seed: &str, star_count: usize, duration_secs: f64) -> Self {
        Self {
            stars: generate_star_field(seed, star_count),
            meteors: schedule_meteors(&format!("{seed}-meteors"), duration_secs),
            star_tint: WHITE,
            twinkle_loop_secs: None,
        }
    }

    /// Stars only; used for single-frame previews.
    pub fn stars_only(seed: &str, star_count: usize) -> Self {
        Self {
            stars: generate_star_field(seed, star_count),
            meteors: Vec::new(),
            star_tint: WHITE,
            twinkle_loop_secs: None,
        }
    }

    /// Build the scene for `time_secs`.
    pub fn compose(&self, time_secs: f64) -> SceneFrame {
        compose_scene(
            &self.stars,
            &self.meteors,
            self.star_tint,
            self.twinkle_loop_secs,
            time_secs,
        )
    }
}

/// Compose one frame with white stars: stars first, meteors on top.
pub fn compose_frame(stars: &[Star], meteors: &[MeteorEvent], time_secs: f64) -> SceneFrame {
    compose_scene(stars, meteors, WHITE, None, time_secs)
}

const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);

fn compose_scene(
    stars: &[Star],
    meteors: &[MeteorEvent],
    tint: Rgba8,
    twinkle_loop_secs: Option<f64>,
    time_secs: f64,
) -> SceneFrame {
    let mut primitives = Vec::with_capacity(stars.len() * 3 + 2);
    for star in stars {
        let twinkle = match twinkle_loop_secs {
            Some(loop_secs) => evaluate_twinkle_looped(star, time_secs, loop_secs),
            None => evaluate_twinkle(star, time_secs),
        };
        primitives.extend(star_primitives(star, twinkle, tint));
    }
    push_meteors(&mut primitives, meteors, time_secs);
    SceneFrame {
        time_secs,
        primitives,
    }
}

fn push_meteors(out: &mut Vec<Primitive>, meteors: &[MeteorEvent], time_secs: f64) {
    for event in meteors {
        if let Some(trail) = render_meteor(event, time_secs) {
            out.extend(trail.primitives());
        }
    }
}

/// Outer glow (bright stars only), soft halo, then sharp core.
pub fn star_primitives(star: &Star, twinkle: Twinkle, tint: Rgba8) -> SmallVec<[Primitive; 3]> {
    let center = Point::new(star.x, star.y);
    let core_radius = star.base_size * twinkle.size_multiplier * 0.5;
    let color = Rgba8 { a: 255, ..tint };

    let mut layers = SmallVec::new();
    if twinkle.opacity > STAR_GLOW_THRESHOLD {
        layers.push(Primitive::soft_disc(
            center,
            core_radius * GLOW_RADIUS_FACTOR,
            color.scale_alpha(twinkle.opacity * GLOW_ALPHA),
        ));
    }
    layers.push(Primitive::soft_disc(
        center,
        core_radius * HALO_RADIUS_FACTOR,
        color.scale_alpha(twinkle.opacity * HALO_ALPHA),
    ));
    layers.push(Primitive::solid_disc(
        center,
        core_radius,
        color.scale_alpha(twinkle.opacity),
    ));
    layers
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compose.rs"]
mod tests;
