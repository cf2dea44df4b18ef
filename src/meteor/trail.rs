use smallvec::SmallVec;

use crate::animation::envelope::{BRIGHTNESS_ENVELOPE, TRAIL_LENGTH_ENVELOPE};
use crate::foundation::core::{Point, Rgba8};
use crate::scene::model::{GradientStop, Primitive};

use super::palette::color_group;
use super::schedule::MeteorEvent;

/// Brightness above which the head gets an extra glow disc.
pub const GLOW_THRESHOLD: f64 = 0.5;

const BASE_TRAIL_LENGTH: f64 = 6.0;
const TRAIL_LENGTH_PER_THICKNESS: f64 = 4.0;

/// A meteor as drawn at one instant. Positions are percent-space, sizes in points.
#[derive(Clone, Debug, PartialEq)]
pub struct MeteorTrail {
    /// Leading end of the streak.
    pub head: Point,
    /// Far end of the streak, fully transparent.
    pub tail: Point,
    /// Stroke width in points.
    pub thickness: f64,
    /// Burn-up brightness in `[0, 1]`.
    pub brightness: f64,
    /// Tail-to-head color ramp.
    pub stops: SmallVec<[GradientStop; 4]>,
    /// Soft head glow, present only while `brightness > GLOW_THRESHOLD`.
    pub glow: Option<HeadGlow>,
}

/// Radial glow around the meteor head.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadGlow {
    /// Glow center (the head), percent-space.
    pub center: Point,
    /// Radius in points.
    pub radius: f64,
    /// Center color; fades to transparent at `radius`.
    pub color: Rgba8,
}

impl MeteorTrail {
    /// Scene primitives for this trail: the streak, then the glow if any.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        let streak = Primitive::Trail {
            from: self.tail,
            to: self.head,
            width: self.thickness,
            stops: self.stops.clone(),
        };
        let glow = self.glow.map(|g| Primitive::soft_disc(g.center, g.radius, g.color));
        std::iter::once(streak).chain(glow)
    }
}

/// Trail length at full extension, in percent.
pub fn base_trail_length(event: &MeteorEvent) -> f64 {
    BASE_TRAIL_LENGTH + event.thickness_norm() * TRAIL_LENGTH_PER_THICKNESS
}

/// Render `event` at `time_secs`, or `None` outside its closed active window.
pub fn render_meteor(event: &MeteorEvent, time_secs: f64) -> Option<MeteorTrail> {
    if !event.is_active_at(time_secs) {
        return None;
    }
    let elapsed = time_secs - event.start_time;
    let progress = if event.duration > 0.0 {
        (elapsed / event.duration).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let (sin, cos) = event.angle_degrees.to_radians().sin_cos();
    let distance = event.speed * elapsed;
    let head = Point::new(
        event.start_x + distance * cos,
        event.start_y + distance * sin,
    );
    let trail_length = base_trail_length(event) * TRAIL_LENGTH_ENVELOPE.sample(progress);
    let tail = Point::new(head.x - trail_length * cos, head.y - trail_length * sin);

    let brightness = BRIGHTNESS_ENVELOPE.sample(progress);
    let colors = color_group(event.color_group);
    let stops = SmallVec::from_buf([
        GradientStop::new(0.0, colors.tail.scale_alpha(0.0)),
        GradientStop::new(0.5, colors.tail.scale_alpha(brightness * 0.3)),
        GradientStop::new(0.85, colors.head.scale_alpha(brightness * 0.7)),
        GradientStop::new(1.0, colors.head.scale_alpha(brightness)),
    ]);

    let glow = (brightness > GLOW_THRESHOLD).then(|| HeadGlow {
        center: head,
        radius: event.thickness * 0.8 + brightness * 1.2,
        color: colors.head.scale_alpha(brightness * 0.9),
    });

    Some(MeteorTrail {
        head,
        tail,
        thickness: event.thickness,
        brightness,
        stops,
        glow,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/meteor/trail.rs"]
mod tests;
