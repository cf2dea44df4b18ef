use crate::sky::rng::SeededRng;

use super::palette::METEOR_COLOR_GROUPS;

/// Loops shorter than this use the tighter start offset and gap bands.
pub const SHORT_LOOP_SECS: f64 = 5.0;
/// No meteor starts within this margin of the loop end.
pub const END_MARGIN_SECS: f64 = 0.5;

/// Edge of the frame a meteor enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryEdge {
    /// Near the top, travelling down-left or down-right.
    Top,
    /// Near the left edge, travelling right.
    Left,
    /// Near the right edge, travelling left.
    Right,
}

/// One scheduled meteor with fixed trajectory, timing and look.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeteorEvent {
    /// Start head position, percent of width.
    pub start_x: f64,
    /// Start head position, percent of height.
    pub start_y: f64,
    /// Travel direction in degrees (0 = right, 90 = down).
    pub angle_degrees: f64,
    /// Head speed in percent per second.
    pub speed: f64,
    /// Trail thickness in points, `[1, 3)`.
    pub thickness: f64,
    /// Index into [`METEOR_COLOR_GROUPS`].
    pub color_group: usize,
    /// Start time in seconds.
    pub start_time: f64,
    /// Active duration in seconds.
    pub duration: f64,
    /// Edge the trajectory was derived from.
    pub entry: EntryEdge,
}

impl MeteorEvent {
    /// Thickness normalized into `[0, 1)`.
    pub fn thickness_norm(&self) -> f64 {
        thickness_norm(self.thickness)
    }

    /// End of the active window in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time_secs` is inside the closed active window.
    pub fn is_active_at(&self, time_secs: f64) -> bool {
        time_secs >= self.start_time && time_secs <= self.end_time()
    }
}

pub(crate) fn thickness_norm(thickness: f64) -> f64 {
    ((thickness - 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Build the time-ordered meteor schedule for a loop of `total_secs`.
///
/// Start times are strictly increasing and lie in `[0, total_secs - 0.5)`.
pub fn schedule_meteors(seed: &str, total_secs: f64) -> Vec<MeteorEvent> {
    if !total_secs.is_finite() || total_secs <= 0.0 {
        return Vec::new();
    }
    let mut rng = SeededRng::new(seed);
    let short_loop = total_secs < SHORT_LOOP_SECS;

    let mut current_time = if short_loop {
        rng.next_in(0.3, 0.7)
    } else {
        rng.next_in(1.0, 1.0)
    };

    let mut events = Vec::new();
    while current_time < total_secs - END_MARGIN_SECS {
        events.push(next_event(&mut rng, current_time));
        current_time += if short_loop {
            rng.next_in(1.0, 1.5)
        } else {
            rng.next_in(3.0, 3.0)
        };
    }
    tracing::debug!(count = events.len(), total_secs, "scheduled meteors");
    events
}

fn next_event(rng: &mut SeededRng, start_time: f64) -> MeteorEvent {
    let entry = match rng.next_index(3) {
        0 => EntryEdge::Top,
        1 => EntryEdge::Left,
        _ => EntryEdge::Right,
    };

    let (start_x, start_y, angle_degrees) = match entry {
        EntryEdge::Top => {
            let x = rng.next_in(5.0, 90.0);
            let y = rng.next_in(-2.0, 15.0);
            let down_right = rng.next_f64() > 0.5;
            let angle = if down_right {
                rng.next_in(25.0, 40.0)
            } else {
                rng.next_in(115.0, 40.0)
            };
            (x, y, angle)
        }
        EntryEdge::Left => {
            let x = rng.next_in(-2.0, 10.0);
            let y = rng.next_in(10.0, 50.0);
            (x, y, rng.next_in(-15.0, 50.0))
        }
        EntryEdge::Right => {
            let x = rng.next_in(92.0, 10.0);
            let y = rng.next_in(5.0, 40.0);
            (x, y, rng.next_in(145.0, 30.0))
        }
    };

    // Thick meteors burn fast and short, thin ones drift longer.
    let thickness = rng.next_in(1.0, 2.0);
    let norm = thickness_norm(thickness);
    let speed = 60.0 + norm * 75.0 + rng.next_f64() * 15.0;
    let duration = 0.2 + (1.0 - norm) * 0.35 + rng.next_f64() * 0.1;
    let color_group = rng.next_index(METEOR_COLOR_GROUPS.len());

    MeteorEvent {
        start_x,
        start_y,
        angle_degrees,
        speed,
        thickness,
        color_group,
        start_time,
        duration,
        entry,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/meteor/schedule.rs"]
mod tests;
