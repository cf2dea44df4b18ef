use smallvec::SmallVec;

use crate::foundation::core::{Point, Rgba8};

/// One color stop along a trail gradient.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the segment, `0` at `from`, `1` at `to`.
    pub offset: f64,
    /// Straight-alpha color at this stop.
    pub color: Rgba8,
}

impl GradientStop {
    /// Create a stop.
    pub fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// How a disc is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscFill {
    /// Uniform color to the edge.
    Solid,
    /// Color at the center fading radially to transparent at the edge.
    Radial,
}

/// A drawable element. Positions are percent-space, lengths are points.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Filled circle.
    Disc {
        /// Center, percent-space.
        center: Point,
        /// Radius in points.
        radius: f64,
        /// Fill color (center color for radial fills).
        color: Rgba8,
        /// Fill mode.
        fill: DiscFill,
    },
    /// Round-capped line segment stroked with a linear gradient from `from` to `to`.
    Trail {
        /// Gradient start (offset 0).
        from: Point,
        /// Gradient end (offset 1).
        to: Point,
        /// Stroke width in points.
        width: f64,
        /// Ordered gradient stops.
        stops: SmallVec<[GradientStop; 4]>,
    },
}

impl Primitive {
    /// Solid disc.
    pub fn solid_disc(center: Point, radius: f64, color: Rgba8) -> Self {
        Self::Disc {
            center,
            radius,
            color,
            fill: DiscFill::Solid,
        }
    }

    /// Radially fading disc.
    pub fn soft_disc(center: Point, radius: f64, color: Rgba8) -> Self {
        Self::Disc {
            center,
            radius,
            color,
            fill: DiscFill::Radial,
        }
    }

    /// `true` when the primitive cannot contribute any pixels.
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Disc { radius, color, .. } => *radius <= 0.0 || color.a == 0,
            Self::Trail { width, stops, .. } => {
                *width <= 0.0 || stops.iter().all(|s| s.color.a == 0)
            }
        }
    }
}

/// Everything to draw for one time sample, in paint order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneFrame {
    /// Sample time in seconds.
    pub time_secs: f64,
    /// Primitives in back-to-front order.
    pub primitives: Vec<Primitive>,
}

impl SceneFrame {
    /// Number of trail primitives (one per active meteor).
    pub fn trail_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Trail { .. }))
            .count()
    }
}
