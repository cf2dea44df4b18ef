use crate::foundation::error::{StarloopError, StarloopResult};

pub use kurbo::Point;

/// Absolute 0-based frame index in loop timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StarloopResult<Self> {
        if den == 0 {
            return Err(StarloopError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StarloopError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate (`num/1`).
    pub fn integer(num: u32) -> StarloopResult<Self> {
        Self::new(num, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline time of a frame in seconds (`index / fps`).
    pub fn frame_time_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `secs`, rounding partial frames up.
    ///
    /// A tiny tolerance keeps products such as `0.3 * 10` from gaining a frame through
    /// floating-point noise.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64() - 1e-9).ceil().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Reject zero-sized canvases and sizes the raster backend cannot address.
    pub fn validate(self) -> StarloopResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StarloopError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(StarloopError::validation(format!(
                "canvas {}x{} exceeds the {}px raster limit",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Map a percent-space point (`0..=100` on both axes) to pixel space.
    pub fn percent_to_px(self, p: Point) -> Point {
        Point::new(
            p.x / 100.0 * f64::from(self.width),
            p.y / 100.0 * f64::from(self.height),
        )
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale alpha by `factor` (clamped into `[0, 1]`).
    pub fn scale_alpha(self, factor: f64) -> Self {
        Self {
            a: unit_to_u8(f64::from(self.a) / 255.0 * factor),
            ..self
        }
    }
}

fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
