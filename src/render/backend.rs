use crate::foundation::core::Canvas;
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::scene::model::SceneFrame;

/// A rendered frame as RGBA8 pixels.
///
/// Frames out of [`crate::render::cpu::CpuBackend`] are **premultiplied alpha**; the flag makes
/// that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Stable 64-bit content hash (xxh3) of the pixel bytes and dimensions.
    pub fn content_hash(&self) -> u64 {
        let mut bytes = Vec::with_capacity(self.data.len() + 8);
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.data);
        xxhash_rust::xxh3::xxh3_64(&bytes)
    }

    /// Pixel bytes with straight (non-premultiplied) alpha, as image files expect.
    pub fn straight_alpha_bytes(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Turns a [`SceneFrame`] into pixels.
///
/// Implementations are used one-per-worker by the frame pipeline, so they only need `Send`.
pub trait RasterBackend: Send {
    /// Rasterize `scene` onto a `canvas`-sized transparent surface.
    fn rasterize(&mut self, scene: &SceneFrame, canvas: Canvas) -> StarloopResult<FrameRGBA>;
}

/// Builds a fresh backend for each pipeline worker.
pub type BackendFactory<'a> = dyn Fn() -> Box<dyn RasterBackend> + Sync + 'a;

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Backend-agnostic raster settings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// If set, the surface is filled with this straight-alpha RGBA8 color before drawing.
    ///
    /// Overlays leave this unset so the background stays transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Pixels per point. Defaults to `min(width, height) / 540`.
    pub point_scale: Option<f64>,
}

impl RenderSettings {
    /// Effective pixels-per-point for `canvas`.
    pub fn resolve_point_scale(&self, canvas: Canvas) -> f64 {
        match self.point_scale {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => f64::from(canvas.width.min(canvas.height)) / 540.0,
        }
    }
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> StarloopResult<Box<dyn RasterBackend>> {
    if let Some(scale) = settings.point_scale
        && !(scale.is_finite() && scale > 0.0)
    {
        return Err(StarloopError::validation(
            "render settings point_scale must be finite and > 0",
        ));
    }
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
