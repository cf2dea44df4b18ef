use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::VideoCodec;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::render::backend::RenderSettings;
use crate::render::pipeline::RenderThreading;
use crate::session::job::{CancelToken, GenerateOpts, LoopRequest};

fn default_true() -> bool {
    true
}

fn default_tint() -> Rgba8 {
    Rgba8::rgb(255, 255, 255)
}

/// A complete generation job as JSON: the request plus every serializable option.
///
/// ```json
/// {
///   "request": { "seed": "aurora", "canvas": { "width": 1080, "height": 1920 }, "duration_secs": 4.0 },
///   "codec": "vp9_alpha"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateConfig {
    /// What to generate.
    pub request: LoopRequest,
    /// Output codec.
    #[serde(default)]
    pub codec: VideoCodec,
    /// Raster settings.
    #[serde(default)]
    pub render: RenderSettings,
    /// Worker pool configuration.
    #[serde(default)]
    pub threading: RenderThreading,
    /// Parent for scratch directories.
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,
    /// Star color.
    #[serde(default = "default_tint")]
    pub star_tint: Rgba8,
    /// Snap twinkle to whole cycles over the loop.
    #[serde(default = "default_true")]
    pub loop_align_twinkle: bool,
}

impl GenerateConfig {
    /// Config for `request` with default options.
    pub fn new(request: LoopRequest) -> Self {
        let opts = GenerateOpts::default();
        Self {
            request,
            codec: opts.codec,
            render: opts.settings,
            threading: opts.threading,
            scratch_root: opts.scratch_root,
            star_tint: opts.star_tint,
            loop_align_twinkle: opts.loop_align_twinkle,
        }
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> StarloopResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| StarloopError::validation(format!("invalid generate config: {e}")))
    }

    /// Read and parse a JSON file.
    pub fn load(path: &Path) -> StarloopResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StarloopError::storage(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Split into the request and runtime options, attaching `cancel`.
    pub fn into_parts(self, cancel: CancelToken) -> (LoopRequest, GenerateOpts) {
        let opts = GenerateOpts {
            settings: self.render,
            threading: self.threading,
            codec: self.codec,
            scratch_root: self.scratch_root,
            star_tint: self.star_tint,
            loop_align_twinkle: self.loop_align_twinkle,
            cancel,
        };
        (self.request, opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
