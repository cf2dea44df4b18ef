use std::path::{Path, PathBuf};

use crate::encode::scratch::{FrameAsset, ScratchDir};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StarloopError, StarloopResult};

/// A complete, ordered run of frame files ready for encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence {
    /// Directory holding the frames.
    pub dir: PathBuf,
    /// printf-style file pattern relative to `dir`, e.g. `frame_%05d.png`.
    pub pattern: String,
    /// Frame files in index order.
    pub frames: Vec<PathBuf>,
    /// Playback rate.
    pub fps: Fps,
    /// Frame dimensions.
    pub canvas: Canvas,
}

impl FrameSequence {
    /// Describe the frames written into `scratch`.
    ///
    /// `assets` must be contiguous from index 0; anything else means a frame went missing.
    pub fn from_scratch(
        scratch: &ScratchDir,
        assets: &[FrameAsset],
        fps: Fps,
        canvas: Canvas,
    ) -> StarloopResult<Self> {
        let mut frames = Vec::with_capacity(assets.len());
        for (expected, asset) in assets.iter().enumerate() {
            if asset.index.0 != expected as u64 {
                return Err(StarloopError::storage(format!(
                    "frame sequence has a gap: expected frame {expected}, found {}",
                    asset.index.0
                )));
            }
            frames.push(asset.path.clone());
        }
        Ok(Self {
            dir: scratch.path().to_path_buf(),
            pattern: scratch.input_pattern(),
            frames,
            fps,
            canvas,
        })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `dir/pattern`, the path handed to image-sequence readers.
    pub fn input_pattern_path(&self) -> PathBuf {
        self.dir.join(&self.pattern)
    }

    /// Sequence length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 * self.fps.frame_duration_secs()
    }
}

/// Turns a [`FrameSequence`] into a single video file.
///
/// The frame files are owned by the caller and stay in place until `encode` returns.
pub trait SequenceEncoder: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Reject sequences this encoder cannot handle, before any frame is rendered.
    fn check_canvas(&self, canvas: Canvas) -> StarloopResult<()> {
        let _ = canvas;
        Ok(())
    }

    /// Encode `seq` into `out_path`.
    fn encode(&self, seq: &FrameSequence, out_path: &Path) -> StarloopResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sequence.rs"]
mod tests;
