use std::path::{Path, PathBuf};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::render::backend::FrameRGBA;

/// Environment variable naming the parent directory for scratch directories.
pub const SCRATCH_DIR_ENV: &str = "STARLOOP_SCRATCH_DIR";

const FRAME_PREFIX: &str = "frame_";
const MIN_PAD_WIDTH: usize = 5;

/// One persisted frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameAsset {
    /// Frame index within the loop.
    pub index: FrameIndex,
    /// PNG location inside the scratch directory.
    pub path: PathBuf,
    /// [`FrameRGBA::content_hash`] of the rasterized pixels.
    pub content_hash: u64,
}

/// Outcome of a best-effort scratch cleanup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Files removed.
    pub removed: usize,
    /// Files (or the directory itself) that could not be removed.
    pub failed: usize,
}

/// Zero-pad width for frame file names: at least five digits, more for very long loops.
pub fn frame_pad_width(frame_count: u64) -> usize {
    let last = frame_count.saturating_sub(1);
    last.to_string().len().max(MIN_PAD_WIDTH)
}

/// A request-owned temporary directory of `frame_NNNNN.png` files.
///
/// The directory is unique per request, so concurrent requests never share frame files.
/// [`ScratchDir::cleanup`] removes everything; dropping without calling it does the same,
/// silently.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<tempfile::TempDir>,
    path: PathBuf,
    pad_width: usize,
}

impl ScratchDir {
    /// Create a fresh scratch directory for `frame_count` frames.
    ///
    /// Parent resolution: `root`, then `$STARLOOP_SCRATCH_DIR`, then the system temp dir.
    #[tracing::instrument(level = "debug")]
    pub fn create(root: Option<&Path>, frame_count: u64) -> StarloopResult<Self> {
        let parent = match root {
            Some(r) => r.to_path_buf(),
            None => std::env::var_os(SCRATCH_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        };
        std::fs::create_dir_all(&parent).map_err(|e| {
            StarloopError::storage(format!(
                "failed to create scratch parent '{}': {e}",
                parent.display()
            ))
        })?;
        let dir = tempfile::Builder::new()
            .prefix("starloop-")
            .tempdir_in(&parent)
            .map_err(|e| {
                StarloopError::storage(format!(
                    "failed to create scratch directory in '{}': {e}",
                    parent.display()
                ))
            })?;
        let path = dir.path().to_path_buf();
        tracing::debug!(path = %path.display(), "scratch directory created");
        Ok(Self {
            dir: Some(dir),
            path,
            pad_width: frame_pad_width(frame_count),
        })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Digits used for frame numbers.
    pub fn pad_width(&self) -> usize {
        self.pad_width
    }

    /// File name for `index`, e.g. `frame_00007.png`.
    pub fn frame_file_name(&self, index: FrameIndex) -> String {
        format!("{FRAME_PREFIX}{:0width$}.png", index.0, width = self.pad_width)
    }

    /// Full path for `index`.
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.path.join(self.frame_file_name(index))
    }

    /// printf-style input pattern for image-sequence readers, e.g. `frame_%05d.png`.
    pub fn input_pattern(&self) -> String {
        format!("{FRAME_PREFIX}%0{}d.png", self.pad_width)
    }

    /// Persist `frame` as a straight-alpha PNG under its zero-padded name.
    pub fn write_frame(&self, index: FrameIndex, frame: &FrameRGBA) -> StarloopResult<FrameAsset> {
        let path = self.frame_path(index);
        let rgba = frame.straight_alpha_bytes();
        image::save_buffer_with_format(
            &path,
            &rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            StarloopError::storage(format!("failed to write frame '{}': {e}", path.display()))
        })?;
        Ok(FrameAsset {
            index,
            path,
            content_hash: frame.content_hash(),
        })
    }

    /// Frame files currently present, sorted by name.
    pub fn frame_files(&self) -> StarloopResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.path).map_err(|e| {
            StarloopError::storage(format!(
                "failed to list scratch directory '{}': {e}",
                self.path.display()
            ))
        })?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StarloopError::storage(e.to_string()))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FRAME_PREFIX) && name.ends_with(".png") {
                out.push(entry.path());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Remove every frame and the directory itself. Never fails; problems are logged.
    pub fn cleanup(mut self) -> CleanupReport {
        self.cleanup_in_place()
    }

    fn cleanup_in_place(&mut self) -> CleanupReport {
        let Some(dir) = self.dir.take() else {
            return CleanupReport::default();
        };
        let mut report = CleanupReport::default();
        match std::fs::read_dir(dir.path()) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    match std::fs::remove_file(&path) {
                        Ok(()) => report.removed += 1,
                        Err(e) => {
                            report.failed += 1;
                            tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch frame");
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to list scratch directory");
            }
        }
        if let Err(e) = dir.close() {
            report.failed += 1;
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch directory");
        }
        tracing::debug!(removed = report.removed, failed = report.failed, "scratch cleanup");
        report
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = self.cleanup_in_place();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/scratch.rs"]
mod tests;
