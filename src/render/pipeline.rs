use rayon::prelude::*;

use crate::encode::scratch::{FrameAsset, ScratchDir};
use crate::foundation::core::{Canvas, FrameIndex, Fps};
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::render::backend::{BackendFactory, FrameRGBA, RasterBackend};
use crate::scene::compose::SceneParams;
use crate::session::job::CancelToken;

/// Number of frames for a loop: `ceil(duration * fps)`, so the last frame never overshoots.
pub fn frame_count(duration_secs: f64, fps: Fps) -> u64 {
    fps.secs_to_frames_ceil(duration_secs)
}

/// Worker pool and batching for frame generation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Rasterize frames on a rayon pool; otherwise one at a time on the calling thread.
    pub parallel: bool,
    /// Frames per batch. Cancellation and progress are observed between batches.
    pub chunk_size: usize,
    /// Pool size; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 32,
            threads: None,
        }
    }
}

/// What to render: the shared scene inputs plus the loop's frame grid.
#[derive(Clone, Copy, Debug)]
pub struct FramePlan<'a> {
    /// Immutable scene inputs.
    pub params: &'a SceneParams,
    /// Output size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Total frames, indices `0..frame_count`.
    pub frame_count: u64,
}

/// Compose, rasterize and persist every frame of `plan` into `scratch`.
///
/// Returns the frame assets in index order once all of them are on disk. The first failing
/// frame (in index order) fails the whole run; frames already written stay in `scratch` for
/// its owner to clean up.
pub fn render_frames_to_scratch(
    plan: &FramePlan<'_>,
    scratch: &ScratchDir,
    make_backend: &BackendFactory<'_>,
    threading: &RenderThreading,
    cancel: &CancelToken,
    on_progress: &mut dyn FnMut(u64, u64),
) -> StarloopResult<Vec<FrameAsset>> {
    let total = plan.frame_count;
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut assets = Vec::with_capacity(usize::try_from(total).unwrap_or(0).min(4096));

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let mut sequential_backend = if pool.is_none() {
        Some(make_backend())
    } else {
        None
    };

    let mut chunk_start = 0u64;
    while chunk_start < total {
        cancel.check()?;
        let chunk_end = (chunk_start + chunk_size).min(total);

        let chunk_assets = match (&pool, sequential_backend.as_mut()) {
            (Some(pool), _) => {
                render_chunk_parallel(plan, chunk_start..chunk_end, scratch, make_backend, cancel, pool)?
            }
            (None, Some(backend)) => {
                let mut out = Vec::with_capacity((chunk_end - chunk_start) as usize);
                for f in chunk_start..chunk_end {
                    cancel.check()?;
                    out.push(render_one(&mut **backend, plan, FrameIndex(f), scratch)?);
                }
                out
            }
            (None, None) => {
                return Err(StarloopError::rasterization(
                    "internal error: no backend available for sequential rendering",
                ));
            }
        };

        assets.extend(chunk_assets);
        on_progress(chunk_end, total);
        tracing::debug!(done = chunk_end, total, "frame batch persisted");
        chunk_start = chunk_end;
    }

    Ok(assets)
}

fn render_chunk_parallel(
    plan: &FramePlan<'_>,
    range: std::ops::Range<u64>,
    scratch: &ScratchDir,
    make_backend: &BackendFactory<'_>,
    cancel: &CancelToken,
    pool: &rayon::ThreadPool,
) -> StarloopResult<Vec<FrameAsset>> {
    let indices: Vec<u64> = range.collect();
    let results = pool.install(|| {
        indices
            .par_iter()
            .map_init(make_backend, |worker_backend, &f| {
                cancel.check()?;
                render_one(&mut **worker_backend, plan, FrameIndex(f), scratch)
            })
            .collect::<Vec<_>>()
    });
    // Barrier: every frame of the chunk has finished (or failed) before anything is returned.
    results.into_iter().collect()
}

fn render_one(
    backend: &mut dyn RasterBackend,
    plan: &FramePlan<'_>,
    index: FrameIndex,
    scratch: &ScratchDir,
) -> StarloopResult<FrameAsset> {
    let t = plan.fps.frame_time_secs(index);
    let scene = plan.params.compose(t);
    let frame = backend.rasterize(&scene, plan.canvas).map_err(|e| match e {
        StarloopError::Rasterization(msg) => {
            StarloopError::Rasterization(format!("frame {}: {msg}", index.0))
        }
        other => other,
    })?;
    scratch.write_frame(index, &frame)
}

/// Rasterize the `t = 0` scene of `params` without touching the filesystem.
pub fn render_static_frame(
    params: &SceneParams,
    canvas: Canvas,
    backend: &mut dyn RasterBackend,
) -> StarloopResult<FrameRGBA> {
    let scene = params.compose(0.0);
    backend.rasterize(&scene, canvas)
}

fn build_thread_pool(threads: Option<usize>) -> StarloopResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StarloopError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StarloopError::rasterization(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
