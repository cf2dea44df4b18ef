use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::encode::ffmpeg::{FfmpegEncoder, VideoCodec};
use crate::encode::scratch::ScratchDir;
use crate::encode::sequence::{FrameSequence, SequenceEncoder};
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::render::backend::{BackendFactory, FrameRGBA, RasterBackend, RenderSettings};
use crate::render::cpu::CpuBackend;
use crate::render::pipeline::{
    FramePlan, RenderThreading, frame_count, render_frames_to_scratch, render_static_frame,
};
use crate::scene::compose::SceneParams;
use crate::sky::stars::DEFAULT_STAR_COUNT;

/// Longest sequence a single request may schedule: one hour at 60 fps.
///
/// Every frame lands on disk as a PNG before encoding, so the bound also caps scratch usage.
pub const MAX_FRAME_COUNT: u64 = 216_000;

fn default_star_count() -> usize {
    DEFAULT_STAR_COUNT
}

/// What to generate. Identical requests produce identical frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoopRequest {
    /// Seed string; stars and meteors derive independent streams from it.
    pub seed: String,
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Loop length in seconds.
    pub duration_secs: f64,
    /// Frame rate, 30/1 when omitted.
    #[serde(default)]
    pub fps: Fps,
    /// Number of background stars.
    #[serde(default = "default_star_count")]
    pub star_count: usize,
}

impl LoopRequest {
    /// Request with the default frame rate and star count.
    pub fn new(seed: impl Into<String>, width: u32, height: u32, duration_secs: f64) -> Self {
        Self {
            seed: seed.into(),
            canvas: Canvas { width, height },
            duration_secs,
            fps: Fps::default(),
            star_count: DEFAULT_STAR_COUNT,
        }
    }

    /// Override the frame rate.
    pub fn with_fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    /// Override the star count.
    pub fn with_star_count(mut self, star_count: usize) -> Self {
        self.star_count = star_count;
        self
    }

    /// Reject requests that cannot produce at least one frame.
    pub fn validate(&self) -> StarloopResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(StarloopError::validation(format!(
                "duration must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        let frames = self.frame_count();
        if frames == 0 {
            return Err(StarloopError::validation(format!(
                "duration {}s is shorter than one frame at {} fps",
                self.duration_secs,
                self.fps.as_f64()
            )));
        }
        if frames > MAX_FRAME_COUNT {
            return Err(StarloopError::validation(format!(
                "duration {}s at {} fps needs {frames} frames, limit is {MAX_FRAME_COUNT}",
                self.duration_secs,
                self.fps.as_f64()
            )));
        }
        Ok(())
    }

    /// `ceil(duration * fps)`.
    pub fn frame_count(&self) -> u64 {
        frame_count(self.duration_secs, self.fps)
    }
}

/// Cooperative cancellation shared between a running job and its owner.
///
/// Checked between frames and once more before encoding.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> StarloopResult<()> {
        if self.is_cancelled() {
            Err(StarloopError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// How to generate: rendering, threading, output and cancellation knobs.
#[derive(Clone, Debug)]
pub struct GenerateOpts {
    /// Raster settings.
    pub settings: RenderSettings,
    /// Worker pool configuration.
    pub threading: RenderThreading,
    /// Output codec for [`generate_loopable_asset`].
    pub codec: VideoCodec,
    /// Parent for the per-request scratch directory (else `$STARLOOP_SCRATCH_DIR` or temp).
    pub scratch_root: Option<PathBuf>,
    /// Star color; alpha is ignored.
    pub star_tint: Rgba8,
    /// Snap twinkle frequencies to whole cycles over the loop.
    pub loop_align_twinkle: bool,
    /// Cancellation token.
    pub cancel: CancelToken,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            settings: RenderSettings::default(),
            threading: RenderThreading::default(),
            codec: VideoCodec::default(),
            scratch_root: None,
            star_tint: Rgba8::rgb(255, 255, 255),
            loop_align_twinkle: true,
            cancel: CancelToken::new(),
        }
    }
}

/// Lifecycle of one request. `Failed` and `Completed` are terminal; there is no retry state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    /// Accepted, nothing started.
    Scheduled,
    /// Frames being rendered; `done` of `total` are persisted.
    Generating {
        /// Frames persisted so far.
        done: u64,
        /// Frames in the loop.
        total: u64,
    },
    /// All frames written; encoder running.
    Encoding,
    /// Video written.
    Completed,
    /// Generation or encoding failed (or was cancelled).
    Failed,
}

impl GenerationState {
    /// `true` for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// The finished loop.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoAsset {
    /// Written video file.
    pub path: PathBuf,
    /// Encoder label.
    pub encoder: String,
    /// Frame size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Number of encoded frames.
    pub frame_count: u64,
    /// Requested loop length.
    pub duration_secs: f64,
    /// Content hash per frame, in frame order.
    pub frame_hashes: Vec<u64>,
}

/// One generation request, runnable once.
#[derive(Debug)]
pub struct LoopJob {
    request: LoopRequest,
    opts: GenerateOpts,
    state: Arc<Mutex<GenerationState>>,
}

impl LoopJob {
    /// Validate `request` and create a job in `Scheduled`.
    pub fn new(request: LoopRequest, opts: GenerateOpts) -> StarloopResult<Self> {
        request.validate()?;
        if let Some(0) = opts.threading.threads {
            return Err(StarloopError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(Self {
            request,
            opts,
            state: Arc::new(Mutex::new(GenerationState::Scheduled)),
        })
    }

    /// The validated request.
    pub fn request(&self) -> &LoopRequest {
        &self.request
    }

    /// Current state; safe to poll from another thread via [`LoopJob::state_handle`].
    pub fn state(&self) -> GenerationState {
        read_state(&self.state)
    }

    /// Shareable read handle to the job state.
    pub fn state_handle(&self) -> JobStateHandle {
        JobStateHandle(Arc::clone(&self.state))
    }

    /// Stars and meteors for this request.
    pub fn scene_params(&self) -> SceneParams {
        let mut params = SceneParams::generate(
            &self.request.seed,
            self.request.star_count,
            self.request.duration_secs,
        );
        params.star_tint = self.opts.star_tint;
        if self.opts.loop_align_twinkle {
            params.twinkle_loop_secs = Some(self.request.duration_secs);
        }
        params
    }

    /// Render with one [`CpuBackend`] per worker and encode with `encoder`.
    pub fn run(&self, encoder: &dyn SequenceEncoder, out_path: &Path) -> StarloopResult<VideoAsset> {
        let settings = self.opts.settings.clone();
        let make_backend = move || -> Box<dyn RasterBackend> {
            Box::new(CpuBackend::new(settings.clone()))
        };
        self.run_with_backends(encoder, out_path, &make_backend)
    }

    /// Like [`LoopJob::run`] with a caller-supplied backend factory.
    #[tracing::instrument(level = "info", skip_all, fields(seed = %self.request.seed, out = %out_path.display()))]
    pub fn run_with_backends(
        &self,
        encoder: &dyn SequenceEncoder,
        out_path: &Path,
        make_backend: &BackendFactory<'_>,
    ) -> StarloopResult<VideoAsset> {
        {
            let mut guard = self.state.lock().unwrap_or_else(|p| p.into_inner());
            if *guard != GenerationState::Scheduled {
                return Err(StarloopError::validation(format!(
                    "job already ran (state {:?})",
                    *guard
                )));
            }
            *guard = GenerationState::Generating {
                done: 0,
                total: self.request.frame_count(),
            };
        }

        let result = self.execute(encoder, out_path, make_backend);
        match &result {
            Ok(asset) => {
                self.set_state(GenerationState::Completed);
                tracing::info!(frames = asset.frame_count, path = %asset.path.display(), "loop completed");
            }
            Err(e) => {
                self.set_state(GenerationState::Failed);
                tracing::warn!(error = %e, "loop failed");
            }
        }
        result
    }

    fn execute(
        &self,
        encoder: &dyn SequenceEncoder,
        out_path: &Path,
        make_backend: &BackendFactory<'_>,
    ) -> StarloopResult<VideoAsset> {
        let request = &self.request;
        encoder.check_canvas(request.canvas)?;
        self.opts.cancel.check()?;

        let total = request.frame_count();
        let params = self.scene_params();
        tracing::info!(
            frames = total,
            stars = params.stars.len(),
            meteors = params.meteors.len(),
            "generating frames"
        );

        let scratch = ScratchDir::create(self.opts.scratch_root.as_deref(), total)?;
        let outcome = self.generate_and_encode(&params, &scratch, encoder, out_path, make_backend);
        let report = scratch.cleanup();
        if report.failed > 0 {
            tracing::warn!(failed = report.failed, "scratch cleanup incomplete");
        }
        outcome
    }

    fn generate_and_encode(
        &self,
        params: &SceneParams,
        scratch: &ScratchDir,
        encoder: &dyn SequenceEncoder,
        out_path: &Path,
        make_backend: &BackendFactory<'_>,
    ) -> StarloopResult<VideoAsset> {
        let request = &self.request;
        let plan = FramePlan {
            params,
            canvas: request.canvas,
            fps: request.fps,
            frame_count: request.frame_count(),
        };
        let assets = render_frames_to_scratch(
            &plan,
            scratch,
            make_backend,
            &self.opts.threading,
            &self.opts.cancel,
            &mut |done, total| self.set_state(GenerationState::Generating { done, total }),
        )?;

        self.opts.cancel.check()?;
        self.set_state(GenerationState::Encoding);
        tracing::info!(encoder = encoder.name(), "encoding");

        let seq = FrameSequence::from_scratch(scratch, &assets, request.fps, request.canvas)?;
        encoder.encode(&seq, out_path)?;

        Ok(VideoAsset {
            path: out_path.to_path_buf(),
            encoder: encoder.name().to_owned(),
            canvas: request.canvas,
            fps: request.fps,
            frame_count: plan.frame_count,
            duration_secs: request.duration_secs,
            frame_hashes: assets.iter().map(|a| a.content_hash).collect(),
        })
    }

    fn set_state(&self, next: GenerationState) {
        let mut guard = self.state.lock().unwrap_or_else(|p| p.into_inner());
        *guard = next;
    }
}

/// Read-only view of a job's state, cloneable across threads.
#[derive(Clone, Debug)]
pub struct JobStateHandle(Arc<Mutex<GenerationState>>);

impl JobStateHandle {
    /// Current state.
    pub fn get(&self) -> GenerationState {
        read_state(&self.0)
    }
}

fn read_state(state: &Mutex<GenerationState>) -> GenerationState {
    *state.lock().unwrap_or_else(|p| p.into_inner())
}

/// Generate a seamless overlay loop and encode it to `out_path` with the system `ffmpeg`.
#[tracing::instrument(level = "info", skip(opts), fields(seed = %request.seed))]
pub fn generate_loopable_asset(
    request: &LoopRequest,
    out_path: &Path,
    opts: GenerateOpts,
) -> StarloopResult<VideoAsset> {
    let encoder = FfmpegEncoder::new(opts.codec);
    LoopJob::new(request.clone(), opts)?.run(&encoder, out_path)
}

/// Render the stars-only `t = 0` preview frame (no meteors, nothing written to disk).
#[tracing::instrument(level = "debug", skip(settings))]
pub fn generate_static_frame(
    seed: &str,
    canvas: Canvas,
    star_count: Option<usize>,
    settings: &RenderSettings,
) -> StarloopResult<FrameRGBA> {
    canvas.validate()?;
    let params = SceneParams::stars_only(seed, star_count.unwrap_or(DEFAULT_STAR_COUNT));
    let mut backend = CpuBackend::new(settings.clone());
    render_static_frame(&params, canvas, &mut backend)
}

#[cfg(test)]
#[path = "../../tests/unit/session/job.rs"]
mod tests;
