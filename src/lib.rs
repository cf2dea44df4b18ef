//! Starloop renders seeded, seamlessly looping starfield-and-meteor overlays.
//!
//! A request (seed, canvas, duration, fps) deterministically yields:
//!
//! - a static field of twinkling stars ([`generate_star_field`])
//! - a time-ordered meteor schedule ([`schedule_meteors`])
//! - one composed [`SceneFrame`] per frame, rasterized with a transparent background
//! - an alpha-preserving video encoded by the system `ffmpeg` ([`generate_loopable_asset`])
//!
//! Identical requests produce bit-identical frames.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod meteor;
pub(crate) mod scene;
pub(crate) mod sky;

/// Frame persistence and alpha video encoding.
pub mod encode;
/// Raster backends and the frame pipeline.
pub mod render;
/// Generation requests and public entry points.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgba8};
pub use crate::foundation::error::{StarloopError, StarloopResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::envelope::{
    BRIGHTNESS_ENVELOPE, Envelope, EnvelopeKey, TRAIL_LENGTH_ENVELOPE,
};
pub use crate::meteor::palette::{ColorGroup, METEOR_COLOR_GROUPS, color_group};
pub use crate::meteor::schedule::{EntryEdge, MeteorEvent, schedule_meteors};
pub use crate::meteor::trail::{HeadGlow, MeteorTrail, render_meteor};
pub use crate::scene::compose::{SceneParams, compose_frame};
pub use crate::scene::model::{DiscFill, GradientStop, Primitive, SceneFrame};
pub use crate::sky::rng::SeededRng;
pub use crate::sky::stars::{DEFAULT_STAR_COUNT, Star, generate_star_field};
pub use crate::sky::twinkle::{Twinkle, evaluate_twinkle, evaluate_twinkle_looped};

pub use crate::encode::ffmpeg::{FfmpegEncoder, VideoCodec, is_ffmpeg_on_path};
pub use crate::encode::scratch::{FrameAsset, ScratchDir};
pub use crate::encode::sequence::{FrameSequence, SequenceEncoder};
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RasterBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{RenderThreading, frame_count};
pub use crate::session::config::GenerateConfig;
pub use crate::session::job::{
    CancelToken, GenerateOpts, GenerationState, LoopJob, LoopRequest, MAX_FRAME_COUNT, VideoAsset,
    generate_loopable_asset, generate_static_frame,
};
