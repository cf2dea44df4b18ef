//! Frame persistence and video encoding.

/// External `ffmpeg` encoder for alpha-capable video containers.
pub mod ffmpeg;
/// Per-request scratch directory holding numbered PNG frames.
pub mod scratch;
/// Frame sequence description and the encoder contract.
pub mod sequence;
