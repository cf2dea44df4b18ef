//! Rasterization and the frame pipeline.

/// Raster backend contract and frame buffers.
pub mod backend;
/// CPU raster backend powered by `vello_cpu`.
pub mod cpu;
/// Frame pipeline: compose, rasterize and persist every frame of a loop.
pub mod pipeline;
