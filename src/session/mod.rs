//! Generation requests: validation, lifecycle, and the public entry points.

/// Serializable request + options bundle (CLI `--config`).
pub mod config;
/// One end-to-end generation request and its state machine.
pub mod job;
