//! Per-frame scene description handed to the raster backend.

pub(crate) mod compose;
pub(crate) mod model;
