//! Final video assembly through the system `ffmpeg`.
//!
//! The render is one blocking ffmpeg process per job, driven by a [`graph::FilterGraph`]
//! built from the caption timeline, the chosen background window, and fade options.

pub(crate) mod graph;
pub(crate) mod options;
pub(crate) mod probe;
pub(crate) mod render;
