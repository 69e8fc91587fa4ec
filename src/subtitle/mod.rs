//! Caption timeline and the ASS subtitle artifact.
//!
//! [`cue`] turns merged transcript segments into evenly-timed cues, [`document`]
//! reads and writes the artifact, and [`restyle`] swaps its style line in place.

pub(crate) mod cue;
pub(crate) mod document;
pub(crate) mod restyle;
