//! Style compilation: structured caption options to an ASS `Style:` line.

pub(crate) mod alignment;
pub(crate) mod color;
pub(crate) mod spec;
