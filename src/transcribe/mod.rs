//! Chunked speech-to-text.
//!
//! A [`pool::TranscriptionPool`] runs one [`pool::Transcriber`] call per audio chunk on a
//! bounded thread pool, re-bases each chunk's timestamps by its offset, and merges the
//! results in chunk order after a join barrier.

pub(crate) mod pool;
pub(crate) mod segment;
#[cfg(feature = "whisper")]
pub(crate) mod whisper;
