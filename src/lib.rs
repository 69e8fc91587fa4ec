//! Voxreel turns a narration track into a captioned short-form video.
//!
//! The pipeline is job-oriented:
//!
//! - Allocate a [`JobFolder`] holding the narration
//! - Transcribe it in fixed-length chunks on a bounded [`TranscriptionPool`] and write an
//!   ASS [`SubtitleDocument`] styled by a [`StyleSpec`]
//! - Cheaply [restyle](Pipeline::restyle) that artifact as often as needed
//! - Burn the captions into a random window of a background video with the system
//!   `ffmpeg` ([`Pipeline::render`])
//!
//! Speech recognition is pluggable through [`Transcriber`]; the `whisper` feature ships a
//! whisper.cpp backed implementation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assemble;
pub(crate) mod audio;
pub(crate) mod style;
pub(crate) mod subtitle;
pub(crate) mod transcribe;

/// Pipeline, style, and encoder configuration.
pub mod config;
/// Per-job folders and artifact paths.
pub mod job;
/// In-process pipeline entry point.
pub mod pipeline;

pub use crate::foundation::error::{VoxreelError, VoxreelResult};
pub use crate::foundation::time::{
    TimeSpan, TimestampPrecision, format_ass_timestamp, parse_ass_timestamp,
};

pub use crate::assemble::graph::{
    Filter, FilterChain, FilterGraph, RenderGraphParams, build_render_graph,
};
pub use crate::assemble::options::{DEFAULT_FADE_SECONDS, VideoOptions};
pub use crate::assemble::probe::{is_ffmpeg_on_path, is_ffprobe_on_path, probe_duration};
pub use crate::assemble::render::{RenderRequest, build_preview, choose_window, render_final};
pub use crate::audio::chunk::{
    AudioChunk, ChunkSet, DEFAULT_CHUNK_SECONDS, chunk_audio_file, chunk_pcm,
};
pub use crate::audio::decode::{AudioPcm, TRANSCRIBE_SAMPLE_RATE, decode_audio_mono, import_as_wav};
pub use crate::config::{PipelineConfig, RenderConfig, SubtitleConfig, TranscriberConfig};
pub use crate::job::JobFolder;
pub use crate::pipeline::{Pipeline, SubtitleOutcome};
pub use crate::style::alignment::Alignment;
pub use crate::style::color::{AssColor, hex_to_ass};
pub use crate::style::spec::{CompiledStyle, STYLE_FORMAT, StyleSpec};
pub use crate::subtitle::cue::{
    Cue, CueRules, DEFAULT_MAX_CHARS_PER_LINE, DEFAULT_MAX_WORDS, SplitMode, build_cues,
    split_segment,
};
pub use crate::subtitle::document::{
    DEFAULT_PLAY_RES, EVENTS_FORMAT, SubtitleDocument, escape_dialogue_text,
};
pub use crate::subtitle::restyle::{restyle_file, restyle_text};
pub use crate::transcribe::pool::{
    DEFAULT_WORKERS, PoolOpts, Transcriber, TranscriptionPool, merge_in_chunk_order,
};
pub use crate::transcribe::segment::{TranscriptSegment, WordTiming};
#[cfg(feature = "whisper")]
pub use crate::transcribe::whisper::WhisperTranscriber;
