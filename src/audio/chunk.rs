use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::audio::decode::{AudioPcm, decode_audio_mono, read_wav_mono, write_wav_mono};
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::foundation::time::TimeSpan;

/// Default chunk length in seconds.
pub const DEFAULT_CHUNK_SECONDS: f64 = 30.0;

#[derive(Clone, Debug, PartialEq)]
/// One fixed-length slice of the source audio, materialized as its own WAV file.
pub struct AudioChunk {
    /// 0-based position in the source.
    pub index: usize,
    /// Start of this chunk in the source timeline, taken from its first sample.
    ///
    /// Chunk boundaries fall on whole samples, so this is `index * chunk_seconds` only when
    /// `chunk_seconds * sample_rate` is an integer; otherwise the rounded length is used.
    pub offset_seconds: f64,
    /// Length of this chunk; only the last chunk may be shorter than the chunk length.
    pub duration_seconds: f64,
    /// Mono WAV artifact for this chunk.
    pub path: PathBuf,
}

impl AudioChunk {
    /// Source-timeline span covered by this chunk.
    pub fn span(&self) -> TimeSpan {
        TimeSpan {
            start: self.offset_seconds,
            end: self.offset_seconds + self.duration_seconds,
        }
    }

    /// Load this chunk's samples back from disk.
    pub fn read_pcm(&self) -> VoxreelResult<AudioPcm> {
        let reader = hound::WavReader::open(&self.path).map_err(|e| {
            VoxreelError::audio_decode(format!(
                "failed to open chunk {} '{}': {e}",
                self.index,
                self.path.display()
            ))
        })?;
        read_wav_mono(reader).map_err(|e| {
            VoxreelError::audio_decode(format!("failed to read chunk {}: {e}", self.index))
        })
    }
}

/// Ordered chunk artifacts for one job.
///
/// The chunk files live in a private temporary directory that is removed when the set is
/// dropped, so they are reclaimed on success and failure paths alike.
#[derive(Debug)]
pub struct ChunkSet {
    dir: tempfile::TempDir,
    chunk_seconds: f64,
    total_seconds: f64,
    chunks: Vec<AudioChunk>,
}

impl ChunkSet {
    /// Chunks in source order.
    pub fn chunks(&self) -> &[AudioChunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// `true` when the source had no samples.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Nominal chunk length in seconds.
    pub fn chunk_seconds(&self) -> f64 {
        self.chunk_seconds
    }

    /// Duration of the decoded source in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    /// Directory holding the chunk files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Decode `path` once and split it into chunks of `chunk_seconds`.
///
/// `scratch_dir` selects where the temporary chunk directory is created (system temp dir
/// when `None`).
#[tracing::instrument(skip(scratch_dir))]
pub fn chunk_audio_file(
    path: &Path,
    chunk_seconds: f64,
    scratch_dir: Option<&Path>,
) -> VoxreelResult<ChunkSet> {
    validate_chunk_seconds(chunk_seconds)?;
    let pcm = decode_audio_mono(path)?;
    chunk_pcm(&pcm, chunk_seconds, scratch_dir)
}

/// Split already-decoded PCM into contiguous, non-overlapping chunks.
///
/// Produces `ceil(L / C)` chunks for `L` samples and `C` samples per chunk; every chunk
/// holds exactly `C` samples except possibly the last.
pub fn chunk_pcm(
    pcm: &AudioPcm,
    chunk_seconds: f64,
    scratch_dir: Option<&Path>,
) -> VoxreelResult<ChunkSet> {
    validate_chunk_seconds(chunk_seconds)?;
    if pcm.sample_rate == 0 {
        return Err(VoxreelError::audio_decode("decoded audio has a zero sample rate"));
    }

    let samples_per_chunk = (chunk_seconds * f64::from(pcm.sample_rate)).round() as usize;
    if samples_per_chunk == 0 {
        return Err(VoxreelError::validation(format!(
            "chunk length {chunk_seconds}s is shorter than one sample at {} Hz",
            pcm.sample_rate
        )));
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix("voxreel-chunks-");
    let dir = match scratch_dir {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    }
    .context("failed to create chunk scratch directory")?;

    let rate = f64::from(pcm.sample_rate);
    let mut chunks = Vec::with_capacity(pcm.samples.len().div_ceil(samples_per_chunk));
    for (index, slice) in pcm.samples.chunks(samples_per_chunk).enumerate() {
        let path = dir.path().join(format!("chunk_{index:05}.wav"));
        write_wav_mono(&path, pcm.sample_rate, slice)?;
        chunks.push(AudioChunk {
            index,
            offset_seconds: (index * samples_per_chunk) as f64 / rate,
            duration_seconds: slice.len() as f64 / rate,
            path,
        });
    }

    tracing::debug!(
        chunks = chunks.len(),
        total_seconds = pcm.duration_secs(),
        "audio chunked"
    );

    Ok(ChunkSet {
        dir,
        chunk_seconds,
        total_seconds: pcm.duration_secs(),
        chunks,
    })
}

fn validate_chunk_seconds(chunk_seconds: f64) -> VoxreelResult<()> {
    if !chunk_seconds.is_finite() || chunk_seconds <= 0.0 {
        return Err(VoxreelError::validation(format!(
            "chunk length must be a positive number of seconds, got {chunk_seconds}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/chunk.rs"]
mod tests;
