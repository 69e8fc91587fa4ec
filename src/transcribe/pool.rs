use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::audio::chunk::AudioChunk;
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::transcribe::segment::TranscriptSegment;

/// Default number of concurrent inference tasks.
pub const DEFAULT_WORKERS: usize = 2;

/// Speech-to-text backend.
///
/// Contract: returns segments whose timestamps are relative to the start of `chunk`, in
/// the order they were spoken. A silent chunk returns an empty list.
pub trait Transcriber: Send + Sync {
    /// Run inference over one chunk.
    fn transcribe(&self, chunk: &AudioChunk) -> anyhow::Result<Vec<TranscriptSegment>>;
}

impl<F> Transcriber for F
where
    F: Fn(&AudioChunk) -> anyhow::Result<Vec<TranscriptSegment>> + Send + Sync,
{
    fn transcribe(&self, chunk: &AudioChunk) -> anyhow::Result<Vec<TranscriptSegment>> {
        self(chunk)
    }
}

#[derive(Clone, Debug)]
/// Concurrency controls for [`TranscriptionPool`].
pub struct PoolOpts {
    /// Number of worker threads (fixed, >= 1).
    pub workers: usize,
    /// Optional job deadline, checked at the join barrier.
    pub timeout: Option<Duration>,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: None,
        }
    }
}

/// Bounded worker pool running one inference task per chunk.
///
/// The pool owns the transcriber; tasks share it read-only and keep no other state.
pub struct TranscriptionPool {
    transcriber: Arc<dyn Transcriber>,
    pool: rayon::ThreadPool,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for TranscriptionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionPool")
            .field("workers", &self.pool.current_num_threads())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TranscriptionPool {
    /// Build a pool with `opts.workers` threads around `transcriber`.
    pub fn new(transcriber: Arc<dyn Transcriber>, opts: PoolOpts) -> VoxreelResult<Self> {
        if opts.workers == 0 {
            return Err(VoxreelError::validation(
                "transcription 'workers' must be >= 1",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.workers)
            .thread_name(|i| format!("voxreel-asr-{i}"))
            .build()
            .map_err(|e| {
                VoxreelError::validation(format!("failed to build transcription pool: {e}"))
            })?;
        Ok(Self {
            transcriber,
            pool,
            timeout: opts.timeout,
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Transcribe all chunks and merge them into one globally-timed sequence.
    ///
    /// Blocks until every task has finished. Output order is chunk-index order, never
    /// completion order. The first observed failure aborts the job with its chunk index.
    #[tracing::instrument(skip_all, fields(chunks = chunks.len(), workers = self.workers()))]
    pub fn transcribe(&self, chunks: &[AudioChunk]) -> VoxreelResult<Vec<TranscriptSegment>> {
        let started = Instant::now();

        let per_chunk: Vec<Vec<TranscriptSegment>> = self.pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| self.run_chunk(chunk))
                .collect::<VoxreelResult<Vec<_>>>()
        })?;

        if let Some(limit) = self.timeout
            && started.elapsed() > limit
        {
            return Err(VoxreelError::transcription_job(format!(
                "job exceeded its {:.1}s deadline",
                limit.as_secs_f64()
            )));
        }

        let merged = merge_in_chunk_order(per_chunk);
        tracing::info!(
            segments = merged.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "transcription merged"
        );
        Ok(merged)
    }

    fn run_chunk(&self, chunk: &AudioChunk) -> VoxreelResult<Vec<TranscriptSegment>> {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.transcriber.transcribe(chunk)
        }));
        let segments = match outcome {
            Ok(Ok(segments)) => segments,
            Ok(Err(e)) => return Err(VoxreelError::transcription(chunk.index, format!("{e:#}"))),
            Err(_) => {
                return Err(VoxreelError::transcription(
                    chunk.index,
                    "transcriber panicked",
                ));
            }
        };

        if let Some(bad) = segments.iter().position(|s| !s.is_finite()) {
            return Err(VoxreelError::transcription(
                chunk.index,
                format!("segment {bad} has a non-finite timestamp"),
            ));
        }

        tracing::debug!(
            chunk = chunk.index,
            segments = segments.len(),
            "chunk transcribed"
        );
        Ok(segments
            .into_iter()
            .map(|s| s.normalized().rebased(chunk.offset_seconds))
            .collect())
    }
}

/// Concatenate per-chunk results; `per_chunk[i]` must belong to chunk `i`.
pub fn merge_in_chunk_order(per_chunk: Vec<Vec<TranscriptSegment>>) -> Vec<TranscriptSegment> {
    per_chunk.into_iter().flatten().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transcribe/pool.rs"]
mod tests;
