use std::path::Path;

use anyhow::Context as _;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::chunk::AudioChunk;
use crate::audio::decode::TRANSCRIBE_SAMPLE_RATE;
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::transcribe::pool::Transcriber;
use crate::transcribe::segment::{TranscriptSegment, WordTiming};

/// [`Transcriber`] backed by a whisper.cpp model.
///
/// The model is loaded once; every chunk gets its own inference state, so concurrent
/// tasks never share mutable decoder state.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    language: Option<String>,
    threads: i32,
}

impl WhisperTranscriber {
    /// Load a ggml model from `model_path`.
    ///
    /// `language` of `None` lets whisper auto-detect; `threads` is per chunk task.
    pub fn load(
        model_path: &Path,
        language: Option<String>,
        threads: usize,
    ) -> VoxreelResult<Self> {
        let path = model_path.to_str().ok_or_else(|| {
            VoxreelError::validation(format!(
                "whisper model path '{}' is not valid UTF-8",
                model_path.display()
            ))
        })?;
        if !model_path.is_file() {
            return Err(VoxreelError::not_found(model_path));
        }
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| {
                VoxreelError::validation(format!(
                    "failed to load whisper model '{}': {e}",
                    model_path.display()
                ))
            })?;
        tracing::info!(model = %model_path.display(), "whisper model loaded");
        Ok(Self {
            ctx,
            language,
            threads: i32::try_from(threads.max(1)).unwrap_or(1),
        })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, chunk: &AudioChunk) -> anyhow::Result<Vec<TranscriptSegment>> {
        let pcm = chunk.read_pcm()?;
        anyhow::ensure!(
            pcm.sample_rate == TRANSCRIBE_SAMPLE_RATE,
            "chunk {} is {} Hz, whisper needs {TRANSCRIBE_SAMPLE_RATE} Hz",
            chunk.index,
            pcm.sample_rate
        );
        if pcm.samples.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = self
            .ctx
            .create_state()
            .context("failed to create whisper state")?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_token_timestamps(true);
        params.set_n_threads(self.threads);
        params.set_language(self.language.as_deref());

        state
            .full(params, &pcm.samples)
            .context("whisper full() failed")?;

        let n_segments = state.full_n_segments()?;
        let mut out = Vec::with_capacity(usize::try_from(n_segments).unwrap_or(0));
        for s in 0..n_segments {
            let text = state.full_get_segment_text(s)?;
            let start = state.full_get_segment_t0(s)? as f64 / 100.0;
            let end = state.full_get_segment_t1(s)? as f64 / 100.0;

            let mut words = Vec::<WordTiming>::new();
            for t in 0..state.full_n_tokens(s)? {
                let piece = state.full_get_token_text(s, t)?;
                // Control tokens look like "[_BEG_]" / "[_TT_150]" / "<|endoftext|>".
                if piece.starts_with("[_") || piece.starts_with("<|") {
                    continue;
                }
                let data = state.full_get_token_data(s, t)?;
                let (t0, t1) = (data.t0 as f64 / 100.0, data.t1 as f64 / 100.0);
                let starts_word = piece.starts_with(' ') || words.is_empty();
                match words.last_mut() {
                    Some(w) if !starts_word => {
                        w.text.push_str(piece.trim());
                        w.end = w.end.max(t1);
                    }
                    _ => words.push(WordTiming {
                        start: t0,
                        end: t1,
                        text: piece.trim().to_owned(),
                    }),
                }
            }
            words.retain(|w| !w.text.is_empty());

            if text.trim().is_empty() {
                continue;
            }
            out.push(TranscriptSegment {
                start,
                end,
                text: text.trim().to_owned(),
                words,
            });
        }
        Ok(out)
    }
}
