use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;

use crate::assemble::options::VideoOptions;
use crate::assemble::render::{RenderRequest, build_preview, render_final};
use crate::audio::chunk::chunk_audio_file;
use crate::audio::decode::import_as_wav;
use crate::config::PipelineConfig;
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::job::JobFolder;
use crate::style::spec::StyleSpec;
use crate::subtitle::cue::build_cues;
use crate::subtitle::document::SubtitleDocument;
use crate::subtitle::restyle::restyle_file;
use crate::transcribe::pool::{Transcriber, TranscriptionPool};
use crate::transcribe::segment::TranscriptSegment;

/// What [`Pipeline::subtitles_or_restyle`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum SubtitleOutcome {
    /// No artifact existed; inference ran and wrote one.
    Generated(SubtitleDocument),
    /// An artifact existed; only its style line was replaced.
    Restyled,
}

/// In-process entry point: one configured transcriber pool, any number of jobs.
///
/// Jobs are independent; each operation touches only its own [`JobFolder`].
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    pool: TranscriptionPool,
}

impl Pipeline {
    /// Validate `config` and build the transcription pool around `transcriber`.
    pub fn new(config: PipelineConfig, transcriber: Arc<dyn Transcriber>) -> VoxreelResult<Self> {
        config.validate()?;
        let pool = TranscriptionPool::new(transcriber, config.pool_opts())?;
        Ok(Self { config, pool })
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Allocate a job folder and store the narration as its `speech.wav`.
    #[tracing::instrument(skip(self))]
    pub fn new_job(&self, speech: &Path) -> VoxreelResult<JobFolder> {
        let job = JobFolder::allocate(&self.config.uploads_root)?;
        if let Err(e) = import_as_wav(speech, &job.speech_path()) {
            let _ = std::fs::remove_dir_all(job.dir());
            return Err(e);
        }
        Ok(job)
    }

    /// Open an existing job folder by id.
    pub fn open_job(&self, id: &str) -> VoxreelResult<JobFolder> {
        JobFolder::open(&self.config.uploads_root, id)
    }

    /// Chunk `audio`, transcribe every chunk, and return the merged timeline.
    ///
    /// Chunk files are gone when this returns, whatever the outcome.
    pub fn transcribe(&self, audio: &Path) -> VoxreelResult<Vec<TranscriptSegment>> {
        let chunks = chunk_audio_file(audio, self.config.chunk_seconds, None)?;
        tracing::info!(
            chunks = chunks.len(),
            total_secs = chunks.total_seconds(),
            "audio chunked"
        );
        self.pool.transcribe(chunks.chunks())
    }

    /// Transcribe the job's narration and write `subtitles.ass` with `style`.
    ///
    /// The style is compiled before any inference runs.
    #[tracing::instrument(skip(self, style), fields(job = %job.id()))]
    pub fn generate_subtitles(
        &self,
        job: &JobFolder,
        style: &StyleSpec,
    ) -> VoxreelResult<SubtitleDocument> {
        let compiled = style.compile()?;
        let rules = self.config.subtitles.cue_rules();
        rules.validate()?;

        let speech = job.speech_path();
        if !speech.is_file() {
            return Err(VoxreelError::not_found(speech));
        }
        let segments = self.transcribe(&speech)?;
        let cues = build_cues(&segments, &rules)?;
        tracing::info!(segments = segments.len(), cues = cues.len(), "timeline built");

        let doc = SubtitleDocument::new(&compiled, cues, self.config.subtitles.play_res());
        doc.write(&job.subtitles_path(), self.config.subtitles.precision)?;
        Ok(doc)
    }

    /// Replace the style of the job's existing artifact without re-running inference.
    #[tracing::instrument(skip(self, style), fields(job = %job.id()))]
    pub fn restyle(&self, job: &JobFolder, style: &StyleSpec) -> VoxreelResult<()> {
        let compiled = style.compile()?;
        restyle_file(&job.subtitles_path(), &compiled)
    }

    /// Generate subtitles on the first request and restyle on every later one.
    pub fn subtitles_or_restyle(
        &self,
        job: &JobFolder,
        style: &StyleSpec,
    ) -> VoxreelResult<SubtitleOutcome> {
        if job.has_subtitles() {
            self.restyle(job, style)?;
            Ok(SubtitleOutcome::Restyled)
        } else {
            self.generate_subtitles(job, style)
                .map(SubtitleOutcome::Generated)
        }
    }

    /// Write `preview.mp4`: the narration over the uncaptioned background.
    #[tracing::instrument(skip(self), fields(job = %job.id()))]
    pub fn build_preview(&self, job: &JobFolder, background: &Path) -> VoxreelResult<PathBuf> {
        let out = job.preview_path();
        build_preview(background, &job.speech_path(), &out, &self.config.render)?;
        Ok(out)
    }

    /// Write `result.mp4`: captions burned into a random window of `background`.
    ///
    /// The artifact is restyled to `style` first, once its font is known to exist.
    #[tracing::instrument(skip(self, style, options, rng), fields(job = %job.id()))]
    pub fn render<R: Rng>(
        &self,
        job: &JobFolder,
        background: &Path,
        style: &StyleSpec,
        options: &VideoOptions,
        rng: &mut R,
    ) -> VoxreelResult<PathBuf> {
        let speech = job.speech_path();
        let subtitles = job.subtitles_path();
        let out = job.result_path();

        let compiled = style.compile()?;
        let font = style.font_path(&self.config.fonts_dir);
        if !font.is_file() {
            return Err(VoxreelError::font_not_found(font));
        }
        restyle_file(&subtitles, &compiled)?;

        render_final(
            &RenderRequest {
                background,
                audio: &speech,
                subtitles: &subtitles,
                fonts_dir: &self.config.fonts_dir,
                style,
                options,
                output: &out,
            },
            &self.config.render,
            rng,
        )?;
        Ok(out)
    }
}
