use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::chunk::DEFAULT_CHUNK_SECONDS;
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::foundation::time::TimestampPrecision;
use crate::subtitle::cue::{CueRules, SplitMode};
use crate::subtitle::document::DEFAULT_PLAY_RES;
use crate::transcribe::pool::{DEFAULT_WORKERS, PoolOpts};

/// Service-level settings for every job run through a [`Pipeline`](crate::Pipeline).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory that holds one folder per job.
    pub uploads_root: PathBuf,
    /// Directory searched for style font files.
    pub fonts_dir: PathBuf,
    /// Length of each transcription chunk, seconds.
    pub chunk_seconds: f64,
    /// Concurrent transcription tasks.
    pub workers: usize,
    /// Deadline for a whole transcription job, seconds.
    pub timeout_secs: Option<f64>,
    /// Speech model settings.
    pub transcriber: TranscriberConfig,
    /// Caption splitting and artifact settings.
    pub subtitles: SubtitleConfig,
    /// Encoder settings for previews and final renders.
    pub render: RenderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            uploads_root: PathBuf::from("uploads"),
            fonts_dir: PathBuf::from("fonts"),
            chunk_seconds: DEFAULT_CHUNK_SECONDS,
            workers: DEFAULT_WORKERS,
            timeout_secs: None,
            transcriber: TranscriberConfig::default(),
            subtitles: SubtitleConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Speech model settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscriberConfig {
    /// ggml model file.
    pub model_path: PathBuf,
    /// Spoken language; `None` auto-detects.
    pub language: Option<String>,
    /// Inference threads used by each chunk task.
    pub threads_per_worker: usize,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_owned()),
            threads_per_worker: 2,
        }
    }
}

/// Caption splitting and artifact settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtitleConfig {
    /// Word packing mode.
    pub split: SplitMode,
    /// Upper bound on a single cue's duration, seconds.
    pub max_duration: Option<f64>,
    /// Timestamp precision in the artifact.
    pub precision: TimestampPrecision,
    /// `PlayResX` of the script.
    pub play_res_x: u32,
    /// `PlayResY` of the script.
    pub play_res_y: u32,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            split: SplitMode::default(),
            max_duration: None,
            precision: TimestampPrecision::default(),
            play_res_x: DEFAULT_PLAY_RES.0,
            play_res_y: DEFAULT_PLAY_RES.1,
        }
    }
}

impl SubtitleConfig {
    /// Splitting rules for the timeline builder.
    pub fn cue_rules(&self) -> CueRules {
        CueRules {
            split: self.split,
            max_duration: self.max_duration,
        }
    }

    /// Script resolution.
    pub fn play_res(&self) -> (u32, u32) {
        (self.play_res_x, self.play_res_y)
    }
}

/// Encoder settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// ffmpeg video encoder.
    pub video_codec: String,
    /// Encoder preset.
    pub preset: String,
    /// ffmpeg audio encoder.
    pub audio_codec: String,
    /// Audio bitrate, ffmpeg syntax.
    pub audio_bitrate: String,
    /// Center-crop the background to 9:16 and scale to the frame size.
    pub portrait: bool,
    /// Output width when `portrait` is set.
    pub frame_width: u32,
    /// Output height when `portrait` is set.
    pub frame_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_owned(),
            preset: "ultrafast".to_owned(),
            audio_codec: "aac".to_owned(),
            audio_bitrate: "192k".to_owned(),
            portrait: false,
            frame_width: 1080,
            frame_height: 1920,
        }
    }
}

impl RenderConfig {
    /// Reject blank encoder settings and odd frame sizes.
    pub fn validate(&self) -> VoxreelResult<()> {
        for (name, v) in [
            ("render.video_codec", &self.video_codec),
            ("render.preset", &self.preset),
            ("render.audio_codec", &self.audio_codec),
            ("render.audio_bitrate", &self.audio_bitrate),
        ] {
            if v.trim().is_empty() {
                return Err(VoxreelError::validation(format!("{name} must not be empty")));
            }
        }
        if self.portrait {
            if self.frame_width == 0 || self.frame_height == 0 {
                return Err(VoxreelError::validation(
                    "render frame width/height must be non-zero",
                ));
            }
            if !self.frame_width.is_multiple_of(2) || !self.frame_height.is_multiple_of(2) {
                return Err(VoxreelError::validation(
                    "render frame width/height must be even (required for yuv420p output)",
                ));
            }
        }
        Ok(())
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file; absent fields take their defaults.
    pub fn from_path(path: &Path) -> VoxreelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VoxreelError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> VoxreelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| VoxreelError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no job could run with.
    pub fn validate(&self) -> VoxreelResult<()> {
        if !self.chunk_seconds.is_finite() || self.chunk_seconds <= 0.0 {
            return Err(VoxreelError::validation(format!(
                "chunk_seconds must be finite and > 0, got {}",
                self.chunk_seconds
            )));
        }
        if self.workers == 0 {
            return Err(VoxreelError::validation("workers must be >= 1"));
        }
        if let Some(t) = self.timeout_secs
            && !(t > 0.0 && Duration::try_from_secs_f64(t).is_ok())
        {
            return Err(VoxreelError::validation(format!(
                "timeout_secs must be > 0 and representable as a duration, got {t}"
            )));
        }
        if self.transcriber.threads_per_worker == 0 {
            return Err(VoxreelError::validation(
                "transcriber.threads_per_worker must be >= 1",
            ));
        }
        if self.subtitles.play_res_x == 0 || self.subtitles.play_res_y == 0 {
            return Err(VoxreelError::validation(
                "subtitles.play_res_x/play_res_y must be non-zero",
            ));
        }
        self.subtitles.cue_rules().validate()?;
        self.render.validate()
    }

    /// Worker pool options.
    pub fn pool_opts(&self) -> PoolOpts {
        PoolOpts {
            workers: self.workers,
            timeout: self
                .timeout_secs
                .and_then(|t| Duration::try_from_secs_f64(t).ok()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
