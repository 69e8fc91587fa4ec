use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::style::alignment::Alignment;

/// Fade length used for every fade the caller leaves unset.
pub const DEFAULT_FADE_SECONDS: f64 = 3.0;

fn default_fade() -> f64 {
    DEFAULT_FADE_SECONDS
}

/// Per-render fades and caption placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoOptions {
    /// Narration fade-in, seconds.
    #[serde(default = "default_fade")]
    pub audio_fadein: f64,
    /// Narration fade-out, seconds.
    #[serde(default = "default_fade")]
    pub audio_fadeout: f64,
    /// Picture fade-in, seconds.
    #[serde(default = "default_fade")]
    pub video_fadein: f64,
    /// Picture fade-out, seconds.
    #[serde(default = "default_fade")]
    pub video_fadeout: f64,
    /// Alignment token that overrides the style's alignment at burn-in.
    #[serde(default)]
    pub subtitles_position: Option<String>,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            audio_fadein: DEFAULT_FADE_SECONDS,
            audio_fadeout: DEFAULT_FADE_SECONDS,
            video_fadein: DEFAULT_FADE_SECONDS,
            video_fadeout: DEFAULT_FADE_SECONDS,
            subtitles_position: None,
        }
    }
}

impl VideoOptions {
    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> VoxreelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VoxreelError::validation(format!(
                "failed to read video options '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse options from JSON text; absent fades default to 3 s.
    pub fn from_json_str(text: &str) -> VoxreelResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| VoxreelError::validation(format!("invalid video options json: {e}")))
    }

    /// Check fades and resolve the optional position override.
    pub fn validate(&self) -> VoxreelResult<Option<Alignment>> {
        for (name, v) in [
            ("audio_fadein", self.audio_fadein),
            ("audio_fadeout", self.audio_fadeout),
            ("video_fadein", self.video_fadein),
            ("video_fadeout", self.video_fadeout),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(VoxreelError::validation(format!(
                    "{name} must be a finite, non-negative number of seconds, got {v}"
                )));
            }
        }
        self.subtitles_position
            .as_deref()
            .map(|token| Alignment::parse_field("subtitles_position", token))
            .transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/options.rs"]
mod tests;
