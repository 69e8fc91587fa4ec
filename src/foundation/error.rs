use std::path::{Path, PathBuf};

/// Convenience result type used across voxreel.
pub type VoxreelResult<T> = Result<T, VoxreelError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every stage fails with one of these variants; nothing is recovered silently and no
/// stage retries on its own.
#[derive(thiserror::Error, Debug)]
pub enum VoxreelError {
    /// Invalid configuration, options, or input contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source audio could not be read or decoded.
    #[error("audio decode error: {0}")]
    AudioDecode(String),

    /// Inference failed for a chunk (or the job as a whole when `chunk_index` is `None`).
    #[error("transcription error{}: {message}", fmt_chunk(*chunk_index))]
    Transcription {
        /// Index of the failing chunk, when the failure is attributable to one.
        chunk_index: Option<usize>,
        /// Human-readable cause.
        message: String,
    },

    /// A style attribute could not be compiled.
    #[error("invalid style error: field '{field}': {message}")]
    InvalidStyle {
        /// Offending style field.
        field: &'static str,
        /// Human-readable cause.
        message: String,
    },

    /// The configured font file does not exist.
    #[error("font not found error: '{}'", path.display())]
    FontNotFound {
        /// Resolved font path that was checked.
        path: PathBuf,
    },

    /// The background video is shorter than the caption timeline.
    #[error(
        "insufficient source duration error: background is {available:.3}s, captions need {required:.3}s"
    )]
    InsufficientSourceDuration {
        /// Probed background duration in seconds.
        available: f64,
        /// Required duration (end of the last cue) in seconds.
        required: f64,
    },

    /// A required artifact or job folder is missing.
    #[error("not found error: '{}'", path.display())]
    NotFound {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// Media assembly failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem failure outside of a more specific stage.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn fmt_chunk(chunk_index: Option<usize>) -> String {
    match chunk_index {
        Some(i) => format!(" (chunk {i})"),
        None => String::new(),
    }
}

impl VoxreelError {
    /// Build a [`VoxreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VoxreelError::AudioDecode`] value.
    pub fn audio_decode(msg: impl Into<String>) -> Self {
        Self::AudioDecode(msg.into())
    }

    /// Build a [`VoxreelError::Transcription`] value attributed to one chunk.
    pub fn transcription(chunk_index: usize, msg: impl Into<String>) -> Self {
        Self::Transcription {
            chunk_index: Some(chunk_index),
            message: msg.into(),
        }
    }

    /// Build a [`VoxreelError::Transcription`] value for the job as a whole.
    pub fn transcription_job(msg: impl Into<String>) -> Self {
        Self::Transcription {
            chunk_index: None,
            message: msg.into(),
        }
    }

    /// Build a [`VoxreelError::InvalidStyle`] value.
    pub fn invalid_style(field: &'static str, msg: impl Into<String>) -> Self {
        Self::InvalidStyle {
            field,
            message: msg.into(),
        }
    }

    /// Build a [`VoxreelError::FontNotFound`] value.
    pub fn font_not_found(path: impl AsRef<Path>) -> Self {
        Self::FontNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build a [`VoxreelError::NotFound`] value.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build a [`VoxreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Chunk index carried by a transcription failure, if any.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            Self::Transcription { chunk_index, .. } => *chunk_index,
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
