use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{VoxreelError, VoxreelResult};

/// Narration audio inside a job folder.
pub const SPEECH_FILE: &str = "speech.wav";
/// Subtitle artifact inside a job folder.
pub const SUBTITLES_FILE: &str = "subtitles.ass";
/// Uncaptioned preview inside a job folder.
pub const PREVIEW_FILE: &str = "preview.mp4";
/// Final render inside a job folder.
pub const RESULT_FILE: &str = "result.mp4";

/// Per-job directory `<uploads>/<id>` with fixed artifact names.
///
/// Each job owns its folder exclusively; concurrent jobs never share one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobFolder {
    id: String,
    dir: PathBuf,
}

impl JobFolder {
    /// Create a fresh folder named by a random UUID under `uploads_root`.
    pub fn allocate(uploads_root: &Path) -> VoxreelResult<Self> {
        let id = uuid::Uuid::new_v4().to_string();
        let dir = uploads_root.join(&id);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create job folder '{}'", dir.display()))?;
        tracing::info!(job = %id, "job folder allocated");
        Ok(Self { id, dir })
    }

    /// Open an existing job folder.
    pub fn open(uploads_root: &Path, id: &str) -> VoxreelResult<Self> {
        validate_id(id)?;
        let dir = uploads_root.join(id);
        if !dir.is_dir() {
            return Err(VoxreelError::not_found(dir));
        }
        Ok(Self {
            id: id.to_owned(),
            dir,
        })
    }

    /// Job id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Folder path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `speech.wav`
    pub fn speech_path(&self) -> PathBuf {
        self.dir.join(SPEECH_FILE)
    }

    /// `subtitles.ass`
    pub fn subtitles_path(&self) -> PathBuf {
        self.dir.join(SUBTITLES_FILE)
    }

    /// `preview.mp4`
    pub fn preview_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_FILE)
    }

    /// `result.mp4`
    pub fn result_path(&self) -> PathBuf {
        self.dir.join(RESULT_FILE)
    }

    /// `true` once a subtitle artifact has been written.
    pub fn has_subtitles(&self) -> bool {
        self.subtitles_path().is_file()
    }
}

fn validate_id(id: &str) -> VoxreelResult<()> {
    let ok = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(VoxreelError::validation(format!("invalid job id \"{id}\"")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
