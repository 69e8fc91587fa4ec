use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::VoxreelResult;

/// Replace `path` with `contents` so that readers see either the old or the new file.
///
/// The bytes go to a hidden sibling first and are renamed over `path` once flushed. The
/// sibling is removed on every failure path.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> VoxreelResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".voxreel-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("create temp file in '{}'", parent.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("write temp file for '{}'", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for '{}'", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("rename temp file onto '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
