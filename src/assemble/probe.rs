use std::path::Path;
use std::process::{Command, Stdio};

use crate::foundation::error::{VoxreelError, VoxreelResult};

/// Container duration in seconds, as reported by `ffprobe`.
#[tracing::instrument]
pub fn probe_duration(path: &Path) -> VoxreelResult<f64> {
    if !path.is_file() {
        return Err(VoxreelError::not_found(path));
    }
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| VoxreelError::render(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(VoxreelError::render(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    parse_probe_duration(&out.stdout).ok_or_else(|| {
        VoxreelError::render(format!(
            "ffprobe reported no usable duration for '{}'",
            path.display()
        ))
    })
}

pub(crate) fn parse_probe_duration(json: &[u8]) -> Option<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json).ok()?;
    let d: f64 = parsed.format?.duration?.trim().parse().ok()?;
    (d.is_finite() && d >= 0.0).then_some(d)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_runs("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_runs("ffprobe")
}

fn tool_runs(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/probe.rs"]
mod tests;
