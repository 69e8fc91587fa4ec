use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;
use rand::Rng;

use crate::assemble::graph::{AUDIO_OUT, RenderGraphParams, VIDEO_OUT, build_render_graph};
use crate::assemble::options::VideoOptions;
use crate::assemble::probe::{is_ffmpeg_on_path, is_ffprobe_on_path, probe_duration};
use crate::config::RenderConfig;
use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::foundation::time::TimeSpan;
use crate::style::spec::StyleSpec;
use crate::subtitle::document::SubtitleDocument;

/// Pick the slice of the background to keep.
///
/// Longer backgrounds get a uniformly random start in `[0, background - target]`; an
/// exact fit starts at 0; a shorter one is an error.
pub fn choose_window<R: Rng>(
    rng: &mut R,
    background_secs: f64,
    target_secs: f64,
) -> VoxreelResult<TimeSpan> {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return Err(VoxreelError::validation(format!(
            "render target duration must be > 0, got {target_secs}"
        )));
    }
    if !background_secs.is_finite() || background_secs < target_secs {
        return Err(VoxreelError::InsufficientSourceDuration {
            available: background_secs,
            required: target_secs,
        });
    }
    let slack = background_secs - target_secs;
    let start = if slack > 0.0 {
        rng.gen_range(0.0..=slack)
    } else {
        0.0
    };
    TimeSpan::new(start, start + target_secs)
}

/// Everything one final render reads and writes.
#[derive(Clone, Debug)]
pub struct RenderRequest<'a> {
    /// Background video.
    pub background: &'a Path,
    /// Narration track.
    pub audio: &'a Path,
    /// ASS artifact to burn in.
    pub subtitles: &'a Path,
    /// Directory holding the style's font file.
    pub fonts_dir: &'a Path,
    /// Style the artifact was (re)styled with.
    pub style: &'a StyleSpec,
    /// Fades and position override.
    pub options: &'a VideoOptions,
    /// Final MP4 path.
    pub output: &'a Path,
}

/// Render the captioned video and return the background window that was used.
///
/// Preconditions are checked before ffmpeg is spawned. The artifact must carry exactly the
/// style line `req.style` compiles to, so the font checked is the font libass will load. ffmpeg writes into a temporary
/// sibling of `output` that only replaces `output` after a clean exit.
#[tracing::instrument(skip_all, fields(output = %req.output.display()))]
pub fn render_final<R: Rng>(
    req: &RenderRequest<'_>,
    settings: &RenderConfig,
    rng: &mut R,
) -> VoxreelResult<TimeSpan> {
    let compiled = req.style.compile()?;
    let font = req.style.font_path(req.fonts_dir);
    if !font.is_file() {
        return Err(VoxreelError::font_not_found(font));
    }
    let alignment_override = req.options.validate()?;
    settings.validate()?;

    let doc = SubtitleDocument::read(req.subtitles)?;
    if doc.style_line != compiled.line {
        return Err(VoxreelError::validation(format!(
            "subtitle artifact '{}' is styled as \"{}\", not with the requested style; restyle it first",
            req.subtitles.display(),
            doc.style_name
        )));
    }
    let target = doc.last_cue_end().ok_or_else(|| {
        VoxreelError::validation(format!(
            "subtitle artifact '{}' has no cues to render",
            req.subtitles.display()
        ))
    })?;
    for input in [req.background, req.audio] {
        if !input.is_file() {
            return Err(VoxreelError::not_found(input));
        }
    }
    ensure_tools()?;

    let background_secs = probe_duration(req.background)?;
    let window = choose_window(rng, background_secs, target)?;
    tracing::info!(
        background_secs,
        start = window.start,
        duration = window.duration(),
        "background window chosen"
    );

    let graph = build_render_graph(&RenderGraphParams {
        window,
        subtitles_path: req.subtitles,
        fonts_dir: req.fonts_dir,
        alignment_override,
        options: req.options,
        portrait: settings
            .portrait
            .then_some((settings.frame_width, settings.frame_height)),
    });

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error", "-i"])
        .arg(req.background)
        .arg("-i")
        .arg(req.audio)
        .arg("-filter_complex")
        .arg(graph.to_string())
        .args(["-map", format!("[{VIDEO_OUT}]").as_str()])
        .args(["-map", format!("[{AUDIO_OUT}]").as_str()])
        .args([
            "-c:v",
            settings.video_codec.as_str(),
            "-preset",
            settings.preset.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            settings.audio_codec.as_str(),
            "-b:a",
            settings.audio_bitrate.as_str(),
            "-movflags",
            "+faststart",
        ]);
    run_into(cmd, req.output)?;
    tracing::info!("final video rendered");
    Ok(window)
}

/// Mux the narration onto the background with the picture stream-copied.
///
/// The result stops at the shorter of the two inputs.
#[tracing::instrument(skip(settings))]
pub fn build_preview(
    background: &Path,
    audio: &Path,
    output: &Path,
    settings: &RenderConfig,
) -> VoxreelResult<()> {
    for input in [background, audio] {
        if !input.is_file() {
            return Err(VoxreelError::not_found(input));
        }
    }
    if !is_ffmpeg_on_path() {
        return Err(VoxreelError::render(
            "ffmpeg is required for previews, but was not found on PATH",
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error", "-i"])
        .arg(background)
        .arg("-i")
        .arg(audio)
        .args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            settings.audio_codec.as_str(),
            "-b:a",
            settings.audio_bitrate.as_str(),
            "-shortest",
            "-movflags",
            "+faststart",
        ]);
    run_into(cmd, output)?;
    tracing::info!("preview rendered");
    Ok(())
}

fn ensure_tools() -> VoxreelResult<()> {
    if !is_ffmpeg_on_path() {
        return Err(VoxreelError::render(
            "ffmpeg is required for rendering, but was not found on PATH",
        ));
    }
    if !is_ffprobe_on_path() {
        return Err(VoxreelError::render(
            "ffprobe is required for rendering, but was not found on PATH",
        ));
    }
    Ok(())
}

/// Append a temporary sibling of `output` to `cmd`, run it, and move the file into
/// place on success. The temporary file is removed on every other path.
fn run_into(mut cmd: Command, output: &Path) -> VoxreelResult<()> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    let tmp = tempfile::Builder::new()
        .prefix(".voxreel-")
        .suffix(".mp4")
        .tempfile_in(parent)
        .with_context(|| format!("create temp output in '{}'", parent.display()))?
        .into_temp_path();

    cmd.arg(&*tmp)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    tracing::debug!(argv = ?cmd, "spawning ffmpeg");

    let out = cmd.output().map_err(|e| {
        VoxreelError::render(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;
    if !out.status.success() {
        return Err(VoxreelError::render(format!(
            "ffmpeg exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    tmp.persist(output).map_err(|e| {
        VoxreelError::render(format!(
            "failed to move rendered file to '{}': {}",
            output.display(),
            e.error
        ))
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/render.rs"]
mod tests;
