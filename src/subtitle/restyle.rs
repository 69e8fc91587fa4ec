use std::path::Path;

use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::foundation::fs::write_atomic;
use crate::style::spec::CompiledStyle;
use crate::subtitle::document::{STYLES_HEADER, is_style_line, style_name_of};

/// Replace the `Style:` line of the artifact at `path` with `style`, leaving every other
/// byte as it was. Inference is not re-run.
#[tracing::instrument(skip(style), fields(style = %style.name))]
pub fn restyle_file(path: &Path, style: &CompiledStyle) -> VoxreelResult<()> {
    if !path.is_file() {
        return Err(VoxreelError::not_found(path));
    }
    let text = std::fs::read_to_string(path)?;
    let (restyled, previous) = restyle_text(&text, &style.line)?;
    if previous != style.name {
        tracing::warn!(
            previous = %previous,
            "style renamed; dialogue lines still reference the previous name"
        );
    }
    if restyled == text {
        tracing::debug!("style unchanged");
        return Ok(());
    }
    write_atomic(path, restyled.as_bytes())?;
    tracing::info!(path = %path.display(), "subtitle artifact restyled");
    Ok(())
}

/// Splice `style_line` over the single `Style:` line under `[V4+ Styles]`.
///
/// Returns the new text and the name of the style that was replaced. Line terminators,
/// including the one after the replaced line, are preserved.
pub fn restyle_text(text: &str, style_line: &str) -> VoxreelResult<(String, String)> {
    let mut out = String::with_capacity(text.len() + style_line.len());
    let mut in_styles = false;
    let mut previous: Option<String> = None;

    for raw in text.split_inclusive('\n') {
        let body = raw.trim_end_matches(['\r', '\n']);
        let ending = &raw[body.len()..];
        let trimmed = body.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_styles = trimmed == STYLES_HEADER;
        } else if in_styles && is_style_line(body) {
            if previous.is_some() {
                return Err(VoxreelError::validation(
                    "subtitle artifact has more than one style line",
                ));
            }
            previous = Some(style_name_of(body).to_owned());
            out.push_str(style_line);
            out.push_str(ending);
            continue;
        }
        out.push_str(raw);
    }

    let previous =
        previous.ok_or_else(|| VoxreelError::validation("subtitle artifact has no style line"))?;
    Ok((out, previous))
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/restyle.rs"]
mod tests;
