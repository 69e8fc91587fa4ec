use std::fmt::Write as _;
use std::path::Path;

use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::foundation::fs::write_atomic;
use crate::foundation::time::{TimestampPrecision, format_ass_timestamp, parse_ass_timestamp};
use crate::style::spec::{CompiledStyle, STYLE_FORMAT};
use crate::subtitle::cue::Cue;

/// Default script resolution, portrait 1080x1920.
pub const DEFAULT_PLAY_RES: (u32, u32) = (1080, 1920);

/// `Format:` line of the `[Events]` section.
pub const EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

pub(crate) const SCRIPT_INFO_HEADER: &str = "[Script Info]";
pub(crate) const STYLES_HEADER: &str = "[V4+ Styles]";
pub(crate) const EVENTS_HEADER: &str = "[Events]";

/// In-memory form of an ASS subtitle artifact: one style, ordered cues.
#[derive(Clone, Debug, PartialEq)]
pub struct SubtitleDocument {
    /// `PlayResX` of the script.
    pub play_res_x: u32,
    /// `PlayResY` of the script.
    pub play_res_y: u32,
    /// Full `Style: ...` line.
    pub style_line: String,
    /// Style name referenced by every dialogue line.
    pub style_name: String,
    /// Cues in timeline order.
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    /// Document for `cues` rendered with `style`.
    pub fn new(style: &CompiledStyle, cues: Vec<Cue>, play_res: (u32, u32)) -> Self {
        Self {
            play_res_x: play_res.0,
            play_res_y: play_res.1,
            style_line: style.line.clone(),
            style_name: style.name.clone(),
            cues,
        }
    }

    /// End of the last cue, the duration a render has to cover.
    pub fn last_cue_end(&self) -> Option<f64> {
        self.cues.iter().map(|c| c.end).reduce(f64::max)
    }

    /// Serialize to ASS text with `\n` line endings.
    pub fn to_ass_string(&self, precision: TimestampPrecision) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{SCRIPT_INFO_HEADER}");
        let _ = writeln!(out, "; Script generated by voxreel");
        let _ = writeln!(out, "ScriptType: v4.00+");
        let _ = writeln!(out, "PlayResX: {}", self.play_res_x);
        let _ = writeln!(out, "PlayResY: {}", self.play_res_y);
        let _ = writeln!(out, "WrapStyle: 0");
        let _ = writeln!(out, "ScaledBorderAndShadow: yes");
        let _ = writeln!(out);
        let _ = writeln!(out, "{STYLES_HEADER}");
        let _ = writeln!(out, "{STYLE_FORMAT}");
        let _ = writeln!(out, "{}", self.style_line);
        let _ = writeln!(out);
        let _ = writeln!(out, "{EVENTS_HEADER}");
        let _ = writeln!(out, "{EVENTS_FORMAT}");
        for cue in &self.cues {
            let _ = writeln!(
                out,
                "Dialogue: 0,{},{},{},,0,0,0,,{}",
                format_ass_timestamp(cue.start, precision),
                format_ass_timestamp(cue.end, precision),
                self.style_name,
                escape_dialogue_text(&cue.text)
            );
        }
        out
    }

    /// Write the artifact atomically to `path`.
    #[tracing::instrument(skip(self), fields(cues = self.cues.len()))]
    pub fn write(&self, path: &Path, precision: TimestampPrecision) -> VoxreelResult<()> {
        write_atomic(path, self.to_ass_string(precision).as_bytes())?;
        tracing::debug!(path = %path.display(), "subtitle artifact written");
        Ok(())
    }

    /// Read and parse the artifact at `path`.
    pub fn read(path: &Path) -> VoxreelResult<Self> {
        if !path.is_file() {
            return Err(VoxreelError::not_found(path));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse ASS text produced by [`SubtitleDocument::to_ass_string`] (either precision).
    ///
    /// Requires exactly one `Style:` line under `[V4+ Styles]`.
    pub fn parse(text: &str) -> VoxreelResult<Self> {
        let (mut play_res_x, mut play_res_y) = DEFAULT_PLAY_RES;
        let mut style_line: Option<String> = None;
        let mut cues = Vec::new();
        let mut section = "";

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.starts_with('[') && line.ends_with(']') {
                section = match line {
                    SCRIPT_INFO_HEADER => SCRIPT_INFO_HEADER,
                    STYLES_HEADER => STYLES_HEADER,
                    EVENTS_HEADER => EVENTS_HEADER,
                    _ => "",
                };
                continue;
            }
            match section {
                SCRIPT_INFO_HEADER => {
                    if let Some(v) = line.strip_prefix("PlayResX:") {
                        play_res_x = parse_res("PlayResX", v)?;
                    } else if let Some(v) = line.strip_prefix("PlayResY:") {
                        play_res_y = parse_res("PlayResY", v)?;
                    }
                }
                STYLES_HEADER if is_style_line(line) => {
                    if style_line.is_some() {
                        return Err(VoxreelError::validation(format!(
                            "line {}: subtitle artifact has more than one style line",
                            lineno + 1
                        )));
                    }
                    style_line = Some(line.to_owned());
                }
                EVENTS_HEADER => {
                    if let Some(rest) = line.strip_prefix("Dialogue:") {
                        cues.push(parse_dialogue(rest).map_err(|e| {
                            VoxreelError::validation(format!("line {}: {e}", lineno + 1))
                        })?);
                    }
                }
                _ => {}
            }
        }

        let style_line = style_line
            .ok_or_else(|| VoxreelError::validation("subtitle artifact has no style line"))?;
        let style_name = style_name_of(&style_line).to_owned();
        Ok(Self {
            play_res_x,
            play_res_y,
            style_line,
            style_name,
            cues,
        })
    }
}

pub(crate) fn is_style_line(line: &str) -> bool {
    line.trim_start().starts_with("Style:")
}

pub(crate) fn style_name_of(style_line: &str) -> &str {
    style_line
        .trim_start()
        .trim_start_matches("Style:")
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
}

fn parse_res(key: &str, v: &str) -> VoxreelResult<u32> {
    v.trim()
        .parse()
        .map_err(|_| VoxreelError::validation(format!("{key} is not an integer: \"{}\"", v.trim())))
}

fn parse_dialogue(rest: &str) -> Result<Cue, String> {
    let fields: Vec<&str> = rest.trim_start().splitn(10, ',').collect();
    if fields.len() != 10 {
        return Err(format!(
            "dialogue line has {} fields, expected 10",
            fields.len()
        ));
    }
    let start = parse_ass_timestamp(fields[1]).map_err(|e| e.to_string())?;
    let end = parse_ass_timestamp(fields[2]).map_err(|e| e.to_string())?;
    Ok(Cue {
        start,
        end,
        text: unescape_dialogue_text(fields[9]),
    })
}

const BACKSLASH_STANDIN: char = '\u{29F5}';

/// Make cue text safe for a dialogue line.
///
/// Newlines become `\N`; braces become parentheses so text never opens an override block.
/// A literal backslash becomes `⧵` (U+29F5) so text never forms `\N`, `\n` or `\h`.
pub fn escape_dialogue_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => out.push_str("\\N"),
            '{' => out.push('('),
            '}' => out.push(')'),
            '\\' => out.push(BACKSLASH_STANDIN),
            c => out.push(c),
        }
    }
    out
}

fn unescape_dialogue_text(text: &str) -> String {
    text.replace("\\N", "\n")
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/document.rs"]
mod tests;
