use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::style::alignment::Alignment;
use crate::style::color::hex_to_ass;

/// `Format:` line of the `[V4+ Styles]` section. Field order of compiled style lines
/// must match it exactly.
pub const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Structured caption style options.
///
/// Missing keys take the defaults below; unknown keys are rejected at deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSpec {
    /// Style name referenced by dialogue lines.
    pub name: String,
    /// Font file name inside the configured fonts directory.
    pub font: String,
    /// Font family written into the style line. Defaults to the font file stem.
    pub font_name: Option<String>,
    /// Font size in script pixels.
    pub font_size: f64,
    /// Fill color (`#RRGGBB` or `#AARRGGBB`).
    pub primary_color: String,
    /// Karaoke secondary color.
    pub secondary_color: String,
    /// Outline color.
    pub outline_color: String,
    /// Shadow/box color.
    pub back_color: String,
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
    /// Strike-out flag.
    pub strikeout: bool,
    /// Horizontal scale in percent.
    pub scale_x: f64,
    /// Vertical scale in percent.
    pub scale_y: f64,
    /// Extra letter spacing in pixels.
    pub spacing: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// `1` = outline + drop shadow, `3` = opaque box.
    pub border_style: u8,
    /// Outline width in pixels.
    pub outline: f64,
    /// Shadow depth in pixels.
    pub shadow: f64,
    /// Alignment token such as `bottom-center` or `top-left`.
    pub alignment: String,
    /// Left margin in pixels.
    pub margin_l: u32,
    /// Right margin in pixels.
    pub margin_r: u32,
    /// Vertical margin in pixels.
    pub margin_v: u32,
    /// Font encoding (charset) code.
    pub encoding: u32,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            name: "Default".to_owned(),
            font: "Montserrat-Bold.ttf".to_owned(),
            font_name: None,
            font_size: 48.0,
            primary_color: "#FFFFFF".to_owned(),
            secondary_color: "#FF0000".to_owned(),
            outline_color: "#000000".to_owned(),
            back_color: "#000000".to_owned(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 0.0,
            alignment: "bottom-center".to_owned(),
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

/// Output of [`StyleSpec::compile`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledStyle {
    /// Complete `Style: ...` line, without a trailing newline.
    pub line: String,
    /// Style name referenced by dialogue lines.
    pub name: String,
    /// Font family written into the line.
    pub font_name: String,
    /// Font file name to resolve inside the fonts directory.
    pub font_file: String,
    /// Parsed alignment.
    pub alignment: Alignment,
}

impl StyleSpec {
    /// Load a style from a JSON file.
    pub fn from_path(path: &Path) -> VoxreelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VoxreelError::validation(format!("failed to read style '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a style from JSON text.
    pub fn from_json_str(text: &str) -> VoxreelResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| VoxreelError::validation(format!("invalid style json: {e}")))
    }

    /// Compile into the ASS style line.
    ///
    /// Pure: the same spec always yields the same line. Every invalid attribute fails
    /// with [`VoxreelError::InvalidStyle`] naming the field.
    pub fn compile(&self) -> VoxreelResult<CompiledStyle> {
        let name = self.name.trim();
        if name.is_empty() || name.contains(',') || has_control(name) {
            return Err(VoxreelError::invalid_style(
                "name",
                "style name must be non-empty and contain no commas or control characters",
            ));
        }

        let font_file = self.font.trim();
        if font_file.is_empty()
            || has_control(font_file)
            || Path::new(font_file).file_name().and_then(|f| f.to_str()) != Some(font_file)
        {
            return Err(VoxreelError::invalid_style(
                "font",
                format!("font must be a bare file name, got \"{}\"", self.font),
            ));
        }
        let font_name = match self.font_name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_owned(),
            Some(_) => {
                return Err(VoxreelError::invalid_style(
                    "font_name",
                    "font_name must not be blank",
                ));
            }
            None => Path::new(font_file)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(font_file)
                .to_owned(),
        };
        if font_name.contains(',') || has_control(&font_name) {
            return Err(VoxreelError::invalid_style(
                "font_name",
                "font family must not contain commas or control characters",
            ));
        }

        positive("font_size", self.font_size)?;
        positive("scale_x", self.scale_x)?;
        positive("scale_y", self.scale_y)?;
        finite("spacing", self.spacing)?;
        finite("angle", self.angle)?;
        non_negative("outline", self.outline)?;
        non_negative("shadow", self.shadow)?;
        if !matches!(self.border_style, 1 | 3) {
            return Err(VoxreelError::invalid_style(
                "border_style",
                format!("border_style must be 1 or 3, got {}", self.border_style),
            ));
        }

        let primary = hex_to_ass("primary_color", &self.primary_color)?;
        let secondary = hex_to_ass("secondary_color", &self.secondary_color)?;
        let outline_c = hex_to_ass("outline_color", &self.outline_color)?;
        let back = hex_to_ass("back_color", &self.back_color)?;
        let alignment = Alignment::parse_field("alignment", &self.alignment)?;

        let line = format!(
            "Style: {name},{font_name},{},{primary},{secondary},{outline_c},{back},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.font_size,
            flag(self.bold),
            flag(self.italic),
            flag(self.underline),
            flag(self.strikeout),
            self.scale_x,
            self.scale_y,
            self.spacing,
            self.angle,
            self.border_style,
            self.outline,
            self.shadow,
            alignment.ass_code(),
            self.margin_l,
            self.margin_r,
            self.margin_v,
            self.encoding,
        );

        Ok(CompiledStyle {
            line,
            name: name.to_owned(),
            font_name,
            font_file: font_file.to_owned(),
            alignment,
        })
    }

    /// Path of the configured font file inside `fonts_dir`.
    pub fn font_path(&self, fonts_dir: &Path) -> PathBuf {
        fonts_dir.join(self.font.trim())
    }
}

fn has_control(s: &str) -> bool {
    s.chars().any(char::is_control)
}

fn flag(v: bool) -> i8 {
    if v { -1 } else { 0 }
}

fn finite(field: &'static str, v: f64) -> VoxreelResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(VoxreelError::invalid_style(field, "must be a finite number"))
    }
}

fn positive(field: &'static str, v: f64) -> VoxreelResult<()> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(VoxreelError::invalid_style(field, format!("must be > 0, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> VoxreelResult<()> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(VoxreelError::invalid_style(field, format!("must be >= 0, got {v}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/spec.rs"]
mod tests;
