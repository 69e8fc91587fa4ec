use crate::foundation::error::{VoxreelError, VoxreelResult};

/// A color in ARGB channel order, as written in style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssColor {
    /// Alpha byte. ASS treats `00` as opaque and `FF` as fully transparent.
    pub a: u8,
    /// Red byte.
    pub r: u8,
    /// Green byte.
    pub g: u8,
    /// Blue byte.
    pub b: u8,
}

impl AssColor {
    /// Parse `#RRGGBB` or `#AARRGGBB` (case-insensitive, `#` optional).
    ///
    /// Six-digit input gets the default opaque alpha `00`.
    pub fn parse_hex(field: &'static str, s: &str) -> VoxreelResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        let hex_byte = |pair: &str| {
            u8::from_str_radix(pair, 16).map_err(|_| {
                VoxreelError::invalid_style(field, format!("invalid hex byte \"{pair}\""))
            })
        };

        if !s.is_ascii() {
            return Err(VoxreelError::invalid_style(
                field,
                "color must be #RRGGBB or #AARRGGBB",
            ));
        }
        match s.len() {
            6 => Ok(Self {
                a: 0,
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
            }),
            8 => Ok(Self {
                a: hex_byte(&s[0..2])?,
                r: hex_byte(&s[2..4])?,
                g: hex_byte(&s[4..6])?,
                b: hex_byte(&s[6..8])?,
            }),
            _ => Err(VoxreelError::invalid_style(
                field,
                format!("color \"{s}\" must be #RRGGBB or #AARRGGBB"),
            )),
        }
    }

    /// Encode in ASS `&HAABBGGRR` notation (channels reversed, alpha kept in front).
    pub fn to_ass(self) -> String {
        format!("&H{:02X}{:02X}{:02X}{:02X}", self.a, self.b, self.g, self.r)
    }
}

/// Convert a `#RRGGBB`/`#AARRGGBB` string straight to `&HAABBGGRR`.
pub fn hex_to_ass(field: &'static str, hex: &str) -> VoxreelResult<String> {
    AssColor::parse_hex(field, hex).map(AssColor::to_ass)
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
