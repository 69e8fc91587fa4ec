use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{VoxreelError, VoxreelResult};

/// Screen anchor for captions, named the way style options spell it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// `bottom-left`
    BottomLeft,
    /// `bottom-center`
    BottomCenter,
    /// `bottom-right`
    BottomRight,
    /// `middle-left`
    MiddleLeft,
    /// `center`
    Center,
    /// `middle-right`
    MiddleRight,
    /// `top-left`
    TopLeft,
    /// `top-center`
    TopCenter,
    /// `top-right`
    TopRight,
}

// Token -> variant. Order follows the ASS numpad layout (1..=9).
const TABLE: [(&str, Alignment); 9] = [
    ("bottom-left", Alignment::BottomLeft),
    ("bottom-center", Alignment::BottomCenter),
    ("bottom-right", Alignment::BottomRight),
    ("middle-left", Alignment::MiddleLeft),
    ("center", Alignment::Center),
    ("middle-right", Alignment::MiddleRight),
    ("top-left", Alignment::TopLeft),
    ("top-center", Alignment::TopCenter),
    ("top-right", Alignment::TopRight),
];

impl Alignment {
    /// All alignments in numpad order.
    pub const ALL: [Alignment; 9] = [
        Alignment::BottomLeft,
        Alignment::BottomCenter,
        Alignment::BottomRight,
        Alignment::MiddleLeft,
        Alignment::Center,
        Alignment::MiddleRight,
        Alignment::TopLeft,
        Alignment::TopCenter,
        Alignment::TopRight,
    ];

    /// ASS `Alignment` field value (numpad layout, 1..=9).
    pub fn ass_code(self) -> u8 {
        match self {
            Alignment::BottomLeft => 1,
            Alignment::BottomCenter => 2,
            Alignment::BottomRight => 3,
            Alignment::MiddleLeft => 4,
            Alignment::Center => 5,
            Alignment::MiddleRight => 6,
            Alignment::TopLeft => 7,
            Alignment::TopCenter => 8,
            Alignment::TopRight => 9,
        }
    }

    /// Human-readable token for this alignment.
    pub fn token(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, a)| *a == self)
            .map(|(t, _)| *t)
            .unwrap_or("center")
    }

    /// Look up a token, reporting failures against `field`.
    pub fn parse_field(field: &'static str, token: &str) -> VoxreelResult<Self> {
        let token = token.trim();
        TABLE
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, a)| *a)
            .ok_or_else(|| {
                VoxreelError::invalid_style(
                    field,
                    format!(
                        "unknown alignment \"{token}\" (expected one of: {})",
                        TABLE.map(|(t, _)| t).join(", ")
                    ),
                )
            })
    }
}

impl FromStr for Alignment {
    type Err = VoxreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("alignment", s)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/alignment.rs"]
mod tests;
