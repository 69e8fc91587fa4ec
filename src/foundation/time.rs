use crate::foundation::error::{VoxreelError, VoxreelResult};

/// Fractional precision of ASS timestamps written into subtitle artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPrecision {
    /// `H:MM:SS.mmm`.
    #[default]
    Millis,
    /// `H:MM:SS.cc`, the precision libass reads natively.
    Centis,
}

/// Half-open time span `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeSpan {
    /// Create a validated span with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> VoxreelResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(VoxreelError::validation("time span bounds must be finite"));
        }
        if start > end {
            return Err(VoxreelError::validation("time span start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Span length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Shift both bounds by `offset` seconds.
    pub fn shift(self, offset: f64) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Format seconds as an ASS timestamp (`H:MM:SS.mmm` or `H:MM:SS.cc`).
///
/// Hours are not padded; negative input formats as zero.
pub fn format_ass_timestamp(seconds: f64, precision: TimestampPrecision) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };
    let (units_per_sec, width) = match precision {
        TimestampPrecision::Millis => (1000u64, 3usize),
        TimestampPrecision::Centis => (100u64, 2usize),
    };
    let total = (seconds * units_per_sec as f64).round() as u64;
    let frac = total % units_per_sec;
    let total_sec = total / units_per_sec;
    let s = total_sec % 60;
    let total_min = total_sec / 60;
    let m = total_min % 60;
    let h = total_min / 60;
    format!("{h}:{m:02}:{s:02}.{frac:0width$}")
}

/// Parse an ASS timestamp with any number of fractional digits into seconds.
pub fn parse_ass_timestamp(s: &str) -> VoxreelResult<f64> {
    let bad = || VoxreelError::validation(format!("malformed ASS timestamp \"{s}\""));

    let mut parts = s.trim().split(':');
    let (Some(h), Some(m), Some(rest), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    let (sec, frac) = rest.split_once('.').unwrap_or((rest, ""));

    let h: u64 = h.parse().map_err(|_| bad())?;
    let m: u64 = m.parse().map_err(|_| bad())?;
    let sec: u64 = sec.parse().map_err(|_| bad())?;
    if m >= 60 || sec >= 60 {
        return Err(bad());
    }

    let frac_secs = if frac.is_empty() {
        0.0
    } else {
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let digits: u64 = frac.parse().map_err(|_| bad())?;
        digits as f64 / 10f64.powi(frac.len() as i32)
    };

    Ok((h * 3600 + m * 60 + sec) as f64 + frac_secs)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
