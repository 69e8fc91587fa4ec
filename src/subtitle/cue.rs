use serde::{Deserialize, Serialize};

use crate::foundation::error::{VoxreelError, VoxreelResult};
use crate::transcribe::segment::TranscriptSegment;

/// Default line budget in characters.
pub const DEFAULT_MAX_CHARS_PER_LINE: usize = 32;
/// Default line budget in words.
pub const DEFAULT_MAX_WORDS: usize = 5;

/// One timed caption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Caption text, words joined by single spaces.
    pub text: String,
}

/// How words are packed into cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitMode {
    /// Limit each cue to `max_chars_per_line` characters, counting single spaces.
    Chars {
        /// Character budget per cue.
        max_chars_per_line: usize,
    },
    /// Limit each cue to `max_words` words.
    Words {
        /// Word budget per cue.
        max_words: usize,
    },
}

impl Default for SplitMode {
    fn default() -> Self {
        Self::Chars {
            max_chars_per_line: DEFAULT_MAX_CHARS_PER_LINE,
        }
    }
}

/// Splitting rules applied to every segment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CueRules {
    /// Packing mode.
    pub split: SplitMode,
    /// Upper bound on a single cue's duration, in seconds.
    pub max_duration: Option<f64>,
}

impl CueRules {
    /// Reject zero budgets and non-positive duration bounds.
    pub fn validate(&self) -> VoxreelResult<()> {
        match self.split {
            SplitMode::Chars {
                max_chars_per_line: 0,
            } => {
                return Err(VoxreelError::validation(
                    "max_chars_per_line must be > 0",
                ));
            }
            SplitMode::Words { max_words: 0 } => {
                return Err(VoxreelError::validation("max_words must be > 0"));
            }
            _ => {}
        }
        if let Some(d) = self.max_duration
            && !(d.is_finite() && d > 0.0)
        {
            return Err(VoxreelError::validation(format!(
                "max_duration must be finite and > 0, got {d}"
            )));
        }
        Ok(())
    }
}

/// Turn merged, globally-timed segments into cues, preserving order.
pub fn build_cues(segments: &[TranscriptSegment], rules: &CueRules) -> VoxreelResult<Vec<Cue>> {
    rules.validate()?;
    let mut out = Vec::new();
    for seg in segments {
        out.extend(split_segment(seg, rules));
    }
    Ok(out)
}

/// Split one segment into cues that evenly partition `[start, end)`.
///
/// Cue `i` of `n` spans `[start + i*d, start + (i+1)*d)` with `d = (end - start) / n`; the
/// last cue ends exactly at `end`.
pub fn split_segment(seg: &TranscriptSegment, rules: &CueRules) -> Vec<Cue> {
    let words: Vec<&str> = seg.text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut groups = pack_words(&words, rules.split);
    let span = seg.end - seg.start;
    if let Some(max) = rules.max_duration {
        while span / groups.len() as f64 > max {
            if !split_longest(&mut groups) {
                break;
            }
        }
    }

    let n = groups.len();
    let d = span / n as f64;
    groups
        .into_iter()
        .enumerate()
        .map(|(i, g)| Cue {
            start: seg.start + i as f64 * d,
            end: if i + 1 == n {
                seg.end
            } else {
                seg.start + (i + 1) as f64 * d
            },
            text: g.join(" "),
        })
        .collect()
}

/// Greedy packing: a word joins the current line unless that would exceed the budget.
///
/// A word that alone exceeds the character budget still gets a line of its own.
pub(crate) fn pack_words<'a>(words: &[&'a str], mode: SplitMode) -> Vec<Vec<&'a str>> {
    let mut groups: Vec<Vec<&'a str>> = Vec::new();
    let mut line: Vec<&'a str> = Vec::new();
    let mut line_chars = 0usize;

    for &word in words {
        let word_chars = word.chars().count();
        let fits = match mode {
            SplitMode::Chars { max_chars_per_line } => {
                line_chars + 1 + word_chars <= max_chars_per_line
            }
            SplitMode::Words { max_words } => line.len() < max_words,
        };
        if !line.is_empty() && !fits {
            groups.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        line_chars += if line.is_empty() {
            word_chars
        } else {
            1 + word_chars
        };
        line.push(word);
    }
    if !line.is_empty() {
        groups.push(line);
    }
    groups
}

/// Split the group with the most words (first on ties) in half.
///
/// Returns `false` when every group is a single word.
fn split_longest(groups: &mut Vec<Vec<&str>>) -> bool {
    let mut best = 0;
    for (i, g) in groups.iter().enumerate() {
        if g.len() > groups[best].len() {
            best = i;
        }
    }
    let len = groups[best].len();
    if len < 2 {
        return false;
    }
    let tail = groups[best].split_off(len.div_ceil(2));
    groups.insert(best + 1, tail);
    true
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/cue.rs"]
mod tests;
