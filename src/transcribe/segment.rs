use serde::{Deserialize, Serialize};

/// Smallest span given to a segment or word whose reported end is not after its start.
pub const MIN_SPAN_SECONDS: f64 = 0.001;

/// Timing of a single recognized word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Word text without surrounding whitespace.
    pub text: String,
}

/// One recognized stretch of speech.
///
/// Chunk-relative when it leaves a [`Transcriber`](crate::Transcriber), global once the
/// pool has re-based it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start in seconds.
    pub start: f64,
    /// End in seconds, `> start`.
    pub end: f64,
    /// Recognized text.
    pub text: String,
    /// Optional word-level timings, on the same clock as `start`/`end`.
    #[serde(default)]
    pub words: Vec<WordTiming>,
}

impl TranscriptSegment {
    /// Segment without word timings.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: Vec::new(),
        }
    }

    /// Shift the segment and its words by `offset` seconds.
    pub fn rebased(mut self, offset: f64) -> Self {
        self.start += offset;
        self.end += offset;
        for w in &mut self.words {
            w.start += offset;
            w.end += offset;
        }
        self
    }

    /// `true` when every timestamp is finite.
    pub fn is_finite(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self
                .words
                .iter()
                .all(|w| w.start.is_finite() && w.end.is_finite())
    }

    /// Clamp negative starts to zero and force `end > start`.
    pub(crate) fn normalized(mut self) -> Self {
        self.start = self.start.max(0.0);
        if self.end <= self.start {
            self.end = self.start + MIN_SPAN_SECONDS;
        }
        for w in &mut self.words {
            w.start = w.start.max(0.0);
            if w.end <= w.start {
                w.end = w.start + MIN_SPAN_SECONDS;
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transcribe/segment.rs"]
mod tests;
