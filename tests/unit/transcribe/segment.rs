use super::*;

fn with_words() -> TranscriptSegment {
    TranscriptSegment {
        start: 1.0,
        end: 2.5,
        text: "hi there".into(),
        words: vec![
            WordTiming {
                start: 1.0,
                end: 1.4,
                text: "hi".into(),
            },
            WordTiming {
                start: 1.5,
                end: 2.5,
                text: "there".into(),
            },
        ],
    }
}

#[test]
fn rebased_shifts_segment_and_words() {
    let s = with_words().rebased(30.0);
    assert_eq!((s.start, s.end), (31.0, 32.5));
    assert_eq!((s.words[0].start, s.words[1].end), (31.0, 32.5));
}

#[test]
fn normalized_clamps_negative_and_inverted_spans() {
    let s = TranscriptSegment::new(-0.2, -0.5, "x").normalized();
    assert_eq!(s.start, 0.0);
    assert_eq!(s.end, MIN_SPAN_SECONDS);

    let mut w = with_words();
    w.words[1].end = w.words[1].start;
    let w = w.normalized();
    assert!(w.words[1].end > w.words[1].start);
}

#[test]
fn non_finite_timestamps_are_detected() {
    assert!(with_words().is_finite());
    let mut s = with_words();
    s.words[0].end = f64::NAN;
    assert!(!s.is_finite());
    assert!(!TranscriptSegment::new(f64::INFINITY, 1.0, "x").is_finite());
}

#[test]
fn words_default_to_empty_in_json() {
    let s: TranscriptSegment =
        serde_json::from_str(r#"{"start": 0.0, "end": 1.0, "text": "a"}"#).unwrap();
    assert!(s.words.is_empty());
}
