use super::*;

fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
    TranscriptSegment::new(start, end, text)
}

fn chars(n: usize) -> CueRules {
    CueRules {
        split: SplitMode::Chars {
            max_chars_per_line: n,
        },
        max_duration: None,
    }
}

fn words(n: usize) -> CueRules {
    CueRules {
        split: SplitMode::Words { max_words: n },
        max_duration: None,
    }
}

fn assert_partition(cues: &[Cue], start: f64, end: f64) {
    assert_eq!(cues.first().unwrap().start, start);
    assert_eq!(cues.last().unwrap().end, end);
    for pair in cues.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    let d = (end - start) / cues.len() as f64;
    for c in cues {
        assert!(((c.end - c.start) - d).abs() < 1e-9);
    }
}

#[test]
fn chars_mode_packs_greedily_counting_spaces() {
    // "aaa bbb" is 7 chars, adding " ccc" makes 11.
    let cues = split_segment(&seg(0.0, 3.0, "aaa bbb ccc ddd"), &chars(10));
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["aaa bbb", "ccc ddd"]);
}

#[test]
fn chars_mode_exact_fit_stays_on_one_line() {
    let cues = split_segment(&seg(0.0, 1.0, "aaaa bbbbb"), &chars(10));
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "aaaa bbbbb");
}

#[test]
fn chars_mode_counts_unicode_scalars() {
    let cues = split_segment(&seg(0.0, 1.0, "héllo wörld"), &chars(11));
    assert_eq!(cues.len(), 1);
}

#[test]
fn overlong_word_gets_its_own_cue() {
    let cues = split_segment(&seg(0.0, 3.0, "a supercalifragilistic b"), &chars(5));
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["a", "supercalifragilistic", "b"]);
}

#[test]
fn words_mode_limits_word_count() {
    let cues = split_segment(&seg(10.0, 16.0, "one two three four five six seven"), &words(3));
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["one two three", "four five six", "seven"]);
    assert_partition(&cues, 10.0, 16.0);
    assert_eq!(cues[1].start, 12.0);
}

#[test]
fn cues_split_segment_time_evenly_and_contiguously() {
    let text = "the quick brown fox jumps over the lazy dog again and again";
    let cues = split_segment(&seg(1.25, 8.5, text), &chars(12));
    assert!(cues.len() > 2);
    assert_partition(&cues, 1.25, 8.5);
}

#[test]
fn last_cue_ends_exactly_at_segment_end() {
    let cues = split_segment(&seg(0.1, 0.4, "a b c"), &words(1));
    assert_eq!(cues.len(), 3);
    assert_eq!(cues[2].end, 0.4);
}

#[test]
fn whitespace_is_collapsed() {
    let cues = split_segment(&seg(0.0, 1.0, "  hello \n  world  "), &chars(32));
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "hello world");
}

#[test]
fn empty_segment_text_yields_no_cues() {
    assert!(split_segment(&seg(0.0, 1.0, "   "), &chars(32)).is_empty());
}

#[test]
fn build_cues_keeps_segment_order_and_handles_empty_input() {
    assert!(build_cues(&[], &CueRules::default()).unwrap().is_empty());

    let segs = [seg(0.0, 1.0, "first"), seg(1.0, 2.0, ""), seg(2.5, 3.0, "second")];
    let cues = build_cues(&segs, &CueRules::default()).unwrap();
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn max_duration_splits_longest_cue_until_bound_holds() {
    let rules = CueRules {
        split: SplitMode::Words { max_words: 4 },
        max_duration: Some(1.0),
    };
    // 4 words fit one cue of 4s; the bound forces splits to 4 single-word cues.
    let cues = split_segment(&seg(0.0, 4.0, "a b c d"), &rules);
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["a", "b", "c", "d"]);
    assert_partition(&cues, 0.0, 4.0);
}

#[test]
fn max_duration_splits_first_longest_group_in_half() {
    let rules = CueRules {
        split: SplitMode::Words { max_words: 5 },
        max_duration: Some(1.5),
    };
    // [a b c d e] [f g] -> 2 cues of 1.5s already satisfy the bound at 3s.
    let cues = split_segment(&seg(0.0, 3.0, "a b c d e f g"), &rules);
    assert_eq!(cues.len(), 2);

    // At 6s: [a b c][d e][f g] gives three 2s cues, then [a b][c][d e][f g] gives 1.5s.
    let cues = split_segment(&seg(0.0, 6.0, "a b c d e f g"), &rules);
    let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["a b", "c", "d e", "f g"]);
}

#[test]
fn max_duration_stops_at_single_words() {
    let rules = CueRules {
        split: SplitMode::default(),
        max_duration: Some(0.5),
    };
    let cues = split_segment(&seg(0.0, 10.0, "only two"), &rules);
    assert_eq!(cues.len(), 2);
    assert_partition(&cues, 0.0, 10.0);
}

#[test]
fn zero_budgets_and_bad_duration_are_rejected() {
    assert!(build_cues(&[], &chars(0)).is_err());
    assert!(build_cues(&[], &words(0)).is_err());
    let rules = CueRules {
        split: SplitMode::default(),
        max_duration: Some(0.0),
    };
    assert!(matches!(
        build_cues(&[], &rules).unwrap_err(),
        VoxreelError::Validation(_)
    ));
}

#[test]
fn split_mode_deserializes_tagged() {
    let m: SplitMode = serde_json::from_str(r#"{"mode":"words","max_words":7}"#).unwrap();
    assert_eq!(m, SplitMode::Words { max_words: 7 });
    let m: SplitMode =
        serde_json::from_str(r#"{"mode":"chars","max_chars_per_line":20}"#).unwrap();
    assert_eq!(
        m,
        SplitMode::Chars {
            max_chars_per_line: 20
        }
    );
}
