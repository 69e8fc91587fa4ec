use super::*;
use crate::style::spec::StyleSpec;

fn default_style() -> CompiledStyle {
    StyleSpec::default().compile().unwrap()
}

fn cue(start: f64, end: f64, text: &str) -> Cue {
    Cue {
        start,
        end,
        text: text.to_owned(),
    }
}

#[test]
fn serializes_header_style_and_dialogue_lines() {
    let doc = SubtitleDocument::new(
        &default_style(),
        vec![cue(0.0, 1.5, "Hello world"), cue(1.5, 3725.042, "again")],
        DEFAULT_PLAY_RES,
    );
    let text = doc.to_ass_string(TimestampPrecision::Millis);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "[Script Info]");
    assert!(lines.contains(&"ScriptType: v4.00+"));
    assert!(lines.contains(&"PlayResX: 1080"));
    assert!(lines.contains(&"PlayResY: 1920"));

    let styles = lines.iter().position(|l| *l == "[V4+ Styles]").unwrap();
    assert_eq!(lines[styles + 1], STYLE_FORMAT);
    assert_eq!(lines[styles + 2], default_style().line);
    assert_eq!(lines.iter().filter(|l| l.starts_with("Style:")).count(), 1);

    let events = lines.iter().position(|l| *l == "[Events]").unwrap();
    assert_eq!(lines[events + 1], EVENTS_FORMAT);
    assert_eq!(
        lines[events + 2],
        "Dialogue: 0,0:00:00.000,0:00:01.500,Default,,0,0,0,,Hello world"
    );
    assert_eq!(
        lines[events + 3],
        "Dialogue: 0,0:00:01.500,1:02:05.042,Default,,0,0,0,,again"
    );
    assert!(text.ends_with('\n'));
}

#[test]
fn zero_cues_yields_header_and_style_only() {
    let doc = SubtitleDocument::new(&default_style(), Vec::new(), DEFAULT_PLAY_RES);
    let text = doc.to_ass_string(TimestampPrecision::Millis);
    assert!(text.contains("[Events]"));
    assert!(!text.contains("Dialogue:"));
    assert_eq!(doc.last_cue_end(), None);
}

#[test]
fn centis_precision_uses_two_fraction_digits() {
    let doc = SubtitleDocument::new(&default_style(), vec![cue(0.5, 2.254, "x")], DEFAULT_PLAY_RES);
    let text = doc.to_ass_string(TimestampPrecision::Centis);
    assert!(text.contains("Dialogue: 0,0:00:00.50,0:00:02.25,Default,,0,0,0,,x"));
}

#[test]
fn dialogue_text_is_escaped() {
    assert_eq!(escape_dialogue_text("a\nb"), "a\\Nb");
    assert_eq!(escape_dialogue_text("a\r\nb"), "a\\Nb");
    assert_eq!(escape_dialogue_text("{\\b1}bold"), "(\u{29F5}b1)bold");
    assert_eq!(escape_dialogue_text("  padded  "), "padded");
}

#[test]
fn literal_backslashes_cannot_form_ass_escapes() {
    for raw in ["a\\Nb", "a\\nb", "a\\hb", "trailing\\"] {
        let escaped = escape_dialogue_text(raw);
        assert!(!escaped.contains('\\'), "{raw:?} -> {escaped:?}");
    }
    assert_eq!(escape_dialogue_text("say \\N now"), "say \u{29F5}N now");

    let doc = SubtitleDocument::new(
        &default_style(),
        vec![cue(0.0, 1.0, "c:\\new")],
        DEFAULT_PLAY_RES,
    );
    let text = doc.to_ass_string(TimestampPrecision::Millis);
    assert!(text.contains(",,c:\u{29F5}new"));
    let parsed = SubtitleDocument::parse(&text).unwrap();
    assert_eq!(parsed.cues[0].text, "c:\u{29F5}new");
}

#[test]
fn parse_recovers_style_and_cues() {
    let doc = SubtitleDocument::new(
        &default_style(),
        vec![cue(0.0, 1.25, "one, two"), cue(1.25, 2.5, "line\nbreak")],
        (720, 1280),
    );
    let parsed = SubtitleDocument::parse(&doc.to_ass_string(TimestampPrecision::Millis)).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(parsed.last_cue_end(), Some(2.5));
}

#[test]
fn parse_accepts_centiseconds_and_crlf() {
    let text = "[Script Info]\r\nPlayResX: 1080\r\n\r\n[V4+ Styles]\r\nFormat: Name\r\nStyle: Custom,Arial,20\r\n\r\n[Events]\r\nFormat: Layer\r\nDialogue: 0,0:00:01.50,0:00:18.40,Custom,,0,0,0,,hi\r\n";
    let doc = SubtitleDocument::parse(text).unwrap();
    assert_eq!(doc.style_name, "Custom");
    assert_eq!(doc.style_line, "Style: Custom,Arial,20");
    assert_eq!(doc.cues.len(), 1);
    assert!((doc.cues[0].end - 18.4).abs() < 1e-9);
}

#[test]
fn parse_rejects_missing_or_duplicate_style() {
    let missing = "[V4+ Styles]\nFormat: Name\n\n[Events]\n";
    assert!(matches!(
        SubtitleDocument::parse(missing).unwrap_err(),
        VoxreelError::Validation(_)
    ));

    let dup = "[V4+ Styles]\nStyle: A,x\nStyle: B,y\n";
    assert!(SubtitleDocument::parse(dup).is_err());
}

#[test]
fn parse_rejects_malformed_dialogue() {
    let text = "[V4+ Styles]\nStyle: A,x\n[Events]\nDialogue: 0,bad,0:00:01.000,A,,0,0,0,,t\n";
    let err = SubtitleDocument::parse(text).unwrap_err();
    assert!(err.to_string().contains("line 4"), "{err}");
}

#[test]
fn write_then_read_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles.ass");
    let doc = SubtitleDocument::new(&default_style(), vec![cue(0.0, 1.0, "hi")], DEFAULT_PLAY_RES);
    doc.write(&path, TimestampPrecision::Millis).unwrap();
    assert_eq!(SubtitleDocument::read(&path).unwrap(), doc);
}

#[test]
fn read_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = SubtitleDocument::read(&dir.path().join("nope.ass")).unwrap_err();
    assert!(matches!(err, VoxreelError::NotFound { .. }));
}
