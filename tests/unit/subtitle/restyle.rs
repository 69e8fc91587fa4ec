use super::*;
use crate::foundation::time::TimestampPrecision;
use crate::style::spec::StyleSpec;
use crate::subtitle::cue::Cue;
use crate::subtitle::document::{DEFAULT_PLAY_RES, SubtitleDocument};

fn artifact() -> String {
    let style = StyleSpec::default().compile().unwrap();
    let cues = vec![
        Cue {
            start: 0.0,
            end: 1.0,
            text: "hello".into(),
        },
        Cue {
            start: 1.0,
            end: 2.0,
            text: "world".into(),
        },
    ];
    SubtitleDocument::new(&style, cues, DEFAULT_PLAY_RES).to_ass_string(TimestampPrecision::Millis)
}

fn yellow() -> CompiledStyle {
    StyleSpec {
        primary_color: "#FFFF00".into(),
        font_size: 64.0,
        ..StyleSpec::default()
    }
    .compile()
    .unwrap()
}

#[test]
fn only_the_style_line_changes() {
    let before = artifact();
    let style = yellow();
    let (after, previous) = restyle_text(&before, &style.line).unwrap();
    assert_eq!(previous, "Default");

    let b: Vec<&str> = before.lines().collect();
    let a: Vec<&str> = after.lines().collect();
    assert_eq!(a.len(), b.len());
    let changed: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(a[changed[0]], style.line);
    assert!(a[changed[0]].contains("&H0000FFFF"));
}

#[test]
fn restyle_is_idempotent() {
    let style = yellow();
    let (once, _) = restyle_text(&artifact(), &style.line).unwrap();
    let (twice, _) = restyle_text(&once, &style.line).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn crlf_line_endings_are_preserved() {
    let before = artifact().replace('\n', "\r\n");
    let (after, _) = restyle_text(&before, &yellow().line).unwrap();
    assert_eq!(after.matches("\r\n").count(), before.matches("\r\n").count());
    assert!(!after.replace("\r\n", "").contains('\n'));
}

#[test]
fn style_line_outside_styles_section_is_untouched() {
    let text = "[Events]\nStyle: Fake,x\n[V4+ Styles]\nStyle: Real,y\n";
    let (out, previous) = restyle_text(text, "Style: New,z").unwrap();
    assert_eq!(previous, "Real");
    assert_eq!(out, "[Events]\nStyle: Fake,x\n[V4+ Styles]\nStyle: New,z\n");
}

#[test]
fn missing_or_duplicate_style_line_is_rejected() {
    assert!(matches!(
        restyle_text("[V4+ Styles]\nFormat: Name\n", "Style: A").unwrap_err(),
        VoxreelError::Validation(_)
    ));
    assert!(restyle_text("[V4+ Styles]\nStyle: A\nStyle: B\n", "Style: C").is_err());
}

#[test]
fn restyle_file_rewrites_in_place_and_keeps_dialogue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles.ass");
    std::fs::write(&path, artifact()).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    restyle_file(&path, &yellow()).unwrap();
    let after = std::fs::read_to_string(&path).unwrap();
    let dialogue = |t: &str| -> Vec<String> {
        t.lines()
            .filter(|l| l.starts_with("Dialogue:"))
            .map(str::to_owned)
            .collect()
    };
    assert_eq!(dialogue(&before), dialogue(&after));
    assert!(after.contains(&yellow().line));

    restyle_file(&path, &yellow()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), after);
}

#[test]
fn restyle_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = restyle_file(&dir.path().join("subtitles.ass"), &yellow()).unwrap_err();
    assert!(matches!(err, VoxreelError::NotFound { .. }));
}
