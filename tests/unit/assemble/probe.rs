use super::*;

#[test]
fn parses_ffprobe_format_duration() {
    let json = br#"{ "format": { "duration": "120.042000" } }"#;
    assert_eq!(parse_probe_duration(json), Some(120.042));
}

#[test]
fn missing_or_garbage_duration_is_none() {
    assert_eq!(parse_probe_duration(br#"{ "format": {} }"#), None);
    assert_eq!(parse_probe_duration(br#"{}"#), None);
    assert_eq!(parse_probe_duration(br#"{ "format": { "duration": "N/A" } }"#), None);
    assert_eq!(parse_probe_duration(b"not json"), None);
}

#[test]
fn probing_a_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe_duration(&dir.path().join("bg.mp4")).unwrap_err();
    assert!(matches!(err, VoxreelError::NotFound { .. }));
}
