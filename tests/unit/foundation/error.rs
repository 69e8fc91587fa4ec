use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VoxreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VoxreelError::audio_decode("x")
            .to_string()
            .contains("audio decode error:")
    );
    assert!(
        VoxreelError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        VoxreelError::invalid_style("alignment", "x")
            .to_string()
            .contains("invalid style error: field 'alignment'")
    );
}

#[test]
fn transcription_error_mentions_chunk_index() {
    let err = VoxreelError::transcription(2, "model crashed");
    assert_eq!(err.chunk_index(), Some(2));
    assert_eq!(
        err.to_string(),
        "transcription error (chunk 2): model crashed"
    );

    let err = VoxreelError::transcription_job("deadline exceeded");
    assert_eq!(err.chunk_index(), None);
    assert_eq!(err.to_string(), "transcription error: deadline exceeded");
}

#[test]
fn path_errors_show_the_path() {
    let err = VoxreelError::font_not_found("/fonts/Missing.ttf");
    assert!(err.to_string().contains("/fonts/Missing.ttf"));

    let err = VoxreelError::not_found("/uploads/job/subtitles.ass");
    assert!(err.to_string().contains("subtitles.ass"));
}

#[test]
fn insufficient_duration_reports_both_sides() {
    let err = VoxreelError::InsufficientSourceDuration {
        available: 10.0,
        required: 18.4,
    };
    let msg = err.to_string();
    assert!(msg.contains("10.000s"));
    assert!(msg.contains("18.400s"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VoxreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
