use super::*;

#[test]
fn unset_fades_default_to_three_seconds() {
    let opts = VideoOptions::from_json_str("{}").unwrap();
    assert_eq!(opts, VideoOptions::default());
    assert_eq!(opts.audio_fadein, 3.0);
    assert_eq!(opts.audio_fadeout, 3.0);
    assert_eq!(opts.video_fadein, 3.0);
    assert_eq!(opts.video_fadeout, 3.0);
    assert_eq!(opts.subtitles_position, None);
}

#[test]
fn partial_options_keep_other_defaults() {
    let opts = VideoOptions::from_json_str(r#"{"video_fadeout": 0, "subtitles_position": "top-center"}"#)
        .unwrap();
    assert_eq!(opts.video_fadeout, 0.0);
    assert_eq!(opts.video_fadein, 3.0);
    assert_eq!(opts.validate().unwrap(), Some(Alignment::TopCenter));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = VideoOptions::from_json_str(r#"{"fade": 1}"#).unwrap_err();
    assert!(matches!(err, VoxreelError::Validation(_)));
}

#[test]
fn negative_fade_is_rejected() {
    let opts = VideoOptions {
        audio_fadeout: -1.0,
        ..VideoOptions::default()
    };
    let err = opts.validate().unwrap_err();
    assert!(err.to_string().contains("audio_fadeout"), "{err}");
}

#[test]
fn non_finite_fade_is_rejected() {
    let opts = VideoOptions {
        video_fadein: f64::INFINITY,
        ..VideoOptions::default()
    };
    assert!(opts.validate().is_err());
}

#[test]
fn unknown_position_is_invalid_style() {
    let opts = VideoOptions {
        subtitles_position: Some("upper-middle".into()),
        ..VideoOptions::default()
    };
    assert!(matches!(
        opts.validate().unwrap_err(),
        VoxreelError::InvalidStyle {
            field: "subtitles_position",
            ..
        }
    ));
}
