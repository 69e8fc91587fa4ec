use super::*;

fn write_i16_stereo(path: &Path, frames: &[(i16, i16)]) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: TRANSCRIBE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for &(l, r) in frames {
        w.write_sample(l).unwrap();
        w.write_sample(r).unwrap();
    }
    w.finalize().unwrap();
}

#[test]
fn stereo_int_wav_is_downmixed_and_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speech.wav");
    write_i16_stereo(&path, &[(16384, 0), (-16384, -16384), (0, 0)]);

    let pcm = decode_audio_mono(&path).unwrap();
    assert_eq!(pcm.sample_rate, TRANSCRIBE_SAMPLE_RATE);
    assert_eq!(pcm.samples.len(), 3);
    assert!((pcm.samples[0] - 0.25).abs() < 1e-6);
    assert!((pcm.samples[1] + 0.5).abs() < 1e-6);
    assert_eq!(pcm.samples[2], 0.0);
}

#[test]
fn float_wav_roundtrips_through_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chunk.wav");
    write_wav_mono(&path, TRANSCRIBE_SAMPLE_RATE, &[0.5, -0.25, 1.0]).unwrap();

    let pcm = decode_audio_mono(&path).unwrap();
    assert_eq!(pcm.samples, vec![0.5, -0.25, 1.0]);
    assert!((pcm.duration_secs() - 3.0 / 16_000.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = decode_audio_mono(&dir.path().join("nope.wav")).unwrap_err();
    assert!(matches!(err, VoxreelError::AudioDecode(_)), "{err}");
}

#[test]
fn corrupt_wav_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.wav");
    std::fs::write(&path, b"RIFF\x00\x00\x00\x00WAVEgarbage").unwrap();

    let err = decode_audio_mono(&path).unwrap_err();
    assert!(matches!(err, VoxreelError::AudioDecode(_)), "{err}");
}

#[test]
fn zero_rate_pcm_has_zero_duration() {
    let pcm = AudioPcm {
        sample_rate: 0,
        samples: vec![0.0; 10],
    };
    assert_eq!(pcm.duration_secs(), 0.0);
}

#[test]
fn import_copies_wav_and_rejects_corrupt_input() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("narration.wav");
    write_wav_mono(&src, 44_100, &[0.1, 0.2]).unwrap();
    let dst = dir.path().join("speech.wav");
    import_as_wav(&src, &dst).unwrap();
    assert_eq!(std::fs::read(&src).unwrap(), std::fs::read(&dst).unwrap());

    let broken = dir.path().join("broken.wav");
    std::fs::write(&broken, b"not a wav").unwrap();
    let err = import_as_wav(&broken, &dir.path().join("other.wav")).unwrap_err();
    assert!(matches!(err, VoxreelError::AudioDecode(_)), "{err}");
}
