use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{VoxreelError, VoxreelResult};

/// Sample rate every chunk is decoded to before inference.
pub const TRANSCRIBE_SAMPLE_RATE: u32 = 16_000;

#[derive(Clone, Debug, PartialEq)]
/// Decoded mono floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Mono `f32` samples in `[-1, 1]`.
    pub samples: Vec<f32>,
}

impl AudioPcm {
    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode an audio file to mono PCM at [`TRANSCRIBE_SAMPLE_RATE`].
///
/// WAV files already at that rate are read in-process; everything else goes through the
/// system `ffmpeg`. Any failure is an [`VoxreelError::AudioDecode`].
#[tracing::instrument]
pub fn decode_audio_mono(path: &Path) -> VoxreelResult<AudioPcm> {
    if !path.is_file() {
        return Err(VoxreelError::audio_decode(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }

    if is_wav_path(path) {
        let reader = hound::WavReader::open(path).map_err(|e| {
            VoxreelError::audio_decode(format!("failed to open wav '{}': {e}", path.display()))
        })?;
        if reader.spec().sample_rate == TRANSCRIBE_SAMPLE_RATE {
            return read_wav_mono(reader).map_err(|e| {
                VoxreelError::audio_decode(format!(
                    "failed to read wav '{}': {e}",
                    path.display()
                ))
            });
        }
        tracing::debug!(
            sample_rate = reader.spec().sample_rate,
            "wav needs resampling, decoding through ffmpeg"
        );
    }

    decode_with_ffmpeg(path, TRANSCRIBE_SAMPLE_RATE)
}

/// Read a WAV stream and down-mix it to mono by averaging channels.
pub(crate) fn read_wav_mono<R: std::io::Read>(
    reader: hound::WavReader<R>,
) -> Result<AudioPcm, hound::Error> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(AudioPcm {
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Write mono PCM as a 32-bit float WAV file.
pub(crate) fn write_wav_mono(path: &Path, sample_rate: u32, samples: &[f32]) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create wav '{}'", path.display()))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize wav '{}'", path.display()))?;
    Ok(())
}

/// Store `src` at `dst` as a WAV file at its original rate.
///
/// Readable WAV input is copied as-is; anything else is converted by `ffmpeg` to 16-bit PCM.
#[tracing::instrument]
pub fn import_as_wav(src: &Path, dst: &Path) -> VoxreelResult<()> {
    if !src.is_file() {
        return Err(VoxreelError::audio_decode(format!(
            "audio file '{}' does not exist",
            src.display()
        )));
    }
    if is_wav_path(src) {
        hound::WavReader::open(src).map_err(|e| {
            VoxreelError::audio_decode(format!("failed to open wav '{}': {e}", src.display()))
        })?;
        std::fs::copy(src, dst)
            .with_context(|| format!("failed to copy '{}' to '{}'", src.display(), dst.display()))?;
        return Ok(());
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-i"])
        .arg(src)
        .args(["-vn", "-acodec", "pcm_s16le", "-f", "wav"])
        .arg(dst)
        .output()
        .map_err(|e| {
            VoxreelError::audio_decode(format!("failed to run ffmpeg for audio import: {e}"))
        })?;
    if !out.status.success() {
        let _ = std::fs::remove_file(dst);
        return Err(VoxreelError::audio_decode(format!(
            "ffmpeg audio import failed for '{}': {}",
            src.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

fn is_wav_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

fn decode_with_ffmpeg(path: &Path, sample_rate: u32) -> VoxreelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            VoxreelError::audio_decode(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(VoxreelError::audio_decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(VoxreelError::audio_decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let samples = out
        .stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        samples,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/decode.rs"]
mod tests;
