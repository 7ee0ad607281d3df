//! Audio normalization to fixed-rate mono 16-bit WAV.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use super::{read_wav_mono, resample_mono};
use crate::error::{FieldkeyError, Result};

/// How often a running ffmpeg child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `output` now holds the normalized audio.
    Converted,
    /// `input` already has the target format; `output` was not written.
    Unchanged,
}

/// Turns arbitrary input audio into mono WAV at `target_rate`.
pub trait AudioConverter: Send + Sync {
    fn name(&self) -> &str;

    fn convert(&self, input: &Path, output: &Path, target_rate: u32) -> Result<Conversion>;
}

/// In-process WAV normalizer: downmix, resample, re-encode as 16-bit PCM.
///
/// Only reads WAV. Anything else is an error so the next converter can try.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavNormalizer;

impl AudioConverter for WavNormalizer {
    fn name(&self) -> &str {
        "wav"
    }

    fn convert(&self, input: &Path, output: &Path, target_rate: u32) -> Result<Conversion> {
        let spec = hound::WavReader::open(input)?.spec();
        if spec.channels == 1
            && spec.sample_rate == target_rate
            && spec.sample_format == SampleFormat::Int
            && spec.bits_per_sample == 16
        {
            return Ok(Conversion::Unchanged);
        }

        let (samples, source_rate) = read_wav_mono(input)?;
        let resampled = resample_mono(&samples, source_rate, target_rate)?;

        let out_spec = WavSpec {
            channels: 1,
            sample_rate: target_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(output, out_spec)?;
        for s in &resampled {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;

        debug!(
            source_rate,
            target_rate,
            channels = spec.channels,
            frames = resampled.len(),
            "normalized wav"
        );
        Ok(Conversion::Converted)
    }
}

/// External `ffmpeg` conversion, killed after `timeout`.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    program: String,
    timeout: Duration,
}

impl FfmpegConverter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg", Duration::from_secs(10))
    }
}

impl AudioConverter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn convert(&self, input: &Path, output: &Path, target_rate: u32) -> Result<Conversion> {
        let rate = target_rate.to_string();
        let mut child = Command::new(&self.program)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ar", rate.as_str(), "-ac", "1", "-f", "wav"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| FieldkeyError::Conversion(format!("{}: {e}", self.program)))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(FieldkeyError::Conversion(format!(
                    "{} timed out after {} ms",
                    self.program,
                    self.timeout.as_millis()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(FieldkeyError::Conversion(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        let written = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(FieldkeyError::Conversion(format!(
                "{} produced no output",
                self.program
            )));
        }
        Ok(Conversion::Converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, rate: u32, frames: usize) {
        let spec = WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut w = WavWriter::create(path, spec).unwrap();
        for i in 0..frames * channels as usize {
            w.write_sample(((i % 200) as i16 - 100) * 50).unwrap();
        }
        w.finalize().unwrap();
    }

    #[test]
    fn normalized_input_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_wav(&input, 1, 16_000, 1600);
        let res = WavNormalizer.convert(&input, &output, 16_000).unwrap();
        assert_eq!(res, Conversion::Unchanged);
        assert!(!output.exists());
    }

    #[test]
    fn stereo_48k_becomes_mono_16k() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_wav(&input, 2, 48_000, 4800);
        let res = WavNormalizer.convert(&input, &output, 16_000).unwrap();
        assert_eq!(res, Conversion::Converted);

        let reader = hound::WavReader::open(&output).unwrap();
        let spec = reader.spec();
        assert_eq!((spec.channels, spec.sample_rate), (1, 16_000));
        let frames = reader.duration() as i64;
        assert!((frames - 1600).abs() <= 40, "frames={frames}");
    }

    #[test]
    fn non_wav_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.m4a");
        std::fs::write(&input, b"not audio").unwrap();
        assert!(WavNormalizer
            .convert(&input, &dir.path().join("out.wav"), 16_000)
            .is_err());
    }

    #[test]
    fn missing_ffmpeg_is_a_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.m4a");
        std::fs::write(&input, b"not audio").unwrap();
        let conv = FfmpegConverter::new("fieldkey-no-such-ffmpeg", Duration::from_secs(1));
        let err = conv
            .convert(&input, &dir.path().join("out.wav"), 16_000)
            .unwrap_err();
        assert!(matches!(err, FieldkeyError::Conversion(_)));
    }
}
