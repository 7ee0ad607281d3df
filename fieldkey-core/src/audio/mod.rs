//! Audio preparation ahead of speech inference.
//!
//! Recordings are normalized to mono 16-bit PCM WAV at the model's rate:
//!
//! ```text
//! upload ──► WavNormalizer (hound + rubato) ──► ok ──► model
//!               │ not WAV / failed
//!               ▼
//!            FfmpegConverter ──► ok ──► model
//!               │ failed
//!               ▼
//!            original file ──► model
//! ```

pub mod convert;
pub mod resample;

pub use convert::{AudioConverter, Conversion, FfmpegConverter, WavNormalizer};
pub use resample::resample_mono;

use std::path::Path;

use hound::SampleFormat;

use crate::error::Result;

/// Read a WAV file as mono f32, averaging channels. Returns `(samples, rate)`.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int if spec.bits_per_sample <= 16 => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    if channels == 1 {
        return Ok((interleaved, spec.sample_rate));
    }

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}
