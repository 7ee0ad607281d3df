//! Whole-buffer sample-rate conversion on a rubato `FastFixedIn` resampler.
//!
//! Uploads arrive at whatever rate the phone or browser picked (usually 44.1
//! or 48 kHz) and are resampled in one pass once decoded.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use crate::error::{FieldkeyError, Result};

/// Frames fed to rubato per call.
pub const RESAMPLE_CHUNK: usize = 1024;

/// Resample mono `samples` from `source_rate` to `target_rate`.
///
/// The final partial chunk is zero-padded; only the output frames that
/// correspond to real input are kept.
pub fn resample_mono(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let mut resampler =
        FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Cubic, RESAMPLE_CHUNK, 1)
            .map_err(|e| FieldkeyError::Conversion(format!("resampler init: {e}")))?;
    let mut output = vec![vec![0f32; resampler.output_frames_max()]; 1];
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let mut out = Vec::with_capacity(expected + RESAMPLE_CHUNK);

    let mut padded = [0f32; RESAMPLE_CHUNK];
    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        let input: &[f32] = if chunk.len() == RESAMPLE_CHUNK {
            chunk
        } else {
            padded[..chunk.len()].copy_from_slice(chunk);
            &padded
        };
        let (_, produced) = resampler
            .process_into_buffer(&[input], &mut output, None)
            .map_err(|e| FieldkeyError::Conversion(format!("resampling: {e}")))?;
        out.extend_from_slice(&output[0][..produced]);
    }
    out.truncate(expected);

    debug!(source_rate, target_rate, frames_in = samples.len(), frames_out = out.len(), "resampled");
    Ok(out)
}
