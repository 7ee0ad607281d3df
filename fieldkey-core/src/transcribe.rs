//! Transcription Pipeline: one shared stateful model, strictly serialised.
//!
//! ```text
//! bytes ──► temp upload ──► AudioConverter chain ──► temp WAV
//!                                                      │
//!                              ┌── model lock ─────────┤
//!                              │  reset()              │
//!                              │  transcribe(path)     │
//!                              └───────────────────────┘
//!                                      │
//!                              TranscriptionOutcome
//! ```
//!
//! Everything runs on Tokio's blocking pool. Once a request holds the lock,
//! reset and inference run to completion even if the caller stops waiting,
//! so the model never sees a half-reset state. Temporary files are dropped
//! on every exit path.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::audio::{AudioConverter, Conversion, FfmpegConverter, WavNormalizer};
use crate::error::{FieldkeyError, Result};
use crate::inference::{ModelHandle, ModelSlot};

/// Configuration for [`Transcriber`].
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Sample rate the model expects (Hz). Default: 16000.
    pub target_sample_rate: u32,
    /// Longest a request waits for the model lock. `None` queues
    /// indefinitely. Default: `None`.
    pub lock_timeout: Option<Duration>,
    /// Bound on the external converter. Default: 10 s.
    pub conversion_timeout: Duration,
    /// Program used for non-WAV uploads. Default: `ffmpeg`.
    pub ffmpeg_program: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            lock_timeout: None,
            conversion_timeout: Duration::from_secs(10),
            ffmpeg_program: "ffmpeg".into(),
        }
    }
}

/// Result of one transcription request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranscriptionOutcome {
    /// `elapsed_ms` covers reset plus inference only.
    Transcribed { text: String, elapsed_ms: f64 },
    /// The model could not be constructed. A later request retries.
    Unavailable,
    Failed { error: String },
}

impl TranscriptionOutcome {
    /// Transcript text; empty unless transcribed.
    pub fn text(&self) -> &str {
        match self {
            Self::Transcribed { text, .. } => text,
            _ => "",
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        match self {
            Self::Transcribed { elapsed_ms, .. } => *elapsed_ms,
            _ => 0.0,
        }
    }
}

pub struct Transcriber {
    slot: Arc<ModelSlot>,
    converters: Vec<Arc<dyn AudioConverter>>,
    config: TranscriberConfig,
}

impl Transcriber {
    /// Transcriber with the default converter chain: in-process WAV
    /// normalization, then ffmpeg.
    pub fn new(slot: Arc<ModelSlot>, config: TranscriberConfig) -> Self {
        let converters: Vec<Arc<dyn AudioConverter>> = vec![
            Arc::new(WavNormalizer),
            Arc::new(FfmpegConverter::new(
                config.ffmpeg_program.clone(),
                config.conversion_timeout,
            )),
        ];
        Self {
            slot,
            converters,
            config,
        }
    }

    /// Replace the converter chain. An empty chain feeds uploads unchanged.
    pub fn with_converters(mut self, converters: Vec<Arc<dyn AudioConverter>>) -> Self {
        self.converters = converters;
        self
    }

    pub fn slot(&self) -> &Arc<ModelSlot> {
        &self.slot
    }

    pub fn config(&self) -> &TranscriberConfig {
        &self.config
    }

    /// Transcribe an uploaded blob. `filename` only supplies the extension.
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> TranscriptionOutcome {
        let slot = Arc::clone(&self.slot);
        let converters = self.converters.clone();
        let config = self.config.clone();
        let suffix = upload_suffix(filename);

        let joined = tokio::task::spawn_blocking(move || {
            let Some(handle) = slot.get() else {
                return Ok(None);
            };
            transcribe_blocking(&handle, &audio, &suffix, &converters, &config).map(Some)
        })
        .await;

        match joined {
            Ok(Ok(Some((text, elapsed_ms)))) => TranscriptionOutcome::Transcribed { text, elapsed_ms },
            Ok(Ok(None)) => TranscriptionOutcome::Unavailable,
            Ok(Err(e)) => {
                warn!(error = %e, "transcription failed");
                TranscriptionOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "transcription task aborted");
                TranscriptionOutcome::Failed {
                    error: format!("transcription task aborted: {e}"),
                }
            }
        }
    }
}

impl std::fmt::Debug for Transcriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriber")
            .field("slot", &self.slot)
            .field(
                "converters",
                &self.converters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

/// `.ext` of the upload name, `.wav` when it has none.
fn upload_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| ".wav".into())
}

fn transcribe_blocking(
    handle: &ModelHandle,
    audio: &[u8],
    suffix: &str,
    converters: &[Arc<dyn AudioConverter>],
    config: &TranscriberConfig,
) -> Result<(String, f64)> {
    let mut upload = tempfile::Builder::new()
        .prefix("fieldkey-upload-")
        .suffix(suffix)
        .tempfile()?;
    upload.write_all(audio)?;
    upload.flush()?;
    let converted = tempfile::Builder::new()
        .prefix("fieldkey-")
        .suffix(".wav")
        .tempfile()?;

    let input = normalize(
        upload.path(),
        converted.path(),
        converters,
        config.target_sample_rate,
    );

    let mut model = match config.lock_timeout {
        Some(limit) => handle.0.try_lock_for(limit).ok_or(FieldkeyError::LockTimeout)?,
        None => handle.0.lock(),
    };
    let started = Instant::now();
    model.reset();
    let result = model.transcribe(input);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    drop(model);

    let text = result?.trim().to_string();
    debug!(elapsed_ms, chars = text.len(), "transcribed");
    Ok((text, elapsed_ms))
}

/// Path the model should read: the converted file, or the upload itself when
/// it is already normalized or every converter failed.
fn normalize<'a>(
    upload: &'a Path,
    converted: &'a Path,
    converters: &[Arc<dyn AudioConverter>],
    target_rate: u32,
) -> &'a Path {
    for converter in converters {
        match converter.convert(upload, converted, target_rate) {
            Ok(Conversion::Converted) => return converted,
            Ok(Conversion::Unchanged) => return upload,
            Err(e) => debug!(converter = converter.name(), error = %e, "converter declined"),
        }
    }
    if !converters.is_empty() {
        warn!("audio conversion failed; using the original upload");
    }
    upload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::StubModel;

    #[test]
    fn suffix_from_filename() {
        assert_eq!(upload_suffix("memo.m4a"), ".m4a");
        assert_eq!(upload_suffix("recording"), ".wav");
        assert_eq!(upload_suffix(""), ".wav");
    }

    #[test]
    fn outcome_accessors() {
        let ok = TranscriptionOutcome::Transcribed {
            text: "hi".into(),
            elapsed_ms: 12.5,
        };
        assert_eq!((ok.text(), ok.elapsed_ms()), ("hi", 12.5));
        assert_eq!(TranscriptionOutcome::Unavailable.text(), "");
        let v = serde_json::to_value(TranscriptionOutcome::Unavailable).unwrap();
        assert_eq!(v["status"], "unavailable");
    }

    #[tokio::test]
    async fn stub_round_trip_without_converters() {
        let slot = Arc::new(ModelSlot::ready(ModelHandle::new(StubModel::new(
            "the back door is jammed",
        ))));
        let transcriber =
            Transcriber::new(slot, TranscriberConfig::default()).with_converters(Vec::new());
        let out = transcriber.transcribe(b"RIFF".to_vec(), "clip.m4a").await;
        assert_eq!(out.text(), "the back door is jammed");
    }

    #[tokio::test]
    async fn lock_timeout_surfaces_as_failure() {
        let handle = ModelHandle::new(StubModel::new("x"));
        let slot = Arc::new(ModelSlot::ready(handle.clone()));
        let transcriber = Transcriber::new(
            slot,
            TranscriberConfig {
                lock_timeout: Some(Duration::from_millis(20)),
                ..TranscriberConfig::default()
            },
        )
        .with_converters(Vec::new());

        let guard = handle.0.lock();
        let out = transcriber.transcribe(b"x".to_vec(), "a.wav").await;
        drop(guard);
        assert!(matches!(out, TranscriptionOutcome::Failed { .. }));
    }
}
