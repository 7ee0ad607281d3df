//! `StubModel`: deterministic backend for development and tests.
//!
//! With a configured transcript it returns that text for every request. With
//! none it describes the input instead, so the full voice flow can be
//! exercised without model weights.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::inference::SpeechModel;

#[derive(Debug, Default)]
pub struct StubModel {
    transcript: Option<String>,
    utterance_count: u32,
    reset_count: u32,
}

impl StubModel {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            ..Self::default()
        }
    }

    pub fn utterance_count(&self) -> u32 {
        self.utterance_count
    }

    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }
}

impl SpeechModel for StubModel {
    fn warm_up(&mut self) -> Result<()> {
        debug!("StubModel::warm_up: no-op");
        Ok(())
    }

    fn transcribe(&mut self, audio: &Path) -> Result<String> {
        self.utterance_count += 1;
        if let Some(text) = &self.transcript {
            return Ok(text.clone());
        }

        let text = match hound::WavReader::open(audio) {
            Ok(reader) => {
                let spec = reader.spec();
                format!(
                    "[stub: {} samples @ {} Hz]",
                    reader.duration(),
                    spec.sample_rate
                )
            }
            Err(_) => format!("[stub: {} bytes]", std::fs::metadata(audio)?.len()),
        };
        Ok(text)
    }

    fn reset(&mut self) {
        self.reset_count += 1;
        debug!("StubModel::reset");
    }
}
