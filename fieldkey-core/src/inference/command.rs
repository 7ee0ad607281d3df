//! `CommandModel`: runs an external whisper CLI once per request.
//!
//! The default invocation follows whisper.cpp:
//! `whisper-cli -m <model> -f <audio> --no-timestamps --no-prints`.
//! The transcript is whatever the process prints on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{FieldkeyError, Result};
use crate::inference::SpeechModel;

#[derive(Debug, Clone)]
pub struct CommandModelConfig {
    /// Executable to run. Default: `whisper-cli`.
    pub program: String,
    /// Model weights passed with `-m`.
    pub model_path: PathBuf,
    /// Extra arguments appended after the defaults.
    pub extra_args: Vec<String>,
}

impl Default for CommandModelConfig {
    fn default() -> Self {
        Self {
            program: "whisper-cli".into(),
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct CommandModel {
    config: CommandModelConfig,
}

impl CommandModel {
    pub fn new(config: CommandModelConfig) -> Self {
        Self { config }
    }
}

impl SpeechModel for CommandModel {
    fn warm_up(&mut self) -> Result<()> {
        if !self.config.model_path.exists() {
            return Err(FieldkeyError::ModelNotFound {
                path: self.config.model_path.clone(),
            });
        }
        debug!(program = %self.config.program, "whisper CLI configured");
        Ok(())
    }

    fn transcribe(&mut self, audio: &Path) -> Result<String> {
        let output = Command::new(&self.config.program)
            .arg("-m")
            .arg(&self.config.model_path)
            .arg("-f")
            .arg(audio)
            .args(["--no-timestamps", "--no-prints"])
            .args(&self.config.extra_args)
            .output()
            .map_err(|e| FieldkeyError::Inference(format!("{}: {e}", self.config.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FieldkeyError::Inference(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(text)
    }

    /// Every request is a fresh process, so there is no state to clear.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_weights_fail_warm_up() {
        let mut model = CommandModel::new(CommandModelConfig {
            model_path: PathBuf::from("/nonexistent/fieldkey/model.bin"),
            ..CommandModelConfig::default()
        });
        assert!(matches!(
            model.warm_up(),
            Err(FieldkeyError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn missing_program_is_an_inference_error() {
        let mut model = CommandModel::new(CommandModelConfig {
            program: "fieldkey-no-such-whisper".into(),
            ..CommandModelConfig::default()
        });
        let err = model.transcribe(Path::new("a.wav")).unwrap_err();
        assert!(matches!(err, FieldkeyError::Inference(_)));
    }
}
