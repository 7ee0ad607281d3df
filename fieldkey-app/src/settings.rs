//! Persistent host settings (JSON file in the app data directory).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fieldkey_core::enrich::DEFAULT_PLACEHOLDERS;
use fieldkey_core::{CommandModelConfig, DispatcherConfig, PlaceholderSet, TranscriberConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    /// `stub` or `whisper-cli`.
    pub model_backend: String,
    pub whisper_command: String,
    pub whisper_model_path: String,
    pub ffmpeg_path: String,
    /// External primary router. `None` routes with patterns only.
    pub router_command: Option<String>,
    pub router_timeout_ms: u64,
    /// 0 waits for the speech model indefinitely.
    pub transcription_lock_timeout_ms: u64,
    /// 0 keeps every entry.
    pub history_capacity: usize,
    pub placeholder_values: Vec<String>,
    /// Text returned by the stub backend. Empty echoes the audio size.
    pub stub_transcript: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model_backend: "stub".into(),
            whisper_command: "whisper-cli".into(),
            whisper_model_path: "models/ggml-base.en.bin".into(),
            ffmpeg_path: "ffmpeg".into(),
            router_command: None,
            router_timeout_ms: 5_000,
            transcription_lock_timeout_ms: 0,
            history_capacity: 10_000,
            placeholder_values: DEFAULT_PLACEHOLDERS.iter().map(|s| s.to_string()).collect(),
            stub_transcript: String::new(),
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.model_backend = normalize_model_backend(&self.model_backend);
        self.whisper_command = non_empty_or(&self.whisper_command, "whisper-cli");
        self.ffmpeg_path = non_empty_or(&self.ffmpeg_path, "ffmpeg");
        self.whisper_model_path = self.whisper_model_path.trim().to_string();
        self.router_command = self
            .router_command
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.router_timeout_ms = self.router_timeout_ms.clamp(50, 120_000);
        self.transcription_lock_timeout_ms = self.transcription_lock_timeout_ms.min(600_000);
        self.history_capacity = self.history_capacity.min(1_000_000);
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            router_timeout: Some(Duration::from_millis(self.router_timeout_ms)),
            placeholders: PlaceholderSet::new(&self.placeholder_values),
        }
    }

    pub fn transcriber_config(&self) -> TranscriberConfig {
        TranscriberConfig {
            lock_timeout: (self.transcription_lock_timeout_ms > 0)
                .then(|| Duration::from_millis(self.transcription_lock_timeout_ms)),
            ffmpeg_program: self.ffmpeg_path.clone(),
            ..TranscriberConfig::default()
        }
    }

    pub fn whisper_config(&self) -> CommandModelConfig {
        CommandModelConfig {
            program: self.whisper_command.clone(),
            model_path: PathBuf::from(&self.whisper_model_path),
            ..CommandModelConfig::default()
        }
    }
}

fn non_empty_or(raw: &str, default: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default.into()
    } else {
        trimmed.into()
    }
}

pub fn normalize_model_backend(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "whisper" | "whisper-cli" | "whisper.cpp" | "whisper_cli" => "whisper-cli".into(),
        _ => "stub".into(),
    }
}

/// Environment variables take precedence over the settings file.
pub fn apply_env_overrides(settings: &mut AppSettings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut AppSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("FIELDKEY_MODEL_BACKEND") {
        settings.model_backend = v;
    }
    if let Some(v) = var("FIELDKEY_WHISPER_MODEL") {
        settings.whisper_model_path = v;
    }
    if let Some(v) = var("FIELDKEY_FFMPEG") {
        settings.ffmpeg_path = v;
    }
    if let Some(v) = var("FIELDKEY_ROUTER_COMMAND") {
        settings.router_command = Some(v);
    }
    settings.normalize();
}

pub fn default_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os("FIELDKEY_SETTINGS") {
        return PathBuf::from(path);
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("FieldKey")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("fieldkey")
            .join("settings.json")
    }
}

/// Missing or unreadable files yield defaults.
pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
