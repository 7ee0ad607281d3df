use thiserror::Error;

/// All errors produced by fieldkey-core.
#[derive(Debug, Error)]
pub enum FieldkeyError {
    #[error("primary router unavailable: {0}")]
    RouterUnavailable(String),

    #[error("speech model file not found: {path}")]
    ModelNotFound { path: std::path::PathBuf },

    #[error("speech model is not loaded")]
    ModelUnavailable,

    #[error("inference error: {0}")]
    Inference(String),

    #[error("audio conversion error: {0}")]
    Conversion(String),

    #[error("timed out waiting for the speech model lock")]
    LockTimeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FieldkeyError>;
