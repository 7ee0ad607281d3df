//! Speech model abstraction.
//!
//! The `SpeechModel` trait decouples the transcriber from any specific
//! backend (deterministic stub, external whisper CLI, ...).
//!
//! `&mut self` on `transcribe` and `reset` expresses that decoders carry state
//! across calls (KV caches, prompt context). All access is serialised through
//! `ModelHandle`'s `parking_lot::Mutex`.

pub mod command;
pub mod stub;

pub use command::{CommandModel, CommandModelConfig};
pub use stub::StubModel;

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::Result;

/// Contract for speech recognition backends.
pub trait SpeechModel: Send + 'static {
    /// One-time warm-up: verify weights exist, load them, prime caches.
    ///
    /// # Errors
    /// Returns an error if model files are missing or corrupt.
    fn warm_up(&mut self) -> Result<()>;

    /// Transcribe a 16 kHz mono WAV file (or the raw upload, when it could
    /// not be normalized). Returns the transcript, possibly empty.
    fn transcribe(&mut self, audio: &Path) -> Result<String>;

    /// Clear decoder state left over from the previous utterance.
    fn reset(&mut self);
}

/// Thread-safe reference-counted handle to any `SpeechModel` implementor.
#[derive(Clone)]
pub struct ModelHandle(pub Arc<Mutex<dyn SpeechModel>>);

impl ModelHandle {
    pub fn new<M: SpeechModel>(model: M) -> Self {
        Self(Arc::new(Mutex::new(model)))
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle").finish_non_exhaustive()
    }
}

type Loader = Box<dyn Fn() -> Result<ModelHandle> + Send + Sync>;

/// Lazily constructed, process-lifetime model.
///
/// A failed load leaves the slot empty; the next [`get`](Self::get) retries.
/// Loading happens under the slot lock, so at most one construction runs.
pub struct ModelSlot {
    loader: Loader,
    handle: Mutex<Option<ModelHandle>>,
}

impl ModelSlot {
    /// `loader` builds the model; the slot warms it up before storing it.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<ModelHandle> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            handle: Mutex::new(None),
        }
    }

    /// Slot that is already loaded. Used by tests and embedded hosts.
    pub fn ready(handle: ModelHandle) -> Self {
        let slot = Self::new(|| Err(crate::error::FieldkeyError::ModelUnavailable));
        *slot.handle.lock() = Some(handle);
        slot
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Loaded model, constructing it if needed. Blocking.
    pub fn get(&self) -> Option<ModelHandle> {
        let mut slot = self.handle.lock();
        if let Some(handle) = slot.as_ref() {
            return Some(handle.clone());
        }

        let loaded = (self.loader)().and_then(|handle| {
            handle.0.lock().warm_up()?;
            Ok(handle)
        });
        match loaded {
            Ok(handle) => {
                info!("speech model ready");
                *slot = Some(handle.clone());
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "speech model unavailable");
                None
            }
        }
    }

    /// Load in the background so the first request does not pay for it.
    pub fn preload(self: &Arc<Self>) -> tokio::task::JoinHandle<bool> {
        let slot = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            info!("pre-loading speech model");
            slot.get().is_some()
        })
    }
}

impl std::fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSlot")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
