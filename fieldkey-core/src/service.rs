//! Request flows that tie the core together.
//!
//! ```text
//! text : messages ─────────────────────► route ─► execute ─► history
//! voice: audio ─► transcribe ─► message ─► route ─► execute ─► history
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::exec::{round1, ExecutedCall, ToolExecutor};
use crate::tools::{Message, Source, ToolSchema};
use crate::transcribe::{Transcriber, TranscriptionOutcome};

/// Outcome of a text request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub function_calls: Vec<ExecutedCall>,
    pub source: Source,
    pub latency_ms: f64,
}

/// Outcome of a voice request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceResponse {
    pub transcription: String,
    pub transcribe_latency_ms: f64,
    pub function_calls: Vec<ExecutedCall>,
    pub source: Source,
    pub routing_latency_ms: f64,
    /// Set when the transcript could not be produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldAssistant {
    dispatcher: Arc<Dispatcher>,
    executor: Arc<ToolExecutor>,
    transcriber: Arc<Transcriber>,
    tools: Arc<Vec<ToolSchema>>,
}

impl FieldAssistant {
    /// `tools` is the catalog offered to the router on every request.
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        executor: Arc<ToolExecutor>,
        transcriber: Arc<Transcriber>,
        tools: Vec<ToolSchema>,
    ) -> Self {
        Self {
            dispatcher,
            executor,
            transcriber,
            tools: Arc::new(tools),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn executor(&self) -> &Arc<ToolExecutor> {
        &self.executor
    }

    pub fn transcriber(&self) -> &Arc<Transcriber> {
        &self.transcriber
    }

    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }

    /// Route `messages` against the catalog and execute every resulting call.
    pub async fn handle(&self, messages: &[Message]) -> ActionResponse {
        let routed = self.dispatcher.route(messages, &self.tools).await;
        let function_calls =
            self.executor
                .execute_all(&routed.function_calls, routed.source, routed.total_time_ms);
        ActionResponse {
            function_calls,
            source: routed.source,
            latency_ms: round1(routed.total_time_ms),
        }
    }

    /// Route a single user utterance.
    pub async fn handle_text(&self, text: &str) -> ActionResponse {
        self.handle(&[Message::user(text)]).await
    }

    /// Transcribe an upload, then route and execute the transcript. An empty
    /// transcript executes nothing and reports source `none`.
    pub async fn process_voice(&self, audio: Vec<u8>, filename: &str) -> VoiceResponse {
        let outcome = self.transcriber.transcribe(audio, filename).await;
        let transcribe_latency_ms = round1(outcome.elapsed_ms());
        let error = match &outcome {
            TranscriptionOutcome::Transcribed { .. } => None,
            TranscriptionOutcome::Unavailable => Some("speech model not available".to_string()),
            TranscriptionOutcome::Failed { error } => Some(error.clone()),
        };
        let transcription = outcome.text().to_string();

        if transcription.is_empty() {
            info!("empty transcript; nothing to route");
            return VoiceResponse {
                transcription,
                transcribe_latency_ms,
                function_calls: Vec::new(),
                source: Source::None,
                routing_latency_ms: 0.0,
                error,
            };
        }

        let action = self.handle_text(&transcription).await;
        VoiceResponse {
            transcription,
            transcribe_latency_ms,
            function_calls: action.function_calls,
            source: action.source,
            routing_latency_ms: action.latency_ms,
            error,
        }
    }
}
