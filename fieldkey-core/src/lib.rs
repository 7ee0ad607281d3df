//! # fieldkey-core
//!
//! Voice-to-action core: turns an utterance into executed tool calls.
//!
//! ## Architecture
//!
//! ```text
//! audio ─► Transcriber(spawn_blocking, model lock)
//!                 │ transcript
//!                 ▼
//! messages ─► Dispatcher ─► PrimaryRouter ──ok──┐
//!                 │            │ error/timeout  │
//!                 │            ▼                │
//!                 │      PatternExtractor ──────┤
//!                 │                             ▼
//!                 │                         Enricher
//!                 ▼                             │
//!           RoutingResult ◄─────────────────────┘
//!                 │
//!            ToolExecutor ─► HistoryLog
//! ```
//!
//! The benchmark evaluator drives the same [`Dispatcher`] over a fixed case
//! set and folds F1, latency and routing source into one composite score.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod bench;
pub mod dispatch;
pub mod enrich;
pub mod error;
pub mod exec;
pub mod extract;
pub mod inference;
pub mod service;
pub mod tools;
pub mod transcribe;

// Convenience re-exports for downstream crates
pub use bench::{run_benchmark, BenchmarkCase, BenchmarkReport, Difficulty};
pub use dispatch::{Dispatcher, DispatcherConfig, PrimaryRouter, RouterOutput};
pub use enrich::{Enricher, PlaceholderSet};
pub use error::{FieldkeyError, Result};
pub use exec::{ExecutionError, HandlerTable, HistoryEntry, HistoryLog, ToolExecutor};
pub use extract::{ExtractionRule, PatternExtractor, RuleRegistry};
pub use inference::{CommandModel, CommandModelConfig, ModelHandle, ModelSlot, SpeechModel, StubModel};
pub use service::{ActionResponse, FieldAssistant, VoiceResponse};
pub use tools::{FunctionCall, Message, Role, RoutingResult, Source, ToolSchema};
pub use transcribe::{Transcriber, TranscriberConfig, TranscriptionOutcome};
