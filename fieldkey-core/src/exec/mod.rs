//! Tool Execution & History.
//!
//! Calls resolve by exact name against a [`HandlerTable`] that is frozen once
//! the executor is built. Every call, successful or not, lands in the
//! [`HistoryLog`]; the executor is its only writer.

pub mod history;
pub mod locksmith;

pub use history::{HistoryEntry, HistoryLog, HistoryPage};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::{Arguments, FunctionCall, Source};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{tool}: {message}")]
    Handler { tool: String, message: String },
}

/// Executes one tool.
pub trait ToolHandler: Send + Sync {
    fn call(&self, arguments: &Arguments) -> Result<Value, ExecutionError>;
}

impl<F> ToolHandler for F
where
    F: Fn(&Arguments) -> Result<Value, ExecutionError> + Send + Sync,
{
    fn call(&self, arguments: &Arguments) -> Result<Value, ExecutionError> {
        self(arguments)
    }
}

/// Handlers keyed by tool name.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `name`, replacing any previous one.
    pub fn with(mut self, name: impl Into<String>, handler: impl ToolHandler + 'static) -> Self {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("tools", &self.names())
            .finish()
    }
}

/// A call together with what executing it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutedCall {
    pub name: String,
    pub arguments: Arguments,
    pub result: Value,
}

#[derive(Debug)]
pub struct ToolExecutor {
    handlers: HandlerTable,
    history: HistoryLog,
}

impl ToolExecutor {
    pub fn new(handlers: HandlerTable, history: HistoryLog) -> Self {
        Self { handlers, history }
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Resolve and run a handler without recording anything.
    pub fn call(&self, name: &str, arguments: &Arguments) -> Result<Value, ExecutionError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ExecutionError::UnknownTool(name.to_string()))?;
        handler.call(arguments)
    }

    /// Run `call` and append it to history with the request's `source` and
    /// `latency_ms`. Errors become `{"error": ...}` results.
    pub fn execute(&self, call: &FunctionCall, source: Source, latency_ms: f64) -> ExecutedCall {
        let result = match self.call(&call.name, &call.arguments) {
            Ok(value) => {
                debug!(tool = %call.name, "tool executed");
                value
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool execution failed");
                json!({ "error": e.to_string() })
            }
        };

        self.history.append(HistoryEntry {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result: result.clone(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source,
            latency_ms: round1(latency_ms),
        });

        ExecutedCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
        }
    }

    pub fn execute_all(&self, calls: &[FunctionCall], source: Source, latency_ms: f64) -> Vec<ExecutedCall> {
        calls
            .iter()
            .map(|call| self.execute(call, source, latency_ms))
            .collect()
    }
}

/// Round to one decimal place, the precision reported to clients.
pub fn round1(ms: f64) -> f64 {
    (ms * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> ToolExecutor {
        let handlers = HandlerTable::new()
            .with("echo", |args: &Arguments| -> Result<Value, ExecutionError> {
                Ok(json!({ "echo": args }))
            })
            .with("strict", |args: &Arguments| {
                if args.contains_key("id") {
                    Ok(json!({ "ok": true }))
                } else {
                    Err(ExecutionError::Handler {
                        tool: "strict".into(),
                        message: "missing id".into(),
                    })
                }
            });
        ToolExecutor::new(handlers, HistoryLog::unbounded())
    }

    #[test]
    fn unknown_tool_is_recorded_with_error_payload() {
        let exec = executor();
        let out = exec.execute(&FunctionCall::new("teleport"), Source::OnDevice, 3.21);
        assert_eq!(out.result, json!({ "error": "Unknown tool: teleport" }));

        let page = exec.history().query(None);
        assert_eq!(page.count, 1);
        assert_eq!(page.entries[0].name, "teleport");
        assert_eq!(page.entries[0].latency_ms, 3.2);
    }

    #[test]
    fn handler_errors_are_results() {
        let exec = executor();
        let out = exec.execute(&FunctionCall::new("strict"), Source::Cloud, 0.0);
        assert_eq!(out.result["error"], "strict: missing id");
        let ok = exec.execute(&FunctionCall::new("strict").with_arg("id", 1), Source::Cloud, 0.0);
        assert_eq!(ok.result["ok"], true);
        assert_eq!(exec.history().len(), 2);
    }

    #[test]
    fn call_does_not_record() {
        let exec = executor();
        let args = FunctionCall::new("echo").with_arg("x", 1).arguments;
        assert_eq!(exec.call("echo", &args).unwrap()["echo"]["x"], 1);
        assert!(exec.history().is_empty());
        assert_eq!(exec.handlers().names(), ["echo", "strict"]);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let exec = Arc::new(executor());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let exec = Arc::clone(&exec);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        exec.execute(&FunctionCall::new("echo"), Source::OnDevice, 1.0);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(exec.history().len(), 400);
    }
}
