//! Primary semantic router contract.
//!
//! The router is a black box: messages plus tool schemas in, function calls
//! out. Implementations are blocking; the dispatcher moves them onto Tokio's
//! blocking pool and stops waiting at `DispatcherConfig::router_timeout`.
//! A blocking call cannot be cancelled from outside, so an implementation
//! that starts a process or opens a connection must enforce the same
//! deadline itself and release what it started.

use serde::{Deserialize, Serialize};

use crate::tools::{FunctionCall, Message, Source, ToolSchema};

/// Router backend trait.
pub trait PrimaryRouter: Send + Sync {
    /// Map a conversation and catalog to function calls.
    fn route(&self, messages: &[Message], tools: &[ToolSchema]) -> anyhow::Result<RouterOutput>;

    fn name(&self) -> &str;
}

/// What a primary router returns.
///
/// `total_time_ms` is the router's self-reported timing. The dispatcher
/// discards it in favour of its own wall-clock measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterOutput {
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
    #[serde(default)]
    pub total_time_ms: Option<f64>,
    #[serde(default)]
    pub source: Source,
}

impl RouterOutput {
    pub fn new(function_calls: Vec<FunctionCall>, source: Source) -> Self {
        Self {
            function_calls,
            total_time_ms: None,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_router_json_with_defaults() {
        let out: RouterOutput = serde_json::from_value(json!({
            "function_calls": [{"name": "get_weather", "arguments": {"location": "Paris"}}],
            "source": "on-device"
        }))
        .unwrap();
        assert_eq!(out.function_calls[0].name, "get_weather");
        assert_eq!(out.source, Source::OnDevice);
        assert!(out.total_time_ms.is_none());

        let empty: RouterOutput = serde_json::from_value(json!({})).unwrap();
        assert!(empty.function_calls.is_empty());
        assert_eq!(empty.source, Source::Unknown);
    }
}
