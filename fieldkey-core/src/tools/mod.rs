//! Shared vocabulary: tool schemas, conversation messages, function calls and
//! the routing result envelope.
//!
//! Everything here is plain data. Serialization follows the JSON-schema shape
//! that function-calling routers consume:
//!
//! ```text
//! {"name": "get_weather",
//!  "description": "...",
//!  "parameters": {"type": "object",
//!                 "properties": {"location": {"type": "string", "description": "City name"}},
//!                 "required": ["location"]}}
//! ```

pub mod catalog;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Argument mapping of a function call. Ordered so output is deterministic.
pub type Arguments = BTreeMap<String, Value>;

// ── Schemas ──────────────────────────────────────────────────────────────────

/// Type and description of a single tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

/// JSON-schema-like parameter block of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type", default = "object_kind")]
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, ParamSpec>,
    #[serde(default)]
    pub required: Vec<String>,
}

fn object_kind() -> String {
    "object".into()
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            kind: object_kind(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

/// A callable operation offered to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: ParameterSpec,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSpec::default(),
        }
    }

    /// Add a required parameter.
    pub fn required(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.parameters.required.push(name.to_string());
        self.optional(name, kind, description)
    }

    /// Add an optional parameter.
    pub fn optional(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.parameters.properties.insert(
            name.to_string(),
            ParamSpec {
                kind: kind.to_string(),
                description: description.to_string(),
            },
        );
        self
    }

    pub fn is_required(&self, param: &str) -> bool {
        self.parameters.required.iter().any(|p| p == param)
    }
}

// ── Conversation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Concatenate every user-authored message, separated by single spaces.
pub fn user_text(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Calls ────────────────────────────────────────────────────────────────────

/// A resolved (or expected) invocation of a tool.
///
/// `name` is not checked against any catalog here; unknown names are caught
/// by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Arguments::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }
}

/// Scoring-only counterpart of [`FunctionCall`]. Never executed.
pub type ExpectedCall = FunctionCall;

/// Where a routing decision was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    OnDevice,
    Cloud,
    None,
    #[default]
    Unknown,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnDevice => "on-device",
            Self::Cloud => "cloud",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output envelope of the routing dispatcher. Produced once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub function_calls: Vec<FunctionCall>,
    pub total_time_ms: f64,
    pub source: Source,
}
