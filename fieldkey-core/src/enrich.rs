//! Argument Enrichment: fill gaps a primary router left in its calls.
//!
//! For each call the tool's extraction rule is re-run against the original
//! utterance. An extracted value replaces the router's value only when that
//! value is absent, empty, or a known placeholder. Concrete values are never
//! touched, which makes enrichment idempotent.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::extract::RuleRegistry;
use crate::tools::{Arguments, FunctionCall};

/// Default placeholder values that mark a slot as not genuinely filled.
pub const DEFAULT_PLACEHOLDERS: [&str; 6] =
    ["", "Customer", "Locksmith Service", "unknown", "none", "N/A"];

/// Values a router emits when it had nothing better to put in a slot.
///
/// Membership is checked after trimming, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSet {
    values: HashSet<String>,
}

impl PlaceholderSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: values.into_iter().map(|v| key(v.as_ref())).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&key(value))
    }

    /// Whether `value` is a string placeholder. Non-strings never are.
    pub fn matches(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.contains(s))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDERS)
    }
}

fn key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `null`, a blank string, or an empty array/object.
///
/// Numbers and booleans are never empty, so an explicit `0` survives.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Re-runs extraction rules to repair router output.
#[derive(Debug, Clone)]
pub struct Enricher {
    registry: Arc<RuleRegistry>,
    placeholders: PlaceholderSet,
}

impl Enricher {
    pub fn new(registry: Arc<RuleRegistry>, placeholders: PlaceholderSet) -> Self {
        Self {
            registry,
            placeholders,
        }
    }

    pub fn placeholders(&self) -> &PlaceholderSet {
        &self.placeholders
    }

    /// Whether an existing slot value may be overwritten.
    pub fn is_fillable(&self, value: Option<&Value>) -> bool {
        match value {
            None => true,
            Some(v) => is_empty_value(v) || self.placeholders.matches(v),
        }
    }

    /// Enrich one tool's arguments against `text`.
    ///
    /// Tools without an extraction rule are returned unchanged.
    pub fn enrich_arguments(&self, tool: &str, mut arguments: Arguments, text: &str) -> Arguments {
        let Some(rule) = self.registry.get(tool) else {
            return arguments;
        };
        for (slot, value) in rule.fill(text) {
            if self.is_fillable(arguments.get(&slot)) {
                arguments.insert(slot, value);
            }
        }
        arguments
    }

    pub fn enrich(&self, call: FunctionCall, text: &str) -> FunctionCall {
        let arguments = self.enrich_arguments(&call.name, call.arguments, text);
        FunctionCall {
            name: call.name,
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enricher() -> Enricher {
        Enricher::new(Arc::new(RuleRegistry::builtin()), PlaceholderSet::default())
    }

    #[test]
    fn placeholder_matching_ignores_case_and_padding() {
        let set = PlaceholderSet::default();
        assert!(set.contains("  customer "));
        assert!(set.contains("UNKNOWN"));
        assert!(set.contains(""));
        assert!(!set.contains("Sarah Miller"));
        assert!(!set.matches(&json!(0)));
    }

    #[test]
    fn empty_values() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("   ")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
    }

    #[test]
    fn fills_placeholders_and_missing_slots() {
        let text = "Generate an invoice for Sarah Miller, $250 for a rekey";
        let call = FunctionCall::new("generate_invoice")
            .with_arg("customer_name", "Customer")
            .with_arg("service_type", "Locksmith Service");
        let out = enricher().enrich(call, text);
        assert_eq!(out.arguments["customer_name"], "Sarah Miller");
        assert_eq!(out.arguments["service_type"], "rekey");
        assert_eq!(out.arguments["amount"], "$250.00");
    }

    #[test]
    fn never_overwrites_concrete_values() {
        let call = FunctionCall::new("get_weather").with_arg("location", "Paris");
        let out = enricher().enrich(call, "What is the weather in London?");
        assert_eq!(out.arguments["location"], "Paris");
    }

    #[test]
    fn zero_is_kept() {
        let call = FunctionCall::new("set_alarm")
            .with_arg("hour", 10)
            .with_arg("minute", 0);
        let out = enricher().enrich(call, "Set an alarm for 10:30 AM.");
        assert_eq!(out.arguments["minute"], 0);
    }

    #[test]
    fn unknown_tools_pass_through() {
        let call = FunctionCall::new("launch_rocket").with_arg("target", "");
        let out = enricher().enrich(call.clone(), "launch it");
        assert_eq!(out, call);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let text = "Text Dave saying I'll be late.";
        let call = FunctionCall::new("send_message").with_arg("recipient", "none");
        let once = enricher().enrich(call, text);
        let twice = enricher().enrich(once.clone(), text);
        assert_eq!(once, twice);
        assert_eq!(once.arguments["recipient"], "Dave");
    }
}
