//! Pattern Extractor: deterministic per-tool slot filling.
//!
//! Each [`ExtractionRule`] pairs a tool name with an activation pattern and a
//! [`SlotFiller`]. Rules live in a [`RuleRegistry`] keyed by tool name, so a
//! new tool is supported by registering a rule; dispatch logic never changes.
//!
//! ```text
//! utterance ──► lowercase ──► activation match? ──► SlotFiller::fill(original text)
//!                                   │                        │
//!                             tool in catalog?         FunctionCall
//! ```
//!
//! Activation patterns are written against lowercased text. Fillers see the
//! original casing, since names and places are recognised by capitalisation.
//!
//! Extraction is total: it never panics and never errors. A rule that does
//! not activate simply contributes no call.

/// Declare a lazily compiled `Regex` static.
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
            regex::Regex::new(&$re)
                .expect(concat!("fail to create the ", stringify!($name), " pattern"))
        });
    };
}

pub mod assistant;
pub mod locksmith;
pub mod slots;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::tools::{Arguments, FunctionCall, Source, ToolSchema};

/// Pure mapping from utterance text to tool arguments.
pub trait SlotFiller: Send + Sync {
    fn fill(&self, text: &str) -> Arguments;
}

impl<F> SlotFiller for F
where
    F: Fn(&str) -> Arguments + Send + Sync,
{
    fn fill(&self, text: &str) -> Arguments {
        self(text)
    }
}

/// Slot-filling rule for a single tool.
pub struct ExtractionRule {
    tool: String,
    activation: Regex,
    filler: Box<dyn SlotFiller>,
    requires_remote: bool,
}

impl ExtractionRule {
    pub fn new(tool: impl Into<String>, activation: Regex, filler: impl SlotFiller + 'static) -> Self {
        Self {
            tool: tool.into(),
            activation,
            filler: Box::new(filler),
            requires_remote: false,
        }
    }

    /// Mark calls produced by this rule as needing remote execution.
    pub fn requiring_remote(mut self) -> Self {
        self.requires_remote = true;
        self
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn requires_remote(&self) -> bool {
        self.requires_remote
    }

    /// Byte offset of the first activation match in lowercased text.
    pub fn activation_offset(&self, lowered: &str) -> Option<usize> {
        self.activation.find(lowered).map(|m| m.start())
    }

    pub fn fill(&self, text: &str) -> Arguments {
        self.filler.fill(text)
    }
}

impl fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("tool", &self.tool)
            .field("activation", &self.activation.as_str())
            .field("requires_remote", &self.requires_remote)
            .finish_non_exhaustive()
    }
}

/// Extraction rules keyed by tool name. Registration order is the tie-break
/// order when two rules activate at the same offset.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<ExtractionRule>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the locksmith and assistant rule sets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in locksmith::rules().into_iter().chain(assistant::rules()) {
            registry.register(rule);
        }
        registry
    }

    /// Add a rule. A rule for an already-registered tool replaces it in place.
    pub fn register(&mut self, rule: ExtractionRule) {
        match self.index.get(rule.tool()) {
            Some(&i) => self.rules[i] = rule,
            None => {
                self.index.insert(rule.tool.clone(), self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    pub fn get(&self, tool: &str) -> Option<&ExtractionRule> {
        self.index.get(tool).map(|&i| &self.rules[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Candidate calls plus the advisory remote flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub calls: Vec<FunctionCall>,
    pub requires_remote: bool,
}

impl Extraction {
    pub fn source(&self) -> Source {
        if self.requires_remote {
            Source::Cloud
        } else {
            Source::OnDevice
        }
    }
}

/// Runs every activated rule whose tool is in the active catalog.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    registry: Arc<RuleRegistry>,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(Arc::new(RuleRegistry::builtin()))
    }
}

impl PatternExtractor {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Produce candidate calls for `text`, ordered by where each tool is
    /// first mentioned.
    pub fn extract(&self, text: &str, tools: &[ToolSchema]) -> Extraction {
        let lowered = text.to_lowercase();

        let mut hits: Vec<(usize, usize, &ExtractionRule)> = self
            .registry
            .iter()
            .enumerate()
            .filter(|(_, rule)| tools.iter().any(|t| t.name == rule.tool()))
            .filter_map(|(order, rule)| {
                rule.activation_offset(&lowered)
                    .map(|offset| (offset, order, rule))
            })
            .collect();
        hits.sort_by_key(|&(offset, order, _)| (offset, order));

        let mut extraction = Extraction::default();
        for (_, _, rule) in hits {
            extraction.calls.push(FunctionCall {
                name: rule.tool().to_string(),
                arguments: rule.fill(text),
            });
            extraction.requires_remote |= rule.requires_remote();
        }

        debug!(
            calls = extraction.calls.len(),
            requires_remote = extraction.requires_remote,
            "pattern extraction finished"
        );
        extraction
    }
}
