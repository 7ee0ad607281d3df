//! Benchmark Evaluator: set-matching F1 per case and a weighted composite
//! score across difficulty tiers.
//!
//! ```text
//! BenchmarkCase ──► Dispatcher::route ──► f1(predicted, expected)
//!                                               │
//!                        per-tier avg F1 / latency / on-device ratio
//!                                               │
//!                    Σ weight × (0.60·F1 + 0.15·time + 0.25·on-device)
//! ```

pub mod cases;

pub use cases::{builtin_cases, stress_cases};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, Instrument};

use crate::dispatch::Dispatcher;
use crate::tools::{ExpectedCall, FunctionCall, Message, Source, ToolSchema};

/// Latency at or above which a tier earns no time credit.
pub const TIME_BASELINE_MS: f64 = 500.0;

const F1_WEIGHT: f64 = 0.60;
const TIME_WEIGHT: f64 = 0.15;
const ON_DEVICE_WEIGHT: f64 = 0.25;

// ── Cases ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Share of the composite score carried by this tier.
    pub fn weight(self) -> f64 {
        match self {
            Self::Easy => 0.20,
            Self::Medium => 0.30,
            Self::Hard => 0.50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkCase {
    pub name: String,
    pub difficulty: Difficulty,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSchema>,
    pub expected_calls: Vec<ExpectedCall>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Scalar equality used for scoring: strings compare trimmed and
/// case-insensitive, numbers by value (`72 == 72.0`), anything else exactly.
pub fn values_match(predicted: &Value, expected: &Value) -> bool {
    match (predicted, expected) {
        (Value::String(p), Value::String(e)) => p.trim().to_lowercase() == e.trim().to_lowercase(),
        (Value::Number(p), Value::Number(e)) => match (p.as_f64(), e.as_f64()) {
            (Some(p), Some(e)) => p == e,
            _ => p == e,
        },
        _ => predicted == expected,
    }
}

/// Same tool name and every expected argument present with a matching
/// value. Extra predicted arguments are ignored.
pub fn call_matches(predicted: &FunctionCall, expected: &ExpectedCall) -> bool {
    predicted.name == expected.name
        && expected.arguments.iter().all(|(key, want)| {
            predicted
                .arguments
                .get(key)
                .is_some_and(|got| values_match(got, want))
        })
}

/// Number of expected calls matched one-to-one, greedily in expected order.
pub fn matched_count(predicted: &[FunctionCall], expected: &[ExpectedCall]) -> usize {
    let mut used = vec![false; predicted.len()];
    let mut matched = 0;
    for exp in expected {
        let hit = predicted
            .iter()
            .enumerate()
            .position(|(i, pred)| !used[i] && call_matches(pred, exp));
        if let Some(i) = hit {
            used[i] = true;
            matched += 1;
        }
    }
    matched
}

/// `(precision, recall)`; both `1.0` when both sides are empty.
pub fn precision_recall(predicted: &[FunctionCall], expected: &[ExpectedCall]) -> (f64, f64) {
    match (predicted.is_empty(), expected.is_empty()) {
        (true, true) => (1.0, 1.0),
        (true, false) | (false, true) => (0.0, 0.0),
        (false, false) => {
            let matched = matched_count(predicted, expected) as f64;
            (
                matched / predicted.len() as f64,
                matched / expected.len() as f64,
            )
        }
    }
}

/// Set-matching F1 between predicted and expected calls.
pub fn f1(predicted: &[FunctionCall], expected: &[ExpectedCall]) -> f64 {
    let (p, r) = precision_recall(predicted, expected);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// `max(0, 1 - latency / 500 ms)`.
pub fn time_score(avg_latency_ms: f64) -> f64 {
    (1.0 - avg_latency_ms / TIME_BASELINE_MS).max(0.0)
}

pub fn tier_score(avg_f1: f64, avg_latency_ms: f64, on_device_ratio: f64) -> f64 {
    F1_WEIGHT * avg_f1 + TIME_WEIGHT * time_score(avg_latency_ms) + ON_DEVICE_WEIGHT * on_device_ratio
}

/// Composite score in percent. Tiers with no results contribute nothing and
/// the remaining weights are not rescaled.
pub fn composite_score(results: &[CaseResult]) -> f64 {
    summarize_tiers(results)
        .iter()
        .map(|tier| tier.difficulty.weight() * tier.tier_score)
        .sum::<f64>()
        * 100.0
}

// ── Reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub difficulty: Difficulty,
    pub iteration: usize,
    pub total_time_ms: f64,
    pub f1: f64,
    pub source: Source,
    pub predicted: Vec<FunctionCall>,
    pub expected: Vec<ExpectedCall>,
}

impl CaseResult {
    pub fn is_on_device(&self) -> bool {
        self.source == Source::OnDevice
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub difficulty: Difficulty,
    pub runs: usize,
    pub avg_f1: f64,
    pub avg_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub on_device: usize,
    pub on_device_ratio: f64,
    pub time_score: f64,
    pub tier_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub runs: usize,
    pub avg_f1: f64,
    pub avg_latency_ms: f64,
    pub total_latency_ms: f64,
    pub on_device: usize,
    pub cloud: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub iterations: usize,
    pub cases: Vec<CaseResult>,
    pub tiers: Vec<TierSummary>,
    pub overall: OverallSummary,
    pub total_score: f64,
}

impl BenchmarkReport {
    pub fn from_results(cases: Vec<CaseResult>, iterations: usize) -> Self {
        Self {
            iterations,
            tiers: summarize_tiers(&cases),
            overall: summarize_overall(&cases),
            total_score: composite_score(&cases),
            cases,
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// One summary per tier that has at least one result, in easy/medium/hard
/// order.
pub fn summarize_tiers(results: &[CaseResult]) -> Vec<TierSummary> {
    Difficulty::ALL
        .into_iter()
        .filter_map(|difficulty| {
            let group: Vec<&CaseResult> = results
                .iter()
                .filter(|r| r.difficulty == difficulty)
                .collect();
            if group.is_empty() {
                return None;
            }
            let latencies: Vec<f64> = group.iter().map(|r| r.total_time_ms).collect();
            let avg_f1 = mean(group.iter().map(|r| r.f1));
            let avg_latency_ms = mean(latencies.iter().copied());
            let on_device = group.iter().filter(|r| r.is_on_device()).count();
            let on_device_ratio = on_device as f64 / group.len() as f64;
            Some(TierSummary {
                difficulty,
                runs: group.len(),
                avg_f1,
                avg_latency_ms,
                p50_latency_ms: percentile(&latencies, 0.50),
                p95_latency_ms: percentile(&latencies, 0.95),
                on_device,
                on_device_ratio,
                time_score: time_score(avg_latency_ms),
                tier_score: tier_score(avg_f1, avg_latency_ms, on_device_ratio),
            })
        })
        .collect()
}

pub fn summarize_overall(results: &[CaseResult]) -> OverallSummary {
    let on_device = results.iter().filter(|r| r.is_on_device()).count();
    OverallSummary {
        runs: results.len(),
        avg_f1: mean(results.iter().map(|r| r.f1)),
        avg_latency_ms: mean(results.iter().map(|r| r.total_time_ms)),
        total_latency_ms: results.iter().map(|r| r.total_time_ms).sum(),
        on_device,
        cloud: results.len() - on_device,
    }
}

// ── Runner ───────────────────────────────────────────────────────────────────

/// Route every case once and score it.
pub async fn run_benchmark(dispatcher: &Dispatcher, cases: &[BenchmarkCase]) -> BenchmarkReport {
    run_benchmark_iterations(dispatcher, cases, 1).await
}

/// Route every case `iterations` times. All runs count toward the score.
pub async fn run_benchmark_iterations(
    dispatcher: &Dispatcher,
    cases: &[BenchmarkCase],
    iterations: usize,
) -> BenchmarkReport {
    let iterations = iterations.max(1);
    let total = cases.len();
    let mut results = Vec::with_capacity(total * iterations);

    for iteration in 1..=iterations {
        for (i, case) in cases.iter().enumerate() {
            let span = info_span!(
                "benchmark_case",
                case = %case.name,
                difficulty = %case.difficulty,
                iteration
            );
            let routed = dispatcher
                .route(&case.messages, &case.tools)
                .instrument(span)
                .await;
            let score = f1(&routed.function_calls, &case.expected_calls);
            info!(
                index = i + 1,
                total,
                case = %case.name,
                f1 = score,
                elapsed_ms = routed.total_time_ms,
                source = %routed.source,
                "benchmark case scored"
            );
            results.push(CaseResult {
                name: case.name.clone(),
                difficulty: case.difficulty,
                iteration,
                total_time_ms: routed.total_time_ms,
                f1: score,
                source: routed.source,
                predicted: routed.function_calls,
                expected: case.expected_calls.clone(),
            });
        }
    }

    BenchmarkReport::from_results(results, iterations)
}
