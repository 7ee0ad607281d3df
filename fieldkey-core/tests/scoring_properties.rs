//! Property-based tests for scoring, extraction and enrichment.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;

use fieldkey_core::bench::{f1, tier_score, time_score};
use fieldkey_core::tools::catalog;
use fieldkey_core::{Enricher, FunctionCall, PatternExtractor, PlaceholderSet, RuleRegistry};

// ── Strategies ─────────────────────────────────────────────────────

fn arb_call() -> impl Strategy<Value = FunctionCall> {
    (
        prop::sample::select(vec!["get_weather", "get_directions", "read_news"]),
        prop::sample::select(vec!["Paris", "London", "Tokyo", "Berlin"]),
    )
        .prop_map(|(name, city)| FunctionCall::new(name).with_arg("location", city))
}

fn arb_calls() -> impl Strategy<Value = Vec<FunctionCall>> {
    prop::collection::vec(arb_call(), 0..6)
}

fn arb_utterance() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "set", "an", "alarm", "for", "7:30", "AM", "and", "text", "Bob", "saying", "hi", "weather",
        "in", "London", "invoice", "$250", "Sarah", "Miller", "timer", "twenty", "five", "minutes",
        "jammed", "deadbolt", "remind", "me", "to", "at", "3", "PM", ",", "then", "play", "jazz",
    ]);
    prop::collection::vec(words, 0..24).prop_map(|w| w.join(" "))
}

fn arb_placeholder() -> impl Strategy<Value = Value> {
    prop::sample::select(vec!["", "Customer", "  unknown ", "N/A", "none", "Locksmith Service"])
        .prop_map(Value::from)
}

fn enricher() -> Enricher {
    Enricher::new(Arc::new(RuleRegistry::builtin()), PlaceholderSet::default())
}

// ── F1 properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn f1_is_bounded(predicted in arb_calls(), expected in arb_calls()) {
        let score = f1(&predicted, &expected);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn f1_ignores_expected_order(
        predicted in arb_calls(),
        (expected, shuffled) in arb_calls().prop_flat_map(|v| {
            let shuffled = Just(v.clone()).prop_shuffle();
            (Just(v), shuffled)
        }),
    ) {
        prop_assert_eq!(f1(&predicted, &expected), f1(&predicted, &shuffled));
    }

    #[test]
    fn f1_of_identical_lists_is_one(calls in arb_calls()) {
        prop_assert_eq!(f1(&calls, &calls), 1.0);
    }
}

// ── Score properties ───────────────────────────────────────────────

proptest! {
    #[test]
    fn tier_score_stays_in_unit_interval(
        avg_f1 in 0.0f64..=1.0,
        latency in 0.0f64..10_000.0,
        on_device in 0.0f64..=1.0,
    ) {
        let score = tier_score(avg_f1, latency, on_device);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&score));
        prop_assert!((0.0..=1.0).contains(&time_score(latency)));
    }
}

// ── Extraction and enrichment properties ───────────────────────────

proptest! {
    #[test]
    fn extraction_is_total(text in "\\PC{0,200}") {
        let extractor = PatternExtractor::default();
        let mut tools = catalog::assistant_tools();
        tools.extend(catalog::locksmith_tools());
        let out = extractor.extract(&text, &tools);
        prop_assert!(out.calls.len() <= tools.len());
    }

    #[test]
    fn extraction_only_names_offered_tools(text in arb_utterance()) {
        let extractor = PatternExtractor::default();
        let tools = catalog::select(&["set_alarm", "send_message", "generate_invoice"]);
        let out = extractor.extract(&text, &tools);
        for call in &out.calls {
            prop_assert!(tools.iter().any(|t| t.name == call.name));
        }
    }

    #[test]
    fn enrichment_is_idempotent(
        text in arb_utterance(),
        customer in arb_placeholder(),
        amount in arb_placeholder(),
    ) {
        let enricher = enricher();
        let call = FunctionCall::new("generate_invoice")
            .with_arg("customer_name", customer)
            .with_arg("amount", amount);
        let once = enricher.enrich(call, &text);
        let twice = enricher.enrich(once.clone(), &text);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn enrichment_keeps_real_values(text in arb_utterance()) {
        let enricher = enricher();
        let call = FunctionCall::new("set_alarm").with_arg("hour", 0).with_arg("minute", 45);
        let out = enricher.enrich(call, &text);
        prop_assert_eq!(&out.arguments["hour"], &Value::from(0));
        prop_assert_eq!(&out.arguments["minute"], &Value::from(45));
    }
}
