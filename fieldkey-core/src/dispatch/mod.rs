//! Routing Dispatcher: primary router first, pattern extraction as the floor.
//!
//! ```text
//! messages ──► PrimaryRouter (blocking pool, timeout)
//!                  │ ok                     │ error / panic / timeout / absent
//!                  ▼                        ▼
//!            router calls           PatternExtractor(user text)
//!                  └──────────┬─────────────┘
//!                             ▼
//!                   Enricher (per call) ──► RoutingResult
//! ```
//!
//! `route` never fails. Router errors are logged and counted, and the
//! extractor is total. Elapsed time is always measured here, at the
//! dispatcher boundary, whatever the router reports about itself.

pub mod router;

pub use router::{PrimaryRouter, RouterOutput};

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::enrich::{Enricher, PlaceholderSet};
use crate::error::FieldkeyError;
use crate::extract::{PatternExtractor, RuleRegistry};
use crate::tools::{user_text, FunctionCall, Message, RoutingResult, Source, ToolSchema};

/// Configuration for [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on a primary router call. `None` waits indefinitely.
    /// Default: 5 s.
    pub router_timeout: Option<Duration>,
    /// Values enrichment treats as unfilled. Default: [`PlaceholderSet::default`].
    pub placeholders: PlaceholderSet,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            router_timeout: Some(Duration::from_secs(5)),
            placeholders: PlaceholderSet::default(),
        }
    }
}

/// Outcome counters, shared across concurrent `route` calls.
pub struct DispatchStats {
    pub primary_ok: AtomicUsize,
    pub primary_failed: AtomicUsize,
    pub fallback_used: AtomicUsize,
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self {
            primary_ok: AtomicUsize::new(0),
            primary_failed: AtomicUsize::new(0),
            fallback_used: AtomicUsize::new(0),
        }
    }
}

impl DispatchStats {
    pub fn reset(&self) {
        self.primary_ok.store(0, Ordering::Relaxed);
        self.primary_failed.store(0, Ordering::Relaxed);
        self.fallback_used.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            primary_ok: self.primary_ok.load(Ordering::Relaxed),
            primary_failed: self.primary_failed.load(Ordering::Relaxed),
            fallback_used: self.fallback_used.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    pub primary_ok: usize,
    pub primary_failed: usize,
    pub fallback_used: usize,
}

pub struct Dispatcher {
    router: Option<Arc<dyn PrimaryRouter>>,
    extractor: PatternExtractor,
    enricher: Enricher,
    config: DispatcherConfig,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Dispatcher over the built-in rule registry, with no primary router.
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_registry(config, Arc::new(RuleRegistry::builtin()))
    }

    /// Extraction and enrichment share `registry`.
    pub fn with_registry(config: DispatcherConfig, registry: Arc<RuleRegistry>) -> Self {
        Self {
            router: None,
            extractor: PatternExtractor::new(Arc::clone(&registry)),
            enricher: Enricher::new(registry, config.placeholders.clone()),
            config,
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn with_router(mut self, router: Arc<dyn PrimaryRouter>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn router_name(&self) -> Option<&str> {
        self.router.as_deref().map(|r| r.name())
    }

    pub fn extractor(&self) -> &PatternExtractor {
        &self.extractor
    }

    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Route a conversation to function calls. Never fails.
    pub async fn route(&self, messages: &[Message], tools: &[ToolSchema]) -> RoutingResult {
        let started = Instant::now();
        let text = user_text(messages);

        let (calls, source) = match self.call_primary(messages, tools).await {
            Some(output) => {
                self.stats.primary_ok.fetch_add(1, Ordering::Relaxed);
                (output.function_calls, output.source)
            }
            None => {
                self.stats.fallback_used.fetch_add(1, Ordering::Relaxed);
                let extraction = self.extractor.extract(&text, tools);
                info!(
                    calls = extraction.calls.len(),
                    requires_remote = extraction.requires_remote,
                    "pattern fallback engaged"
                );
                let source = extraction.source();
                (extraction.calls, source)
            }
        };

        let function_calls: Vec<FunctionCall> = calls
            .into_iter()
            .map(|call| self.enricher.enrich(call, &text))
            .collect();
        let total_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        info!(
            source = %source,
            calls = function_calls.len(),
            elapsed_ms = total_time_ms,
            "routed"
        );

        RoutingResult {
            function_calls,
            total_time_ms,
            source,
        }
    }

    /// `None` when there is no router or it failed in any way.
    async fn call_primary(&self, messages: &[Message], tools: &[ToolSchema]) -> Option<RouterOutput> {
        let router = self.router.clone()?;
        let name = router.name().to_string();
        match self.invoke(router, messages, tools).await {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(router = %name, error = %e, "primary router failed");
                self.stats.primary_failed.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn invoke(
        &self,
        router: Arc<dyn PrimaryRouter>,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<RouterOutput, FieldkeyError> {
        let messages = messages.to_vec();
        let tools = tools.to_vec();

        // On timeout the task is detached. Routers that own a process or a
        // connection stop it at the same deadline; see `PrimaryRouter`.
        let task = tokio::task::spawn_blocking(move || router.route(&messages, &tools));
        let joined = match self.config.router_timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                FieldkeyError::RouterUnavailable(format!("timed out after {} ms", limit.as_millis()))
            })?,
            None => task.await,
        };

        joined
            .map_err(|e| FieldkeyError::RouterUnavailable(format!("task aborted: {e}")))?
            .map_err(|e| FieldkeyError::RouterUnavailable(format!("{e:#}")))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("router", &self.router_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::catalog;

    struct Echo(Source);

    impl PrimaryRouter for Echo {
        fn route(&self, _: &[Message], _: &[ToolSchema]) -> anyhow::Result<RouterOutput> {
            Ok(RouterOutput {
                function_calls: vec![FunctionCall::new("get_weather").with_arg("location", "unknown")],
                total_time_ms: Some(0.001),
                source: self.0,
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct Broken;

    impl PrimaryRouter for Broken {
        fn route(&self, _: &[Message], _: &[ToolSchema]) -> anyhow::Result<RouterOutput> {
            anyhow::bail!("model not loaded")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn router_output_is_enriched_and_keeps_its_source() {
        let dispatcher = Dispatcher::default().with_router(Arc::new(Echo(Source::Cloud)));
        let result = dispatcher
            .route(
                &[Message::user("What is the weather in Berlin?")],
                &catalog::select(&["get_weather"]),
            )
            .await;
        assert_eq!(result.source, Source::Cloud);
        assert_eq!(result.function_calls[0].arguments["location"], "Berlin");
        assert_eq!(dispatcher.stats().primary_ok, 1);
    }

    #[tokio::test]
    async fn router_error_falls_back() {
        let dispatcher = Dispatcher::default().with_router(Arc::new(Broken));
        let result = dispatcher
            .route(
                &[Message::user("Set an alarm for 10 AM.")],
                &catalog::select(&["set_alarm"]),
            )
            .await;
        assert_eq!(result.source, Source::OnDevice);
        assert_eq!(result.function_calls.len(), 1);
        let stats = dispatcher.stats();
        assert_eq!((stats.primary_failed, stats.fallback_used), (1, 1));
    }

    #[tokio::test]
    async fn no_router_uses_extractor() {
        let dispatcher = Dispatcher::default();
        assert!(dispatcher.router_name().is_none());
        let result = dispatcher
            .route(&[Message::user("hello there")], &catalog::assistant_tools())
            .await;
        assert!(result.function_calls.is_empty());
        assert_eq!(result.source, Source::OnDevice);
        assert!(result.total_time_ms >= 0.0);
        assert_eq!(dispatcher.stats().primary_failed, 0);
    }
}
