//! Primary router backed by an external command.
//!
//! The command receives `{"messages": [...], "tools": [...]}` on stdin and
//! must print one `RouterOutput` JSON object on stdout. A router that is
//! still running at its deadline is killed.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use fieldkey_core::{Message, PrimaryRouter, RouterOutput, ToolSchema};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::settings::AppSettings;

/// How often a running router is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Serialize)]
struct RouterRequest<'a> {
    messages: &'a [Message],
    tools: &'a [ToolSchema],
}

#[derive(Debug, Clone)]
pub struct CommandRouter {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandRouter {
    /// `command_line` is split on whitespace; the first word is the program.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
            timeout: None,
        })
    }

    /// Kill the router if it has not exited after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Exit status, or `None` once the deadline has passed and the child was killed.
    fn wait(&self, child: &mut Child) -> anyhow::Result<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return Ok(Some(child.wait().context("waiting for router")?));
        };
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().context("waiting for router")? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain(mut pipe: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

impl PrimaryRouter for CommandRouter {
    fn route(&self, messages: &[Message], tools: &[ToolSchema]) -> anyhow::Result<RouterOutput> {
        let request = serde_json::to_vec(&RouterRequest { messages, tools })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning router `{}`", self.program))?;

        let mut stdin = child.stdin.take().ok_or_else(|| anyhow!("router stdin unavailable"))?;
        let stdout = child.stdout.take().ok_or_else(|| anyhow!("router stdout unavailable"))?;
        let stderr = child.stderr.take().ok_or_else(|| anyhow!("router stderr unavailable"))?;

        // Each pipe gets its own thread so a full buffer on one side never stalls the other.
        let writer = thread::spawn(move || stdin.write_all(&request));
        let out_reader = thread::spawn(move || drain(stdout));
        let err_reader = thread::spawn(move || drain(stderr));

        let Some(status) = self.wait(&mut child)? else {
            // Pipe threads finish on their own once the killed process's pipes close.
            warn!(router = %self.program, "router killed at its deadline");
            bail!(
                "router timed out after {} ms",
                self.timeout.map_or(0, |t| t.as_millis())
            );
        };

        if let Ok(Err(e)) = writer.join() {
            // A router may answer without reading its whole input.
            debug!(error = %e, "router closed stdin early");
        }
        let stdout = out_reader
            .join()
            .map_err(|_| anyhow!("router stdout reader panicked"))?
            .context("reading router stdout")?;
        let stderr = err_reader
            .join()
            .map_err(|_| anyhow!("router stderr reader panicked"))?
            .context("reading router stderr")?;

        if !status.success() {
            bail!(
                "router exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            );
        }
        debug!(bytes = stdout.len(), "router replied");

        serde_json::from_slice(&stdout).context("router printed invalid JSON")
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Router configured by `settings`, if any. It shares the dispatcher's deadline.
pub fn create_router(settings: &AppSettings) -> Option<Arc<dyn PrimaryRouter>> {
    let router = CommandRouter::parse(settings.router_command.as_deref()?)?
        .with_timeout(Duration::from_millis(settings.router_timeout_ms));
    info!(program = %router.program, timeout_ms = settings.router_timeout_ms, "primary router configured");
    Some(Arc::new(router))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn sh(script: impl Into<String>) -> CommandRouter {
        CommandRouter {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            timeout: None,
        }
    }

    #[test]
    fn parse_splits_program_and_args() {
        let router = CommandRouter::parse("  python3 router.py --fast ").unwrap();
        assert_eq!(router.program, "python3");
        assert_eq!(router.args, ["router.py", "--fast"]);
        assert_eq!(router.timeout, None);
        assert!(CommandRouter::parse("   ").is_none());
    }

    #[test]
    fn no_command_means_no_router() {
        assert!(create_router(&AppSettings::default()).is_none());
    }

    #[test]
    fn configured_router_runs_the_command() {
        let settings = AppSettings {
            router_command: Some("./route.sh".into()),
            router_timeout_ms: 750,
            ..AppSettings::default()
        };
        let router = create_router(&settings).unwrap();
        assert_eq!(router.name(), "./route.sh");
    }

    #[test]
    fn missing_program_is_an_error() {
        let router = CommandRouter::parse("fieldkey-router-that-does-not-exist").unwrap();
        let err = router.route(&[Message::user("hi")], &[]).unwrap_err();
        assert!(err.to_string().contains("spawning router"));
    }

    #[cfg(unix)]
    #[test]
    fn reads_router_output_from_stdout() {
        let router = sh(r#"cat >/dev/null; echo '{"function_calls":[{"name":"get_weather","arguments":{"location":"Paris"}}],"source":"cloud"}'"#);
        let out = router.route(&[Message::user("weather in Paris")], &[]).unwrap();
        assert_eq!(out.function_calls[0].name, "get_weather");
        assert_eq!(out.source, fieldkey_core::Source::Cloud);
    }

    #[cfg(unix)]
    #[test]
    fn failing_router_reports_stderr() {
        let router = sh("cat >/dev/null; echo 'model offline' >&2; exit 3");
        let err = router.route(&[Message::user("hi")], &[]).unwrap_err();
        assert!(err.to_string().contains("model offline"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn router_is_killed_at_its_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let router = sh(format!("cat >/dev/null; sleep 1; touch '{}'", marker.display()))
            .with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let err = router.route(&[Message::user("hi")], &[]).unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
        assert!(started.elapsed() < Duration::from_millis(900), "{:?}", started.elapsed());

        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists(), "router kept running after its deadline");
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dispatcher_timeout_stops_the_router_and_falls_back() {
        use fieldkey_core::tools::catalog;
        use fieldkey_core::{Dispatcher, DispatcherConfig, Source};

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let router = sh(format!("cat >/dev/null; sleep 1; touch '{}'", marker.display()))
            .with_timeout(Duration::from_millis(100));
        let config = DispatcherConfig {
            router_timeout: Some(Duration::from_millis(100)),
            ..DispatcherConfig::default()
        };
        let dispatcher = Dispatcher::new(config).with_router(Arc::new(router));

        let result = dispatcher
            .route(
                &[Message::user("What's the weather like in London?")],
                &catalog::select(&["get_weather"]),
            )
            .await;
        assert_eq!(result.source, Source::OnDevice);
        assert_eq!(result.function_calls[0].arguments["location"], "London");
        assert_eq!(dispatcher.stats().primary_failed, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "router kept running after the dispatcher gave up");
    }

    #[cfg(unix)]
    #[test]
    fn chatty_router_with_large_request_does_not_deadlock() {
        // 128 KiB on stderr before reading a request larger than a pipe buffer.
        let router = sh(r#"head -c 131072 /dev/zero >&2; cat >/dev/null; echo '{"function_calls":[],"source":"on-device"}'"#)
            .with_timeout(Duration::from_secs(10));
        let long_text = "rekey the front door ".repeat(10_000);

        let started = Instant::now();
        let out = router.route(&[Message::user(long_text)], &[]).unwrap();
        assert!(out.function_calls.is_empty());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
