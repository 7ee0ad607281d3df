//! `fieldkey`: command-line host for the FieldKey core.
//!
//! One-shot subcommands map onto the core boundaries. `shell` keeps a single
//! assistant alive and reads the same subcommands from stdin, one per line,
//! so history accumulates across requests.

mod router;
mod settings;
mod state;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use fieldkey_core::exec::round1;
use fieldkey_core::TranscriptionOutcome;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use settings::{apply_env_overrides, default_settings_path, load_settings};
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "fieldkey", version, about = "FieldKey voice-to-action assistant")]
struct Cli {
    /// Settings file (defaults to the per-user config location).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// One line typed into `fieldkey shell`.
#[derive(Parser, Debug)]
#[command(name = "fieldkey", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Route, execute and record a text request.
    Route {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        utterance: Vec<String>,
    },

    /// Transcribe an audio file.
    Transcribe { file: PathBuf },

    /// Transcribe, then route and execute the transcript.
    Voice { file: PathBuf },

    /// List executed calls.
    History {
        /// Only calls to this tool.
        #[arg(long)]
        tool: Option<String>,
    },

    /// Print the active tool catalog.
    Tools,

    /// Report speech model availability.
    Health,

    /// Read commands from stdin, one per line.
    Shell,
}

async fn read_upload(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let audio = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.wav")
        .to_string();
    Ok((audio, filename))
}

async fn execute(state: &AppState, command: &Command) -> anyhow::Result<Value> {
    let assistant = &state.assistant;
    let out = match command {
        Command::Route { utterance } => {
            let text = utterance.join(" ");
            if text.trim().is_empty() {
                bail!("route expects an utterance");
            }
            serde_json::to_value(assistant.handle_text(&text).await)?
        }
        Command::Transcribe { file } => {
            let (audio, filename) = read_upload(file).await?;
            let outcome = assistant.transcriber().transcribe(audio, &filename).await;
            match outcome {
                TranscriptionOutcome::Transcribed { text, elapsed_ms } => {
                    json!({ "text": text, "latency_ms": round1(elapsed_ms) })
                }
                TranscriptionOutcome::Unavailable => {
                    json!({ "error": "speech model not available", "text": "" })
                }
                TranscriptionOutcome::Failed { error } => {
                    json!({ "error": error, "text": "" })
                }
            }
        }
        Command::Voice { file } => {
            let (audio, filename) = read_upload(file).await?;
            serde_json::to_value(assistant.process_voice(audio, &filename).await)?
        }
        Command::History { tool } => {
            let page = assistant.executor().history().query(tool.as_deref());
            json!({ "history": page.entries, "count": page.count })
        }
        Command::Tools => serde_json::to_value(assistant.tools())?,
        Command::Health => {
            let whisper_available = state.slot.preload().await.unwrap_or(false);
            json!({
                "status": "ok",
                "backend": state.settings.model_backend,
                "whisper_available": whisper_available,
                "router": assistant.dispatcher().router_name(),
                "settings_path": state.settings_path.display().to_string(),
            })
        }
        Command::Shell => bail!("shell cannot be nested"),
    };
    Ok(out)
}

async fn run_shell(state: &AppState) -> anyhow::Result<()> {
    // Load the model while the first line is being typed.
    drop(state.slot.preload());
    info!("fieldkey shell ready; one command per line");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.first() {
            None => continue,
            Some(&("exit" | "quit")) => break,
            Some(_) => {}
        }
        let reply = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => execute(state, &parsed.command).await,
            Err(e) => Err(anyhow!("{}", e.render().to_string().trim_end())),
        };
        match reply {
            Ok(value) => println!("{value}"),
            Err(e) => {
                warn!(error = %e, "shell command failed");
                println!("{}", json!({ "error": format!("{e:#}") }));
            }
        }
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fieldkey=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Settings ──────────────────────────────────────────────────────────
    let settings_path = cli.settings.unwrap_or_else(default_settings_path);
    let mut settings = load_settings(&settings_path);
    apply_env_overrides(&mut settings);
    info!(
        settings_path = ?settings_path,
        backend = %settings.model_backend,
        router = ?settings.router_command,
        history_capacity = settings.history_capacity,
        "settings loaded"
    );

    let state = AppState::new(settings, settings_path);

    match &cli.command {
        Command::Shell => run_shell(&state).await,
        command => {
            let out = execute(&state, command).await?;
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("fieldkey: {e:#}");
        std::process::exit(1);
    }
}
