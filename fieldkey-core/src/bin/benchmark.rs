use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use fieldkey_core::bench::{self, BenchmarkCase, BenchmarkReport};
use fieldkey_core::{Dispatcher, DispatcherConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suite {
    Builtin,
    Stress,
}

impl Suite {
    fn cases(self) -> Vec<BenchmarkCase> {
        match self {
            Self::Builtin => bench::builtin_cases(),
            Self::Stress => bench::stress_cases(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Stress => "stress",
        }
    }
}

#[derive(Debug)]
struct Args {
    suite: Suite,
    iterations: usize,
    output: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("benchmark failed: {e:#}");
        std::process::exit(1);
    }
}

fn parse_args() -> anyhow::Result<Args> {
    let mut suite = Suite::Builtin;
    let mut iterations: usize = 1;
    let mut output: Option<PathBuf> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--suite" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --suite");
                };
                suite = match v.as_str() {
                    "builtin" => Suite::Builtin,
                    "stress" => Suite::Stress,
                    other => bail!("unknown suite: {other} (expected builtin or stress)"),
                };
            }
            "--iterations" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --iterations");
                };
                iterations = v
                    .parse::<usize>()
                    .map_err(|_| anyhow!("invalid value for --iterations"))?
                    .clamp(1, 10);
            }
            "--output" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --output");
                };
                output = Some(PathBuf::from(v));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cargo run -p fieldkey-core --bin benchmark -- \\
  [--suite builtin|stress] [--iterations <n>] [--output <file.json>]"
                );
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Args {
        suite,
        iterations,
        output,
    })
}

fn print_report(report: &BenchmarkReport) {
    println!("\n=== Benchmark Results ===\n");
    println!(
        "  {:>3} | {:<10} | {:<30} | {:>10} | {:>5} | Source",
        "#", "Difficulty", "Name", "Time (ms)", "F1"
    );
    println!(
        "  {}-+-{}-+-{}-+-{}-+-{}-+-{}",
        "-".repeat(3),
        "-".repeat(10),
        "-".repeat(30),
        "-".repeat(10),
        "-".repeat(5),
        "-".repeat(12)
    );
    for (i, case) in report.cases.iter().enumerate() {
        println!(
            "  {:>3} | {:<10} | {:<30} | {:>10.2} | {:>5.2} | {}",
            i + 1,
            case.difficulty,
            case.name,
            case.total_time_ms,
            case.f1,
            case.source
        );
    }

    println!("\n--- Summary ---");
    for tier in &report.tiers {
        println!(
            "  {:<8} avg F1={:.2}  avg time={:.2}ms  p95={:.2}ms  on-device={}/{} cloud={}/{}",
            tier.difficulty,
            tier.avg_f1,
            tier.avg_latency_ms,
            tier.p95_latency_ms,
            tier.on_device,
            tier.runs,
            tier.runs - tier.on_device,
            tier.runs
        );
    }

    let overall = &report.overall;
    let pct = |n: usize| {
        if overall.runs == 0 {
            0.0
        } else {
            100.0 * n as f64 / overall.runs as f64
        }
    };
    println!(
        "  {:<8} avg F1={:.2}  avg time={:.2}ms  total time={:.2}ms",
        "overall", overall.avg_f1, overall.avg_latency_ms, overall.total_latency_ms
    );
    println!(
        "           on-device={}/{} ({:.0}%)  cloud={}/{} ({:.0}%)",
        overall.on_device,
        overall.runs,
        pct(overall.on_device),
        overall.cloud,
        overall.runs,
        pct(overall.cloud)
    );

    println!("\n{}", "=".repeat(50));
    println!("  TOTAL SCORE: {:.1}%", report.total_score);
    println!("{}", "=".repeat(50));
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldkey=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let cases = args.suite.cases();
    println!(
        "Running FieldKey benchmark: suite={} cases={} (iterations={})",
        args.suite.name(),
        cases.len(),
        args.iterations
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let dispatcher = Dispatcher::new(DispatcherConfig::default());
    let report = runtime.block_on(bench::run_benchmark_iterations(
        &dispatcher,
        &cases,
        args.iterations,
    ));

    print_report(&report);

    if let Some(out) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;
        println!("Wrote benchmark report: {}", out.display());
    }

    Ok(())
}
