//! `buildgraph` CLI entry-point.
//!
//! Available sub-commands:
//! - `plan` — resolve and print a target's execution plan.
//! - `run`  — execute one or more targets from a manifest.

mod manifest;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use engine::{RunConfig, Runner, TargetOutcome};
use manifest::Manifest;

#[derive(Parser)]
#[command(
    name = "buildgraph",
    about = "Dependency-ordered build target runner",
    version
)]
struct Cli {
    /// Path to the build manifest JSON file.
    #[arg(long, default_value = "build.json", global = true)]
    manifest: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a target's dependency closure and print the execution plan.
    Plan {
        /// Target to plan for.
        target: String,
    },
    /// Execute the requested targets in dependency order.
    Run {
        /// Targets to run; several requests share one memoization set.
        #[arg(required = true)]
        targets: Vec<String>,
        /// Run parameter, `key=value`; repeatable.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("cannot read manifest {}", cli.manifest.display()))?;
    let registry = Manifest::from_json(&content)
        .with_context(|| format!("invalid manifest {}", cli.manifest.display()))?
        .into_registry()
        .context("manifest declares an invalid target graph")?;

    match cli.command {
        Command::Plan { target } => {
            let plan = registry.resolve_closure(&target)?;
            for name in plan {
                println!("{name}");
            }
        }
        Command::Run { targets, params } => {
            let config: RunConfig = params
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();

            let requested: Vec<&str> = targets.iter().map(String::as_str).collect();
            info!("running {requested:?}");

            match Runner::new(&registry).run_all(&requested, &config).await {
                Ok(report) => {
                    for (name, outcome) in &report.outcomes {
                        match outcome {
                            TargetOutcome::Executed => println!("✅ {name}"),
                            TargetOutcome::SkippedCondition => println!("⏭  {name} (condition)"),
                            TargetOutcome::SkippedMemoized => println!("⏭  {name} (already ran)"),
                        }
                    }
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    // Surface the body's own failure text when there is one.
                    if let engine::EngineError::TargetFailed { source, .. } = &e {
                        eprintln!("   caused by: {source}");
                    }
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
