//! # AntDir Runtime
//!
//! Entry point for the rollout binary. Logging goes to stderr and is
//! filtered with `RUST_LOG` (default `info`), so `--json` output on stdout
//! stays machine readable.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{Options, Policy};

/// Roll out episodes of the directional ant environment.
#[derive(Parser, Debug)]
#[command(name = "antdir", version, about)]
struct Cli {
    /// JSON file overriding environment configuration fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of tasks to sample.
    #[arg(long, default_value_t = 2)]
    tasks: usize,

    /// Episodes to run per task.
    #[arg(long, default_value_t = 1)]
    episodes: usize,

    /// Episode length limit; defaults to the configured value.
    #[arg(long)]
    max_steps: Option<usize>,

    /// Seed for task sampling, reset noise and the random policy.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Policy::Random)]
    policy: Policy,

    /// Print the rollout summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        config: cli.config,
        tasks: cli.tasks,
        episodes: cli.episodes,
        max_steps: cli.max_steps,
        seed: cli.seed,
        policy: cli.policy,
    };
    let summary = app::run(&options)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
