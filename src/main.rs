//! Batch replay runner.
//!
//! Loads a level file and a replay file, checks the replay metadata against
//! the level, runs every recorded command and prints the determinism hash:
//!
//! ```text
//! voxfall-replay --replay demos/basin.replay.json --level demos/basin.level.json
//! DeterminismHash: voxfall-dh-2:<hex>
//! ```
//!
//! Exit codes: 0 success, 1 runtime failure (I/O, parse, validation,
//! simulation or hash mismatch), 2 invalid arguments.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use voxfall::core::Level;
use voxfall::replay::{level_content_hash, Replay, ReplayRunner};

#[derive(Parser, Debug)]
#[command(
    name = "voxfall-replay",
    version,
    about = "Run a voxfall replay and print its determinism hash",
    long_about = None
)]
struct Cli {
    /// Replay file (JSON)
    #[arg(long)]
    replay: PathBuf,
    /// Level file (JSON) the replay was recorded on
    #[arg(long)]
    level: PathBuf,
    /// Also write the hash line to this file
    #[arg(long)]
    out: Option<PathBuf>,
    /// Fail unless the final hash equals this value
    #[arg(long)]
    expect: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage errors exit with code 2 inside clap.
    let cli = Cli::parse();

    match run(&cli) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let level_bytes = fs::read(&cli.level)
        .with_context(|| format!("failed to read level {}", cli.level.display()))?;
    let level: Level = serde_json::from_slice(&level_bytes)
        .with_context(|| format!("failed to parse level {}", cli.level.display()))?;

    let replay_text = fs::read_to_string(&cli.replay)
        .with_context(|| format!("failed to read replay {}", cli.replay.display()))?;
    let replay = Replay::from_json(&replay_text)
        .with_context(|| format!("failed to parse replay {}", cli.replay.display()))?;

    let runner = ReplayRunner::new(&level, level_content_hash(&level_bytes));
    let outcome = runner.run(&replay).context("replay failed")?;
    info!(
        "{} ticks, status {:?}, score {}",
        outcome.ticks_run, outcome.state.status, outcome.state.score
    );

    if let Some(expected) = &cli.expect {
        outcome.verify(expected)?;
    }

    let line = outcome.hash_line();
    if let Some(out) = &cli.out {
        fs::write(out, format!("{line}\n"))
            .with_context(|| format!("failed to write {}", out.display()))?;
    }
    Ok(line)
}
