#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Silk Road contests.

mod scenario;
mod session;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use silk_road_system_contest::GeneratorConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{scenario::Scenario, session::OutputFormat};

/// Plays Silk Road contests day by day.
#[derive(Debug, Parser)]
#[command(name = "silk-road", version)]
struct Cli {
    /// Log filter directive, for example `debug` or `silk_road_world=debug`.
    /// Falls back to `RUST_LOG`, then to `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays the days listed in a TOML scenario file.
    Run {
        /// Path to the scenario file.
        scenario: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Plays a randomly generated scenario.
    Random {
        /// Number of days to generate.
        #[arg(long, default_value_t = 10)]
        days: usize,

        /// Seed of the scenario generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Largest position an entity may be placed at.
        #[arg(long, default_value_t = 40)]
        max_position: u32,

        /// Largest amount a generated store opens with.
        #[arg(long, default_value_t = 100)]
        max_funds: u32,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Output format of the day reports.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Draws the board after every day.
    #[arg(long)]
    show_board: bool,
}

/// Entry point for the Silk Road command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let (scenario, output) = match cli.mode {
        Mode::Run { scenario, output } => (Scenario::load(&scenario)?, output),
        Mode::Random {
            days,
            seed,
            max_position,
            max_funds,
            output,
        } => {
            info!(seed, days, "generating scenario");
            let generator = GeneratorConfig {
                days,
                max_position,
                max_funds,
            };
            (Scenario::generated(seed, &generator), output)
        }
    };

    let stdout = io::stdout();
    session::play(&scenario, output.format, output.show_board, stdout.lock())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level `{level}`"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
