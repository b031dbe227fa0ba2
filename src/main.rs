//! Scorer entry point: CLI wiring, input loading and score printing.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;

use microgrid_score::config::ScoringConfig;
use microgrid_score::io::ReadError;
use microgrid_score::io::reference::read_reference_path;
use microgrid_score::io::submission::read_submission_path;
use microgrid_score::logging;
use microgrid_score::scoring::{ScoringEngine, score_or_sentinel};

/// Parsed CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "microgrid-score",
    about = "Score a microgrid dispatch strategy submission against reference site data",
    version
)]
struct Cli {
    /// Reference data CSV (hourly profiles followed by site parameters)
    reference: PathBuf,
    /// Strategy submission CSV (one row per site and 15-minute timestep)
    submission: PathBuf,
    /// Days of the submitted week to score (overrides the config file)
    #[arg(long)]
    days: Option<usize>,
    /// Scoring configuration in TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

/// Prints the load failure and terminates.
fn exit_unreadable(err: &ReadError) -> ! {
    error!("{err}");
    println!("error: {err}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // Load config: --config file if given, then CLI overrides
    let mut config = if let Some(ref path) = cli.config {
        match ScoringConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScoringConfig::baseline()
    };

    if let Some(days) = cli.days {
        config.scoring.days = days;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("{e}");
        process::exit(1);
    }

    let sites = read_reference_path(&cli.reference, config.reference.timeseries_rows)
        .unwrap_or_else(|e| exit_unreadable(&e));
    let strategies =
        read_submission_path(&cli.submission).unwrap_or_else(|e| exit_unreadable(&e));

    let engine = ScoringEngine::new(config.weights.to_weights());
    let result = engine.score(&strategies, &sites, config.scoring.days);
    if let Err(ref e) = result {
        println!("{e}");
    }

    println!("The score is  {:?}", score_or_sentinel(&result));
}
