//! Replay CLI entry point.
//!
//! Loads a food catalog and a replay script, runs the script through the
//! modal state machine, and prints every rendered frame and embedder
//! callback.
//!
//! # Usage
//!
//! ```bash
//! food-lookup foods.json session.json
//! food-lookup foods.json session.json food-lookup.toml
//! food-lookup --quiet foods.json session.json    # callbacks only
//! RUST_LOG=food_lookup=debug food-lookup foods.json session.json
//! ```

use clap::Parser;
use food_lookup::lookup::{JsonCatalog, LookupWorker};
use food_lookup::replay::{ReplayDriver, Script};
use food_lookup::{initialize, observability, Action, Config, Result};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replays a scripted food-lookup modal session against a JSON catalog.
#[derive(Parser, Debug)]
#[command(name = "food-lookup", version, about)]
struct Cli {
    /// Food catalog (JSON)
    catalog: PathBuf,

    /// Replay script (JSON)
    script: PathBuf,

    /// Configuration file (TOML)
    config: Option<PathBuf>,

    /// Print only embedder callbacks, not frames
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(expand(path))?,
        None => Config::default(),
    };
    observability::init_tracing(&config);

    let catalog = JsonCatalog::from_file(expand(&cli.catalog), config.max_results)?;
    let script = Script::from_file(expand(&cli.script))?;
    tracing::info!(foods = catalog.len(), steps = script.steps.len(), "starting replay");

    let driver = ReplayDriver::new(
        LookupWorker::new(catalog),
        initialize(&config),
        chrono::Utc::now(),
    );
    let report = driver.run(&script)?;

    if cli.quiet {
        for callback in &report.callbacks {
            if let Action::FoodSelected(record) = callback {
                println!("selected {}", serde_json::to_string(record)?);
            } else {
                println!("{callback:?}");
            }
        }
    } else {
        for line in &report.transcript {
            println!("{}", line.trim_end());
        }
    }

    tracing::info!(
        lookups = report.lookups_dispatched,
        callbacks = report.callbacks.len(),
        "replay finished"
    );
    Ok(())
}

fn expand(path: &std::path::Path) -> PathBuf {
    PathBuf::from(food_lookup::infrastructure::expand_tilde(&path.to_string_lossy()))
}
