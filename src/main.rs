use anyhow::{Context, Result};
use clap::Parser;
use snake_neuroevo::{Population, SimConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Headless trainer: evolves snakes for a number of generations and prints
/// the final leader as JSON.
#[derive(Parser, Debug)]
#[command(name = "snake-neuroevo")]
#[command(version)]
#[command(about = "Evolve snake-playing neural networks with a genetic algorithm")]
struct Cli {
    /// JSON run configuration; defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generations to run
    #[arg(short, long, default_value = "50")]
    generations: u64,

    /// Seed overriding the one in the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Advance agents on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.parallel |= cli.parallel;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut population = Population::new(config).context("building population")?;
    let started = Instant::now();
    for _ in 0..cli.generations {
        population.run_generation();
    }

    tracing::info!(
        generations = cli.generations,
        best = population.best_fitness(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "training finished"
    );
    println!("{}", serde_json::to_string_pretty(&population.leader_view())?);
    Ok(())
}
