//! Skirmish simulator CLI: runs the agent against the synthetic arena.
//!
//! Usage:
//!   skirmish-sim run --seed 7 --frames 1800
//!   skirmish-sim --config sim.json batch --seed-start 1 --seed-count 32
//!   RUST_LOG=skirmish_core=debug skirmish-sim run --frames 100

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skirmish_sim::runner::{run_batch, run_headless, RunSummary, SimConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skirmish-sim")]
#[command(about = "Run the Skirmish agent headless against a synthetic arena")]
struct Cli {
    /// JSON file with agent and scene options
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one seeded episode and print its JSON summary
    Run {
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 1_800)]
        frames: u64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run many seeds in parallel and print one summary line per seed
    Batch {
        #[arg(long, default_value_t = 1)]
        seed_start: u64,
        #[arg(long, default_value_t = 16)]
        seed_count: u64,
        #[arg(long, default_value_t = 1_800)]
        frames: u64,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the default configuration
    DefaultConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Cli { config, command } = Cli::parse();
    let config = match config {
        Some(path) => SimConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };

    match command {
        Commands::Run {
            seed,
            frames,
            output,
        } => {
            let summary = run_headless(&config, seed, frames)
                .with_context(|| format!("episode with seed {seed} failed"))?;
            let json = serde_json::to_string_pretty(&summary)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Commands::Batch {
            seed_start,
            seed_count,
            frames,
            jobs,
        } => {
            let seeds: Vec<u64> = (seed_start..seed_start + seed_count).collect();
            let results = match jobs {
                Some(jobs) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(jobs)
                        .build()
                        .context("failed to build rayon threadpool")?;
                    pool.install(|| run_batch(&config, &seeds, frames))
                }
                None => run_batch(&config, &seeds, frames),
            };

            let mut summaries: Vec<RunSummary> = Vec::with_capacity(results.len());
            for (seed, result) in seeds.iter().zip(results) {
                let summary = result.with_context(|| format!("episode with seed {seed} failed"))?;
                println!("{}", serde_json::to_string(&summary)?);
                summaries.push(summary);
            }
            print_totals(&summaries);
        }
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn print_totals(summaries: &[RunSummary]) {
    if summaries.is_empty() {
        return;
    }
    let episodes = summaries.len() as f64;
    let hits: u64 = summaries.iter().map(|s| s.hits).sum();
    let shots: u64 = summaries.iter().map(|s| s.shots).sum();
    let score: f64 = summaries.iter().map(|s| s.score).sum();
    eprintln!(
        "{} episodes: mean score {:.1}, mean hits {:.1}, accuracy {:.3}",
        summaries.len(),
        score / episodes,
        hits as f64 / episodes,
        if shots == 0 { 0.0 } else { hits as f64 / shots as f64 }
    );
}
