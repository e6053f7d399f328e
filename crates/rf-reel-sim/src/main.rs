//! Command line batch simulator
//!
//! Usage:
//!   rf-reel-sim crates/rf-reel-engine/games --game sugar-tumble -n 1000000
//!   rf-reel-sim games/ways.yaml --game 1002 --seed 7 --json

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rf_reel_engine::{GameCatalog, GameRef, LogicRegistry, RunMode};
use rf_reel_sim::{SimOptions, simulate};

#[derive(Parser)]
#[command(name = "rf-reel-sim", about = "Parallel reel game simulator")]
struct Cli {
    /// Game setting files or directories (.yaml, .yml, .json)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Game id or name
    #[arg(short, long)]
    game: String,

    /// Number of spins
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    spins: u64,

    /// Worker threads (defaults to the CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Base seed; worker w uses seed + w
    #[arg(short, long)]
    seed: Option<u64>,

    /// Index into the game's bet units
    #[arg(short, long, default_value_t = 0)]
    bet_mode: usize,

    /// Bankroll in bets for the player lineage
    #[arg(long, default_value_t = 100)]
    init_bets: i64,

    /// Keep screens and snapshots for every act (slow)
    #[arg(long)]
    audit: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = GameCatalog::load_paths(&cli.paths).context("Failed to load game settings")?;
    let registry = LogicRegistry::builtin().context("Failed to build logic registry")?;

    let mut options = SimOptions::default()
        .with_spins(cli.spins)
        .with_bet_mode(cli.bet_mode)
        .with_init_bets(cli.init_bets);
    if let Some(workers) = cli.workers {
        options = options.with_workers(workers);
    }
    if let Some(seed) = cli.seed {
        options = options.with_seed(seed);
    }
    if cli.audit {
        options = options.with_run_mode(RunMode::Audit);
    }

    let game = GameRef::parse(&cli.game);
    let outcome = simulate(Arc::new(registry), Arc::new(catalog), &game, &options)
        .with_context(|| format!("Simulation of {game} failed"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{outcome}");
    }
    Ok(())
}
