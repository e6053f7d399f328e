//! Parallel batch simulation
//!
//! ```text
//! simulate
//!     │
//!     ├── split_spins(total, workers)
//!     ├── rayon pool: worker w ── SpinSession(seed + w) ── Recorder
//!     │                  └── worker 0 also feeds the bankroll lineage
//!     ├── collect (barrier)
//!     └── Recorder::merge ──▶ StatReport
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use rf_reel_engine::{
    BetRequest, GameCatalog, GameRef, GameSetting, LogicRegistry, RegistryError, RunMode,
    RuntimeHandle, SpinSession,
};
use rf_reel_stats::{PlayerReport, Recorder, StatReport};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Batch options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    pub spins: u64,
    pub workers: usize,
    /// Base seed; worker `w` runs on `seed + w`. Drawn at random when absent.
    pub seed: Option<u64>,
    pub bet_mode: usize,
    pub init_bets: i64,
    pub run_mode: RunMode,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            spins: 100_000,
            workers: num_cpus::get(),
            seed: None,
            bet_mode: 0,
            init_bets: 100,
            run_mode: RunMode::Throughput,
        }
    }
}

impl SimOptions {
    pub fn with_spins(mut self, spins: u64) -> Self {
        self.spins = spins;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bet_mode(mut self, bet_mode: usize) -> Self {
        self.bet_mode = bet_mode;
        self
    }

    pub fn with_init_bets(mut self, init_bets: i64) -> Self {
        self.init_bets = init_bets;
        self
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }
}

/// Per-worker line of the outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSummary {
    pub worker: usize,
    pub seed: u64,
    pub spins: u64,
    pub rtp: f64,
}

/// Bankroll lineage played by worker 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLineage {
    pub rounds: u64,
    pub report: PlayerReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub seed: u64,
    pub report: StatReport,
    pub player: PlayerLineage,
    pub workers: Vec<WorkerSummary>,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl SimulationOutcome {
    pub fn spins_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.report.summary.rounds as f64 / secs
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.report)?;
        let p = &self.player.report;
        writeln!(
            f,
            "─── bankroll lineage (worker 0, {} rounds) ───",
            self.player.rounds
        )?;
        writeln!(
            f,
            "balance {:.2} (initial {:.2}, max {:.2}, min {:.2}) bust={} cashout={}",
            p.balance, p.initial, p.max, p.min, p.bust, p.cashout
        )?;
        write!(
            f,
            "seed {} · {} workers · {:.2}s · {:.0} spins/s",
            self.seed,
            self.workers.len(),
            self.elapsed.as_secs_f64(),
            self.spins_per_second()
        )
    }
}

mod duration_secs {
    use std::time::Duration;

    pub fn serialize<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

/// Split `total` spins across `workers` as evenly as possible
pub fn split_spins(total: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let n = workers as u64;
    let (share, extra) = (total / n, total % n);
    (0..n).map(|w| share + u64::from(w < extra)).collect()
}

struct WorkerOutput {
    recorder: Recorder,
    lineage: Option<Recorder>,
}

fn new_recorder(setting: &GameSetting, options: &SimOptions) -> Result<Recorder, SimError> {
    Ok(Recorder::new(
        &setting.name,
        setting.id,
        setting.bet_units.clone(),
        options.bet_mode,
        options.init_bets,
    )?)
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    worker: usize,
    spins: u64,
    seed: u64,
    registry: Arc<LogicRegistry>,
    catalog: Arc<GameCatalog>,
    setting: &GameSetting,
    request: &BetRequest,
    options: &SimOptions,
) -> Result<WorkerOutput, SimError> {
    let handle = RuntimeHandle::seeded(seed, options.run_mode);
    let mut session = SpinSession::new(registry, catalog, handle);
    let mut recorder = new_recorder(setting, options)?;
    let mut lineage = match worker {
        0 => Some(new_recorder(setting, options)?),
        _ => None,
    };
    let mut playing = lineage.is_some();

    for _ in 0..spins {
        let spin = session
            .spin(request)
            .map_err(|source| SimError::Worker { worker, source })?;
        recorder.record(&spin);
        if playing {
            if let Some(player) = lineage.as_mut() {
                playing = !player.record_with_player(&spin);
            }
        }
    }

    log::debug!("Worker {} finished {} spins (seed {})", worker, spins, seed);
    Ok(WorkerOutput { recorder, lineage })
}

/// Run `options.spins` spins of `game` across a rayon pool and merge the
/// per-worker recorders.
///
/// Deterministic for a fixed seed and worker count.
pub fn simulate(
    registry: Arc<LogicRegistry>,
    catalog: Arc<GameCatalog>,
    game: &GameRef,
    options: &SimOptions,
) -> Result<SimulationOutcome, SimError> {
    if options.workers == 0 {
        return Err(SimError::InvalidOptions("workers must be at least 1".into()));
    }
    let setting = catalog.resolve(game)?;
    // Fail on identity problems before any worker starts
    new_recorder(&setting, options)?;
    if !registry.contains(&setting.logic) {
        return Err(RegistryError::UnknownKey(setting.logic.as_str().into()).into());
    }

    let seed = options.seed.unwrap_or_else(|| rand::rng().random());
    let shares = split_spins(options.spins, options.workers);
    let request = BetRequest::new(setting.id, options.bet_mode);
    log::info!(
        "Simulating {} spins of '{}' on {} workers (seed {})",
        options.spins,
        setting.name,
        options.workers,
        seed
    );

    let started = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()?;
    let outputs: Vec<WorkerOutput> = pool.install(|| {
        shares
            .par_iter()
            .enumerate()
            .map(|(worker, &spins)| {
                run_worker(
                    worker,
                    spins,
                    seed.wrapping_add(worker as u64),
                    Arc::clone(&registry),
                    Arc::clone(&catalog),
                    &setting,
                    &request,
                    options,
                )
            })
            .collect::<Result<Vec<_>, SimError>>()
    })?;

    let workers: Vec<WorkerSummary> = outputs
        .iter()
        .enumerate()
        .map(|(worker, o)| {
            let summary = o.recorder.done().summary;
            WorkerSummary {
                worker,
                seed: seed.wrapping_add(worker as u64),
                spins: summary.rounds,
                rtp: summary.rtp,
            }
        })
        .collect();

    let mut lineage = None;
    let mut recorders = Vec::with_capacity(outputs.len());
    for output in outputs {
        if let Some(player) = output.lineage {
            lineage = Some(player);
        }
        recorders.push(output.recorder);
    }
    let merged = Recorder::merge(&recorders)?;
    let report = merged.done();

    let player = match lineage {
        Some(l) => PlayerLineage {
            rounds: l.basic().rounds,
            report: l.done().player,
        },
        None => PlayerLineage {
            rounds: 0,
            report: report.player.clone(),
        },
    };

    let elapsed = started.elapsed();
    log::info!(
        "Simulation finished: {} spins, RTP {:.4} in {:.2}s",
        report.summary.rounds,
        report.summary.rtp,
        elapsed.as_secs_f64()
    );

    Ok(SimulationOutcome {
        seed,
        report,
        player,
        workers,
        elapsed,
    })
}
