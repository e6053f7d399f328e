//! Batch Simulation Integration Tests
//!
//! - Spin accounting across workers
//! - Determinism for a fixed seed and worker count
//! - Fatal option and lookup errors

use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_relative_eq;
use rf_reel_engine::{CatalogError, GameCatalog, GameRef, LogicRegistry};
use rf_reel_sim::{SimError, SimOptions, simulate, split_spins};
use rf_reel_stats::StatsError;

fn fixtures() -> (Arc<LogicRegistry>, Arc<GameCatalog>) {
    let games = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../rf-reel-engine/games");
    (
        Arc::new(LogicRegistry::builtin().unwrap()),
        Arc::new(GameCatalog::load_paths(&[games]).unwrap()),
    )
}

fn options(spins: u64, workers: usize) -> SimOptions {
    SimOptions::default()
        .with_spins(spins)
        .with_workers(workers)
        .with_seed(2024)
        .with_bet_mode(1)
        .with_init_bets(50)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCOUNTING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_spin_is_counted_once() {
    let (registry, catalog) = fixtures();
    let outcome = simulate(registry, catalog, &GameRef::Id(1001), &options(1001, 4)).unwrap();

    let summary = &outcome.report.summary;
    assert_eq!(summary.rounds, 1001);
    assert_relative_eq!(summary.total_bet, 1001.0);
    assert_eq!(outcome.workers.len(), 4);

    let shares = split_spins(1001, 4);
    for (worker, share) in outcome.workers.iter().zip(shares) {
        assert_eq!(worker.spins, share);
        assert_eq!(worker.seed, 2024 + worker.worker as u64);
    }

    let counts = &outcome.report.distribution.total.counts;
    assert_eq!(counts.iter().sum::<u64>(), 1001);
    assert_eq!(counts.len(), 9);
}

#[test]
fn test_player_lineage_runs_on_worker_zero() {
    let (registry, catalog) = fixtures();
    let outcome = simulate(registry, catalog, &"jungle-ways".into(), &options(4000, 2)).unwrap();

    let player = &outcome.player;
    assert!(player.rounds >= 1);
    assert!(player.rounds <= outcome.workers[0].spins);
    assert_relative_eq!(player.report.initial, 100.0);
    if player.rounds < outcome.workers[0].spins {
        assert!(player.report.bust || player.report.cashout);
        assert!(!player.report.alive);
    }
    assert!(player.report.min <= player.report.initial);
    assert!(player.report.max >= player.report.initial);

    // Merged player state is not aggregated
    assert_relative_eq!(outcome.report.player.balance, 100.0);
}

#[test]
fn test_worker_summaries_add_up_to_merged_report() {
    let (registry, catalog) = fixtures();
    let outcome = simulate(registry, catalog, &GameRef::Id(1002), &options(900, 3)).unwrap();

    let summary = &outcome.report.summary;
    let spins: u64 = outcome.workers.iter().map(|w| w.spins).sum();
    assert_eq!(spins, summary.rounds);

    // Every spin bets one unit of 2, so the merged RTP is the mean worker RTP
    // weighted by spins
    let weighted: f64 = outcome
        .workers
        .iter()
        .map(|w| w.rtp * w.spins as f64)
        .sum::<f64>()
        / spins as f64;
    assert_relative_eq!(weighted, summary.rtp, epsilon = 1e-9);
    assert!(outcome.player.rounds >= 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETERMINISM
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fixed_seed_is_reproducible() {
    let (registry, catalog) = fixtures();
    let a = simulate(
        Arc::clone(&registry),
        Arc::clone(&catalog),
        &GameRef::Id(1001),
        &options(600, 3),
    )
    .unwrap();
    let b = simulate(registry, catalog, &GameRef::Id(1001), &options(600, 3)).unwrap();

    assert_eq!(a.seed, b.seed);
    assert_eq!(a.report, b.report);
    assert_eq!(a.player, b.player);
    assert_eq!(a.workers, b.workers);
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_game_is_reported() {
    let (registry, catalog) = fixtures();
    let err = simulate(registry, catalog, &GameRef::Id(7), &options(10, 1)).unwrap_err();
    assert!(matches!(
        err,
        SimError::Catalog(CatalogError::UnknownGame(GameRef::Id(7)))
    ));
}

#[test]
fn test_invalid_options_are_fatal() {
    let (registry, catalog) = fixtures();
    let game = GameRef::Id(1002);

    let err = simulate(
        Arc::clone(&registry),
        Arc::clone(&catalog),
        &game,
        &options(10, 0),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidOptions(_)));

    let err = simulate(
        Arc::clone(&registry),
        Arc::clone(&catalog),
        &game,
        &options(10, 1).with_bet_mode(9),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SimError::Stats(StatsError::BetModeOutOfRange { mode: 9, count: 3 })
    ));

    let err = simulate(registry, catalog, &game, &options(10, 1).with_init_bets(-5)).unwrap_err();
    assert!(matches!(err, SimError::Stats(StatsError::NegativeInitBets(-5))));
}
