//! Round Execution Integration Tests
//!
//! Runs the bundled game settings end to end:
//! - Catalog loading and logic construction
//! - Cascade invariants across many audited spins
//! - Determinism for a fixed seed

use std::path::PathBuf;
use std::sync::Arc;

use rf_reel_engine::{
    ActKind, BetRequest, EMPTY, GameCatalog, GameRef, LogicRegistry, ModeKind, RunMode,
    RuntimeHandle, Screen, SpinResult, SpinSession, cascade,
};

const TUMBLE_ID: u32 = 1001;
const WAYS_ID: u32 = 1002;
const SPINS: usize = 300;

fn games_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("games")
}

fn session(seed: u64, mode: RunMode) -> SpinSession {
    let catalog = GameCatalog::load_paths(&[games_dir()]).unwrap();
    SpinSession::new(
        Arc::new(LogicRegistry::builtin().unwrap()),
        Arc::new(catalog),
        RuntimeHandle::seeded(seed, mode),
    )
}

fn wins(session: &mut SpinSession, game: u32, spins: usize) -> Vec<f64> {
    (0..spins)
        .map(|_| session.spin(&BetRequest::new(game, 1)).unwrap().win())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bundled_games_load() {
    let catalog = GameCatalog::load_paths(&[games_dir()]).unwrap();
    assert_eq!(catalog.ids(), vec![TUMBLE_ID, WAYS_ID]);

    let registry = LogicRegistry::builtin().unwrap();
    let handle = RuntimeHandle::seeded(0, RunMode::Throughput);
    for id in catalog.ids() {
        let setting = catalog.resolve(&GameRef::Id(id)).unwrap();
        assert!(registry.build(setting, &handle).is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CASCADE INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

fn check_spin(spin: &SpinResult, rows: usize, cols: usize, max_steps: usize) {
    assert!(spin.mode_count() >= 1);
    assert_eq!(spin.modes()[0].kind(), ModeKind::Base);
    assert_eq!(spin.triggered(), spin.modes()[0].trigger() != 0);

    let total: f64 = spin.modes().iter().map(|m| m.win()).sum();
    assert!((spin.win() - total).abs() < 1e-9);

    for mode in spin.modes() {
        for round in mode.rounds() {
            assert!(round.step_count() >= 1);
            assert!(round.step_count() <= max_steps);

            // every step but the last won something
            let (last, cascaded) = round.steps.split_last().unwrap();
            assert!(cascaded.iter().all(|s| s.win > 0.0));
            assert!(last.acts.iter().all(|a| a.kind != ActKind::Clear));

            for act in round.steps.iter().flat_map(|s| &s.acts) {
                let screen = act.screen.as_ref().unwrap();
                assert_eq!(screen.len(), rows * cols);
                if act.kind == ActKind::Fill {
                    assert_eq!(screen.empty_count(), 0);
                }
            }
        }
    }
}

#[test]
fn test_tumble_invariants_hold() {
    let mut session = session(7, RunMode::Audit);
    for _ in 0..SPINS {
        let spin = session.spin(&BetRequest::new(TUMBLE_ID, 0)).unwrap();
        check_spin(&spin, 5, 6, 32);
        assert!((spin.bet() - 0.2).abs() < 1e-12);
    }
}

#[test]
fn test_ways_rounds_are_single_step() {
    let mut session = session(7, RunMode::Audit);
    for _ in 0..SPINS {
        let spin = session
            .spin(&BetRequest::new("jungle-ways", 2))
            .unwrap();
        check_spin(&spin, 3, 5, 1);
        if spin.triggered() {
            assert_eq!(spin.modes()[1].rounds().len(), 8);
            assert_eq!(spin.modes()[1].trigger(), 0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETERMINISM
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_same_outcomes() {
    let a = wins(&mut session(99, RunMode::Throughput), TUMBLE_ID, SPINS);
    let b = wins(&mut session(99, RunMode::Throughput), TUMBLE_ID, SPINS);
    assert_eq!(a, b);
}

#[test]
fn test_run_mode_does_not_change_outcomes() {
    let audit = wins(&mut session(5, RunMode::Audit), WAYS_ID, SPINS);
    let throughput = wins(&mut session(5, RunMode::Throughput), WAYS_ID, SPINS);
    assert_eq!(audit, throughput);
}

#[test]
fn test_throughput_keeps_no_screens() {
    let mut session = session(1, RunMode::Throughput);
    let spin = session.spin(&BetRequest::new(TUMBLE_ID, 0)).unwrap();
    let acts = spin.modes()[0].rounds()[0].steps.iter().map(|s| s.acts.len());
    assert_eq!(acts.sum::<usize>(), 0);
    assert!(spin.modes()[0].ext().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════════
// CASCADE PRIMITIVES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_gravity_then_fill_leaves_no_gaps() {
    let mut screen = Screen::from_cells(3, 3, vec![1, 0, 2, 0, 3, 0, 4, 0, 5]).unwrap();
    let mut fill_start = vec![None; 3];
    cascade::gravity(&mut screen, &mut fill_start);

    assert_eq!(screen.column(0), vec![EMPTY, 1, 4]);
    assert_eq!(screen.column(1), vec![EMPTY, EMPTY, 3]);
    assert_eq!(fill_start, vec![Some(0), Some(1), Some(0)]);

    let sources = vec![vec![7u16; 3]; 3];
    let mut cursor = vec![0; 3];
    let drawn = cascade::fill(&mut screen, &fill_start, &sources, &mut cursor).unwrap();
    assert_eq!(drawn, 4);
    assert_eq!(screen.empty_count(), 0);
    assert_eq!(cursor, vec![1, 2, 1]);
}
