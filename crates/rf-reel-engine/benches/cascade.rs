//! Cascade and Spin Benchmarks
//!
//! Benchmarks for the cascade primitives and a full tumble spin.

use std::path::PathBuf;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rf_reel_engine::{
    BetRequest, GameCatalog, GameRef, LogicRegistry, RunMode, RuntimeHandle, Screen, SpinSession, cascade,
};

const SHAPES: &[(usize, usize)] = &[(3, 5), (5, 6), (7, 7)];

fn bench_cascade_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");

    for &(rows, cols) in SHAPES {
        let cells = rows * cols;
        group.throughput(Throughput::Elements(cells as u64));
        let label = format!("{rows}x{cols}");

        // Every other cell cleared
        let hit_map: Vec<usize> = (0..cells).step_by(2).collect();
        let sources = vec![vec![1u16; rows * 4]; cols];
        let base = Screen::from_cells(rows, cols, vec![3; cells]).unwrap();
        let mut screen = base.clone();
        let mut fill_start = vec![None; cols];
        let mut cursor = vec![0; cols];

        group.bench_with_input(BenchmarkId::new("clear_gravity_fill", &label), &cells, |b, _| {
            b.iter(|| {
                screen.copy_from(&base).ok();
                cursor.fill(0);
                cascade::clear(&mut screen, &hit_map);
                cascade::gravity(&mut screen, &mut fill_start);
                cascade::fill(&mut screen, &fill_start, &sources, &mut cursor).ok();
                black_box(&screen)
            })
        });
    }

    group.finish();
}

fn bench_gen_screen(c: &mut Criterion) {
    let catalog = GameCatalog::load_paths(&[games_dir()]).unwrap();
    let setting = catalog.resolve(&GameRef::Id(1001)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut screen = Screen::new(setting.rows, setting.cols);

    c.bench_function("gen_screen_6x5", |b| {
        b.iter(|| {
            setting.base_reels.gen_screen_into(&mut screen, &mut rng);
            black_box(&screen)
        })
    });
}

fn bench_spin(c: &mut Criterion) {
    let mut group = c.benchmark_group("spin");
    let catalog = Arc::new(GameCatalog::load_paths(&[games_dir()]).unwrap());
    let registry = Arc::new(LogicRegistry::builtin().unwrap());

    for (name, mode) in [("throughput", RunMode::Throughput), ("audit", RunMode::Audit)] {
        let mut session = SpinSession::new(
            Arc::clone(&registry),
            Arc::clone(&catalog),
            RuntimeHandle::seeded(42, mode),
        );
        let request = BetRequest::new(1001u32, 1);
        group.bench_function(BenchmarkId::new("tumble", name), |b| {
            b.iter(|| black_box(session.spin(&request).unwrap().win()))
        });
    }

    group.finish();
}

fn games_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("games")
}

criterion_group!(benches, bench_cascade_primitives, bench_gen_screen, bench_spin);
criterion_main!(benches);
