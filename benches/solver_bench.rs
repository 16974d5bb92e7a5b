//! Benchmarks for the indexer and the layered solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use markov_game_solver::combinatorics::{
    composition_count, rank_weak_composition, unrank_weak_composition_into,
};
use markov_game_solver::games::dreidel::{Dreidel, DreidelConfig};
use markov_game_solver::games::lcr::{LcrConfig, LeftCenterRight};
use markov_game_solver::markov::{LayeredSolver, Quantity, SolverConfig};

fn composition_round_trip_benchmark(c: &mut Criterion) {
    // 7 players plus the pot, 20 free coins
    let count = composition_count(8, 20);
    let mut rng = StdRng::seed_from_u64(42);
    let ranks: Vec<u64> = (0..1024).map(|_| rng.gen_range(0..count)).collect();
    let mut parts = [0u32; 8];

    c.bench_function("composition_round_trip_1024", |b| {
        b.iter(|| {
            let mut acc = 0;
            for &rank in &ranks {
                unrank_weak_composition_into(rank, 20, &mut parts);
                acc ^= rank_weak_composition(black_box(&parts));
            }
            acc
        })
    });
}

fn dreidel_solve_benchmark(c: &mut Criterion) {
    c.bench_function("dreidel_4_players_4_coins", |b| {
        b.iter(|| {
            let game = Dreidel::new(DreidelConfig::new(16, Quantity::WinProbability)).unwrap();
            let mut solver = LayeredSolver::new(game, SolverConfig::default()).unwrap();
            solver.solve(black_box(4)).unwrap();
            solver.stats().total_states()
        })
    });
}

fn lcr_solve_benchmark(c: &mut Criterion) {
    c.bench_function("lcr_4_players_3_coins", |b| {
        b.iter(|| {
            let game = LeftCenterRight::new(LcrConfig::new(4, Quantity::ExpectedTurns)).unwrap();
            let mut solver = LayeredSolver::new(game, SolverConfig::default()).unwrap();
            solver.solve(black_box(12)).unwrap();
            solver.stats().total_states()
        })
    });
}

criterion_group!(
    benches,
    composition_round_trip_benchmark,
    dreidel_solve_benchmark,
    lcr_solve_benchmark
);
criterion_main!(benches);
