use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_rs::equity::EquityCalculator;
use holdem_rs::hand::{Board, HoleCards};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_equity(c: &mut Criterion) {
    let hole: HoleCards = "As Kd".parse().expect("valid hole");
    let calc = EquityCalculator::new(1000);
    let mut g = c.benchmark_group("equity_1000_trials");
    for (street, board) in [("preflop", ""), ("flop", "Qh 7c 2d"), ("turn", "Qh 7c 2d 9s")] {
        let board: Board = board.parse().expect("valid board");
        for opponents in [1usize, 3] {
            let id = BenchmarkId::new(street, format!("{opponents} opp"));
            g.bench_with_input(id, &board, |b, board| {
                let mut rng = ChaCha8Rng::seed_from_u64(11);
                b.iter(|| calc.estimate(black_box(&hole), board, opponents, &mut rng))
            });
        }
    }
    g.finish();
}

criterion_group!(benches, bench_equity);
criterion_main!(benches);
