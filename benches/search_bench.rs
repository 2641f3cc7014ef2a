use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reversi_engine::agent::ai::{negamax, SearchStats, LOSE, WIN};
use reversi_engine::board::LineTables;
use reversi_engine::{BoardState, GameState, MtdDecider, SearchConfig};

fn bench_table_build(c: &mut Criterion) {
    c.bench_function("line tables width 8", |b| {
        b.iter(|| black_box(LineTables::build(8)))
    });
}

fn bench_playout(c: &mut Criterion) {
    let start = BoardState::new(8).unwrap();
    c.bench_function("first-action playout 8x8", |b| {
        b.iter(|| {
            let mut state = start;
            while !state.status().is_terminal() {
                let action = state.actions()[0];
                state = state.apply(&action).unwrap();
            }
            black_box(state.heuristic())
        })
    });
}

fn bench_negamax_depth_4(c: &mut Criterion) {
    let start = BoardState::new(8).unwrap();
    c.bench_function("negamax depth 4", |b| {
        b.iter(|| {
            let mut stats = SearchStats::default();
            black_box(negamax(&start, 4, LOSE, WIN, 1, &mut stats))
        })
    });
}

fn bench_mtd_depth_4(c: &mut Criterion) {
    let start = BoardState::new(8).unwrap();
    c.bench_function("mtd(f) depth 4", |b| {
        b.iter(|| {
            let mut decider = MtdDecider::new(SearchConfig::fixed_depth(4));
            black_box(decider.search(&start).value)
        })
    });
}

criterion_group!(
    benches,
    bench_table_build,
    bench_playout,
    bench_negamax_depth_4,
    bench_mtd_depth_4
);
criterion_main!(benches);
