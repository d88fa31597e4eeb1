use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dlx_sudoku::sudoku::{create_empty_solver, create_sudoku_solver};

const HARD_9X9: &str =
    "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..";

/// Benchmarks a full DLX solve across representative board sizes: a 9x9 puzzle with
/// clues, and empty boards at 9x9, 16x16, and 25x25 (the sizes carried in the puzzle
/// generalization).
fn bench_dlx_by_board_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("dlx_solve");

    group.bench_with_input(BenchmarkId::new("9x9_with_clues", "hard"), HARD_9X9, |b, puzzle| {
        b.iter(|| {
            let (mut solver, _, _) = create_sudoku_solver(black_box(puzzle)).unwrap();
            black_box(solver.solve());
        })
    });

    for side in [9u32, 16, 25] {
        group.bench_with_input(BenchmarkId::new("empty", side), &side, |b, &side| {
            b.iter(|| {
                let (mut solver, _, _) = create_empty_solver(black_box(side));
                black_box(solver.solve());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dlx_by_board_size);
criterion_main!(benches);
