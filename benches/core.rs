//! Benchmarks for the Tarsia puzzle core.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tarsia::shuffle::{apply, generate_permutation_with};
use tarsia::{compute, decode, encode, max_index, ContentMap, GridChoice, PuzzleState};

/// A large hexagon with every piece filled with a couple of lines.
fn full_puzzle() -> PuzzleState {
    let pieces = compute(GridChoice::LargeHexagon).piece_count();
    let text = |prefix: &str| -> ContentMap {
        (1..=pieces)
            .map(|index| (index, vec![format!("{prefix} {index}"), "çözüm ∑ x²".to_string()]))
            .collect()
    };
    PuzzleState {
        grid: GridChoice::LargeHexagon,
        questions: text("question"),
        answers: text("answer"),
    }
}

/// Benchmark computing the layout of the largest grid.
fn bench_compute(c: &mut Criterion) {
    c.bench_function("compute_large_hexagon", |b| {
        b.iter(|| compute(black_box(GridChoice::LargeHexagon)))
    });
}

/// Benchmark encoding and decoding a full puzzle.
fn bench_codec(c: &mut Criterion) {
    let state = full_puzzle();
    let token = encode(&state);

    let mut group = c.benchmark_group("codec");
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&state))));
    group.bench_function("decode", |b| b.iter(|| decode(black_box(&token))));
    group.finish();
}

/// Benchmark drawing a permutation and remapping both content maps.
fn bench_shuffle(c: &mut Criterion) {
    let state = full_puzzle();
    let layout = compute(state.grid);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    c.bench_function("shuffle_full_puzzle", |b| {
        b.iter(|| {
            let max = max_index(&layout, &state.questions, &state.answers);
            let permutation = generate_permutation_with(&mut rng, max, 1);
            apply(black_box(&state), &permutation)
        })
    });
}

criterion_group!(benches, bench_compute, bench_codec, bench_shuffle);
criterion_main!(benches);
