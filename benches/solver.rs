//! Benchmarks for the magic hypercube generator.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use magic_hypercubes::permutations::PermutationTable;
use magic_hypercubes::topology::Topology;
use magic_hypercubes::{Generator, PrintMode};

/// Benchmark topology construction for a 4x4x4 cube.
fn bench_topology(c: &mut Criterion) {
    c.bench_function("topology_4x4x4", |b| {
        b.iter(|| Topology::new(black_box(4), black_box(3)))
    });
}

/// Benchmark building the widest permutation table used in practice.
fn bench_permutation_table(c: &mut Criterion) {
    c.bench_function("permutation_table_7", |b| {
        b.iter(|| PermutationTable::new(black_box(7)))
    });
}

/// Benchmark the counting pass alone.
fn bench_count(c: &mut Criterion) {
    let generator = Generator::new(3, 3).unwrap().with_progress(false);

    let mut group = c.benchmark_group("count");
    group.sample_size(10);
    group.bench_function("axis_sets_3x3x3", |b| {
        b.iter(|| generator.count_axis_solidification_sets())
    });
    group.finish();
}

/// Benchmark both passes without output.
fn bench_generate(c: &mut Criterion) {
    let cube = Generator::new(3, 3).unwrap().with_progress(false);
    let square = Generator::new(4, 2).unwrap().with_progress(false);

    c.bench_function("generate_3x3x3", |b| {
        b.iter(|| cube.generate(PrintMode::None, std::io::sink()))
    });
    c.bench_function("generate_4x4", |b| {
        b.iter(|| square.generate(PrintMode::None, std::io::sink()))
    });
}

/// Benchmark writing every transformation of the 3x3 solution.
fn bench_write_all(c: &mut Criterion) {
    let generator = Generator::new(3, 2).unwrap().with_progress(false);

    c.bench_function("write_all_3x3", |b| {
        b.iter(|| generator.generate(PrintMode::All, std::io::sink()))
    });
}

criterion_group!(
    benches,
    bench_topology,
    bench_permutation_table,
    bench_count,
    bench_generate,
    bench_write_all
);
criterion_main!(benches);
