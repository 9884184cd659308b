//! Philox engine benchmarks.
//!
//! Measures per-call cost of the engines on both backends, O(1) skipping,
//! and throughput of grid fills at a few output sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ringkernel_philox::prelude::*;

type ArrayVector = PhiloxVector<Philox4x32x10Params, ArrayBackend>;
type NativeVector = PhiloxVector<Philox4x32x10Params, NativeVectorBackend>;

/// Benchmark single calls of each engine
fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("philox/engine");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_next_u32", |b| {
        let mut rng = Philox4x32x10::new(42, 0, 0);
        b.iter(|| black_box(rng.next_u32()));
    });

    group.bench_function("vector_array", |b| {
        let mut rng = ArrayVector::new(42, 0, 0);
        b.iter(|| black_box(rng.next_vector()));
    });

    group.bench_function("vector_native", |b| {
        let mut rng = NativeVector::new(42, 0, 0);
        b.iter(|| black_box(rng.next_block()));
    });

    group.bench_function("vector_7_rounds", |b| {
        let mut rng = PhiloxVector::<Philox4x32x7Params, ArrayBackend>::new(42, 0, 0);
        b.iter(|| black_box(rng.next_vector()));
    });

    group.bench_function("stateless", |b| {
        let rng = Philox4x32x10Stateless::new();
        let mut block = 0u64;
        b.iter(|| {
            block = block.wrapping_add(1);
            black_box(rng.generate_at(42, 7, block))
        });
    });

    group.finish();
}

/// Benchmark skipping ahead
fn bench_skip(c: &mut Criterion) {
    let mut group = c.benchmark_group("philox/skip");

    for distance in [1u64, 1 << 20, 1 << 40] {
        group.bench_with_input(BenchmarkId::new("single", distance), &distance, |b, &d| {
            let mut rng = Philox4x32x10::new(42, 0, 0);
            b.iter(|| {
                rng.skip(black_box(d));
                black_box(rng.next_u32())
            });
        });
    }

    group.finish();
}

/// Benchmark uniform reals
fn bench_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("philox/uniform");
    group.throughput(Throughput::Elements(1024));

    group.bench_function("f32_sample_1k", |b| {
        let mut rng = Philox4x32x10::new(1, 0, 0);
        let dist = UniformReal::<f32>::new();
        let mut out = vec![0.0f32; 1024];
        b.iter(|| {
            dist.fill(&mut rng, &mut out);
            black_box(&out);
        });
    });

    group.bench_function("f64_sample_1k", |b| {
        let mut rng = Philox4x32x10::new(1, 0, 0);
        let dist = UniformReal::<f64>::new();
        let mut out = vec![0.0f64; 1024];
        b.iter(|| {
            dist.fill(&mut rng, &mut out);
            black_box(&out);
        });
    });

    group.finish();
}

/// Benchmark grid fills at different sizes
fn bench_grid_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("philox/grid");

    for size in [4_096usize, 262_144, 4_194_304] {
        group.throughput(Throughput::Bytes((size * 4) as u64));

        group.bench_with_input(BenchmarkId::new("fill_u32", size), &size, |b, &size| {
            let grid = PhiloxGrid::<Philox4x32x10Params, DefaultBackend>::new(
                FillConfig::new(42).with_blocks_per_thread(4),
            )
            .unwrap();
            let mut out = vec![0u32; size];
            b.iter(|| {
                grid.fill_u32(&mut out).unwrap();
                black_box(&out);
            });
        });

        group.bench_with_input(
            BenchmarkId::new("fill_u32_sequential", size),
            &size,
            |b, &size| {
                let grid = PhiloxGrid::<Philox4x32x10Params, DefaultBackend>::new(
                    FillConfig::new(42)
                        .with_blocks_per_thread(4)
                        .with_parallel_threshold(usize::MAX),
                )
                .unwrap();
                let mut out = vec![0u32; size];
                b.iter(|| {
                    grid.fill_u32(&mut out).unwrap();
                    black_box(&out);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_engines,
    bench_skip,
    bench_uniform,
    bench_grid_fill
);
criterion_main!(benches);
