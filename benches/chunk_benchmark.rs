//! SampleChunk benchmark: measure append and flush-cycle cost.
//!
//! Target: appending a step block stays far below the cost of a redraw,
//! so batching pays off for any realistic trajectory length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use traceplot::{chunk_capacity, SampleChunk};

fn chunk_push_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_push_block");
    for &capacity in &[64usize, 1024, 16_384] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let times = [0.5];
                let states = [1.0, 2.0, 3.0];
                let noises = [0.1, 0.2, 0.3];
                let mut chunk = SampleChunk::new(3, Some(3), capacity);
                b.iter(|| {
                    chunk.reset(capacity);
                    for _ in 0..capacity {
                        chunk.push_block(
                            black_box(&times),
                            black_box(&states),
                            Some(black_box(&noises)),
                        );
                    }
                });
            },
        );
    }
    group.finish();
}

fn chunk_fill_flush_cycle(c: &mut Criterion) {
    // A full fill cycle: batches of 4 until overflow, then reset. This is
    // the per-flush bookkeeping the controller adds on top of drawing.
    c.bench_function("chunk_fill_flush_cycle_1024", |b| {
        let capacity = 1024usize;
        let times = [0.0, 0.25, 0.5, 0.75];
        let states = [0.0, 1.0, 2.0, 3.0];
        let mut chunk = SampleChunk::new(1, None, capacity);
        b.iter(|| {
            chunk.reset(black_box(capacity));
            while chunk.fits(4) {
                chunk.push_block(&times, &states, None);
            }
            black_box(chunk.times().len());
        });
    });
}

fn capacity_formula(c: &mut Criterion) {
    c.bench_function("chunk_capacity", |b| {
        b.iter(|| chunk_capacity(black_box(1_000_000), black_box(240)));
    });
}

criterion_group!(benches, chunk_push_block, chunk_fill_flush_cycle, capacity_formula);
criterion_main!(benches);
