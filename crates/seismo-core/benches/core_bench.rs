//! Criterion benchmarks for seismo-core primitives
//!
//! Run with: cargo bench -p seismo-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seismo_core::{Complex64, expand_polynomial, fft, fft_inverse};

const SAMPLE_INTERVAL: f32 = 0.01;

fn generate_record(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 * SAMPLE_INTERVAL;
            (2.0 * std::f32::consts::PI * 1.5 * t).sin() * (-0.05 * t).exp()
        })
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for &size in &[1024usize, 4096, 16384, 65536] {
        let input = generate_record(size);
        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| black_box(fft(black_box(&input))));
        });

        let spectrum = fft(&input);
        group.bench_with_input(BenchmarkId::new("inverse", size), &size, |b, _| {
            b.iter(|| black_box(fft_inverse(black_box(&spectrum), size)));
        });
    }

    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let roots: Vec<Complex64> = (0..20)
        .map(|i| Complex64::from_polar(0.9, i as f64 * 0.3))
        .collect();
    c.bench_function("expand_polynomial_20", |b| {
        b.iter(|| black_box(expand_polynomial(black_box(&roots))));
    });
}

criterion_group!(benches, bench_fft, bench_expand);
criterion_main!(benches);
