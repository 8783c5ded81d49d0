//! Criterion benchmarks for seismo-design
//!
//! Run with: cargo bench -p seismo-design
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seismo_design::{Characteristic, DesignSpec, Recurrence, Response, design};

const SAMPLE_RATE: f64 = 100.0;

fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("Design");

    for order in [2usize, 4, 8, 10] {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Bandpass, SAMPLE_RATE)
            .with_order(order)
            .with_band(0.1, 25.0);
        group.bench_with_input(BenchmarkId::new("butterworth_bandpass", order), &spec, |b, spec| {
            b.iter(|| black_box(design(black_box(spec))));
        });
    }

    let spec = DesignSpec::new(Characteristic::Resonator { q: Some(50.0) }, Response::Bandpass, SAMPLE_RATE)
        .with_corner(10.0);
    group.bench_function("resonator_q50", |b| {
        b.iter(|| black_box(design(black_box(&spec))));
    });

    group.finish();
}

fn bench_recurrence(c: &mut Criterion) {
    let mut group = c.benchmark_group("Recurrence");
    let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, SAMPLE_RATE)
        .with_order(4)
        .with_corner(2.0);
    let Ok(filter) = design(&spec) else {
        return;
    };

    for &size in &[1024usize, 16384] {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        group.bench_with_input(BenchmarkId::new("process_block", size), &input, |b, input| {
            let mut runner = Recurrence::new(&filter);
            let mut buf = input.clone();
            b.iter(|| {
                buf.copy_from_slice(input);
                runner.process_block(black_box(&mut buf));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_design, bench_recurrence);
criterion_main!(benches);
