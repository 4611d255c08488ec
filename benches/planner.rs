use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fftforge::{detect_simd_levels, PlanOptions, Planner, Registry, SimdLevelSet};
use utilities::rustfft::FftPlanner;

const LENGTHS: &[usize] = &[
    6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
];

fn benchmark_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("Registry");

    group.bench_function("builtin f32", |b| {
        b.iter(|| Registry::<f32>::builtin(black_box(detect_simd_levels())));
    });

    let registry = Registry::<f64>::builtin(SimdLevelSet::all());
    let levels = SimdLevelSet::all();
    group.bench_function("resolve every size", |b| {
        b.iter(|| {
            for n in registry.sizes() {
                black_box(registry.resolve(n, levels).is_ok());
            }
        });
    });
    group.finish();
}

fn benchmark_planner_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("Planner f32");
    group.plot_config(
        criterion::PlotConfiguration::default().summary_scale(criterion::AxisScale::Logarithmic),
    );

    let registry = Registry::<f32>::builtin(detect_simd_levels());

    for n in LENGTHS.iter() {
        let len = 1 << n;

        group.bench_function(BenchmarkId::new("fftforge", len), |b| {
            b.iter(|| {
                let planner = Planner::new(&registry, detect_simd_levels(), PlanOptions::default());
                planner.plan(len)
            });
        });

        group.bench_function(BenchmarkId::new("RustFFT", len), |b| {
            b.iter(|| {
                let mut planner = FftPlanner::<f32>::new();
                planner.plan_fft_forward(len)
            });
        });
    }
    group.finish();
}

fn benchmark_planner_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("Planner f64");
    group.plot_config(
        criterion::PlotConfiguration::default().summary_scale(criterion::AxisScale::Logarithmic),
    );

    let registry = Registry::<f64>::builtin(detect_simd_levels());

    for n in LENGTHS.iter() {
        let len = 1 << n;

        group.bench_function(BenchmarkId::new("fftforge", len), |b| {
            b.iter(|| {
                let planner = Planner::new(&registry, detect_simd_levels(), PlanOptions::default());
                planner.plan(len)
            });
        });

        group.bench_function(BenchmarkId::new("RustFFT", len), |b| {
            b.iter(|| {
                let mut planner = FftPlanner::<f64>::new();
                planner.plan_fft_forward(len)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_registry,
    benchmark_planner_f32,
    benchmark_planner_f64
);
criterion_main!(benches);
