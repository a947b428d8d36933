use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mtspec::kernel::KernelLifecycle;
use mtspec::signal::multitaper::{
    CrossOptions, MatrixKind, MultitaperConfig, MultitaperKernel, OutputKind,
};
use mtspec::signal::traits::SpectrumEstimate1D;
use ndarray::Array2;
use rand::Rng;

/// Sum of a few tones at random phases plus uniform noise.
fn noisy_tones(n: usize, rng: &mut impl Rng) -> Vec<f64> {
    let phases: Vec<f64> = (0..3)
        .map(|_| rng.random_range(0.0..std::f64::consts::TAU))
        .collect();
    (0..n)
        .map(|t| {
            let t = t as f64;
            (0.05 * t + phases[0]).sin()
                + 0.5 * (0.31 * t + phases[1]).sin()
                + 0.2 * (1.2 * t + phases[2]).sin()
                + rng.random_range(-0.5..0.5)
        })
        .collect()
}

fn kernel(n: usize, jackknife: bool) -> MultitaperKernel {
    MultitaperKernel::try_new(MultitaperConfig {
        n,
        jackknife,
        ..MultitaperConfig::default()
    })
    .expect("valid multitaper kernel config")
}

fn univariate_4096(c: &mut Criterion) {
    let mut rng = rand::rng();
    let x = noisy_tones(4096, &mut rng);
    let kernel = kernel(4096, false);
    c.bench_function("multispec_4096_adaptive", |b| {
        b.iter(|| black_box(kernel.run_alloc(x.as_slice()).expect("spectrum")));
    });
}

fn coherence_4096_jackknife(c: &mut Criterion) {
    let mut rng = rand::rng();
    let x = noisy_tones(4096, &mut rng);
    let y = noisy_tones(4096, &mut rng);
    let kernel = kernel(4096, true);
    let opts = CrossOptions::default();
    c.bench_function("coherence_4096_jackknife", |b| {
        b.iter(|| {
            black_box(
                kernel
                    .cross_from_series(x.as_slice(), y.as_slice(), OutputKind::Coherence, &opts)
                    .expect("coherence"),
            )
        });
    });
}

fn multivariate_1024x4(c: &mut Criterion) {
    let mut rng = rand::rng();
    let columns: Vec<Vec<f64>> = (0..4).map(|_| noisy_tones(1024, &mut rng)).collect();
    let data = Array2::from_shape_fn((1024, 4), |(t, ch)| columns[ch][t]);
    let kernel = kernel(1024, false);
    c.bench_function("multivariate_1024x4_coherence", |b| {
        b.iter(|| {
            black_box(
                kernel
                    .multivariate(&data, MatrixKind::Coherence, None)
                    .expect("multivariate"),
            )
        });
    });
}

criterion_group!(
    benches,
    univariate_4096,
    coherence_4096_jackknife,
    multivariate_1024x4
);
criterion_main!(benches);
