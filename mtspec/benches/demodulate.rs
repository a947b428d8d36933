use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mtspec::kernel::KernelLifecycle;
use mtspec::signal::demod::{DemodulateConfig, DemodulateKernel};
use mtspec::signal::traits::Demodulate1D;
use rand::Rng;

fn demodulate_100k(c: &mut Criterion) {
    let mut rng = rand::rng();
    let x: Vec<f64> = (0..100_000)
        .map(|t| (0.2 * t as f64).cos() + rng.random_range(-0.1..0.1))
        .collect();
    let kernel = DemodulateKernel::try_new(DemodulateConfig {
        f0: 0.2 / std::f64::consts::TAU,
        block_len: 128,
        ..DemodulateConfig::default()
    })
    .expect("valid demodulate kernel config");
    c.bench_function("demodulate_100k_block128", |b| {
        b.iter(|| black_box(kernel.run_alloc(x.as_slice()).expect("demodulate")));
    });
}

criterion_group!(benches, demodulate_100k);
criterion_main!(benches);
