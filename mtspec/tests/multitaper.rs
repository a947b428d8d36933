use approx::assert_abs_diff_eq;
use mtspec::kernel::KernelLifecycle;
use mtspec::report::{CollectingReporter, Diagnostic};
use mtspec::signal::multitaper::{
    freq_to_index, index_to_freq, mt_ccvf, mt_ccvf_bivariate, multispec, multispec_bivariate,
    multispec_multivariate, test_tsq, CovarianceKind, CrossOptions, MatrixKind, MultitaperConfig,
    MultitaperKernel, OutputKind, SpectralResult,
};
use mtspec::Error;
use nalgebra::DMatrix;
use ndarray::Array2;
use rustfft::num_complex::Complex;
use std::sync::Arc;

const N: usize = 64;
const DT: f64 = 1.0 / 12.0;

fn golden_series() -> (Vec<f64>, Vec<f64>) {
    let tau = 2.0 * core::f64::consts::PI;
    (0..N)
        .map(|t| {
            let s = t as f64 * DT;
            let tt = (t * t) as f64;
            let n1 = (0.37 * tt).sin();
            let n2 = (0.53 * tt + 1.0).cos();
            let x = (tau * s).sin() + 0.5 * (tau * 2.5 * s).cos() + 0.3 * n1;
            let y = 0.8 * (tau * s + 0.6).sin() + 0.4 * n2 + 0.2 * n1;
            (x, y)
        })
        .unzip()
}

fn golden_config() -> MultitaperConfig {
    MultitaperConfig {
        nw: 4.0,
        k: 6,
        dt: DT,
        pad: 2.0,
        ..MultitaperConfig::default()
    }
}

fn angle_diff(a: f64, b: f64) -> f64 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

#[test]
fn golden_coherence() {
    let (x, y) = golden_series();
    let res = multispec_bivariate(
        &x,
        &y,
        golden_config(),
        OutputKind::Coherence,
        &CrossOptions::default(),
    )
    .expect("coherence");
    let coh = res.as_coherence().expect("coherence variant");
    assert_eq!(coh.params.n, N);
    assert_eq!(coh.params.nfft, 128);
    assert_eq!(coh.coherence.len(), 65);

    let expected_coh = [
        0.612_651_540_223_473_3,
        0.391_075_842_868_227_16,
        0.155_614_864_543_13,
        0.728_636_946_549_595_5,
        0.914_748_262_713_394_8,
    ];
    let expected_phase = [
        0.0,
        16.539_674_739_426_335,
        16.125_226_102_025_344,
        -5.974_711_068_891_108,
        -25.916_647_076_212_747,
    ];
    for i in 0..5 {
        assert_abs_diff_eq!(coh.coherence[i], expected_coh[i], epsilon = 1e-6);
        assert!(
            angle_diff(coh.phase[i], expected_phase[i]) < 1e-4,
            "bin {i}: {} vs {}",
            coh.phase[i],
            expected_phase[i]
        );
    }
    assert_abs_diff_eq!(coh.freq[1], 12.0 / 128.0, epsilon = 1e-12);
}

#[test]
fn coherence_correlation_is_one_at_zero_lag() {
    let (x, y) = golden_series();
    let res = multispec_bivariate(
        &x,
        &y,
        golden_config(),
        OutputKind::Coherence,
        &CrossOptions::default(),
    )
    .expect("coherence");
    let ccf = mt_ccvf(&res, CovarianceKind::Ccf).expect("ccf");
    assert_eq!(ccf.values()[ccf.zero_lag_index()], 1.0);
    assert_eq!(ccf.lags().len(), 65);
    assert_abs_diff_eq!(ccf.lags()[0], -(N as f64) * DT, epsilon = 1e-12);
    assert_abs_diff_eq!(ccf.lags()[32], 0.0, epsilon = 1e-12);
}

#[test]
fn coherence_covariance_is_unsupported() {
    let (x, y) = golden_series();
    let res = multispec_bivariate(
        &x,
        &y,
        golden_config(),
        OutputKind::Coherence,
        &CrossOptions::default(),
    )
    .expect("coherence");
    assert!(matches!(
        mt_ccvf(&res, CovarianceKind::Ccvf),
        Err(Error::Unsupported { .. })
    ));
    let tf = multispec_bivariate(
        &x,
        &y,
        golden_config(),
        OutputKind::TransferFunction,
        &CrossOptions::default(),
    )
    .expect("transfer");
    assert!(matches!(
        mt_ccvf(&tf, CovarianceKind::Ccf),
        Err(Error::Unsupported { .. })
    ));
}

#[test]
fn spectrum_covariance_peaks_at_zero_lag_for_identical_series() {
    let (x, _) = golden_series();
    let ccvf = mt_ccvf_bivariate(&x, &x, golden_config(), CovarianceKind::Ccvf).expect("ccvf");
    let values = ccvf.values();
    let zero = values[ccvf.zero_lag_index()];
    assert!(values.iter().all(|v| v.abs() <= zero + 1e-12));
    let ccf = mt_ccvf_bivariate(&x, &x, golden_config(), CovarianceKind::Ccf).expect("ccf");
    assert_eq!(ccf.values()[ccf.zero_lag_index()], 1.0);
}

#[test]
fn oversized_tsq_group_always_fails() {
    let (x, y) = golden_series();
    for k in 1..=6 {
        let group: Vec<usize> = (0..2 * k + 1).collect();
        let opts = CrossOptions {
            tsq: Some(vec![group.clone()]),
            ..CrossOptions::default()
        };
        let config = MultitaperConfig { k, ..golden_config() };
        let err = multispec_bivariate(&x, &y, config, OutputKind::Spectrum, &opts)
            .expect_err("insufficient tapers");
        assert_eq!(
            err,
            Error::InsufficientTapers {
                group_len: group.len(),
                tapers: k
            }
        );
    }
}

#[test]
fn unknown_selectors_are_invalid() {
    assert!(matches!("cepstrum".parse::<OutputKind>(), Err(Error::InvalidArg { .. })));
    assert!(matches!("all".parse::<MatrixKind>(), Err(Error::InvalidArg { .. })));
}

#[test]
fn frequency_round_trip_within_one_bin() {
    let len = 65;
    let width = 1.0 / (2.0 * DT * (len - 1) as f64);
    let f: Vec<f64> = (0..50).map(|i| i as f64 * 0.113).collect();
    let back = index_to_freq(&freq_to_index(&f, len, DT), len, DT);
    for (a, b) in f.iter().zip(back.iter()) {
        assert!((a - b).abs() <= width);
    }
}

fn channels(p: usize) -> Array2<f64> {
    let (x, y) = golden_series();
    Array2::from_shape_fn((N, p), |(t, c)| match c % 2 {
        0 => x[t] + 0.1 * c as f64 * y[t],
        _ => y[t] - 0.05 * c as f64 * x[t],
    })
}

#[test]
fn multichannel_coherence_fills_every_pair() {
    for p in 2..=5 {
        let (spectra, matrix, tsq) =
            multispec_multivariate(&channels(p), golden_config(), MatrixKind::Coherence, None)
                .expect("multivariate");
        assert_eq!(spectra.len(), p);
        assert!(tsq.is_none());
        let matrix = matrix.expect("matrix");
        assert_eq!(matrix.populated(), p * (p - 1) / 2);
        assert!(matrix
            .iter()
            .all(|((i, j), r)| i < j && matches!(r, SpectralResult::Coherence(_))));
    }
}

#[test]
fn spectra_only_returns_no_matrix() {
    let (spectra, matrix, _) =
        multispec_multivariate(&channels(3), golden_config(), MatrixKind::SpectraOnly, None)
            .expect("multivariate");
    assert_eq!(spectra.len(), 3);
    assert!(matrix.is_none());
    assert!(spectra.iter().all(|s| s.coefs.is_none() && s.phase.is_none()));
}

#[test]
fn guts_attaches_per_channel_coefficients() {
    let config = MultitaperConfig {
        guts: true,
        ..golden_config()
    };
    let (spectra, _, _) =
        multispec_multivariate(&channels(2), config, MatrixKind::SpectraOnly, None)
            .expect("multivariate");
    for s in &spectra {
        let coefs = s.coefs.as_ref().expect("coefs");
        assert_eq!(coefs.len(), 1);
        assert_eq!(coefs[0].bins(), 65);
        assert!(coefs[0].weights().is_some());
    }
}

#[test]
fn many_channels_notice_goes_to_the_reporter() {
    let reporter = Arc::new(CollectingReporter::new());
    let kernel = MultitaperKernel::try_new(MultitaperConfig {
        n: N,
        adaptive: false,
        ..golden_config()
    })
    .expect("kernel")
    .with_reporter(reporter.clone());
    kernel
        .multivariate(&channels(4), MatrixKind::SpectraOnly, None)
        .expect("multivariate");
    assert_eq!(
        reporter.events(),
        vec![Diagnostic::ManyChannels {
            channels: 4,
            pairs: 6
        }]
    );
}

#[test]
fn tsq_with_too_many_rows_is_nan() {
    let reporter = CollectingReporter::new();
    let dcs = [1.0, 0.0, 0.8];
    let ecs = DMatrix::from_fn(3, 3, |r, c| Complex::new((r + c) as f64, 1.0));
    assert!(test_tsq(&dcs, &ecs, &reporter).is_nan());
    let wide = DMatrix::from_fn(5, 3, |r, c| Complex::new(r as f64, c as f64));
    assert!(test_tsq(&dcs, &wide, &reporter).is_nan());
    assert_eq!(reporter.events().len(), 2);
}

#[test]
fn univariate_free_function_uses_series_length() {
    let (x, _) = golden_series();
    let spec = multispec(
        &x,
        MultitaperConfig {
            ftest: true,
            jackknife: true,
            ..golden_config()
        },
    )
    .expect("spectrum");
    assert_eq!(spec.params.n, N);
    assert_eq!(spec.ftest.as_ref().map(Vec::len), Some(65));
    assert!(spec.values.iter().all(|v| *v >= 0.0));
}

#[test]
fn non_finite_sample_propagates_through_tsq() {
    let (mut x, y) = golden_series();
    x[10] = f64::NAN;
    let opts = CrossOptions {
        tsq: Some(vec![vec![9]]),
        ..CrossOptions::default()
    };
    let res = multispec_bivariate(&x, &y, golden_config(), OutputKind::Coherence, &opts)
        .expect("coherence");
    let coh = res.as_coherence().expect("coherence variant");
    assert!(coh.coherence.iter().all(|c| c.is_nan()));
    let tsq = coh.tsq.as_ref().expect("tsq");
    assert_eq!(tsq.len(), 1);
    assert!(tsq[0].is_nan());

    let res = multispec_bivariate(&x, &y, golden_config(), OutputKind::TransferFunction, &opts)
        .expect("transfer");
    let tf = res.as_transfer().expect("transfer variant");
    assert!(tf.gain_sq.iter().all(|g| g.is_nan()));
}

#[test]
fn non_finite_channel_propagates_through_multichannel_tsq() {
    let (x, y) = golden_series();
    let data = Array2::from_shape_fn((N, 2), |(t, c)| match (t, c) {
        (5, 1) => f64::INFINITY,
        (_, 0) => x[t],
        _ => y[t],
    });
    let (spectra, matrix, tsq) = multispec_multivariate(
        &data,
        golden_config(),
        MatrixKind::Coherence,
        Some(&[vec![9]][..]),
    )
    .expect("multivariate");
    assert_eq!(spectra.len(), 2);
    assert!(matrix.is_some());
    assert!(tsq.expect("tsq")[0].is_nan());
}
