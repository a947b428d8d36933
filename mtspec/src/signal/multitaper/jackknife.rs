//! Weighted combination of two eigencoefficient sets with delete-one-taper
//! jackknife variance.
//!
//! With weights `d_k` on the first set and `e_k` on the second, the
//! cross-spectrum is `Σ d_k e_k x_k conj(y_k) / sqrt(Σ d_k² Σ e_k²)` and the
//! coherency is `Σ d_k e_k x_k conj(y_k) / sqrt(Σ d_k² |x_k|² Σ e_k² |y_k|²)`,
//! so `|C| <= 1` and combining a set with itself reproduces the auto-spectrum.

use mtspec_core::{Error, Result};
use rustfft::num_complex::Complex;

use super::result::JackknifeEstimate;
use super::types::EigenCoefs;

/// Quantity produced by [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineKind {
    /// Complex cross-spectrum (unscaled by `dt`).
    CrossSpectrum,
    /// Complex coherency.
    Coherency,
}

/// Combined complex estimate and optional jackknife statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    /// Complex estimate at every bin.
    pub values: Vec<Complex<f64>>,
    /// Jackknife variance of `ln |S|` or `atanh |C|`, with the phase
    /// interval in degrees.
    pub jackknife: Option<JackknifeEstimate>,
}

/// Running sums of one bin, from which every delete-one estimate follows.
#[derive(Debug, Clone, Copy)]
struct BinSums {
    cross: Complex<f64>,
    wa: f64,
    wb: f64,
    pa: f64,
    pb: f64,
}

struct Terms {
    cross: Vec<Complex<f64>>,
    wa: Vec<f64>,
    wb: Vec<f64>,
    pa: Vec<f64>,
    pb: Vec<f64>,
}

impl Terms {
    fn at(a: &EigenCoefs, b: &EigenCoefs, bin: usize) -> Self {
        let k = a.tapers();
        let mut t = Terms {
            cross: Vec::with_capacity(k),
            wa: Vec::with_capacity(k),
            wb: Vec::with_capacity(k),
            pa: Vec::with_capacity(k),
            pb: Vec::with_capacity(k),
        };
        let (ra, rb) = (a.row(bin), b.row(bin));
        for j in 0..k {
            let (da, db) = (a.weight(bin, j), b.weight(bin, j));
            t.cross.push(ra[j] * rb[j].conj() * (da * db));
            t.wa.push(da * da);
            t.wb.push(db * db);
            t.pa.push(da * da * ra[j].norm_sqr());
            t.pb.push(db * db * rb[j].norm_sqr());
        }
        t
    }

    fn total(&self) -> BinSums {
        BinSums {
            cross: self.cross.iter().sum(),
            wa: self.wa.iter().sum(),
            wb: self.wb.iter().sum(),
            pa: self.pa.iter().sum(),
            pb: self.pb.iter().sum(),
        }
    }

    fn without(&self, total: &BinSums, j: usize) -> BinSums {
        BinSums {
            cross: total.cross - self.cross[j],
            wa: total.wa - self.wa[j],
            wb: total.wb - self.wb[j],
            pa: total.pa - self.pa[j],
            pb: total.pb - self.pb[j],
        }
    }
}

impl BinSums {
    fn value(&self, kind: CombineKind) -> Complex<f64> {
        match kind {
            CombineKind::CrossSpectrum => self.cross / (self.wa * self.wb).sqrt(),
            CombineKind::Coherency => self.cross / (self.pa * self.pb).sqrt(),
        }
    }
}

fn transform(value: Complex<f64>, kind: CombineKind) -> f64 {
    match kind {
        CombineKind::CrossSpectrum => value.norm().ln(),
        CombineKind::Coherency => value.norm().atanh(),
    }
}

fn check_pair(a: &EigenCoefs, b: &EigenCoefs) -> Result<()> {
    if a.bins() != b.bins() {
        return Err(Error::length_mismatch("coefs.bins", a.bins(), b.bins()));
    }
    if a.tapers() != b.tapers() {
        return Err(Error::length_mismatch("coefs.tapers", a.tapers(), b.tapers()));
    }
    Ok(())
}

/// Combine two coefficient sets into a cross-spectrum or coherency.
///
/// With `jackknife` set, the delete-one-taper variance of the transformed
/// magnitude and the phase interval from [`combine_phase`] are attached. A
/// single taper leaves nothing to delete and yields `NaN` statistics.
pub fn combine(
    a: &EigenCoefs,
    b: &EigenCoefs,
    kind: CombineKind,
    jackknife: bool,
) -> Result<Combined> {
    check_pair(a, b)?;
    let k = a.tapers();
    let mut values = Vec::with_capacity(a.bins());
    let mut variance = Vec::new();

    for bin in 0..a.bins() {
        let terms = Terms::at(a, b, bin);
        let total = terms.total();
        values.push(total.value(kind));
        if !jackknife {
            continue;
        }
        if k < 2 {
            variance.push(f64::NAN);
            continue;
        }
        let pseudo: Vec<f64> = (0..k)
            .map(|j| transform(terms.without(&total, j).value(kind), kind))
            .collect();
        variance.push(jackknife_variance(&pseudo));
    }

    let jackknife = if jackknife {
        Some(JackknifeEstimate {
            variance,
            phase_interval: Some(phase_interval(a, b, kind)),
        })
    } else {
        None
    };
    Ok(Combined { values, jackknife })
}

/// Jackknife standard deviation of the cross-spectral phase, in degrees.
///
/// Uses the unit-phasor form: with `u_j` the phase of the estimate after
/// deleting taper `j` and `ū` their mean, the variance is
/// `2 (K - 1) (1 - |ū|)` radians².
pub fn combine_phase(a: &EigenCoefs, b: &EigenCoefs) -> Result<Vec<f64>> {
    check_pair(a, b)?;
    Ok(phase_interval(a, b, CombineKind::CrossSpectrum))
}

fn phase_interval(a: &EigenCoefs, b: &EigenCoefs, kind: CombineKind) -> Vec<f64> {
    let k = a.tapers();
    (0..a.bins())
        .map(|bin| {
            if k < 2 {
                return f64::NAN;
            }
            let terms = Terms::at(a, b, bin);
            let total = terms.total();
            let mean = (0..k)
                .map(|j| {
                    let v = terms.without(&total, j).value(kind);
                    v / v.norm()
                })
                .sum::<Complex<f64>>()
                / k as f64;
            let var = 2.0 * (k as f64 - 1.0) * (1.0 - mean.norm()).max(0.0);
            var.sqrt().to_degrees()
        })
        .collect()
}

/// `(K - 1)/K Σ (θ_j - θ̄)²` over delete-one pseudo-values.
pub(crate) fn jackknife_variance(pseudo: &[f64]) -> f64 {
    let k = pseudo.len() as f64;
    let mean = pseudo.iter().sum::<f64>() / k;
    (k - 1.0) / k * pseudo.iter().map(|p| (p - mean).powi(2)).sum::<f64>()
}
