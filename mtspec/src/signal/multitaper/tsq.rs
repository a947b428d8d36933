//! T² test for a line component shared by several series.

use mtspec_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use rustfft::num_complex::Complex;

use super::types::EigenCoefs;
use crate::linalg::pinv;
use crate::report::{Diagnostic, Reporter};
use crate::special::f_sf;

/// p-value of the T² test for a common line component.
///
/// `dcs` holds the mean-direction value of each taper and `ecs` is
/// `[ell × k]`: one row of taper coefficients per stacked series/bin. When
/// `ell >= k` there are no residual degrees of freedom; the result is `NaN`
/// and a [`Diagnostic::DegenerateTsq`] is reported.
pub fn test_tsq(dcs: &[f64], ecs: &DMatrix<Complex<f64>>, reporter: &dyn Reporter) -> f64 {
    let (ell, k) = ecs.shape();
    if ell >= k {
        reporter.report(Diagnostic::DegenerateTsq { rows: ell, tapers: k });
        return f64::NAN;
    }
    if dcs.len() != k {
        tracing::warn!(expected = k, got = dcs.len(), "mean-direction length mismatch");
        return f64::NAN;
    }

    let dcs = DVector::from_iterator(k, dcs.iter().map(|&d| Complex::new(d, 0.0)));
    let norm2 = dcs.iter().map(|d| d.norm_sqr()).sum::<f64>();
    let q: DVector<Complex<f64>> = ecs * &dcs / Complex::new(norm2, 0.0);
    let r = ecs - &q * dcs.transpose();
    let gram = &r * r.adjoint();
    let gram_inv = match pinv(&gram) {
        Ok(inv) => inv,
        Err(err) => {
            tracing::warn!(%err, "T² residual pseudo-inverse failed");
            return f64::NAN;
        }
    };
    let quad = (q.adjoint() * gram_inv * &q)[(0, 0)].re;
    let tsq = (k - ell) as f64 / ell as f64 * norm2 * quad;
    f_sf(tsq, 2.0 * ell as f64, 2.0 * (k - ell) as f64)
}

/// Check every T² bin group before any numerical work.
///
/// Groups must be non-empty, fit in `2K` and address existing bins.
pub(crate) fn validate_groups(groups: &[Vec<usize>], tapers: usize, bins: usize) -> Result<()> {
    for group in groups {
        if group.is_empty() {
            return Err(Error::invalid_arg("tsq", "bin groups must not be empty"));
        }
        if group.len() > 2 * tapers {
            return Err(Error::InsufficientTapers {
                group_len: group.len(),
                tapers,
            });
        }
        if let Some(&bad) = group.iter().find(|&&b| b >= bins) {
            return Err(Error::invalid_arg(
                "tsq",
                format!("bin {bad} is outside the spectrum (0..{bins})"),
            ));
        }
    }
    Ok(())
}

/// Stack the coefficient rows of every set at the group's bins, set-major.
pub(crate) fn stack_rows(
    sets: &[&EigenCoefs],
    group: &[usize],
    tapers: usize,
) -> DMatrix<Complex<f64>> {
    let rows = sets.len() * group.len();
    DMatrix::from_fn(rows, tapers, |r, c| {
        let set = sets[r / group.len()];
        set.coef()[(group[r % group.len()], c)]
    })
}

/// Run the test on every group, stacking all `sets`.
pub(crate) fn run_groups(
    sets: &[&EigenCoefs],
    groups: &[Vec<usize>],
    dcs: &[f64],
    reporter: &dyn Reporter,
) -> Vec<f64> {
    let tapers = dcs.len();
    groups
        .iter()
        .map(|group| test_tsq(dcs, &stack_rows(sets, group, tapers), reporter))
        .collect()
}
