use mtspec_core::{Error, Result};
use nalgebra::{Complex, DMatrix, DVector};

/// Singular values below `PINV_RCOND * sigma_max` are treated as zero.
pub const PINV_RCOND: f64 = 1e-12;

/// Moore-Penrose pseudo-inverse of a complex matrix.
///
/// Uses an SVD and drops singular values below `PINV_RCOND` times the largest
/// one, so rank-deficient Gram matrices (e.g. residual cross-products with
/// fewer tapers than rows) invert without blowing up. Non-finite entries
/// fail with [`Error::Numerical`] before the decomposition.
pub fn pinv(m: &DMatrix<Complex<f64>>) -> Result<DMatrix<Complex<f64>>> {
    if m.is_empty() {
        return Ok(DMatrix::zeros(m.ncols(), m.nrows()));
    }
    if m.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(Error::Numerical {
            reason: "matrix has non-finite entries".into(),
        });
    }
    let svd = m.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = if sigma_max > 0.0 {
        sigma_max * PINV_RCOND
    } else {
        PINV_RCOND
    };
    svd.pseudo_inverse(eps).map_err(|reason| Error::Numerical {
        reason: reason.into(),
    })
}

/// Least-squares solution of `a x ≈ b` through [`pinv`].
pub fn lstsq(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Result<DVector<Complex<f64>>> {
    if a.nrows() != b.len() {
        return Err(Error::length_mismatch("rhs", a.nrows(), b.len()));
    }
    Ok(pinv(a)? * b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn inverse_of_invertible_matrix() {
        let m = DMatrix::from_row_slice(
            2,
            2,
            &[c(2.0, 0.0), c(0.0, 1.0), c(1.0, -1.0), c(3.0, 0.0)],
        );
        let p = pinv(&m).expect("pinv");
        let eye = &m * &p;
        for i in 0..2 {
            for j in 0..2 {
                let target = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(eye[(i, j)].re, target, epsilon = 1e-12);
                assert_abs_diff_eq!(eye[(i, j)].im, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn rank_deficient_satisfies_penrose_identity() {
        let v = DVector::from_vec(vec![c(1.0, 0.5), c(-2.0, 0.0), c(0.0, 1.0)]);
        let m = &v * v.adjoint();
        let p = pinv(&m).expect("pinv");
        let back = &m * &p * &m;
        for (a, b) in back.iter().zip(m.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-10);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn non_finite_entries_fail_without_decomposing() {
        let mut m = DMatrix::from_element(2, 2, c(1.0, 0.0));
        m[(1, 0)] = c(f64::NAN, 0.0);
        assert!(matches!(pinv(&m), Err(Error::Numerical { .. })));
        m[(1, 0)] = c(0.0, f64::INFINITY);
        assert!(matches!(pinv(&m), Err(Error::Numerical { .. })));
    }

    #[test]
    fn lstsq_recovers_exact_gain() {
        let a = DMatrix::from_column_slice(3, 1, &[c(1.0, 0.0), c(0.0, 2.0), c(-1.0, 1.0)]);
        let h = c(0.5, -0.25);
        let b = DVector::from_iterator(3, a.column(0).iter().map(|x| x * h));
        let x = lstsq(&a, &b).expect("lstsq");
        assert_abs_diff_eq!(x[0].re, h.re, epsilon = 1e-12);
        assert_abs_diff_eq!(x[0].im, h.im, epsilon = 1e-12);
    }

    #[test]
    fn lstsq_rejects_mismatched_rhs() {
        let a = DMatrix::<Complex<f64>>::zeros(3, 1);
        let b = DVector::<Complex<f64>>::zeros(2);
        assert!(matches!(lstsq(&a, &b), Err(Error::LengthMismatch { .. })));
    }
}
