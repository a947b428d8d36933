use num_complex::Complex;
use num_traits::Float;

/// Valid-mode sliding inner product of a real sequence with a complex kernel.
///
/// `out[j] = sum_m a[j + m] * v[m]` for `j` in `0..=a.len() - v.len()`. Unlike
/// `numpy.correlate` the kernel is not conjugated, so a kernel built as
/// `exp(-i w m)` shifts content at `w` down to baseband.
///
/// Returns an empty vector when `v` is empty or longer than `a`.
///
/// # Examples
/// ```
/// use mtspec_core::num_rs::sliding_inner;
/// use num_complex::Complex;
///
/// let a = [1.0, 2.0, 3.0];
/// let v = [Complex::new(0.5, 0.0), Complex::new(0.0, 1.0)];
/// let out = sliding_inner(&a, &v);
/// assert_eq!(out, vec![Complex::new(0.5, 2.0), Complex::new(1.0, 3.0)]);
/// ```
pub fn sliding_inner<T>(a: &[T], v: &[Complex<T>]) -> Vec<Complex<T>>
where
    T: Float,
{
    if v.is_empty() || v.len() > a.len() {
        return Vec::new();
    }
    a.windows(v.len())
        .map(|window| {
            window
                .iter()
                .zip(v.iter())
                .fold(Complex::new(T::zero(), T::zero()), |acc, (&x, h)| {
                    acc + h.scale(x)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_length() {
        let a = [1.0f64; 10];
        let v = [Complex::new(1.0, 0.0); 4];
        let out = sliding_inner(&a, &v);
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|c| *c == Complex::new(4.0, 0.0)));
    }

    #[test]
    fn kernel_longer_than_input_is_empty() {
        let a = [1.0f64; 3];
        let v = [Complex::new(1.0, 0.0); 4];
        assert!(sliding_inner(&a, &v).is_empty());
        assert!(sliding_inner(&a, &[]).is_empty());
    }
}
