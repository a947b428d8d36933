/// Shift the zero-index element to the center of the sequence.
///
/// Matches `numpy.fft.fftshift` for 1-D input: element `0` lands at index
/// `len / 2`.
pub fn fftshift<T: Clone>(x: &[T]) -> Vec<T> {
    let n = x.len();
    let mut out = x.to_vec();
    out.rotate_right(n / 2);
    out
}

/// Inverse of [`fftshift`]; matches `numpy.fft.ifftshift`.
pub fn ifftshift<T: Clone>(x: &[T]) -> Vec<T> {
    let n = x.len();
    let mut out = x.to_vec();
    out.rotate_left(n / 2);
    out
}
