//! Mapping between physical frequencies and one-sided FFT bins.
//!
//! A spectrum of `spectrum_len` bins spans `[0, 1/(2 dt)]`, so the bin width
//! is `1 / (2 dt (spectrum_len - 1))`. Nothing here range-checks: negative
//! and beyond-Nyquist values map to indices outside `0..spectrum_len`, which
//! is what frequency offsets rely on.

use super::types::{FrequencyOffset, MtParameters};

fn bins_per_unit(spectrum_len: usize, dt: f64) -> f64 {
    2.0 * dt * spectrum_len.saturating_sub(1) as f64
}

/// Nearest bin index of each frequency.
pub fn freq_to_index(values: &[f64], spectrum_len: usize, dt: f64) -> Vec<isize> {
    let scale = bins_per_unit(spectrum_len, dt);
    values.iter().map(|f| (f * scale).round() as isize).collect()
}

/// Frequency of each bin index; exact inverse of [`freq_to_index`] on the grid.
pub fn index_to_freq(indices: &[isize], spectrum_len: usize, dt: f64) -> Vec<f64> {
    let scale = bins_per_unit(spectrum_len, dt);
    indices.iter().map(|&i| i as f64 / scale).collect()
}

impl FrequencyOffset {
    /// Offset in bins on a grid of `spectrum_len` one-sided bins.
    pub fn to_bins(self, spectrum_len: usize, dt: f64) -> isize {
        match self {
            FrequencyOffset::None => 0,
            FrequencyOffset::Bins(b) => b,
            FrequencyOffset::Hertz(f) => freq_to_index(&[f], spectrum_len, dt)[0],
        }
    }
}

/// Frequency axis of a one-sided estimate, starting `offset` bins from zero.
pub(crate) fn frequency_axis(params: &MtParameters, offset: isize) -> Vec<f64> {
    let df = params.bin_width();
    (0..params.spectrum_len())
        .map(|i| (i as isize + offset) as f64 * df)
        .collect()
}
