//! Small array routines with numpy semantics.

mod correlate;
mod fft_shift;
mod unwrap;

pub use correlate::*;
pub use fft_shift::*;
pub use unwrap::*;

use num_traits::Float;

/// Return `num` evenly spaced samples over the closed interval `[start, stop]`.
///
/// Matches `numpy.linspace(start, stop, num)`: a single sample yields `[start]`.
pub fn linspace<F: Float>(start: F, stop: F, num: usize) -> Vec<F> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let steps = F::from(num - 1).unwrap_or_else(F::one);
            let step = (stop - start) / steps;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * F::from(i).unwrap_or_else(F::zero)
                    }
                })
                .collect()
        }
    }
}
