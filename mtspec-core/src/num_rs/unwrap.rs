use num_traits::Float;

/// Unit of a phase sequence passed to [`unwrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseUnit {
    /// Period of `2 pi`.
    Radians,
    /// Period of `360`.
    Degrees,
}

impl PhaseUnit {
    fn period<F: Float>(self) -> F {
        match self {
            PhaseUnit::Radians => F::from(core::f64::consts::TAU).unwrap_or_else(F::one),
            PhaseUnit::Degrees => F::from(360.0).unwrap_or_else(F::one),
        }
    }
}

/// Unwrap a phase sequence by removing jumps larger than half a period.
///
/// Matches `numpy.unwrap(p, period=...)`: each difference is mapped into
/// `[-period/2, period/2)` (a difference of exactly `+period/2` is kept as-is)
/// and the corrections are accumulated.
pub fn unwrap<F: Float>(phase: &[F], unit: PhaseUnit) -> Vec<F> {
    let period = unit.period::<F>();
    let half = period / (F::one() + F::one());
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);
    let mut correction = F::zero();
    for pair in phase.windows(2) {
        let dd = pair[1] - pair[0];
        let mut ddmod = (dd + half) - ((dd + half) / period).floor() * period - half;
        if ddmod == -half && dd > F::zero() {
            ddmod = half;
        }
        if dd.abs() >= half {
            correction = correction + (ddmod - dd);
        }
        out.push(pair[1] + correction);
    }
    out
}
