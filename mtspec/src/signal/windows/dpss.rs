//! Discrete prolate spheroidal (Slepian) taper generation.

use mtspec_core::Result;
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::kernel::{ConfigError, KernelLifecycle};
use crate::signal::traits::TaperGenerate;

/// An orthonormal set of Slepian tapers together with their spectral
/// concentrations.
///
/// `vectors` is laid out `[sample, taper]`; tapers are ordered by decreasing
/// concentration. A `Tapers` value is never mutated after construction, so one
/// set can be shared across any number of estimates of equal-length series.
#[derive(Debug, Clone, PartialEq)]
pub struct Tapers {
    vectors: Array2<f64>,
    concentrations: Vec<f64>,
    nw: f64,
}

impl Tapers {
    /// Wrap a caller-supplied taper matrix.
    ///
    /// The columns are expected to be unit-energy Slepian sequences for the
    /// given `nw`; `concentrations` must have one entry per column.
    pub fn from_parts(
        vectors: Array2<f64>,
        concentrations: Vec<f64>,
        nw: f64,
    ) -> core::result::Result<Self, ConfigError> {
        if vectors.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "tapers" });
        }
        if concentrations.len() != vectors.ncols() {
            return Err(ConfigError::InvalidArgument {
                arg: "concentrations",
                reason: "one concentration is required per taper",
            });
        }
        Ok(Self {
            vectors,
            concentrations,
            nw,
        })
    }

    /// Series length the tapers apply to.
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    /// Always false for a constructed taper set.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of tapers.
    pub fn k(&self) -> usize {
        self.vectors.ncols()
    }

    /// Time-bandwidth product the tapers were designed for.
    pub fn nw(&self) -> f64 {
        self.nw
    }

    /// Taper matrix, `[sample, taper]`.
    pub fn vectors(&self) -> ArrayView2<'_, f64> {
        self.vectors.view()
    }

    /// One taper.
    pub fn taper(&self, k: usize) -> ArrayView1<'_, f64> {
        self.vectors.column(k)
    }

    /// Fraction of each taper's energy inside `[-W, W]`.
    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    /// `V_k(0)`: the sum of each taper, i.e. its transform at zero frequency.
    pub fn column_sums(&self) -> Vec<f64> {
        self.vectors.columns().into_iter().map(|c| c.sum()).collect()
    }

    /// Mean-direction vector used by the line-component tests.
    ///
    /// Column sums with the alternating sign `(-1)^k`; odd tapers are
    /// antisymmetric, so their entries are numerically zero either way.
    pub fn mean_direction(&self) -> Vec<f64> {
        self.column_sums()
            .into_iter()
            .enumerate()
            .map(|(k, s)| if k % 2 == 0 { s } else { -s })
            .collect()
    }
}

/// Constructor config for [`DpssKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpssConfig {
    /// Taper length.
    pub n: usize,
    /// Time-bandwidth product.
    pub nw: f64,
    /// Number of tapers to keep.
    pub k: usize,
}

/// Trait-first Slepian taper kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpssKernel {
    n: usize,
    nw: f64,
    k: usize,
}

impl KernelLifecycle for DpssKernel {
    type Config = DpssConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if config.n < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "n",
                reason: "taper length must be at least 2",
            });
        }
        if !config.nw.is_finite() || config.nw <= 0.0 || 2.0 * config.nw >= config.n as f64 {
            return Err(ConfigError::InvalidArgument {
                arg: "nw",
                reason: "time-bandwidth product must satisfy 0 < nw < n/2",
            });
        }
        if config.k == 0 || config.k > config.n {
            return Err(ConfigError::InvalidArgument {
                arg: "k",
                reason: "taper count must satisfy 1 <= k <= n",
            });
        }
        Ok(Self {
            n: config.n,
            nw: config.nw,
            k: config.k,
        })
    }
}

impl DpssKernel {
    /// Generate the configured tapers; a validated kernel cannot fail.
    pub fn generate(&self) -> Tapers {
        dpss_impl(self.n, self.nw, self.k)
    }
}

impl TaperGenerate for DpssKernel {
    fn run_alloc(&self) -> Result<Tapers> {
        Ok(self.generate())
    }
}

fn dpss_impl(n: usize, nw: f64, k: usize) -> Tapers {
    let w = nw / n as f64;
    let cos_band = (2.0 * core::f64::consts::PI * w).cos();

    // Commuting tridiagonal matrix: same eigenvectors as the concentration
    // problem, well separated eigenvalues. `off[i]` couples rows i-1 and i.
    let diag: Vec<f64> = (0..n)
        .map(|i| {
            let x = (n as f64 - 1.0 - 2.0 * i as f64) / 2.0;
            x * x * cos_band
        })
        .collect();
    let off: Vec<f64> = (0..n).map(|i| (i * (n - i)) as f64 / 2.0).collect();
    let tri = Tridiagonal::new(&diag, &off);

    let mut vectors = Array2::<f64>::zeros((n, k));
    for col in 0..k {
        let lambda = tri.eigenvalue(n - 1 - col);
        let mut v: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 / n as f64).collect();
        for _ in 0..INVERSE_ITERATIONS {
            v = tri.solve_shifted(lambda, v);
            for prev in 0..col {
                let u = vectors.column(prev);
                let dot: f64 = u.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
                v.iter_mut().zip(u.iter()).for_each(|(x, a)| *x -= dot * a);
            }
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            v.iter_mut().for_each(|x| *x /= norm);
        }
        let sign_ref: f64 = if col % 2 == 0 {
            v.iter().sum()
        } else {
            v.iter()
                .enumerate()
                .map(|(i, x)| (n as f64 - 1.0 - 2.0 * i as f64) * x)
                .sum()
        };
        let sign = if sign_ref < 0.0 { -1.0 } else { 1.0 };
        for (i, x) in v.iter().enumerate() {
            vectors[(i, col)] = sign * x;
        }
    }

    let concentrations = (0..k)
        .map(|col| concentration(vectors.column(col), w))
        .collect();

    Tapers {
        vectors,
        concentrations,
        nw,
    }
}

const INVERSE_ITERATIONS: usize = 3;
const BISECTION_MAX_ITER: usize = 200;

/// Symmetric tridiagonal matrix with Sturm-sequence bisection for single
/// eigenvalues and pivoted LU solves for inverse iteration.
struct Tridiagonal<'a> {
    diag: &'a [f64],
    off: &'a [f64],
}

impl<'a> Tridiagonal<'a> {
    fn new(diag: &'a [f64], off: &'a [f64]) -> Self {
        Self { diag, off }
    }

    /// Number of eigenvalues below `x`.
    fn count_below(&self, x: f64) -> usize {
        let mut count = 0;
        let mut q = 1.0;
        for (i, &d) in self.diag.iter().enumerate() {
            q = if i == 0 {
                d - x
            } else {
                d - x - self.off[i] * self.off[i] / q
            };
            if q == 0.0 {
                q = -f64::MIN_POSITIVE;
            }
            if q < 0.0 {
                count += 1;
            }
        }
        count
    }

    /// `m`-th smallest eigenvalue (zero based).
    fn eigenvalue(&self, m: usize) -> f64 {
        let n = self.diag.len();
        let radius = |i: usize| {
            let left = if i > 0 { self.off[i].abs() } else { 0.0 };
            let right = if i + 1 < n { self.off[i + 1].abs() } else { 0.0 };
            left + right
        };
        let mut lo = (0..n).map(|i| self.diag[i] - radius(i)).fold(f64::INFINITY, f64::min);
        let mut hi = (0..n).map(|i| self.diag[i] + radius(i)).fold(f64::NEG_INFINITY, f64::max);
        for _ in 0..BISECTION_MAX_ITER {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if self.count_below(mid) <= m {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Solve `(T - shift I) x = rhs` by LU with partial pivoting.
    ///
    /// Pivots that vanish (the shift is an eigenvalue) are replaced by a
    /// tiny value, which is what inverse iteration wants.
    fn solve_shifted(&self, shift: f64, mut b: Vec<f64>) -> Vec<f64> {
        let n = self.diag.len();
        if n == 1 {
            return vec![1.0];
        }
        let mut d: Vec<f64> = self.diag.iter().map(|x| x - shift).collect();
        let mut dl: Vec<f64> = self.off[1..].to_vec();
        let mut du: Vec<f64> = self.off[1..].to_vec();
        let mut du2 = vec![0.0; n.saturating_sub(2)];
        let mut swapped = vec![false; n - 1];

        for i in 0..n - 1 {
            if d[i].abs() >= dl[i].abs() {
                if d[i] != 0.0 {
                    let fact = dl[i] / d[i];
                    dl[i] = fact;
                    d[i + 1] -= fact * du[i];
                } else {
                    dl[i] = 0.0;
                }
            } else {
                let fact = d[i] / dl[i];
                d[i] = dl[i];
                dl[i] = fact;
                let temp = du[i];
                du[i] = d[i + 1];
                d[i + 1] = temp - fact * d[i + 1];
                if i + 2 < n {
                    du2[i] = du[i + 1];
                    du[i + 1] = -fact * du[i + 1];
                }
                swapped[i] = true;
            }
        }

        let scale = self.diag.iter().fold(0.0f64, |m, x| m.max(x.abs()))
            + self.off.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        let tiny = f64::EPSILON * scale;
        for p in d.iter_mut() {
            if p.abs() < tiny {
                *p = if *p >= 0.0 { tiny } else { -tiny };
            }
        }

        for i in 0..n - 1 {
            if swapped[i] {
                let temp = b[i];
                b[i] = b[i + 1];
                b[i + 1] = temp - dl[i] * b[i + 1];
            } else {
                b[i + 1] -= dl[i] * b[i];
            }
        }
        b[n - 1] /= d[n - 1];
        b[n - 2] = (b[n - 2] - du[n - 2] * b[n - 1]) / d[n - 2];
        for i in (0..n.saturating_sub(2)).rev() {
            b[i] = (b[i] - du[i] * b[i + 1] - du2[i] * b[i + 2]) / d[i];
        }
        b
    }
}

/// Energy of a unit-energy taper inside `[-w, w]`, via its autocorrelation.
fn concentration(taper: ArrayView1<'_, f64>, w: f64) -> f64 {
    let n = taper.len();
    let two_pi_w = 2.0 * core::f64::consts::PI * w;
    let mut lambda = 2.0 * w * taper.dot(&taper);
    for lag in 1..n {
        let r: f64 = (0..n - lag).map(|i| taper[i] * taper[i + lag]).sum();
        lambda += 2.0 * r * (two_pi_w * lag as f64).sin() / (core::f64::consts::PI * lag as f64);
    }
    lambda.clamp(0.0, 1.0)
}

/// Generate `k` Slepian tapers of length `n` for time-bandwidth product `nw`.
pub fn dpss_tapers(n: usize, nw: f64, k: usize) -> Result<Tapers> {
    let kernel = DpssKernel::try_new(DpssConfig { n, nw, k })?;
    kernel.run_alloc()
}
