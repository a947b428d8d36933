//! Multichannel orchestration: per-channel spectra plus the pairwise matrix.

use itertools::Itertools;
use mtspec_core::{Error, Result};

use super::cross::{MultitaperConfig, MultitaperKernel};
use super::result::{SpectralResult, Spectrum};
use super::tsq::{run_groups, validate_groups};
use super::types::{CrossOptions, EigenCoefs, MatrixKind, OutputKind};
use crate::kernel::{ConfigError, KernelLifecycle, Read2D};
use crate::report::Diagnostic;

/// Strict upper triangle of a `p × p` matrix of pairwise results.
///
/// Only cells `(i, j)` with `i < j` are ever populated; the diagonal and the
/// lower triangle are always empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossMatrix {
    channels: usize,
    cells: Vec<Option<SpectralResult>>,
}

impl CrossMatrix {
    fn empty(channels: usize) -> Self {
        Self {
            channels,
            cells: vec![None; channels * channels],
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Result for the pair `(i, j)`; `None` unless `i < j < channels`.
    pub fn get(&self, i: usize, j: usize) -> Option<&SpectralResult> {
        if i >= j || j >= self.channels {
            return None;
        }
        self.cells[i * self.channels + j].as_ref()
    }

    /// Number of populated cells.
    pub fn populated(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Populated cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &SpectralResult)> {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref()
                .map(|r| ((idx / self.channels, idx % self.channels), r))
        })
    }
}

/// Per-channel spectra, the optional pairwise matrix and the optional T²
/// p-values of a multichannel estimate.
pub type MultivariateResult = (Vec<Spectrum>, Option<CrossMatrix>, Option<Vec<f64>>);

impl MultitaperKernel {
    /// Estimate every channel of an `[n, p]` record and, unless `kind` is
    /// [`MatrixKind::SpectraOnly`], every pair `i < j`.
    ///
    /// T² groups stack all `p` channels, so each group contributes `p g`
    /// rows.
    pub fn multivariate<D>(
        &self,
        data: &D,
        kind: MatrixKind,
        tsq: Option<&[Vec<usize>]>,
    ) -> Result<MultivariateResult>
    where
        D: Read2D<f64> + ?Sized,
    {
        let view = data.read_view();
        let (n, p) = view.dim();
        if p == 0 || n == 0 {
            return Err(ConfigError::EmptyInput { arg: "data" }.into());
        }
        if n != self.params().n {
            return Err(Error::length_mismatch("data.rows", self.params().n, n));
        }
        if let Some(groups) = tsq {
            validate_groups(groups, self.config().k, self.params().spectrum_len())?;
        }
        let pairs = p * (p - 1) / 2;
        if p > 3 {
            self.reporter().report(Diagnostic::ManyChannels { channels: p, pairs });
        }

        let coefs = view
            .columns()
            .into_iter()
            .map(|column| {
                let series = column.to_vec();
                self.coefficients_of(&series)
            })
            .collect::<Result<Vec<EigenCoefs>>>()?;

        let tsq = tsq.map(|groups| {
            let sets: Vec<&EigenCoefs> = coefs.iter().collect();
            run_groups(&sets, groups, &self.tapers().mean_direction(), self.reporter())
        });

        let outp = match kind {
            MatrixKind::CrossSpectra => Some(OutputKind::Spectrum),
            MatrixKind::Coherence => Some(OutputKind::Coherence),
            MatrixKind::SpectraOnly => None,
        };
        let matrix = match outp {
            Some(outp) => {
                let mut matrix = CrossMatrix::empty(p);
                let opts = CrossOptions::default();
                for (i, j) in (0..p).tuple_combinations() {
                    let cell = self.cross_checked(&coefs[i], &coefs[j], outp, &opts, false)?;
                    matrix.cells[i * p + j] = Some(cell);
                }
                Some(matrix)
            }
            None => None,
        };

        let spectra = coefs
            .into_iter()
            .map(|c| self.spectrum_from_coefficients(c, None))
            .collect::<Result<Vec<Spectrum>>>()?;

        Ok((spectra, matrix, tsq))
    }
}

/// Multichannel estimate of an `[n, p]` record; `config.n` is taken from
/// the record.
pub fn multispec_multivariate<D>(
    data: &D,
    config: MultitaperConfig,
    kind: MatrixKind,
    tsq: Option<&[Vec<usize>]>,
) -> Result<MultivariateResult>
where
    D: Read2D<f64> + ?Sized,
{
    let n = data.read_view().nrows();
    let kernel = MultitaperKernel::try_new(MultitaperConfig { n, ..config })?;
    kernel.multivariate(data, kind, tsq)
}
