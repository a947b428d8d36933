//! Diagnostics emitted during estimation.
//!
//! Estimation never prints. Notices that are not errors are handed to a
//! [`Reporter`]; the default [`TracingReporter`] forwards them to `tracing`,
//! and [`CollectingReporter`] keeps them so callers and tests can inspect
//! what happened.

use std::sync::Mutex;

/// A non-fatal event raised while estimating.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The multichannel orchestrator was asked for many channels; pairwise
    /// products grow quadratically with the channel count.
    ManyChannels {
        /// Number of channels.
        channels: usize,
        /// Number of pairwise products that will be computed.
        pairs: usize,
    },
    /// A T² test group had at least as many stacked rows as tapers and was
    /// reported as `NaN`.
    DegenerateTsq {
        /// Stacked rows (channels times bins in the group).
        rows: usize,
        /// Taper count.
        tapers: usize,
    },
    /// Adaptive weighting stopped at the iteration cap without meeting the
    /// tolerance at some bins.
    AdaptiveNotConverged {
        /// Number of bins that did not converge.
        bins: usize,
        /// Iteration cap that was hit.
        iterations: usize,
    },
}

/// Sink for [`Diagnostic`]s.
pub trait Reporter {
    /// Receive one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at `info` (notices) or `warn` (soft failures).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::ManyChannels { channels, pairs } => {
                tracing::info!(
                    channels,
                    pairs,
                    "computing all pairwise cross-spectra; this may take a while"
                );
            }
            Diagnostic::DegenerateTsq { rows, tapers } => {
                tracing::warn!(
                    rows,
                    tapers,
                    "T² test needs more tapers than stacked rows; group reported as NaN"
                );
            }
            Diagnostic::AdaptiveNotConverged { bins, iterations } => {
                tracing::debug!(bins, iterations, "adaptive weights hit the iteration cap");
            }
        }
    }
}

/// Stores every diagnostic it receives.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics received so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(Diagnostic::ManyChannels {
            channels: 5,
            pairs: 10,
        });
        reporter.report(Diagnostic::DegenerateTsq { rows: 8, tapers: 6 });
        assert_eq!(
            reporter.events(),
            vec![
                Diagnostic::ManyChannels {
                    channels: 5,
                    pairs: 10
                },
                Diagnostic::DegenerateTsq { rows: 8, tapers: 6 },
            ]
        );
    }

    #[test]
    fn tracing_reporter_accepts_every_kind() {
        let reporter = TracingReporter;
        reporter.report(Diagnostic::AdaptiveNotConverged {
            bins: 1,
            iterations: 100,
        });
    }
}
