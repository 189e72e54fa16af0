use crate::error::{DiagnosticsError, Result};

/// Default Gelman-Rubin threshold below which chains count as converged.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1.1;

/// Default probability mass of the highest density interval.
pub const DEFAULT_HDI_PROBABILITY: f64 = 0.95;

/// Kernel density settings for the posterior mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOptions {
    /// Gaussian kernel bandwidth.  `None` selects Silverman's rule of thumb.
    pub bandwidth: Option<f64>,
    /// Number of evenly spaced points between the smallest and largest
    /// sample at which the density is evaluated.
    pub grid_points: usize,
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            bandwidth: None,
            grid_points: 512,
        }
    }
}

impl ModeOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(h) = self.bandwidth {
            if !(h.is_finite() && h > 0.0) {
                return Err(DiagnosticsError::InvalidBandwidth(h));
            }
        }
        if self.grid_points < 2 {
            return Err(DiagnosticsError::InvalidGrid(self.grid_points));
        }
        Ok(())
    }
}

/// Settings for [`summarize`](crate::report::summarize) and
/// [`convergence_report`](crate::report::convergence_report).
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Autocorrelation lags to report.  Defaults match coda's `autocorr.diag`.
    pub lags: Vec<usize>,
    pub hdi_probability: f64,
    pub convergence_threshold: f64,
    pub mode: ModeOptions,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            lags: vec![0, 1, 5, 10, 50],
            hdi_probability: DEFAULT_HDI_PROBABILITY,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            mode: ModeOptions::default(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability(self.hdi_probability)?;
        check_threshold(self.convergence_threshold)?;
        self.mode.validate()
    }
}

pub(crate) fn check_probability(probability: f64) -> Result<()> {
    // NaN fails both comparisons
    if probability > 0.0 && probability < 1.0 {
        Ok(())
    } else {
        Err(DiagnosticsError::InvalidProbability(probability))
    }
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(DiagnosticsError::InvalidThreshold(threshold))
    }
}
