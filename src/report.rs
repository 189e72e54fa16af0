//! Per-parameter summaries of a chain or a set of replicate chains.

use crate::autocorr::autocorrelation;
use crate::chain::{Chain, ChainSet};
use crate::config::DiagnosticsConfig;
use crate::error::Result;
use crate::ess::{
    combined_effective_sample_size, effective_sample_size, monte_carlo_standard_error,
};
use crate::posterior::{
    highest_density_interval, posterior_mean, posterior_mode_with, posterior_sd,
};
use crate::rhat::{potential_scale_reduction, split_potential_scale_reduction, ConvergenceVerdict};
use rayon::prelude::*;

/// Marginal statistics of one parameter of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub index: usize,
    pub mean: f64,
    pub sd: f64,
    pub mode: f64,
    /// Highest density interval as `(lower, upper)`.
    pub hdi: (f64, f64),
    /// `(lag, autocorrelation)` for every configured lag below the chain length.
    pub autocorrelation: Vec<(usize, f64)>,
    pub effective_sample_size: f64,
}

/// Summary of every parameter of a single chain.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub num_samples: usize,
    pub hdi_probability: f64,
    pub parameters: Vec<ParameterSummary>,
}

/// Convergence statistics of one parameter across replicate chains.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterConvergence {
    pub index: usize,
    pub rhat: f64,
    pub split_rhat: f64,
    pub effective_sample_size: f64,
    pub mcse: f64,
    pub verdict: ConvergenceVerdict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceReport {
    pub num_chains: usize,
    pub threshold: f64,
    pub parameters: Vec<ParameterConvergence>,
}

impl ConvergenceReport {
    /// True when every parameter is below the threshold.
    pub fn converged(&self) -> bool {
        self.parameters
            .iter()
            .all(|p| p.verdict == ConvergenceVerdict::Converged)
    }
}

/// Computes a [`ParameterSummary`] for every parameter of the chain.
/// Parameters are summarised in parallel.
pub fn summarize(chain: &Chain, config: &DiagnosticsConfig) -> Result<DiagnosticReport> {
    config.validate()?;
    let parameters = (0..chain.dimensionality())
        .into_par_iter()
        .map(|index| summarize_parameter(chain, index, config))
        .collect::<Result<Vec<_>>>()?;
    Ok(DiagnosticReport {
        num_samples: chain.len(),
        hdi_probability: config.hdi_probability,
        parameters,
    })
}

fn summarize_parameter(
    chain: &Chain,
    index: usize,
    config: &DiagnosticsConfig,
) -> Result<ParameterSummary> {
    let lags: Vec<usize> = config
        .lags
        .iter()
        .copied()
        .filter(|&lag| lag < chain.len())
        .collect();
    if lags.len() < config.lags.len() {
        log::debug!(
            "skipping autocorrelation lags at or beyond chain length {}",
            chain.len()
        );
    }
    let acf = match lags.iter().max() {
        Some(&max_lag) => autocorrelation(chain, index, max_lag)?,
        None => Vec::new(),
    };

    Ok(ParameterSummary {
        index,
        mean: posterior_mean(chain, index)?,
        sd: posterior_sd(chain, index)?,
        mode: posterior_mode_with(chain, index, &config.mode)?,
        hdi: highest_density_interval(chain, index, config.hdi_probability)?,
        autocorrelation: lags.into_iter().map(|lag| (lag, acf[lag])).collect(),
        effective_sample_size: effective_sample_size(chain, index)?,
    })
}

/// Gelman-Rubin statistics, multi-chain ESS and MCSE for every parameter
/// of the set, judged against `config.convergence_threshold`.
pub fn convergence_report(
    chain_set: &ChainSet,
    config: &DiagnosticsConfig,
) -> Result<ConvergenceReport> {
    config.validate()?;
    let threshold = config.convergence_threshold;
    let parameters = (0..chain_set.dimensionality())
        .into_par_iter()
        .map(|index| parameter_convergence(chain_set, index, threshold))
        .collect::<Result<Vec<_>>>()?;
    Ok(ConvergenceReport {
        num_chains: chain_set.len(),
        threshold,
        parameters,
    })
}

fn parameter_convergence(
    chain_set: &ChainSet,
    index: usize,
    threshold: f64,
) -> Result<ParameterConvergence> {
    let rhat = potential_scale_reduction(chain_set, index)?;
    Ok(ParameterConvergence {
        index,
        rhat,
        split_rhat: split_potential_scale_reduction(chain_set, index)?,
        effective_sample_size: combined_effective_sample_size(chain_set, index)?,
        mcse: monte_carlo_standard_error(chain_set, index)?,
        verdict: ConvergenceVerdict::from_rhat(rhat, threshold),
    })
}
