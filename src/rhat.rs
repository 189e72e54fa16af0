use crate::chain::ChainSet;
use crate::config::check_threshold;
use crate::error::{DiagnosticsError, Result};
use crate::utils::{mean, sample_variance, split_chains, trim_chains};
use std::fmt;

/// Outcome of [`convergence_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceVerdict {
    Converged,
    NotConverged,
}

impl ConvergenceVerdict {
    /// `Converged` when `rhat` is strictly below `threshold`.
    pub fn from_rhat(rhat: f64, threshold: f64) -> Self {
        if rhat < threshold {
            ConvergenceVerdict::Converged
        } else {
            ConvergenceVerdict::NotConverged
        }
    }
}

impl fmt::Display for ConvergenceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceVerdict::Converged => write!(f, "converged"),
            ConvergenceVerdict::NotConverged => write!(f, "not converged"),
        }
    }
}

/// Gelman-Rubin check across the chains of the set: `Converged` when the
/// potential scale reduction factor of the parameter is below `threshold`
/// (conventionally 1.1).
pub fn convergence_check(
    chain_set: &ChainSet,
    parameter_index: usize,
    threshold: f64,
) -> Result<ConvergenceVerdict> {
    check_threshold(threshold)?;
    let rhat = potential_scale_reduction(chain_set, parameter_index)?;
    let verdict = ConvergenceVerdict::from_rhat(rhat, threshold);
    log::debug!(
        "parameter {}: rhat {:.4} against threshold {} -> {}",
        parameter_index,
        rhat,
        threshold,
        verdict
    );
    Ok(verdict)
}

/// Computes the potential scale reduction (Rhat) for the specified
/// parameter across all chains of the set.  Chains are trimmed from the
/// back to match the length of the shortest chain.
///
/// See more details in Stan reference manual section
/// ["Potential Scale Reduction"](https://mc-stan.org/docs/2_24/reference-manual/notation-for-samples-chains-and-draws.html#potential-scale-reduction).
///
/// Based on reference implementation in Stan v2.24.0 at
/// [https://github.com/stan-dev/stan/blob/v2.24.0/src/stan/analyze/mcmc/compute_potential_scale_reduction.hpp]()
pub fn potential_scale_reduction(chain_set: &ChainSet, parameter_index: usize) -> Result<f64> {
    let draws = trim_chains(&replicate_draws(chain_set, parameter_index)?)?;
    require_draws(&draws, 2)?;
    Ok(scale_reduction(&draws)?)
}

/// Computes the split potential scale reduction (Rhat) for the
/// specified parameter.  When the number of draws N is odd, the
/// (N+1)/2th draw is ignored.
///
/// See more details in Stan reference manual section
/// ["Potential Scale Reduction"](https://mc-stan.org/docs/2_24/reference-manual/notation-for-samples-chains-and-draws.html#potential-scale-reduction)
pub fn split_potential_scale_reduction(
    chain_set: &ChainSet,
    parameter_index: usize,
) -> Result<f64> {
    let draws = split_chains(&replicate_draws(chain_set, parameter_index)?)?;
    require_draws(&draws, 2)?;
    Ok(scale_reduction(&draws)?)
}

fn replicate_draws(chain_set: &ChainSet, parameter_index: usize) -> Result<Vec<Vec<f64>>> {
    if chain_set.len() < 2 {
        return Err(DiagnosticsError::InsufficientChains(chain_set.len()));
    }
    chain_set.parameter_draws(parameter_index)
}

fn require_draws(chains: &[Vec<f64>], required: usize) -> Result<()> {
    let found = chains.iter().map(Vec::len).min().unwrap_or(0);
    if found < required {
        return Err(DiagnosticsError::TooFewDraws { required, found });
    }
    Ok(())
}

/// `sqrt((B / W + n - 1) / n)` over equal-length chains.  Zero
/// within-chain variance gives `sqrt((n - 1) / n)` when the chain means
/// also agree (B/W taken as 0) and infinity otherwise.
fn scale_reduction(chains: &[Vec<f64>]) -> anyhow::Result<f64> {
    let n = chains[0].len() as f64;
    let mut chain_mean = Vec::with_capacity(chains.len());
    let mut chain_var = Vec::with_capacity(chains.len());
    for chain in chains {
        chain_mean.push(mean(chain)?);
        chain_var.push(sample_variance(chain)?);
    }

    let var_between = n * sample_variance(&chain_mean)?;
    let var_within = mean(&chain_var)?;
    if var_within == 0.0 {
        log::warn!(
            "zero within-chain variance (between-chain variance {})",
            var_between
        );
        return Ok(if var_between == 0.0 {
            ((n - 1.0) / n).sqrt()
        } else {
            f64::INFINITY
        });
    }
    Ok(((var_between / var_within + n - 1.0) / n).sqrt())
}
