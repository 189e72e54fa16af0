//! A Rust library for diagnosing the output of MCMC samplers: lagged
//! autocorrelation, effective sample size, posterior mean, mode and highest
//! density intervals, and Gelman Rubin convergence checks across replicate
//! chains.
//!
//! The sampler itself is out of scope; any source of draws (Stan, MCMCglmm,
//! PyMC, a hand-written Gibbs sampler) can be wrapped in a [`Chain`].
//!
//! ```
//! use chain_diagnostics::{autocorrelation, highest_density_interval, Chain};
//!
//! let chain = Chain::from_scalar(vec![0.1, 0.4, 0.3, 0.7, 0.5, 0.9]).unwrap();
//! let acf = autocorrelation(&chain, 0, 2).unwrap();
//! assert_eq!(acf[0], 1.0);
//! let (lower, upper) = highest_density_interval(&chain, 0, 0.5).unwrap();
//! assert!(lower <= upper);
//! ```
#[macro_use]
extern crate approx;

/// Lagged autocorrelation of a single chain
pub mod autocorr;
/// Chains and sets of replicate chains
pub mod chain;
/// Analysis settings and their defaults
pub mod config;
/// Error type and result alias
pub mod error;
/// Effective Sample Size (ESS) and Monte Carlo standard error
pub mod ess;
/// Posterior mean, mode and highest density intervals
pub mod posterior;
/// Per-parameter diagnostic and convergence reports
pub mod report;
/// Gelman-Rubin potential scale reduction (Rhat) and convergence checks
pub mod rhat;
/// Summary statistics and chain splitting helpers
pub mod utils;

#[cfg(test)]
mod testing;

/// One-dimensional vector of numeric values
pub type Array1 = Vec<f64>;
/// Two dimensional vector of vectors of numeric values
pub type Array2 = Vec<Array1>;

pub use autocorr::autocorrelation;
pub use chain::{Chain, ChainSet};
pub use config::{DiagnosticsConfig, ModeOptions};
pub use error::{DiagnosticsError, Result};
pub use ess::{
    combined_effective_sample_size, effective_sample_size, monte_carlo_standard_error,
    split_effective_sample_size,
};
pub use posterior::{
    highest_density_interval, posterior_mean, posterior_mode, posterior_mode_with, posterior_sd,
};
pub use report::{convergence_report, summarize, ConvergenceReport, DiagnosticReport};
pub use rhat::{
    convergence_check, potential_scale_reduction, split_potential_scale_reduction,
    ConvergenceVerdict,
};
