//! Point and interval estimates of the marginal posterior of one parameter.

use crate::chain::Chain;
use crate::config::{check_probability, ModeOptions};
use crate::error::Result;
use crate::utils::{mean, quantile_sorted, sample_variance, sorted};

/// Arithmetic mean of the parameter's trace.
pub fn posterior_mean(chain: &Chain, parameter_index: usize) -> Result<f64> {
    let values = chain.parameter(parameter_index)?;
    Ok(mean(&values)?)
}

/// Sample standard deviation of the parameter's trace (0 for a single sample).
pub fn posterior_sd(chain: &Chain, parameter_index: usize) -> Result<f64> {
    let values = chain.parameter(parameter_index)?;
    if values.len() < 2 {
        return Ok(0.0);
    }
    Ok(sample_variance(&values)?.sqrt())
}

/// Posterior mode using the default [`ModeOptions`].
pub fn posterior_mode(chain: &Chain, parameter_index: usize) -> Result<f64> {
    posterior_mode_with(chain, parameter_index, &ModeOptions::default())
}

/// Location of the highest point of a Gaussian kernel density estimate.
///
/// The density is evaluated at `options.grid_points` evenly spaced points
/// from the smallest to the largest sample; the first grid point with the
/// highest density wins, so the estimate is deterministic for a given
/// trace and bandwidth.  A constant trace returns its value.
pub fn posterior_mode_with(
    chain: &Chain,
    parameter_index: usize,
    options: &ModeOptions,
) -> Result<f64> {
    options.validate()?;
    let values = sorted(&chain.parameter(parameter_index)?);
    let lo = values[0];
    let hi = values[values.len() - 1];
    if hi == lo {
        return Ok(lo);
    }

    let bandwidth = match options.bandwidth {
        Some(h) => h,
        None => silverman_bandwidth(&values)?,
    };
    let step = (hi - lo) / (options.grid_points - 1) as f64;

    let mut best_x = lo;
    let mut best_density = f64::NEG_INFINITY;
    for i in 0..options.grid_points {
        let x = lo + step * i as f64;
        let density = kernel_sum(&values, x, bandwidth);
        if density > best_density {
            best_density = density;
            best_x = x;
        }
    }
    Ok(best_x)
}

/// Silverman's rule of thumb, `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`.
/// Falls back to the standard deviation when the IQR is zero.
fn silverman_bandwidth(sorted_values: &[f64]) -> Result<f64> {
    let sd = sample_variance(sorted_values)?.sqrt();
    let iqr = quantile_sorted(sorted_values, 0.75) - quantile_sorted(sorted_values, 0.25);
    let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
    Ok(0.9 * spread * (sorted_values.len() as f64).powf(-0.2))
}

/// Unnormalised Gaussian kernel density at `x`.
fn kernel_sum(values: &[f64], x: f64, bandwidth: f64) -> f64 {
    values
        .iter()
        .map(|v| {
            let z = (x - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum()
}

/// Narrowest interval holding `probability` of the samples.
///
/// A window of `ceil(probability * n)` consecutive sorted values slides
/// across the trace and the narrowest window is returned as
/// `(lower, upper)`; ties go to the lowest window.
pub fn highest_density_interval(
    chain: &Chain,
    parameter_index: usize,
    probability: f64,
) -> Result<(f64, f64)> {
    let values = chain.parameter(parameter_index)?;
    check_probability(probability)?;
    let values = sorted(&values);
    let n = values.len();
    let size = window_size(probability, n);

    let mut best = 0;
    let mut best_width = f64::INFINITY;
    for start in 0..=(n - size) {
        let width = values[start + size - 1] - values[start];
        if width < best_width {
            best_width = width;
            best = start;
        }
    }
    Ok((values[best], values[best + size - 1]))
}

fn window_size(probability: f64, n: usize) -> usize {
    // p * n like 0.95 * 100 can land a hair above the integer
    let size = (probability * n as f64 - 1e-9).ceil() as usize;
    size.max(1).min(n)
}
