use crate::Array2;
use anyhow::{anyhow, Error, Result};
use average::{Mean, Variance};

/// Compute the arithmetic mean of an array.
pub fn mean(arr: &[f64]) -> Result<f64, Error> {
    if arr.is_empty() {
        return Err(anyhow!("Can't take mean of empty array"));
    }
    let m: Mean = arr.iter().copied().collect();
    Ok(m.mean())
}

/// Compute the sample variance of an array using Bessel's correction.
pub fn sample_variance(arr: &[f64]) -> Result<f64, Error> {
    if arr.len() < 2 {
        return Err(anyhow!(
            "Sample variance needs at least two values (got {})",
            arr.len()
        ));
    }
    let v: Variance = arr.iter().copied().collect();
    Ok(v.sample_variance())
}

/// Trims every chain from the back to the length of the shortest one.
pub fn trim_chains(chains: &[Vec<f64>]) -> Result<Array2, Error> {
    let num_draws = chains
        .iter()
        .map(|c| c.len())
        .min()
        .ok_or_else(|| anyhow!("Can't trim empty array of chains"))?;
    Ok(chains.iter().map(|c| c[..num_draws].to_vec()).collect())
}

/// Splits each chain into two chains of equal length.  When the
/// number of total draws N is odd, the (N+1)/2th draw is ignored.
///
/// See more details in Stan reference manual section
/// ["Effective Sample Size"](http://mc-stan.org/users/documentation).
///
/// Chains of unequal length are trimmed to the shortest first.
pub fn split_chains(chains: &[Vec<f64>]) -> Result<Array2, Error> {
    let trimmed = trim_chains(chains)?;
    let num_draws = trimmed[0].len();
    if num_draws < 1 {
        return Err(anyhow!("No samples to split"));
    }
    let half = num_draws / 2;
    let offset = num_draws % 2;
    let mut split_draws = Vec::with_capacity(trimmed.len() * 2);
    for chain in trimmed {
        split_draws.push(chain[..half].to_vec());
        split_draws.push(chain[(half + offset)..].to_vec());
    }
    Ok(split_draws)
}

/// Sorts a copy of the values in ascending order.  Callers guarantee
/// the values are finite.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
