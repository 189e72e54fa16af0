use crate::autocorr::lagged_correlation;
use crate::chain::{Chain, ChainSet};
use crate::error::Result;
use crate::utils::{mean, sample_variance, split_chains, trim_chains};
use anyhow::{anyhow, bail};
use arima::acf;

/// Effective sample size of one parameter within a single chain,
/// `n / (1 + 2 * sum(rho_k))`.
///
/// Autocorrelations from [`autocorrelation`](crate::autocorr::autocorrelation)
/// are accumulated from lag 1 and the sum is truncated at the first
/// non-positive term.  The result is clamped to `[1, n]`.
///
/// Each lag costs O(n), so a chain that stays positively correlated out to
/// long lags (a strong trend, say) costs up to O(n²).
pub fn effective_sample_size(chain: &Chain, parameter_index: usize) -> Result<f64> {
    let values = chain.parameter(parameter_index)?;
    let n = values.len();

    let mut rho_sum = 0.0;
    for lag in 1..n {
        let rho = lagged_correlation(&values, lag);
        if rho <= 0.0 {
            break;
        }
        rho_sum += rho;
    }

    let ess = n as f64 / (1.0 + 2.0 * rho_sum);
    let clamped = ess.max(1.0).min(n as f64);
    if clamped != ess {
        log::warn!(
            "effective sample size {:.3} for parameter {} clamped to {}",
            ess,
            parameter_index,
            clamped
        );
    }
    Ok(clamped)
}

/// Computes the effective sample size (ESS) for the specified
/// parameter across all chains of the set.  The value returned is the
/// minimum of ESS and the number_total_draws * log10(number_total_draws).
///
/// Chains are trimmed from the back to match the
/// length of the shortest chain.  Note that the effective sample size
/// can not be estimated with fewer than four draws.
///
/// See more details in Stan reference manual section
/// ["Effective Sample Size"](http://mc-stan.org/users/documentation)
///
/// Based on reference implementation in Stan v2.4.0 at
/// [https://github.com/stan-dev/stan/blob/v2.24.0/src/stan/analyze/mcmc/compute_effective_sample_size.hpp#L32-L138]()
pub fn combined_effective_sample_size(chain_set: &ChainSet, parameter_index: usize) -> Result<f64> {
    let draws = chain_set.parameter_draws(parameter_index)?;
    Ok(geyer_effective_sample_size(&draws)?)
}

/// Same as [`combined_effective_sample_size`] after splitting every chain
/// in half.  When the number of draws N is odd, the (N+1)/2th draw is
/// ignored.
///
/// Based on reference implementation in Stan v2.4.0 at
/// [https://github.com/stan-dev/stan/blob/v2.24.0/src/stan/analyze/mcmc/compute_effective_sample_size.hpp#L185-L199]()
pub fn split_effective_sample_size(chain_set: &ChainSet, parameter_index: usize) -> Result<f64> {
    let draws = chain_set.parameter_draws(parameter_index)?;
    let split = split_chains(&draws)?;
    Ok(geyer_effective_sample_size(&split)?)
}

/// Computes the Monte Carlo Standard Error (MCSE) for the specified parameter
/// across all samples, which is the standard deviation of the samples over the
/// square root of effective sample size.
///
/// See the Stan reference manual section
/// ["Estimation of MCMC Standard Error"](https://mc-stan.org/docs/2_24/reference-manual/effective-sample-size-section.html#estimation-of-mcmc-standard-error)
pub fn monte_carlo_standard_error(chain_set: &ChainSet, parameter_index: usize) -> Result<f64> {
    let draws = trim_chains(&chain_set.parameter_draws(parameter_index)?)?;
    let ess = geyer_effective_sample_size(&draws)?;
    let pooled: Vec<f64> = draws.into_iter().flatten().collect();
    let var = sample_variance(&pooled)?;
    Ok((var / ess).sqrt())
}

/// Geyer's initial positive and initial monotone sequence estimator over
/// the averaged per-chain autocovariances.
fn geyer_effective_sample_size(chains: &[Vec<f64>]) -> anyhow::Result<f64> {
    let chains = trim_chains(chains)?;
    let num_chains = chains.len();
    let num_draws = chains[0].len();

    if num_draws < 4 {
        bail!("Must have at least 4 samples to compute ESS");
    }
    if chains.iter().flatten().any(|v| !v.is_finite()) {
        bail!("All values must be finite to compute ESS");
    }
    let first = chains[0][0];
    if chains
        .iter()
        .flatten()
        .all(|v| abs_diff_eq!(*v, first, epsilon = 1e-10))
    {
        bail!("No ESS when elements are all constant (value={})", first);
    }

    let n = num_draws as f64;
    let mut chain_acov = Vec::with_capacity(num_chains);
    let mut chain_mean = Vec::with_capacity(num_chains);
    let mut chain_var = Vec::with_capacity(num_chains);
    for chain in chains.iter() {
        let acov = acf::acf(chain, None, true)
            .map_err(|e| anyhow!("Autocovariance failed: {:?}", e))?;
        chain_mean.push(mean(chain)?);
        chain_var.push(acov[0] * n / (n - 1.0));
        chain_acov.push(acov);
    }

    let mean_var = mean(&chain_var)?;
    let mut var_plus = mean_var * (n - 1.0) / n;
    if num_chains > 1 {
        var_plus += sample_variance(&chain_mean)?;
    }
    let rho_at = |lag: usize| -> anyhow::Result<f64> {
        let acov_s: Vec<f64> = chain_acov.iter().map(|acov| acov[lag]).collect();
        Ok(1.0 - (mean_var - mean(&acov_s)?) / var_plus)
    };

    let mut rho_hat_s = vec![0.0; num_draws];
    let mut rho_hat_even = 1.0;
    rho_hat_s[0] = rho_hat_even;
    let mut rho_hat_odd = rho_at(1)?;
    rho_hat_s[1] = rho_hat_odd;

    // Initial positive sequence. The last pair of autocorrelations is
    // left out as a bias term for antithetical chains.
    let mut s = 1;
    while s < num_draws - 4 && rho_hat_even + rho_hat_odd > 0.0 {
        rho_hat_even = rho_at(s + 1)?;
        rho_hat_odd = rho_at(s + 2)?;
        if rho_hat_even + rho_hat_odd >= 0.0 {
            rho_hat_s[s + 1] = rho_hat_even;
            rho_hat_s[s + 2] = rho_hat_odd;
        }
        s += 2;
    }

    let max_s = s;
    if rho_hat_even > 0.0 {
        rho_hat_s[max_s + 1] = rho_hat_even;
    }

    // Initial monotone sequence
    let mut s = 1;
    while s + 3 <= max_s {
        let prev_pair = rho_hat_s[s - 1] + rho_hat_s[s];
        if rho_hat_s[s + 1] + rho_hat_s[s + 2] > prev_pair {
            rho_hat_s[s + 1] = prev_pair / 2.0;
            rho_hat_s[s + 2] = rho_hat_s[s + 1];
        }
        s += 2;
    }

    let num_total_draws = num_chains as f64 * n;
    let tau_hat = -1.0 + 2.0 * rho_hat_s[..max_s].iter().sum::<f64>() + rho_hat_s[max_s + 1];
    Ok((num_total_draws / tau_hat).min(num_total_draws * num_total_draws.log10()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticsError;
    use crate::testing::{ar1_draws, normal_draws, scalar_chain};

    fn scalar_set(traces: Vec<Vec<f64>>) -> ChainSet {
        ChainSet::new(traces.into_iter().map(scalar_chain).collect()).unwrap()
    }

    #[test]
    fn test_identical_autocovariance_in_arima_library_and_stan() {
        let arr = vec![
            0.747858687681513,
            0.290118161168511,
            -0.66263075102762,
            -0.00794439358648058,
            0.612494029879686,
            1.15915333101436,
            0.844402455747637,
            -0.493298834393585,
            0.140306938408938,
            -0.207331367372662,
            0.344322796977632,
            -0.216755313401662,
            -0.704730639551491,
            -0.262457923752462,
            0.338587814578015,
            0.79334841402936,
            -0.495245866959037,
            -0.736378128523917,
            -1.10220108378805,
            2.37069694852591,
        ];
        let stan_acov = vec![
            0.6269672577,
            -0.0113804234,
            -0.1668563930,
            -0.2086591087,
            0.1016590536,
            0.1767212413,
            -0.0059714922,
            -0.1489622883,
            -0.0996503101,
            0.0996094900,
            0.0450098619,
            -0.0109203038,
            -0.2154921627,
            -0.0374684937,
            0.1274360411,
            0.1121981758,
            0.0073812983,
            -0.1254719533,
            -0.0208019612,
            0.0681360996,
        ];
        let arima_acf_cov = acf::acf(&arr, None, true).unwrap();

        for i in 0..arr.len() {
            assert_abs_diff_eq!(arima_acf_cov[i], stan_acov[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_single_chain_ess_of_independent_draws() {
        let chain = scalar_chain(normal_draws(7, 1000, 0.0, 1.0));
        let ess = effective_sample_size(&chain, 0).unwrap();
        assert!(ess > 500.0 && ess <= 1000.0, "ess = {}", ess);
    }

    #[test]
    fn test_single_chain_ess_of_correlated_draws() {
        // AR(1) with phi = 0.9 has ESS / n close to (1 - phi) / (1 + phi)
        let chain = scalar_chain(ar1_draws(11, 2000, 0.9));
        let ess = effective_sample_size(&chain, 0).unwrap();
        assert!(ess > 1.0 && ess < 400.0, "ess = {}", ess);
    }

    #[test]
    fn test_single_chain_ess_is_clamped() {
        // a straight line correlates perfectly at almost every lag
        let chain = scalar_chain((0..50).map(f64::from).collect());
        assert_abs_diff_eq!(effective_sample_size(&chain, 0).unwrap(), 1.0);

        let single = scalar_chain(vec![4.2]);
        assert_abs_diff_eq!(effective_sample_size(&single, 0).unwrap(), 1.0);

        let alternating = scalar_chain(vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);
        assert_abs_diff_eq!(effective_sample_size(&alternating, 0).unwrap(), 6.0);
    }

    #[test]
    fn test_single_chain_ess_bad_index() {
        let chain = scalar_chain(vec![1.0, 2.0]);
        assert!(matches!(
            effective_sample_size(&chain, 3),
            Err(DiagnosticsError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_combined_ess_of_independent_chains() {
        let set = scalar_set(vec![
            normal_draws(1, 1000, 0.0, 1.0),
            normal_draws(2, 1000, 0.0, 1.0),
        ]);
        let ess = combined_effective_sample_size(&set, 0).unwrap();
        assert!(ess > 1000.0, "ess = {}", ess);
        assert!(ess <= 2000.0 * 2000f64.log10());

        let split = split_effective_sample_size(&set, 0).unwrap();
        assert!(split > 1000.0, "split ess = {}", split);
    }

    #[test]
    fn test_combined_ess_of_correlated_chains() {
        let set = scalar_set(vec![ar1_draws(3, 1000, 0.95), ar1_draws(4, 1000, 0.95)]);
        let ess = combined_effective_sample_size(&set, 0).unwrap();
        assert!(ess > 0.0 && ess < 300.0, "ess = {}", ess);
    }

    #[test]
    pub fn combined_ess_minimum_n() {
        let set = scalar_set(vec![vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            combined_effective_sample_size(&set, 0),
            Err(DiagnosticsError::Other(_))
        ));
    }

    #[test]
    pub fn multi_chain_index_out_of_range() {
        let set = scalar_set(vec![
            normal_draws(27, 100, 0.0, 1.0),
            normal_draws(28, 100, 0.0, 1.0),
        ]);
        assert!(matches!(
            combined_effective_sample_size(&set, 1),
            Err(DiagnosticsError::IndexOutOfRange {
                index: 1,
                dimensionality: 1
            })
        ));
        assert!(matches!(
            split_effective_sample_size(&set, 1),
            Err(DiagnosticsError::IndexOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            monte_carlo_standard_error(&set, 1),
            Err(DiagnosticsError::IndexOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    pub fn combined_ess_sufficient_n() {
        let set = scalar_set(vec![vec![1.0, 2.0, 3.0, 4.0]]);
        assert!(combined_effective_sample_size(&set, 0).unwrap().is_finite());
    }

    #[test]
    pub fn combined_ess_constant() {
        let set = scalar_set(vec![vec![1.0; 4], vec![1.0; 6]]);
        assert!(combined_effective_sample_size(&set, 0).is_err());
    }

    #[test]
    fn test_geyer_rejects_nan() {
        // chains built through Chain can't hold NaN, raw draws can
        assert!(geyer_effective_sample_size(&[vec![1.0, f64::NAN, 3.0, 4.0]]).is_err());
    }

    #[test]
    fn test_monte_carlo_standard_error() {
        let set = scalar_set(vec![
            normal_draws(5, 1000, 3.0, 2.0),
            normal_draws(6, 1000, 3.0, 2.0),
        ]);
        let mcse = monte_carlo_standard_error(&set, 0).unwrap();
        // about sd / sqrt(2000)
        assert!(mcse > 0.02 && mcse < 0.1, "mcse = {}", mcse);
    }
}
