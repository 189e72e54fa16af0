use crate::chain::Chain;
use crate::error::{DiagnosticsError, Result};
use crate::Array1;

/// Autocorrelation of one parameter's trace at lags `0..=max_lag`.
///
/// Lag 0 is always 1.  Lag `k` is the Pearson correlation between the
/// first `n - k` values and the last `n - k` values of the trace, so each
/// lag is computed against its own segment means rather than the mean of
/// the whole chain.  When one of the segments is constant the correlation
/// is undefined and reported as 0.
///
/// # Arguments
/// * `chain` - Chain holding the samples
/// * `parameter_index` - Which parameter of each sample to use
/// * `max_lag` - Largest lag, must be smaller than the chain length
pub fn autocorrelation(chain: &Chain, parameter_index: usize, max_lag: usize) -> Result<Array1> {
    let values = chain.parameter(parameter_index)?;
    if max_lag >= values.len() {
        return Err(DiagnosticsError::InsufficientData {
            max_lag,
            length: values.len(),
        });
    }
    Ok((0..=max_lag)
        .map(|lag| lagged_correlation(&values, lag))
        .collect())
}

/// Pearson correlation of `values[..n - lag]` against `values[lag..]`.
/// Callers guarantee `lag < values.len()`.
pub(crate) fn lagged_correlation(values: &[f64], lag: usize) -> f64 {
    if lag == 0 {
        return 1.0;
    }
    let n = values.len() - lag;
    let head = &values[..n];
    let tail = &values[lag..];
    let head_mean = head.iter().sum::<f64>() / n as f64;
    let tail_mean = tail.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut head_ss = 0.0;
    let mut tail_ss = 0.0;
    for (a, b) in head.iter().zip(tail) {
        let da = a - head_mean;
        let db = b - tail_mean;
        cov += da * db;
        head_ss += da * da;
        tail_ss += db * db;
    }
    let denom = (head_ss * tail_ss).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom).max(-1.0).min(1.0)
}
