use crate::error::{DiagnosticsError, Result};
use crate::{Array1, Array2};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// An ordered sequence of samples from one sampler run, every sample
/// holding the same number of parameters.
///
/// The chain is assumed to already be post burn-in and thinning; the
/// `burn_in` and `thinning` attributes only record how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    samples: Array2,
    dimensionality: usize,
    burn_in: Option<usize>,
    thinning: Option<usize>,
}

impl Chain {
    /// Builds a chain from row-major samples (one `Vec` per sampling step).
    pub fn new(samples: Array2) -> Result<Self> {
        let dimensionality = samples.first().map(|s| s.len()).unwrap_or(0);
        if dimensionality == 0 {
            return Err(DiagnosticsError::EmptyChain);
        }
        for (i, sample) in samples.iter().enumerate() {
            if sample.len() != dimensionality {
                return Err(DiagnosticsError::DimensionMismatch {
                    sample: i,
                    expected: dimensionality,
                    found: sample.len(),
                });
            }
            if let Some(p) = sample.iter().position(|v| !v.is_finite()) {
                return Err(DiagnosticsError::NonFiniteSample {
                    sample: i,
                    parameter: p,
                });
            }
        }
        Ok(Self {
            samples,
            dimensionality,
            burn_in: None,
            thinning: None,
        })
    }

    /// Builds a one-parameter chain from a trace of values.
    pub fn from_scalar(values: Array1) -> Result<Self> {
        Self::new(values.into_iter().map(|v| vec![v]).collect())
    }

    /// Reads a chain from a comma separated file holding one sample per
    /// line, skipping the first `skip_rows` lines (headers, comments).
    /// Blank lines are ignored.
    pub fn from_csv<P: AsRef<Path>>(path: P, skip_rows: usize) -> Result<Self> {
        let f = BufReader::new(File::open(path)?);
        let mut samples: Array2 = Vec::new();
        for (idx, line) in f.lines().enumerate().skip(skip_rows) {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let sample = line
                .split(',')
                .map(|value| {
                    value
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| DiagnosticsError::Parse {
                            line: idx + 1,
                            value: value.to_string(),
                        })
                })
                .collect::<Result<Array1>>()?;
            samples.push(sample);
        }
        Self::new(samples)
    }

    /// Records how many warm-up iterations were discarded before this chain.
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = Some(burn_in);
        self
    }

    /// Records the thinning interval used when this chain was stored.
    pub fn with_thinning(mut self, thinning: usize) -> Self {
        self.thinning = Some(thinning);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction rejects empty chains.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn burn_in(&self) -> Option<usize> {
        self.burn_in
    }

    pub fn thinning(&self) -> Option<usize> {
        self.thinning
    }

    pub fn samples(&self) -> &[Array1] {
        &self.samples
    }

    /// Fails with `IndexOutOfRange` unless `index < dimensionality`.
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.dimensionality {
            return Err(DiagnosticsError::IndexOutOfRange {
                index,
                dimensionality: self.dimensionality,
            });
        }
        Ok(())
    }

    /// The trace of one parameter across all samples.
    pub fn parameter(&self, index: usize) -> Result<Array1> {
        self.check_index(index)?;
        Ok(self.samples.iter().map(|s| s[index]).collect())
    }
}

/// Independent replicate chains of the same model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSet {
    chains: Vec<Chain>,
}

impl ChainSet {
    /// Fails on an empty set or when the chains disagree on dimensionality.
    /// Chains may differ in length.
    pub fn new(chains: Vec<Chain>) -> Result<Self> {
        let first = chains.first().ok_or(DiagnosticsError::EmptyChainSet)?;
        let expected = first.dimensionality();
        for (i, chain) in chains.iter().enumerate() {
            if chain.dimensionality() != expected {
                return Err(DiagnosticsError::ChainDimensionMismatch {
                    chain: i,
                    expected,
                    found: chain.dimensionality(),
                });
            }
        }
        Ok(Self { chains })
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn dimensionality(&self) -> usize {
        self.chains[0].dimensionality()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Length of the shortest chain.
    pub fn min_len(&self) -> usize {
        self.chains.iter().map(Chain::len).min().unwrap_or(0)
    }

    /// One trace per chain for the given parameter.
    pub fn parameter_draws(&self, index: usize) -> Result<Array2> {
        self.chains.iter().map(|c| c.parameter(index)).collect()
    }
}
