use thiserror::Error;

/// Errors reported by chain construction and the diagnostics.
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// The chain is too short for the requested lag.
    #[error("maximum lag {max_lag} requires more than {length} samples")]
    InsufficientData { max_lag: usize, length: usize },

    /// Interval probability outside the open interval (0, 1).
    #[error("probability must lie strictly between 0 and 1 (got {0})")]
    InvalidProbability(f64),

    /// Convergence checks need replicate chains.
    #[error("convergence check needs at least 2 chains (got {0})")]
    InsufficientChains(usize),

    /// Every chain needs at least `required` draws for a variance estimate.
    #[error("need at least {required} draws per chain (got {found})")]
    TooFewDraws { required: usize, found: usize },

    #[error("parameter index {index} out of range for dimensionality {dimensionality}")]
    IndexOutOfRange { index: usize, dimensionality: usize },

    #[error("a chain needs at least one sample of at least one parameter")]
    EmptyChain,

    #[error("a chain set needs at least one chain")]
    EmptyChainSet,

    #[error("sample {sample} has {found} parameters, expected {expected}")]
    DimensionMismatch {
        sample: usize,
        expected: usize,
        found: usize,
    },

    #[error("chain {chain} has {found} parameters, expected {expected}")]
    ChainDimensionMismatch {
        chain: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample {sample} has a non-finite value for parameter {parameter}")]
    NonFiniteSample { sample: usize, parameter: usize },

    #[error("kernel bandwidth must be finite and positive (got {0})")]
    InvalidBandwidth(f64),

    #[error("density grid needs at least 2 points (got {0})")]
    InvalidGrid(usize),

    #[error("convergence threshold must be finite and positive (got {0})")]
    InvalidThreshold(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: cannot parse {value:?} as a number")]
    Parse { line: usize, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DiagnosticsError>;
