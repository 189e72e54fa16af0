//! Seeded draw generators shared by the unit tests.
use crate::chain::Chain;
use crate::Array1;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub fn normal_draws(seed: u64, n: usize, mean: f64, sd: f64) -> Array1 {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// AR(1) trace `x[t] = phi * x[t-1] + e[t]` with standard normal noise.
pub fn ar1_draws(seed: u64, n: usize, phi: f64) -> Array1 {
    let noise = normal_draws(seed, n, 0.0, 1.0);
    let mut x = Vec::with_capacity(n);
    let mut prev = 0.0;
    for e in noise {
        prev = phi * prev + e;
        x.push(prev);
    }
    x
}

pub fn scalar_chain(values: Array1) -> Chain {
    Chain::from_scalar(values).unwrap()
}
