//! Distribution primitives over an injectable `fastrand::Rng`.
//!
//! Every stochastic call site in the crate goes through these so tests can
//! seed the generator and replay exact sequences.

use fastrand::Rng;
use std::f64::consts::TAU;

pub fn uniform(rng: &mut Rng, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.f64()
}

/// Box-Muller transform.
pub fn gauss(rng: &mut Rng, mean: f64, sigma: f64) -> f64 {
    let u1 = rng.f64().max(f64::MIN_POSITIVE);
    let u2 = rng.f64();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    mean + sigma * z
}

/// Inverse-CDF exponential sample with rate `lambda`.
pub fn expovariate(rng: &mut Rng, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 0.0;
    }
    -(1.0 - rng.f64()).max(f64::MIN_POSITIVE).ln() / lambda
}

pub fn log_normal(rng: &mut Rng, mu: f64, sigma: f64) -> f64 {
    gauss(rng, mu, sigma).exp()
}

/// Sample from an ex-Gaussian distribution (Gaussian core + exponential tail).
///
/// The empirically validated model for human inter-key intervals: `mu` is the
/// core typing speed, `sigma` the motor noise, `tau` the mean of the
/// cognitive-pause tail. Right-skewed, matching real typing data.
pub fn exgaussian(rng: &mut Rng, mu: f64, sigma: f64, tau: f64) -> f64 {
    let gauss_part = gauss(rng, mu, sigma);
    let expo_part = if tau > 0.0 {
        expovariate(rng, 1.0 / tau)
    } else {
        0.0
    };
    gauss_part + expo_part
}

/// Index draw proportional to `weights`. Falls back to the last index so the
/// draw is total even under floating-point shortfall.
pub fn weighted_index(rng: &mut Rng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || weights.is_empty() {
        return weights.len().saturating_sub(1);
    }
    let target = rng.f64() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return i;
        }
    }
    weights.len() - 1
}
