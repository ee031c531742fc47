//! Timing-consistency scoring.
//!
//! The analyzer on the other side reduces a timing stream to a coefficient
//! of variation and maps it to a 0-100 score. We use the same transform both
//! forward (to report achieved variance) and inverted (to derive the target
//! CoV a generated profile must hit).

use serde::{Deserialize, Serialize};

/// Map a coefficient of variation to a 0-100 consistency score:
/// `100 * (1 - tanh(cov + cov^3/3 + cov^5/5))`. Monotonically decreasing;
/// `score(0) == 100`.
pub fn score(cov: f64) -> f64 {
    let x = cov + cov.powi(3) / 3.0 + cov.powi(5) / 5.0;
    (100.0 * (1.0 - x.tanh())).clamp(0.0, 100.0)
}

/// Inverse of [`score`] via bisection over `cov in [0, 5]`. 100 iterations
/// is far past double-precision convergence.
pub fn inverse(target_score: f64) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 5.0_f64);
    for _ in 0..100 {
        let mid = (lo + hi) / 2.0;
        if score(mid) > target_score {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// Consistency of a recorded sample set (population stddev / mean). Fewer
/// than two samples or a zero mean is degenerate, not an error: report 100.
pub fn sample_consistency(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 100.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 100.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    score(variance.sqrt() / mean)
}

/// Per-round summary handed back to the embedder. Field names mirror the
/// analyzer's own report keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub key_consistency: f64,
    pub hold_consistency: f64,
    pub target_consistency: f64,
    pub total_keystrokes: usize,
}
