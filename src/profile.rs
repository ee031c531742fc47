//! Per-round behavioral profile generation.

use std::collections::HashMap;

use fastrand::Rng;
use tracing::debug;

use crate::consistency;
use crate::error::{KeyGhostError, KgResult};
use crate::errors_model::TypoKind;
use crate::keyboard::{FAST_BIGRAMS, SLOW_BIGRAMS};
use crate::sampling::uniform;

/// WPM the tuning constants were calibrated against.
pub const REFERENCE_WPM: f64 = 110.0;

/// Relative weights over the correctable error kinds; normalized at draw
/// time, not here.
#[derive(Debug, Clone, Copy)]
pub struct ErrorWeights {
    pub adjacent: f64,
    pub transpose: f64,
    pub confusion: f64,
    pub double_tap: f64,
    pub skip: f64,
}

impl ErrorWeights {
    pub fn entries(&self) -> [(TypoKind, f64); 5] {
        [
            (TypoKind::Adjacent, self.adjacent),
            (TypoKind::Transpose, self.transpose),
            (TypoKind::Confusion, self.confusion),
            (TypoKind::DoubleTap, self.double_tap),
            (TypoKind::Skip, self.skip),
        ]
    }
}

/// One randomized parameter set governing every computation for a round.
///
/// Immutable after construction: randomness affecting later timings is drawn
/// fresh at each call site, never mutated back into the profile. A fresh
/// profile is generated per round, so no two rounds share a timing signature
/// (the `bigram_speeds` table alone guarantees that).
#[derive(Debug, Clone)]
pub struct Profile {
    pub target_wpm: u32,
    /// Desired keyDown-to-keyDown interval in seconds. The typing loop
    /// subtracts the previous key's hold from this, so hold is "inside" the
    /// interval, not added on top.
    pub base_delay: f64,

    pub target_consistency: f64,
    pub target_cov: f64,

    pub hold_mean: f64,
    pub hold_sigma: f64,
    pub hold_min: f64,
    pub hold_max: f64,

    // Ex-Gaussian noise: sigma is the motor-noise core, tau the mean of the
    // cognitive-pause tail.
    pub exgauss_sigma: f64,
    pub exgauss_tau: f64,

    pub typo_chance: f64,
    pub leave_mistake_chance: f64,
    pub error_weights: ErrorWeights,

    pub delayed_notice_chance: f64,
    pub delayed_notice_chars: (usize, usize),
    pub over_backspace_chance: f64,

    pub word_start_extra: (f64, f64),
    pub space_gap_range: (f64, f64),
    pub think_pause_chance: f64,
    pub think_pause_range: (f64, f64),

    pub warmup_words: usize,
    pub warmup_slowdown: f64,
    pub fatigue_max: f64,
    pub fatigue_onset_words: usize,

    pub burst_max_len: usize,
    pub burst_speedup: f64,
    pub chunk_speedup: f64,

    pub correction_react: (f64, f64),
    pub backspace_delay: (f64, f64),

    pub overlap_chance: f64,
    pub overlap_time: (f64, f64),

    /// AR(1) momentum coefficient for the serial-correlation filter.
    pub ar1_phi: f64,

    pub rhythm_amplitude: f64,
    pub rhythm_period: f64,

    pub flow_accel: f64,
    pub flow_decel: f64,

    pub difficulty_pause_scale: f64,

    /// Per-round bigram speed multipliers, keyed by lowercased (prev, next).
    pub bigram_speeds: HashMap<(char, char), f64>,
}

impl Profile {
    /// Generate a fresh profile for `target_wpm`. The only rejected input is
    /// a non-positive speed; everything downstream clamps instead.
    pub fn generate(target_wpm: u32, rng: &mut Rng) -> KgResult<Self> {
        if target_wpm == 0 {
            return Err(KeyGhostError::Config(
                "target wpm must be positive".into(),
            ));
        }
        let wpm = target_wpm as f64;

        // Average word = 5 chars + 1 space = 6 keystrokes. The correction
        // factor balances speed-up effects (chunks, alternation, bursts)
        // against overhead (word-start pauses, space gaps); higher speeds
        // carry proportionally less overhead per interval.
        let raw_iki = 60.0 / (wpm * 6.0);
        let speed_ratio = (wpm / REFERENCE_WPM).min(2.0);
        let base_delay = raw_iki * (1.04 + 0.10 * speed_ratio).min(1.25);

        // Lower speeds get lower, looser consistency; higher speeds tighter.
        let target_consistency = if wpm < 80.0 {
            uniform(rng, 50.0, 65.0)
        } else if wpm < 120.0 {
            uniform(rng, 60.0, 75.0)
        } else if wpm < 160.0 {
            uniform(rng, 68.0, 82.0)
        } else {
            uniform(rng, 72.0, 85.0)
        };
        let target_cov = consistency::inverse(target_consistency);

        // Typical human hold is ~40-55% of the inter-key interval.
        let hold_mean = base_delay * uniform(rng, 0.40, 0.55);
        let hold_sigma = hold_mean * uniform(rng, 0.25, 0.40);

        // Error rate rises gently with speed up to ~100 WPM, then plateaus:
        // fast typists are skilled, not fast-but-sloppy.
        let error_factor = 0.8 + 0.2 * (wpm / 100.0).min(1.0);
        let skill = (wpm / REFERENCE_WPM).clamp(0.5, 2.0);

        let profile = Profile {
            target_wpm,
            base_delay,
            target_consistency,
            target_cov,
            hold_mean,
            hold_sigma,
            hold_min: 0.025,
            hold_max: base_delay * 1.5,
            exgauss_sigma: base_delay * uniform(rng, 0.08, 0.15),
            exgauss_tau: base_delay * uniform(rng, 0.05, 0.12),
            typo_chance: 0.018 * error_factor,
            leave_mistake_chance: uniform(rng, 0.08, 0.15),
            // Faster typists shift toward coordination errors (transpose,
            // double-tap, skip) and away from plain adjacent hits.
            error_weights: ErrorWeights {
                adjacent: 0.45,
                transpose: 0.15 + 0.05 * skill,
                confusion: 0.15,
                double_tap: 0.10 + 0.02 * skill,
                skip: 0.06 + 0.02 * skill,
            },
            delayed_notice_chance: 0.30,
            delayed_notice_chars: (1, 3),
            over_backspace_chance: 0.12,
            word_start_extra: (1.05, 1.25),
            space_gap_range: (0.75, 1.30),
            think_pause_chance: 0.04,
            think_pause_range: (2.0, 5.0),
            warmup_words: rng.usize(2..=5),
            warmup_slowdown: uniform(rng, 1.10, 1.30),
            fatigue_max: uniform(rng, 1.10, 1.30),
            fatigue_onset_words: rng.usize(40..=70),
            burst_max_len: 4,
            burst_speedup: uniform(rng, 0.72, 0.85),
            chunk_speedup: uniform(rng, 0.62, 0.78),
            correction_react: (0.10, 0.35),
            backspace_delay: (0.03, 0.09),
            overlap_chance: (wpm / 500.0).min(0.40),
            overlap_time: (0.005, 0.035),
            ar1_phi: uniform(rng, 0.10, 0.30),
            rhythm_amplitude: uniform(rng, 0.02, 0.05),
            rhythm_period: uniform(rng, 12.0, 25.0),
            flow_accel: uniform(rng, 0.92, 0.97),
            flow_decel: uniform(rng, 1.02, 1.08),
            difficulty_pause_scale: uniform(rng, 0.3, 0.8),
            bigram_speeds: generate_bigram_speeds(rng),
        };

        debug!(
            wpm = target_wpm,
            base_delay_ms = profile.base_delay * 1000.0,
            target_consistency = profile.target_consistency,
            target_cov = profile.target_cov,
            "generated profile"
        );

        Ok(profile)
    }
}

/// Randomized bigram speed multipliers. Regenerated per round.
fn generate_bigram_speeds(rng: &mut Rng) -> HashMap<(char, char), f64> {
    let mut speeds = HashMap::new();
    for pair in FAST_BIGRAMS {
        if let [a, b] = *pair.as_bytes() {
            speeds.insert((a as char, b as char), uniform(rng, 0.55, 0.80));
        }
    }
    for pair in SLOW_BIGRAMS {
        if let [a, b] = *pair.as_bytes() {
            speeds.insert((a as char, b as char), uniform(rng, 1.25, 1.80));
        }
    }
    speeds
}
