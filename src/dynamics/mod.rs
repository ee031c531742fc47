//! Keystroke dynamics: the per-character cost function.
//!
//! One engine per round. Folds anatomical, cognitive and statistical effects
//! into each inter-key delay and hold duration:
//!
//! 1. Per-finger timing (pinky slower than index)
//! 2. Row distance penalties
//! 3. Same-finger vs different-finger transitions
//! 4. Hand alternation bonuses
//! 5. Bigram-specific speeds (per-round table, per-occurrence noise)
//! 6. Ex-Gaussian noise for realistic right-skewed timing
//! 7. AR(1) serial autocorrelation for rhythmic momentum
//! 8. Correlated spacing/duration
//! 9. Log-normal key hold durations
//! 10. Motor chunking for common short words
//! 11. Word difficulty-aware pre-word pauses
//! 12. Sigmoid speed curve across the test
//! 13. Rhythmic periodicity
//! 14. Warm-up with noise, fatigue

pub mod transitions;

use fastrand::Rng;
use tracing::trace;

use crate::consistency::{self, ConsistencyReport};
use crate::keyboard;
use crate::profile::Profile;
use crate::sampling::{exgaussian, gauss, log_normal, uniform};
use crate::words;

use self::transitions::TransitionKind;

pub struct DynamicsEngine<'p> {
    profile: &'p Profile,
    rng: Rng,
    total_words: usize,
    min_sleep: f64,

    // Recorded stream (ms), for consistency scoring.
    key_spacings: Vec<f64>,
    key_durations: Vec<f64>,

    prev_char: Option<char>,
    prev_finger: Option<u8>,
    prev_row: Option<u8>,
    word_count: usize,
    char_in_word: usize,
    total_chars: usize,
    current_word: String,
    current_word_len: usize,
    ar1_residual: f64,
    last_delay: Option<f64>,
}

impl<'p> DynamicsEngine<'p> {
    pub fn new(profile: &'p Profile, total_words: usize, min_sleep: f64, seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };
        DynamicsEngine {
            profile,
            rng,
            total_words,
            min_sleep,
            key_spacings: Vec::new(),
            key_durations: Vec::new(),
            prev_char: None,
            prev_finger: None,
            prev_row: None,
            word_count: 0,
            char_in_word: 0,
            total_chars: 0,
            current_word: String::new(),
            current_word_len: 0,
            ar1_residual: 0.0,
            last_delay: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        self.profile
    }

    pub fn prev_char(&self) -> Option<char> {
        self.prev_char
    }

    pub fn prev_finger(&self) -> Option<u8> {
        self.prev_finger
    }

    pub fn prev_row(&self) -> Option<u8> {
        self.prev_row
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn delay_samples(&self) -> &[f64] {
        &self.key_spacings
    }

    pub fn hold_samples(&self) -> &[f64] {
        &self.key_durations
    }

    /// The open-ended word supply grew; the speed curve needs the new total.
    pub fn set_total_words(&mut self, total: usize) {
        self.total_words = total;
    }

    /// Compute the inter-key delay for the next character, in seconds.
    /// Records the delay and advances the running keystroke history.
    pub fn compute_delay(&mut self, ch: char) -> f64 {
        let p = self.profile;
        let mut base = p.base_delay;

        let finger = keyboard::finger_of(ch);
        let row = keyboard::row_of(ch);

        // 1. Finger speed class
        base *= keyboard::finger_speed(finger);

        // 2. Row distance penalty
        if let Some(prev_row) = self.prev_row {
            let dist = keyboard::row_distance(prev_row, row);
            if dist > 0 {
                base *= 1.0 + dist as f64 * uniform(&mut self.rng, 0.06, 0.14);
            }
        }

        // 3. Finger/key relationship (mutually exclusive, most-specific
        //    wins to avoid compounding).
        match transitions::classify(self.prev_char, self.prev_finger, ch, finger) {
            TransitionKind::SameKey => {
                base *= uniform(&mut self.rng, 1.25, 1.45) * keyboard::finger_hold(finger).powf(0.3);
            }
            TransitionKind::SameFingerBigram => base *= uniform(&mut self.rng, 1.18, 1.38),
            TransitionKind::SameFinger => base *= uniform(&mut self.rng, 1.12, 1.30),
            TransitionKind::HandAlternation => base *= uniform(&mut self.rng, 0.85, 0.95),
            TransitionKind::SameHand => base *= uniform(&mut self.rng, 0.96, 1.08),
            TransitionKind::Start => {}
        }

        // 4. Bigram-specific speed, applied independently: this is a speed
        //    lookup, not a penalty. Jittered per occurrence.
        if let Some(prev) = self.prev_char {
            let key = (prev.to_ascii_lowercase(), ch.to_ascii_lowercase());
            if let Some(&speed) = p.bigram_speeds.get(&key) {
                base *= speed * uniform(&mut self.rng, 0.93, 1.07);
            }
        }

        // 5. Word start: cognitive pause + word difficulty
        if self.char_in_word == 0 {
            base *= uniform(&mut self.rng, p.word_start_extra.0, p.word_start_extra.1);
            let diff = words::word_difficulty(&self.current_word);
            base *= 1.0 + diff * p.difficulty_pause_scale * uniform(&mut self.rng, 0.3, 0.7);
        }

        // 6. Warm-up: linear decay toward 1.0 with stochastic jumps, never a
        //    speedup.
        if self.word_count < p.warmup_words {
            let progress = self.word_count as f64 / p.warmup_words as f64;
            let smooth = p.warmup_slowdown - (p.warmup_slowdown - 1.0) * progress;
            let noise = gauss(&mut self.rng, 0.0, 0.08);
            base *= (smooth + noise).max(1.0);
        }

        // 7. Fatigue: linear ramp over 60 words past onset.
        if self.word_count > p.fatigue_onset_words {
            let ramp = ((self.word_count - p.fatigue_onset_words) as f64 / 60.0).min(1.0);
            base *= 1.0 + (p.fatigue_max - 1.0) * ramp;
        }

        // 8. Motor chunking: known chunk words fly, any short word bursts.
        if words::is_motor_chunk(&self.current_word) && self.char_in_word > 0 {
            base *= p.chunk_speedup;
        } else if self.current_word_len <= p.burst_max_len {
            base *= p.burst_speedup;
        }

        // 9. Sigmoid speed curve: slow start, fast middle, renewed slowdown
        //    past 85% progress.
        if self.total_words > 0 {
            let progress = self.word_count as f64 / self.total_words.max(1) as f64;
            let sigmoid = 1.0 / (1.0 + (-12.0 * (progress - 0.25)).exp());
            let end_decel = 1.0 + (p.flow_decel - 1.0) * (progress - 0.85).max(0.0) / 0.15;
            base *= (1.0 - (1.0 - p.flow_accel) * sigmoid) * end_decel;
        }

        // 10. Rhythmic periodicity
        if p.rhythm_period > 0.0 {
            let phase = std::f64::consts::TAU * self.total_chars as f64 / p.rhythm_period;
            base *= 1.0 + p.rhythm_amplitude * phase.sin();
        }

        // 11. Ex-Gaussian noise, scaled to the current adjusted base rather
        //     than the nominal base so relative variability stays stable
        //     regardless of per-character multipliers.
        let sigma = base * (p.exgauss_sigma / p.base_delay);
        let tau = base * (p.exgauss_tau / p.base_delay);
        let mut sample = exgaussian(&mut self.rng, base, sigma, tau);
        if sample <= 0.0 {
            sample = exgaussian(&mut self.rng, base, sigma, tau);
        }
        sample = sample.max(base * 0.4);

        // 12. AR(1) serial correlation: blend this sample's deviation with
        //     the running residual for short-range momentum.
        let innovation = sample - base;
        self.ar1_residual = p.ar1_phi * self.ar1_residual + (1.0 - p.ar1_phi) * innovation;
        let delay = (base + self.ar1_residual).clamp(self.min_sleep, p.base_delay * 2.0);

        self.key_spacings.push(delay * 1000.0);
        self.last_delay = Some(delay);

        self.prev_char = Some(ch);
        self.prev_finger = Some(finger);
        self.prev_row = Some(row);
        self.char_in_word += 1;
        self.total_chars += 1;

        trace!(
            char = %ch,
            finger,
            row,
            delay_ms = delay * 1000.0,
            "computed delay"
        );

        delay
    }

    /// Compute the key hold duration, in seconds. Log-normal so the shape is
    /// right-skewed and always positive; correlated with the preceding delay
    /// (faster typing means shorter holds).
    pub fn compute_hold(&mut self, ch: char) -> f64 {
        let p = self.profile;
        let finger = keyboard::finger_of(ch);
        let base_hold = p.hold_mean * keyboard::finger_hold(finger);

        // Parameterized so the log-normal mean matches base_hold.
        let sigma_ratio = p.hold_sigma / base_hold;
        let mu_ln = base_hold.ln() - 0.5 * sigma_ratio.powi(2);
        let mut hold = log_normal(&mut self.rng, mu_ln, sigma_ratio.max(0.05));

        match keyboard::row_of(ch) {
            2 => hold *= uniform(&mut self.rng, 0.88, 0.97), // home row: settled
            0 => hold *= uniform(&mut self.rng, 1.05, 1.20), // number row: reaching
            _ => {}
        }

        // Space bar: consistent and shorter.
        if ch == ' ' {
            hold = log_normal(
                &mut self.rng,
                (p.hold_mean * 0.80).ln(),
                (p.hold_sigma * 0.5 / base_hold).max(0.05),
            );
        }

        if let Some(last_delay) = self.last_delay {
            let speed_ratio = last_delay / p.base_delay;
            hold *= 0.4 + 0.6 * speed_ratio.min(1.5);
        }

        let hold = hold.clamp(p.hold_min, p.hold_max);
        self.key_durations.push(hold * 1000.0);
        hold
    }

    pub fn should_overlap(&mut self) -> bool {
        self.rng.f64() < self.profile.overlap_chance
    }

    pub fn overlap_duration(&mut self) -> f64 {
        uniform(&mut self.rng, self.profile.overlap_time.0, self.profile.overlap_time.1)
    }

    /// Word ended: reset the per-word counter, bump the word index.
    pub fn word_boundary(&mut self) {
        self.char_in_word = 0;
        self.word_count += 1;
    }

    pub fn set_word_context(&mut self, word: &str) {
        self.current_word = word.to_string();
        self.current_word_len = word.chars().count();
    }

    /// Rewind to the start of the current word for a clean retype after a
    /// whole-word correction. Word index and keystroke history stand.
    pub fn reset_word_position(&mut self) {
        self.char_in_word = 0;
    }

    /// A skipped character is never emitted, but the hand still moved over
    /// it: advance history as though it had been typed.
    pub fn note_skipped(&mut self, ch: char) {
        self.prev_char = Some(ch);
        self.prev_finger = Some(keyboard::finger_of(ch));
        self.prev_row = Some(keyboard::row_of(ch));
        self.char_in_word += 1;
    }

    pub fn consistency_report(&self) -> ConsistencyReport {
        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        ConsistencyReport {
            key_consistency: round2(consistency::sample_consistency(&self.key_spacings)),
            hold_consistency: round2(consistency::sample_consistency(&self.key_durations)),
            target_consistency: round2(self.profile.target_consistency),
            total_keystrokes: self.total_chars,
        }
    }
}
