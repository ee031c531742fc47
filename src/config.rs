use std::fs;
use std::path::Path;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{KeyGhostError, KgResult};

/// Floor for any requested sleep. Windows timers cannot resolve much below
/// 15ms; everywhere else 2ms is dependable.
pub const DEFAULT_MIN_SLEEP: f64 = if cfg!(windows) { 0.015 } else { 0.002 };

/// Estimated round-trip overhead per dispatch call (seconds). Conservative
/// default; embedders that calibrate should override it.
pub const DEFAULT_DISPATCH_OVERHEAD: f64 = 0.003;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Target typing speed in words per minute.
    #[arg(long, default_value_t = 110)]
    pub target_wpm: u32,

    /// Number of rounds to run per session.
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,

    /// Seed for all randomness. Unset means a fresh entropy seed per run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-dispatch-call overhead subtracted from sleep budgets (seconds).
    #[arg(long, default_value_t = DEFAULT_DISPATCH_OVERHEAD)]
    pub dispatch_overhead: f64,

    /// Smallest sleep the platform can honor (seconds).
    #[arg(long, default_value_t = DEFAULT_MIN_SLEEP)]
    pub min_sleep: f64,

    /// Wait between word-supply polls (seconds).
    #[arg(long, default_value_t = 0.8)]
    pub poll_interval: f64,

    /// Poll for newly revealed words when the known list runs out.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub open_ended: bool,

    /// Attempts per round before the round is skipped.
    #[arg(long, default_value_t = 5)]
    pub max_retries_per_round: u32,

    /// Informational for embedders sizing their word source.
    #[arg(long, default_value_t = 50)]
    pub words_per_round: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_wpm: 110,
            rounds: 1,
            seed: None,
            dispatch_overhead: DEFAULT_DISPATCH_OVERHEAD,
            min_sleep: DEFAULT_MIN_SLEEP,
            poll_interval: 0.8,
            open_ended: true,
            max_retries_per_round: 5,
            words_per_round: 50,
        }
    }
}

impl SimulationConfig {
    pub fn load_from_file(path: &Path) -> KgResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KgResult<()> {
        if self.target_wpm == 0 {
            return Err(KeyGhostError::Config(
                "target_wpm must be positive".into(),
            ));
        }
        if self.dispatch_overhead < 0.0 || self.min_sleep < 0.0 || self.poll_interval < 0.0 {
            return Err(KeyGhostError::Config(
                "timing parameters must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
