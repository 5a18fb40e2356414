//! Experiment parameters.
//!
//! The classic puzzle uses 100 boxes and lets each prisoner open half of
//! them. Those defaults live here instead of inside the runner so tests can
//! build small boards with arbitrary ratios.
//!
//! ```
//! use prisonsim_logic::config::ExperimentConfig;
//!
//! let config = ExperimentConfig::default();
//! assert_eq!(config.board_size, 100);
//! assert_eq!(config.step_budget(), 50);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Default number of boxes (and prisoners) on a board.
pub const DEFAULT_BOARD_SIZE: usize = 100;

/// Default fraction of boxes each prisoner may open.
pub const DEFAULT_CHANCES_RATIO: f64 = 0.5;

/// Default number of trials for a statistic run.
pub const DEFAULT_TRIALS: usize = 1000;

/// Parameters for one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of boxes, equal to the number of prisoners.
    pub board_size: usize,
    /// Fraction of `board_size` each prisoner may open.
    pub chances_ratio: f64,
    /// Number of independent trials to play.
    pub trials: usize,
    /// RNG seed (None = fresh entropy per run).
    pub seed: Option<u64>,
    /// Spread trials across rayon workers.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            chances_ratio: DEFAULT_CHANCES_RATIO,
            trials: DEFAULT_TRIALS,
            seed: None,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Default board, exactly one trial.
    pub fn single_run() -> Self {
        Self {
            trials: 1,
            ..Self::default()
        }
    }

    /// Boxes each prisoner may open on a board built from this config.
    pub fn step_budget(&self) -> usize {
        step_budget_for(self.board_size, self.chances_ratio)
    }

    /// Reject parameters the runner cannot handle.
    ///
    /// A ratio above 1 is accepted with a single warning; boards cap the
    /// budget at their size.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimError::invalid("trial count must be at least 1"));
        }
        validate_board_params(self.board_size, self.chances_ratio)?;
        if self.chances_ratio > 1.0 {
            log::warn!(
                "chances ratio {} exceeds 1, capping step budget at {}",
                self.chances_ratio,
                self.board_size
            );
        }
        Ok(())
    }
}

/// `floor(size * ratio)`, capped at `size`.
pub(crate) fn step_budget_for(size: usize, chances_ratio: f64) -> usize {
    let budget = (size as f64 * chances_ratio).floor();
    if budget <= 0.0 {
        0
    } else {
        (budget as usize).min(size)
    }
}

pub(crate) fn validate_board_params(size: usize, chances_ratio: f64) -> Result<()> {
    if size == 0 {
        return Err(SimError::invalid("board size must be at least 1"));
    }
    if !chances_ratio.is_finite() || chances_ratio < 0.0 {
        return Err(SimError::invalid(format!(
            "chances ratio must be a non-negative number, got {}",
            chances_ratio
        )));
    }
    Ok(())
}
