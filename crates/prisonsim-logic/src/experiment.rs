//! Trial runner and statistic aggregation.
//!
//! A trial builds a fresh shuffled board and lets every prisoner search it.
//! An experiment plays many independent trials and folds their immutable
//! outcomes into a `TrialTally`, which is finalized into `ExperimentStats`.
//! The same fold backs both the sequential path and the rayon path, so
//! parallel runs never share a mutable counter.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::ExperimentConfig;
use crate::error::{Result, SimError};
use crate::search::search;

/// Prisoner counts for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Prisoners who found their number.
    pub successful: usize,
    /// Prisoners who ran out of boxes.
    pub failed: usize,
}

impl TrialOutcome {
    /// The group survives only if nobody failed.
    pub fn is_win(&self) -> bool {
        self.failed == 0
    }
}

/// Running win/loss counts across trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialTally {
    pub successful_trials: usize,
    pub failed_trials: usize,
}

impl TrialTally {
    /// Tally with one more trial recorded.
    pub fn record(self, outcome: &TrialOutcome) -> Self {
        if outcome.is_win() {
            Self {
                successful_trials: self.successful_trials + 1,
                ..self
            }
        } else {
            Self {
                failed_trials: self.failed_trials + 1,
                ..self
            }
        }
    }

    /// Combine two partial tallies.
    pub fn merge(self, other: Self) -> Self {
        Self {
            successful_trials: self.successful_trials + other.successful_trials,
            failed_trials: self.failed_trials + other.failed_trials,
        }
    }

    pub fn total(&self) -> usize {
        self.successful_trials + self.failed_trials
    }

    /// Compute the success ratio. Fails if no trial was recorded.
    pub fn finish(self) -> Result<ExperimentStats> {
        let total = self.total();
        if total == 0 {
            return Err(SimError::invalid(
                "cannot compute a success ratio from zero trials",
            ));
        }
        Ok(ExperimentStats {
            total_trials: total,
            successful_trials: self.successful_trials,
            failed_trials: self.failed_trials,
            success_ratio: self.successful_trials as f64 / total as f64,
        })
    }
}

/// Final result of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStats {
    pub total_trials: usize,
    /// Trials in which every prisoner found their number.
    pub successful_trials: usize,
    pub failed_trials: usize,
    /// `successful_trials / total_trials`, in [0, 1].
    pub success_ratio: f64,
}

impl ExperimentStats {
    /// Fold a sequence of trial outcomes into a statistic.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a TrialOutcome>,
    {
        outcomes
            .into_iter()
            .fold(TrialTally::default(), |tally, outcome| tally.record(outcome))
            .finish()
    }
}

impl fmt::Display for ExperimentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} boards played, success ratio {:.3}",
            self.total_trials, self.success_ratio
        )
    }
}

/// Generator for an experiment: seeded if `seed` is set, entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Let every prisoner search `board`, in ascending id order.
pub fn play_board(board: &Board) -> Result<TrialOutcome> {
    let mut outcome = TrialOutcome::default();
    for id in 1..=board.size() {
        if search(board, id)?.found {
            outcome.successful += 1;
        } else {
            outcome.failed += 1;
        }
    }
    Ok(outcome)
}

/// Play one trial on a fresh board drawn from `rng`.
pub fn run_trial_with<R: Rng + ?Sized>(
    rng: &mut R,
    board_size: usize,
    chances_ratio: f64,
    verbose: bool,
) -> Result<TrialOutcome> {
    let board = Board::shuffled_with(board_size, chances_ratio, rng)?;
    let outcome = play_board(&board)?;
    if verbose {
        log::info!("Successful prisoners: {}", outcome.successful);
        log::info!("Failed prisoners: {}", outcome.failed);
    } else {
        log::trace!(
            "trial: {} successful, {} failed",
            outcome.successful,
            outcome.failed
        );
    }
    Ok(outcome)
}

/// Play one trial on a fresh board from the thread-local generator.
///
/// `is_win()` on the returned outcome is the trial result.
pub fn run_trial(board_size: usize, chances_ratio: f64, verbose: bool) -> Result<TrialOutcome> {
    run_trial_with(&mut rand::thread_rng(), board_size, chances_ratio, verbose)
}

/// Play `config.trials` independent trials and compute the success ratio.
///
/// Rejects invalid configs before any trial runs. A failing trial aborts
/// the whole experiment; no partial statistic is returned.
pub fn run_experiment(config: &ExperimentConfig, verbose: bool) -> Result<ExperimentStats> {
    config.validate()?;
    log::debug!(
        "running {} trials: {} boxes, {} steps each, parallel={}",
        config.trials,
        config.board_size,
        config.step_budget(),
        config.parallel
    );

    let tally = if config.parallel {
        run_parallel(config, verbose)?
    } else {
        run_sequential(config, verbose)?
    };

    let stats = tally.finish()?;
    log::debug!(
        "experiment done: {}/{} trials won",
        stats.successful_trials,
        stats.total_trials
    );
    Ok(stats)
}

fn run_sequential(config: &ExperimentConfig, verbose: bool) -> Result<TrialTally> {
    let mut rng = rng_for(config.seed);
    let mut tally = TrialTally::default();
    for _ in 0..config.trials {
        let outcome =
            run_trial_with(&mut rng, config.board_size, config.chances_ratio, verbose)?;
        tally = tally.record(&outcome);
    }
    Ok(tally)
}

fn run_parallel(config: &ExperimentConfig, verbose: bool) -> Result<TrialTally> {
    (0..config.trials)
        .into_par_iter()
        .map(|trial| match config.seed {
            // One stream per trial keeps seeded runs independent of scheduling.
            Some(seed) => run_trial_with(
                &mut StdRng::seed_from_u64(seed.wrapping_add(trial as u64)),
                config.board_size,
                config.chances_ratio,
                verbose,
            ),
            None => run_trial_with(
                &mut rand::thread_rng(),
                config.board_size,
                config.chances_ratio,
                verbose,
            ),
        })
        .try_fold(TrialTally::default, |tally, outcome| {
            outcome.map(|o| tally.record(&o))
        })
        .try_reduce(TrialTally::default, |a, b| Ok(a.merge(b)))
}
