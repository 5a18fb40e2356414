//! Pure simulation logic for the 100 prisoners puzzle.
//!
//! Every prisoner opens at most `step_budget` boxes, starting with the box
//! carrying their own number and following the chain of slips from there.
//! The group wins a trial only if every prisoner finds their number. This
//! crate builds the boards, runs the per-prisoner search, and folds many
//! trials into a win-rate statistic. No I/O beyond `log` records.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`board`] | Box permutation, step budget, grid rendering |
//! | [`config`] | Experiment parameters (board size, ratio, trials, seed) |
//! | [`error`] | `SimError` and the crate `Result` alias |
//! | [`experiment`] | Trial runner and statistic aggregation |
//! | [`search`] | Cycle-following search for a single prisoner |
//!
//! ```
//! use prisonsim_logic::config::ExperimentConfig;
//! use prisonsim_logic::experiment::run_experiment;
//!
//! let config = ExperimentConfig {
//!     board_size: 10,
//!     trials: 50,
//!     seed: Some(7),
//!     ..ExperimentConfig::default()
//! };
//! let stats = run_experiment(&config, false).unwrap();
//! assert_eq!(stats.total_trials, 50);
//! assert!((0.0..=1.0).contains(&stats.success_ratio));
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod experiment;
pub mod search;

pub use error::{Result, SimError};
