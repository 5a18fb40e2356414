//! prisonsim command-line harness.
//!
//! Thin wrapper around `prisonsim-logic`: parses flags, initialises logging,
//! runs either a full statistic or a single trial, and prints the result.
//!
//! Usage:
//!   cargo run -p prisonsim-cli -- --stat -c 10000
//!   cargo run -p prisonsim-cli -- --one_run --show-board
//!   RUST_LOG=debug cargo run -p prisonsim-cli -- -s --parallel --seed 42

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use prisonsim_logic::board::Board;
use prisonsim_logic::config::{ExperimentConfig, DEFAULT_TRIALS};
use prisonsim_logic::experiment::{play_board, rng_for, run_experiment};

#[derive(Debug, Parser)]
#[command(
    name = "prisonsim",
    version,
    about = "Simulate the 100 prisoners puzzle with the cycle-following strategy"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["stat", "one_run"])))]
struct Cli {
    /// Execute multiple runs to create statistic.
    #[arg(short = 's', long = "stat")]
    stat: bool,

    /// Execute a single run and see how many prisoners are successful and failing.
    #[arg(short = 'o', long = "one_run")]
    one_run: bool,

    /// Number of boards to play in --stat mode.
    #[arg(short = 'c', long = "count_stat", default_value_t = DEFAULT_TRIALS)]
    count_stat: usize,

    /// Seed the random generator for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Spread trials across all cores.
    #[arg(long)]
    parallel: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// With --one_run, also print the shuffled board.
    #[arg(long)]
    show_board: bool,
}

impl Cli {
    fn config(&self) -> ExperimentConfig {
        let base = if self.one_run {
            ExperimentConfig::single_run()
        } else {
            ExperimentConfig {
                trials: self.count_stat,
                ..ExperimentConfig::default()
            }
        };
        ExperimentConfig {
            seed: self.seed,
            parallel: self.parallel,
            ..base
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    if cli.stat {
        run_statistic(&cli)
    } else {
        run_single_game(&cli)
    }
}

fn run_statistic(cli: &Cli) -> Result<()> {
    let stats = run_experiment(&cli.config(), false).context("statistic run failed")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
    }
    Ok(())
}

fn run_single_game(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;

    let mut rng = rng_for(config.seed);
    let board = Board::shuffled_with(config.board_size, config.chances_ratio, &mut rng)?;
    let outcome = play_board(&board).context("single run failed")?;
    log::info!(
        "board of {} boxes, {} steps per prisoner, win={}",
        board.size(),
        board.step_budget(),
        outcome.is_win()
    );

    if cli.show_board {
        println!("{}", board);
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Successful prisoners: {}", outcome.successful);
        println!("Failed prisoners: {}", outcome.failed);
    }
    Ok(())
}
