//! Cycle-following search for a single prisoner.
//!
//! Prisoner `n` opens box `n`, reads the slip, opens the box with that
//! number, and so on. Because the board is a permutation the chain always
//! returns to `n`, so the prisoner succeeds iff the cycle containing their
//! number fits inside the step budget.
//!
//! The search is a two-state machine. Every transition out of `Searching`
//! is exactly one box lookup. The first lookup always happens, so a budget
//! of 0 still opens one box.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Result, SimError};

/// What one prisoner achieved during one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrisonerOutcome {
    pub id: usize,
    pub found: bool,
    /// Boxes opened, including the one holding the prisoner's number.
    pub attempts_used: usize,
}

impl fmt::Display for PrisonerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = if self.found { "Successful" } else { "Failed" };
        write!(f, "Prisoner number {}: {}", self.id, result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    /// `position` is the next box to open; `attempts` boxes already opened.
    Searching { position: usize, attempts: usize },
    Done { found: bool, attempts: usize },
}

impl SearchState {
    /// Open the box at `position` and decide where to go next.
    fn step(self, board: &Board, prisoner_id: usize) -> Self {
        match self {
            SearchState::Searching { position, attempts } => {
                // position always comes from the board itself, so it is in range
                let slip = board.permutation()[position - 1];
                let attempts = attempts + 1;
                if slip == prisoner_id {
                    SearchState::Done {
                        found: true,
                        attempts,
                    }
                } else if attempts >= board.step_budget() {
                    SearchState::Done {
                        found: false,
                        attempts,
                    }
                } else {
                    SearchState::Searching {
                        position: slip,
                        attempts,
                    }
                }
            }
            done @ SearchState::Done { .. } => done,
        }
    }
}

/// Run the cycle-following search for `prisoner_id` (1-based).
///
/// Returns `InvalidArgument` if `prisoner_id` is not a box on the board.
pub fn search(board: &Board, prisoner_id: usize) -> Result<PrisonerOutcome> {
    if prisoner_id == 0 || prisoner_id > board.size() {
        return Err(SimError::invalid(format!(
            "prisoner id {} outside 1..={}",
            prisoner_id,
            board.size()
        )));
    }

    let mut state = SearchState::Searching {
        position: prisoner_id,
        attempts: 0,
    };
    loop {
        match state.step(board, prisoner_id) {
            SearchState::Done { found, attempts } => {
                return Ok(PrisonerOutcome {
                    id: prisoner_id,
                    found,
                    attempts_used: attempts,
                });
            }
            next => state = next,
        }
    }
}

/// Length of the cycle containing box `start` (1-based).
///
/// Returns `None` if `start` is not on the board.
pub fn cycle_length(board: &Board, start: usize) -> Option<usize> {
    let mut position = board.box_at(start)?;
    let mut length = 1;
    while position != start {
        position = board.box_at(position)?;
        length += 1;
    }
    Some(length)
}
