//! The row of boxes the prisoners search.
//!
//! A `Board` is a permutation of `1..=size`: box `p` (1-based) holds the slip
//! with number `permutation[p - 1]`. The board also carries the step budget,
//! i.e. how many boxes a single prisoner may open.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{step_budget_for, validate_board_params};
use crate::error::{Result, SimError};

/// Immutable box permutation plus step budget for one trial.
///
/// Deserialized boards go through `from_permutation`, so a board can never
/// hold anything but a permutation of `1..=size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    permutation: Vec<usize>,
    step_budget: usize,
}

/// Unchecked wire form of a `Board`.
#[derive(Deserialize)]
struct RawBoard {
    permutation: Vec<usize>,
    step_budget: usize,
}

impl TryFrom<RawBoard> for Board {
    type Error = SimError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        Board::from_permutation(raw.permutation, raw.step_budget)
    }
}

impl Board {
    /// Build a board of `size` boxes.
    ///
    /// With `shuffle` the slips are placed uniformly at random using the
    /// thread-local generator; without it the board is the identity.
    pub fn new(size: usize, shuffle: bool, chances_ratio: f64) -> Result<Self> {
        if shuffle {
            Self::shuffled_with(size, chances_ratio, &mut rand::thread_rng())
        } else {
            Self::identity(size, chances_ratio)
        }
    }

    /// Identity board: box `i` holds slip `i`.
    pub fn identity(size: usize, chances_ratio: f64) -> Result<Self> {
        validate_board_params(size, chances_ratio)?;
        Ok(Self {
            permutation: (1..=size).collect(),
            step_budget: step_budget_for(size, chances_ratio),
        })
    }

    /// Shuffled board drawn from a caller-supplied generator.
    pub fn shuffled_with<R: Rng + ?Sized>(
        size: usize,
        chances_ratio: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut board = Self::identity(size, chances_ratio)?;
        board.permutation.shuffle(rng);
        Ok(board)
    }

    /// Board with an explicit permutation of `1..=len`.
    ///
    /// Fails if `permutation` is empty, is not a bijection on `1..=len`, or
    /// if `step_budget` exceeds the number of boxes.
    pub fn from_permutation(permutation: Vec<usize>, step_budget: usize) -> Result<Self> {
        let size = permutation.len();
        if size == 0 {
            return Err(SimError::invalid("board size must be at least 1"));
        }
        if step_budget > size {
            return Err(SimError::invalid(format!(
                "step budget {} exceeds board size {}",
                step_budget, size
            )));
        }
        let mut seen = vec![false; size];
        for &value in &permutation {
            if value == 0 || value > size {
                return Err(SimError::invalid(format!(
                    "box value {} outside 1..={}",
                    value, size
                )));
            }
            if seen[value - 1] {
                return Err(SimError::invalid(format!("box value {} repeated", value)));
            }
            seen[value - 1] = true;
        }
        Ok(Self {
            permutation,
            step_budget,
        })
    }

    /// Number of boxes (and prisoners).
    pub fn size(&self) -> usize {
        self.permutation.len()
    }

    /// Maximum number of boxes one prisoner may open.
    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Slip inside box `position` (1-based). `None` if out of range.
    pub fn box_at(&self, position: usize) -> Option<usize> {
        position
            .checked_sub(1)
            .and_then(|idx| self.permutation.get(idx))
            .copied()
    }

    /// Grid rendering: rows of `ceil(sqrt(size))` zero-padded values.
    ///
    /// Each row starts with a newline and every value is followed by a
    /// single space.
    pub fn render(&self) -> String {
        let size = self.size();
        let row_len = (size as f64).sqrt().ceil() as usize;
        let width = size.to_string().len();

        let mut out = String::with_capacity(size * (width + 1) + row_len + 1);
        for (idx, value) in self.permutation.iter().enumerate() {
            if idx % row_len == 0 {
                out.push('\n');
            }
            out.push_str(&format!("{:0width$} ", value, width = width));
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_bijection(board: &Board) -> bool {
        let mut sorted = board.permutation().to_vec();
        sorted.sort_unstable();
        sorted == (1..=board.size()).collect::<Vec<_>>()
    }

    #[test]
    fn test_unshuffled_is_identity() {
        for size in [1, 2, 9, 100] {
            let board = Board::new(size, false, 0.5).unwrap();
            assert_eq!(board.permutation(), (1..=size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shuffled_is_bijection() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in [1, 2, 17, 100, 257] {
            let board = Board::shuffled_with(size, 0.5, &mut rng).unwrap();
            assert_eq!(board.size(), size);
            assert!(is_bijection(&board), "size {} not a permutation", size);
        }
    }

    #[test]
    fn test_thread_rng_board_is_bijection() {
        let board = Board::new(100, true, 0.5).unwrap();
        assert!(is_bijection(&board));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Board::shuffled_with(50, 0.5, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = Board::shuffled_with(50, 0.5, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_budget_derived_from_ratio() {
        assert_eq!(Board::new(100, false, 0.5).unwrap().step_budget(), 50);
        assert_eq!(Board::new(9, false, 0.5).unwrap().step_budget(), 4);
        assert_eq!(Board::new(10, false, 0.0).unwrap().step_budget(), 0);
        assert_eq!(Board::new(10, false, 1.0).unwrap().step_budget(), 10);
        assert_eq!(Board::new(10, false, 2.5).unwrap().step_budget(), 10);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Board::new(0, true, 0.5),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_ratio_rejected() {
        assert!(Board::new(10, false, -1.0).is_err());
    }

    #[test]
    fn test_from_permutation_validates() {
        assert!(Board::from_permutation(vec![2, 1, 4, 3], 2).is_ok());
        assert!(Board::from_permutation(vec![], 0).is_err());
        assert!(Board::from_permutation(vec![1, 1, 3], 1).is_err());
        assert!(Board::from_permutation(vec![0, 1, 2], 1).is_err());
        assert!(Board::from_permutation(vec![1, 2, 4], 1).is_err());
        assert!(Board::from_permutation(vec![1, 2, 3], 4).is_err());
    }

    #[test]
    fn test_deserialize_valid_board() {
        let board: Board =
            serde_json::from_str(r#"{"permutation":[2,3,1],"step_budget":2}"#).unwrap();
        assert_eq!(board.permutation(), &[2, 3, 1]);
        assert_eq!(board.step_budget(), 2);

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
    }

    #[test]
    fn test_deserialize_rejects_invalid_boards() {
        for json in [
            r#"{"permutation":[2,0],"step_budget":1}"#,
            r#"{"permutation":[2,3,1],"step_budget":50}"#,
            r#"{"permutation":[1,1,1],"step_budget":1}"#,
            r#"{"permutation":[],"step_budget":0}"#,
        ] {
            let err = serde_json::from_str::<Board>(json).unwrap_err();
            assert!(
                err.to_string().contains("invalid argument"),
                "{} gave {}",
                json,
                err
            );
        }
    }

    #[test]
    fn test_box_at_is_one_based() {
        let board = Board::from_permutation(vec![3, 1, 2], 1).unwrap();
        assert_eq!(board.box_at(1), Some(3));
        assert_eq!(board.box_at(3), Some(2));
        assert_eq!(board.box_at(0), None);
        assert_eq!(board.box_at(4), None);
    }

    #[test]
    fn test_render_layout() {
        let board = Board::new(10, false, 0.5).unwrap();
        // ceil(sqrt(10)) = 4 per row, width 2
        assert_eq!(
            board.render(),
            "\n01 02 03 04 \n05 06 07 08 \n09 10 "
        );
    }

    #[test]
    fn test_render_single_box() {
        let board = Board::new(1, false, 1.0).unwrap();
        assert_eq!(board.render(), "\n1 ");
    }

    #[test]
    fn test_render_idempotent() {
        let board = Board::shuffled_with(100, 0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        let first = board.render();
        assert_eq!(first, board.render());
        assert_eq!(first, board.to_string());
        assert_eq!(first.lines().filter(|l| !l.is_empty()).count(), 10);
    }
}
