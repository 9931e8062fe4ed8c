//! Fitness evaluation: how long and how large a board grows.

use crate::compute::Simulator;
use crate::schema::{Board, EvolutionConfig, EvolutionError, Score};

/// Scores boards by running them to stability.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    board_size: usize,
    max_turns: usize,
    live_cell_limit: Option<usize>,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(board_size: usize, max_turns: usize) -> Self {
        Self {
            board_size,
            max_turns,
            live_cell_limit: None,
        }
    }

    /// Evaluator matching a search configuration.
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self::new(config.board_size, config.max_turns)
            .with_live_cell_limit(config.limits.max_live_cells)
    }

    /// Abort simulations whose live population exceeds `limit`.
    pub fn with_live_cell_limit(mut self, limit: Option<usize>) -> Self {
        self.live_cell_limit = limit;
        self
    }

    /// Simulate `board` and score it.
    ///
    /// `size` is the peak population minus `board.len()` (floored at zero)
    /// and `time` the fraction of the turn budget spent before the pattern
    /// repeated. A board that never repeats within the budget gets
    /// `time = 1.0`.
    pub fn evaluate(&self, board: &Board) -> Result<Score, EvolutionError> {
        let mut sim = Simulator::new(board.clone(), self.board_size);

        let stopped_at = match self.live_cell_limit {
            Some(limit) => sim.try_run_until_stable(self.max_turns, limit)?,
            None => sim.run_until_stable(self.max_turns),
        };

        Ok(score_run(board, &sim, stopped_at, self.max_turns))
    }
}

/// Score `board` without resource limits.
pub fn evaluate(board: &Board, board_size: usize, max_turns: usize) -> Score {
    let mut sim = Simulator::new(board.clone(), board_size);
    let stopped_at = sim.run_until_stable(max_turns);
    score_run(board, &sim, stopped_at, max_turns)
}

fn score_run(
    board: &Board,
    sim: &Simulator,
    stopped_at: usize,
    max_turns: usize,
) -> Score {
    let time = if sim.is_stable() {
        stopped_at as f64 / max_turns as f64
    } else {
        log::warn!("Board {} was not stable within {} turns", board, max_turns);
        1.0
    };
    // Cells off the grid count toward the initial size but never simulate.
    Score::new(sim.peak_size().saturating_sub(board.len()), time)
}
