//! Sparse Game of Life simulator with repeat detection.
//!
//! Only the frontier (live cells and their neighbors) is recomputed each
//! step, so the cost of a step scales with the pattern, not the grid.

use std::collections::{BTreeSet, HashSet};

use crate::schema::{Board, Coord, EvolutionError, Resource};

/// Advances a board under standard Life rules on a bounded square grid.
///
/// Every board the simulator has been in is remembered. Once a step lands
/// on a board seen before, the pattern is stable (still life or cycle).
#[derive(Debug, Clone)]
pub struct Simulator {
    board: Board,
    board_size: usize,
    history: HashSet<Board>,
    peak_size: usize,
    stable: bool,
    generation: u64,
}

impl Simulator {
    /// Create a simulator seeded with `board` on a `board_size` grid.
    ///
    /// Cells outside the grid are dropped.
    pub fn new(board: Board, board_size: usize) -> Self {
        let board: Board = board.iter().filter(|c| c.in_bounds(board_size)).collect();
        let mut history = HashSet::new();
        history.insert(board.clone());

        Self {
            peak_size: board.len(),
            board,
            board_size,
            history,
            stable: false,
            generation: 0,
        }
    }

    /// Cells whose state may change this step.
    fn frontier(&self) -> BTreeSet<Coord> {
        self.board
            .iter()
            .flat_map(Coord::neighborhood)
            .filter(|c| c.in_bounds(self.board_size))
            .collect()
    }

    /// Live cells in the 3x3 block around `coord`, the cell itself included.
    fn block_total(&self, coord: Coord) -> usize {
        coord
            .neighborhood()
            .filter(|&c| self.board.is_alive(c))
            .count()
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        let mut births = Vec::new();
        let mut deaths = Vec::new();

        for coord in self.frontier() {
            let total = self.block_total(coord);
            let alive = self.board.is_alive(coord);
            match (alive, total) {
                (false, 3) => births.push(coord),
                (true, t) if t < 3 || t > 4 => deaths.push(coord),
                _ => (),
            }
        }

        for coord in deaths {
            self.board.remove(coord);
        }
        self.board.extend(births);
        self.generation += 1;

        self.peak_size = self.peak_size.max(self.board.len());

        if self.history.contains(&self.board) {
            self.stable = true;
        } else {
            self.history.insert(self.board.clone());
        }
    }

    /// Step up to `max_turns` times, stopping once stable.
    ///
    /// Returns the 0-based index of the last step taken, which is
    /// `max_turns - 1` when the pattern never stabilized.
    pub fn run_until_stable(&mut self, max_turns: usize) -> usize {
        let mut last = 0;
        for turn in 0..max_turns {
            last = turn;
            self.step();
            if self.stable {
                break;
            }
        }
        last
    }

    /// Like [`Simulator::run_until_stable`], but fails once the live
    /// population exceeds `live_cell_limit`.
    pub fn try_run_until_stable(
        &mut self,
        max_turns: usize,
        live_cell_limit: usize,
    ) -> Result<usize, EvolutionError> {
        let mut last = 0;
        for turn in 0..max_turns {
            last = turn;
            self.step();
            if self.board.len() > live_cell_limit {
                return Err(EvolutionError::exhausted(
                    Resource::LiveCells,
                    format!(
                        "{} live cells after {} turns (limit {})",
                        self.board.len(),
                        turn + 1,
                        live_cell_limit
                    ),
                ));
            }
            if self.stable {
                break;
            }
        }
        Ok(last)
    }

    /// Whether the simulator has revisited an earlier board.
    #[inline]
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Largest live-cell count observed, the initial board included.
    #[inline]
    pub fn peak_size(&self) -> usize {
        self.peak_size
    }

    /// Current live cells.
    #[inline]
    pub fn live_cells(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Number of steps taken.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Render the grid as text, `#` for live and `.` for dead cells.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.board_size * (self.board_size + 1));
        for y in 0..self.board_size as i32 {
            for x in 0..self.board_size as i32 {
                out.push(if self.board.is_alive(Coord::new(x, y)) {
                    '#'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}
