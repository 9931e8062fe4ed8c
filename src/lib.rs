//! Methuselah - evolutionary search for long-lived Game of Life patterns.
//!
//! Small random patterns are simulated on a bounded grid until they repeat
//! an earlier configuration. A genetic algorithm breeds the patterns that
//! grow the most over the longest time.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Boards, configuration and result types
//! - `compute`: Life simulation and the evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use methuselah::{Board, Coord, Simulator};
//!
//! // R-pentomino near the center of a 40x40 grid
//! let board = Board::from_pattern(".##\n##.\n.#.", Coord::new(18, 18));
//! let mut sim = Simulator::new(board, 40);
//! let turns = sim.run_until_stable(1500);
//!
//! println!("Stable after {} turns, peak {} cells", turns, sim.peak_size());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{EvolutionEngine, Simulator};
pub use schema::{Board, Coord, EvolutionConfig, EvolutionResult, GenerationSummary, Score};
