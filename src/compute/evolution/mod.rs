//! Evolutionary search for Game of Life methuselahs.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Fitness** (`fitness`): growth times normalized time-to-stability
//! - **Cache** (`cache`): memoized scores for every board seen in a run
//! - **Genome Operations** (`genome`): random boards, crossover, mutation
//! - **Population** (`population`): ranking, pairing and backfill
//! - **Search** (`search`): the generation loop and best-ever record
//! - **Report** (`report`): CSV generation stats and JSON result export
//!
//! # Example
//!
//! ```rust,no_run
//! use methuselah::compute::evolution::EvolutionEngine;
//! use methuselah::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig {
//!     generations: 100,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config).expect("valid config");
//! let result = engine
//!     .run_with_callback(|summary| {
//!         println!("Generation {}: best = {:.3}", summary.generation, summary.best_score);
//!     })
//!     .expect("search failed");
//!
//! println!("Best score: {}", result.best_score());
//! ```

mod cache;
mod fitness;
mod genome;
mod population;
mod report;
mod search;

pub use cache::EvaluationCache;
pub use fitness::{FitnessEvaluator, evaluate};
pub use genome::{BoardRng, crossover};
pub use population::{Candidate, Population, RankStats};
pub use report::{StatsWriter, load_board, save_result};
pub use search::EvolutionEngine;
