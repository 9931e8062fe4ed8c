//! Compute module - Life simulation and the evolutionary search built on it.

pub mod evolution;
mod simulator;

pub use evolution::EvolutionEngine;
pub use simulator::*;
