//! Schema module - Board, configuration and result types for the search.

mod board;
mod config;
mod evolution;

pub use board::*;
pub use config::*;
pub use evolution::*;
