//! Score, progress and result types for the evolutionary search.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Board, ConfigError};

/// Fitness of a board.
///
/// Two scores compare by `score` alone; `size` and `time` are carried for
/// reporting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Score {
    /// Combined fitness, `size * time`.
    pub score: f64,
    /// Peak live cells minus initial live cells.
    pub size: usize,
    /// Turn at which the board stabilized divided by the turn budget.
    pub time: f64,
}

impl Score {
    pub fn new(size: usize, time: f64) -> Self {
        Self {
            score: size as f64 * time,
            size,
            time,
        }
    }

    /// Total order over `score`, used for ranking.
    #[inline]
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.score.partial_cmp(&other.score)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {}, {:.3})", self.score, self.size, self.time)
    }
}

/// A board together with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBoard {
    pub board: Board,
    pub score: Score,
}

/// Per-generation statistics handed to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation index.
    pub generation: usize,
    /// Best score recorded so far in the run.
    pub best_score: f64,
    /// Mean score of this generation.
    pub avg_score: f64,
    /// Lowest score of this generation.
    pub min_score: f64,
    /// Highest score of this generation.
    pub max_score: f64,
    /// Mutations applied while breeding from this generation.
    pub mutations: usize,
}

/// Current phase of the evolution loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the initial population.
    #[default]
    Initializing,
    /// Scoring and sorting the population.
    Ranking,
    /// Producing the next generation.
    Breeding,
    /// Run finished.
    Terminated,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best individual ever ranked, if any scored above zero.
    pub best: Option<ScoredBoard>,
    /// Statistics from the run.
    pub stats: EvolutionStats,
}

impl EvolutionResult {
    /// Best score of the run, zero when nothing improved on the empty record.
    pub fn best_score(&self) -> Score {
        self.best.as_ref().map(|b| b.score).unwrap_or_default()
    }
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Breeding iterations completed.
    pub generations: usize,
    /// Boards simulated.
    pub evaluations: u64,
    /// Boards answered from the cache.
    pub cache_hits: u64,
    /// Distinct boards memoized.
    pub cache_entries: usize,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Ran the configured number of generations.
    MaxGenerations,
    /// Memory or a configured budget ran out.
    ResourceExhausted(String),
}

/// Resource whose budget can run out during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    EvaluationCache,
    LiveCells,
    Population,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvaluationCache => write!(f, "evaluation cache"),
            Self::LiveCells => write!(f, "live cells"),
            Self::Population => write!(f, "population"),
        }
    }
}

/// Errors raised while running a search.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Resource exhausted ({resource}): {detail}")]
    ResourceExhausted { resource: Resource, detail: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvolutionError {
    pub(crate) fn exhausted(resource: Resource, detail: impl fmt::Display) -> Self {
        Self::ResourceExhausted {
            resource,
            detail: detail.to_string(),
        }
    }
}
