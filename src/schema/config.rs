//! Configuration types for an evolutionary methuselah search.

use serde::{Deserialize, Serialize};

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Grid side length in cells.
    pub board_size: usize,
    /// Minimum live cells in a random board.
    pub initial_living_count_min: usize,
    /// Maximum live cells in a random board.
    pub initial_living_count_max: usize,
    /// Side of the centered window random cells are drawn from.
    pub initial_living_board_size: usize,
    /// Target number of individuals per generation.
    pub population_size: usize,
    /// Mutation probability `p` (0.0-1.0).
    pub mutation_chance: f64,
    /// Simulation budget per board.
    pub max_turns: usize,
    /// Number of breeding iterations.
    pub generations: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Score a generation's unseen boards on the rayon pool.
    #[serde(default)]
    pub parallel_evaluation: bool,
    /// Resource budgets.
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            board_size: 40,
            initial_living_count_min: 6,
            initial_living_count_max: 15,
            initial_living_board_size: 5,
            population_size: 10,
            mutation_chance: 0.3,
            max_turns: 1500,
            generations: 5000,
            random_seed: None,
            parallel_evaluation: false,
            limits: ResourceLimits::default(),
        }
    }
}

/// Optional caps on memory-heavy state. `None` means bounded only by the
/// allocator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum number of memoized scores.
    #[serde(default)]
    pub max_cache_entries: Option<usize>,
    /// Maximum live cells a single simulation may reach.
    #[serde(default)]
    pub max_live_cells: Option<usize>,
}

impl EvolutionConfig {
    /// Half-width of the random sampling window.
    #[inline]
    pub fn window_radius(&self) -> usize {
        self.initial_living_board_size / 2
    }

    /// Number of distinct cells inside the sampling window.
    #[inline]
    pub fn window_cells(&self) -> usize {
        let side = 2 * self.window_radius() + 1;
        side * side
    }

    /// Number of breeding pairs formed each generation.
    #[inline]
    pub fn breeding_pairs(&self) -> usize {
        self.population_size / 4
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::InvalidBoardSize);
        }
        if self.board_size > i32::MAX as usize {
            return Err(ConfigError::BoardTooLarge(self.board_size));
        }
        if self.initial_living_board_size == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        let center = self.board_size / 2;
        let radius = self.window_radius();
        if radius > center || center + radius >= self.board_size {
            return Err(ConfigError::WindowOutOfBounds {
                window: self.initial_living_board_size,
                board: self.board_size,
            });
        }
        if self.initial_living_count_min == 0 {
            return Err(ConfigError::InvalidLivingCount);
        }
        if self.initial_living_count_min > self.initial_living_count_max {
            return Err(ConfigError::LivingCountBounds {
                min: self.initial_living_count_min,
                max: self.initial_living_count_max,
            });
        }
        if self.initial_living_count_max > self.window_cells() {
            return Err(ConfigError::WindowTooSmall {
                max: self.initial_living_count_max,
                cells: self.window_cells(),
            });
        }
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(ConfigError::InvalidMutationChance(self.mutation_chance));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::InvalidMaxTurns);
        }
        if self.limits.max_cache_entries == Some(0) || self.limits.max_live_cells == Some(0) {
            return Err(ConfigError::InvalidLimit);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Board size must be non-zero")]
    InvalidBoardSize,
    #[error("Board size {0} does not fit in cell coordinates")]
    BoardTooLarge(usize),
    #[error("Initial living board size must be non-zero")]
    InvalidWindow,
    #[error("Sampling window of side {window} does not fit on a {board}x{board} board")]
    WindowOutOfBounds { window: usize, board: usize },
    #[error("Initial living count must be non-zero")]
    InvalidLivingCount,
    #[error("Initial living count min ({min}) > max ({max})")]
    LivingCountBounds { min: usize, max: usize },
    #[error("Initial living count max ({max}) exceeds the {cells} cells of the sampling window")]
    WindowTooSmall { max: usize, cells: usize },
    #[error("Population size must be non-zero")]
    InvalidPopulationSize,
    #[error("Mutation chance {0} must be within [0, 1]")]
    InvalidMutationChance(f64),
    #[error("Max turns must be positive")]
    InvalidMaxTurns,
    #[error("Resource limits must be positive when set")]
    InvalidLimit,
}
