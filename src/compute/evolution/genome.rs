//! Board generation, crossover and mutation operators.

use rand::prelude::*;

use crate::schema::{Board, Coord, EvolutionConfig};

/// Random number generator wrapper for board operations.
pub struct BoardRng {
    rng: StdRng,
}

impl BoardRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform cell from the window of side `initial_living_board_size`
    /// centered on the grid.
    pub fn random_cell(&mut self, config: &EvolutionConfig) -> Coord {
        let center = (config.board_size / 2) as i32;
        let radius = config.window_radius() as i32;
        Coord::new(
            center + self.rng.gen_range(-radius..=radius),
            center + self.rng.gen_range(-radius..=radius),
        )
    }

    /// Random board with a uniformly drawn number of distinct live cells.
    pub fn random_board(&mut self, config: &EvolutionConfig) -> Board {
        let living = self
            .rng
            .gen_range(config.initial_living_count_min..=config.initial_living_count_max);

        let mut board = Board::new();
        while board.len() < living {
            board.insert(self.random_cell(config));
        }
        board
    }

    /// Apply zero, one or two elementary mutations and return how many ran.
    ///
    /// A single draw `r` decides both: `r < p²` triggers one mutation and
    /// `r < p` another, so the counts 0, 1, 2 occur with probability
    /// `1 - p`, `p - p²` and `p²`.
    pub fn mutate(&mut self, board: &mut Board, config: &EvolutionConfig) -> usize {
        let p = config.mutation_chance;
        let r = self.rng.r#gen::<f64>();
        let mut applied = 0;

        if r < p * p {
            self.mutate_once(board, config);
            applied += 1;
        }
        if r < p {
            self.mutate_once(board, config);
            applied += 1;
        }
        applied
    }

    /// Kill a random cell or add one from the sampling window.
    ///
    /// The kill index is drawn from `0..=len`; drawing `len` leaves the
    /// board untouched. Adding a cell that is already alive is a no-op.
    pub fn mutate_once(&mut self, board: &mut Board, config: &EvolutionConfig) {
        if self.rng.gen_bool(0.5) {
            let index = self.rng.gen_range(0..=board.len());
            if let Some(cell) = board.nth(index) {
                board.remove(cell);
            }
        } else {
            let cell = self.random_cell(config);
            board.insert(cell);
        }
    }
}

/// Split both parents at the grid midline and recombine the halves.
///
/// Children, in order: father's left + mother's right, father's top +
/// mother's bottom, mother's left + father's right, mother's top + father's
/// bottom.
pub fn crossover(father: &Board, mother: &Board, board_size: usize) -> [Board; 4] {
    let mid = (board_size / 2) as i32;
    let left = |c: Coord| c.x < mid;
    let top = |c: Coord| c.y < mid;

    [
        combine(father, mother, left),
        combine(father, mother, top),
        combine(mother, father, left),
        combine(mother, father, top),
    ]
}

/// Cells of `low` on the low side of the split plus cells of `high` on the
/// other side.
fn combine(low: &Board, high: &Board, is_low: impl Fn(Coord) -> bool) -> Board {
    low.iter()
        .filter(|&c| is_low(c))
        .chain(high.iter().filter(|&c| !is_low(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> EvolutionConfig {
        EvolutionConfig::default()
    }

    #[test]
    fn test_random_board_within_window() {
        let mut rng = BoardRng::new(42);
        let config = config();

        for _ in 0..100 {
            let board = rng.random_board(&config);
            assert!(board.len() >= config.initial_living_count_min);
            assert!(board.len() <= config.initial_living_count_max);
            for c in board.iter() {
                assert!((18..=22).contains(&c.x), "{c:?} outside window");
                assert!((18..=22).contains(&c.y), "{c:?} outside window");
            }
        }
    }

    #[test]
    fn test_random_board_fills_window() {
        let config = EvolutionConfig {
            initial_living_board_size: 3,
            initial_living_count_min: 9,
            initial_living_count_max: 9,
            ..Default::default()
        };
        let board = BoardRng::new(1).random_board(&config);
        assert_eq!(board.len(), 9);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let config = config();
        let a = BoardRng::new(7).random_board(&config);
        let b = BoardRng::new(7).random_board(&config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_halves() {
        let father: Board = [(1, 1), (8, 1), (1, 8), (8, 8)]
            .into_iter()
            .map(Coord::from)
            .collect();
        let mother: Board = [(2, 2), (7, 2), (2, 7), (7, 7)]
            .into_iter()
            .map(Coord::from)
            .collect();

        let [c1, c2, c3, c4] = crossover(&father, &mother, 10);

        let expect =
            |cells: &[(i32, i32)]| -> Board { cells.iter().copied().map(Coord::from).collect() };
        assert_eq!(c1, expect(&[(1, 1), (1, 8), (7, 2), (7, 7)]));
        assert_eq!(c2, expect(&[(1, 1), (8, 1), (2, 7), (7, 7)]));
        assert_eq!(c3, expect(&[(2, 2), (2, 7), (8, 1), (8, 8)]));
        assert_eq!(c4, expect(&[(2, 2), (7, 2), (1, 8), (8, 8)]));
    }

    #[test]
    fn test_mutation_count_distribution() {
        let config = EvolutionConfig {
            mutation_chance: 0.3,
            ..Default::default()
        };
        let p = config.mutation_chance;
        let mut rng = BoardRng::new(1234);
        let trials = 100_000;
        let mut counts = [0usize; 3];

        for _ in 0..trials {
            let mut board = rng.random_board(&config);
            counts[rng.mutate(&mut board, &config)] += 1;
        }

        let expected = [1.0 - p, p - p * p, p * p];
        for (count, want) in counts.iter().zip(expected) {
            let got = *count as f64 / trials as f64;
            assert!((got - want).abs() < 0.01, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_zero_chance_never_mutates() {
        let config = EvolutionConfig {
            mutation_chance: 0.0,
            ..Default::default()
        };
        let mut rng = BoardRng::new(5);
        let mut board = rng.random_board(&config);
        let before = board.clone();
        for _ in 0..1000 {
            assert_eq!(rng.mutate(&mut board, &config), 0);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_mutate_once_changes_at_most_one_cell() {
        let config = config();
        let mut rng = BoardRng::new(9);
        for _ in 0..500 {
            let mut board = rng.random_board(&config);
            let before = board.len();
            rng.mutate_once(&mut board, &config);
            assert!(board.len().abs_diff(before) <= 1);
        }
    }

    #[test]
    fn test_kill_on_empty_board_is_noop() {
        let config = config();
        let mut rng = BoardRng::new(3);
        for _ in 0..100 {
            let mut board = Board::new();
            rng.mutate_once(&mut board, &config);
            assert!(board.len() <= 1);
        }
    }

    #[test]
    fn test_kill_index_includes_len() {
        // A 1x1 window makes every add hit the single live cell, so only a
        // kill drawing index 0 changes the board: one outcome in four.
        let config = EvolutionConfig {
            initial_living_board_size: 1,
            initial_living_count_min: 1,
            initial_living_count_max: 1,
            ..Default::default()
        };
        let mut rng = BoardRng::new(17);
        let start = rng.random_board(&config);
        assert_eq!(start.len(), 1);

        let trials = 20_000;
        let mut removed = 0;
        for _ in 0..trials {
            let mut board = start.clone();
            rng.mutate_once(&mut board, &config);
            if board.is_empty() {
                removed += 1;
            } else {
                assert_eq!(board, start);
            }
        }

        let rate = removed as f64 / trials as f64;
        assert!((rate - 0.25).abs() < 0.02, "removal rate {rate}");
    }

    proptest! {
        #[test]
        fn prop_crossover_partitions_parents(
            father in proptest::collection::vec((0i32..20, 0i32..20), 0..30),
            mother in proptest::collection::vec((0i32..20, 0i32..20), 0..30),
        ) {
            let father: Board = father.into_iter().map(Coord::from).collect();
            let mother: Board = mother.into_iter().map(Coord::from).collect();
            let mid = 10;
            let children = crossover(&father, &mother, 20);

            let halves: [(&Board, &Board, fn(Coord) -> i32); 4] = [
                (&father, &mother, |c| c.x),
                (&father, &mother, |c| c.y),
                (&mother, &father, |c| c.x),
                (&mother, &father, |c| c.y),
            ];

            for (child, (low, high, axis)) in children.iter().zip(halves) {
                for c in child.iter() {
                    prop_assert!(father.is_alive(c) || mother.is_alive(c));
                    if axis(c) < mid {
                        prop_assert!(low.is_alive(c));
                    } else {
                        prop_assert!(high.is_alive(c));
                    }
                }
                for c in low.iter().filter(|&c| axis(c) < mid) {
                    prop_assert!(child.is_alive(c));
                }
                for c in high.iter().filter(|&c| axis(c) >= mid) {
                    prop_assert!(child.is_alive(c));
                }
            }
        }
    }
}
