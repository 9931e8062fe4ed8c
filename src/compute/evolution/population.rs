//! One generation of boards: creation, ranking and breeding.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::schema::{Board, EvolutionConfig, EvolutionError, Resource, Score, ScoredBoard};

use super::cache::EvaluationCache;
use super::fitness::FitnessEvaluator;
use super::genome::{BoardRng, crossover};

/// Random draws allowed per missing individual when backfilling.
const BACKFILL_ATTEMPTS_PER_SLOT: usize = 64;

/// A board in the population, with its score once ranked.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub board: Board,
    pub score: Option<Score>,
}

impl Candidate {
    fn unscored(board: Board) -> Self {
        Self { board, score: None }
    }

    /// Score, or zero while unranked.
    pub fn score(&self) -> Score {
        self.score.unwrap_or_default()
    }
}

/// Counters from a ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankStats {
    /// Boards simulated this pass.
    pub evaluated: usize,
    /// Boards answered from the cache.
    pub cached: usize,
}

/// Unique boards of one generation, in insertion order until ranked and
/// in descending score order after.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Candidate>,
    seen: HashSet<Board>,
    ranked: bool,
}

impl Population {
    /// Create an empty population with room for `capacity` boards.
    pub fn with_capacity(capacity: usize) -> Result<Self, EvolutionError> {
        let mut members = Vec::new();
        members
            .try_reserve(capacity)
            .map_err(|e| EvolutionError::exhausted(Resource::Population, e))?;
        Ok(Self {
            members,
            seen: HashSet::new(),
            ranked: false,
        })
    }

    /// Initial generation: `population_size` random boards, where boards
    /// drawn twice count once.
    pub fn random(rng: &mut BoardRng, config: &EvolutionConfig) -> Result<Self, EvolutionError> {
        let mut population = Self::with_capacity(config.population_size)?;
        for _ in 0..config.population_size {
            population.insert(rng.random_board(config));
        }
        Ok(population)
    }

    /// Add an unscored board. Returns `false` if it is already present.
    pub fn insert(&mut self, board: Board) -> bool {
        if self.seen.contains(&board) {
            return false;
        }
        self.seen.insert(board.clone());
        self.members.push(Candidate::unscored(board));
        self.ranked = false;
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, board: &Board) -> bool {
        self.seen.contains(board)
    }

    /// Members in their current order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.members
    }

    pub fn is_ranked(&self) -> bool {
        self.ranked
    }

    /// Highest scoring member of a ranked population.
    pub fn fittest(&self) -> Option<ScoredBoard> {
        if !self.ranked {
            return None;
        }
        self.members.first().map(|c| ScoredBoard {
            board: c.board.clone(),
            score: c.score(),
        })
    }

    /// Top up with random boards until `population_size` is reached.
    ///
    /// Gives up after a bounded number of draws when the sampling window
    /// cannot produce enough distinct boards. Returns the number added.
    pub fn backfill(&mut self, rng: &mut BoardRng, config: &EvolutionConfig) -> usize {
        let target = config.population_size;
        let missing = target.saturating_sub(self.len());
        let max_attempts = missing * BACKFILL_ATTEMPTS_PER_SLOT;

        let mut added = 0;
        let mut attempts = 0;
        while self.len() < target && attempts < max_attempts {
            attempts += 1;
            if self.insert(rng.random_board(config)) {
                added += 1;
            }
        }

        if self.len() < target {
            log::warn!(
                "Backfill stopped at {}/{} boards after {} draws",
                self.len(),
                target,
                attempts
            );
        }
        added
    }

    /// Score every member, through the cache where possible, then sort by
    /// descending score.
    ///
    /// The sort is stable, so equal scores keep their insertion order. With
    /// `parallel` set, cache misses are simulated on the rayon pool and the
    /// cache is filled afterwards in population order.
    pub fn rank(
        &mut self,
        evaluator: &FitnessEvaluator,
        cache: &mut EvaluationCache,
        parallel: bool,
    ) -> Result<RankStats, EvolutionError> {
        let mut stats = RankStats::default();
        let mut pending = Vec::new();

        for (i, candidate) in self.members.iter_mut().enumerate() {
            match cache.lookup(&candidate.board) {
                Some(score) => {
                    candidate.score = Some(score);
                    stats.cached += 1;
                }
                None => pending.push(i),
            }
        }

        if parallel {
            let scores: Vec<Result<Score, EvolutionError>> = pending
                .par_iter()
                .map(|&i| evaluator.evaluate(&self.members[i].board))
                .collect();
            for (i, score) in pending.into_iter().zip(scores) {
                self.record(i, score?, cache)?;
                stats.evaluated += 1;
            }
        } else {
            for i in pending {
                let score = evaluator.evaluate(&self.members[i].board)?;
                self.record(i, score, cache)?;
                stats.evaluated += 1;
            }
        }

        self.members.sort_by(|a, b| b.score().cmp_score(&a.score()));
        self.ranked = true;
        Ok(stats)
    }

    fn record(
        &mut self,
        index: usize,
        score: Score,
        cache: &mut EvaluationCache,
    ) -> Result<(), EvolutionError> {
        let candidate = &mut self.members[index];
        cache.store(candidate.board.clone(), score)?;
        candidate.score = Some(score);
        Ok(())
    }

    /// Breed the next generation from a ranked population.
    ///
    /// Consecutive ranked members form pairs (1st with 2nd, 3rd with 4th,
    /// ...), `population_size / 4` pairs in all, each producing four mutated
    /// crossover children. The remainder is backfilled with random boards.
    /// Returns the new population and the number of mutations applied.
    pub fn breed(
        &self,
        rng: &mut BoardRng,
        config: &EvolutionConfig,
    ) -> Result<(Population, usize), EvolutionError> {
        if !self.ranked {
            return Err(EvolutionError::Internal(
                "breeding from an unranked population".into(),
            ));
        }

        let mut next = Population::with_capacity(config.population_size)?;
        let mut mutations = 0;

        for pair in self.members.chunks_exact(2).take(config.breeding_pairs()) {
            let (father, mother) = (&pair[0].board, &pair[1].board);
            for mut child in crossover(father, mother, config.board_size) {
                mutations += rng.mutate(&mut child, config);
                next.insert(child);
            }
        }

        next.backfill(rng, config);
        Ok((next, mutations))
    }

    /// Mean, minimum and maximum score of the members.
    pub fn score_stats(&self) -> (f64, f64, f64) {
        if self.members.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let scores = self.members.iter().map(|c| c.score().score);
        let sum: f64 = scores.clone().sum();
        let min = scores.clone().fold(f64::INFINITY, f64::min);
        let max = scores.fold(f64::NEG_INFINITY, f64::max);
        (sum / self.members.len() as f64, min, max)
    }
}
