//! Generation loop driving the methuselah search.

use std::time::Instant;

use crate::schema::{
    Board, EvolutionConfig, EvolutionError, EvolutionPhase, EvolutionResult,
    EvolutionStats, GenerationSummary, Score, ScoredBoard, StopReason,
};

use super::cache::EvaluationCache;
use super::fitness::FitnessEvaluator;
use super::genome::BoardRng;
use super::population::Population;

/// Evolution session. Owns the cache, the best record and the counters
/// for the lifetime of one run.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: BoardRng,
    evaluator: FitnessEvaluator,
    cache: EvaluationCache,
    population: Population,
    best: Option<ScoredBoard>,
    phase: EvolutionPhase,
    generation: usize,
    mutations: usize,
    evaluations: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine, validating the configuration.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = seeded_rng(&config);
        let evaluator = FitnessEvaluator::from_config(&config);
        let cache = EvaluationCache::with_limit(config.limits.max_cache_entries);

        Ok(Self {
            config,
            rng,
            evaluator,
            cache,
            population: Population::default(),
            best: None,
            phase: EvolutionPhase::Initializing,
            generation: 0,
            mutations: 0,
            evaluations: 0,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Best individual ranked so far.
    pub fn best(&self) -> Option<&ScoredBoard> {
        self.best.as_ref()
    }

    /// Best score so far, zero before anything improved on it.
    pub fn best_score(&self) -> Score {
        self.best.as_ref().map(|b| b.score).unwrap_or_default()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Start a fresh run: reseed, drop the cache and best record of any
    /// earlier run, and build the initial population.
    pub fn initialize(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Initializing;
        self.rng = seeded_rng(&self.config);
        self.cache = EvaluationCache::with_limit(self.config.limits.max_cache_entries);
        self.best = None;
        self.generation = 0;
        self.mutations = 0;
        self.evaluations = 0;
        self.population = Population::random(&mut self.rng, &self.config)?;
        self.phase = EvolutionPhase::Ranking;
        Ok(())
    }

    /// Score and sort the current population and update the best record.
    fn rank(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Ranking;
        let stats = self.population.rank(
            &self.evaluator,
            &mut self.cache,
            self.config.parallel_evaluation,
        )?;
        self.evaluations += stats.evaluated as u64;

        if let Some(fittest) = self.population.fittest()
            && fittest.score.cmp_score(&self.best_score()).is_gt()
        {
            log::debug!(
                "Generation {}: new best {} {}",
                self.generation,
                fittest.score,
                fittest.board
            );
            self.best = Some(fittest);
        }
        Ok(())
    }

    /// Replace the population with the offspring of the ranked one.
    fn breed(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Breeding;
        self.mutations = 0;
        let (next, mutations) = self.population.breed(&mut self.rng, &self.config)?;
        self.mutations = mutations;
        self.population = next;
        Ok(())
    }

    /// Statistics of the current (ranked) population.
    pub fn summary(&self) -> GenerationSummary {
        let (avg_score, min_score, max_score) = self.population.score_stats();
        GenerationSummary {
            generation: self.generation,
            best_score: self.best_score().score,
            avg_score,
            min_score,
            max_score,
            mutations: self.mutations,
        }
    }

    /// One breeding iteration: rank, then breed. Returns the summary of the
    /// ranked generation.
    fn step_generation(&mut self) -> Result<GenerationSummary, EvolutionError> {
        self.rank()?;
        // Stats describe the ranked generation, not its offspring.
        let mut summary = self.summary();
        self.breed()?;
        summary.mutations = self.mutations;
        self.generation += 1;
        Ok(summary)
    }

    fn run_generations<F>(&mut self, callback: &mut F) -> Result<(), EvolutionError>
    where
        F: FnMut(&GenerationSummary),
    {
        self.initialize()?;

        while self.generation < self.config.generations {
            let summary = self.step_generation()?;
            log_summary(&summary, self.config.generations);
            callback(&summary);
        }

        self.rank()?;
        self.mutations = 0;
        let summary = self.summary();
        log_summary(&summary, self.config.generations);
        callback(&summary);
        Ok(())
    }

    /// Run evolution with progress callback.
    ///
    /// Running out of resources ends the run early but still returns the
    /// best board found; any other error is returned as is.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&GenerationSummary),
    {
        let start_time = Instant::now();
        log::info!(
            "Starting search: {} generations of {} boards on a {}x{} grid",
            self.config.generations,
            self.config.population_size,
            self.config.board_size,
            self.config.board_size
        );

        let stop_reason = match self.run_generations(&mut callback) {
            Ok(()) => StopReason::MaxGenerations,
            Err(EvolutionError::ResourceExhausted { resource, detail }) => {
                log::warn!(
                    "Stopping at generation {}: {} exhausted ({})",
                    self.generation,
                    resource,
                    detail
                );
                StopReason::ResourceExhausted(format!("{resource}: {detail}"))
            }
            Err(e) => {
                self.phase = EvolutionPhase::Terminated;
                return Err(e);
            }
        };
        self.phase = EvolutionPhase::Terminated;

        log::debug!(
            "Cache: {} entries, {} hits, {} misses",
            self.cache.len(),
            self.cache.hits(),
            self.cache.misses()
        );
        log::info!("Search finished, best {}", self.best_score());

        Ok(EvolutionResult {
            best: self.best.clone(),
            stats: EvolutionStats {
                generations: self.generation,
                evaluations: self.evaluations,
                cache_hits: self.cache.hits(),
                cache_entries: self.cache.len(),
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
                stop_reason,
            },
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }

    /// Run evolution and return only the best board and score.
    pub fn run_best(&mut self) -> Result<(Option<Board>, Score), EvolutionError> {
        let result = self.run()?;
        let score = result.best_score();
        Ok((result.best.map(|b| b.board), score))
    }
}

fn seeded_rng(config: &EvolutionConfig) -> BoardRng {
    match config.random_seed {
        Some(seed) => BoardRng::new(seed),
        None => BoardRng::random(),
    }
}

fn log_summary(summary: &GenerationSummary, generations: usize) {
    log::info!(
        "gen: {}/{} best: {:.3} avg: {:.3} min: {:.3} max: {:.3} mut: {}",
        summary.generation,
        generations,
        summary.best_score,
        summary.avg_score,
        summary.min_score,
        summary.max_score,
        summary.mutations
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConfigError, ResourceLimits};

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            board_size: 30,
            population_size: 8,
            generations: 3,
            max_turns: 200,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EvolutionConfig {
            initial_living_count_min: 20,
            initial_living_count_max: 10,
            ..small_config()
        };
        assert!(matches!(
            EvolutionEngine::new(config),
            Err(EvolutionError::InvalidConfiguration(
                ConfigError::LivingCountBounds { .. }
            ))
        ));
    }

    #[test]
    fn test_evolution_engine_creation() {
        let mut engine = EvolutionEngine::new(small_config()).unwrap();
        assert_eq!(engine.phase(), EvolutionPhase::Initializing);
        engine.initialize().unwrap();
        assert!(engine.population().len() <= 8);
        assert_eq!(engine.phase(), EvolutionPhase::Ranking);
    }

    #[test]
    fn test_evolution_run() {
        let mut engine = EvolutionEngine::new(small_config()).unwrap();
        let mut summaries = Vec::new();
        let result = engine.run_with_callback(|s| summaries.push(*s)).unwrap();

        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
        assert_eq!(engine.phase(), EvolutionPhase::Terminated);

        let generations: Vec<usize> = summaries.iter().map(|s| s.generation).collect();
        assert_eq!(generations, vec![0, 1, 2, 3]);
        assert_eq!(summaries.last().unwrap().mutations, 0);

        // Best so far never decreases and bounds each generation's max.
        for pair in summaries.windows(2) {
            assert!(pair[1].best_score >= pair[0].best_score);
        }
        for s in &summaries {
            assert!(s.best_score >= s.max_score);
            assert!(s.max_score >= s.avg_score && s.avg_score >= s.min_score);
        }
        assert_eq!(result.best_score().score, summaries.last().unwrap().best_score);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let run = || {
            let mut engine = EvolutionEngine::new(small_config()).unwrap();
            engine.run_best().unwrap()
        };
        let (board_a, score_a) = run();
        let (board_b, score_b) = run();
        assert_eq!(board_a, board_b);
        assert_eq!(score_a.score, score_b.score);
        assert_eq!(score_a.size, score_b.size);
    }

    #[test]
    fn test_rerun_starts_fresh() {
        let mut engine = EvolutionEngine::new(small_config()).unwrap();
        let first = engine.run().unwrap();
        let second = engine.run().unwrap();
        let fresh = EvolutionEngine::new(small_config())
            .unwrap()
            .run()
            .unwrap();

        for result in [&second, &fresh] {
            assert_eq!(result.stats.evaluations, first.stats.evaluations);
            assert_eq!(result.stats.cache_entries, first.stats.cache_entries);
            assert_eq!(result.stats.cache_hits, first.stats.cache_hits);
            assert_eq!(
                result.best.as_ref().map(|b| &b.board),
                first.best.as_ref().map(|b| &b.board)
            );
            assert_eq!(result.best_score().score, first.best_score().score);
        }
        assert_eq!(engine.cache().len(), first.stats.cache_entries);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let sequential = EvolutionEngine::new(small_config())
            .unwrap()
            .run_best()
            .unwrap();
        let parallel = EvolutionEngine::new(EvolutionConfig {
            parallel_evaluation: true,
            ..small_config()
        })
        .unwrap()
        .run_best()
        .unwrap();
        assert_eq!(sequential.0, parallel.0);
        assert_eq!(sequential.1.score, parallel.1.score);
    }

    #[test]
    fn test_cache_avoids_reevaluation() {
        // A 1x1 window admits a single board, so every generation repeats it.
        let config = EvolutionConfig {
            initial_living_board_size: 1,
            initial_living_count_min: 1,
            initial_living_count_max: 1,
            population_size: 1,
            generations: 5,
            ..small_config()
        };
        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.evaluations, 1);
        assert_eq!(result.stats.cache_entries, 1);
        assert_eq!(result.stats.cache_hits, 5);
        assert!(result.best.is_none());
    }

    #[test]
    fn test_resource_exhaustion_keeps_best() {
        let config = EvolutionConfig {
            generations: 50,
            limits: ResourceLimits {
                max_cache_entries: Some(12),
                max_live_cells: None,
            },
            ..small_config()
        };
        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run().unwrap();

        assert!(matches!(
            result.stats.stop_reason,
            StopReason::ResourceExhausted(_)
        ));
        assert!(result.stats.generations < 50);
        assert!(result.stats.cache_entries <= 12);
        assert_eq!(engine.phase(), EvolutionPhase::Terminated);
        assert_eq!(
            result.best.as_ref().map(|b| b.score.score),
            engine.best().map(|b| b.score.score)
        );
    }
}
