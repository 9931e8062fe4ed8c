//! Memoized scores for every board seen during a run.

use std::collections::HashMap;

use crate::schema::{Board, EvolutionError, Resource, Score};

/// Board → score memo that lives as long as a run.
///
/// Entries are never evicted. Growth is bounded by an optional entry limit
/// and by the allocator; both surface as `ResourceExhausted` on `store`.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    entries: HashMap<Board, Score>,
    max_entries: Option<usize>,
    hits: u64,
    misses: u64,
}

impl EvaluationCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that refuses to grow past `max_entries`.
    pub fn with_limit(max_entries: Option<usize>) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }

    /// Look up a board's score, counting the hit or miss.
    pub fn lookup(&mut self, board: &Board) -> Option<Score> {
        let found = self.entries.get(board).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Look up without touching the counters.
    pub fn peek(&self, board: &Board) -> Option<Score> {
        self.entries.get(board).copied()
    }

    /// Memoize a score. Overwrites an existing entry for the same board.
    pub fn store(&mut self, board: Board, score: Score) -> Result<(), EvolutionError> {
        if !self.entries.contains_key(&board) {
            if let Some(limit) = self.max_entries
                && self.entries.len() >= limit
            {
                return Err(EvolutionError::exhausted(
                    Resource::EvaluationCache,
                    format!("entry limit of {limit} reached"),
                ));
            }
            self.entries
                .try_reserve(1)
                .map_err(|e| EvolutionError::exhausted(Resource::EvaluationCache, e))?;
        }
        self.entries.insert(board, score);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
