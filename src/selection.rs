//! In-context example selection.
//!
//! Walks a ranked candidate list, drops examples whose source side is too
//! long, and tops up with uniformly random eligible pool entries when the
//! ranked list runs out. Random draws may repeat.
//!
//! ## Combined strategies
//!
//! A selection name such as `bm25+fuzzy` splits the shot budget evenly
//! between strategies. Each strategy contributes one example group. When a
//! strategy name repeats, its k-th slot starts `k * shots` entries into the
//! ranked list so the slots draw from disjoint windows.

use crate::corpus::{ParallelCorpus, SentencePair};
use crate::index::CandidateIndex;
use crate::order::OrderPolicy;
use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;

/// Default cap on random draws per missing example
pub const DEFAULT_MAX_DRAWS_PER_SHOT: usize = 10_000;

/// Errors that can occur during example selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Shot count must be greater than zero")]
    ZeroShots,

    #[error("Example pool is empty")]
    EmptyPool,

    #[error("Candidate index {index} is out of range for a pool of {pool_size} pairs")]
    IndexOutOfRange { index: usize, pool_size: usize },

    #[error("No eligible example found after {attempts} random draws")]
    BackfillExhausted { attempts: usize },

    #[error("Selection {selection:?} splits {shot} shots across {strategies} strategies, leaving none per strategy")]
    ShotBudgetTooSmall {
        selection: String,
        shot: usize,
        strategies: usize,
    },

    #[error("Empty strategy name in selection {0:?}")]
    EmptyStrategy(String),
}

/// Examples chosen for one group, in final prompt order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Pool indices, aligned with `examples`
    pub indices: Vec<usize>,
    /// Selected pairs
    pub examples: Vec<SentencePair>,
    /// How many examples came from random backfill
    pub backfilled: usize,
}

impl Selection {
    /// Number of selected examples
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Check if nothing was selected
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// One strategy's share of a (possibly combined) selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySlot {
    /// Strategy name, also the index file stem
    pub strategy: String,
    /// Position in the ranked list where this slot starts
    pub offset: usize,
    /// Examples drawn for this slot
    pub shots: usize,
}

/// Split a `+`-joined selection name into per-strategy slots
///
/// # Errors
///
/// Returns an error if a strategy name is empty or if `shot` is smaller
/// than the number of strategies.
pub fn split_strategies(selection: &str, shot: usize) -> Result<Vec<StrategySlot>, SelectionError> {
    let names: Vec<&str> = selection.split('+').map(str::trim).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err(SelectionError::EmptyStrategy(selection.to_string()));
    }

    let shots = shot / names.len();
    if shots == 0 {
        return Err(SelectionError::ShotBudgetTooSmall {
            selection: selection.to_string(),
            shot,
            strategies: names.len(),
        });
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    Ok(names
        .into_iter()
        .map(|name| {
            let occurrence = seen.entry(name).or_insert(0);
            let slot = StrategySlot {
                strategy: name.to_string(),
                offset: *occurrence * shots,
                shots,
            };
            *occurrence += 1;
            slot
        })
        .collect())
}

/// Example sampler with a bounded random backfill
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    max_draws_per_shot: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            max_draws_per_shot: DEFAULT_MAX_DRAWS_PER_SHOT,
        }
    }
}

impl Sampler {
    /// Create a sampler with the default draw cap
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler allowing `max_draws_per_shot` random draws for
    /// each example the ranked list failed to supply
    #[must_use]
    pub const fn with_max_draws(max_draws_per_shot: usize) -> Self {
        Self { max_draws_per_shot }
    }

    /// Select exactly `shot` eligible examples and put them in `order`
    ///
    /// # Errors
    ///
    /// Returns an error if `shot` is zero, the pool is empty, a ranked index
    /// is out of range, or random backfill cannot find an eligible entry
    /// within the draw cap.
    pub fn select<R: Rng + ?Sized>(
        &self,
        pool: &ParallelCorpus,
        ranked: &[usize],
        shot: usize,
        order: OrderPolicy,
        rng: &mut R,
    ) -> Result<Selection, SelectionError> {
        if shot == 0 {
            return Err(SelectionError::ZeroShots);
        }
        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }

        let mut chosen: Vec<(usize, &SentencePair)> = Vec::with_capacity(shot);

        for &index in ranked {
            if chosen.len() == shot {
                break;
            }
            let pair = pool.get(index).ok_or(SelectionError::IndexOutOfRange {
                index,
                pool_size: pool.len(),
            })?;
            if pair.is_eligible() {
                chosen.push((index, pair));
            }
        }

        let backfilled = shot - chosen.len();
        if backfilled > 0 {
            let budget = self.max_draws_per_shot.saturating_mul(backfilled);
            let mut attempts = 0;
            while chosen.len() < shot {
                if attempts == budget {
                    return Err(SelectionError::BackfillExhausted { attempts });
                }
                attempts += 1;

                let index = rng.gen_range(0..pool.len());
                if let Some(pair) = pool.get(index).filter(|p| p.is_eligible()) {
                    chosen.push((index, pair));
                }
            }
        }

        let (indices, examples): (Vec<usize>, Vec<SentencePair>) = order
            .apply(chosen, rng)
            .into_iter()
            .map(|(index, pair)| (index, pair.clone()))
            .unzip();

        Ok(Selection {
            indices,
            examples,
            backfilled,
        })
    }

    /// Select one group per slot for test item `item`
    ///
    /// `indices[k]` must hold the ranked lists for `slots[k]`.
    ///
    /// # Errors
    ///
    /// Propagates the first selection error of any slot.
    pub fn select_groups<R: Rng + ?Sized>(
        &self,
        pool: &ParallelCorpus,
        slots: &[StrategySlot],
        indices: &[&CandidateIndex],
        item: usize,
        order: OrderPolicy,
        rng: &mut R,
    ) -> Result<Vec<Selection>, SelectionError> {
        slots
            .iter()
            .zip(indices)
            .map(|(slot, index)| {
                let ranked = index.candidates(item);
                let window = ranked.get(slot.offset..).unwrap_or_default();
                self.select(pool, window, slot.shots, order, rng)
            })
            .collect()
    }
}
