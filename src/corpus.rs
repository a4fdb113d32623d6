//! Parallel corpus loading for in-context example pools and test sets.
//!
//! A pool is a pair of line-aligned files: line *i* of the source file pairs
//! with line *i* of the target file. Lengths are checked explicitly so a
//! short file fails loudly instead of truncating the pool.

#![allow(clippy::missing_const_for_fn)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source sides longer than this many whitespace tokens are never shown
/// as in-context examples.
pub const MAX_SOURCE_TOKENS: usize = 120;

/// Errors that can occur during corpus loading
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parallel files differ in length: {source_path} has {source_lines} lines, {target_path} has {target_lines}")]
    LengthMismatch {
        source_path: PathBuf,
        source_lines: usize,
        target_path: PathBuf,
        target_lines: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One aligned line of parallel data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentencePair {
    /// Source-language sentence
    pub source: String,
    /// Reference translation
    pub target: String,
}

impl SentencePair {
    /// Create a new sentence pair
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whitespace token count of the source side, ignoring surrounding quotes
    #[must_use]
    pub fn source_tokens(&self) -> usize {
        self.source.trim_matches('"').split_whitespace().count()
    }

    /// Whether the pair is short enough to be used as an in-context example
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.source_tokens() <= MAX_SOURCE_TOKENS
    }
}

/// Pool of candidate sentence pairs, addressed by line index
#[derive(Debug, Clone, Default)]
pub struct ParallelCorpus {
    pairs: Vec<SentencePair>,
}

impl ParallelCorpus {
    /// Build a pool from already-loaded pairs
    #[must_use]
    pub fn from_pairs(pairs: Vec<SentencePair>) -> Self {
        Self { pairs }
    }

    /// Load a pool from line-aligned source and target files
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or unreadable, or if the
    /// files have a different number of lines.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q) -> Result<Self, CorpusError> {
        let source = source.as_ref();
        let target = target.as_ref();

        let sources = read_lines(source, None)?;
        let targets = read_lines(target, None)?;

        if sources.len() != targets.len() {
            return Err(CorpusError::LengthMismatch {
                source_path: source.to_path_buf(),
                source_lines: sources.len(),
                target_path: target.to_path_buf(),
                target_lines: targets.len(),
            });
        }

        let pairs = sources
            .into_iter()
            .zip(targets)
            .map(|(s, t)| SentencePair::new(s, t))
            .collect();

        Ok(Self { pairs })
    }

    /// Get the pair at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SentencePair> {
        self.pairs.get(index)
    }

    /// Get total number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the pool is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Get iterator over pairs
    pub fn iter(&self) -> impl Iterator<Item = &SentencePair> {
        self.pairs.iter()
    }

    /// Compute statistics about the pool
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CorpusStats {
        let total_pairs = self.pairs.len();
        let eligible_pairs = self.pairs.iter().filter(|p| p.is_eligible()).count();
        let total_source_tokens: usize = self.pairs.iter().map(SentencePair::source_tokens).sum();
        let max_source_tokens = self
            .pairs
            .iter()
            .map(SentencePair::source_tokens)
            .max()
            .unwrap_or(0);

        let mean_source_tokens = if total_pairs == 0 {
            0.0
        } else {
            total_source_tokens as f64 / total_pairs as f64
        };

        CorpusStats {
            total_pairs,
            eligible_pairs,
            mean_source_tokens,
            max_source_tokens,
        }
    }
}

/// Statistics about a sentence-pair pool
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    /// Total number of pairs
    pub total_pairs: usize,
    /// Pairs within the source length threshold
    pub eligible_pairs: usize,
    /// Mean whitespace tokens on the source side
    pub mean_source_tokens: f64,
    /// Longest source side in tokens
    pub max_source_tokens: usize,
}

/// Read a text file as trimmed lines, optionally keeping only the first `cut`
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub fn read_lines(path: &Path, cut: Option<usize>) -> Result<Vec<String>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let lines = content.lines().map(|l| l.trim().to_string());

    Ok(match cut {
        Some(n) => lines.take(n).collect(),
        None => lines.collect(),
    })
}
