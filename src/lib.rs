//! # Few-Shot MT
//!
//! Few-shot machine translation prompting with retrieved in-context examples.
//!
//! For every test sentence, a retrieval strategy (bm25, fuzzy matching,
//! coverage, random, ...) has already ranked the training pool offline and
//! written the ranking to an index file. This crate turns those rankings into
//! prompts, sends them to a generation backend in batches and writes one
//! single-line translation per test sentence.
//!
//! ## Architecture
//!
//! ```text
//! Test set + training pool + <strategy>.index
//!        ↓
//! Example selection (ranked walk, length filter, random backfill)
//!        ↓
//! Example ordering (descending | ascending | random)
//!        ↓
//! Prompt assembly (alpaca template)
//!        ↓
//! Batched generation (external command, JSON lines)
//!        ↓
//! Answer extraction (strip prompt echo, keep first line)
//!        ↓
//! <lang>.<direction>.<selection>.<shot>.<order>.<template>.txt
//! ```

pub mod config;
pub mod corpus;
pub mod extract;
pub mod generation;
pub mod index;
pub mod order;
pub mod prompt;
pub mod runner;
pub mod selection;

pub use config::{
    ConfigError, DataSettings, Direction, GeneratorSettings, Overrides, RunConfig, RunSettings,
};
pub use corpus::{
    read_lines, CorpusError, CorpusStats, ParallelCorpus, SentencePair, MAX_SOURCE_TOKENS,
};
pub use extract::{extract_answer, extract_answer_from_tokens, first_line};
pub use generation::{
    CommandGenerator, Continuation, GenerationError, Generator, TokenOutput,
};
pub use index::{parse_index, CandidateIndex, IndexFileError};
pub use order::{InvalidOrder, OrderPolicy};
pub use prompt::{assemble, Language, PromptError, Template};
pub use runner::{
    BatchDriver, PreparedRun, PromptSet, RunPaths, RunSpec, RunSummary, RunnerError,
};
pub use selection::{
    split_strategies, Sampler, Selection, SelectionError, StrategySlot,
    DEFAULT_MAX_DRAWS_PER_SHOT,
};
