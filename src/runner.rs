//! Batch driver for few-shot translation runs.
//!
//! One run covers a (language, direction, selection) combination: load the
//! test set, example pool and candidate indices, build one prompt per test
//! item, send prompts to the generator in fixed-size batches and write one
//! answer per line. Output line *i* always belongs to test item *i*.

use crate::config::{ConfigError, DataSettings, Direction, RunConfig, RunSettings};
use crate::corpus::{read_lines, CorpusError, ParallelCorpus};
use crate::generation::{GenerationError, Generator};
use crate::index::{CandidateIndex, IndexFileError};
use crate::order::OrderPolicy;
use crate::prompt::{Language, Template};
use crate::selection::{split_strategies, Sampler, SelectionError, StrategySlot};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during a run
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Index(#[from] IndexFileError),

    #[error("Test item {item}: {source}")]
    Selection {
        item: usize,
        #[source]
        source: SelectionError,
    },

    #[error("Batch {batch}: {source}")]
    Generation {
        batch: usize,
        #[source]
        source: GenerationError,
    },

    #[error("Batch {batch}: generator returned {got} continuations for {expected} prompts")]
    BatchMismatch {
        batch: usize,
        expected: usize,
        got: usize,
    },

    #[error("Test set mismatch: {sources} source lines but {references} reference lines")]
    TestSetMismatch { sources: usize, references: usize },

    #[error("Test item {item} out of range for {items} items")]
    ItemOutOfRange { item: usize, items: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// File locations for one language and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub test_source: PathBuf,
    pub test_target: PathBuf,
    pub train_source: PathBuf,
    pub train_target: PathBuf,
    pub index_dir: PathBuf,
}

impl RunPaths {
    /// Resolve the standard layout under `root`:
    /// `<root>/<lang>/{test,train}.<code>` and `<root>/<lang>/index/test/<direction>/`
    #[must_use]
    pub fn new(root: &Path, lang: Language, direction: Direction) -> Self {
        let (source, target) = direction.languages(lang);
        let dir = root.join(lang.code());
        Self {
            test_source: dir.join(format!("test.{}", source.code())),
            test_target: dir.join(format!("test.{}", target.code())),
            train_source: dir.join(format!("train.{}", source.code())),
            train_target: dir.join(format!("train.{}", target.code())),
            index_dir: dir.join("index").join("test").join(direction.as_str()),
        }
    }
}

/// One combination of the sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub language: Language,
    pub direction: Direction,
    pub selection: String,
}

impl RunSpec {
    /// Stable identifier, also the stem of the output file name
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}.{}", self.language, self.direction, self.selection)
    }

    /// Random stream for this combination
    ///
    /// All runs share `seed`; each combination reads its own ChaCha stream,
    /// selected by a SHA-256 digest of [`RunSpec::key`].
    #[must_use]
    pub fn rng(&self, seed: u64) -> ChaCha8Rng {
        let digest = Sha256::digest(self.key().as_bytes());
        let mut stream = [0u8; 8];
        stream.copy_from_slice(&digest[..8]);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(u64::from_le_bytes(stream));
        rng
    }
}

/// Everything loaded for a run, before any generation
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub spec: RunSpec,
    pub source: Language,
    pub target: Language,
    pub tests: Vec<String>,
    pub pool: ParallelCorpus,
    slots: Vec<StrategySlot>,
    indices: Vec<CandidateIndex>,
}

/// Prompts for every test item of a run
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub prompts: Vec<String>,
    /// Test items that needed random backfill
    pub backfilled_items: usize,
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub language: Language,
    pub direction: Direction,
    pub selection: String,
    pub shot: usize,
    pub order: OrderPolicy,
    pub template: Template,
    pub items: usize,
    pub backfilled_items: usize,
    pub output: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(37);
        writeln!(f, "{rule}")?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Direction: {}", self.direction)?;
        writeln!(f, "Selection: {}", self.selection)?;
        writeln!(f, "Shot: {}", self.shot)?;
        writeln!(f, "Order: {}", self.order)?;
        writeln!(f, "Template: {}", self.template)?;
        writeln!(f, "Items: {} ({} backfilled)", self.items, self.backfilled_items)?;
        writeln!(f, "Output: {}", self.output.display())?;
        write!(f, "{rule}")
    }
}

/// Drives prompt construction and generation over a sweep
pub struct BatchDriver<G> {
    settings: RunSettings,
    data: DataSettings,
    sampler: Sampler,
    generator: G,
}

impl<G> BatchDriver<G> {
    /// Create a driver for `config`, generating with `generator`
    ///
    /// Prompt-only use (see [`BatchDriver::render_prompt`]) needs no backend
    /// and can pass `()`.
    #[must_use]
    pub fn new(config: RunConfig, generator: G) -> Self {
        let sampler = Sampler::with_max_draws(config.run.max_draws_per_shot);
        Self {
            settings: config.run,
            data: config.data,
            sampler,
            generator,
        }
    }

    /// Get the run settings
    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Get the generation backend
    #[must_use]
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// All combinations in sweep order: directions, then languages, then selections
    #[must_use]
    pub fn combinations(&self) -> Vec<RunSpec> {
        let mut specs = Vec::new();
        for &direction in &self.settings.directions {
            for &language in &self.settings.languages {
                for selection in &self.settings.selections {
                    specs.push(RunSpec {
                        language,
                        direction,
                        selection: selection.clone(),
                    });
                }
            }
        }
        specs
    }

    /// Output file for `spec`
    #[must_use]
    pub fn output_path(&self, spec: &RunSpec) -> PathBuf {
        let s = &self.settings;
        self.data.output_dir.join(format!(
            "{}.{}.{}.{}.txt",
            spec.key(),
            s.shot,
            s.order,
            s.template
        ))
    }

    /// Load test set, pool and indices for `spec`
    ///
    /// # Errors
    ///
    /// Returns an error if any file is missing or malformed, the pool files
    /// differ in length, the references do not match the test set, or an
    /// index file has fewer lines than there are test items.
    pub fn prepare(&self, spec: &RunSpec) -> Result<PreparedRun, RunnerError> {
        let paths = RunPaths::new(&self.data.root, spec.language, spec.direction);
        let (source, target) = spec.direction.languages(spec.language);

        let tests = read_lines(&paths.test_source, self.settings.cut)?;
        let references = read_lines(&paths.test_target, self.settings.cut)?;
        if tests.len() != references.len() {
            return Err(RunnerError::TestSetMismatch {
                sources: tests.len(),
                references: references.len(),
            });
        }

        let pool = ParallelCorpus::load(&paths.train_source, &paths.train_target)?;
        let slots = split_strategies(&spec.selection, self.settings.shot)
            .map_err(ConfigError::from)?;

        let mut loaded: HashMap<String, CandidateIndex> = HashMap::new();
        for slot in &slots {
            if !loaded.contains_key(slot.strategy.as_str()) {
                let index = CandidateIndex::load(&paths.index_dir, &slot.strategy)?;
                index.ensure_covers(tests.len())?;
                loaded.insert(slot.strategy.clone(), index);
            }
        }
        let indices = slots
            .iter()
            .filter_map(|slot| loaded.get(slot.strategy.as_str()).cloned())
            .collect();

        tracing::debug!(
            pool = pool.len(),
            items = tests.len(),
            strategies = slots.len(),
            "Loaded run inputs"
        );

        Ok(PreparedRun {
            spec: spec.clone(),
            source,
            target,
            tests,
            pool,
            slots,
            indices,
        })
    }

    /// Build prompts for the first `limit` test items (all when `None`)
    ///
    /// The random stream restarts per call, so a prefix of items always
    /// gets the same prompts as a full run.
    ///
    /// # Errors
    ///
    /// Returns the first selection error, tagged with its test item.
    pub fn build_prompts(
        &self,
        run: &PreparedRun,
        limit: Option<usize>,
    ) -> Result<PromptSet, RunnerError> {
        let mut rng = run.spec.rng(self.settings.seed);
        let indices: Vec<&CandidateIndex> = run.indices.iter().collect();
        let items = limit.map_or(run.tests.len(), |n| n.min(run.tests.len()));

        let mut prompts = Vec::with_capacity(items);
        let mut backfilled_items = 0;

        for (item, query) in run.tests.iter().take(items).enumerate() {
            let groups = self
                .sampler
                .select_groups(&run.pool, &run.slots, &indices, item, self.settings.order, &mut rng)
                .map_err(|source| RunnerError::Selection { item, source })?;

            let backfilled: usize = groups.iter().map(|g| g.backfilled).sum();
            if backfilled > 0 {
                backfilled_items += 1;
                tracing::warn!(
                    item,
                    backfilled,
                    "Ranked candidates exhausted, backfilled at random"
                );
            }

            let examples: Vec<_> = groups.into_iter().map(|g| g.examples).collect();
            prompts.push(
                self.settings
                    .template
                    .render(query, &examples, run.source, run.target),
            );
        }

        Ok(PromptSet {
            prompts,
            backfilled_items,
        })
    }

    /// Render the prompt for a single test item without generating
    ///
    /// # Errors
    ///
    /// Returns an error if inputs cannot be loaded, `item` is out of range,
    /// or selection fails.
    pub fn render_prompt(&self, spec: &RunSpec, item: usize) -> Result<String, RunnerError> {
        let run = self.prepare(spec)?;
        if item >= run.tests.len() {
            return Err(RunnerError::ItemOutOfRange {
                item,
                items: run.tests.len(),
            });
        }
        let mut set = self.build_prompts(&run, Some(item + 1))?;
        set.prompts.pop().ok_or(RunnerError::ItemOutOfRange {
            item,
            items: run.tests.len(),
        })
    }
}

impl<G: Generator> BatchDriver<G> {
    /// Run one combination and write its answer file
    ///
    /// # Errors
    ///
    /// Returns an error if loading, selection or any generation batch fails.
    /// Nothing is generated when loading or prompt construction fails.
    pub fn run_one(&mut self, spec: &RunSpec) -> Result<RunSummary, RunnerError> {
        let started_at = Utc::now();
        let output = self.output_path(spec);

        tracing::info!(
            language = %spec.language,
            direction = %spec.direction,
            selection = %spec.selection,
            shot = self.settings.shot,
            order = %self.settings.order,
            template = %self.settings.template,
            "Starting run"
        );

        let run = self.prepare(spec)?;
        let PromptSet {
            prompts,
            backfilled_items,
        } = self.build_prompts(&run, None)?;

        std::fs::create_dir_all(&self.data.output_dir)?;
        let mut writer = BufWriter::new(File::create(&output)?);

        for (batch, chunk) in prompts.chunks(self.settings.batch_size).enumerate() {
            tracing::debug!(
                batch,
                size = chunk.len(),
                generator = self.generator.name(),
                "Generating batch"
            );

            let continuations = self
                .generator
                .generate(chunk)
                .map_err(|source| RunnerError::Generation { batch, source })?;

            if continuations.len() != chunk.len() {
                return Err(RunnerError::BatchMismatch {
                    batch,
                    expected: chunk.len(),
                    got: continuations.len(),
                });
            }

            for (prompt, continuation) in chunk.iter().zip(&continuations) {
                writeln!(writer, "{}", continuation.answer(prompt))?;
            }
        }
        writer.flush()?;

        let summary = RunSummary {
            language: spec.language,
            direction: spec.direction,
            selection: spec.selection.clone(),
            shot: self.settings.shot,
            order: self.settings.order,
            template: self.settings.template,
            items: prompts.len(),
            backfilled_items,
            output,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            items = summary.items,
            backfilled = summary.backfilled_items,
            output = %summary.output.display(),
            "Run complete"
        );

        Ok(summary)
    }

    /// Run every combination in sweep order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first run error.
    pub fn run_all(&mut self) -> Result<Vec<RunSummary>, RunnerError> {
        self.combinations()
            .iter()
            .map(|spec| self.run_one(spec))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorSettings;
    use crate::generation::Continuation;
    use tempfile::TempDir;

    /// Echoes the prompt followed by a fixed answer and a spill-over line
    struct EchoGenerator {
        calls: Vec<usize>,
    }

    impl Generator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate(&mut self, prompts: &[String]) -> Result<Vec<Continuation>, GenerationError> {
            self.calls.push(prompts.len());
            Ok(prompts
                .iter()
                .map(|p| {
                    let query = p.lines().rev().nth(1).unwrap_or_default();
                    Continuation::from_text(format!("{p} ANSWER[{query}]\nGerman: spill"))
                })
                .collect())
        }
    }

    struct ShortGenerator;

    impl Generator for ShortGenerator {
        fn name(&self) -> &str {
            "short"
        }

        fn generate(&mut self, _prompts: &[String]) -> Result<Vec<Continuation>, GenerationError> {
            Ok(vec![Continuation::from_text("only one")])
        }
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let de = dir.path().join("data/de");
        write(&de.join("test.de"), "Hallo\nTschüss\nDanke\n");
        write(&de.join("test.en"), "Hello\nBye\nThanks\n");
        write(&de.join("train.de"), "eins\nzwei\ndrei\nvier\n");
        write(&de.join("train.en"), "one\ntwo\nthree\nfour\n");
        write(&de.join("index/test/into/bm25.index"), "0 1\n2 3\n1\n");
        write(&de.join("index/test/into/fuzzy.index"), "3 2\n1 0\n0 2\n");
        dir
    }

    fn config(dir: &TempDir, yaml_run: &str) -> RunConfig {
        let mut config = RunConfig::from_yaml(&format!(
            "run:\n{yaml_run}\ndata:\n  root: {}\n  output_dir: {}\n",
            dir.path().join("data").display(),
            dir.path().join("out").display()
        ))
        .unwrap();
        config.generator = Some(GeneratorSettings {
            command: "unused".to_string(),
            args: Vec::new(),
        });
        config
    }

    fn spec(selection: &str) -> RunSpec {
        RunSpec {
            language: Language::De,
            direction: Direction::Into,
            selection: selection.to_string(),
        }
    }

    #[test]
    fn test_run_paths_into() {
        let paths = RunPaths::new(Path::new("data"), Language::Fr, Direction::Into);
        assert_eq!(paths.test_source, PathBuf::from("data/fr/test.fr"));
        assert_eq!(paths.test_target, PathBuf::from("data/fr/test.en"));
        assert_eq!(paths.train_source, PathBuf::from("data/fr/train.fr"));
        assert_eq!(paths.index_dir, PathBuf::from("data/fr/index/test/into"));
    }

    #[test]
    fn test_run_paths_outof() {
        let paths = RunPaths::new(Path::new("data"), Language::Ru, Direction::Outof);
        assert_eq!(paths.test_source, PathBuf::from("data/ru/test.en"));
        assert_eq!(paths.train_target, PathBuf::from("data/ru/train.ru"));
        assert_eq!(paths.index_dir, PathBuf::from("data/ru/index/test/outof"));
    }

    #[test]
    fn test_combinations_order() {
        let dir = fixture();
        let cfg = config(
            &dir,
            "  languages: [de, fr]\n  directions: [into, outof]\n  selections: [bm25, fuzzy]\n  shot: 2",
        );
        let driver = BatchDriver::new(cfg, ShortGenerator);
        let specs = driver.combinations();
        assert_eq!(specs.len(), 8);
        assert_eq!(specs[0].direction, Direction::Into);
        assert_eq!(specs[0].language, Language::De);
        assert_eq!(specs[1].selection, "fuzzy");
        assert_eq!(specs[2].language, Language::Fr);
        assert_eq!(specs[4].direction, Direction::Outof);
    }

    #[test]
    fn test_output_path() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2\n  order: ascending");
        let driver = BatchDriver::new(cfg, ShortGenerator);
        let path = driver.output_path(&spec("bm25+fuzzy"));
        assert!(path.ends_with("de.into.bm25+fuzzy.2.ascending.alpaca.txt"));
    }

    #[test]
    fn test_build_prompts() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2");
        let driver = BatchDriver::new(cfg, ShortGenerator);
        let run = driver.prepare(&spec("bm25")).unwrap();
        let set = driver.build_prompts(&run, None).unwrap();

        assert_eq!(set.prompts.len(), 3);
        assert_eq!(
            set.prompts[0],
            "Instruction: Translate the following German text into English.\n\
             German: eins\nEnglish: one\nGerman: zwei\nEnglish: two\nGerman: Hallo\nEnglish:"
        );
        // Item 2 ranks a single candidate and needs one random example.
        assert_eq!(set.backfilled_items, 1);
    }

    #[test]
    fn test_render_prompt_matches_full_run() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2\n  order: random");
        let driver = BatchDriver::new(cfg, ());
        let run = driver.prepare(&spec("bm25")).unwrap();
        let all = driver.build_prompts(&run, None).unwrap();

        for item in 0..3 {
            assert_eq!(driver.render_prompt(&spec("bm25"), item).unwrap(), all.prompts[item]);
        }
        assert!(matches!(
            driver.render_prompt(&spec("bm25"), 3),
            Err(RunnerError::ItemOutOfRange { item: 3, items: 3 })
        ));
    }

    #[test]
    fn test_combined_selection_groups() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [\"bm25+fuzzy\"]\n  shot: 2");
        let driver = BatchDriver::new(cfg, ShortGenerator);
        let prompt = driver.render_prompt(&spec("bm25+fuzzy"), 0).unwrap();
        let sources: Vec<&str> = prompt
            .lines()
            .filter_map(|l| l.strip_prefix("German: "))
            .collect();
        assert_eq!(sources, vec!["eins", "vier", "Hallo"]);
    }

    #[test]
    fn test_run_one_writes_answers() {
        let dir = fixture();
        let cfg = config(
            &dir,
            "  languages: [de]\n  directions: [into]\n  selections: [bm25]\n  shot: 2\n  batch_size: 2",
        );
        let mut driver = BatchDriver::new(cfg, EchoGenerator { calls: Vec::new() });
        let summary = driver.run_one(&spec("bm25")).unwrap();

        assert_eq!(summary.items, 3);
        assert_eq!(driver.generator.calls, vec![2, 1]);

        let written = std::fs::read_to_string(&summary.output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ANSWER[German: Hallo]",
                "ANSWER[German: Tschüss]",
                "ANSWER[German: Danke]"
            ]
        );
    }

    #[test]
    fn test_run_with_cut() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2\n  cut: 2");
        let mut driver = BatchDriver::new(cfg, EchoGenerator { calls: Vec::new() });
        let summary = driver.run_one(&spec("bm25")).unwrap();
        assert_eq!(summary.items, 2);
    }

    #[test]
    fn test_batch_mismatch_aborts() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2\n  batch_size: 3");
        let mut driver = BatchDriver::new(cfg, ShortGenerator);
        let result = driver.run_one(&spec("bm25"));
        assert!(matches!(
            result,
            Err(RunnerError::BatchMismatch {
                batch: 0,
                expected: 3,
                got: 1
            })
        ));
    }

    #[test]
    fn test_missing_index_fails_before_generation() {
        let dir = fixture();
        let cfg = config(&dir, "  languages: [de]\n  selections: [ctq]\n  shot: 2");
        let mut driver = BatchDriver::new(cfg, EchoGenerator { calls: Vec::new() });
        let result = driver.run_one(&spec("ctq"));
        assert!(matches!(result, Err(RunnerError::Index(IndexFileError::NotFound(_)))));
        assert!(driver.generator.calls.is_empty());
    }

    #[test]
    fn test_malformed_index_fails_before_generation() {
        let dir = fixture();
        write(&dir.path().join("data/de/index/test/into/bm25.index"), "0 x\n1\n2\n");
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2");
        let mut driver = BatchDriver::new(cfg, EchoGenerator { calls: Vec::new() });
        let result = driver.run_one(&spec("bm25"));

        match result {
            Err(RunnerError::Index(IndexFileError::InvalidIndex { line, token, .. })) => {
                assert_eq!(line, 1);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(driver.generator.calls.is_empty());
        assert!(!driver.output_path(&spec("bm25")).exists());
    }

    #[test]
    fn test_run_streams_differ_per_combination() {
        use rand::Rng;

        let draw = |s: &RunSpec, seed| {
            let mut rng = s.rng(seed);
            (0..8).map(|_| rng.gen::<u64>()).collect::<Vec<_>>()
        };
        let bm25 = spec("bm25");
        let fuzzy = spec("fuzzy");
        let outof = RunSpec {
            direction: Direction::Outof,
            ..spec("bm25")
        };

        assert_eq!(draw(&bm25, 42), draw(&bm25, 42));
        assert_ne!(draw(&bm25, 42), draw(&fuzzy, 42));
        assert_ne!(draw(&bm25, 42), draw(&outof, 42));
        assert_ne!(draw(&bm25, 42), draw(&bm25, 43));
    }

    #[test]
    fn test_reference_mismatch() {
        let dir = fixture();
        write(&dir.path().join("data/de/test.en"), "Hello\nBye\n");
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2");
        let driver = BatchDriver::new(cfg, ShortGenerator);
        assert!(matches!(
            driver.prepare(&spec("bm25")),
            Err(RunnerError::TestSetMismatch {
                sources: 3,
                references: 2
            })
        ));
    }

    #[test]
    fn test_short_index_file() {
        let dir = fixture();
        write(&dir.path().join("data/de/index/test/into/bm25.index"), "0 1\n");
        let cfg = config(&dir, "  languages: [de]\n  selections: [bm25]\n  shot: 2");
        let driver = BatchDriver::new(cfg, ShortGenerator);
        assert!(matches!(
            driver.prepare(&spec("bm25")),
            Err(RunnerError::Index(IndexFileError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_summary_banner() {
        let summary = RunSummary {
            language: Language::De,
            direction: Direction::Into,
            selection: "bm25".to_string(),
            shot: 4,
            order: OrderPolicy::Ascending,
            template: Template::Alpaca,
            items: 10,
            backfilled_items: 2,
            output: PathBuf::from("out/de.into.bm25.4.ascending.alpaca.txt"),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        let banner = summary.to_string();
        assert!(banner.contains("Language: de"));
        assert!(banner.contains("Order: ascending"));
        assert!(banner.contains("Items: 10 (2 backfilled)"));
    }
}
