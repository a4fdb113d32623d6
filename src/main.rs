//! Few-Shot MT CLI
//!
//! Prompt construction and batched generation for few-shot translation

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use fewshot_mt::{
    BatchDriver, CommandGenerator, Direction, Language, Overrides, ParallelCorpus, RunConfig,
    RunSpec,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fewshot-mt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured sweep
    Run {
        /// Run configuration (YAML)
        #[arg(long)]
        config: PathBuf,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Print run summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the prompt for one test item without generating
    Prompt {
        /// Run configuration (YAML)
        #[arg(long)]
        config: PathBuf,

        /// Foreign language code
        #[arg(long)]
        lang: String,

        /// Translation direction (into, outof)
        #[arg(long, default_value = "into")]
        direction: String,

        /// Selection name; `+` combines strategies
        #[arg(long)]
        selection: String,

        /// Zero-based test item
        #[arg(long, default_value = "0")]
        item: usize,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Show example pool statistics
    Inspect {
        /// Source side of the pool
        #[arg(long)]
        source: PathBuf,

        /// Target side of the pool
        #[arg(long)]
        target: PathBuf,
    },
}

#[derive(Args, Default)]
struct OverrideArgs {
    /// Foreign languages (overrides config)
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Directions (overrides config)
    #[arg(long, value_delimiter = ',')]
    directions: Option<Vec<String>>,

    /// Selection names (overrides config)
    #[arg(long, value_delimiter = ',')]
    selections: Option<Vec<String>>,

    /// In-context examples per prompt
    #[arg(long)]
    shot: Option<usize>,

    /// Example order (descending, ascending, random)
    #[arg(long)]
    order: Option<String>,

    /// Prompt template
    #[arg(long)]
    template: Option<String>,

    /// Prompts per generation call
    #[arg(long)]
    batch_size: Option<usize>,

    /// Keep only the first N test items
    #[arg(long)]
    cut: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for answer files
    #[arg(long)]
    output: Option<PathBuf>,
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            languages: args.languages,
            directions: args.directions,
            selections: args.selections,
            shot: args.shot,
            order: args.order,
            template: args.template,
            batch_size: args.batch_size,
            cut: args.cut,
            seed: args.seed,
            output_dir: args.output,
        }
    }
}

fn load_config(path: &Path, overrides: OverrideArgs) -> anyhow::Result<RunConfig> {
    let mut config = RunConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    config.apply_overrides(overrides.into())?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            config,
            overrides,
            json,
        } => {
            let config = load_config(&config, overrides)?;
            let Some(settings) = config.generator.clone() else {
                bail!("Config has no generator section; `run` needs one");
            };

            let generator = CommandGenerator::new(&settings.command, settings.args);
            if !generator.is_available() {
                bail!("Generator command not found: {}", settings.command);
            }

            let mut driver = BatchDriver::new(config, generator);
            tracing::info!(
                runs = driver.combinations().len(),
                generator = %settings.command,
                "Starting sweep"
            );

            let mut summaries = Vec::new();
            for spec in driver.combinations() {
                let summary = driver
                    .run_one(&spec)
                    .with_context(|| format!("Run {} failed", spec.key()))?;
                if !json {
                    println!("{summary}");
                }
                summaries.push(summary);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            }
        }
        Commands::Prompt {
            config,
            lang,
            direction,
            selection,
            item,
            overrides,
        } => {
            let config = load_config(&config, overrides)?;
            let spec = RunSpec {
                language: lang.parse::<Language>()?,
                direction: direction.parse::<Direction>()?,
                selection,
            };
            if spec.language == Language::En {
                bail!("--lang takes the foreign language; English is implied");
            }
            let driver = BatchDriver::new(config, ());
            println!("{}", driver.render_prompt(&spec, item)?);
        }
        Commands::Inspect { source, target } => {
            tracing::info!(
                source = %source.display(),
                target = %target.display(),
                "Loading example pool"
            );

            let pool = ParallelCorpus::load(&source, &target)?;
            let stats = pool.stats();
            println!("Pool Statistics");
            println!("===============");
            println!("Source: {}", source.display());
            println!("Target: {}", target.display());
            println!("Total pairs: {}", stats.total_pairs);
            println!("Eligible pairs: {}", stats.eligible_pairs);
            println!("Mean source tokens: {:.1}", stats.mean_source_tokens);
            println!("Max source tokens: {}", stats.max_source_tokens);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
