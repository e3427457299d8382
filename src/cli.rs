use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::bayes::CategoryPolicy;
use crate::corpus::{self, StopwordPreprocessor};
use crate::pipeline::{self, PipelineConfig};
use crate::split::DEFAULT_TRAIN_FRACTION;

#[derive(Parser, Debug)]
#[command(
    name = "sentiment_bayes",
    version,
    about = "Train and evaluate a multinomial Naive Bayes text classifier."
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train on a random split and report accuracy on the held-out part
    Evaluate {
        #[command(flatten)]
        run: RunArgs,

        /// Print the evaluation as JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Also print the predicted category for this text
        #[arg(long)]
        predict: Option<String>,
    },

    /// Train on a random split and print the category predicted for TEXT
    Predict {
        #[command(flatten)]
        run: RunArgs,

        #[arg(long)]
        text: String,
    },

    /// Tokenize a raw corpus and write `category,tokens` rows
    Clean {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Two-column `category,text` CSV file without a header row
    #[arg(long, default_value = "corpus.csv")]
    pub corpus: PathBuf,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of documents used for training
    #[arg(long, default_value_t = DEFAULT_TRAIN_FRACTION)]
    pub train_fraction: f64,

    /// Drop categories with no training documents instead of failing
    #[arg(long)]
    pub exclude_missing_categories: bool,
}

impl From<RunArgs> for PipelineConfig {
    fn from(args: RunArgs) -> Self {
        PipelineConfig {
            corpus: args.corpus,
            train_fraction: args.train_fraction,
            seed: args.seed,
            category_policy: if args.exclude_missing_categories {
                CategoryPolicy::Exclude
            } else {
                CategoryPolicy::Strict
            },
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let preprocessor = StopwordPreprocessor::new()?;

        match self.command {
            Command::Evaluate { run, json, predict } => {
                let config = PipelineConfig::from(run);
                let (trained, evaluation) = pipeline::run(&config, &preprocessor)
                    .with_context(|| format!("evaluation of '{}' failed", config.corpus.display()))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&evaluation)?);
                } else {
                    println!("{evaluation}");
                }

                if let Some(text) = predict {
                    let category = trained.predict(&text, &preprocessor)?;
                    println!("For prediction request: {category}");
                }
            }
            Command::Predict { run, text } => {
                let config = PipelineConfig::from(run);
                let trained = pipeline::load_and_train(&config, &preprocessor)
                    .with_context(|| format!("training on '{}' failed", config.corpus.display()))?;
                println!("{}", trained.predict(&text, &preprocessor)?);
            }
            Command::Clean { input, output } => {
                let written = corpus::clean_file(&input, &output, &preprocessor).with_context(|| {
                    format!("cleaning '{}' into '{}' failed", input.display(), output.display())
                })?;
                println!("Wrote {written} documents to '{}'", output.display());
            }
        }

        Ok(())
    }
}
