//! The batch run: load, split, train, evaluate.

use std::path::PathBuf;

use tracing::info;

use crate::bayes::{CategoryPolicy, NaiveBayesClassifier};
use crate::corpus::{self, Document, Preprocess};
use crate::error::{Error, Result};
use crate::evaluate::Evaluation;
use crate::split::{self, DEFAULT_TRAIN_FRACTION};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub corpus: PathBuf,
    pub train_fraction: f64,
    pub seed: Option<u64>,
    pub category_policy: CategoryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            corpus: PathBuf::from("corpus.csv"),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: None,
            category_policy: CategoryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "train fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

/// A trained model and the split it was trained on.
#[derive(Debug)]
pub struct Trained {
    pub classifier: NaiveBayesClassifier,
    pub training: Vec<Document>,
    pub test: Vec<Document>,
}

impl Trained {
    pub fn evaluate(&self) -> Result<Evaluation> {
        Evaluation::run(&self.classifier, &self.test)
    }

    /// Predicts the category of free text using `preprocess`.
    pub fn predict(&self, text: &str, preprocess: &dyn Preprocess) -> Result<&str> {
        self.classifier.classify(&preprocess.preprocess(text))
    }
}

/// Splits `documents` and trains on the training part.
///
/// Known categories come from the whole corpus, so a category the shuffle
/// kept out of training is handled by the configured [`CategoryPolicy`].
pub fn train(documents: Vec<Document>, config: &PipelineConfig) -> Result<Trained> {
    config.validate()?;
    if documents.is_empty() {
        return Err(Error::EmptyCorpus("no documents to train on".to_string()));
    }

    let categories = corpus::categories(&documents);
    info!("corpus categories: {}", categories.join(", "));

    let split = split::split(documents, config.train_fraction, config.seed);
    let classifier =
        NaiveBayesClassifier::train(&split.training, &categories, config.category_policy)?;

    Ok(Trained {
        classifier,
        training: split.training,
        test: split.test,
    })
}

/// Loads the configured corpus and trains on it.
pub fn load_and_train(config: &PipelineConfig, preprocess: &dyn Preprocess) -> Result<Trained> {
    config.validate()?;
    let documents = corpus::load(&config.corpus, preprocess)?;
    train(documents, config)
}

/// Full run over the configured corpus.
pub fn run(config: &PipelineConfig, preprocess: &dyn Preprocess) -> Result<(Trained, Evaluation)> {
    let trained = load_and_train(config, preprocess)?;
    let evaluation = trained.evaluate()?;
    Ok((trained, evaluation))
}
