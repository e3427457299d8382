//! Multinomial Naive Bayes text classification with Laplace smoothing,
//! trained and evaluated on a random train/test split of a labeled corpus.

pub mod bayes;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod pipeline;
pub mod report;
pub mod split;

pub use bayes::{CategoryPolicy, FeatureCounts, FeatureTable, NaiveBayesClassifier, Priors};
pub use corpus::{Document, Preprocess, StopwordPreprocessor};
pub use error::{Error, Result};
pub use evaluate::{ConfidenceInterval, ConfusionMatrix, Evaluation};
pub use pipeline::PipelineConfig;
