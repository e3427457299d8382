//! Held-out evaluation: confusion matrix, accuracy and a Wald interval.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::bayes::NaiveBayesClassifier;
use crate::corpus::Document;
use crate::error::{Error, Result};

/// z-score of a two-sided 95% normal interval.
pub const Z_95: f64 = 1.96;

/// `matrix[true][predicted]` counts; missing cells are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    cells: BTreeMap<String, BTreeMap<String, usize>>,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actual: &str, predicted: &str) {
        *self
            .cells
            .entry(actual.to_string())
            .or_default()
            .entry(predicted.to_string())
            .or_insert(0) += 1;
    }

    pub fn get(&self, actual: &str, predicted: &str) -> usize {
        self.cells
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    /// Number of recorded documents whose true category is `actual`.
    pub fn row_total(&self, actual: &str) -> usize {
        self.cells
            .get(actual)
            .map_or(0, |row| row.values().sum())
    }

    pub fn total(&self) -> usize {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    /// Correct predictions.
    pub fn diagonal(&self) -> usize {
        self.cells
            .iter()
            .map(|(actual, row)| row.get(actual).copied().unwrap_or(0))
            .sum()
    }

    pub fn off_diagonal(&self) -> usize {
        self.total() - self.diagonal()
    }

    /// Every label seen as a true or predicted category, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: BTreeSet<&str> = BTreeSet::new();
        for (actual, row) in &self.cells {
            labels.insert(actual.as_str());
            labels.extend(row.keys().map(String::as_str));
        }
        labels.into_iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    /// Normal-approximation interval `p ± z * sqrt(p (1 - p) / n)`.
    ///
    /// Bounds are not clamped to [0, 1].
    pub fn wald(proportion: f64, n: usize, z: f64) -> Self {
        let half_width = z * (proportion * (1.0 - proportion) / n as f64).sqrt();
        ConfidenceInterval {
            low: proportion - half_width,
            high: proportion + half_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub confusion_matrix: ConfusionMatrix,
    pub test_size: usize,
    pub accuracy: f64,
    pub misclassification_rate: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl Evaluation {
    /// Classifies every document in `test` and tallies the outcome.
    pub fn run(classifier: &NaiveBayesClassifier, test: &[Document]) -> Result<Self> {
        if test.is_empty() {
            return Err(Error::EmptyTestSet);
        }

        let mut confusion_matrix = ConfusionMatrix::new();
        for doc in test {
            let predicted = classifier.classify(&doc.tokens)?;
            confusion_matrix.record(&doc.category, predicted);
        }

        let evaluation = Self::from_matrix(confusion_matrix)?;
        info!(
            "evaluated {} test documents: accuracy {:.4}",
            evaluation.test_size, evaluation.accuracy
        );
        Ok(evaluation)
    }

    /// Derives the statistics from an already filled matrix.
    pub fn from_matrix(confusion_matrix: ConfusionMatrix) -> Result<Self> {
        let test_size = confusion_matrix.total();
        if test_size == 0 {
            return Err(Error::EmptyTestSet);
        }

        let n = test_size as f64;
        let accuracy = confusion_matrix.diagonal() as f64 / n;
        let misclassification_rate = confusion_matrix.off_diagonal() as f64 / n;
        let confidence_interval = ConfidenceInterval::wald(accuracy, test_size, Z_95);

        Ok(Evaluation {
            confusion_matrix,
            test_size,
            accuracy,
            misclassification_rate,
            confidence_interval,
        })
    }
}
