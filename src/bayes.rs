use std::collections::{hash_map::Entry, BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::corpus::Document;
use crate::error::{Error, Result};

/// Distinct tokens seen across the training documents.
pub type Vocabulary = HashSet<String>;

/// What to do with a known category that has no training documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPolicy {
    /// Abort with [`Error::DegenerateCategory`].
    #[default]
    Strict,
    /// Drop the category; it is never a classification candidate.
    Exclude,
}

/// Raw (token, category) occurrence counts over the training set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCounts {
    vocabulary: Vocabulary,
    counts: HashMap<String, HashMap<String, usize>>,
}

impl FeatureCounts {
    pub fn build(training: &[Document]) -> Self {
        let mut vocabulary = HashSet::new();
        let mut counts: HashMap<String, HashMap<String, usize>> = HashMap::new();

        for doc in training {
            for token in &doc.tokens {
                if !vocabulary.contains(token) {
                    vocabulary.insert(token.clone());
                }

                let per_category = match counts.entry(token.clone()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(HashMap::new()),
                };
                *per_category.entry(doc.category.clone()).or_insert(0) += 1;
            }
        }

        FeatureCounts { vocabulary, counts }
    }

    /// Number of training occurrences of `token` in `category`.
    ///
    /// Pairs that were never observed, including tokens outside the
    /// vocabulary, count as 0.
    pub fn count(&self, token: &str, category: &str) -> usize {
        self.counts
            .get(token)
            .and_then(|per_category| per_category.get(category))
            .copied()
            .unwrap_or(0)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

/// Class priors: the fraction of training documents in each category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Priors {
    probabilities: BTreeMap<String, f64>,
}

impl Priors {
    /// Computes priors over `categories` together with every category that
    /// occurs in `training`.
    ///
    /// Under [`CategoryPolicy::Strict`] a category without training documents
    /// is an error; under [`CategoryPolicy::Exclude`] it is left out, so every
    /// stored prior is strictly positive.
    pub fn compute(
        training: &[Document],
        categories: &[String],
        policy: CategoryPolicy,
    ) -> Result<Self> {
        if training.is_empty() {
            return Err(Error::EmptyCorpus("training split has no documents".to_string()));
        }

        let mut documents_per_category: BTreeMap<String, usize> =
            categories.iter().map(|c| (c.clone(), 0)).collect();
        for doc in training {
            *documents_per_category.entry(doc.category.clone()).or_insert(0) += 1;
        }

        let total = training.len() as f64;
        let mut probabilities = BTreeMap::new();
        for (category, count) in documents_per_category {
            if count == 0 {
                match policy {
                    CategoryPolicy::Strict => return Err(Error::DegenerateCategory { category }),
                    CategoryPolicy::Exclude => {
                        warn!("category '{category}' has no training documents, excluding it");
                        continue;
                    }
                }
            }
            let prior = count as f64 / total;
            debug!("prior for '{category}' = {prior}");
            probabilities.insert(category, prior);
        }

        Ok(Priors { probabilities })
    }

    /// Prior of `category`; 0 for categories that are not candidates.
    pub fn get(&self, category: &str) -> f64 {
        self.probabilities.get(category).copied().unwrap_or(0.0)
    }

    /// Candidate categories in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.probabilities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities.iter().map(|(c, &p)| (c.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub count: usize,
    pub log_prob: f64,
}

/// Smoothed per-(token, category) log-probabilities for every vocabulary token
/// and every candidate category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    features: HashMap<String, HashMap<String, Feature>>,
}

impl FeatureTable {
    /// Laplace-smoothed estimate of `P(token | category)` in log space:
    ///
    /// `ln(count(w, c) + 1) - ln(total(c) + |V|)`
    ///
    /// Tokens never seen in a category still get an entry.
    pub fn estimate(counts: &FeatureCounts, priors: &Priors) -> Self {
        let vocabulary = counts.vocabulary();
        let vocabulary_size = vocabulary.len();

        let mut features: HashMap<String, HashMap<String, Feature>> = vocabulary
            .iter()
            .map(|token| (token.clone(), HashMap::with_capacity(priors.len())))
            .collect();

        for category in priors.categories() {
            // Get total number of token occurrences for this category:
            let total: usize = vocabulary
                .iter()
                .map(|token| counts.count(token, category))
                .sum();
            let log_denominator = ((total + vocabulary_size) as f64).ln();
            debug!("'{category}': {total} token occurrences, log denominator {log_denominator}");

            for (token, per_category) in features.iter_mut() {
                let count = counts.count(token, category);
                let log_prob = ((count + 1) as f64).ln() - log_denominator;
                per_category.insert(category.to_string(), Feature { count, log_prob });
            }
        }

        FeatureTable { features }
    }

    pub fn get(&self, token: &str, category: &str) -> Option<&Feature> {
        self.features
            .get(token)
            .and_then(|per_category| per_category.get(category))
    }

    pub fn log_prob(&self, token: &str, category: &str) -> Option<f64> {
        self.get(token, category).map(|feature| feature.log_prob)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.features.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Multinomial Naive Bayes over token sequences.
///
/// Tokens outside the training vocabulary carry no evidence: they add the same
/// zero to every category's score, so dropping them never changes a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct NaiveBayesClassifier {
    vocabulary: Vocabulary,
    priors: Priors,
    features: FeatureTable,
}

impl NaiveBayesClassifier {
    /// Trains on `training`, considering `categories` as the known label set.
    pub fn train(
        training: &[Document],
        categories: &[String],
        policy: CategoryPolicy,
    ) -> Result<Self> {
        // Priors first, so degenerate categories abort before any counting:
        let priors = Priors::compute(training, categories, policy)?;

        let counts = FeatureCounts::build(training);
        let features = FeatureTable::estimate(&counts, &priors);
        let FeatureCounts { vocabulary, .. } = counts;

        info!(
            "trained on {} documents: {} categories, vocabulary of {} tokens",
            training.len(),
            priors.len(),
            vocabulary.len()
        );

        Ok(NaiveBayesClassifier {
            vocabulary,
            priors,
            features,
        })
    }

    /// Trains with the label set taken from `training` itself.
    pub fn fit(training: &[Document]) -> Result<Self> {
        Self::train(training, &[], CategoryPolicy::Strict)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn priors(&self) -> &Priors {
        &self.priors
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.priors.categories()
    }

    /// Unnormalized log posterior of `category` for `tokens`.
    pub fn posterior<S: AsRef<str>>(&self, tokens: &[S], category: &str) -> Result<f64> {
        let prior = self.priors.get(category);
        if prior <= 0.0 {
            return Err(Error::DegenerateCategory {
                category: category.to_string(),
            });
        }
        Ok(self.score(&Self::token_counts(tokens), category, prior))
    }

    /// Log posterior of every candidate category, in sorted category order.
    pub fn posteriors<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<(&str, f64)> {
        let token_counts = Self::token_counts(tokens);
        self.priors
            .iter()
            .map(|(category, prior)| (category, self.score(&token_counts, category, prior)))
            .collect()
    }

    /// Category with the highest posterior.
    ///
    /// Exact ties go to the category that sorts first.
    pub fn classify<S: AsRef<str>>(&self, tokens: &[S]) -> Result<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (category, score) in self.posteriors(tokens) {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((category, score)),
            }
        }

        best.map(|(category, _)| category)
            .ok_or(Error::NoCandidateCategories)
    }

    // BTreeMap keeps the summation order, and so the exact score, stable.
    fn token_counts<S: AsRef<str>>(tokens: &[S]) -> BTreeMap<&str, usize> {
        let mut token_counts = BTreeMap::new();
        for token in tokens {
            *token_counts.entry(token.as_ref()).or_insert(0) += 1;
        }
        token_counts
    }

    fn score(&self, token_counts: &BTreeMap<&str, usize>, category: &str, prior: f64) -> f64 {
        let likelihood: f64 = token_counts
            .iter()
            .filter_map(|(token, &occurrences)| {
                self.features
                    .log_prob(token, category)
                    .map(|log_prob| occurrences as f64 * log_prob)
            })
            .sum();

        prior.ln() + likelihood
    }
}
