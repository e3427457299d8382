use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::info;

use crate::corpus::Document;

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.75;

/// Documents partitioned into disjoint training and test sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub training: Vec<Document>,
    pub test: Vec<Document>,
}

/// Shuffles `documents` with `rng` and cuts them at `floor(n * train_fraction)`.
///
/// Every document lands in exactly one of the two sets.
pub fn split_with<R: Rng + ?Sized>(
    mut documents: Vec<Document>,
    train_fraction: f64,
    rng: &mut R,
) -> Split {
    documents.shuffle(rng);

    let total = documents.len();
    let cut = ((total as f64) * train_fraction).floor() as usize;
    let cut = cut.min(total);

    // split_off leaves [0, cut) behind and returns [cut, total).
    let test = documents.split_off(cut);

    info!(
        "split {} documents into {} training and {} test",
        total,
        documents.len(),
        test.len()
    );

    Split {
        training: documents,
        test,
    }
}

/// Splits with a `StdRng` seeded from `seed`, or the thread RNG when unseeded.
pub fn split(documents: Vec<Document>, train_fraction: f64, seed: Option<u64>) -> Split {
    match seed {
        Some(seed) => split_with(documents, train_fraction, &mut StdRng::seed_from_u64(seed)),
        None => split_with(documents, train_fraction, &mut rand::rng()),
    }
}
