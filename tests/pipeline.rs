use std::io::Write;

use sentiment_bayes::{
    corpus, pipeline, CategoryPolicy, Error, PipelineConfig, Preprocess, StopwordPreprocessor,
};
use tempfile::NamedTempFile;

const POSITIVE: &[&str] = &[
    "A great movie with wonderful acting",
    "Wonderful story, great cast and a superb ending",
    "I loved this film, truly great",
    "Superb direction and a wonderful score",
    "One of the best films of the year, great fun",
    "Loved the characters, a delightful and great ride",
    "Brilliant, moving and wonderful",
    "Great performances all round, loved it",
];

const NEGATIVE: &[&str] = &[
    "A terrible movie with awful acting",
    "Boring story, bad cast and a dreadful ending",
    "I hated this film, truly awful",
    "Awful direction and a boring score",
    "One of the worst films of the year, bad fun",
    "Hated the characters, a dull and terrible ride",
    "Dreadful, tedious and boring",
    "Bad performances all round, hated it",
];

fn write_corpus() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for (pos, neg) in POSITIVE.iter().zip(NEGATIVE) {
        writeln!(file, "Pos,\"{pos}\"").unwrap();
        writeln!(file, "Neg,\"{neg}\"").unwrap();
    }
    file.flush().unwrap();
    file
}

fn config(file: &NamedTempFile, seed: u64) -> PipelineConfig {
    PipelineConfig {
        corpus: file.path().to_path_buf(),
        seed: Some(seed),
        ..PipelineConfig::default()
    }
}

#[test]
fn split_covers_the_corpus_exactly_once() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();
    let documents = corpus::load(file.path(), &preprocessor).unwrap();

    let trained = pipeline::train(documents.clone(), &config(&file, 5)).unwrap();
    assert_eq!(trained.training.len(), 12);
    assert_eq!(trained.test.len(), 4);

    // Every row is distinct, so a multiset comparison detects loss and overlap.
    let mut seen: Vec<_> = trained
        .training
        .iter()
        .chain(&trained.test)
        .cloned()
        .map(|d| (d.category, d.tokens))
        .collect();
    let mut expected: Vec<_> = documents.into_iter().map(|d| (d.category, d.tokens)).collect();
    seen.sort();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn evaluation_statistics_are_consistent() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();
    let (trained, evaluation) = pipeline::run(&config(&file, 17), &preprocessor).unwrap();

    let matrix = &evaluation.confusion_matrix;
    assert_eq!(matrix.total(), trained.test.len());
    assert_eq!(evaluation.test_size, trained.test.len());
    for category in ["Neg", "Pos"] {
        let expected = trained.test.iter().filter(|d| d.category == category).count();
        assert_eq!(matrix.row_total(category), expected);
    }
    assert!((evaluation.accuracy + evaluation.misclassification_rate - 1.0).abs() < 1e-9);
    assert!(evaluation.confidence_interval.low <= evaluation.accuracy);
    assert!(evaluation.confidence_interval.high >= evaluation.accuracy);

    let sum: f64 = trained.classifier.priors().iter().map(|(_, p)| p).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn fixed_seed_runs_are_identical() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();

    let (a, eval_a) = pipeline::run(&config(&file, 99), &preprocessor).unwrap();
    let (b, eval_b) = pipeline::run(&config(&file, 99), &preprocessor).unwrap();

    assert_eq!(a.classifier.vocabulary(), b.classifier.vocabulary());
    assert_eq!(a.classifier.features(), b.classifier.features());
    assert_eq!(eval_a, eval_b);

    for doc in &a.test {
        assert_eq!(
            a.classifier.classify(&doc.tokens).unwrap(),
            b.classifier.classify(&doc.tokens).unwrap()
        );
    }
}

#[test]
fn free_text_prediction() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();
    let config = PipelineConfig {
        train_fraction: 1.0,
        ..config(&file, 1)
    };
    let trained = pipeline::load_and_train(&config, &preprocessor).unwrap();

    assert_eq!(trained.predict("What a wonderful, great film!", &preprocessor).unwrap(), "Pos");
    assert_eq!(trained.predict("awful and boring", &preprocessor).unwrap(), "Neg");

    let tokens = preprocessor.preprocess("awful and boring spectacularly");
    let known = preprocessor.preprocess("awful and boring");
    assert_eq!(
        trained.classifier.posteriors(&tokens),
        trained.classifier.posteriors(&known)
    );
}

#[test]
fn full_training_fraction_has_no_test_set() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();
    let config = PipelineConfig {
        train_fraction: 1.0,
        ..config(&file, 1)
    };
    assert!(matches!(
        pipeline::run(&config, &preprocessor),
        Err(Error::EmptyTestSet)
    ));
}

#[test]
fn missing_category_policy() {
    let mut file = write_corpus();
    writeln!(file, "Neu,\"an average film\"").unwrap();
    file.flush().unwrap();
    let preprocessor = StopwordPreprocessor::new().unwrap();

    // 17 * 0.1 -> 1 training document, so two categories are never trained.
    let strict = PipelineConfig {
        train_fraction: 0.1,
        ..config(&file, 3)
    };
    assert!(matches!(
        pipeline::run(&strict, &preprocessor),
        Err(Error::DegenerateCategory { .. })
    ));

    let exclude = PipelineConfig {
        category_policy: CategoryPolicy::Exclude,
        ..strict
    };
    let (trained, evaluation) = pipeline::run(&exclude, &preprocessor).unwrap();
    assert_eq!(trained.classifier.categories().count(), 1);
    assert_eq!(evaluation.test_size, 16);
}

#[test]
fn evaluation_serializes_to_json() {
    let file = write_corpus();
    let preprocessor = StopwordPreprocessor::new().unwrap();
    let (_, evaluation) = pipeline::run(&config(&file, 8), &preprocessor).unwrap();

    let value = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(value["test_size"], 4);
    assert!(value["confusion_matrix"].is_object());
    assert!(value["confidence_interval"]["low"].is_number());
}

#[test]
fn malformed_row_is_reported_with_its_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Pos,fine").unwrap();
    writeln!(file, "Neg").unwrap();
    file.flush().unwrap();

    let preprocessor = StopwordPreprocessor::new().unwrap();
    match corpus::load(file.path(), &preprocessor) {
        Err(Error::CorpusFormat { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected CorpusFormat, got {other:?}"),
    }
}

#[test]
fn clean_file_writes_tokenized_rows() {
    let input = write_corpus();
    let output = NamedTempFile::new().unwrap();
    let preprocessor = StopwordPreprocessor::new().unwrap();

    let written = corpus::clean_file(input.path(), output.path(), &preprocessor).unwrap();
    assert_eq!(written, 16);

    let cleaned = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(cleaned.lines().next(), Some("Pos,great movie wonderful acting"));
}
