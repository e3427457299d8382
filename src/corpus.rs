//! Labeled documents and the I/O around them: tokenizing raw text, loading a
//! two-column `category,text` CSV corpus and exporting a cleaned copy.

use std::{collections::BTreeSet, fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A labeled, tokenized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub category: String,
    pub tokens: Vec<String>,
}

impl Document {
    pub fn new(category: impl Into<String>, tokens: Vec<String>) -> Self {
        Document {
            category: category.into(),
            tokens,
        }
    }
}

/// Turns raw text into the token sequence the classifier works on.
pub trait Preprocess {
    fn preprocess(&self, text: &str) -> Vec<String>;
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn",
    "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan",
    "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Lowercases, splits on `\w+`, drops English stop words and anything that is
/// not purely alphabetic.
#[derive(Debug, Clone)]
pub struct StopwordPreprocessor {
    pattern: Regex,
    stop_words: BTreeSet<String>,
}

impl StopwordPreprocessor {
    pub fn new() -> Result<Self> {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn with_stop_words<'a, I>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pattern = Regex::new(r"\w+")
            .map_err(|e| Error::InvalidConfig(format!("invalid token pattern: {e}")))?;

        Ok(StopwordPreprocessor {
            pattern,
            stop_words: stop_words.into_iter().map(str::to_lowercase).collect(),
        })
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Preprocess for StopwordPreprocessor {
    fn preprocess(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        self.pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|word| !self.is_stop_word(word))
            .filter(|word| word.chars().all(char::is_alphabetic))
            .map(str::to_string)
            .collect()
    }
}

/// Sorted, distinct category labels of `documents`.
pub fn categories(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|doc| doc.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Loads a headerless `category,text` CSV file, tokenizing every text cell.
pub fn load<P: AsRef<Path>>(path: P, preprocess: &dyn Preprocess) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let documents = load_from_reader(file, preprocess)?;
    info!(
        "loaded {} documents from '{}'",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

pub fn load_from_reader<R: io::Read>(
    reader: R,
    preprocess: &dyn Preprocess,
) -> Result<Vec<Document>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record.map_err(format_error)?;
        documents.push(document_from_record(&record, preprocess)?);
    }

    if documents.is_empty() {
        return Err(Error::EmptyCorpus("corpus file has no rows".to_string()));
    }

    Ok(documents)
}

fn document_from_record(record: &StringRecord, preprocess: &dyn Preprocess) -> Result<Document> {
    let line = record.position().map_or(0, |pos| pos.line());

    if record.len() != 2 {
        return Err(Error::CorpusFormat {
            line,
            message: format!("expected 2 columns, found {}", record.len()),
        });
    }

    // Both lookups are in range after the length check.
    let category = record.get(0).unwrap_or_default().trim();
    let text = record.get(1).unwrap_or_default();

    if category.is_empty() {
        return Err(Error::CorpusFormat {
            line,
            message: "empty category label".to_string(),
        });
    }

    Ok(Document::new(category, preprocess.preprocess(text)))
}

// I/O failures stay I/O failures; everything else the csv reader reports
// (bad UTF-8, broken quoting) is a problem with the row itself.
fn format_error(err: csv::Error) -> Error {
    if err.is_io_error() {
        return Error::Csv(err);
    }
    let line = err.position().map_or(0, |pos| pos.line());
    Error::CorpusFormat {
        line,
        message: err.to_string(),
    }
}

/// Writes `documents` back out as `category,token token ...` rows.
pub fn write_cleaned<W: io::Write>(documents: &[Document], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    for doc in documents {
        writer.write_record([doc.category.as_str(), doc.tokens.join(" ").as_str()])?;
    }
    writer.flush()?;

    debug!("wrote {} cleaned documents", documents.len());
    Ok(())
}

/// Reads a raw corpus and writes its cleaned form to `output`.
pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    preprocess: &dyn Preprocess,
) -> Result<usize> {
    let documents = load(input, preprocess)?;
    let file = File::create(output)?;
    write_cleaned(&documents, file)?;
    Ok(documents.len())
}
