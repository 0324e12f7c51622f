//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::error::{Result, WorktableError};
use crate::record::{Record, RecordStore};
use crate::rules::{RuleEngine, RuleStore};
use crate::session::Session;

use super::detect::{detect_amount_column, detect_classification_column};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Default file name of the rule/settings document, created next to the
/// loaded dataset unless overridden.
const DEFAULT_RULES_FILE: &str = "priority_rules.json";

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Where the rule document lives (None = next to the dataset).
    pub rules_path: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            rules_path: None,
        }
    }
}

/// Parses a tabular file into a ready [`Session`].
pub struct Loader {
    config: LoaderConfig,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a dataset file and assemble the editing session around it.
    ///
    /// Headers are trimmed, missing cells become empty strings, row ids
    /// are assigned 0-based in file order, and the rule engine runs once
    /// so every record starts with a classification.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Session> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| WorktableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| WorktableError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        // The dataset id doubles as the stale-request guard: a client
        // holding an id from a previous upload is rejected.
        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let dataset_id = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let store = self.parse_bytes(&contents, delimiter)?;

        let classification_column = detect_classification_column(store.columns());
        let amount_column = detect_amount_column(store.columns());

        let engine = match classification_column {
            Some(column) => RuleEngine::with_classification_column(column),
            None => RuleEngine::new(),
        };

        let rules_path = self.config.rules_path.clone().unwrap_or_else(|| {
            path.parent()
                .unwrap_or(Path::new("."))
                .join(DEFAULT_RULES_FILE)
        });
        let rule_store = RuleStore::new(rules_path);

        let mut session = Session::new(dataset_id, store, engine, rule_store, amount_column);
        session.recompute();
        Ok(session)
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RecordStore> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.is_empty() {
            return Err(WorktableError::EmptyData("no header row".to_string()));
        }

        let mut records = Vec::new();
        for (row_id, result) in reader.records().enumerate() {
            let raw = result?;
            let fields: IndexMap<String, String> = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    // Short rows are padded with empty cells.
                    let value = raw.get(i).unwrap_or("").to_string();
                    (name.clone(), value)
                })
                .collect();
            records.push(Record::new(row_id as u64, fields));
        }

        Ok(RecordStore::new(columns, records))
    }
}

/// Detect the delimiter by scoring consistency across the first lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let sample = String::from_utf8_lossy(&bytes[..bytes.len().min(8192)]);
    let lines: Vec<&str> = sample.lines().take(10).filter(|l| !l.is_empty()).collect();

    if lines.is_empty() {
        return Err(WorktableError::EmptyData("file has no content".to_string()));
    }

    let mut best: Option<(u8, usize)> = None;
    for &delimiter in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| l.bytes().filter(|&b| b == delimiter).count())
            .collect();
        let first = counts[0];
        if first == 0 || counts.iter().any(|&c| c != first) {
            continue;
        }
        if best.is_none_or(|(_, n)| first > n) {
            best = Some((delimiter, first));
        }
    }

    best.map(|(d, _)| d).ok_or_else(|| {
        WorktableError::InvalidDelimiter("could not detect a consistent delimiter".to_string())
    })
}
