//! Persistence for priority rules and settings - one JSON document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorktableError};
use crate::filter::FilterOp;

use super::rule::Rule;

/// Session-external toggles consulted by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the built-in classification heuristic runs at all.
    #[serde(default = "default_true")]
    pub enable_base_heuristic: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_base_heuristic: true,
        }
    }
}

/// The on-disk document: ordered rules plus settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RuleDocument {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    settings: Settings,
}

/// File-backed store for rules and settings.
///
/// Small, session-external, last-writer-wins: every read loads the file,
/// every write replaces it atomically (temp file + rename). A missing or
/// corrupt file degrades to empty defaults rather than failing.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    /// Create a store backed by the given JSON file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all rules in stored order.
    pub fn load_rules(&self) -> Vec<Rule> {
        self.load_document().rules
    }

    /// Load the settings block.
    pub fn load_settings(&self) -> Settings {
        self.load_document().settings
    }

    /// Merge new settings into the document and persist.
    pub fn save_settings(&self, settings: Settings) -> Result<()> {
        let mut document = self.load_document();
        document.settings = settings;
        self.save_document(&document)
    }

    /// Persist a rule, replacing any existing rule with the same
    /// column/operator/value criterion. The rule goes to the end of the
    /// list, which makes it win ties against older rules.
    pub fn save_rule(&self, rule: Rule) -> Result<()> {
        let mut document = self.load_document();
        document
            .rules
            .retain(|r| !r.same_criterion(&rule.column, &rule.value, rule.op));
        document.rules.push(rule);
        self.save_document(&document)
    }

    /// Delete the rule matching the given criterion. Returns whether a
    /// rule was removed.
    pub fn delete_rule(&self, column: &str, value: &str, op: FilterOp) -> Result<bool> {
        let mut document = self.load_document();
        let before = document.rules.len();
        document
            .rules
            .retain(|r| !r.same_criterion(column, value, op));
        if document.rules.len() == before {
            return Ok(false);
        }
        self.save_document(&document)?;
        Ok(true)
    }

    /// Flip the `active` flag of the rule matching the given criterion.
    /// Returns whether a rule was found.
    pub fn toggle_rule(
        &self,
        column: &str,
        value: &str,
        op: FilterOp,
        active: bool,
    ) -> Result<bool> {
        let mut document = self.load_document();
        let Some(rule) = document
            .rules
            .iter_mut()
            .find(|r| r.same_criterion(column, value, op))
        else {
            return Ok(false);
        };
        rule.active = active;
        self.save_document(&document)?;
        Ok(true)
    }

    fn load_document(&self) -> RuleDocument {
        let Ok(file) = File::open(&self.path) else {
            return RuleDocument::default();
        };
        serde_json::from_reader(BufReader::new(file)).unwrap_or_default()
    }

    fn save_document(&self, document: &RuleDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    WorktableError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        // Write next to the target, then rename over it. Readers never
        // observe a half-written document.
        let tmp_path = self.path.with_extension("json.tmp");
        let file = File::create(&tmp_path).map_err(|e| {
            WorktableError::Persistence(format!(
                "Failed to create file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, document).map_err(|e| {
            WorktableError::Persistence(format!("Failed to serialize rule document: {}", e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            WorktableError::Persistence(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Priority;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RuleStore {
        RuleStore::new(dir.path().join("rules.json"))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_rules().is_empty());
        assert!(store.load_settings().enable_base_heuristic);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load_rules().is_empty());
    }

    #[test]
    fn test_save_rule_replaces_same_criterion() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .save_rule(Rule::new("Status", FilterOp::Equals, "Other", Priority::Low, "old"))
            .unwrap();
        store
            .save_rule(Rule::new("Status", FilterOp::Equals, "Other", Priority::High, "VIP"))
            .unwrap();

        let rules = store.load_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].priority, Priority::High);
        assert_eq!(rules[0].reason, "VIP");
    }

    #[test]
    fn test_delete_and_toggle() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save_rule(Rule::new("Total", FilterOp::Greater, "5000", Priority::High, "big"))
            .unwrap();

        assert!(store.toggle_rule("Total", "5000", FilterOp::Greater, false).unwrap());
        assert!(!store.load_rules()[0].active);

        assert!(store.delete_rule("Total", "5000", FilterOp::Greater).unwrap());
        assert!(!store.delete_rule("Total", "5000", FilterOp::Greater).unwrap());
        assert!(store.load_rules().is_empty());
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save_settings(Settings {
                enable_base_heuristic: false,
            })
            .unwrap();
        assert!(!store.load_settings().enable_base_heuristic);
    }
}
