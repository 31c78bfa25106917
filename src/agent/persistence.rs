//! Durable serialization for the value table
//!
//! The wire format is the published contract: one UTF-8 JSON object whose
//! keys are canonical state-key text and whose values map decimal action
//! strings (`"0"`..`"8"`) to finite numbers. Independent readers (the report
//! generator among them) parse this file without this crate's code, so the
//! bare mapping itself is version 1 of the format; the load path enforces
//! its shape strictly instead of carrying a version envelope.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::{q_agent::QAgent, q_table::QTable};
use crate::{
    error::{Error, Result},
    types::{BOARD_SIZE, StateKey},
};

/// The value table in wire form: sorted keys, stringified actions.
///
/// `BTreeMap` keeps the document deterministic and diffable across saves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableDocument(BTreeMap<String, BTreeMap<String, f64>>);

impl TableDocument {
    /// Build the wire document from an in-memory table
    pub fn from_table(table: &QTable) -> Self {
        let mut doc = BTreeMap::new();
        for (state, actions) in table.iter() {
            let entry: BTreeMap<String, f64> = actions
                .iter()
                .map(|(&action, &value)| (action.to_string(), value))
                .collect();
            doc.insert(state.as_str().to_string(), entry);
        }
        TableDocument(doc)
    }

    /// Validate the document and rebuild the in-memory table.
    ///
    /// Decoding fails loudly: a malformed state key, a non-decimal or
    /// out-of-range action key, or a non-finite value is an error, never
    /// silently replaced with a default.
    ///
    /// # Errors
    ///
    /// Returns the first decode error encountered.
    pub fn into_table(self) -> Result<QTable> {
        let mut table = QTable::new();
        for (key_text, actions) in self.0 {
            let state = StateKey::parse(&key_text)?;
            table.ensure_state(&state);
            for (action_text, value) in actions {
                let action: usize =
                    action_text.parse().map_err(|_| Error::InvalidActionKey {
                        key: action_text.clone(),
                        max: BOARD_SIZE - 1,
                    })?;
                if action >= BOARD_SIZE {
                    return Err(Error::InvalidActionKey {
                        key: action_text,
                        max: BOARD_SIZE - 1,
                    });
                }
                if !value.is_finite() {
                    return Err(Error::NonFiniteValue {
                        state: key_text.clone(),
                        action,
                        value,
                    });
                }
                table.set(&state, action, value);
            }
        }
        Ok(table)
    }

    /// Number of states in the document
    pub fn states(&self) -> usize {
        self.0.len()
    }

    /// Write the document to `path`, pretty-printed.
    ///
    /// The document is first written to a sibling temp file and then renamed
    /// over the target, so a failed save reports an error and leaves any
    /// previous file untouched rather than half-written.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error; on error the target file keeps
    /// its previous contents.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");

        let file = File::create(&tmp).map_err(|source| Error::Io {
            operation: format!("create temp file {}", tmp.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush temp file {}", tmp.display()),
            source,
        })?;

        std::fs::rename(&tmp, path).map_err(|source| Error::Io {
            operation: format!("rename {} over {}", tmp.display(), path.display()),
            source,
        })
    }

    /// Read a document from `path`.
    ///
    /// A missing file is the normal first-run state and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {}", path.display()),
                    source,
                });
            }
        };

        let reader = BufReader::new(file);
        let doc = serde_json::from_reader(reader)?;
        Ok(Some(doc))
    }
}

impl QAgent {
    /// Persist the learned table to `path` in the wire format.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; a previous file at `path` is
    /// left untouched in that case.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        TableDocument::from_table(self.table()).save_to_file(path)
    }

    /// Construct an agent, restoring a previously saved table when present.
    ///
    /// Three load paths, all of which leave the agent fully usable:
    /// - no file: empty table, ε keeps its configured value (first run);
    /// - valid non-empty file: table restored and ε forced to 0.0; a loaded
    ///   agent is treated as fully trained and acts greedily from then on,
    ///   even if the caller keeps passing `training = true`;
    /// - unreadable or corrupt file: a warning goes to stderr and the agent
    ///   starts over with an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid `config`; load failures degrade
    /// instead of propagating.
    pub fn load_or_fresh<P: AsRef<Path>>(config: super::QAgentConfig, path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut agent = Self::new(config)?;

        let loaded = TableDocument::load_from_file(path).and_then(|doc| match doc {
            Some(doc) => doc.into_table().map(Some),
            None => Ok(None),
        });

        match loaded {
            Ok(Some(table)) => {
                if !table.is_empty() {
                    agent.epsilon = 0.0;
                }
                agent.table = table;
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!(
                    "warning: discarding saved table at {}: {err}",
                    path.display()
                );
            }
        }

        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{agent::QAgentConfig, tictactoe::BoardState};

    fn key(s: &str) -> StateKey {
        BoardState::from_string(s).unwrap().key()
    }

    #[test]
    fn test_document_roundtrip() {
        let mut table = QTable::new();
        table.set(&key("X        "), 4, 0.5);
        table.set(&key("X        "), 1, -0.25);
        table.set(&key("XO       "), 8, 1.0);

        let doc = TableDocument::from_table(&table);
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: TableDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.into_table().unwrap(), table);
    }

    #[test]
    fn test_document_preserves_empty_state_entries() {
        let mut table = QTable::new();
        table.ensure_state(&key("XOXXOOOXX"));

        let doc = TableDocument::from_table(&table);
        let restored = doc.into_table().unwrap();
        assert!(restored.contains_state(&key("XOXXOOOXX")));
        assert_eq!(restored.values_known(), 0);
    }

    #[test]
    fn test_wire_format_shape() {
        let mut table = QTable::new();
        table.set(&key("X        "), 4, 0.5);

        let doc = TableDocument::from_table(&table);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"('X', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')":{"4":0.5}}"#
        );
    }

    #[test]
    fn test_into_table_rejects_bad_state_key() {
        let json = r#"{"not a key": {"0": 1.0}}"#;
        let doc: TableDocument = serde_json::from_str(json).unwrap();
        assert!(doc.into_table().is_err());
    }

    #[test]
    fn test_into_table_rejects_bad_action_key() {
        let json = r#"{"(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')": {"9": 1.0}}"#;
        let doc: TableDocument = serde_json::from_str(json).unwrap();
        let err = doc.into_table().unwrap_err();
        assert!(matches!(err, Error::InvalidActionKey { .. }));

        let json = r#"{"(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')": {"four": 1.0}}"#;
        let doc: TableDocument = serde_json::from_str(json).unwrap();
        assert!(doc.into_table().is_err());
    }

    #[test]
    fn test_save_load_file_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brain.json");

        let mut table = QTable::new();
        table.set(&key("    X    "), 0, 0.125);
        TableDocument::from_table(&table)
            .save_to_file(&path)
            .expect("Failed to save");

        let loaded = TableDocument::load_from_file(&path)
            .expect("Failed to load")
            .expect("File should exist");
        assert_eq!(loaded.into_table().unwrap(), table);
    }

    #[test]
    fn test_load_missing_file_is_normal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = TableDocument::load_from_file(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_save_to_invalid_path_reports_error() {
        let mut table = QTable::new();
        table.set(&key("         "), 0, 1.0);
        let result = TableDocument::from_table(&table)
            .save_to_file(Path::new("/nonexistent_dir_qtac/brain.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_save_leaves_previous_file_intact() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brain.json");

        let mut table = QTable::new();
        table.set(&key("         "), 0, 1.0);
        TableDocument::from_table(&table)
            .save_to_file(&path)
            .unwrap();

        // A save that fails before the rename must not clobber the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir(&tmp).unwrap(); // makes File::create(&tmp) fail
        let result = TableDocument::from_table(&table).save_to_file(&path);
        assert!(result.is_err());

        let loaded = TableDocument::load_from_file(&path).unwrap().unwrap();
        assert_eq!(loaded.into_table().unwrap(), table);
    }

    #[test]
    fn test_loaded_agent_enters_serving_mode() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brain.json");

        let mut table = QTable::new();
        table.set(&key("         "), 4, 0.5);
        TableDocument::from_table(&table)
            .save_to_file(&path)
            .unwrap();

        let agent = QAgent::load_or_fresh(QAgentConfig::default(), &path).unwrap();
        assert_eq!(agent.epsilon(), 0.0);
        assert_eq!(agent.states_known(), 1);
    }

    #[test]
    fn test_missing_file_keeps_configured_epsilon() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let agent = QAgent::load_or_fresh(
            QAgentConfig::default(),
            temp_dir.path().join("absent.json"),
        )
        .unwrap();
        assert_eq!(agent.epsilon(), 1.0);
        assert_eq!(agent.states_known(), 0);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brain.json");
        std::fs::write(&path, "{ not json").unwrap();

        let agent = QAgent::load_or_fresh(QAgentConfig::default(), &path).unwrap();
        assert_eq!(agent.states_known(), 0);
        // Corrupt saves do not flip serving mode on.
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_empty_table_file_keeps_training_mode() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brain.json");
        std::fs::write(&path, "{}").unwrap();

        let agent = QAgent::load_or_fresh(QAgentConfig::default(), &path).unwrap();
        assert_eq!(agent.epsilon(), 1.0);
    }
}
