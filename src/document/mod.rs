//! Persisted project documents.
//!
//! A saved document is the [`CoreState`] plus a schema version. Loading always
//! hands the core a clean state: documents from another schema version (or
//! ones that fail strict parsing) go through [`migrate::sanitize`], and every
//! load ends with [`CoreState::prune_dangling`].

use crate::error::DocumentError;
use crate::model::CoreState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

mod autosave;
pub mod migrate;

pub use autosave::AutosaveSchedule;

/// Schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 6;

/// The serialized form of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(flatten)]
    pub state: CoreState,
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SaveData {
    pub fn new(state: CoreState) -> Self {
        Self {
            state,
            schema_version: SCHEMA_VERSION,
            icon: None,
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A document after loading, with a note of what the loader had to fix.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub data: SaveData,
    /// The document went through sanitize/migrate.
    pub migrated: bool,
    /// Connections and mininodes dropped for referencing missing records.
    pub pruned: usize,
}

/// Parses a project document from JSON.
pub fn load_document(json: &str) -> Result<LoadedDocument, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(DocumentError::NotAnObject);
    }

    let version = value.get("schemaVersion").and_then(serde_json::Value::as_u64);
    let (mut data, migrated) = if version == Some(u64::from(SCHEMA_VERSION)) {
        match serde_json::from_value::<SaveData>(value.clone()) {
            Ok(data) => (data, false),
            Err(e) => {
                tracing::warn!(error = %e, "strict parse failed, sanitizing document");
                (migrate::sanitize(&value), true)
            }
        }
    } else {
        tracing::info!(?version, current = SCHEMA_VERSION, "migrating document");
        (migrate::sanitize(&value), true)
    };

    let pruned = data.state.prune_dangling();
    if pruned > 0 {
        tracing::warn!(pruned, "dropped duplicate or dangling records while loading");
    }
    data.schema_version = SCHEMA_VERSION;
    Ok(LoadedDocument {
        data,
        migrated,
        pruned,
    })
}

/// Reads and parses a project document from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedDocument, DocumentError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_document(&json)
}

/// Destination for document snapshots. Saving is a side effect only: it never
/// feeds back into the editor's state or history.
pub trait ProjectSink {
    fn save(&mut self, data: &SaveData) -> Result<(), DocumentError>;
}

/// Writes each snapshot as pretty-printed JSON to a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectSink for JsonFileSink {
    fn save(&mut self, data: &SaveData) -> Result<(), DocumentError> {
        let json = data.to_json()?;
        fs::write(&self.path, json).map_err(|source| DocumentError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}
