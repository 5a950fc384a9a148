#![forbid(unsafe_code)]

//! JSON file backend for [`SelectionStore`].
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "selection": [ { "id": 0, "name": "Featured" }, { "id": 3, "name": "Tech" } ],
//!   "active_id": 3
//! }
//! ```
//!
//! Either field may be absent until it is first saved. A missing file means
//! nothing was persisted. Loading a corrupt or wrong-version file fails, but
//! the next save replaces it with a fresh file.
//!
//! # Atomic Writes
//!
//! Writes use a temp-file-then-rename pattern to prevent corruption on crash.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tilegrid_core::item::{Item, ItemId};

use crate::collaborators::{CollaboratorError, SelectionStore};

/// Current file format version.
const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SelectionFile {
    #[serde(default = "current_version")]
    version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_id: Option<ItemId>,
}

fn current_version() -> u64 {
    FORMAT_VERSION
}

/// Selection store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`. The parent directory must already exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SelectionFile, CollaboratorError> {
        if !self.path.exists() {
            return Ok(SelectionFile {
                version: FORMAT_VERSION,
                ..SelectionFile::default()
            });
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let file: SelectionFile = serde_json::from_str(&contents)
            .map_err(|e| CollaboratorError::Parse(format!("failed to parse selection file: {e}")))?;
        if file.version != FORMAT_VERSION {
            return Err(CollaboratorError::Parse(format!(
                "unsupported selection file version: {} (expected {FORMAT_VERSION})",
                file.version
            )));
        }
        Ok(file)
    }

    fn write(&self, file: &SelectionFile) -> Result<(), CollaboratorError> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| CollaboratorError::Parse(format!("failed to serialize selection: {e}")))?;
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        tracing::trace!(target: "tilegrid.persist", path = %self.path.display(), "selection file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut SelectionFile)) -> Result<(), CollaboratorError> {
        let mut file = match self.read() {
            Ok(file) => file,
            Err(CollaboratorError::Parse(reason)) => {
                tracing::warn!(
                    target: "tilegrid.persist",
                    path = %self.path.display(),
                    %reason,
                    "selection file unreadable, starting a fresh one"
                );
                SelectionFile::default()
            }
            Err(err) => return Err(err),
        };
        apply(&mut file);
        file.version = FORMAT_VERSION;
        self.write(&file)
    }
}

impl SelectionStore for JsonFileStore {
    fn load_selection(&mut self) -> Result<Option<Vec<Item>>, CollaboratorError> {
        Ok(self.read()?.selection)
    }

    fn load_active_id(&mut self) -> Result<Option<ItemId>, CollaboratorError> {
        Ok(self.read()?.active_id)
    }

    fn save_selection(&mut self, items: &[Item]) -> Result<(), CollaboratorError> {
        self.update(|file| file.selection = Some(items.to_vec()))
    }

    fn save_active_id(&mut self, id: ItemId) -> Result<(), CollaboratorError> {
        self.update(|file| file.active_id = Some(id))
    }
}
