//! Prompt store persisted to a JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::prompt::{NewPrompt, Prompt, PromptId};

use super::PromptStore;
use super::table::PromptTable;

/// A prompt store backed by a single JSON file.
///
/// The whole table is loaded on [`open`](Self::open) and rewritten after
/// every mutation. Writes go to a temporary file in the same directory that is
/// then renamed over the store, so a crash never leaves a half-written file.
/// A mutation only takes effect in memory once the file write has succeeded.
#[derive(Debug)]
pub struct JsonPromptStore {
    path: PathBuf,
    table: PromptTable,
}

impl JsonPromptStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let table = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content)?
        } else {
            PromptTable::default()
        };
        debug!(path = %path.display(), prompts = table.len(), "opened prompt store");
        Ok(Self { path, table })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &PromptTable) -> StoreResult<()> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(write_err)?;
                parent
            }
            None => Path::new("."),
        };
        let json = serde_json::to_string_pretty(table)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl PromptStore for JsonPromptStore {
    fn count(&self) -> StoreResult<usize> {
        Ok(self.table.len())
    }

    fn all(&self) -> StoreResult<Vec<Prompt>> {
        Ok(self.table.rows().cloned().collect())
    }

    fn get(&self, id: PromptId) -> StoreResult<Option<Prompt>> {
        Ok(self.table.get(id).cloned())
    }

    fn insert(&mut self, prompt: NewPrompt) -> StoreResult<PromptId> {
        let mut next = self.table.clone();
        let id = next.insert(prompt)?;
        self.persist(&next)?;
        self.table = next;
        Ok(id)
    }

    fn delete(&mut self, id: PromptId) -> StoreResult<bool> {
        let mut next = self.table.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        self.persist(&next)?;
        self.table = next;
        Ok(true)
    }
}
