//! Ephemeral prompt store.

use crate::error::StoreResult;
use crate::prompt::{NewPrompt, Prompt, PromptId};

use super::PromptStore;
use super::table::PromptTable;

/// A prompt store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPromptStore {
    table: PromptTable,
}

impl MemoryPromptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `prompts`, keyed by their ids.
    pub fn with_prompts(prompts: Vec<Prompt>) -> Self {
        Self {
            table: prompts.into(),
        }
    }
}

impl PromptStore for MemoryPromptStore {
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
        self.table.insert(prompt)
    }

    fn delete(&mut self, id: PromptId) -> StoreResult<bool> {
        Ok(self.table.remove(id))
    }
}
