//! The in-memory prompt table shared by every store implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::prompt::{NewPrompt, Prompt, PromptId};

/// Prompts keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Prompt>", into = "Vec<Prompt>")]
pub(crate) struct PromptTable {
    rows: BTreeMap<PromptId, Prompt>,
}

impl PromptTable {
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &Prompt> {
        self.rows.values()
    }

    pub(crate) fn get(&self, id: PromptId) -> Option<&Prompt> {
        self.rows.get(&id)
    }

    /// Insert a prompt. An explicit id replaces whatever is stored under it;
    /// otherwise the next id after the current maximum is used.
    pub(crate) fn insert(&mut self, prompt: NewPrompt) -> StoreResult<PromptId> {
        prompt.validate()?;
        let id = match prompt.requested_id() {
            Some(id) => id,
            None => self.next_id()?,
        };
        self.rows.insert(id, prompt.into_prompt(id));
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: PromptId) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn next_id(&self) -> StoreResult<PromptId> {
        let max = self.rows.keys().next_back().map_or(0, |id| id.0);
        max.checked_add(1)
            .map(PromptId)
            .ok_or_else(|| StoreError::InvalidPrompt("prompt ids exhausted".into()))
    }
}

impl From<Vec<Prompt>> for PromptTable {
    fn from(prompts: Vec<Prompt>) -> Self {
        Self {
            rows: prompts.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl From<PromptTable> for Vec<Prompt> {
    fn from(table: PromptTable) -> Self {
        table.rows.into_values().collect()
    }
}
