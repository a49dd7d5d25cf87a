//! Prompt records and the seed data contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Stable identifier of a stored prompt.
///
/// `0` is reserved for "not yet assigned"; stores hand out ids from 1.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PromptId(pub u32);

impl PromptId {
    /// Whether this id still needs to be assigned by a store.
    pub fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question shown to players, with the meaning of each end of the scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique id, stable once assigned.
    pub id: PromptId,
    /// The question text.
    pub text: String,
    /// What a 1 means.
    pub low_meaning: String,
    /// What a 10 means.
    pub high_meaning: String,
    /// Whether a player wrote this prompt (as opposed to bundled content).
    #[serde(default)]
    pub is_custom: bool,
}

/// An insert request for a prompt store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrompt {
    /// Explicit id to store under, replacing any existing record.
    /// `None` or an unassigned id lets the store pick one.
    pub id: Option<PromptId>,
    /// The question text.
    pub text: String,
    /// What a 1 means.
    pub low_meaning: String,
    /// What a 10 means.
    pub high_meaning: String,
    /// Whether a player wrote this prompt.
    pub is_custom: bool,
}

impl NewPrompt {
    /// A player-authored prompt with a store-assigned id.
    pub fn custom(
        text: impl Into<String>,
        low_meaning: impl Into<String>,
        high_meaning: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            text: text.into(),
            low_meaning: low_meaning.into(),
            high_meaning: high_meaning.into(),
            is_custom: true,
        }
    }

    /// The explicit id requested, if any.
    pub fn requested_id(&self) -> Option<PromptId> {
        self.id.filter(|id| !id.is_unassigned())
    }

    /// Reject prompts with blank text or blank endpoint meanings.
    pub fn validate(&self) -> StoreResult<()> {
        if self.text.trim().is_empty() {
            return Err(StoreError::InvalidPrompt("question text is empty".into()));
        }
        if self.low_meaning.trim().is_empty() || self.high_meaning.trim().is_empty() {
            return Err(StoreError::InvalidPrompt(
                "both scale meanings are required".into(),
            ));
        }
        Ok(())
    }

    /// Turn the request into a stored record under `id`.
    pub fn into_prompt(self, id: PromptId) -> Prompt {
        Prompt {
            id,
            text: self.text.trim().to_string(),
            low_meaning: self.low_meaning.trim().to_string(),
            high_meaning: self.high_meaning.trim().to_string(),
            is_custom: self.is_custom,
        }
    }
}

/// One entry of the bundled seed dataset.
///
/// The endpoint meanings are keyed by the scale values they describe:
/// `{"id": 1, "question": "...", "1": "...", "10": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPrompt {
    /// Id the prompt is stored under.
    pub id: u32,
    /// The question text.
    pub question: String,
    /// What a 1 means.
    #[serde(rename = "1")]
    pub low: String,
    /// What a 10 means.
    #[serde(rename = "10")]
    pub high: String,
}

impl From<SeedPrompt> for NewPrompt {
    fn from(seed: SeedPrompt) -> Self {
        Self {
            id: Some(PromptId(seed.id)),
            text: seed.question,
            low_meaning: seed.low,
            high_meaning: seed.high,
            is_custom: false,
        }
    }
}

/// Parse a seed dataset.
pub fn parse_seed(json: &str) -> StoreResult<Vec<SeedPrompt>> {
    Ok(serde_json::from_str(json)?)
}
