//! Prompt model and prompt storage for Escalated.
//!
//! A prompt is a question plus the meanings of the two ends of a 1-10 scale.
//! Prompts live in a [`PromptStore`]; a bundled seed dataset fills an empty
//! store on first run, and players can add their own prompts at any time.

pub mod error;
pub mod prompt;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use prompt::{NewPrompt, Prompt, PromptId, SeedPrompt};
pub use store::{
    JsonPromptStore, MemoryPromptStore, PromptStore, seed_bundled_if_empty, seed_if_empty,
};
