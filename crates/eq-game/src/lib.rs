//! Game flow for Escalated, a pass-the-device ranking party game.
//!
//! Each round shows a prompt with a meaning for both ends of a 1-10 scale.
//! Players take turns receiving a secret number, then discuss and rank each
//! other by the number they think each one holds.
//!
//! [`GameSession`] is the phase state machine. [`Game`] drives a session
//! against a [`PromptStore`](eq_core::PromptStore) and turns text commands
//! into transitions.

pub mod config;
pub mod error;
pub mod game;
pub mod numbers;
pub mod phase;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::Game;
pub use phase::GamePhase;
pub use session::{GameSession, PendingFetch, PromptDraw, PromptRequest};
