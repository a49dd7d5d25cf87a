//! Error types for the game front end.

use eq_core::StoreError;
use thiserror::Error;

use crate::phase::GamePhase;

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced to whoever is driving a game.
///
/// The state machine itself never fails: a transition that does not apply
/// is ignored. These errors exist so a front end can explain why.
#[derive(Debug, Error)]
pub enum GameError {
    /// The action is not available in the current phase.
    #[error("cannot {action} during {phase}")]
    NotNow {
        /// What was attempted.
        action: &'static str,
        /// Phase the session was in.
        phase: GamePhase,
    },

    /// Invalid argument or usage.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Unknown command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Prompt storage failed.
    #[error("{0}")]
    Store(#[from] StoreError),
}
