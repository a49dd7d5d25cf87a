//! Game phases.

use std::fmt;

/// One stage of a game.
///
/// Play moves `Home → PromptShown → NumberAssignment → Discussion → Ranking`,
/// then back to `PromptShown` for another round. Any phase can return `Home`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Choosing the number of players.
    #[default]
    Home,
    /// A prompt is on screen; it can be skipped or replaced.
    PromptShown,
    /// Players take turns receiving their secret number.
    NumberAssignment,
    /// Everyone has a number and talks it over.
    Discussion,
    /// The group ranks the players.
    Ranking,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::PromptShown => write!(f, "prompt"),
            Self::NumberAssignment => write!(f, "number assignment"),
            Self::Discussion => write!(f, "discussion"),
            Self::Ranking => write!(f, "ranking"),
        }
    }
}
