//! Configuration for a game.

use crate::session::{DEFAULT_PLAYERS, MAX_PLAYERS, MIN_PLAYERS};

/// Configuration for a game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// RNG seed for prompt selection and number draws.
    pub seed: u64,
    /// Player count the first session starts with (2-9).
    pub player_count: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_count: DEFAULT_PLAYERS,
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting player count (clamped to 2-9).
    pub fn with_player_count(mut self, count: u32) -> Self {
        self.player_count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self
    }
}
