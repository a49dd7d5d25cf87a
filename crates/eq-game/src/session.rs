//! The game phase state machine.
//!
//! `GameSession` holds everything about the game in progress. Every
//! transition is a method that either applies completely and returns `true`,
//! or leaves the session untouched and returns `false`. Nothing here fails.
//!
//! Transitions that need a prompt from storage are split in two. `begin_*`
//! marks the session as loading and returns a [`PromptRequest`] describing
//! what to fetch; `complete_*` takes the result and clears the loading mark.
//! While a fetch is pending, conflicting actions are refused, and a result
//! arriving after the session was reset is ignored.

use std::collections::BTreeSet;

use eq_core::{Prompt, PromptId};
use rand::rngs::StdRng;

use crate::numbers::draw_number;
use crate::phase::GamePhase;

/// Fewest players a game supports.
pub const MIN_PLAYERS: u32 = 2;
/// Most players a game supports.
pub const MAX_PLAYERS: u32 = 9;
/// Player count of a fresh session.
pub const DEFAULT_PLAYERS: u32 = 3;

/// Which storage request a session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFetch {
    /// First prompt of a game.
    Start,
    /// Replacement for a skipped prompt.
    Skip,
    /// First prompt of another round.
    NewRound,
    /// A player-authored prompt being saved.
    Custom,
}

/// What a pending transition needs from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    /// Prompts that should not be picked.
    pub excluding: BTreeSet<PromptId>,
}

/// Outcome of drawing a prompt that has not been used yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptDraw {
    /// A prompt not shown earlier in this session.
    Unused(Prompt),
    /// Every prompt was already used, so any prompt was taken instead.
    /// `None` when the store is empty.
    Repeat(Option<Prompt>),
}

/// State of the game in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    phase: GamePhase,
    player_count: u32,
    active_prompt: Option<Prompt>,
    assigned_numbers: Vec<u32>,
    current_player_index: u32,
    revealed_number: Option<u32>,
    used_prompt_ids: BTreeSet<PromptId>,
    pending: Option<PendingFetch>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            phase: GamePhase::Home,
            player_count: DEFAULT_PLAYERS,
            active_prompt: None,
            assigned_numbers: Vec::new(),
            current_player_index: 0,
            revealed_number: None,
            used_prompt_ids: BTreeSet::new(),
            pending: None,
        }
    }
}

impl GameSession {
    /// A fresh session at `Home` with three players.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh session with `count` players (clamped to 2-9).
    pub fn with_player_count(count: u32) -> Self {
        Self {
            player_count: count.clamp(MIN_PLAYERS, MAX_PLAYERS),
            ..Self::default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of players.
    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    /// The prompt on screen.
    pub fn active_prompt(&self) -> Option<&Prompt> {
        self.active_prompt.as_ref()
    }

    /// Numbers handed out this round, in player order.
    pub fn assigned_numbers(&self) -> &[u32] {
        &self.assigned_numbers
    }

    /// Index of the player receiving a number (equals the number of players
    /// already served).
    pub fn current_player_index(&self) -> u32 {
        self.current_player_index
    }

    /// The number currently shown to the acting player.
    pub fn revealed_number(&self) -> Option<u32> {
        self.revealed_number
    }

    /// Prompts shown so far this session.
    pub fn used_prompt_ids(&self) -> &BTreeSet<PromptId> {
        &self.used_prompt_ids
    }

    /// The storage request in flight, if any.
    pub fn pending(&self) -> Option<PendingFetch> {
        self.pending
    }

    /// Whether a storage request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// 1-based number of the player whose turn it is during assignment.
    pub fn current_player(&self) -> Option<u32> {
        (self.phase == GamePhase::NumberAssignment
            && self.current_player_index < self.player_count)
            .then_some(self.current_player_index + 1)
    }

    /// `(player, secret number)` pairs ordered from lowest to highest number.
    /// Players are numbered from 1 in the order they received their number.
    pub fn ranking(&self) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = (1..)
            .zip(self.assigned_numbers.iter().copied())
            .collect();
        pairs.sort_by_key(|&(_, number)| number);
        pairs
    }

    /// Change the number of players. Only at `Home`, only within 2-9.
    pub fn set_player_count(&mut self, count: u32) -> bool {
        if self.phase != GamePhase::Home || !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return false;
        }
        self.player_count = count;
        true
    }

    /// Ask for the first prompt of a game.
    pub fn begin_start(&mut self) -> Option<PromptRequest> {
        if self.phase != GamePhase::Home || self.is_loading() {
            return None;
        }
        self.pending = Some(PendingFetch::Start);
        Some(PromptRequest::default())
    }

    /// Show the first prompt and start tracking used prompts afresh.
    pub fn complete_start(&mut self, prompt: Option<Prompt>) -> bool {
        if !self.take_pending(PendingFetch::Start) {
            return false;
        }
        self.used_prompt_ids = prompt.iter().map(|p| p.id).collect();
        self.active_prompt = prompt;
        self.phase = GamePhase::PromptShown;
        self.reset_round();
        true
    }

    /// Ask for a prompt to replace the one on screen.
    pub fn begin_skip(&mut self) -> Option<PromptRequest> {
        if self.phase != GamePhase::PromptShown || self.is_loading() {
            return None;
        }
        self.pending = Some(PendingFetch::Skip);
        Some(self.unused_request())
    }

    /// Replace the prompt on screen.
    ///
    /// A repeated prompt is not recorded as used. If the store had nothing
    /// at all, the current prompt stays.
    pub fn complete_skip(&mut self, draw: PromptDraw) -> bool {
        if !self.take_pending(PendingFetch::Skip) {
            return false;
        }
        match draw {
            PromptDraw::Unused(prompt) => {
                self.used_prompt_ids.insert(prompt.id);
                self.active_prompt = Some(prompt);
            }
            PromptDraw::Repeat(Some(prompt)) => self.active_prompt = Some(prompt),
            PromptDraw::Repeat(None) => {}
        }
        true
    }

    /// Mark the session as waiting for a player-authored prompt to be saved.
    pub fn begin_custom_prompt(&mut self) -> bool {
        if self.phase != GamePhase::PromptShown || self.is_loading() {
            return false;
        }
        self.pending = Some(PendingFetch::Custom);
        true
    }

    /// Put `prompt` on screen and record it as used.
    ///
    /// Accepted on the prompt screen when nothing is loading, or as the
    /// completion of [`begin_custom_prompt`](Self::begin_custom_prompt).
    pub fn use_custom_prompt(&mut self, prompt: Prompt) -> bool {
        if self.phase != GamePhase::PromptShown {
            return false;
        }
        match self.pending {
            None | Some(PendingFetch::Custom) => self.pending = None,
            Some(_) => return false,
        }
        self.used_prompt_ids.insert(prompt.id);
        self.active_prompt = Some(prompt);
        true
    }

    /// Drop the pending request without applying anything.
    pub fn cancel_fetch(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Move from the prompt to handing out numbers.
    pub fn start_number_assignment(&mut self) -> bool {
        if self.phase != GamePhase::PromptShown
            || self.is_loading()
            || self.active_prompt.is_none()
        {
            return false;
        }
        self.phase = GamePhase::NumberAssignment;
        self.reset_round();
        true
    }

    /// Show the acting player a number nobody else has.
    ///
    /// Does nothing if a number is already showing, so a player cannot
    /// re-roll.
    pub fn reveal_number(&mut self, rng: &mut StdRng) -> bool {
        if self.current_player().is_none() || self.revealed_number.is_some() {
            return false;
        }
        match draw_number(&self.assigned_numbers, rng) {
            Some(number) => {
                self.revealed_number = Some(number);
                true
            }
            None => false,
        }
    }

    /// Lock in the revealed number and hand over to the next player. After
    /// the last player, move to `Discussion`.
    pub fn confirm_number(&mut self) -> bool {
        if self.phase != GamePhase::NumberAssignment {
            return false;
        }
        let Some(number) = self.revealed_number.take() else {
            return false;
        };
        self.assigned_numbers.push(number);
        self.current_player_index += 1;
        if self.current_player_index >= self.player_count {
            self.phase = GamePhase::Discussion;
        }
        true
    }

    /// Move from discussion to ranking.
    pub fn proceed_to_ranking(&mut self) -> bool {
        if self.phase != GamePhase::Discussion {
            return false;
        }
        self.phase = GamePhase::Ranking;
        true
    }

    /// Ask for the prompt of another round with the same players.
    pub fn begin_new_round(&mut self) -> Option<PromptRequest> {
        if self.phase != GamePhase::Ranking || self.is_loading() {
            return None;
        }
        self.pending = Some(PendingFetch::NewRound);
        Some(self.unused_request())
    }

    /// Start another round on the drawn prompt, keeping the player count and
    /// the used prompts. A repeated prompt is not recorded as used.
    pub fn complete_new_round(&mut self, draw: PromptDraw) -> bool {
        if !self.take_pending(PendingFetch::NewRound) {
            return false;
        }
        self.active_prompt = match draw {
            PromptDraw::Unused(prompt) => {
                self.used_prompt_ids.insert(prompt.id);
                Some(prompt)
            }
            PromptDraw::Repeat(prompt) => prompt,
        };
        self.phase = GamePhase::PromptShown;
        self.reset_round();
        true
    }

    /// Abandon the game: back to a fresh session.
    pub fn go_home(&mut self) {
        *self = Self::default();
    }

    fn unused_request(&self) -> PromptRequest {
        PromptRequest {
            excluding: self.used_prompt_ids.clone(),
        }
    }

    fn take_pending(&mut self, expected: PendingFetch) -> bool {
        if self.pending != Some(expected) {
            return false;
        }
        self.pending = None;
        true
    }

    fn reset_round(&mut self) {
        self.assigned_numbers.clear();
        self.current_player_index = 0;
        self.revealed_number = None;
    }
}
