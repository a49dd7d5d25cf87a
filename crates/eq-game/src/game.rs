//! Running a game against a prompt store.
//!
//! `Game` owns the store, the session and the RNG. It answers the session's
//! prompt requests from the store and offers a small text command language
//! for line-based front ends.

use std::collections::BTreeSet;

use eq_core::store::seed_bundled_if_empty;
use eq_core::{NewPrompt, Prompt, PromptId, PromptStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::phase::GamePhase;
use crate::session::{GameSession, PromptDraw, PromptRequest};

/// A game in progress over a prompt store.
pub struct Game<S: PromptStore> {
    store: S,
    session: GameSession,
    rng: StdRng,
}

impl<S: PromptStore> Game<S> {
    /// Create a game at `Home` over `store`.
    pub fn new(store: S, config: GameConfig) -> Self {
        Self {
            store,
            session: GameSession::with_player_count(config.player_count),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// The current session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// The prompt store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the prompt store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Fill the store from the bundled prompts if it is empty.
    pub fn seed_if_empty(&mut self) -> usize {
        seed_bundled_if_empty(&mut self.store)
    }

    /// See [`GameSession::set_player_count`].
    pub fn set_player_count(&mut self, count: u32) -> bool {
        self.session.set_player_count(count)
    }

    /// Leave `Home` with a random prompt on screen.
    pub fn start_game(&mut self) -> bool {
        let Some(request) = self.session.begin_start() else {
            return false;
        };
        let prompt = self.fetch(&request.excluding);
        self.transitioned(|s| s.complete_start(prompt))
    }

    /// Replace the prompt on screen with one not shown yet, if any remain.
    pub fn skip_prompt(&mut self) -> bool {
        let Some(request) = self.session.begin_skip() else {
            return false;
        };
        let draw = self.draw_unused(&request);
        self.transitioned(|s| s.complete_skip(draw))
    }

    /// Save a player-authored prompt and put it on screen.
    pub fn add_custom_prompt(
        &mut self,
        text: &str,
        low_meaning: &str,
        high_meaning: &str,
    ) -> GameResult<Prompt> {
        if !self.session.begin_custom_prompt() {
            return Err(self.not_now("add a prompt"));
        }
        let id = match self.store.add_custom(text, low_meaning, high_meaning) {
            Ok(id) => id,
            Err(e) => {
                self.session.cancel_fetch();
                return Err(e.into());
            }
        };
        let prompt = NewPrompt::custom(text, low_meaning, high_meaning).into_prompt(id);
        self.session.use_custom_prompt(prompt.clone());
        debug!(prompt_id = %id, "custom prompt in play");
        Ok(prompt)
    }

    /// Put a stored prompt on screen.
    pub fn use_prompt(&mut self, id: PromptId) -> GameResult<Prompt> {
        let prompt = self
            .store
            .get(id)?
            .ok_or_else(|| GameError::InvalidChoice(format!("no prompt with id {id}")))?;
        if !self.session.use_custom_prompt(prompt.clone()) {
            return Err(self.not_now("choose a prompt"));
        }
        Ok(prompt)
    }

    /// See [`GameSession::start_number_assignment`].
    pub fn start_number_assignment(&mut self) -> bool {
        self.transitioned(GameSession::start_number_assignment)
    }

    /// See [`GameSession::reveal_number`].
    pub fn reveal_number(&mut self) -> bool {
        self.session.reveal_number(&mut self.rng)
    }

    /// See [`GameSession::confirm_number`].
    pub fn confirm_number(&mut self) -> bool {
        self.transitioned(GameSession::confirm_number)
    }

    /// See [`GameSession::proceed_to_ranking`].
    pub fn proceed_to_ranking(&mut self) -> bool {
        self.transitioned(GameSession::proceed_to_ranking)
    }

    /// Start another round with the same players on a fresh prompt.
    pub fn play_new_game(&mut self) -> bool {
        let Some(request) = self.session.begin_new_round() else {
            return false;
        };
        let draw = self.draw_unused(&request);
        self.transitioned(|s| s.complete_new_round(draw))
    }

    /// Abandon the game and return to a fresh session.
    pub fn go_home(&mut self) {
        self.session.go_home();
        debug!("back to home");
    }

    /// Random prompt outside the request's exclusions, or any prompt when
    /// every one has been used.
    fn draw_unused(&mut self, request: &PromptRequest) -> PromptDraw {
        if let Some(prompt) = self.fetch(&request.excluding) {
            return PromptDraw::Unused(prompt);
        }
        debug!(
            used = request.excluding.len(),
            "no unused prompts left, repeating one"
        );
        PromptDraw::Repeat(self.fetch(&BTreeSet::new()))
    }

    fn fetch(&mut self, excluding: &BTreeSet<PromptId>) -> Option<Prompt> {
        match self.store.random_prompt(excluding, &mut self.rng) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "prompt lookup failed");
                None
            }
        }
    }

    fn transitioned(&mut self, apply: impl FnOnce(&mut GameSession) -> bool) -> bool {
        let from = self.session.phase();
        let applied = apply(&mut self.session);
        if applied && from != self.session.phase() {
            debug!(%from, to = %self.session.phase(), "phase change");
        }
        applied
    }

    fn not_now(&self, action: &'static str) -> GameError {
        GameError::NotNow {
            action,
            phase: self.session.phase(),
        }
    }

    /// Process a line of player input and return the text to show.
    pub fn process(&mut self, input: &str) -> GameResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "players" => self.do_players(rest),
            "start" => self.do_start(),
            "skip" => self.do_skip(),
            "add" => self.do_add(rest),
            "use" => self.do_use(rest),
            "round" | "go" => self.do_round(),
            "reveal" => self.do_reveal(),
            "ok" | "confirm" => self.do_confirm(),
            "rank" => self.do_rank(),
            "answers" => self.do_answers(),
            "again" => self.do_again(),
            "home" => {
                self.go_home();
                Ok(format!(
                    "Back home. Players: {}. Type 'start' to play.",
                    self.session.player_count()
                ))
            }
            "status" => Ok(self.status()),
            "help" => Ok(help_text().to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            _ => Err(GameError::UnknownCommand(cmd)),
        }
    }

    fn do_players(&mut self, rest: &str) -> GameResult<String> {
        let count: u32 = rest
            .parse()
            .map_err(|_| GameError::InvalidChoice("usage: players <2-9>".to_string()))?;
        if self.session.phase() != GamePhase::Home {
            return Err(self.not_now("change the player count"));
        }
        if !self.set_player_count(count) {
            return Err(GameError::InvalidChoice(format!(
                "player count must be between 2 and 9, got {count}"
            )));
        }
        Ok(format!("Players: {count}"))
    }

    fn do_start(&mut self) -> GameResult<String> {
        if !self.start_game() {
            return Err(self.not_now("start a game"));
        }
        Ok(self.prompt_screen())
    }

    fn do_skip(&mut self) -> GameResult<String> {
        if !self.skip_prompt() {
            return Err(self.not_now("skip the prompt"));
        }
        Ok(self.prompt_screen())
    }

    fn do_add(&mut self, rest: &str) -> GameResult<String> {
        let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
        let [text, low, high] = fields.as_slice() else {
            return Err(GameError::InvalidChoice(
                "usage: add <question> | <meaning of 1> | <meaning of 10>".to_string(),
            ));
        };
        let prompt = self.add_custom_prompt(text, low, high)?;
        Ok(format!(
            "Saved prompt #{}.\n\n{}",
            prompt.id,
            self.prompt_screen()
        ))
    }

    fn do_use(&mut self, rest: &str) -> GameResult<String> {
        let id: u32 = rest
            .parse()
            .map_err(|_| GameError::InvalidChoice("usage: use <prompt id>".to_string()))?;
        self.use_prompt(PromptId(id))?;
        Ok(self.prompt_screen())
    }

    fn do_round(&mut self) -> GameResult<String> {
        if !self.start_number_assignment() {
            if self.session.phase() == GamePhase::PromptShown
                && self.session.active_prompt().is_none()
            {
                return Err(GameError::InvalidChoice(
                    "there is no prompt to play; add one first".to_string(),
                ));
            }
            return Err(self.not_now("start the round"));
        }
        Ok(format!(
            "Hand the device to player 1 of {}. Type 'reveal' when only they can see the screen.",
            self.session.player_count()
        ))
    }

    fn do_reveal(&mut self) -> GameResult<String> {
        if !self.reveal_number() {
            if let Some(number) = self.session.revealed_number() {
                return Ok(format!("Your number is still {number}. Type 'ok' once memorised."));
            }
            return Err(self.not_now("reveal a number"));
        }
        let player = self.session.current_player().unwrap_or_default();
        let number = self.session.revealed_number().unwrap_or_default();
        Ok(format!(
            "Player {player} of {}: your number is {number}.\nMemorise it, then type 'ok'.",
            self.session.player_count()
        ))
    }

    fn do_confirm(&mut self) -> GameResult<String> {
        if !self.confirm_number() {
            if self.session.phase() == GamePhase::NumberAssignment {
                return Err(GameError::InvalidChoice(
                    "type 'reveal' to see your number first".to_string(),
                ));
            }
            return Err(self.not_now("confirm a number"));
        }
        match self.session.current_player() {
            Some(next) => Ok(format!(
                "Pass the device to player {next} of {}. Type 'reveal' when ready.",
                self.session.player_count()
            )),
            None => Ok(format!(
                "Everyone has a number. Time to talk!\n\n{}\n\nType 'rank' when the group is ready.",
                self.describe_prompt()
            )),
        }
    }

    fn do_rank(&mut self) -> GameResult<String> {
        if !self.proceed_to_ranking() {
            return Err(self.not_now("rank players"));
        }
        Ok(format!(
            "Line everyone up from lowest to highest.\n\n{}\n\nType 'answers' to check, 'again' for a new round or 'home' to stop.",
            self.describe_prompt()
        ))
    }

    fn do_answers(&self) -> GameResult<String> {
        if self.session.phase() != GamePhase::Ranking {
            return Err(self.not_now("show the answers"));
        }
        let mut out = String::from("From lowest to highest:\n");
        for (player, number) in self.session.ranking() {
            out.push_str(&format!("  Player {player}: {number}\n"));
        }
        Ok(out.trim_end().to_string())
    }

    fn do_again(&mut self) -> GameResult<String> {
        if !self.play_new_game() {
            return Err(self.not_now("start a new round"));
        }
        Ok(self.prompt_screen())
    }

    fn prompt_screen(&self) -> String {
        format!(
            "{}\n\nType 'round' to hand out numbers, 'skip' for another prompt or 'add' to write your own.",
            self.describe_prompt()
        )
    }

    fn describe_prompt(&self) -> String {
        match self.session.active_prompt() {
            Some(p) => format!(
                "{}\n  1 = {}\n  10 = {}",
                p.text, p.low_meaning, p.high_meaning
            ),
            None => "No prompts available.".to_string(),
        }
    }

    /// One-screen summary of the session.
    pub fn status(&self) -> String {
        let s = &self.session;
        let mut out = format!("Phase: {}\nPlayers: {}\n", s.phase(), s.player_count());
        match s.active_prompt() {
            Some(p) => out.push_str(&format!("Prompt: #{} {}\n", p.id, p.text)),
            None => out.push_str("Prompt: none\n"),
        }
        if s.phase() == GamePhase::NumberAssignment {
            out.push_str(&format!(
                "Numbers handed out: {}/{}\n",
                s.assigned_numbers().len(),
                s.player_count()
            ));
        }
        out.push_str(&format!("Prompts used: {}", s.used_prompt_ids().len()));
        out
    }
}

fn help_text() -> &'static str {
    "\
Commands:
  players <2-9>                       Set the number of players (home only)
  start                               Start a game with a random prompt
  skip                                Show a different prompt
  add <question> | <1> | <10>         Write your own prompt and play it
  use <id>                            Play a specific stored prompt
  round                               Start handing out numbers
  reveal                              Show the current player their number
  ok                                  Confirm and pass the device on
  rank                                Move on to ranking
  answers                             Show everyone's numbers
  again                               New round, same players
  home                                Abandon the game
  status                              Show the game state
  help                                Show this help
  quit                                Exit"
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_core::{MemoryPromptStore, StoreError, StoreResult};

    fn seeded_game() -> Game<MemoryPromptStore> {
        let mut game = Game::new(MemoryPromptStore::new(), GameConfig::default());
        assert!(game.seed_if_empty() > 0);
        game
    }

    fn game_with(ids: &[u32]) -> Game<MemoryPromptStore> {
        let mut store = MemoryPromptStore::new();
        for &id in ids {
            let mut p = NewPrompt::custom(format!("Prompt {id}"), "low", "high");
            p.id = Some(PromptId(id));
            store.insert(p).unwrap();
        }
        Game::new(store, GameConfig::default())
    }

    /// A store whose every operation fails.
    struct BrokenStore;

    impl PromptStore for BrokenStore {
        fn count(&self) -> StoreResult<usize> {
            Err(StoreError::InvalidPrompt("broken".into()))
        }
        fn all(&self) -> StoreResult<Vec<Prompt>> {
            Err(StoreError::InvalidPrompt("broken".into()))
        }
        fn get(&self, _id: PromptId) -> StoreResult<Option<Prompt>> {
            Err(StoreError::InvalidPrompt("broken".into()))
        }
        fn insert(&mut self, _prompt: NewPrompt) -> StoreResult<PromptId> {
            Err(StoreError::InvalidPrompt("broken".into()))
        }
        fn delete(&mut self, _id: PromptId) -> StoreResult<bool> {
            Err(StoreError::InvalidPrompt("broken".into()))
        }
    }

    #[test]
    fn start_picks_a_stored_prompt() {
        let mut game = game_with(&[1, 2, 3]);
        assert!(game.start_game());
        let s = game.session();
        assert_eq!(s.phase(), GamePhase::PromptShown);
        let id = s.active_prompt().unwrap().id;
        assert!(s.used_prompt_ids().contains(&id));
        assert!(!s.is_loading());
    }

    #[test]
    fn start_with_empty_store() {
        let mut game = game_with(&[]);
        assert!(game.start_game());
        assert!(game.session().active_prompt().is_none());
        assert!(game.session().used_prompt_ids().is_empty());
    }

    #[test]
    fn skip_walks_through_every_prompt_then_repeats() {
        let mut game = game_with(&[1, 2, 3]);
        game.start_game();
        game.skip_prompt();
        game.skip_prompt();
        let all: BTreeSet<PromptId> = [1, 2, 3].into_iter().map(PromptId).collect();
        assert_eq!(game.session().used_prompt_ids(), &all);

        assert!(game.skip_prompt());
        assert!(game.session().active_prompt().is_some());
        assert_eq!(game.session().used_prompt_ids(), &all);
    }

    #[test]
    fn skip_never_repeats_while_unused_remain() {
        let mut game = game_with(&(1..=10).collect::<Vec<_>>());
        game.start_game();
        let mut shown = vec![game.session().active_prompt().unwrap().id];
        for _ in 0..9 {
            game.skip_prompt();
            let id = game.session().active_prompt().unwrap().id;
            assert!(!shown.contains(&id));
            shown.push(id);
        }
    }

    #[test]
    fn storage_failure_means_no_prompt() {
        let mut game = Game::new(BrokenStore, GameConfig::default());
        assert_eq!(game.seed_if_empty(), 0);
        assert!(game.start_game());
        assert!(game.session().active_prompt().is_none());
        assert!(!game.session().is_loading());
    }

    #[test]
    fn failed_custom_prompt_is_reported_and_unblocks() {
        let mut game = Game::new(BrokenStore, GameConfig::default());
        game.start_game();
        let err = game.add_custom_prompt("Q", "a", "b").unwrap_err();
        assert!(matches!(err, GameError::Store(_)));
        assert!(!game.session().is_loading());
    }

    #[test]
    fn custom_prompt_is_stored_and_shown() {
        let mut game = seeded_game();
        game.start_game();
        let prompt = game
            .add_custom_prompt("How brave is this?", "Coward", "Hero")
            .unwrap();
        assert!(prompt.is_custom);
        assert_eq!(game.session().active_prompt(), Some(&prompt));
        assert!(game.session().used_prompt_ids().contains(&prompt.id));
        assert_eq!(game.store().get(prompt.id).unwrap(), Some(prompt));
    }

    #[test]
    fn custom_prompt_refused_at_home() {
        let mut game = seeded_game();
        let err = game.add_custom_prompt("Q", "a", "b").unwrap_err();
        assert!(matches!(err, GameError::NotNow { .. }));
        assert_eq!(game.store().custom_prompts().unwrap().len(), 0);
    }

    #[test]
    fn invalid_custom_prompt_rejected() {
        let mut game = seeded_game();
        game.start_game();
        let err = game.add_custom_prompt("   ", "a", "b").unwrap_err();
        assert!(matches!(err, GameError::Store(StoreError::InvalidPrompt(_))));
    }

    #[test]
    fn use_prompt_by_id() {
        let mut game = game_with(&[1, 2, 3]);
        game.start_game();
        let p = game.use_prompt(PromptId(2)).unwrap();
        assert_eq!(p.id, PromptId(2));
        assert!(game.use_prompt(PromptId(99)).is_err());
    }

    #[test]
    fn full_game_loop() {
        let mut game = seeded_game();
        assert!(game.set_player_count(4));
        assert!(game.start_game());
        assert!(game.start_number_assignment());
        for _ in 0..4 {
            assert!(game.reveal_number());
            assert!(game.confirm_number());
        }
        assert_eq!(game.session().phase(), GamePhase::Discussion);
        assert!(game.proceed_to_ranking());

        let first = game.session().active_prompt().unwrap().id;
        assert!(game.play_new_game());
        let s = game.session();
        assert_eq!(s.phase(), GamePhase::PromptShown);
        assert_eq!(s.player_count(), 4);
        assert!(s.assigned_numbers().is_empty());
        assert_ne!(s.active_prompt().unwrap().id, first);
        assert_eq!(s.used_prompt_ids().len(), 2);

        game.go_home();
        assert_eq!(game.session(), &GameSession::new());
    }

    #[test]
    fn new_game_fallback_when_all_used() {
        let mut game = game_with(&[1]);
        game.start_game();
        game.start_number_assignment();
        for _ in 0..3 {
            game.reveal_number();
            game.confirm_number();
        }
        game.proceed_to_ranking();
        assert!(game.play_new_game());
        assert_eq!(game.session().active_prompt().unwrap().id, PromptId(1));
        assert_eq!(game.session().used_prompt_ids().len(), 1);
    }

    #[test]
    fn same_seed_same_game() {
        let play = || {
            let mut game = seeded_game();
            game.start_game();
            game.start_number_assignment();
            for _ in 0..3 {
                game.reveal_number();
                game.confirm_number();
            }
            game.session().clone()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn process_full_round() {
        let mut game = seeded_game();
        assert_eq!(game.process("players 2").unwrap(), "Players: 2");
        assert!(game.process("start").unwrap().contains("1 = "));
        assert!(game.process("round").unwrap().contains("player 1 of 2"));
        assert!(game.process("reveal").unwrap().contains("your number is"));
        assert!(game.process("ok").unwrap().contains("player 2 of 2"));
        game.process("reveal").unwrap();
        assert!(game.process("ok").unwrap().contains("Everyone has a number"));
        assert!(game.process("rank").unwrap().contains("lowest to highest"));

        let answers = game.process("answers").unwrap();
        assert!(answers.contains("Player 1"));
        assert!(answers.contains("Player 2"));

        assert!(game.process("again").unwrap().contains("1 = "));
        assert_eq!(game.session().phase(), GamePhase::PromptShown);
    }

    #[test]
    fn process_rejects_out_of_phase_commands() {
        let mut game = seeded_game();
        let err = game.process("reveal").unwrap_err();
        assert_eq!(err.to_string(), "cannot reveal a number during home");

        game.process("start").unwrap();
        assert!(matches!(
            game.process("players 4"),
            Err(GameError::NotNow { .. })
        ));
    }

    #[test]
    fn process_player_count_validation() {
        let mut game = seeded_game();
        assert!(matches!(
            game.process("players 10"),
            Err(GameError::InvalidChoice(_))
        ));
        assert!(matches!(
            game.process("players lots"),
            Err(GameError::InvalidChoice(_))
        ));
        assert_eq!(game.session().player_count(), 3);
    }

    #[test]
    fn process_confirm_before_reveal() {
        let mut game = seeded_game();
        game.process("start").unwrap();
        game.process("round").unwrap();
        let err = game.process("ok").unwrap_err();
        assert!(err.to_string().contains("reveal"));
    }

    #[test]
    fn process_add_prompt() {
        let mut game = seeded_game();
        game.process("start").unwrap();
        let out = game
            .process("add How loud is it? | Silent | Deafening")
            .unwrap();
        assert!(out.contains("How loud is it?"));
        assert!(out.contains("1 = Silent"));
        assert!(out.contains("10 = Deafening"));

        assert!(matches!(
            game.process("add missing pipes"),
            Err(GameError::InvalidChoice(_))
        ));
    }

    #[test]
    fn process_round_without_prompt() {
        let mut game = game_with(&[]);
        game.process("start").unwrap();
        let err = game.process("round").unwrap_err();
        assert!(err.to_string().contains("no prompt"));
    }

    #[test]
    fn process_misc() {
        let mut game = seeded_game();
        assert_eq!(game.process("").unwrap(), "");
        assert!(game.process("help").unwrap().contains("Commands"));
        assert_eq!(game.process("quit").unwrap(), "Goodbye!");
        assert!(matches!(
            game.process("dance"),
            Err(GameError::UnknownCommand(_))
        ));
        assert!(game.process("status").unwrap().contains("Phase: home"));
        game.process("start").unwrap();
        assert!(game.process("HOME").unwrap().contains("Back home"));
        assert_eq!(game.session().phase(), GamePhase::Home);
    }
}
