use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use colored::Colorize;
use tracing::info;

use eq_game::{Game, GameConfig, GamePhase};

/// Clears the screen and moves the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn run(store_path: &Path, players: u32, seed: Option<u64>) -> Result<(), String> {
    let store = super::open_store(store_path)?;
    let seed = seed.unwrap_or_else(rand::random);
    let config = GameConfig::default()
        .with_seed(seed)
        .with_player_count(players);

    info!(seed, store = %store_path.display(), "starting game");
    let mut game = Game::new(store, config);
    let seeded = game.seed_if_empty();
    if seeded > 0 {
        println!("  Loaded {seeded} bundled prompts");
    }

    println!("  {} Escalated", "Starting".bold());
    println!(
        "  Players: {} | Seed: {seed}",
        game.session().player_count()
    );
    println!("  Type 'start' to begin, 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let clear_between_players = io::stdout().is_terminal();

    loop {
        print!("{}> ", phase_marker(game.session().phase()));
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let was_assigning = game.session().phase() == GamePhase::NumberAssignment;
        match game.process(input) {
            Ok(output) => {
                if clear_between_players && was_assigning && is_confirm(input) {
                    print!("{CLEAR_SCREEN}");
                }
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}

fn is_confirm(input: &str) -> bool {
    input.eq_ignore_ascii_case("ok") || input.eq_ignore_ascii_case("confirm")
}

fn phase_marker(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Home => "home",
        GamePhase::PromptShown => "prompt",
        GamePhase::NumberAssignment => "numbers",
        GamePhase::Discussion => "discuss",
        GamePhase::Ranking => "rank",
    }
}
