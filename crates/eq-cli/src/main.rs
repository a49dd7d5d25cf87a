//! Terminal front end for Escalated, the pass-the-device ranking game.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "escalated",
    about = "Escalated: a pass-the-device party game of secret numbers and rankings",
    version,
    propagate_version = true
)]
struct Cli {
    /// Prompt store file
    #[arg(short, long, global = true, default_value = "prompts.json")]
    store: PathBuf,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play on this device, passing it from player to player
    Play {
        /// Number of players (2-9)
        #[arg(short, long, default_value = "3")]
        players: u32,

        /// RNG seed for a reproducible game (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Manage stored prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },

    /// Load the bundled prompts into an empty store
    Seed,
}

#[derive(Subcommand)]
enum PromptsAction {
    /// List stored prompts
    List {
        /// Only show prompts written by players
        #[arg(short, long)]
        custom: bool,
    },

    /// Add a prompt of your own
    Add {
        /// The question
        text: String,

        /// What a 1 means
        #[arg(long)]
        low: String,

        /// What a 10 means
        #[arg(long)]
        high: String,
    },

    /// Delete a prompt by id
    Delete {
        /// Prompt id
        id: u32,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Play { players, seed } => commands::play::run(&cli.store, players, seed),
        Commands::Prompts { action } => match action {
            PromptsAction::List { custom } => commands::prompts::list(&cli.store, custom),
            PromptsAction::Add { text, low, high } => {
                commands::prompts::add(&cli.store, &text, &low, &high)
            }
            PromptsAction::Delete { id } => commands::prompts::delete(&cli.store, id),
        },
        Commands::Seed => commands::seed::run(&cli.store),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
