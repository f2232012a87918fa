use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::Rng;
use sapper_core::{
    CellCount, Coord, Difficulty, Game, GameConfig, RandomBoardGenerator, RecordStore,
    group_by_difficulty,
};
use std::io;
use std::path::PathBuf;

use crate::play::TerminalHost;
use crate::settings::Settings;
use crate::store::JsonRecordStore;

mod play;
mod render;
mod settings;
mod store;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Settings file, defaults to ./sapper.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Records file, overrides the settings file
    #[arg(long)]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Play in the terminal (the default)
    Play {
        /// Preset level: easy, medium or hard
        #[arg(short, long, conflicts_with = "board")]
        difficulty: Option<Difficulty>,

        /// Custom board as WIDTHxHEIGHTxMINES, e.g. 20x12x40
        #[arg(short, long, value_parser = parse_board)]
        board: Option<GameConfig>,

        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the high-score table
    Records,
}

fn parse_board(s: &str) -> Result<GameConfig, String> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    let [width, height, mines] = parts.as_slice() else {
        return Err("expected WIDTHxHEIGHTxMINES".to_owned());
    };
    let side = |v: &str| {
        v.trim()
            .parse::<Coord>()
            .map_err(|e| format!("bad side {v:?}: {e}"))
    };
    let mines = mines
        .trim()
        .parse::<CellCount>()
        .map_err(|e| format!("bad mine count {mines:?}: {e}"))?;
    GameConfig::new((side(*width)?, side(*height)?), mines).map_err(|e| e.to_string())
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("could not initialize logging")
}

/// Board to start with: explicit custom board, then explicit level, then the settings default.
fn starting_config(
    settings: &Settings,
    difficulty: Option<Difficulty>,
    board: Option<GameConfig>,
) -> anyhow::Result<GameConfig> {
    if let Some(board) = board {
        return settings
            .custom_limits
            .validate(board)
            .context("custom board rejected");
    }
    let difficulty = difficulty.unwrap_or(settings.difficulty);
    Ok(difficulty.preset().unwrap_or_else(|| {
        log::warn!("Custom is not a startable level, falling back to easy");
        GameConfig::EASY
    }))
}

fn run_game(
    settings: &Settings,
    store: &mut JsonRecordStore,
    difficulty: Option<Difficulty>,
    board: Option<GameConfig>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let config = starting_config(settings, difficulty, board)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("seed: {}", seed);

    let game = Game::new(config, RandomBoardGenerator::new(seed), Utc::now)?;
    let stdin = io::stdin();
    let mut host = TerminalHost::new(
        game,
        store,
        settings.custom_limits,
        stdin.lock(),
        io::stdout(),
    );
    println!("{}", play::HELP);
    host.run()?;
    log::debug!("Left game in state {:?}", host.game().status());
    Ok(())
}

fn show_records(store: &JsonRecordStore) -> anyhow::Result<()> {
    let ranked = store.ranked()?;
    print!("{}", render::render_records(&group_by_difficulty(&ranked)));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose)?;

    let settings = Settings::load(args.config.as_deref())?;
    let records_path = args.records.unwrap_or_else(|| settings.records_path.clone());
    let mut store = JsonRecordStore::new(records_path);
    log::debug!("Records file: {}", store.path().display());

    match args.command.unwrap_or(Command::Play {
        difficulty: None,
        board: None,
        seed: None,
    }) {
        Command::Play {
            difficulty,
            board,
            seed,
        } => run_game(&settings, &mut store, difficulty, board, seed),
        Command::Records => show_records(&store),
    }
}
