use sapper_core::{
    BoardGenerator, Clock, Coord, Coord2, CustomLimits, Difficulty, Game, GameConfig, GameError,
    RecordStore, RevealOutcome, group_by_difficulty,
};
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::render;

pub const HELP: &str = "\
Commands:
  r X Y          reveal the cell at column X, row Y
  f X Y          toggle a flag on the cell at column X, row Y
  n              new game with the same board
  d LEVEL        new game on easy, medium or hard
  c W H M        new custom game, W x H cells with M mines
  s              show the high-score table
  h              show this help
  q              quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Restart,
    Preset(Difficulty),
    Custom(GameConfig),
    Scores,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("expected {0}")]
    Arguments(&'static str),
    #[error("{0}")]
    Game(#[from] GameError),
}

const PRESET_USAGE: &str = "easy, medium or hard";

fn parse_args<T: FromStr, const N: usize>(
    args: &[&str],
    usage: &'static str,
) -> Result<[T; N], CommandError> {
    if args.len() != N {
        return Err(CommandError::Arguments(usage));
    }
    let parsed: Vec<T> = args
        .iter()
        .map(|arg| arg.parse::<T>().map_err(|_| CommandError::Arguments(usage)))
        .collect::<Result<_, _>>()?;
    parsed
        .try_into()
        .map_err(|_| CommandError::Arguments(usage))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        Ok(match name.as_str() {
            "r" | "reveal" => {
                let [x, y] = parse_args::<Coord, 2>(&args, "two coordinates: X Y")?;
                Command::Reveal((x, y))
            }
            "f" | "flag" => {
                let [x, y] = parse_args::<Coord, 2>(&args, "two coordinates: X Y")?;
                Command::Flag((x, y))
            }
            "n" | "new" => Command::Restart,
            "d" | "difficulty" => match args.as_slice() {
                [label] => match label.parse::<Difficulty>()? {
                    Difficulty::Custom => return Err(CommandError::Arguments(PRESET_USAGE)),
                    difficulty => Command::Preset(difficulty),
                },
                _ => return Err(CommandError::Arguments(PRESET_USAGE)),
            },
            "c" | "custom" => {
                let [w, h, m] = parse_args::<u16, 3>(&args, "width, height and mine count")?;
                let side = |v: u16| {
                    Coord::try_from(v).map_err(|_| CommandError::Arguments("a side of at most 255"))
                };
                Command::Custom(GameConfig::new_unchecked((side(w)?, side(h)?), m))
            }
            "s" | "scores" => Command::Scores,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.clone())),
        })
    }
}

/// Line-driven terminal front end over a [`Game`] and a [`RecordStore`].
pub struct TerminalHost<'a, G, C, S, R, W> {
    game: Game<G, C>,
    store: &'a mut S,
    limits: CustomLimits,
    input: R,
    output: W,
}

impl<'a, G, C, S, R, W> TerminalHost<'a, G, C, S, R, W>
where
    G: BoardGenerator,
    C: Clock,
    S: RecordStore,
    S::Error: std::error::Error + Send + Sync + 'static,
    R: BufRead,
    W: Write,
{
    pub fn new(
        game: Game<G, C>,
        store: &'a mut S,
        limits: CustomLimits,
        input: R,
        output: W,
    ) -> Self {
        Self {
            game,
            store,
            limits,
            input,
            output,
        }
    }

    pub fn game(&self) -> &Game<G, C> {
        &self.game
    }

    /// Runs until `q` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.draw()?;
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    continue;
                }
            };
            log::debug!("command: {:?}", command);
            if !self.apply(command)? {
                break;
            }
        }
        Ok(())
    }

    /// Applies one command, returning `false` when the player quits.
    fn apply(&mut self, command: Command) -> anyhow::Result<bool> {
        let result = match command {
            Command::Reveal(coords) => self.reveal(coords),
            Command::Flag(coords) => self.game.toggle_flag(coords).map(|_| ()).map_err(Into::into),
            Command::Restart => self.game.restart_same().map_err(Into::into),
            Command::Preset(difficulty) => match difficulty.preset() {
                Some(config) => self.game.restart(config).map_err(Into::into),
                None => Ok(()),
            },
            Command::Custom(config) => self
                .limits
                .validate(config)
                .and_then(|config| self.game.restart(config))
                .map_err(Into::into),
            Command::Scores => {
                self.show_scores()?;
                return Ok(true);
            }
            Command::Help => {
                writeln!(self.output, "{}", HELP)?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        match result {
            Ok(()) => self.draw()?,
            Err(err) => match err.downcast_ref::<GameError>() {
                Some(game_err) => writeln!(self.output, "{}", game_err)?,
                None => return Err(err),
            },
        }
        Ok(true)
    }

    fn reveal(&mut self, coords: Coord2) -> anyhow::Result<()> {
        match self.game.reveal(coords)? {
            RevealOutcome::HitMine => {
                self.draw()?;
                writeln!(self.output, "Game over! You hit a mine. Type n for a new game.")?;
            }
            RevealOutcome::Won => {
                self.draw()?;
                self.finish_win()?;
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }
        Ok(())
    }

    fn finish_win(&mut self) -> anyhow::Result<()> {
        let secs = self.game.session().winning_time().unwrap_or_default();
        writeln!(self.output, "Congratulations, you won in {} s!", secs)?;
        write!(self.output, "Enter your name for the high-score table (blank to skip): ")?;
        self.output.flush()?;

        let name = self.read_line()?.unwrap_or_default();
        match self.game.score_record(&name) {
            Some(record) => match self.store.save(record) {
                Ok(()) => writeln!(self.output, "Saved.")?,
                Err(err) => {
                    log::error!("Failed to save score record: {}", err);
                    writeln!(self.output, "could not save: {}", err)?;
                }
            },
            None => writeln!(self.output, "Not saved.")?,
        }
        Ok(())
    }

    fn show_scores(&mut self) -> anyhow::Result<()> {
        match self.store.ranked() {
            Ok(ranked) => {
                let text = render::render_records(&group_by_difficulty(&ranked));
                write!(self.output, "{}", text)?;
            }
            Err(err) => {
                log::error!("Failed to load score records: {}", err);
                writeln!(self.output, "could not load scores: {}", err)?;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let text = render::render_board(self.game.session(), self.game.clock().now());
        write!(self.output, "{}", text)?;
        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}
