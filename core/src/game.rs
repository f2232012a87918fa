use crate::*;

/// Host-facing driver: the active session plus the generator and clock used to run it.
///
/// Restarting replaces the session wholesale; nothing carries over between games.
#[derive(Debug)]
pub struct Game<G, C> {
    generator: G,
    clock: C,
    session: GameSession,
}

impl<G: BoardGenerator, C: Clock> Game<G, C> {
    pub fn new(config: GameConfig, mut generator: G, clock: C) -> Result<Self> {
        let board = generator.generate(config)?;
        let session = GameSession::new(board, clock.now());
        Ok(Self {
            generator,
            clock,
            session,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let now = self.clock.now();
        self.session.reveal(coords, now)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        self.session.toggle_flag(coords)
    }

    /// Discards the current session and starts a fresh one. An invalid config leaves the
    /// current session in place.
    pub fn restart(&mut self, config: GameConfig) -> Result<()> {
        let board = self.generator.generate(config)?;
        self.session = GameSession::new(board, self.clock.now());
        Ok(())
    }

    /// Restarts with the current board size and mine count.
    pub fn restart_same(&mut self) -> Result<()> {
        self.restart(self.session.config())
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.session.elapsed_secs(self.clock.now())
    }

    /// Record of the won game stamped with the current time.
    pub fn score_record(&self, player_name: &str) -> Option<ScoreRecord> {
        self.session.score_record(player_name, self.clock.now())
    }
}
