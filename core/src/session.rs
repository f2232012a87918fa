use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// One game from board generation to a terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(board: Board, started_at: DateTime<Utc>) -> Self {
        let size = board.size();
        log::debug!("Session started at {:?} on {:?}", started_at, board.config());
        Self {
            board,
            cells: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            status: GameStatus::Playing,
            started_at,
            ended_at: None,
            triggered_mine: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::classify(self.config())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mine counter for the status bar, negative when more flags than mines are placed.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// The mine that ended a lost game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_state(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.cell_state(coords).is_ok_and(CellState::is_revealed)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.cell_state(coords).is_ok_and(CellState::is_flagged)
    }

    pub fn revealed(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells_in_state(CellState::Revealed)
    }

    pub fn flagged(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells_in_state(CellState::Flagged)
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.board.mines()
    }

    /// Seconds on the game timer, frozen once the game has ended.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        elapsed_secs(self.started_at, self.ended_at.unwrap_or(now))
    }

    /// Final time of a won game.
    pub fn winning_time(&self) -> Option<u32> {
        match (self.status, self.ended_at) {
            (GameStatus::Won, Some(ended_at)) => Some(elapsed_secs(self.started_at, ended_at)),
            _ => None,
        }
    }

    pub fn reveal(&mut self, coords: Coord2, now: DateTime<Utc>) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;

        if self.cells[coords.to_nd_index()] != CellState::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if self.board[coords].is_mine() {
            log::debug!("Hit mine at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost, now);
            return Ok(RevealOutcome::HitMine);
        }

        let newly_revealed = reveal_from(&self.board, &mut self.cells, coords);
        self.revealed_count += newly_revealed;
        log::debug!(
            "Revealed {} cells from {:?}, {} of {} safe cells open",
            newly_revealed,
            coords,
            self.revealed_count,
            self.board.safe_cell_count()
        );

        if self.revealed_count == self.board.safe_cell_count() {
            self.end_game(GameStatus::Won, now);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;

        let cell = &mut self.cells[coords.to_nd_index()];
        Ok(match *cell {
            CellState::Hidden => {
                *cell = CellState::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Flagged
            }
            CellState::Flagged => {
                *cell = CellState::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Unflagged
            }
            CellState::Revealed => FlagOutcome::NoChange,
        })
    }

    /// Score record for a won game, `None` unless the game is won and `player_name` is not blank.
    pub fn score_record(&self, player_name: &str, timestamp: DateTime<Utc>) -> Option<ScoreRecord> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return None;
        }
        let elapsed = self.winning_time()?;
        Some(ScoreRecord::new(
            player_name,
            self.difficulty(),
            elapsed,
            timestamp,
        ))
    }

    fn cells_in_state(&self, state: CellState) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(move |&coords| self.cells[coords.to_nd_index()] == state)
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_terminal() {
            Err(GameError::AlreadyTerminal)
        } else {
            Ok(())
        }
    }

    fn end_game(&mut self, status: GameStatus, now: DateTime<Utc>) {
        self.status = status;
        self.ended_at = Some(now);
        log::debug!(
            "Game ended {:?} after {}s",
            status,
            elapsed_secs(self.started_at, now)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::new(Board::from_mine_coords(size, mines).unwrap(), at(1_000))
    }

    #[test]
    fn starts_playing_with_nothing_open() {
        let game = session((5, 5), &[(2, 2)]);

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.revealed().count(), 0);
        assert_eq!(game.flagged().count(), 0);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn hitting_a_mine_loses_and_remembers_it() {
        let mut game = session((3, 3), &[(0, 0), (2, 2)]);
        game.reveal((1, 0), at(1_001)).unwrap();

        let outcome = game.reveal((2, 2), at(1_005)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.triggered_mine(), Some((2, 2)));
        assert_eq!(game.mines().collect::<Vec<_>>(), [(0, 0), (2, 2)]);
        assert_eq!(game.winning_time(), None);
        assert_eq!(game.elapsed_secs(at(2_000)), 5);
    }

    #[test]
    fn flagged_mine_cannot_be_revealed() {
        let mut game = session((3, 3), &[(1, 1)]);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Flagged);

        assert_eq!(game.reveal((1, 1), at(1_001)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.is_flagged((1, 1)));
    }

    #[test]
    fn unflagged_mine_still_loses() {
        let mut game = session((3, 3), &[(1, 1)]);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Unflagged);

        assert_eq!(game.reveal((1, 1), at(1_003)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.triggered_mine(), Some((1, 1)));
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mines = [(0, 0), (3, 2), (1, 3)];
        let mut game = session((4, 4), &mines);
        let mut last = RevealOutcome::NoChange;

        for coords in iter_coords((4, 4)).filter(|pos| !mines.contains(pos)) {
            if game.is_revealed(coords) {
                continue;
            }
            last = game.reveal(coords, at(1_042)).unwrap();
        }

        assert_eq!(last, RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.revealed_count(), 13);
        assert_eq!(game.winning_time(), Some(42));
        assert_eq!(game.elapsed_secs(at(9_999)), 42);
    }

    #[test]
    fn flood_fill_can_win_in_one_move() {
        let mut game = session((3, 3), &[(2, 2)]);

        assert_eq!(game.reveal((0, 0), at(1_000)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.winning_time(), Some(0));
        assert!(!game.is_revealed((2, 2)));
    }

    #[test]
    fn terminal_sessions_reject_actions() {
        let mut game = session((2, 1), &[(0, 0)]);
        game.reveal((0, 0), at(1_001)).unwrap();

        assert_eq!(game.reveal((1, 0), at(1_002)), Err(GameError::AlreadyTerminal));
        assert_eq!(game.toggle_flag((1, 0)), Err(GameError::AlreadyTerminal));
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn out_of_bounds_actions_have_no_effect() {
        let mut game = session((3, 3), &[(1, 1)]);

        assert_eq!(game.reveal((3, 0), at(1_001)), Err(GameError::OutOfBounds));
        assert_eq!(game.toggle_flag((0, 3)), Err(GameError::OutOfBounds));
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.revealed_count(), 0);
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn flags_toggle_but_not_on_revealed_cells() {
        let mut game = session((3, 3), &[(2, 2)]);
        game.reveal((1, 1), at(1_001)).unwrap();

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.toggle_flag((2, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.mines_left(), -1);
        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Unflagged);
        assert_eq!(game.flagged().collect::<Vec<_>>(), [(2, 0)]);
    }

    #[test]
    fn revealing_twice_changes_nothing() {
        let mut game = session((5, 3), &[(2, 0), (2, 1), (2, 2)]);
        game.reveal((0, 1), at(1_001)).unwrap();
        let snapshot = game.clone();

        // the mine column walls the flood in on the left
        assert!(game.is_revealed((1, 1)));
        assert!(!game.is_revealed((3, 1)));
        assert_eq!(game.reveal((0, 1), at(1_002)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.reveal((1, 2), at(1_002)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game, snapshot);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn score_record_only_for_named_wins() {
        let mut game = GameSession::new(
            Board::from_mine_coords((9, 9), &[(0, 0)]).unwrap(),
            at(1_000),
        );
        assert_eq!(game.score_record("Ann", at(1_100)), None);

        assert_eq!(game.reveal((8, 8), at(1_030)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.score_record("   ", at(1_100)), None);

        let record = game.score_record(" Ann ", at(1_100)).unwrap();
        assert_eq!(record.player_name, "Ann");
        assert_eq!(record.difficulty, Difficulty::Custom);
        assert_eq!(record.elapsed_secs, 30);
        assert_eq!(record.timestamp, at(1_100));
    }
}
