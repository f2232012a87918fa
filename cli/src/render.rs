use chrono::{DateTime, Utc};
use sapper_core::{BoardCell, CellState, Coord2, Difficulty, GameSession, GameStatus, ScoreRecord};
use std::fmt::Write;

/// Date format of the high-score table.
const RECORD_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// How a single cell is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Flag on a safe cell, shown crossed out once the game is over.
    WrongFlag,
    Number(u8),
    Mine,
    /// The mine that ended the game.
    TriggeredMine,
}

impl CellView {
    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Flagged => 'F',
            Self::WrongFlag => 'X',
            Self::Number(0) => '.',
            Self::Number(n) => (b'0' + n) as char,
            Self::Mine => '*',
            Self::TriggeredMine => '@',
        }
    }
}

/// Pure drawing rule from the mine set, the player's marks and the game status.
pub fn cell_view(session: &GameSession, coords: Coord2) -> CellView {
    let Ok(state) = session.cell_state(coords) else {
        return CellView::Hidden;
    };
    let board_cell = session.board()[coords];
    let game_over = session.is_terminal();

    match (state, board_cell) {
        (CellState::Flagged, BoardCell::Clear(_)) if game_over => CellView::WrongFlag,
        (CellState::Flagged, _) => CellView::Flagged,
        (CellState::Revealed, BoardCell::Clear(count)) => CellView::Number(count),
        (_, BoardCell::Mine) if session.triggered_mine() == Some(coords) => CellView::TriggeredMine,
        (_, BoardCell::Mine) if game_over => CellView::Mine,
        _ => CellView::Hidden,
    }
}

/// Text grid with column and row indices, followed by the status line.
pub fn render_board(session: &GameSession, now: DateTime<Utc>) -> String {
    let (width, height) = session.size();
    let mut out = String::new();

    out.push_str("    ");
    for x in 0..width {
        let _ = write!(out, "{:>3}", x);
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{:>3} ", y);
        for x in 0..width {
            let _ = write!(out, "{:>3}", cell_view(session, (x, y)).glyph());
        }
        out.push('\n');
    }

    out.push_str(&status_line(session, now));
    out.push('\n');
    out
}

pub fn status_line(session: &GameSession, now: DateTime<Utc>) -> String {
    let state = match session.status() {
        GameStatus::Playing => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    };
    format!(
        "Time: {}s  Mines left: {}  [{}]",
        session.elapsed_secs(now),
        session.mines_left(),
        state
    )
}

/// High-score table, one section per difficulty.
pub fn render_records(sections: &[(Difficulty, Vec<&ScoreRecord>)]) -> String {
    let mut out = String::new();
    for (difficulty, records) in sections {
        let _ = writeln!(out, "{}:", difficulty);
        let _ = writeln!(out, "{}", "-".repeat(difficulty.label().len() + 1));
        for record in records {
            let _ = writeln!(
                out,
                "  {} - {} s - {}",
                record.player_name,
                record.elapsed_secs,
                record.timestamp.format(RECORD_DATE_FORMAT)
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::{Board, group_by_difficulty, rank};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::new(Board::from_mine_coords(size, mines).unwrap(), at(0))
    }

    #[test]
    fn mines_stay_hidden_while_playing() {
        let mut game = session((3, 3), &[(0, 0)]);
        game.toggle_flag((2, 2)).unwrap();
        game.reveal((1, 1), at(1)).unwrap();

        assert_eq!(cell_view(&game, (0, 0)), CellView::Hidden);
        assert_eq!(cell_view(&game, (2, 2)), CellView::Flagged);
        assert_eq!(cell_view(&game, (1, 1)), CellView::Number(1));
    }

    #[test]
    fn loss_shows_mines_and_crosses_wrong_flags() {
        let mut game = session((3, 3), &[(0, 0), (2, 0)]);
        game.toggle_flag((2, 0)).unwrap();
        game.toggle_flag((2, 2)).unwrap();
        game.reveal((0, 0), at(3)).unwrap();

        assert_eq!(cell_view(&game, (0, 0)), CellView::TriggeredMine);
        assert_eq!(cell_view(&game, (2, 0)), CellView::Flagged);
        assert_eq!(cell_view(&game, (2, 2)), CellView::WrongFlag);
        assert_eq!(cell_view(&game, (1, 1)), CellView::Hidden);
    }

    #[test]
    fn board_text_has_indices_and_status() {
        let mut game = session((2, 2), &[(1, 1)]);
        game.reveal((0, 0), at(4)).unwrap();

        let text = render_board(&game, at(9));

        assert_eq!(
            text,
            "      0  1\n  0   1  #\n  1   #  #\nTime: 9s  Mines left: 1  [playing]\n"
        );
    }

    #[test]
    fn records_table_lists_sections_in_order() {
        let ranked = rank(vec![
            ScoreRecord::new("Zed", Difficulty::Hard, 300, at(86_400)),
            ScoreRecord::new("Amy", Difficulty::Easy, 41, at(0)),
        ]);

        let text = render_records(&group_by_difficulty(&ranked));

        let easy = text.find("Easy:").unwrap();
        let medium = text.find("Medium:").unwrap();
        let hard = text.find("Hard:").unwrap();
        assert!(easy < medium && medium < hard);
        assert!(text.contains("  Amy - 41 s - 01-01-1970 00:00:00\n"));
        assert!(text.contains("  Zed - 300 s - 02-01-1970 00:00:00\n"));
    }
}
