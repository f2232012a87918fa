use crate::*;
pub use random::*;

mod random;

/// Source of fresh boards for new sessions and restarts.
pub trait BoardGenerator {
    fn generate(&mut self, config: GameConfig) -> Result<Board>;
}

/// Always yields the same layout, whatever config is asked for. Used for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator {
    board: Board,
}

impl FixedBoardGenerator {
    pub fn new(board: Board) -> Self {
        Self { board }
    }
}

impl BoardGenerator for FixedBoardGenerator {
    fn generate(&mut self, config: GameConfig) -> Result<Board> {
        if config != self.board.config() {
            log::warn!(
                "Fixed layout {:?} ignores requested config {:?}",
                self.board.config(),
                config
            );
        }
        Ok(self.board.clone())
    }
}
