use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a board cell holds: a mine, or the number of mines around it. Never both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardCell {
    Mine,
    Clear(u8),
}

impl BoardCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Adjacent mine count, `None` for mines.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Clear(count) => Some(count),
        }
    }
}

impl Default for BoardCell {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// Immutable mine layout with the adjacency counts derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<BoardCell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds the board from a mask of mine positions, computing every adjacency count once.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let size = grid_size(mine_mask);
        let mut cells: Array2<BoardCell> = Array2::default(size.to_nd_index());
        let mut mine_count = 0;

        for coords in iter_coords(size) {
            cells[coords.to_nd_index()] = if mine_mask[coords.to_nd_index()] {
                mine_count += 1;
                BoardCell::Mine
            } else {
                let adjacent = NeighborIter::new(coords, size)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                BoardCell::Clear(adjacent as u8)
            };
        }

        Self { cells, mine_count }
    }

    /// Fixed layout from explicit mine coordinates. Duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        GameConfig::new(size, 0)?;
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let board = Self::from_mine_mask(&mine_mask);
        board.config().validate()?;
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<BoardCell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self[coords].is_mine()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> Option<u8> {
        self.cell(coords).ok().and_then(BoardCell::adjacent_mines)
    }

    /// The mine set, in column-major order.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&coords| self[coords].is_mine())
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }
}

impl Index<Coord2> for Board {
    type Output = BoardCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
