use alloc::collections::VecDeque;
use ndarray::Array2;

use crate::*;

/// Reveals `start` and, when it has no adjacent mines, the whole connected zero region plus
/// its ring of numbered cells.
///
/// Out-of-range, revealed and flagged cells are left untouched, and so are mines: the
/// session never passes one in. Returns how many cells were newly revealed.
pub fn reveal_from(board: &Board, cells: &mut Array2<CellState>, start: Coord2) -> CellCount {
    if !in_bounds(start, board.size()) {
        return 0;
    }

    let mut revealed = 0;
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        if cells[coords.to_nd_index()] != CellState::Hidden {
            continue;
        }
        let BoardCell::Clear(adjacent) = board[coords] else {
            continue;
        };

        cells[coords.to_nd_index()] = CellState::Revealed;
        revealed += 1;

        if adjacent == 0 {
            to_visit.extend(
                board
                    .neighbors(coords)
                    .filter(|&pos| cells[pos.to_nd_index()] == CellState::Hidden),
            );
        }
    }

    if revealed > 1 {
        log::trace!("Flood from {:?} revealed {} cells", start, revealed);
    }
    revealed
}
