use ndarray::Array2;

/// Single axis value, used for board width, height and positions.
pub type Coord = u8;

/// Count type used for mine counts, cell totals and revealed/flagged tallies.
pub type CellCount = u16;

/// Board coordinates `(x, y)`, or a board size `(width, height)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major linear index to coordinates: `i` maps to `(i mod width, i div width)`.
pub const fn coords_from_index(index: CellCount, width: Coord) -> Coord2 {
    let width = width as CellCount;
    ((index % width) as Coord, (index / width) as Coord)
}

/// `true` when `coords` lies inside a board of the given size.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Shape of an `Array2` as a board size.
pub(crate) fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (x, y) = grid.dim();
    (x as Coord, y as Coord)
}

/// Iterates all cells of a board column by column, matching the `Array2` layout.
pub fn iter_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
    let (x_end, y_end) = size;
    (0..x_end).flat_map(move |x| (0..y_end).map(move |y| (x, y)))
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let next_x = coords.0.checked_add_signed(delta.0)?;
    let next_y = coords.1.checked_add_signed(delta.1)?;
    let next = (next_x, next_y);
    in_bounds(next, bounds).then_some(next)
}

/// The 8-neighborhood of a cell, clipped to the board.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(next) = apply_delta(self.center, delta, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}
