use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Places `config.mines` mines uniformly without replacement, drawing from `rng`.
///
/// Every subset of `mines` cells out of `width * height` is equally likely. Linear index `i`
/// lands on `(i mod width, i div width)`.
pub fn generate_board<R: rand::Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Board> {
    let config = config.validate()?;
    let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

    for linear in index::sample(rng, config.total_cells().into(), config.mines.into()) {
        let coords = coords_from_index(linear as CellCount, config.width());
        mine_mask[coords.to_nd_index()] = true;
    }

    let board = Board::from_mine_mask(&mine_mask);
    log::debug!(
        "Generated {}x{} board with {} mines",
        config.width(),
        config.height(),
        board.mine_count()
    );
    Ok(board)
}

/// Purely random layouts from an owned RNG. Seeded construction reproduces the same sequence
/// of boards.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator<R = SmallRng> {
    rng: R,
}

impl RandomBoardGenerator<SmallRng> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R: rand::Rng> RandomBoardGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: rand::Rng> BoardGenerator for RandomBoardGenerator<R> {
    fn generate(&mut self, config: GameConfig) -> Result<Board> {
        generate_board(config, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    fn brute_force_count(mines: &BTreeSet<Coord2>, (x, y): Coord2) -> u8 {
        let mut count = 0;
        for dx in -1i16..=1 {
            for dy in -1i16..=1 {
                let pos = (i16::from(x) + dx, i16::from(y) + dy);
                if (dx, dy) != (0, 0)
                    && pos.0 >= 0
                    && pos.1 >= 0
                    && mines.contains(&(pos.0 as Coord, pos.1 as Coord))
                {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn places_exact_number_of_distinct_in_bounds_mines() {
        let mut rng = SmallRng::seed_from_u64(7);
        for (size, mines) in [((9, 9), 10), ((30, 16), 99), ((1, 2), 1), ((40, 40), 1599), ((4, 4), 0)] {
            let config = GameConfig::new(size, mines).unwrap();
            let board = generate_board(config, &mut rng).unwrap();

            let placed: Vec<_> = board.mines().collect();
            let distinct: BTreeSet<_> = placed.iter().copied().collect();
            assert_eq!(board.mine_count(), mines);
            assert_eq!(placed.len(), usize::from(mines));
            assert_eq!(distinct.len(), placed.len());
            assert!(placed.iter().all(|&pos| in_bounds(pos, size)));
        }
    }

    #[test]
    fn adjacency_matches_brute_force_on_random_boards() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for round in 0..50u16 {
            let size = (1 + (round % 13) as Coord, 1 + (round % 7) as Coord);
            let total = mult(size.0, size.1);
            let config = GameConfig::new(size, round % total).unwrap();
            let board = generate_board(config, &mut rng).unwrap();
            let mines: BTreeSet<_> = board.mines().collect();

            for coords in iter_coords(size) {
                match board[coords] {
                    BoardCell::Mine => assert!(mines.contains(&coords)),
                    BoardCell::Clear(count) => {
                        assert_eq!(count, brute_force_count(&mines, coords), "at {coords:?}")
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::MEDIUM;
        let first = RandomBoardGenerator::new(42).generate(config).unwrap();
        let second = RandomBoardGenerator::new(42).generate(config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_configs_are_rejected_before_sampling() {
        let mut generator = RandomBoardGenerator::new(1);
        assert_eq!(
            generator.generate(GameConfig::new_unchecked((3, 3), 9)),
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines))
        );
        assert_eq!(
            generator.generate(GameConfig::new_unchecked((0, 3), 0)),
            Err(GameError::InvalidConfiguration(ConfigIssue::EmptyBoard))
        );
    }

    #[test]
    fn fixed_generator_repeats_its_board() {
        let board = Board::from_mine_coords((3, 3), &[(1, 1)]).unwrap();
        let mut generator = FixedBoardGenerator::new(board.clone());
        assert_eq!(generator.generate(GameConfig::EASY).unwrap(), board);
        assert_eq!(generator.generate(board.config()).unwrap(), board);
    }
}
