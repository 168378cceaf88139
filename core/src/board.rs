use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of one tile.
///
/// `Opened` is terminal during play. `RevealedMine` only appears once the whole board is revealed
/// at the end of a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileStatus {
    #[default]
    Hidden,
    Opened,
    Marked,
    RevealedMine,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub is_mine: bool,
    pub status: TileStatus,
    /// Mines among the surrounding 8 tiles, never counting the tile itself.
    pub adjacent_mine_count: u8,
}

impl Tile {
    pub const fn is_hidden(self) -> bool {
        matches!(self.status, TileStatus::Hidden)
    }

    pub const fn is_opened(self) -> bool {
        matches!(self.status, TileStatus::Opened)
    }

    pub const fn is_marked(self) -> bool {
        matches!(self.status, TileStatus::Marked)
    }

    const fn can_open(self) -> bool {
        !self.is_mine && self.is_hidden()
    }
}

/// Square grid of tiles, stored row-major so `(x, y)` sits at offset `y * size + x`.
///
/// Operations update the board in place. Take a `clone()` first when a snapshot of the previous
/// state is needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    mine_count: CellCount,
}

impl Board {
    /// Hidden board over the given mines, with adjacent counts filled in up front.
    pub fn new(layout: &MineLayout) -> Self {
        let side = usize::from(layout.size());
        let tiles = Array2::from_shape_fn((side, side), |(y, x)| {
            let coords = (x as Coord, y as Coord);
            Tile {
                is_mine: layout.contains_mine(coords),
                status: TileStatus::Hidden,
                adjacent_mine_count: layout.adjacent_mine_count(coords),
            }
        });
        Self {
            tiles,
            mine_count: layout.mine_count(),
        }
    }

    pub fn generate(config: BoardConfig, generator: impl LayoutGenerator) -> Result<Self> {
        let layout = generator.generate(config)?;
        Ok(Self::new(&layout))
    }

    /// `size x size` board with `mine_count` mines placed uniformly at random.
    pub fn create(size: Coord, mine_count: CellCount, seed: u64) -> Result<Self> {
        let config = BoardConfig::new(size, mine_count)?;
        Self::generate(config, RandomLayoutGenerator::new(seed))
    }

    pub fn size(&self) -> Coord {
        self.tiles.bounds().0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.tiles.bounds()) {
            Ok(coords)
        } else {
            Err(BoardError::OutOfRange)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(self.tiles[coords.to_nd_index()])
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        Ok(self.tile_at(coords)?.is_mine)
    }

    pub fn is_marked(&self, coords: Coord2) -> Result<bool> {
        Ok(self.tile_at(coords)?.is_marked())
    }

    pub fn is_opened(&self, coords: Coord2) -> Result<bool> {
        Ok(self.tile_at(coords)?.is_opened())
    }

    pub fn count_mines_around(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        let count = self
            .tiles
            .iter_neighbors(coords)
            .filter(|&pos| self.tiles[pos.to_nd_index()].is_mine)
            .count();
        Ok(count as u8)
    }

    pub fn count_opened_tiles(&self) -> CellCount {
        self.count_status(TileStatus::Opened)
    }

    pub fn count_marked_tiles(&self) -> CellCount {
        self.count_status(TileStatus::Marked)
    }

    fn count_status(&self, status: TileStatus) -> CellCount {
        let count = self
            .tiles
            .iter()
            .filter(|tile| tile.status == status)
            .count();
        count.try_into().unwrap_or(CellCount::MAX)
    }

    /// Every tile with its `(x, y)` coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.tiles
            .indexed_iter()
            .map(|((y, x), &tile)| ((x as Coord, y as Coord), tile))
    }

    /// Opens the tile and floods through every orthogonally connected hidden tile that holds no
    /// mine. Marked tiles and mines stop the flood; adjacent mine counts do not.
    ///
    /// Returns how many tiles were opened, zero when the tile is opened, marked or a mine.
    pub fn open_tile(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.validate_coords(coords)?;

        if !self.tiles[coords.to_nd_index()].can_open() {
            return Ok(0);
        }

        let mut visited: Array2<bool> = Array2::default(self.tiles.raw_dim());
        let mut to_visit = VecDeque::from([coords]);
        visited[coords.to_nd_index()] = true;
        let mut opened: CellCount = 0;

        while let Some(visit_coords) = to_visit.pop_front() {
            let tile = &mut self.tiles[visit_coords.to_nd_index()];
            if !tile.can_open() {
                log::trace!("Flood-fill stops at {:?} ({:?})", visit_coords, tile.status);
                continue;
            }

            tile.status = TileStatus::Opened;
            opened += 1;
            log::trace!("Flood opened tile at {:?}", visit_coords);

            for next in self.tiles.iter_orthogonal(visit_coords) {
                let seen = &mut visited[next.to_nd_index()];
                if !*seen {
                    *seen = true;
                    to_visit.push_back(next);
                }
            }
        }

        log::debug!("Opened {} tiles starting at {:?}", opened, coords);
        Ok(opened)
    }

    /// Reveals the whole board: mines become `RevealedMine`, everything else `Opened`.
    pub fn open_all_tiles(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.status = if tile.is_mine {
                TileStatus::RevealedMine
            } else {
                TileStatus::Opened
            };
        }
    }

    pub fn mark_tile(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.set_status(coords, TileStatus::Hidden, TileStatus::Marked)
    }

    pub fn unmark_tile(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.set_status(coords, TileStatus::Marked, TileStatus::Hidden)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        if self.is_marked(coords)? {
            self.unmark_tile(coords)
        } else {
            self.mark_tile(coords)
        }
    }

    fn set_status(&mut self, coords: Coord2, from: TileStatus, to: TileStatus) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];

        Ok(if tile.status == from {
            tile.status = to;
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    fn board(size: Coord, mines: &[Coord2]) -> Board {
        Board::new(&MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn statuses(board: &Board) -> Vec<TileStatus> {
        board.iter().map(|(_, tile)| tile.status).collect()
    }

    #[test]
    fn create_places_requested_mines_on_hidden_board() {
        let board = Board::create(6, 3, 1234).unwrap();

        assert_eq!(board.size(), 6);
        assert_eq!(board.iter().count(), 36);
        assert_eq!(board.iter().filter(|(_, tile)| tile.is_mine).count(), 3);
        assert!(board.iter().all(|(_, tile)| tile.is_hidden()));
    }

    #[test]
    fn create_rejects_invalid_configuration() {
        assert_eq!(Board::create(3, 9, 0), Err(BoardError::InvalidConfiguration));
        assert_eq!(Board::create(0, 0, 0), Err(BoardError::InvalidConfiguration));
    }

    #[test]
    fn flood_from_far_corner_opens_everything_but_the_mine() {
        let mut board = board(3, &[(0, 0)]);

        assert_eq!(board.open_tile((2, 2)), Ok(8));

        assert!(!board.is_opened((0, 0)).unwrap());
        assert_eq!(board.count_opened_tiles(), 8);
        for (coords, tile) in board.iter() {
            assert_eq!(tile.is_opened(), coords != (0, 0));
        }
    }

    #[test]
    fn flood_ignores_adjacent_counts() {
        // (1, 0) touches the mine but the flood still passes through it
        let mut board = board(4, &[(0, 1)]);

        assert_eq!(board.tile_at((1, 0)).unwrap().adjacent_mine_count, 1);
        board.open_tile((3, 3)).unwrap();

        assert!(board.is_opened((0, 0)).unwrap());
        assert_eq!(board.count_opened_tiles(), 15);
    }

    #[test]
    fn flood_does_not_cross_diagonals() {
        // mines wall off the top-left corner, reachable only diagonally from (1, 1)
        let mut board = board(3, &[(1, 0), (0, 1)]);

        board.open_tile((2, 2)).unwrap();

        assert!(board.is_opened((1, 1)).unwrap());
        assert!(!board.is_opened((0, 0)).unwrap());
        assert_eq!(board.count_opened_tiles(), 6);
    }

    #[test]
    fn flood_stops_at_marked_tiles() {
        // a row of marks splits the board in two
        let mut board = board(3, &[]);
        for x in 0..3 {
            board.mark_tile((x, 1)).unwrap();
        }

        assert_eq!(board.open_tile((0, 0)), Ok(3));

        assert!(!board.is_opened((0, 2)).unwrap());
        assert!(board.is_marked((1, 1)).unwrap());
    }

    #[test]
    fn flood_handles_large_open_region() {
        let mut board = board(u8::MAX, &[(0, 0)]);

        let opened = board.open_tile((200, 200)).unwrap();

        assert_eq!(opened, 255 * 255 - 1);
        assert_eq!(board.count_opened_tiles(), opened);
    }

    /// Safe tiles reachable from `start` through up/down/left/right steps over safe tiles.
    fn reachable_safe_tiles(board: &Board, start: Coord2) -> BTreeSet<Coord2> {
        let size = board.size() as i32;
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if nx < 0 || ny < 0 || nx >= size || ny >= size {
                    continue;
                }
                let next = (nx as Coord, ny as Coord);
                if !board.is_mine(next).unwrap() && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn flood_opens_exactly_the_connected_safe_region() {
        for seed in 0..200 {
            let mut board = Board::create(9, 20, seed).unwrap();
            let (start, _) = board
                .iter()
                .find(|(_, tile)| !tile.is_mine)
                .unwrap();
            let expected = reachable_safe_tiles(&board, start);

            let opened = board.open_tile(start).unwrap();

            let actual: BTreeSet<Coord2> = board
                .iter()
                .filter(|(_, tile)| tile.is_opened())
                .map(|(coords, _)| coords)
                .collect();
            assert_eq!(actual, expected, "seed {}", seed);
            assert_eq!(opened as usize, expected.len(), "seed {}", seed);
            assert!(
                board.iter().all(|(_, tile)| !(tile.is_mine && tile.is_opened())),
                "seed {}",
                seed
            );
        }
    }

    #[test]
    fn open_is_noop_on_opened_marked_and_mine_tiles() {
        let mut board = board(3, &[(0, 0)]);
        board.mark_tile((2, 0)).unwrap();
        board.open_tile((2, 2)).unwrap();
        let snapshot = board.clone();

        for coords in [(0, 0), (2, 0), (1, 1)] {
            assert_eq!(board.open_tile(coords), Ok(0));
            assert_eq!(board, snapshot);
        }
    }

    #[test]
    fn opening_and_marking_never_change_mine_counts() {
        let mut board = Board::create(8, 10, 99).unwrap();
        let before: Vec<_> = board
            .iter()
            .map(|(coords, _)| board.count_mines_around(coords).unwrap())
            .collect();

        board.mark_tile((0, 0)).unwrap();
        for (coords, _) in board.clone().iter() {
            board.open_tile(coords).unwrap();
        }

        let after: Vec<_> = board
            .iter()
            .map(|(coords, _)| board.count_mines_around(coords).unwrap())
            .collect();
        assert_eq!(before, after);
        assert!(after.iter().all(|&count| count <= 8));
    }

    #[test]
    fn cached_adjacent_count_matches_live_count() {
        let board = Board::create(7, 12, 5).unwrap();

        for (coords, tile) in board.iter() {
            assert_eq!(board.count_mines_around(coords), Ok(tile.adjacent_mine_count));
        }
    }

    #[test]
    fn count_mines_around_excludes_self() {
        let board = board(3, &[(1, 1), (0, 0), (2, 2)]);

        assert_eq!(board.count_mines_around((1, 1)), Ok(2));
        assert_eq!(board.count_mines_around((1, 0)), Ok(2));
        assert_eq!(board.count_mines_around((2, 0)), Ok(1));
    }

    #[test]
    fn mark_then_unmark_restores_hidden() {
        let mut board = board(3, &[(0, 0)]);
        let original = board.clone();

        assert_eq!(board.mark_tile((1, 2)), Ok(MarkOutcome::Changed));
        assert!(board.is_marked((1, 2)).unwrap());
        assert_eq!(board.unmark_tile((1, 2)), Ok(MarkOutcome::Changed));

        assert_eq!(board, original);
    }

    #[test]
    fn marking_only_applies_to_matching_status() {
        let mut board = board(3, &[(0, 0)]);
        board.open_tile((2, 2)).unwrap();

        assert_eq!(board.mark_tile((2, 2)), Ok(MarkOutcome::NoChange));
        assert_eq!(board.unmark_tile((0, 0)), Ok(MarkOutcome::NoChange));
        assert_eq!(board.toggle_mark((0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(board.toggle_mark((0, 0)), Ok(MarkOutcome::Changed));
        assert!(board.tile_at((0, 0)).unwrap().is_hidden());
        assert!(board.is_opened((2, 2)).unwrap());
    }

    #[test]
    fn open_all_reveals_mines_distinctly() {
        let mut board = board(3, &[(0, 0), (2, 1)]);
        board.mark_tile((0, 0)).unwrap();
        board.mark_tile((1, 1)).unwrap();

        board.open_all_tiles();

        for (coords, tile) in board.iter() {
            let expected = if tile.is_mine {
                TileStatus::RevealedMine
            } else {
                TileStatus::Opened
            };
            assert_eq!(tile.status, expected, "tile at {:?}", coords);
        }
        assert_eq!(board.count_opened_tiles(), 7);
    }

    #[test]
    fn out_of_range_is_rejected_everywhere() {
        let mut board = board(3, &[(0, 0)]);
        let snapshot = board.clone();

        assert_eq!(board.open_tile((3, 0)), Err(BoardError::OutOfRange));
        assert_eq!(board.mark_tile((0, 3)), Err(BoardError::OutOfRange));
        assert_eq!(board.unmark_tile((9, 9)), Err(BoardError::OutOfRange));
        assert_eq!(board.is_mine((3, 3)), Err(BoardError::OutOfRange));
        assert_eq!(board.is_marked((3, 3)), Err(BoardError::OutOfRange));
        assert_eq!(board.is_opened((3, 3)), Err(BoardError::OutOfRange));
        assert_eq!(board.count_mines_around((0, 3)), Err(BoardError::OutOfRange));
        assert_eq!(statuses(&board), statuses(&snapshot));
    }

    #[test]
    fn win_condition_is_reached_by_cascade() {
        let mut board = Board::create(3, 1, 77).unwrap();
        let safe = board
            .iter()
            .find(|(_, tile)| !tile.is_mine)
            .map(|(coords, _)| coords)
            .unwrap();

        board.open_tile(safe).unwrap();

        assert_eq!(board.count_opened_tiles(), 8);
        assert_eq!(board.count_opened_tiles(), board.config().safe_tiles());
    }

    #[test]
    fn board_snapshot_survives_serialization() {
        let mut board = board(4, &[(1, 2)]);
        board.mark_tile((3, 3)).unwrap();
        board.open_tile((0, 0)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
    }
}
