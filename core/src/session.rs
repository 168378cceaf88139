use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from creation to win or loss, owning the current board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    state: SessionState,
    triggered_mine: Option<Coord2>,
}

impl Session {
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        Ok(Self::from_board(Board::generate(
            config,
            RandomLayoutGenerator::new(seed),
        )?))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    /// Replaces the board wholesale, used for a new game and for settings changes.
    pub fn restart(&mut self, config: BoardConfig, seed: u64) -> Result<()> {
        *self = Self::new(config, seed)?;
        log::debug!("Restarted with {:?}", config);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, SessionState::Won)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Mines not yet accounted for by a mark, negative when there are more marks than mines.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.count_marked_tiles() as isize)
    }

    /// Won once every tile that is not a mine has been opened.
    pub fn is_win_condition(&self) -> bool {
        self.board.count_opened_tiles() == self.board.config().safe_tiles()
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_active()?;

        let tile = self.board.tile_at(coords)?;
        if tile.is_opened() {
            return Ok(RevealOutcome::NoChange);
        }

        // a mark is only a reminder, it does not defuse the mine under it
        if tile.is_mine {
            log::debug!("Mine hit at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(SessionState::Lost);
            return Ok(RevealOutcome::HitMine);
        }

        if tile.is_marked() {
            return Ok(RevealOutcome::NoChange);
        }

        let opened = self.board.open_tile(coords)?;
        if self.is_win_condition() {
            self.end_game(SessionState::Won);
            Ok(RevealOutcome::Won)
        } else if opened > 0 {
            Ok(RevealOutcome::Revealed)
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_active()?;
        self.board.toggle_mark(coords)
    }

    fn end_game(&mut self, state: SessionState) {
        if self.state.is_finished() {
            return;
        }
        log::debug!("Game over: {:?}", state);
        self.state = state;
        self.board.open_all_tiles();
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(BoardError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
