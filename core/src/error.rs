use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Coordinates out of range")]
    OutOfRange,
    #[error("Invalid board configuration, mine count must be below the tile count")]
    InvalidConfiguration,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, BoardError>;
