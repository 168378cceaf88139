use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: BoardConfig) -> Result<MineLayout>;
}

/// A fixed layout generates itself, as long as it matches the requested board.
impl LayoutGenerator for MineLayout {
    fn generate(self, config: BoardConfig) -> Result<MineLayout> {
        if self.config() != config.validate()? {
            return Err(BoardError::InvalidConfiguration);
        }
        Ok(self)
    }
}
