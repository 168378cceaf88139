use super::*;

/// Uniform placement by rejection sampling: draw a position, keep it only if it holds no mine yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: BoardConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        // at least one free tile is left, so the draw loop below always terminates
        let config = config.validate()?;

        let side = usize::from(config.size);
        let mut mines: Array2<bool> = Array2::default((side, side));
        let mut mines_placed: CellCount = 0;
        let mut rejected: u32 = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines {
            let coords: Coord2 = (
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
            );
            let tile = &mut mines[coords.to_nd_index()];
            if *tile {
                rejected += 1;
                log::trace!("Mine position {:?} already taken, drawing again", coords);
                continue;
            }
            *tile = true;
            mines_placed += 1;
        }

        let layout = MineLayout::from_mine_mask(mines);
        log::debug!(
            "Placed {} mines on a {}x{} board ({} draws rejected): {:?}",
            layout.mine_count(),
            config.size,
            config.size,
            rejected,
            layout.mine_coords()
        );
        Ok(layout)
    }
}
