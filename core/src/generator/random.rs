use ndarray::Array2;

use super::*;

/// Generation strategy that draws every cell independently: lit with the
/// configured probability, unlit otherwise. Deterministic for a given seed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: GameConfig) -> LightGrid {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut lights: Array2<bool> = Array2::default(config.size.to_nd_index());

        // One draw per cell in a fixed traversal order, so the same seed and
        // config always reproduce the same board.
        for cell in lights.iter_mut() {
            *cell = rng.random_bool(config.chance_lit);
        }

        let grid = LightGrid::from_light_mask(lights);
        if grid.all_unlit() && config.chance_lit > 0.0 {
            log::warn!("Generated board is already dark, the game starts won");
        }
        grid
    }
}
