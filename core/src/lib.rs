#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use render::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod render;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    /// Probability in `[0, 1]` that a cell starts lit.
    pub chance_lit: f64,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, chance_lit: f64) -> Self {
        Self { size, chance_lit }
    }

    pub fn new((size_x, size_y): Coord2, chance_lit: f64) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let chance_lit = chance_lit.clamp(0.0, 1.0);
        Self::new_unchecked((size_x, size_y), chance_lit)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 0.5)
    }
}

/// The board itself: a rectangular mask of lit cells plus a cached lit count.
///
/// The grid is never mutated in place; [`LightGrid::toggled`] produces a
/// replacement so that a previously handed-out snapshot stays valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightGrid {
    lights: Array2<bool>,
    lit_count: CellCount,
}

impl LightGrid {
    pub fn from_light_mask(lights: Array2<bool>) -> Self {
        let lit_count = lights
            .iter()
            .filter(|&&is_lit| is_lit)
            .count()
            .try_into()
            .unwrap();
        Self { lights, lit_count }
    }

    pub fn from_lit_coords(size: Coord2, lit_coords: &[Coord2]) -> Result<Self> {
        let mut lights: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in lit_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            lights[coords.to_nd_index()] = true;
        }

        Ok(Self::from_light_mask(lights))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.lights.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.lights.len().try_into().unwrap()
    }

    pub fn lit_count(&self) -> CellCount {
        self.lit_count
    }

    pub fn is_lit(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Win condition: every cell is unlit.
    pub fn all_unlit(&self) -> bool {
        self.lit_count == 0
    }

    /// The in-bounds cells a press at `coords` flips, the pressed cell first.
    pub fn press_targets(&self, coords: Coord2) -> SmallVec<[Coord2; 4]> {
        self.lights.iter_cascade(coords).collect()
    }

    /// Returns a new grid with the press pattern around `coords` inverted.
    /// Out-of-bounds pattern members are skipped; the receiver is untouched.
    pub fn toggled(&self, coords: Coord2) -> Self {
        let mut next = self.clone();
        for target in self.press_targets(coords) {
            let cell = &mut next.lights[target.to_nd_index()];
            *cell = !*cell;
            if *cell {
                next.lit_count += 1;
            } else {
                next.lit_count -= 1;
            }
        }
        next
    }
}

impl Index<Coord2> for LightGrid {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.lights[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PressOutcome {
    Toggled,
    Won,
}

impl PressOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Toggled => true,
            Self::Won => true,
        }
    }

    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}
