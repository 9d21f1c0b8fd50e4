use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Playing,
    Won,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Gameplay engine: owns the grid and the `Playing -> Won` state machine.
///
/// Every accepted press replaces the grid wholesale with the toggled copy, so
/// readers holding the previous snapshot never observe a half-applied move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    grid: LightGrid,
    state: EngineState,
}

impl PlayEngine {
    pub fn new(grid: LightGrid) -> Self {
        // A generated board can come up already dark; such a game is born won.
        let state = if grid.all_unlit() {
            EngineState::Won
        } else {
            EngineState::Playing
        };
        Self { grid, state }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    /// Current grid snapshot, for renderers.
    pub fn grid(&self) -> &LightGrid {
        &self.grid
    }

    pub fn is_lit(&self, coords: Coord2) -> bool {
        self.grid.is_lit(coords)
    }

    pub fn lights_left(&self) -> CellCount {
        self.grid.lit_count()
    }

    pub fn press(&mut self, coords: Coord2) -> Result<PressOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        self.grid = self.grid.toggled(coords);

        if self.grid.all_unlit() {
            self.state = EngineState::Won;
            Ok(PressOutcome::Won)
        } else {
            Ok(PressOutcome::Toggled)
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: Coord2, lit: &[Coord2]) -> LightGrid {
        LightGrid::from_lit_coords(size, lit).unwrap()
    }

    #[test]
    fn press_on_dark_board_lights_the_pattern() {
        let mut engine = PlayEngine::new(grid((3, 3), &[(0, 0)]));

        let outcome = engine.press((1, 1)).unwrap();

        assert_eq!(outcome, PressOutcome::Toggled);
        assert_eq!(engine.state(), EngineState::Playing);
        for pos in [(1, 1), (1, 0), (0, 1), (2, 1)] {
            assert!(engine.is_lit(pos));
        }
        assert!(!engine.is_lit((1, 2)));
    }

    #[test]
    fn clearing_the_last_lights_wins() {
        let mut engine = PlayEngine::new(grid((3, 3), &[(1, 1), (1, 0), (0, 1), (2, 1)]));

        let outcome = engine.press((1, 1)).unwrap();

        assert_eq!(outcome, PressOutcome::Won);
        assert!(outcome.is_win());
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.lights_left(), 0);
    }

    #[test]
    fn press_after_win_is_rejected() {
        let mut engine = PlayEngine::new(grid((2, 1), &[(0, 0), (1, 0)]));

        assert_eq!(engine.press((0, 0)).unwrap(), PressOutcome::Won);
        assert_eq!(engine.press((1, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn press_out_of_bounds_is_rejected() {
        let mut engine = PlayEngine::new(grid((3, 3), &[(0, 0)]));
        assert_eq!(engine.press((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.press((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn already_dark_board_is_born_won() {
        let engine = PlayEngine::new(grid((2, 2), &[]));
        assert_eq!(engine.state(), EngineState::Won);
        assert!(engine.is_finished());
    }

    #[test]
    fn pressing_keeps_old_snapshot_valid() {
        let mut engine = PlayEngine::new(grid((3, 3), &[(0, 0)]));
        let before = engine.grid().clone();

        engine.press((1, 1)).unwrap();

        assert_eq!(before, grid((3, 3), &[(0, 0)]));
        assert_ne!(engine.grid(), &before);
    }

    #[test]
    fn engine_round_trips_through_serde() {
        let mut engine = PlayEngine::new(grid((4, 4), &[(1, 2), (3, 0)]));
        engine.press((2, 2)).unwrap();

        let json = serde_json::to_string(&engine).unwrap();
        let restored: PlayEngine = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, engine);
    }
}
