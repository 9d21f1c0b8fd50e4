use alloc::string::String;

use crate::*;

/// Passive consumer of engine snapshots. The grid is handed out read-only;
/// a renderer never feeds anything back into the game.
pub trait Renderer {
    type Output;

    fn render(&mut self, engine: &PlayEngine) -> Self::Output;
}

/// Text rendering, one row per board row: `O` for lit, `.` for unlit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AsciiRenderer;

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&mut self, engine: &PlayEngine) -> String {
        let (x_end, y_end) = engine.size();
        let mut out = String::with_capacity((usize::from(x_end) + 1) * usize::from(y_end));
        for y in 0..y_end {
            for x in 0..x_end {
                out.push(if engine.is_lit((x, y)) { 'O' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lit_cells_as_circles() {
        let grid = LightGrid::from_lit_coords((3, 3), &[(0, 1), (1, 1)]).unwrap();
        let engine = PlayEngine::new(grid);

        assert_eq!(AsciiRenderer.render(&engine), "...\nOO.\n...\n");
    }

    #[test]
    fn rendering_follows_grid_replacement() {
        let grid = LightGrid::from_lit_coords((3, 1), &[(0, 0)]).unwrap();
        let mut engine = PlayEngine::new(grid);
        let mut renderer = AsciiRenderer;

        assert_eq!(renderer.render(&engine), "O..\n");

        engine.press((1, 0)).unwrap();

        assert_eq!(renderer.render(&engine), ".OO\n");
    }
}
