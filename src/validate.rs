use crate::{Grid, MAX_DIMENSION};

/// Returns true if the grid is safe to encode: both dimensions within
/// `1..=10000` and exactly one cell per position.
///
/// Grids built through [`Grid::new`] or [`Grid::from_cells`] always pass.
/// Grids that were deserialized skip those checks and may not.
pub fn validate(grid: &Grid) -> bool {
    let (width, height) = grid.raw_dimensions();
    let range = 1..=MAX_DIMENSION;
    range.contains(&width)
        && range.contains(&height)
        && grid.cells().len() == width as usize * height as usize
}
