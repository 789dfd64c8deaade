use crate::{Cell, Error, ErrorKind, FormatTag};
use std::ops::{Index, IndexMut};

/// Largest width or height a map may have
pub const MAX_DIMENSION: u32 = 10_000;

/// Width and height of the blank map handed out for missing input
pub const DEFAULT_DIMENSION: u32 = 1_000;

/// A width by height map of cells together with the format it was read from
///
/// Cells live in a single contiguous buffer ordered column-major (`x` outer,
/// `y` inner), which is the order every map format persists them in.
///
/// ```
/// use mirmap::{Cell, FormatTag, Grid};
///
/// let mut grid = Grid::new(4, 3, FormatTag::Native)?;
/// grid[(1, 2)].light = 50;
/// assert_eq!(grid.get(1, 2).map(|c| c.light), Some(50));
/// assert!(grid.get(4, 0).is_none());
/// # Ok::<(), mirmap::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "derive", serde(try_from = "RawGrid"))]
pub struct Grid {
    width: u32,
    height: u32,
    format: FormatTag,
    cells: Vec<Cell>,
}

/// Deserialized grid fields awaiting the same checks as [`Grid::from_cells`]
#[cfg(feature = "derive")]
#[derive(serde::Deserialize)]
struct RawGrid {
    width: u32,
    height: u32,
    format: FormatTag,
    cells: Vec<Cell>,
}

#[cfg(feature = "derive")]
impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Grid::from_cells(raw.width, raw.height, raw.format, raw.cells)
    }
}

impl Grid {
    /// Creates a grid filled with default cells
    pub fn new(width: u32, height: u32, format: FormatTag) -> Result<Grid, Error> {
        check_dimensions(format, width as i32, height as i32)?;
        let cells = vec![Cell::default(); width as usize * height as usize];
        Ok(Grid {
            width,
            height,
            format,
            cells,
        })
    }

    /// Creates a grid from column-major cells
    pub fn from_cells(
        width: u32,
        height: u32,
        format: FormatTag,
        cells: Vec<Cell>,
    ) -> Result<Grid, Error> {
        check_dimensions(format, width as i32, height as i32)?;
        if cells.len() != width as usize * height as usize {
            return Err(Error::new(ErrorKind::InvalidGrid {
                width,
                height,
                cells: cells.len(),
            }));
        }

        Ok(Grid {
            width,
            height,
            format,
            cells,
        })
    }

    /// Map width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Map height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// The format this grid was decoded from, and is encoded to by default
    #[inline]
    pub fn format(&self) -> FormatTag {
        self.format
    }

    pub fn set_format(&mut self, format: FormatTag) {
        self.format = format;
    }

    /// The cell at the given position, `None` when out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.position(x, y).and_then(|i| self.cells.get(i))
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        self.position(x, y).and_then(move |i| self.cells.get_mut(i))
    }

    /// Replaces the cell at the given position. Returns false when out of
    /// bounds, leaving the grid untouched.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.get_mut(x, y) {
            Some(dst) => {
                *dst = cell;
                true
            }
            None => false,
        }
    }

    /// All cells in column-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterate `(x, y, cell)` in the order cells are persisted
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let height = self.height();
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / height, i % height, cell))
    }

    /// Number of cells whose light marks a fishing zone
    pub fn fishing_zones(&self) -> usize {
        self.cells.iter().filter(|c| c.is_fishing_zone()).count()
    }

    #[inline]
    fn position(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width() && y < self.height() {
            Some(x * self.height() + y)
        } else {
            None
        }
    }

    pub(crate) fn raw_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub(crate) fn unchecked(width: u32, height: u32, format: FormatTag, cells: Vec<Cell>) -> Grid {
        Grid {
            width,
            height,
            format,
            cells,
        }
    }
}

impl Default for Grid {
    /// The blank 1000x1000 native map used when there is nothing to read
    fn default() -> Self {
        let cells = DEFAULT_DIMENSION as usize * DEFAULT_DIMENSION as usize;
        Grid {
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            format: FormatTag::Native,
            cells: vec![Cell::default(); cells],
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        match self.position(x, y) {
            Some(i) => &self.cells[i],
            None => panic!(
                "cell ({}, {}) out of bounds for {}x{} grid",
                x, y, self.width, self.height
            ),
        }
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Cell {
        let (width, height) = (self.width, self.height);
        match self.position(x, y) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "cell ({}, {}) out of bounds for {}x{} grid",
                x, y, width, height
            ),
        }
    }
}

pub(crate) fn check_dimensions(format: FormatTag, width: i32, height: i32) -> Result<(), Error> {
    let range = 1..=MAX_DIMENSION as i32;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(Error::dimensions(format, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!(grid.width(), 1000);
        assert_eq!(grid.height(), 1000);
        assert_eq!(grid.format(), FormatTag::Native);
        assert_eq!(grid.cells().len(), 1_000_000);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[rstest]
    #[case(0, 10)]
    #[case(10, 0)]
    #[case(10_001, 10)]
    #[case(10, 10_001)]
    fn test_rejects_out_of_range(#[case] width: u32, #[case] height: u32) {
        let err = Grid::new(width, height, FormatTag::Classic).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidDimensions {
                format: FormatTag::Classic,
                ..
            }
        ));
    }

    #[test]
    fn test_accepts_bounds() {
        assert!(Grid::new(1, 1, FormatTag::Native).is_ok());
        assert!(Grid::new(10_000, 1, FormatTag::Native).is_ok());
    }

    #[test]
    fn test_from_cells_shape() {
        let err = Grid::from_cells(3, 3, FormatTag::Native, vec![Cell::default(); 8]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidGrid { cells: 8, .. }
        ));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new(3, 2, FormatTag::Native).unwrap();
        let cell = Cell {
            light: 7,
            ..Cell::default()
        };
        assert!(grid.set(2, 1, cell));
        assert!(!grid.set(3, 1, cell));
        assert!(!grid.set(0, 2, cell));
        assert_eq!(grid.get(2, 1), Some(&cell));
        assert_eq!(grid.cells()[2 * 2 + 1], cell);
    }

    #[test]
    fn test_iter_is_column_major() {
        let grid = Grid::new(2, 3, FormatTag::Native).unwrap();
        let positions: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[cfg(feature = "derive")]
    #[rstest]
    #[case(r#"{"width":2,"height":2,"format":"Native","cells":[]}"#)]
    #[case(r#"{"width":1,"height":0,"format":"Native","cells":[]}"#)]
    #[case(r#"{"width":10001,"height":1,"format":"Native","cells":[]}"#)]
    fn test_deserialize_checks_shape(#[case] json: &str) {
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }

    #[cfg(feature = "derive")]
    #[test]
    fn test_deserialize_round_trip() {
        let mut grid = Grid::new(2, 1, FormatTag::ShandaOld).unwrap();
        grid[(1, 0)].light = 101;
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert_eq!(back.get(1, 0).map(|c| c.light), Some(101));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let grid = Grid::new(2, 2, FormatTag::Native).unwrap();
        let _ = grid[(2, 0)];
    }
}
