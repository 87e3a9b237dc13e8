//! An immutable integer-cell occupancy grid.
//!
//! A [`Grid`] stores one `i32` per cell in row-major order. The value
//! [`BLOCKED`] marks an obstacle; every other value is traversable,
//! including the [`START_MARKER`] and [`GOAL_MARKER`] sentinels a map
//! generator may leave behind.

use std::fmt;

use crate::geom::{Cell, Range};

/// Cell value for open space.
pub const FREE: i32 = 0;
/// Cell value for an obstacle. The only value planners refuse to enter.
pub const BLOCKED: i32 = 1;
/// Sentinel a map generator writes at the start cell.
pub const START_MARKER: i32 = 10;
/// Sentinel a map generator writes at the goal cell.
pub const GOAL_MARKER: i32 = 100;

/// A rectangular occupancy map.
///
/// Built once through one of the validating constructors and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")
)]
pub struct Grid {
    cells: Vec<i32>,
    bounds: Range,
}

impl Grid {
    /// Create a grid of the given shape filled with [`FREE`].
    pub fn new(rows: i32, cols: i32) -> Self {
        Self::filled(rows, cols, FREE)
    }

    /// Create a grid of the given shape filled with `value`.
    pub fn filled(rows: i32, cols: i32, value: i32) -> Self {
        let bounds = Range::with_shape(rows, cols);
        Self {
            cells: vec![value; bounds.len()],
            bounds,
        }
    }

    /// Build a grid from a row-major buffer of `rows * cols` values.
    pub fn from_vec(rows: i32, cols: i32, cells: Vec<i32>) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::Empty);
        }
        let bounds = Range::with_shape(rows, cols);
        if cells.len() != bounds.len() {
            return Err(GridError::SizeMismatch {
                expected: bounds.len(),
                found: cells.len(),
            });
        }
        Ok(Self { cells, bounds })
    }

    /// Build a grid from nested rows. Every row must have the same length.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            cells,
            bounds: Range::with_shape(rows.len() as i32, width as i32),
        })
    }

    /// Parse a grid from text, one line per row. `#` is [`BLOCKED`], `S`
    /// is [`START_MARKER`], `G` is [`GOAL_MARKER`], anything else is
    /// [`FREE`]. Surrounding whitespace is trimmed from every line.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let rows: Vec<Vec<i32>> = s
            .trim()
            .lines()
            .map(|line| {
                line.trim()
                    .chars()
                    .map(|ch| match ch {
                        '#' => BLOCKED,
                        'S' => START_MARKER,
                        'G' => GOAL_MARKER,
                        _ => FREE,
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    /// The bounding range `[0, rows) x [0, cols)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.cols()
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        self.bounds.contains(c)
    }

    #[inline]
    fn index(&self, c: Cell) -> usize {
        (c.row * self.bounds.cols() + c.col) as usize
    }

    /// The raw value at `c`, or `None` if out of bounds.
    pub fn at(&self, c: Cell) -> Option<i32> {
        if !self.contains(c) {
            return None;
        }
        Some(self.cells[self.index(c)])
    }

    /// Whether `c` is inside the grid and not [`BLOCKED`].
    #[inline]
    pub fn is_free(&self, c: Cell) -> bool {
        self.at(c).is_some_and(|v| v != BLOCKED)
    }

    /// Whether `c` is inside the grid and [`BLOCKED`].
    #[inline]
    pub fn is_blocked(&self, c: Cell) -> bool {
        self.at(c) == Some(BLOCKED)
    }

    /// First cell in row-major order holding `value`.
    ///
    /// This is how a driver resolves the start/goal sentinels into the
    /// cells it hands to a planner.
    pub fn position_of(&self, value: i32) -> Option<Cell> {
        self.iter().find_map(|(c, v)| (v == value).then_some(c))
    }

    /// Count how many cells equal `value`.
    pub fn count(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }

    /// Return a copy with `c` set to `value`. Out-of-bounds cells are
    /// ignored.
    pub fn with(mut self, c: Cell, value: i32) -> Self {
        if self.contains(c) {
            let i = self.index(c);
            self.cells[i] = value;
        }
        self
    }

    /// Iterate over `(Cell, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, i32)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

impl TryFrom<Vec<Vec<i32>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i32>>) -> Result<Self, GridError> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<i32>> {
    fn from(g: Grid) -> Self {
        let cols = g.cols().max(1) as usize;
        g.cells.chunks(cols).map(<[i32]>::to_vec).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let ch = match self.at(Cell::new(row, col)) {
                    Some(BLOCKED) => '#',
                    Some(START_MARKER) => 'S',
                    Some(GOAL_MARKER) => 'G',
                    _ => '.',
                };
                write!(f, "{ch}")?;
            }
            if row + 1 < self.rows() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when building a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No rows or no columns.
    Empty,
    /// A row whose length differs from the first row.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A flat buffer whose length is not `rows * cols`.
    SizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid: no cells"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(f, "grid: row {row} has {found} cells, expected {expected}"),
            Self::SizeMismatch { expected, found } => {
                write!(f, "grid: buffer has {found} cells, expected {expected}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "
S..#
.#.#
...G";

    #[test]
    fn test_new_and_shape() {
        let g = Grid::new(5, 10);
        assert_eq!(g.rows(), 5);
        assert_eq!(g.cols(), 10);
        assert_eq!(g.count(FREE), 50);
    }

    #[test]
    fn test_parse_and_at() {
        let g = Grid::parse(MAP).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 4);
        assert_eq!(g.at(Cell::new(0, 0)), Some(START_MARKER));
        assert_eq!(g.at(Cell::new(0, 3)), Some(BLOCKED));
        assert_eq!(g.at(Cell::new(2, 3)), Some(GOAL_MARKER));
        assert_eq!(g.at(Cell::new(3, 0)), None);
        assert_eq!(g.at(Cell::new(0, -1)), None);
    }

    #[test]
    fn sentinels_are_free() {
        let g = Grid::parse(MAP).unwrap();
        assert!(g.is_free(Cell::new(0, 0)));
        assert!(g.is_free(Cell::new(2, 3)));
        assert!(!g.is_free(Cell::new(1, 1)));
        assert!(g.is_blocked(Cell::new(1, 1)));
        // Out of bounds is neither free nor blocked.
        assert!(!g.is_free(Cell::new(9, 9)));
        assert!(!g.is_blocked(Cell::new(9, 9)));
    }

    #[test]
    fn test_position_of() {
        let g = Grid::parse(MAP).unwrap();
        assert_eq!(g.position_of(START_MARKER), Some(Cell::new(0, 0)));
        assert_eq!(g.position_of(GOAL_MARKER), Some(Cell::new(2, 3)));
        assert_eq!(g.position_of(42), None);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Grid::from_rows(&[vec![0, 0], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_from_rows_empty() {
        let rows: [Vec<i32>; 0] = [];
        assert_eq!(Grid::from_rows(&rows), Err(GridError::Empty));
        assert_eq!(Grid::from_rows(&[Vec::<i32>::new()]), Err(GridError::Empty));
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let err = Grid::from_vec(2, 2, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                expected: 4,
                found: 3
            }
        );
        assert!(Grid::from_vec(2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_with_and_count() {
        let g = Grid::new(3, 3)
            .with(Cell::new(1, 1), BLOCKED)
            .with(Cell::new(7, 7), BLOCKED);
        assert_eq!(g.count(BLOCKED), 1);
        assert!(g.is_blocked(Cell::new(1, 1)));
    }

    #[test]
    fn test_iter_row_major() {
        let g = Grid::from_rows(&[[0, 1], [10, 0]]).unwrap();
        let items: Vec<_> = g.iter().collect();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], (Cell::new(0, 1), BLOCKED));
        assert_eq!(items[2], (Cell::new(1, 0), START_MARKER));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let g = Grid::parse(MAP).unwrap();
        let text = g.to_string();
        assert_eq!(Grid::parse(&text).unwrap(), g);
    }

    #[test]
    fn nested_rows_conversion() {
        let rows = vec![vec![0, 1, 0], vec![1, 0, 0]];
        let g = Grid::try_from(rows.clone()).unwrap();
        let back: Vec<Vec<i32>> = g.into();
        assert_eq!(back, rows);
    }
}
