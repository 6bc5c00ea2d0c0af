use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A position in lawn space, in the same units as the lawn width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for WorldPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<WorldPoint> for [f64; 2] {
    fn from(point: WorldPoint) -> Self {
        [point.x, point.y]
    }
}

/// Row/column index into the lawn grid. Row 0 is the bottom edge (y = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Half-open block of cells, already clipped to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRegion {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl CellRegion {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.rows.contains(&cell.row) && self.cols.contains(&cell.col)
    }
}
