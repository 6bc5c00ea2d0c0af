use crate::coordinates::{CellRegion, GridCell, WorldPoint};
use thiserror::Error;

pub const MAX_CELLS: usize = 1 << 26;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid resolution must be a positive finite number, got {0}")]
    InvalidResolution(f64),
    #[error("grid of {rows}x{cols} cells has no area")]
    Empty { rows: usize, cols: usize },
    #[error("grid of {rows}x{cols} cells exceeds the {max} cell limit")]
    TooLarge { rows: usize, cols: usize, max: usize },
    #[error("cell ({row}, {col}) lies outside the grid")]
    OutOfBounds { row: usize, col: usize },
}

/// Height map of the lawn, stored row-major with row 0 at y = 0.
///
/// Cells only ever move down toward the cut height; nothing in this type
/// raises a cell once it has been lowered.
#[derive(Debug, Clone)]
pub struct LawnGrid {
    rows: usize,
    cols: usize,
    resolution: f64,
    uncut_height: f32,
    cells: Vec<f32>,
}

impl LawnGrid {
    pub fn new(
        rows: usize,
        cols: usize,
        resolution: f64,
        uncut_height: f32,
    ) -> Result<Self, GridError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GridError::InvalidResolution(resolution));
        }
        let len = checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            resolution,
            uncut_height,
            cells: vec![uncut_height; len],
        })
    }

    /// Sizes the grid to cover `width × height` world units. Partial cells at
    /// the far edges are dropped.
    pub fn from_extent(
        width: f64,
        height: f64,
        resolution: f64,
        uncut_height: f32,
    ) -> Result<Self, GridError> {
        let (rows, cols) = Self::dimensions_for(width, height, resolution)?;
        Self::new(rows, cols, resolution, uncut_height)
    }

    /// `(rows, cols)` that [`Self::from_extent`] would allocate, checked
    /// without allocating.
    pub fn dimensions_for(
        width: f64,
        height: f64,
        resolution: f64,
    ) -> Result<(usize, usize), GridError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GridError::InvalidResolution(resolution));
        }
        let cols = cells_along(width, resolution);
        let rows = cells_along(height, resolution);
        checked_len(rows, cols)?;
        Ok((rows, cols))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn uncut_height(&self) -> f32 {
        self.uncut_height
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn cell_index(&self, cell: GridCell) -> Result<usize, GridError> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return Err(GridError::OutOfBounds {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok(cell.row * self.cols + cell.col)
    }

    pub fn height(&self, cell: GridCell) -> Result<f32, GridError> {
        let index = self.cell_index(cell)?;
        Ok(self.cells[index])
    }

    /// Maps a world position onto the grid, clamping each axis to the nearest
    /// edge cell when the position falls outside the lawn.
    pub fn cell_for_world(&self, point: WorldPoint) -> GridCell {
        GridCell {
            row: clamp_axis((point.y / self.resolution).floor(), self.rows),
            col: clamp_axis((point.x / self.resolution).floor(), self.cols),
        }
    }

    /// Square neighbourhood around `center`, `half_width` cells below and
    /// `half_width` cells above (exclusive) on each axis, clipped to the grid.
    pub fn region_around(&self, center: GridCell, half_width: usize) -> CellRegion {
        CellRegion {
            rows: center.row.saturating_sub(half_width)
                ..center.row.saturating_add(half_width).min(self.rows),
            cols: center.col.saturating_sub(half_width)
                ..center.col.saturating_add(half_width).min(self.cols),
        }
    }

    /// Lowers every cell in `region` to `cut_height`. Returns how many cells
    /// actually changed.
    pub fn paint(&mut self, region: &CellRegion, cut_height: f32) -> usize {
        let rows = region.rows.start.min(self.rows)..region.rows.end.min(self.rows);
        let cols = region.cols.start.min(self.cols)..region.cols.end.min(self.cols);
        if cols.is_empty() {
            return 0;
        }
        let mut changed = 0;

        for row in rows {
            let start = row * self.cols;
            for cell in &mut self.cells[start + cols.start..start + cols.end] {
                if *cell > cut_height {
                    *cell = cut_height;
                    changed += 1;
                }
            }
        }

        changed
    }

    /// Converts `point` to a cell, then paints the neighbourhood around it.
    pub fn mow_at(&mut self, point: WorldPoint, half_width: usize, cut_height: f32) -> MowOutcome {
        let center = self.cell_for_world(point);
        let region = self.region_around(center, half_width);
        let changed = self.paint(&region, cut_height);
        MowOutcome {
            center,
            region,
            changed,
        }
    }

    pub fn cut_cell_count(&self, cut_height: f32) -> usize {
        self.cells.iter().filter(|&&h| h <= cut_height).count()
    }

    pub fn cut_fraction(&self, cut_height: f32) -> f32 {
        self.cut_cell_count(cut_height) as f32 / self.cells.len() as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MowOutcome {
    pub center: GridCell,
    pub region: CellRegion,
    pub changed: usize,
}

fn checked_len(rows: usize, cols: usize) -> Result<usize, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::Empty { rows, cols });
    }
    rows.checked_mul(cols)
        .filter(|&len| len <= MAX_CELLS)
        .ok_or(GridError::TooLarge {
            rows,
            cols,
            max: MAX_CELLS,
        })
}

fn cells_along(extent: f64, resolution: f64) -> usize {
    let count = extent / resolution;
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

fn clamp_axis(index: f64, len: usize) -> usize {
    // NaN falls through both comparisons and saturates to 0 in the cast.
    index.clamp(0.0, (len - 1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CUT: f32 = 2.0;

    fn lawn() -> LawnGrid {
        LawnGrid::from_extent(10.0, 10.0, 0.1, 5.0).unwrap()
    }

    #[test]
    fn extent_sets_rows_and_cols() {
        let grid = LawnGrid::from_extent(10.0, 4.0, 0.1, 5.0).unwrap();
        assert_eq!(grid.cols(), 100);
        assert_eq!(grid.rows(), 40);
        assert!(grid.cells().iter().all(|&h| h == 5.0));
    }

    #[test]
    fn rejects_bad_resolution_and_empty_grids() {
        assert!(matches!(
            LawnGrid::from_extent(10.0, 10.0, 0.0, 5.0),
            Err(GridError::InvalidResolution(_))
        ));
        assert!(matches!(
            LawnGrid::from_extent(0.05, 10.0, 0.1, 5.0),
            Err(GridError::Empty { rows: 100, cols: 0 })
        ));
    }

    #[test]
    fn oversized_grids_are_rejected_before_allocating() {
        assert!(matches!(
            LawnGrid::new(usize::MAX, 2, 1.0, 5.0),
            Err(GridError::TooLarge { cols: 2, .. })
        ));
        assert!(matches!(
            LawnGrid::from_extent(1e300, 10.0, 0.1, 5.0),
            Err(GridError::TooLarge { rows: 100, .. })
        ));
        assert!(matches!(
            LawnGrid::dimensions_for(1e5, 1e5, 0.1),
            Err(GridError::TooLarge { .. })
        ));
        assert_eq!(LawnGrid::dimensions_for(10.0, 4.0, 0.1), Ok((40, 100)));
    }

    #[test]
    fn cell_index_is_row_major() {
        let grid = lawn();
        assert_eq!(grid.cell_index(GridCell::new(2, 3)).unwrap(), 203);
        assert!(matches!(
            grid.cell_index(GridCell::new(100, 0)),
            Err(GridError::OutOfBounds { row: 100, col: 0 })
        ));
    }

    #[test]
    fn center_of_lawn_maps_to_cell_fifty() {
        let grid = lawn();
        assert_eq!(
            grid.cell_for_world(WorldPoint::new(5.0, 5.0)),
            GridCell::new(50, 50)
        );
    }

    #[test]
    fn mowing_center_cuts_half_open_square() {
        let mut grid = lawn();
        let outcome = grid.mow_at(WorldPoint::new(5.0, 5.0), 3, CUT);

        assert_eq!(outcome.region, CellRegion { rows: 47..53, cols: 47..53 });
        assert_eq!(outcome.changed, 36);
        for row in 47..53 {
            for col in 47..53 {
                assert_eq!(grid.height(GridCell::new(row, col)).unwrap(), CUT);
            }
        }
        assert_eq!(grid.height(GridCell::new(53, 50)).unwrap(), 5.0);
        assert_eq!(grid.height(GridCell::new(50, 46)).unwrap(), 5.0);
        assert_eq!(grid.cut_cell_count(CUT), 36);
    }

    #[test]
    fn outside_position_paints_clamped_corner() {
        let mut grid = lawn();
        let outcome = grid.mow_at(WorldPoint::new(-1.0, 11.0), 3, CUT);

        assert_eq!(outcome.center, GridCell::new(99, 0));
        assert_eq!(outcome.region, CellRegion { rows: 96..100, cols: 0..3 });
        assert_eq!(grid.height(GridCell::new(99, 0)).unwrap(), CUT);
        assert_eq!(grid.cut_cell_count(CUT), 12);
    }

    #[test]
    fn paint_never_raises_a_cell() {
        let mut grid = lawn();
        grid.mow_at(WorldPoint::new(1.0, 1.0), 2, CUT);
        let changed = grid.mow_at(WorldPoint::new(1.0, 1.0), 2, 4.0).changed;

        assert_eq!(changed, 0);
        assert_eq!(grid.height(GridCell::new(10, 10)).unwrap(), CUT);
    }

    #[test]
    fn zero_half_width_paints_nothing() {
        let mut grid = lawn();
        let outcome = grid.mow_at(WorldPoint::new(5.0, 5.0), 0, CUT);
        assert!(outcome.region.is_empty());
        assert_eq!(grid.cut_cell_count(CUT), 0);
    }

    #[test]
    fn cut_fraction_reports_share_of_cells() {
        let mut grid = LawnGrid::new(2, 2, 1.0, 5.0).unwrap();
        grid.paint(&CellRegion { rows: 0..1, cols: 0..2 }, CUT);
        assert_eq!(grid.cut_fraction(CUT), 0.5);
    }

    proptest! {
        #[test]
        fn any_position_maps_inside_grid(x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6) {
            let grid = lawn();
            let cell = grid.cell_for_world(WorldPoint::new(x, y));
            prop_assert!(cell.row < grid.rows());
            prop_assert!(cell.col < grid.cols());
        }

        #[test]
        fn positions_inside_lawn_are_not_clamped(x in 0.0f64..9.99, y in 0.0f64..9.99) {
            let grid = lawn();
            let cell = grid.cell_for_world(WorldPoint::new(x, y));
            prop_assert_eq!(cell.col, (x / 0.1).floor() as usize);
            prop_assert_eq!(cell.row, (y / 0.1).floor() as usize);
        }

        #[test]
        fn painting_twice_matches_painting_once(x in -2.0f64..12.0, y in -2.0f64..12.0, r in 0usize..6) {
            let mut once = lawn();
            once.mow_at(WorldPoint::new(x, y), r, CUT);
            let mut twice = once.clone();
            let outcome = twice.mow_at(WorldPoint::new(x, y), r, CUT);
            prop_assert_eq!(outcome.changed, 0);
            prop_assert_eq!(once.cells(), twice.cells());
        }

        #[test]
        fn cut_cells_stay_cut(path in proptest::collection::vec((-1.0f64..11.0, -1.0f64..11.0), 1..20)) {
            let mut grid = lawn();
            let mut cut_so_far = 0;
            for (x, y) in path {
                grid.mow_at(WorldPoint::new(x, y), 3, CUT);
                let cut_now = grid.cut_cell_count(CUT);
                prop_assert!(cut_now >= cut_so_far);
                cut_so_far = cut_now;
            }
            prop_assert!(grid.cells().iter().all(|&h| h == CUT || h == 5.0));
        }
    }
}
