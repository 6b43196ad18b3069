#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that decides whether a house may rest at an anchor.
//!
//! A placement is legal when every occupied cell of the rotated shape lands on
//! a playable board cell that holds no obstacle. The check is combinatorial
//! and side-effect free.

use pigpen_core::{CellKind, Grid, GridCoordinate, Orientation, PlacementError, Shape};
use pigpen_levels::Level;

/// Absolute board coordinates covered by `shape` anchored at `anchor`.
///
/// Cells are produced in the shape's row-major order. Each local offset
/// `(r, c)` is mapped through the orientation's quarter-turn table around the
/// anchor cell, so the anchor stays fixed while the rest of the shape swings
/// around it.
pub fn footprint(
    shape: &Shape,
    orientation: Orientation,
    anchor: GridCoordinate,
) -> impl Iterator<Item = GridCoordinate> + '_ {
    shape
        .occupied()
        .map(move |(row, col)| match orientation {
            Orientation::Deg0 => anchor.offset(row, col),
            Orientation::Deg90 => anchor.offset(-col, row),
            Orientation::Deg180 => anchor.offset(-row, -col),
            Orientation::Deg270 => anchor.offset(col, -row),
        })
}

/// Validator bound to the board and the active level's obstacles.
#[derive(Clone, Copy, Debug)]
pub struct PlacementValidator<'a> {
    grid: &'a Grid,
    level: &'a Level,
}

impl<'a> PlacementValidator<'a> {
    /// Creates a validator for the provided board and level.
    #[must_use]
    pub const fn new(grid: &'a Grid, level: &'a Level) -> Self {
        Self { grid, level }
    }

    /// Checks the placement, reporting the first violating cell.
    ///
    /// Cells are inspected in the shape's row-major order; for each cell the
    /// bounds are checked before the board layout, which is checked before the
    /// level's obstacles.
    pub fn check(
        &self,
        shape: &Shape,
        orientation: Orientation,
        anchor: GridCoordinate,
    ) -> Result<(), PlacementError> {
        for cell in footprint(shape, orientation, anchor) {
            if let Err(error) = self.check_cell(cell) {
                tracing::debug!(%anchor, %orientation, %error, "placement rejected");
                return Err(error);
            }
        }
        Ok(())
    }

    /// Reports whether the placement is legal.
    #[must_use]
    pub fn is_legal(&self, shape: &Shape, orientation: Orientation, anchor: GridCoordinate) -> bool {
        self.check(shape, orientation, anchor).is_ok()
    }

    /// Every orientation and anchor on the board at which the shape is legal.
    ///
    /// Anchors are listed in row-major order for each orientation in turn.
    #[must_use]
    pub fn legal_placements(&self, shape: &Shape) -> Vec<(Orientation, GridCoordinate)> {
        let grid = self.grid;
        Orientation::ALL
            .into_iter()
            .flat_map(move |orientation| {
                grid.playable_cells()
                    .map(move |anchor| (orientation, anchor))
            })
            .filter(|(orientation, anchor)| self.footprint_fits(shape, *orientation, *anchor))
            .collect()
    }

    fn footprint_fits(&self, shape: &Shape, orientation: Orientation, anchor: GridCoordinate) -> bool {
        footprint(shape, orientation, anchor).all(|cell| self.check_cell(cell).is_ok())
    }

    fn check_cell(&self, cell: GridCoordinate) -> Result<(), PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds { cell });
        }
        if self.grid.cell_at(cell) == CellKind::Blocked {
            return Err(PlacementError::Blocked { cell });
        }
        if self.level.has_obstacle(cell) {
            return Err(PlacementError::ObstacleOverlap { cell });
        }
        Ok(())
    }
}
