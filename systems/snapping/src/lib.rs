#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure snapping system that resolves drop positions to board cells.

use pigpen_core::{Grid, GridCoordinate, WorldPosition};

/// Default half-width of the snap window on both planar axes, in world units.
pub const DEFAULT_SNAP_TOLERANCE: f32 = 0.15;

/// Half-widths of the window a cell center must fall into to be snapped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapTolerance {
    /// Allowed distance along the x axis.
    pub x: f32,
    /// Allowed distance along the z axis.
    pub z: f32,
}

impl SnapTolerance {
    /// Creates a tolerance with explicit per-axis half-widths.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Reports whether `center` lies inside the window around `position`.
    ///
    /// Window edges are inclusive and the height axis is ignored.
    #[must_use]
    pub fn admits(&self, position: WorldPosition, center: WorldPosition) -> bool {
        position.x() >= center.x() - self.x
            && position.x() <= center.x() + self.x
            && position.z() >= center.z() - self.z
            && position.z() <= center.z() + self.z
    }
}

impl Default for SnapTolerance {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_TOLERANCE, DEFAULT_SNAP_TOLERANCE)
    }
}

/// Returns the first candidate whose world center lies within `tolerance` of `position`.
///
/// Candidates are visited in iteration order, so with overlapping windows the
/// earliest candidate wins.
pub fn find_snap_target<I>(
    position: WorldPosition,
    candidates: I,
    tolerance: SnapTolerance,
) -> Option<GridCoordinate>
where
    I: IntoIterator<Item = (GridCoordinate, WorldPosition)>,
{
    candidates
        .into_iter()
        .find(|(_, center)| tolerance.admits(position, *center))
        .map(|(cell, _)| cell)
}

/// Snap resolver bound to a tolerance window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapResolver {
    tolerance: SnapTolerance,
}

impl SnapResolver {
    /// Creates a resolver using the provided tolerance.
    #[must_use]
    pub const fn new(tolerance: SnapTolerance) -> Self {
        Self { tolerance }
    }

    /// Tolerance applied by the resolver.
    #[must_use]
    pub const fn tolerance(&self) -> SnapTolerance {
        self.tolerance
    }

    /// Resolves `position` against the board's playable cells in row-major order.
    #[must_use]
    pub fn resolve(&self, grid: &Grid, position: WorldPosition) -> Option<GridCoordinate> {
        let candidates = grid
            .playable_cells()
            .map(|cell| (cell, grid.to_world(cell)));
        let target = find_snap_target(position, candidates, self.tolerance);
        if target.is_none() {
            tracing::trace!(x = position.x(), z = position.z(), "no snap target in range");
        }
        target
    }
}
