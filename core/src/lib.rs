#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pigpen puzzle engine.
//!
//! This crate defines the message surface that connects host adapters, the
//! authoritative game state, and pure systems. Adapters forward gestures to
//! systems, systems respond with [`Command`] values describing desired
//! mutations, the game state executes those commands via its `apply` entry
//! point, and then broadcasts [`Event`] values that systems and hosts react
//! to deterministically.

use std::{collections::BTreeMap, fmt};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows laid out on the board.
pub const BOARD_ROWS: i32 = 4;

/// Number of columns laid out on the board.
pub const BOARD_COLUMNS: i32 = 4;

/// Offset between a cell index and the world-space center of the board.
const CENTER_OFFSET: f32 = 1.5;

const P: CellKind = CellKind::Playable;
const B: CellKind = CellKind::Blocked;

/// Playable layout shared by every level, indexed by `[row][col]`.
const STANDARD_LAYOUT: [[CellKind; BOARD_COLUMNS as usize]; BOARD_ROWS as usize] =
    [[B, P, P, B], [P, P, P, P], [P, P, P, P], [B, P, P, P]];

/// Commands that express all permissible game state mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Records the presentation position of an entity after a drag ended.
    MoveEntity {
        /// Entity that was dragged.
        entity: EntityId,
        /// World position the drag ended at.
        position: WorldPosition,
    },
    /// Commits an entity to the provided anchor cell.
    CommitPlacement {
        /// Entity being committed.
        entity: EntityId,
        /// Cell anchoring the entity's shape before rotation.
        anchor: GridCoordinate,
    },
    /// Advances an entity's orientation by a quarter turn.
    RotateEntity {
        /// Entity being rotated.
        entity: EntityId,
    },
    /// Requests a transition to the next level in the catalog.
    AdvanceLevel,
}

/// Events broadcast by the game state after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that an entity's presentation position changed.
    EntityMoved {
        /// Entity that moved.
        entity: EntityId,
        /// Position the entity occupies after the move.
        position: WorldPosition,
    },
    /// Confirms that an entity was committed to a cell.
    PlacementCommitted {
        /// Entity that was committed.
        entity: EntityId,
        /// Anchor cell recorded in the placement map.
        anchor: GridCoordinate,
        /// Orientation the entity had when committed.
        orientation: Orientation,
    },
    /// Confirms that an entity turned by a quarter turn.
    EntityRotated {
        /// Entity that rotated.
        entity: EntityId,
        /// Orientation after the rotation.
        orientation: Orientation,
        /// Unchanged world position of the entity.
        position: WorldPosition,
    },
    /// Announces that the current level's win condition holds.
    LevelCompleted {
        /// Level that was completed.
        level: LevelId,
    },
    /// Announces that a fresh level instance started.
    LevelStarted {
        /// Level that became active.
        level: LevelId,
    },
    /// Reports that a level advance request was rejected.
    LevelAdvanceRejected {
        /// Level that remains active.
        level: LevelId,
        /// Specific reason the advance failed.
        reason: AdvanceError,
    },
    /// Reports that a command referenced an entity outside the roster.
    UnknownEntity {
        /// Identifier that could not be resolved.
        entity: EntityId,
    },
}

/// Stable identity of a placeable entity (a "house").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new entity identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, one-based level index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier of the level that follows this one, if the index can grow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a single board cell expressed as row and column indices.
///
/// Indices are signed because rotated footprints can extend past either edge
/// of the board; only `[0, 3]` on both axes lies on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    row: i32,
    col: i32,
}

impl GridCoordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Offsets the coordinate by the provided row and column deltas.
    ///
    /// Saturates at the `i32` range; such coordinates are far off the board.
    #[must_use]
    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self::new(self.row.saturating_add(rows), self.col.saturating_add(cols))
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Continuous world-space position supplied by the presentation layer.
///
/// Only the `x` and `z` axes participate in grid alignment; `y` is height and
/// is carried through for presentation only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldPosition(Vec3);

impl WorldPosition {
    /// Creates a new world position from its three components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Creates a position on the board plane (zero height).
    #[must_use]
    pub const fn on_plane(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    /// Horizontal component aligned with board columns.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    /// Height component, ignored by every grid computation.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Depth component aligned with board rows.
    #[must_use]
    pub fn z(&self) -> f32 {
        self.0.z
    }

    /// Projects the position onto the board plane as `(x, z)`.
    #[must_use]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.0.x, self.0.z)
    }
}

/// Kind of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Houses may cover the cell.
    Playable,
    /// Houses may never cover the cell.
    Blocked,
}

/// Fixed 4×4 board shared by every level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: [[CellKind; BOARD_COLUMNS as usize]; BOARD_ROWS as usize],
}

impl Grid {
    /// Creates the standard board layout.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            cells: STANDARD_LAYOUT,
        }
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub const fn contains(&self, coord: GridCoordinate) -> bool {
        coord.row() >= 0
            && coord.col() >= 0
            && coord.row() < BOARD_ROWS
            && coord.col() < BOARD_COLUMNS
    }

    /// Kind of the cell at the provided coordinate.
    ///
    /// Coordinates off the board, negative ones included, are `Blocked`.
    #[must_use]
    pub fn cell_at(&self, coord: GridCoordinate) -> CellKind {
        if !self.contains(coord) {
            return CellKind::Blocked;
        }
        self.cells[coord.row() as usize][coord.col() as usize]
    }

    /// World-space center of the cell at the provided coordinate.
    #[must_use]
    pub fn to_world(&self, coord: GridCoordinate) -> WorldPosition {
        WorldPosition::on_plane(
            coord.col() as f32 - CENTER_OFFSET,
            coord.row() as f32 - CENTER_OFFSET,
        )
    }

    /// Grid coordinate of the cell whose center is nearest to `position`.
    ///
    /// Exact inverse of [`Grid::to_world`] on cell centers. The result may lie
    /// off the board when `position` does.
    #[must_use]
    pub fn to_grid(&self, position: WorldPosition) -> GridCoordinate {
        let row = (position.z() + CENTER_OFFSET).round() as i32;
        let col = (position.x() + CENTER_OFFSET).round() as i32;
        GridCoordinate::new(row, col)
    }

    /// Iterator over playable cells in row-major order.
    pub fn playable_cells(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        (0..BOARD_ROWS)
            .flat_map(|row| (0..BOARD_COLUMNS).map(move |col| GridCoordinate::new(row, col)))
            .filter(|coord| self.cell_at(*coord) == CellKind::Playable)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}

/// Marker describing a single cell of a house shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeCell {
    /// The house does not cover the cell.
    Empty,
    /// The house covers the cell with bare foundation.
    Footprint,
    /// The house covers the cell with a walled structure.
    FootprintWithStructure,
}

impl ShapeCell {
    /// Decodes a numeric marker (`0`, `1` or `2`).
    #[must_use]
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            0 => Some(Self::Empty),
            1 => Some(Self::Footprint),
            2 => Some(Self::FootprintWithStructure),
            _ => None,
        }
    }

    /// Reports whether the marker covers its cell.
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Reasons a shape matrix may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The matrix contains no rows or no columns.
    #[error("shape matrix is empty")]
    Empty,
    /// A row length differs from the first row's length.
    #[error("shape row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Number of cells found in the row.
        found: usize,
        /// Number of cells in the first row.
        expected: usize,
    },
    /// A marker outside `0..=2` was encountered.
    #[error("unknown shape marker {marker} at ({row}, {col})")]
    UnknownMarker {
        /// Row of the marker.
        row: usize,
        /// Column of the marker.
        col: usize,
        /// Marker value that was read.
        marker: u8,
    },
    /// No cell of the matrix is occupied.
    #[error("shape covers no cells")]
    Unoccupied,
}

/// Rectangular matrix of cell markers anchored at its top-left cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    cells: Vec<ShapeCell>,
}

impl Shape {
    /// Builds a shape from rows of numeric markers.
    pub fn from_markers<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(ShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: row_index,
                    found: row.len(),
                    expected: width,
                });
            }
            for (col_index, marker) in row.iter().copied().enumerate() {
                let cell = ShapeCell::from_marker(marker).ok_or(ShapeError::UnknownMarker {
                    row: row_index,
                    col: col_index,
                    marker,
                })?;
                cells.push(cell);
            }
        }

        if !cells.iter().any(|cell| cell.is_occupied()) {
            return Err(ShapeError::Unoccupied);
        }

        Ok(Self { width, cells })
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    /// Marker at the provided local coordinate, if inside the matrix.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<ShapeCell> {
        if col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Local `(row, col)` offsets of every occupied cell in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_occupied())
            .map(move |(index, _)| ((index / width) as i32, (index % width) as i32))
    }
}

/// Quarter-turn orientation applied to a shape around its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Unrotated.
    #[default]
    Deg0,
    /// One quarter turn.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turns.
    Deg270,
}

impl Orientation {
    /// All orientations in rotation order.
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Orientation reached after one more quarter turn, modulo 360°.
    #[must_use]
    pub const fn rotated(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Rotation angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Parses an angle in degrees; only multiples of 90 below 360 are accepted.
    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Committed anchors keyed by entity; absent keys are unplaced entities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementMap {
    anchors: BTreeMap<EntityId, GridCoordinate>,
}

impl PlacementMap {
    /// Creates an empty placement map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `anchor` for `entity`, returning the previous anchor.
    pub fn insert(&mut self, entity: EntityId, anchor: GridCoordinate) -> Option<GridCoordinate> {
        self.anchors.insert(entity, anchor)
    }

    /// Committed anchor for the entity, if placed.
    #[must_use]
    pub fn get(&self, entity: &EntityId) -> Option<GridCoordinate> {
        self.anchors.get(entity).copied()
    }

    /// Reports whether no entity is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Number of placed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Removes every committed anchor.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Iterator over placed entities in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, GridCoordinate)> {
        self.anchors.iter().map(|(entity, anchor)| (entity, *anchor))
    }
}

impl FromIterator<(EntityId, GridCoordinate)> for PlacementMap {
    fn from_iter<T: IntoIterator<Item = (EntityId, GridCoordinate)>>(iter: T) -> Self {
        Self {
            anchors: iter.into_iter().collect(),
        }
    }
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Shape covered by the entity.
    pub shape: Shape,
    /// Current orientation.
    pub orientation: Orientation,
    /// Current presentation position.
    pub position: WorldPosition,
    /// Committed anchor, if the entity is placed.
    pub anchor: Option<GridCoordinate>,
}

/// Completion state of the active level instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Completion {
    /// At least one entity does not match its target yet.
    #[default]
    InProgress,
    /// Every entity matched its target; sticky until the level advances.
    Completed,
}

/// Reasons a placement may be rejected by the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// An occupied cell lands outside the board.
    OutOfBounds {
        /// Absolute coordinate of the offending cell.
        cell: GridCoordinate,
    },
    /// An occupied cell lands on a blocked board cell.
    Blocked {
        /// Absolute coordinate of the offending cell.
        cell: GridCoordinate,
    },
    /// An occupied cell lands on one of the level's obstacles.
    ObstacleOverlap {
        /// Absolute coordinate of the offending cell.
        cell: GridCoordinate,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell } => write!(f, "out of bounds at {cell}"),
            Self::Blocked { cell } => write!(f, "blocked cell at {cell}"),
            Self::ObstacleOverlap { cell } => write!(f, "pig overlap at {cell}"),
        }
    }
}

/// Reasons a level advance request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvanceError {
    /// The active level has not been completed yet.
    LevelInProgress,
}
