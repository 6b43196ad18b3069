#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level catalog for Pigpen.
//!
//! A catalog maps level indices to their obstacles ("pigs") and to the
//! acceptable target anchors of every house. The built-in catalog ships with
//! the crate; alternative catalogs load from TOML files and are validated
//! against the board and the house [`Roster`] before use.

mod manifest;
mod roster;

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs,
    path::{Path, PathBuf},
};

use pigpen_core::{EntityId, Grid, GridCoordinate, LevelId};
use thiserror::Error;

use crate::manifest::Manifest;

pub use crate::roster::{EntityTemplate, Roster};

/// Errors raised when a level catalog is missing data or malformed.
///
/// These indicate a programming or data error rather than a runtime condition
/// and are surfaced to whoever initializes a level.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The requested level has no catalog entry.
    #[error("level {0} is not in the catalog")]
    UnknownLevel(LevelId),
    /// The catalog holds no levels at all.
    #[error("level catalog is empty")]
    EmptyCatalog,
    /// The level index cannot grow, so no level can follow it.
    #[error("no level can follow level {0}")]
    NoFollowingLevel(LevelId),
    /// The catalog file could not be read.
    #[error("failed to read level catalog at {}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog contents are not valid TOML for the manifest schema.
    #[error("failed to parse level catalog")]
    Parse(#[source] toml::de::Error),
    /// A level index of zero was supplied; indices start at one.
    #[error("level indices start at 1")]
    InvalidLevelIndex,
    /// Two levels share an index.
    #[error("level {0} is declared more than once")]
    DuplicateLevel(LevelId),
    /// A level declares no targets, so it could never be completed.
    #[error("level {0} declares no targets")]
    NoTargets(LevelId),
    /// An obstacle lies outside the board.
    #[error("level {level} places an obstacle off the board at {cell}")]
    ObstacleOffBoard {
        /// Level declaring the obstacle.
        level: LevelId,
        /// Offending coordinate.
        cell: GridCoordinate,
    },
    /// A target names a house that is not in the roster.
    #[error("level {level} targets unknown house `{entity}`")]
    UnknownEntity {
        /// Level declaring the target.
        level: LevelId,
        /// Unrecognized house identifier.
        entity: EntityId,
    },
    /// A target lists no acceptable anchors.
    #[error("level {level} lists no anchors for `{entity}`")]
    EmptyTarget {
        /// Level declaring the target.
        level: LevelId,
        /// House whose target is empty.
        entity: EntityId,
    },
    /// A target anchor lies outside the board.
    #[error("level {level} targets `{entity}` off the board at {cell}")]
    TargetOffBoard {
        /// Level declaring the target.
        level: LevelId,
        /// House whose target is invalid.
        entity: EntityId,
        /// Offending anchor.
        cell: GridCoordinate,
    },
}

/// Set of anchors that count as a correct final placement for a house.
///
/// Symmetric solutions list several anchors; a single solution is a singleton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetOutcome {
    anchors: Vec<GridCoordinate>,
}

impl TargetOutcome {
    /// Outcome accepting exactly one anchor.
    #[must_use]
    pub fn single(anchor: GridCoordinate) -> Self {
        Self {
            anchors: vec![anchor],
        }
    }

    /// Outcome accepting any of the provided anchors, or `None` when empty.
    ///
    /// Duplicates are dropped while the first occurrence keeps its position.
    #[must_use]
    pub fn any_of(anchors: impl IntoIterator<Item = GridCoordinate>) -> Option<Self> {
        let mut unique: Vec<GridCoordinate> = Vec::new();
        for anchor in anchors {
            if !unique.contains(&anchor) {
                unique.push(anchor);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self { anchors: unique })
        }
    }

    /// Reports whether `anchor` matches one acceptable anchor on both axes.
    #[must_use]
    pub fn accepts(&self, anchor: GridCoordinate) -> bool {
        self.anchors.contains(&anchor)
    }

    /// Acceptable anchors in declaration order.
    #[must_use]
    pub fn anchors(&self) -> &[GridCoordinate] {
        &self.anchors
    }
}

/// Read-only description of a single level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    obstacles: Vec<GridCoordinate>,
    targets: BTreeMap<EntityId, TargetOutcome>,
}

impl Level {
    /// Creates a level from its parts.
    #[must_use]
    pub fn new(
        id: LevelId,
        obstacles: Vec<GridCoordinate>,
        targets: BTreeMap<EntityId, TargetOutcome>,
    ) -> Self {
        Self {
            id,
            obstacles,
            targets,
        }
    }

    /// Index of the level.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Grid coordinates of the level's obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[GridCoordinate] {
        &self.obstacles
    }

    /// Reports whether an obstacle sits on `cell`.
    #[must_use]
    pub fn has_obstacle(&self, cell: GridCoordinate) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Target outcome registered for `entity`, if any.
    #[must_use]
    pub fn target(&self, entity: &EntityId) -> Option<&TargetOutcome> {
        self.targets.get(entity)
    }

    /// Iterator over every target in entity order.
    pub fn targets(&self) -> impl Iterator<Item = (&EntityId, &TargetOutcome)> {
        self.targets.iter()
    }

    /// Houses that must match their target to complete the level.
    pub fn required_entities(&self) -> impl Iterator<Item = &EntityId> {
        self.targets.keys()
    }

    fn validate(&self, grid: &Grid, roster: &Roster) -> Result<(), ConfigurationError> {
        if self.targets.is_empty() {
            return Err(ConfigurationError::NoTargets(self.id));
        }

        if let Some(cell) = self.obstacles.iter().find(|cell| !grid.contains(**cell)) {
            return Err(ConfigurationError::ObstacleOffBoard {
                level: self.id,
                cell: *cell,
            });
        }

        for (entity, outcome) in &self.targets {
            if !roster.contains(entity) {
                return Err(ConfigurationError::UnknownEntity {
                    level: self.id,
                    entity: entity.clone(),
                });
            }
            if let Some(cell) = outcome.anchors().iter().find(|cell| !grid.contains(**cell)) {
                return Err(ConfigurationError::TargetOffBoard {
                    level: self.id,
                    entity: entity.clone(),
                    cell: *cell,
                });
            }
        }

        Ok(())
    }
}

/// Ordered collection of levels keyed by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, Level>,
}

impl LevelCatalog {
    /// Catalog shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let targets = BTreeMap::from([
            (
                EntityId::new("red"),
                TargetOutcome::single(GridCoordinate::new(1, 0)),
            ),
            (
                EntityId::new("yellow"),
                TargetOutcome::single(GridCoordinate::new(0, 1)),
            ),
            (
                EntityId::new("brown"),
                TargetOutcome {
                    anchors: vec![GridCoordinate::new(1, 3), GridCoordinate::new(3, 3)],
                },
            ),
        ]);
        let first = Level::new(
            LevelId::new(1),
            vec![
                GridCoordinate::new(2, 0),
                GridCoordinate::new(2, 2),
                GridCoordinate::new(3, 2),
            ],
            targets,
        );
        Self {
            levels: BTreeMap::from([(first.id(), first)]),
        }
    }

    /// Builds a catalog from levels, validating them against the board and roster.
    pub fn from_levels(
        levels: impl IntoIterator<Item = Level>,
        roster: &Roster,
    ) -> Result<Self, ConfigurationError> {
        let grid = Grid::standard();
        let mut catalog = BTreeMap::new();
        for level in levels {
            level.validate(&grid, roster)?;
            match catalog.entry(level.id()) {
                Entry::Occupied(_) => return Err(ConfigurationError::DuplicateLevel(level.id())),
                Entry::Vacant(slot) => {
                    let _ = slot.insert(level);
                }
            }
        }

        if catalog.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        Ok(Self { levels: catalog })
    }

    /// Parses and validates a catalog from TOML source.
    pub fn from_toml_str(contents: &str, roster: &Roster) -> Result<Self, ConfigurationError> {
        let levels = Manifest::parse(contents)?.into_levels()?;
        let catalog = Self::from_levels(levels, roster)?;
        tracing::debug!(levels = catalog.len(), "parsed level catalog");
        Ok(catalog)
    }

    /// Reads, parses and validates a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>, roster: &Roster) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, roster)
    }

    /// Level registered under `id`.
    pub fn level(&self, id: LevelId) -> Result<&Level, ConfigurationError> {
        self.levels
            .get(&id)
            .ok_or(ConfigurationError::UnknownLevel(id))
    }

    /// Reports whether the catalog holds a level with index `id`.
    #[must_use]
    pub fn contains(&self, id: LevelId) -> bool {
        self.levels.contains_key(&id)
    }

    /// Lowest level index in the catalog.
    #[must_use]
    pub fn first(&self) -> Option<LevelId> {
        self.levels.keys().next().copied()
    }

    /// Iterator over the levels in index order.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the catalog holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_CATALOG: &str = include_str!("../levels.toml");

    fn level_with(targets: &[(&str, GridCoordinate)], obstacles: Vec<GridCoordinate>) -> Level {
        let targets = targets
            .iter()
            .map(|(entity, anchor)| (EntityId::new(*entity), TargetOutcome::single(*anchor)))
            .collect();
        Level::new(LevelId::new(1), obstacles, targets)
    }

    #[test]
    fn shipped_toml_matches_builtin_catalog() {
        let parsed = LevelCatalog::from_toml_str(SHIPPED_CATALOG, &Roster::standard())
            .expect("shipped catalog is valid");
        assert_eq!(parsed, LevelCatalog::builtin());
    }

    #[test]
    fn builtin_level_one_matches_sample_layout() {
        let catalog = LevelCatalog::builtin();
        let level = catalog.level(LevelId::new(1)).expect("level 1 exists");
        assert_eq!(
            level.obstacles(),
            &[
                GridCoordinate::new(2, 0),
                GridCoordinate::new(2, 2),
                GridCoordinate::new(3, 2),
            ]
        );
        let required: Vec<_> = level.required_entities().map(EntityId::as_str).collect();
        assert_eq!(required, vec!["brown", "red", "yellow"]);
        let brown = level.target(&EntityId::new("brown")).expect("brown target");
        assert!(brown.accepts(GridCoordinate::new(1, 3)));
        assert!(brown.accepts(GridCoordinate::new(3, 3)));
        assert!(!brown.accepts(GridCoordinate::new(3, 1)));
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = LevelCatalog::builtin();
        let rebuilt = LevelCatalog::from_levels(builtin.levels().cloned(), &Roster::standard())
            .expect("builtin catalog validates");
        assert_eq!(rebuilt, builtin);
    }

    #[test]
    fn unknown_level_is_a_configuration_error() {
        let catalog = LevelCatalog::builtin();
        assert!(matches!(
            catalog.level(LevelId::new(2)),
            Err(ConfigurationError::UnknownLevel(id)) if id == LevelId::new(2)
        ));
    }

    #[test]
    fn duplicate_levels_are_rejected() {
        let level = level_with(&[("red", GridCoordinate::new(1, 0))], Vec::new());
        let result = LevelCatalog::from_levels([level.clone(), level], &Roster::standard());
        assert!(matches!(result, Err(ConfigurationError::DuplicateLevel(_))));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = LevelCatalog::from_toml_str("", &Roster::standard());
        assert!(matches!(result, Err(ConfigurationError::EmptyCatalog)));
    }

    #[test]
    fn level_without_targets_is_rejected() {
        let level = level_with(&[], Vec::new());
        let result = LevelCatalog::from_levels([level], &Roster::standard());
        assert!(matches!(result, Err(ConfigurationError::NoTargets(_))));
    }

    #[test]
    fn off_board_obstacles_are_rejected() {
        let level = level_with(
            &[("red", GridCoordinate::new(1, 0))],
            vec![GridCoordinate::new(-1, 2)],
        );
        let result = LevelCatalog::from_levels([level], &Roster::standard());
        assert!(matches!(
            result,
            Err(ConfigurationError::ObstacleOffBoard { cell, .. }) if cell == GridCoordinate::new(-1, 2)
        ));
    }

    #[test]
    fn targets_for_unknown_houses_are_rejected() {
        let level = level_with(&[("straw", GridCoordinate::new(1, 0))], Vec::new());
        let result = LevelCatalog::from_levels([level], &Roster::standard());
        assert!(matches!(
            result,
            Err(ConfigurationError::UnknownEntity { entity, .. }) if entity.as_str() == "straw"
        ));
    }

    #[test]
    fn off_board_targets_are_rejected() {
        let level = level_with(&[("red", GridCoordinate::new(4, 0))], Vec::new());
        let result = LevelCatalog::from_levels([level], &Roster::standard());
        assert!(matches!(
            result,
            Err(ConfigurationError::TargetOffBoard { .. })
        ));
    }

    #[test]
    fn missing_catalog_file_reports_path() {
        let result = LevelCatalog::load("/nonexistent/pigpen/levels.toml", &Roster::standard());
        match result {
            Err(error @ ConfigurationError::Io { .. }) => {
                assert!(error.to_string().contains("/nonexistent/pigpen/levels.toml"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn target_outcome_drops_duplicates_and_rejects_empty_sets() {
        let outcome = TargetOutcome::any_of([
            GridCoordinate::new(1, 3),
            GridCoordinate::new(1, 3),
            GridCoordinate::new(3, 3),
        ])
        .expect("non-empty");
        assert_eq!(
            outcome.anchors(),
            &[GridCoordinate::new(1, 3), GridCoordinate::new(3, 3)]
        );
        assert!(TargetOutcome::any_of(Vec::new()).is_none());
    }
}
