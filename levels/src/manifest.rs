//! TOML representation of the level catalog.

use std::collections::BTreeMap;

use pigpen_core::{EntityId, GridCoordinate, LevelId};
use serde::Deserialize;

use crate::{ConfigurationError, Level, TargetOutcome};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Manifest {
    #[serde(default)]
    levels: Vec<RawLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLevel {
    index: u32,
    #[serde(default)]
    obstacles: Vec<[i32; 2]>,
    #[serde(default)]
    targets: BTreeMap<String, RawTarget>,
}

/// A target is written either as one `[row, col]` pair or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Single([i32; 2]),
    AnyOf(Vec<[i32; 2]>),
}

impl RawTarget {
    fn into_anchors(self) -> Vec<GridCoordinate> {
        match self {
            Self::Single(pair) => vec![coordinate(pair)],
            Self::AnyOf(pairs) => pairs.into_iter().map(coordinate).collect(),
        }
    }
}

impl Manifest {
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(contents).map_err(ConfigurationError::Parse)
    }

    /// Converts the raw manifest into levels without any semantic checks.
    pub(crate) fn into_levels(self) -> Result<Vec<Level>, ConfigurationError> {
        self.levels
            .into_iter()
            .map(|raw| {
                if raw.index == 0 {
                    return Err(ConfigurationError::InvalidLevelIndex);
                }
                let id = LevelId::new(raw.index);
                let obstacles = raw.obstacles.into_iter().map(coordinate).collect();
                let mut targets = BTreeMap::new();
                for (entity, target) in raw.targets {
                    let entity = EntityId::new(entity);
                    let outcome = TargetOutcome::any_of(target.into_anchors()).ok_or_else(|| {
                        ConfigurationError::EmptyTarget {
                            level: id,
                            entity: entity.clone(),
                        }
                    })?;
                    let _ = targets.insert(entity, outcome);
                }
                Ok(Level::new(id, obstacles, targets))
            })
            .collect()
    }
}

fn coordinate([row, col]: [i32; 2]) -> GridCoordinate {
    GridCoordinate::new(row, col)
}
