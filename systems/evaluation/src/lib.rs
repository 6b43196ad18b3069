#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure evaluation system that decides whether a level's win condition holds.

use std::collections::BTreeSet;

use pigpen_core::{EntityId, PlacementMap};
use pigpen_levels::Level;

/// Placed houses whose committed anchor matches one of their acceptable targets.
///
/// Houses without a target in `level` are never validated.
#[must_use]
pub fn validated_entities(placements: &PlacementMap, level: &Level) -> BTreeSet<EntityId> {
    placements
        .iter()
        .filter(|(entity, anchor)| {
            level
                .target(entity)
                .is_some_and(|outcome| outcome.accepts(*anchor))
        })
        .map(|(entity, _)| entity.clone())
        .collect()
}

/// Reports whether every house the level requires matches its target.
///
/// Empty and partially populated placement maps evaluate to `false`.
#[must_use]
pub fn is_level_complete(placements: &PlacementMap, level: &Level) -> bool {
    Progress::evaluate(placements, level).is_complete()
}

/// Summary of how far a placement map is from completing a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    validated: BTreeSet<EntityId>,
    required: BTreeSet<EntityId>,
}

impl Progress {
    /// Evaluates `placements` against `level`.
    #[must_use]
    pub fn evaluate(placements: &PlacementMap, level: &Level) -> Self {
        let validated = validated_entities(placements, level);
        let required: BTreeSet<EntityId> = level.required_entities().cloned().collect();
        tracing::trace!(
            level = %level.id(),
            validated = validated.len(),
            required = required.len(),
            "evaluated level progress"
        );
        Self {
            validated,
            required,
        }
    }

    /// Houses that currently match their target.
    #[must_use]
    pub fn validated(&self) -> &BTreeSet<EntityId> {
        &self.validated
    }

    /// Houses that must match their target to complete the level.
    #[must_use]
    pub fn required(&self) -> &BTreeSet<EntityId> {
        &self.required
    }

    /// Required houses that do not match their target yet.
    pub fn missing(&self) -> impl Iterator<Item = &EntityId> {
        self.required.difference(&self.validated)
    }

    /// Reports whether every required house is validated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.required.is_empty() && self.required.is_subset(&self.validated)
    }
}
