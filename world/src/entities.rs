//! Authoritative house state management utilities.

use std::collections::BTreeMap;

use pigpen_core::{EntityId, EntitySnapshot, GridCoordinate, Orientation, WorldPosition};
use pigpen_levels::{EntityTemplate, Roster};

/// Mutable state of a single house stored inside the game state.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EntityState {
    /// Orientation applied to the house's shape.
    pub(crate) orientation: Orientation,
    /// Presentation position last reported for the house.
    pub(crate) position: WorldPosition,
}

impl EntityState {
    fn at_home(template: &EntityTemplate) -> Self {
        Self {
            orientation: Orientation::Deg0,
            position: template.home(),
        }
    }
}

/// Registry that stores per-house state keyed by identifier.
#[derive(Clone, Debug)]
pub(crate) struct EntityRegistry {
    entries: BTreeMap<EntityId, EntityState>,
}

impl EntityRegistry {
    /// Creates a registry with every roster house at home, unrotated.
    pub(crate) fn from_roster(roster: &Roster) -> Self {
        let entries = roster
            .iter()
            .map(|template| (template.id().clone(), EntityState::at_home(template)))
            .collect();
        Self { entries }
    }

    /// Returns every house to its home position and orientation.
    pub(crate) fn reset(&mut self, roster: &Roster) {
        *self = Self::from_roster(roster);
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<&EntityState> {
        self.entries.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &EntityId) -> Option<&mut EntityState> {
        self.entries.get_mut(id)
    }

    /// Captures a snapshot of the house described by `template`.
    pub(crate) fn snapshot(
        &self,
        template: &EntityTemplate,
        anchor: Option<GridCoordinate>,
    ) -> Option<EntitySnapshot> {
        self.get(template.id()).map(|state| EntitySnapshot {
            id: template.id().clone(),
            shape: template.shape().clone(),
            orientation: state.orientation,
            position: state.position,
            anchor,
        })
    }
}
