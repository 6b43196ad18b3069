#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Pigpen.
//!
//! [`GameState`] owns the active level, the committed placement map and the
//! completion flag. It changes only through [`apply`], which executes a
//! [`Command`] and broadcasts the resulting [`Event`]s; reads go through the
//! [`query`] module.

mod entities;

use pigpen_core::{
    AdvanceError, Command, Completion, Event, Grid, LevelId, PlacementMap, WorldPosition,
};
use pigpen_levels::{ConfigurationError, Level, LevelCatalog, Roster};
use pigpen_system_evaluation::is_level_complete;

use crate::entities::EntityRegistry;

/// Represents the authoritative Pigpen game state.
#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    catalog: LevelCatalog,
    roster: Roster,
    level: Level,
    entities: EntityRegistry,
    placements: PlacementMap,
    completion: Completion,
}

impl GameState {
    /// Creates a game state positioned at the catalog's first level.
    pub fn new(catalog: LevelCatalog, roster: Roster) -> Result<Self, ConfigurationError> {
        let first = catalog.first().ok_or(ConfigurationError::EmptyCatalog)?;
        Self::at_level(catalog, roster, first)
    }

    /// Creates a game state positioned at the provided level.
    pub fn at_level(
        catalog: LevelCatalog,
        roster: Roster,
        level: LevelId,
    ) -> Result<Self, ConfigurationError> {
        let level = catalog.level(level)?.clone();
        let entities = EntityRegistry::from_roster(&roster);
        tracing::info!(level = %level.id(), "level started");
        Ok(Self {
            grid: Grid::standard(),
            catalog,
            roster,
            level,
            entities,
            placements: PlacementMap::new(),
            completion: Completion::InProgress,
        })
    }

    fn evaluate(&mut self, out_events: &mut Vec<Event>) {
        if self.completion == Completion::Completed {
            return;
        }

        if is_level_complete(&self.placements, &self.level) {
            self.completion = Completion::Completed;
            tracing::info!(level = %self.level.id(), "level completed");
            out_events.push(Event::LevelCompleted {
                level: self.level.id(),
            });
        }
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) -> Result<(), ConfigurationError> {
        let current = self.level.id();
        if self.completion != Completion::Completed {
            tracing::debug!(level = %current, "level advance rejected while in progress");
            out_events.push(Event::LevelAdvanceRejected {
                level: current,
                reason: AdvanceError::LevelInProgress,
            });
            return Ok(());
        }

        let next = current
            .next()
            .ok_or(ConfigurationError::NoFollowingLevel(current))?;
        let next = self.catalog.level(next)?.clone();
        self.level = next;
        self.placements.clear();
        self.completion = Completion::InProgress;
        self.entities.reset(&self.roster);
        tracing::info!(level = %self.level.id(), "level started");
        out_events.push(Event::LevelStarted {
            level: self.level.id(),
        });
        Ok(())
    }
}

/// Applies the provided command to the game state, mutating it deterministically.
///
/// Only [`Command::AdvanceLevel`] can fail, and only when no next level
/// exists in the catalog; the state is left untouched in that case.
pub fn apply(
    state: &mut GameState,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ConfigurationError> {
    match command {
        Command::MoveEntity { entity, position } => {
            let Some(entry) = state.entities.get_mut(&entity) else {
                out_events.push(Event::UnknownEntity { entity });
                return Ok(());
            };
            entry.position = position;
            out_events.push(Event::EntityMoved { entity, position });
        }
        Command::CommitPlacement { entity, anchor } => {
            let center = state.grid.to_world(anchor);
            let Some(entry) = state.entities.get_mut(&entity) else {
                out_events.push(Event::UnknownEntity { entity });
                return Ok(());
            };
            entry.position = WorldPosition::new(center.x(), entry.position.y(), center.z());
            let orientation = entry.orientation;
            let previous = state.placements.insert(entity.clone(), anchor);
            tracing::info!(
                %entity,
                %anchor,
                %orientation,
                replaced = previous.is_some(),
                "placement committed"
            );
            out_events.push(Event::PlacementCommitted {
                entity,
                anchor,
                orientation,
            });
            state.evaluate(out_events);
        }
        Command::RotateEntity { entity } => {
            let Some(entry) = state.entities.get_mut(&entity) else {
                out_events.push(Event::UnknownEntity { entity });
                return Ok(());
            };
            entry.orientation = entry.orientation.rotated();
            out_events.push(Event::EntityRotated {
                orientation: entry.orientation,
                position: entry.position,
                entity,
            });
        }
        Command::AdvanceLevel => state.advance(out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use pigpen_core::{Completion, EntityId, EntitySnapshot, Grid, LevelId, PlacementMap};
    use pigpen_levels::{Level, LevelCatalog, Roster};
    use pigpen_system_evaluation::Progress;

    use super::GameState;

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(state: &GameState) -> &Grid {
        &state.grid
    }

    /// Index of the active level.
    #[must_use]
    pub fn level_id(state: &GameState) -> LevelId {
        state.level.id()
    }

    /// Provides read-only access to the active level's obstacles and targets.
    #[must_use]
    pub fn level(state: &GameState) -> &Level {
        &state.level
    }

    /// Provides read-only access to the level catalog.
    #[must_use]
    pub fn catalog(state: &GameState) -> &LevelCatalog {
        &state.catalog
    }

    /// Provides read-only access to the house roster.
    #[must_use]
    pub fn roster(state: &GameState) -> &Roster {
        &state.roster
    }

    /// Provides read-only access to the committed placements.
    #[must_use]
    pub fn placements(state: &GameState) -> &PlacementMap {
        &state.placements
    }

    /// Completion state of the active level instance.
    #[must_use]
    pub fn completion(state: &GameState) -> Completion {
        state.completion
    }

    /// Reports whether the active level has been completed.
    #[must_use]
    pub fn is_completed(state: &GameState) -> bool {
        state.completion == Completion::Completed
    }

    /// Captures how many required houses currently match their targets.
    #[must_use]
    pub fn progress(state: &GameState) -> Progress {
        Progress::evaluate(&state.placements, &state.level)
    }

    /// Captures a snapshot of a single house.
    #[must_use]
    pub fn entity(state: &GameState, id: &EntityId) -> Option<EntitySnapshot> {
        let template = state.roster.get(id)?;
        state
            .entities
            .snapshot(template, state.placements.get(id))
    }

    /// Captures snapshots of every house in roster order.
    #[must_use]
    pub fn entities(state: &GameState) -> Vec<EntitySnapshot> {
        state
            .roster
            .iter()
            .filter_map(|template| {
                state
                    .entities
                    .snapshot(template, state.placements.get(template.id()))
            })
            .collect()
    }
}
