#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interaction system that turns host gestures into placement commands.
//!
//! Drops are resolved to the nearest board cell within tolerance and checked
//! for legality before a commit is requested. Rotations are followed by the
//! same resolution at the house's unchanged position so a house that still
//! fits is recommitted with its new orientation.

mod session;

use pigpen_core::{
    Command, EntityId, EntitySnapshot, Event, Grid, GridCoordinate, Orientation, PlacementError,
    Shape, WorldPosition,
};
use pigpen_levels::Level;
use pigpen_system_placement::PlacementValidator;
use pigpen_system_snapping::SnapResolver;

pub use crate::session::{DropReport, Session};

/// Result of resolving a house at a world position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// The position snapped to a cell where the house fits.
    Committed {
        /// Anchor the house was committed to.
        anchor: GridCoordinate,
    },
    /// The position snapped to a cell where the house does not fit.
    Rejected {
        /// Anchor the position snapped to.
        anchor: GridCoordinate,
        /// First violation found by the validator.
        reason: PlacementError,
    },
    /// No playable cell lies within tolerance of the position.
    NoSnapTarget,
}

/// Interaction system translating drops and rotations into commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interaction {
    resolver: SnapResolver,
}

impl Interaction {
    /// Creates an interaction system using the provided snap resolver.
    #[must_use]
    pub const fn new(resolver: SnapResolver) -> Self {
        Self { resolver }
    }

    /// Handles a drag that ended at `position`.
    ///
    /// The new presentation position is always recorded; a commit is requested
    /// only when the position snaps to a cell where the house fits with its
    /// current orientation. A previous commit is otherwise left untouched.
    pub fn handle_drop(
        &self,
        grid: &Grid,
        level: &Level,
        entity: &EntitySnapshot,
        position: WorldPosition,
        out: &mut Vec<Command>,
    ) -> DropOutcome {
        out.push(Command::MoveEntity {
            entity: entity.id.clone(),
            position,
        });
        self.settle(grid, level, entity, position, out)
    }

    /// Consumes game events and emits follow-up commands.
    ///
    /// Every rotation triggers a fresh snap and legality check at the rotated
    /// house's position. The `entity_at` closure should mirror the game
    /// state's `query::entity` helper.
    pub fn handle<F>(
        &self,
        events: &[Event],
        grid: &Grid,
        level: &Level,
        mut entity_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(&EntityId) -> Option<EntitySnapshot>,
    {
        for event in events {
            let Event::EntityRotated {
                entity,
                orientation,
                position,
            } = event
            else {
                continue;
            };
            let Some(snapshot) = entity_at(entity) else {
                continue;
            };
            let rotated = EntitySnapshot {
                orientation: *orientation,
                ..snapshot
            };
            let _ = self.settle(grid, level, &rotated, *position, out);
        }
    }

    /// Resolves where a house would land without emitting commands.
    #[must_use]
    pub fn resolve(
        &self,
        grid: &Grid,
        level: &Level,
        shape: &Shape,
        orientation: Orientation,
        position: WorldPosition,
    ) -> DropOutcome {
        let Some(anchor) = self.resolver.resolve(grid, position) else {
            return DropOutcome::NoSnapTarget;
        };
        match PlacementValidator::new(grid, level).check(shape, orientation, anchor) {
            Ok(()) => DropOutcome::Committed { anchor },
            Err(reason) => DropOutcome::Rejected { anchor, reason },
        }
    }

    fn settle(
        &self,
        grid: &Grid,
        level: &Level,
        house: &EntitySnapshot,
        position: WorldPosition,
        out: &mut Vec<Command>,
    ) -> DropOutcome {
        let outcome = self.resolve(grid, level, &house.shape, house.orientation, position);
        let entity = &house.id;
        match outcome {
            DropOutcome::Committed { anchor } => out.push(Command::CommitPlacement {
                entity: entity.clone(),
                anchor,
            }),
            DropOutcome::Rejected { anchor, reason } => {
                tracing::debug!(%entity, %anchor, %reason, "house does not fit");
            }
            DropOutcome::NoSnapTarget => {
                tracing::debug!(%entity, "house dropped away from the board");
            }
        }
        outcome
    }
}
