//! Host facing session that wires the interaction system to the game state.

use pigpen_core::{Command, EntityId, Event, WorldPosition};
use pigpen_levels::ConfigurationError;
use pigpen_world::{self as world, query, GameState};

use crate::{DropOutcome, Interaction};

/// Outcome of a drop reported back to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DropReport {
    /// How the drop was resolved, or `None` when the house is unknown.
    pub outcome: Option<DropOutcome>,
    /// Events broadcast while applying the drop.
    pub events: Vec<Event>,
}

/// Owns the game state and routes host events through the interaction system.
///
/// Every inbound event is translated into commands which are applied until no
/// follow-up commands remain.
#[derive(Clone, Debug)]
pub struct Session {
    state: GameState,
    interaction: Interaction,
}

impl Session {
    /// Creates a session with the default snap tolerance.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self::with_interaction(state, Interaction::default())
    }

    /// Creates a session using the provided interaction system.
    #[must_use]
    pub fn with_interaction(state: GameState, interaction: Interaction) -> Self {
        Self { state, interaction }
    }

    /// Read-only access to the authoritative game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Host reports that a drag of `entity` ended at `position`.
    pub fn on_drop(
        &mut self,
        entity: EntityId,
        position: WorldPosition,
    ) -> Result<DropReport, ConfigurationError> {
        let Some(snapshot) = query::entity(&self.state, &entity) else {
            let events = self.pump(vec![Command::MoveEntity { entity, position }])?;
            return Ok(DropReport {
                outcome: None,
                events,
            });
        };

        let mut commands = Vec::new();
        let outcome = self.interaction.handle_drop(
            query::grid(&self.state),
            query::level(&self.state),
            &snapshot,
            position,
            &mut commands,
        );
        let events = self.pump(commands)?;
        Ok(DropReport {
            outcome: Some(outcome),
            events,
        })
    }

    /// Host reports a rotate gesture on `entity`.
    pub fn on_rotate(&mut self, entity: EntityId) -> Result<Vec<Event>, ConfigurationError> {
        self.pump(vec![Command::RotateEntity { entity }])
    }

    /// Host requests the next level.
    ///
    /// Rejected with [`Event::LevelAdvanceRejected`] while the active level is
    /// in progress. Fails when the catalog has no next level.
    pub fn on_level_advance_requested(&mut self) -> Result<Vec<Event>, ConfigurationError> {
        self.pump(vec![Command::AdvanceLevel])
    }

    fn pump(&mut self, mut commands: Vec<Command>) -> Result<Vec<Event>, ConfigurationError> {
        let mut broadcast = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.state, command, &mut events)?;
            }

            let state = &self.state;
            self.interaction.handle(
                &events,
                query::grid(state),
                query::level(state),
                |id| query::entity(state, id),
                &mut commands,
            );
            broadcast.extend(events);
        }
        Ok(broadcast)
    }
}
