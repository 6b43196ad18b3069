//! Text rendering of boards, drop outcomes and broadcast events.

use std::collections::BTreeMap;

use pigpen_core::{
    AdvanceError, CellKind, Event, Grid, GridCoordinate, BOARD_COLUMNS, BOARD_ROWS,
};
use pigpen_levels::{Level, Roster};
use pigpen_system_interaction::DropOutcome;
use pigpen_system_placement::footprint;

use crate::layout_transfer::PlacedHouse;

const BLOCKED: char = '#';
const OBSTACLE: char = 'P';
const PLAYABLE: char = '.';

/// Renders the board with the level's obstacles and the given houses.
///
/// Houses are drawn with the lowercase first letter of their identifier and
/// cover obstacles they overlap. Cells off the board are not drawn.
pub(crate) fn render_board(
    grid: &Grid,
    level: &Level,
    roster: &Roster,
    houses: &[PlacedHouse],
) -> String {
    let mut marks = BTreeMap::new();
    for house in houses {
        let Some(template) = roster.get(&house.entity) else {
            continue;
        };
        let marker = house_marker(house.entity.as_str());
        for cell in footprint(template.shape(), house.orientation, house.anchor) {
            if grid.contains(cell) {
                let _ = marks.insert(cell, marker);
            }
        }
    }

    let mut rendered = String::from("  ");
    for col in 0..BOARD_COLUMNS {
        rendered.push_str(&format!(" {col}"));
    }
    for row in 0..BOARD_ROWS {
        rendered.push_str(&format!("\n{row} "));
        for col in 0..BOARD_COLUMNS {
            let cell = GridCoordinate::new(row, col);
            let symbol = marks.get(&cell).copied().unwrap_or_else(|| {
                if grid.cell_at(cell) == CellKind::Blocked {
                    BLOCKED
                } else if level.has_obstacle(cell) {
                    OBSTACLE
                } else {
                    PLAYABLE
                }
            });
            rendered.push(' ');
            rendered.push(symbol);
        }
    }
    rendered
}

fn house_marker(entity: &str) -> char {
    entity
        .chars()
        .next()
        .map_or('?', |first| first.to_ascii_lowercase())
}

/// Describes how a drop was resolved.
pub(crate) fn describe_outcome(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Committed { anchor } => format!("fits at {anchor}"),
        DropOutcome::Rejected { anchor, reason } => {
            format!("does not fit at {anchor}: {reason}")
        }
        DropOutcome::NoSnapTarget => "no cell within reach".to_owned(),
    }
}

/// Describes a broadcast event on a single line.
pub(crate) fn describe_event(event: &Event) -> String {
    match event {
        Event::EntityMoved { entity, position } => {
            format!("{entity} moved to ({:.2}, {:.2})", position.x(), position.z())
        }
        Event::PlacementCommitted {
            entity,
            anchor,
            orientation,
        } => format!("{entity} committed at {anchor} facing {orientation}"),
        Event::EntityRotated {
            entity,
            orientation,
            ..
        } => format!("{entity} rotated to {orientation}"),
        Event::LevelCompleted { level } => format!("level {level} completed"),
        Event::LevelStarted { level } => format!("level {level} started"),
        Event::LevelAdvanceRejected { level, reason } => match reason {
            AdvanceError::LevelInProgress => {
                format!("advance rejected: level {level} is still in progress")
            }
        },
        Event::UnknownEntity { entity } => format!("unknown house '{entity}'"),
    }
}
