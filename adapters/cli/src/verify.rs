//! Offline verification of decoded layout codes.

use pigpen_core::{EntityId, Grid, LevelId, PlacementError, PlacementMap};
use pigpen_levels::{ConfigurationError, LevelCatalog, Roster};
use pigpen_system_evaluation::Progress;
use pigpen_system_placement::PlacementValidator;

use crate::layout_transfer::LayoutSnapshot;

/// Result of checking a layout against its level.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Verdict {
    pub(crate) level: LevelId,
    /// Houses whose recorded placement is illegal on the level.
    pub(crate) rejected: Vec<(EntityId, PlacementError)>,
    /// Houses named by the layout that are not in the roster.
    pub(crate) unknown: Vec<EntityId>,
    pub(crate) progress: Progress,
}

impl Verdict {
    /// Reports whether the layout is legal and satisfies every target.
    #[must_use]
    pub(crate) fn is_solved(&self) -> bool {
        self.rejected.is_empty() && self.unknown.is_empty() && self.progress.is_complete()
    }
}

/// Re-validates every house of `layout` and evaluates the legal ones.
///
/// Fails only when the layout names a level missing from `catalog`.
pub(crate) fn verify(
    layout: &LayoutSnapshot,
    catalog: &LevelCatalog,
    roster: &Roster,
) -> Result<Verdict, ConfigurationError> {
    let level = catalog.level(layout.level)?;
    let grid = Grid::standard();
    let validator = PlacementValidator::new(&grid, level);

    let mut placements = PlacementMap::new();
    let mut rejected = Vec::new();
    let mut unknown = Vec::new();
    for house in &layout.houses {
        let Some(template) = roster.get(&house.entity) else {
            unknown.push(house.entity.clone());
            continue;
        };
        match validator.check(template.shape(), house.orientation, house.anchor) {
            Ok(()) => {
                let _ = placements.insert(house.entity.clone(), house.anchor);
            }
            Err(reason) => rejected.push((house.entity.clone(), reason)),
        }
    }

    Ok(Verdict {
        level: layout.level,
        rejected,
        unknown,
        progress: Progress::evaluate(&placements, level),
    })
}
