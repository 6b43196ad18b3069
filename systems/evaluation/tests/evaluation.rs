use std::collections::BTreeMap;

use pigpen_core::{EntityId, Grid, GridCoordinate, LevelId, PlacementMap, WorldPosition};
use pigpen_levels::{Level, LevelCatalog, TargetOutcome};
use pigpen_system_evaluation::{is_level_complete, validated_entities, Progress};

fn sample_level() -> Level {
    LevelCatalog::builtin()
        .level(LevelId::new(1))
        .expect("builtin level 1")
        .clone()
}

fn placements(entries: &[(&str, GridCoordinate)]) -> PlacementMap {
    entries
        .iter()
        .map(|(entity, anchor)| (EntityId::new(*entity), *anchor))
        .collect()
}

#[test]
fn empty_map_is_incomplete() {
    let level = sample_level();
    assert!(!is_level_complete(&PlacementMap::new(), &level));
    assert!(validated_entities(&PlacementMap::new(), &level).is_empty());
}

#[test]
fn sample_solution_completes_the_level() {
    let grid = Grid::standard();
    let level = sample_level();
    let red_anchor = grid.to_grid(WorldPosition::new(-1.5, 0.0, -0.5));
    assert_eq!(red_anchor, GridCoordinate::new(1, 0));

    let solved = placements(&[
        ("red", red_anchor),
        ("yellow", GridCoordinate::new(0, 1)),
        ("brown", GridCoordinate::new(1, 3)),
    ]);
    assert!(is_level_complete(&solved, &level));
}

#[test]
fn alternate_target_is_accepted() {
    let level = sample_level();
    let solved = placements(&[
        ("red", GridCoordinate::new(1, 0)),
        ("yellow", GridCoordinate::new(0, 1)),
        ("brown", GridCoordinate::new(3, 3)),
    ]);
    assert!(is_level_complete(&solved, &level));
}

#[test]
fn omitting_a_house_leaves_the_level_incomplete() {
    let level = sample_level();
    let partial = placements(&[
        ("red", GridCoordinate::new(1, 0)),
        ("yellow", GridCoordinate::new(0, 1)),
    ]);
    assert!(!is_level_complete(&partial, &level));

    let progress = Progress::evaluate(&partial, &level);
    let missing: Vec<_> = progress.missing().map(EntityId::as_str).collect();
    assert_eq!(missing, vec!["brown"]);
    assert_eq!(progress.validated().len(), 2);
    assert_eq!(progress.required().len(), 3);
}

#[test]
fn wrong_anchor_is_not_validated() {
    let level = sample_level();
    let misplaced = placements(&[
        ("red", GridCoordinate::new(1, 0)),
        ("yellow", GridCoordinate::new(0, 2)),
        ("brown", GridCoordinate::new(1, 3)),
    ]);
    assert!(!is_level_complete(&misplaced, &level));
    let validated = validated_entities(&misplaced, &level);
    assert!(!validated.contains(&EntityId::new("yellow")));
    assert_eq!(validated.len(), 2);
}

#[test]
fn matching_one_axis_is_not_enough() {
    let level = sample_level();
    let same_row = placements(&[("red", GridCoordinate::new(1, 1))]);
    let same_col = placements(&[("red", GridCoordinate::new(2, 0))]);
    assert!(validated_entities(&same_row, &level).is_empty());
    assert!(validated_entities(&same_col, &level).is_empty());
}

#[test]
fn houses_without_targets_are_ignored() {
    let level = sample_level();
    let solved_with_extra = placements(&[
        ("red", GridCoordinate::new(1, 0)),
        ("yellow", GridCoordinate::new(0, 1)),
        ("brown", GridCoordinate::new(3, 3)),
        ("straw", GridCoordinate::new(2, 1)),
    ]);
    assert!(is_level_complete(&solved_with_extra, &level));
    assert!(!validated_entities(&solved_with_extra, &level).contains(&EntityId::new("straw")));
}

#[test]
fn generalizes_to_any_number_of_houses() {
    let targets = BTreeMap::from([(
        EntityId::new("yellow"),
        TargetOutcome::single(GridCoordinate::new(2, 2)),
    )]);
    let level = Level::new(LevelId::new(9), Vec::new(), targets);
    assert!(is_level_complete(
        &placements(&[("yellow", GridCoordinate::new(2, 2))]),
        &level
    ));
    assert!(!is_level_complete(&PlacementMap::new(), &level));
}

#[test]
fn level_without_requirements_is_never_complete() {
    let level = Level::new(LevelId::new(3), Vec::new(), BTreeMap::new());
    let anything = placements(&[("red", GridCoordinate::new(1, 0))]);
    assert!(!is_level_complete(&anything, &level));
}
