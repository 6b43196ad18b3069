use pigpen_core::{
    AdvanceError, EntityId, Event, GridCoordinate, LevelId, Orientation, PlacementError,
    WorldPosition,
};
use pigpen_levels::{ConfigurationError, LevelCatalog, Roster};
use pigpen_system_interaction::{DropOutcome, Session};
use pigpen_world::{query, GameState};

const TWO_LEVELS: &str = r#"
    [[levels]]
    index = 1
    obstacles = [[2, 0], [2, 2], [3, 2]]
    [levels.targets]
    red = [1, 0]
    yellow = [0, 1]
    brown = [[1, 3], [3, 3]]

    [[levels]]
    index = 2
    obstacles = []
    [levels.targets]
    yellow = [2, 2]
"#;

fn session() -> Session {
    let state = GameState::new(LevelCatalog::builtin(), Roster::standard()).expect("builtin state");
    Session::new(state)
}

fn id(name: &str) -> EntityId {
    EntityId::new(name)
}

fn drop_at(session: &mut Session, name: &str, x: f32, z: f32) -> Option<DropOutcome> {
    session
        .on_drop(id(name), WorldPosition::new(x, 0.1, z))
        .expect("drops never fail")
        .outcome
}

fn completed(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::LevelCompleted { .. }))
}

#[test]
fn dropping_rotating_and_dropping_again_solves_level_one() {
    let mut session = session();

    assert_eq!(
        drop_at(&mut session, "red", -1.45, -0.55),
        Some(DropOutcome::Committed {
            anchor: GridCoordinate::new(1, 0)
        })
    );
    assert_eq!(
        drop_at(&mut session, "yellow", -0.5, -1.5),
        Some(DropOutcome::Committed {
            anchor: GridCoordinate::new(0, 1)
        })
    );
    assert_eq!(
        drop_at(&mut session, "brown", 1.5, -0.5),
        Some(DropOutcome::Rejected {
            anchor: GridCoordinate::new(1, 3),
            reason: PlacementError::OutOfBounds {
                cell: GridCoordinate::new(1, 4)
            },
        })
    );
    assert!(!query::is_completed(session.state()));

    let first = session.on_rotate(id("brown")).expect("rotation never fails");
    assert!(!first
        .iter()
        .any(|event| matches!(event, Event::PlacementCommitted { .. })));

    let second = session.on_rotate(id("brown")).expect("rotation never fails");
    assert_eq!(
        second,
        vec![
            Event::EntityRotated {
                entity: id("brown"),
                orientation: Orientation::Deg180,
                position: WorldPosition::new(1.5, 0.1, -0.5),
            },
            Event::PlacementCommitted {
                entity: id("brown"),
                anchor: GridCoordinate::new(1, 3),
                orientation: Orientation::Deg180,
            },
            Event::LevelCompleted {
                level: LevelId::new(1)
            },
        ]
    );
    assert!(query::is_completed(session.state()));
}

#[test]
fn alternate_brown_target_also_completes() {
    let mut session = session();
    let _ = drop_at(&mut session, "red", -1.5, -0.5);
    let _ = drop_at(&mut session, "yellow", -0.5, -1.5);
    let _ = session.on_rotate(id("brown")).expect("rotation never fails");

    let report = session
        .on_drop(id("brown"), WorldPosition::new(1.5, 0.1, 1.5))
        .expect("drops never fail");

    assert_eq!(
        report.outcome,
        Some(DropOutcome::Committed {
            anchor: GridCoordinate::new(3, 3)
        })
    );
    assert!(completed(&report.events));
}

#[test]
fn omitting_brown_leaves_the_level_in_progress() {
    let mut session = session();
    let _ = drop_at(&mut session, "red", -1.5, -0.5);
    let _ = drop_at(&mut session, "yellow", -0.5, -1.5);

    assert!(!query::is_completed(session.state()));
    let missing: Vec<_> = query::progress(session.state())
        .missing()
        .cloned()
        .collect();
    assert_eq!(missing, vec![id("brown")]);
}

#[test]
fn rotating_into_an_illegal_orientation_keeps_the_prior_anchor() {
    let mut session = session();
    let _ = drop_at(&mut session, "red", -1.5, -0.5);

    let events = session.on_rotate(id("red")).expect("rotation never fails");

    assert_eq!(events.len(), 1);
    assert_eq!(
        query::placements(session.state()).get(&id("red")),
        Some(GridCoordinate::new(1, 0))
    );
    let red = query::entity(session.state(), &id("red")).expect("red snapshot");
    assert_eq!(red.orientation, Orientation::Deg90);
}

#[test]
fn failed_redrop_keeps_the_previous_commit() {
    let mut session = session();
    let _ = drop_at(&mut session, "yellow", -0.5, -1.5);

    assert_eq!(
        drop_at(&mut session, "yellow", 0.5, -1.5),
        Some(DropOutcome::Rejected {
            anchor: GridCoordinate::new(0, 2),
            reason: PlacementError::Blocked {
                cell: GridCoordinate::new(0, 3)
            },
        })
    );
    assert_eq!(drop_at(&mut session, "yellow", 9.0, 9.0), Some(DropOutcome::NoSnapTarget));
    assert_eq!(
        query::placements(session.state()).get(&id("yellow")),
        Some(GridCoordinate::new(0, 1))
    );
}

#[test]
fn unknown_house_is_reported() {
    let mut session = session();
    let report = session
        .on_drop(id("straw"), WorldPosition::new(-1.5, 0.1, -0.5))
        .expect("drops never fail");

    assert_eq!(report.outcome, None);
    assert_eq!(
        report.events,
        vec![Event::UnknownEntity {
            entity: id("straw")
        }]
    );
}

#[test]
fn advance_while_in_progress_is_a_no_op() {
    let mut session = session();
    let _ = drop_at(&mut session, "red", -1.5, -0.5);

    let events = session
        .on_level_advance_requested()
        .expect("rejection is not an error");

    assert_eq!(
        events,
        vec![Event::LevelAdvanceRejected {
            level: LevelId::new(1),
            reason: AdvanceError::LevelInProgress,
        }]
    );
    assert_eq!(query::placements(session.state()).len(), 1);
}

#[test]
fn advance_after_completion_starts_the_next_level() {
    let catalog =
        LevelCatalog::from_toml_str(TWO_LEVELS, &Roster::standard()).expect("catalog parses");
    let state = GameState::new(catalog, Roster::standard()).expect("state");
    let mut session = Session::new(state);
    let _ = drop_at(&mut session, "red", -1.5, -0.5);
    let _ = drop_at(&mut session, "yellow", -0.5, -1.5);
    let _ = session.on_rotate(id("brown")).expect("rotation never fails");
    let _ = drop_at(&mut session, "brown", 1.5, 1.5);
    assert!(query::is_completed(session.state()));

    let events = session
        .on_level_advance_requested()
        .expect("level 2 exists");

    assert_eq!(
        events,
        vec![Event::LevelStarted {
            level: LevelId::new(2)
        }]
    );
    assert!(query::placements(session.state()).is_empty());
    assert_eq!(
        drop_at(&mut session, "yellow", 0.5, 0.5),
        Some(DropOutcome::Committed {
            anchor: GridCoordinate::new(2, 2)
        })
    );
    assert!(query::is_completed(session.state()));
}

#[test]
fn advancing_past_the_last_level_fails() {
    let mut session = session();
    let _ = drop_at(&mut session, "red", -1.5, -0.5);
    let _ = drop_at(&mut session, "yellow", -0.5, -1.5);
    let _ = session.on_rotate(id("brown")).expect("rotation never fails");
    let _ = drop_at(&mut session, "brown", 1.5, 1.5);

    let result = session.on_level_advance_requested();

    assert!(matches!(
        result,
        Err(ConfigurationError::UnknownLevel(level)) if level == LevelId::new(2)
    ));
    assert_eq!(query::level_id(session.state()), LevelId::new(1));
}
