use pigpen_core::{Grid, WorldPosition};
use pigpen_system_snapping::{SnapResolver, SnapTolerance, DEFAULT_SNAP_TOLERANCE};

const NUDGES: [f32; 5] = [-0.14, -0.07, 0.0, 0.07, 0.14];

#[test]
fn nudged_drops_agree_with_grid_rounding() {
    let grid = Grid::standard();
    let resolver = SnapResolver::default();

    for cell in grid.playable_cells() {
        let center = grid.to_world(cell);
        for dx in NUDGES {
            for dz in NUDGES {
                let position = WorldPosition::new(center.x() + dx, 0.1, center.z() + dz);
                let snapped = resolver.resolve(&grid, position);
                assert_eq!(
                    snapped,
                    Some(cell),
                    "drop at ({}, {}) should snap to {cell}",
                    position.x(),
                    position.z()
                );
                assert_eq!(snapped, Some(grid.to_grid(position)));
            }
        }
    }
}

#[test]
fn drops_past_the_tolerance_never_snap() {
    let grid = Grid::standard();
    let resolver = SnapResolver::default();
    let reach = DEFAULT_SNAP_TOLERANCE + 0.05;

    for cell in grid.playable_cells() {
        let center = grid.to_world(cell);
        for (dx, dz) in [(reach, 0.0), (-reach, 0.0), (0.0, reach), (0.0, -reach)] {
            let position = WorldPosition::on_plane(center.x() + dx, center.z() + dz);
            assert_eq!(
                resolver.resolve(&grid, position),
                None,
                "drop {reach} away from {cell} should not snap"
            );
        }
    }
}

#[test]
fn tolerance_is_applied_per_axis() {
    let grid = Grid::standard();
    let resolver = SnapResolver::new(SnapTolerance::new(0.4, 0.1));
    let center = grid.to_world(pigpen_core::GridCoordinate::new(2, 1));

    assert_eq!(resolver.tolerance(), SnapTolerance::new(0.4, 0.1));
    assert!(resolver
        .resolve(&grid, WorldPosition::on_plane(center.x() + 0.3, center.z()))
        .is_some());
    assert!(resolver
        .resolve(&grid, WorldPosition::on_plane(center.x(), center.z() + 0.3))
        .is_none());
}
