use survival_core::{BuildingId, BuildingKind, Command, Event, PlacementError, Vec2};
use survival_system_builder::{BuildMode, Builder};

fn placed(kind: BuildingKind) -> Event {
    Event::BuildingPlaced {
        building: BuildingId::new(0),
        kind,
        position: Vec2::ZERO,
    }
}

#[test]
fn place_emits_command_for_selected_kind() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let _ = builder.toggle(Some(BuildingKind::Chest));

    assert!(builder.place(Vec2::new(3.0, -2.0), &mut commands));
    assert_eq!(
        commands,
        vec![Command::PlaceBuilding {
            kind: BuildingKind::Chest,
            position: Vec2::new(3.0, -2.0),
        }],
        "builder should emit a placement command for the selected kind",
    );
}

#[test]
fn place_ignored_when_idle() {
    let builder = Builder::new();
    let mut commands = Vec::new();

    assert!(!builder.place(Vec2::ZERO, &mut commands));
    assert!(
        commands.is_empty(),
        "system must not emit commands outside build mode"
    );
}

#[test]
fn toggling_same_kind_leaves_build_mode() {
    let mut builder = Builder::new();
    assert_eq!(
        builder.toggle(Some(BuildingKind::Wall)),
        BuildMode::Placing(BuildingKind::Wall)
    );
    assert_eq!(
        builder.toggle(Some(BuildingKind::Door)),
        BuildMode::Placing(BuildingKind::Door)
    );
    assert_eq!(builder.toggle(Some(BuildingKind::Door)), BuildMode::Idle);
    let _ = builder.toggle(Some(BuildingKind::Floor));
    assert_eq!(builder.toggle(None), BuildMode::Idle);
}

#[test]
fn successful_placement_exits_build_mode() {
    let mut builder = Builder::new();
    let _ = builder.toggle(Some(BuildingKind::Wall));

    builder.handle(&[placed(BuildingKind::Wall)]);

    assert_eq!(builder.mode(), BuildMode::Idle);
}

#[test]
fn rejection_keeps_build_mode_active() {
    let mut builder = Builder::new();
    let _ = builder.toggle(Some(BuildingKind::Tower));

    builder.handle(&[Event::BuildingRejected {
        kind: BuildingKind::Tower,
        position: Vec2::ZERO,
        reason: PlacementError::InsufficientResources,
    }]);

    assert_eq!(builder.mode(), BuildMode::Placing(BuildingKind::Tower));
}

#[test]
fn game_over_clears_selection() {
    let mut builder = Builder::new();
    let _ = builder.toggle(Some(BuildingKind::Wall));

    builder.handle(&[Event::GameOver]);

    assert_eq!(builder.mode(), BuildMode::Idle);
}
