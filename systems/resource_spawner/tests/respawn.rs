use std::time::Duration;

use survival_core::{Command, Event, ResourceKind, Settings, Vec2};
use survival_system_resource_spawner::{Config, ResourceSpawner};
use survival_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(100);

fn spawner_for(settings: &Settings) -> ResourceSpawner {
    ResourceSpawner::new(
        Config::from_settings(&settings.resources, settings.world.resource_scatter),
        0xfeed,
    )
}

fn tick(world: &mut World, spawner: &mut ResourceSpawner) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: TICK }, &mut events);

    let mut commands = Vec::new();
    spawner.handle(&events, &query::resource_nodes(world), &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn generation_populates_the_world() {
    let settings = Settings::default();
    let mut world = World::new(settings.clone());
    let mut spawner = spawner_for(&settings);

    let mut commands = Vec::new();
    spawner.generate(&mut commands);
    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
    }

    let nodes = query::resource_nodes(&world).into_vec();
    assert_eq!(nodes.len(), 15);
    assert!(nodes.iter().all(|node| node.is_available()));
    assert!(nodes
        .iter()
        .all(|node| node.position.x.abs() <= 40.0 && node.position.y.abs() <= 40.0));
}

#[test]
fn collected_node_returns_after_respawn_time_and_not_before() {
    let settings = Settings::default();
    let mut world = World::new(settings.clone());
    let mut spawner = spawner_for(&settings);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnResourceNode {
            kind: ResourceKind::Food,
            position: Vec2::new(1.0, 1.0),
        },
        &mut events,
    );
    world::apply(&mut world, Command::Collect, &mut events);
    assert_eq!(query::game_state(&world).resources().food, 1);

    let mut restored_at = None;
    for _ in 0..400 {
        let events = tick(&mut world, &mut spawner);
        if events
            .iter()
            .any(|event| matches!(event, Event::ResourceNodeRestored { .. }))
        {
            restored_at = Some(query::now(&world));
            break;
        }
        assert!(!query::resource_nodes(&world)
            .iter()
            .any(|node| node.is_available()));
    }

    assert_eq!(restored_at, Some(Duration::from_secs(30)));

    let mut again = Vec::new();
    world::apply(&mut world, Command::Collect, &mut again);
    assert_eq!(query::game_state(&world).resources().food, 2);
}
