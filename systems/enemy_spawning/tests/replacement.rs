use std::time::Duration;

use survival_core::{Command, EnemyId, Event, Settings, Vec2};
use survival_system_enemy_spawning::{Config, EnemySpawning};
use survival_world::{self as world, query, World};

fn drive(world: &mut World, spawning: &mut EnemySpawning, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    let mut commands = Vec::new();
    spawning.handle(&events, &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn defeated_enemy_is_replaced_ten_seconds_later() {
    let settings = Settings::default();
    let mut world = World::new(settings.clone());
    let mut spawning = EnemySpawning::new(
        Config::from_settings(&settings.enemies, settings.world.enemy_scatter),
        99,
    );
    let _ = drive(
        &mut world,
        &mut spawning,
        Command::SpawnEnemy {
            position: Vec2::new(1.0, 0.0),
        },
    );

    let _ = drive(&mut world, &mut spawning, Command::Attack);
    let _ = drive(
        &mut world,
        &mut spawning,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
    );
    let events = drive(&mut world, &mut spawning, Command::Attack);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyDefeated { .. })));
    assert!(query::enemies(&world).is_empty());
    assert_eq!(spawning.pending(), 1);

    let mut spawned_at = None;
    for _ in 0..200 {
        let events = drive(
            &mut world,
            &mut spawning,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
        );
        if let Some(Event::EnemySpawned { enemy, position }) = events
            .iter()
            .find(|event| matches!(event, Event::EnemySpawned { .. }))
        {
            assert_eq!(*enemy, EnemyId::new(1));
            assert!(position.x.abs() <= 30.0 && position.y.abs() <= 30.0);
            spawned_at = Some(query::now(&world));
            break;
        }
    }

    assert_eq!(spawned_at, Some(Duration::from_millis(10_500)));
    assert_eq!(query::enemies(&world).len(), 1);
}
