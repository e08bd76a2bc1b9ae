#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the survival simulation.
//!
//! The world owns the [`GameState`], the entity registry and the
//! [`DayNightClock`]. Every mutation arrives as a [`Command`] through
//! [`apply`], and every observable consequence leaves as an [`Event`].

mod clock;
mod interaction;
mod movement;
mod registry;
mod state;

use std::time::Duration;

use survival_core::{Command, Event, SessionPhase, Settings, Vec2, WELCOME_BANNER};
use tracing::{debug, info, trace};

pub use clock::DayNightClock;
pub use state::{GameState, XP_PER_LEVEL};

use registry::EntityRegistry;

/// Represents the authoritative survival world state.
#[derive(Debug)]
pub struct World {
    settings: Settings,
    banner: &'static str,
    state: GameState,
    registry: EntityRegistry,
    clock: DayNightClock,
    player_position: Vec2,
    player_facing: f32,
    now: Duration,
    last_player_attack_at: Option<Duration>,
}

impl World {
    /// Creates an empty world governed by the provided settings.
    ///
    /// Resource nodes and enemies are added afterwards through commands.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let clock = DayNightClock::starting_at(
            settings.day_cycle.starting_hour,
            settings.day_cycle.hours_per_second(),
        );
        Self {
            banner: WELCOME_BANNER,
            state: GameState::new(&settings.player),
            registry: EntityRegistry::new(),
            clock,
            player_position: Vec2::ZERO,
            player_facing: 0.0,
            now: Duration::ZERO,
            last_player_attack_at: None,
            settings,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the player has died every command other than [`Command::Reset`] is
/// ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state.phase() == SessionPhase::GameOver && command != Command::Reset {
        trace!(?command, "command ignored after game over");
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.now = world.now.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt, now: world.now });
            if let Some(is_day) = world.clock.advance(dt) {
                debug!(is_day, hour = world.clock.hour(), "day phase changed");
                out_events.push(Event::DayPhaseChanged { is_day });
            }
        }
        Command::MovePlayer { input } => {
            if input.is_idle() {
                return;
            }
            let step = movement::step(
                world.player_position,
                input,
                world.settings.player.move_speed,
                world.settings.world.bounds(),
            );
            world.player_position = step.position;
            if let Some(facing) = step.facing {
                world.player_facing = facing;
            }
            out_events.push(Event::PlayerMoved {
                position: world.player_position,
                facing: world.player_facing,
            });
        }
        Command::SpawnResourceNode { kind, position } => {
            let position = world.settings.world.bounds().clamp(position);
            let node = world.registry.insert_node(kind, position);
            out_events.push(Event::ResourceNodeSpawned {
                node,
                kind,
                position,
            });
        }
        Command::RestoreResourceNode { node } => {
            let now = world.now;
            let Some(entry) = world.registry.node_mut(node) else {
                return;
            };
            match entry.respawn_at {
                Some(deadline) if deadline <= now => {
                    entry.respawn_at = None;
                    out_events.push(Event::ResourceNodeRestored {
                        node,
                        kind: entry.kind,
                        position: entry.position,
                    });
                }
                _ => trace!(node = node.get(), "restore ignored before deadline"),
            }
        }
        Command::Collect => {
            let collected = world.collect(out_events);
            trace!(collected, "collect resolved");
        }
        Command::PlaceBuilding { kind, position } => match world.place_building(kind, position) {
            Ok(building) => out_events.push(Event::BuildingPlaced {
                building,
                kind,
                position,
            }),
            Err(reason) => {
                debug!(kind = kind.name(), %reason, "building rejected");
                out_events.push(Event::BuildingRejected {
                    kind,
                    position,
                    reason,
                });
            }
        },
        Command::Craft { recipe } => match world.craft(recipe) {
            Ok(total) => out_events.push(Event::ItemCrafted { recipe, total }),
            Err(reason) => {
                debug!(recipe = recipe.name(), %reason, "craft rejected");
                out_events.push(Event::CraftRejected { recipe, reason });
            }
        },
        Command::Attack => {
            let hits = world.attack(out_events);
            trace!(?hits, "attack resolved");
        }
        Command::SpawnEnemy { position } => {
            let position = world.settings.world.bounds().clamp(position);
            let enemy = world
                .registry
                .insert_enemy(position, world.settings.enemies.max_health);
            out_events.push(Event::EnemySpawned { enemy, position });
        }
        Command::DriveEnemy {
            enemy,
            state,
            position,
            facing,
        } => {
            let position = world.settings.world.bounds().clamp(position);
            let Some(entry) = world.registry.enemy_mut(enemy) else {
                return;
            };
            if entry.state != state {
                debug!(enemy = enemy.get(), from = ?entry.state, to = ?state, "enemy state changed");
                out_events.push(Event::EnemyStateChanged {
                    enemy,
                    from: entry.state,
                    to: state,
                });
                entry.state = state;
            }
            if entry.position != position || entry.facing != facing {
                entry.position = position;
                entry.facing = facing;
                out_events.push(Event::EnemyMoved {
                    enemy,
                    position,
                    facing,
                });
            }
        }
        Command::StrikePlayer { enemy } => {
            let now = world.now;
            let cooldown = world.settings.enemies.attack_cooldown();
            let Some(entry) = world.registry.enemy_mut(enemy) else {
                return;
            };
            let ready = entry
                .last_attack_at
                .map_or(true, |last| now.saturating_sub(last) >= cooldown);
            if !ready {
                trace!(enemy = enemy.get(), "strike ignored during cooldown");
                return;
            }
            entry.last_attack_at = Some(now);

            let amount = world.settings.enemies.damage;
            let health = world.state.damage(amount);
            out_events.push(Event::PlayerDamaged {
                enemy,
                amount,
                health,
            });
            if health == 0 {
                world.state.enter_game_over();
                info!("player died; game over");
                out_events.push(Event::GameOver);
            }
        }
        Command::CompleteMission { mission, reward } => {
            if !world.state.record_mission(mission) {
                trace!(?mission, "mission already completed");
                return;
            }
            info!(mission = mission.title(), "mission completed");
            out_events.push(Event::MissionCompleted { mission, reward });
            world.award_xp(reward.xp, out_events);
            world.grant(reward.resources, out_events);
        }
        Command::Reset => {
            *world = World::new(world.settings.clone());
            out_events.push(Event::SessionReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{DayNightClock, GameState, World};
    use survival_core::{
        BuildingKind, BuildingSnapshot, EnemySnapshot, EnemyView, PlayerSnapshot,
        ResourceNodeSnapshot, ResourceNodeView, SessionPhase, Settings, Vec2,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Settings the world was created with.
    #[must_use]
    pub fn settings(world: &World) -> &Settings {
        &world.settings
    }

    /// Shared scalar state: stockpile, vitals and progression.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.state
    }

    /// Lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.state.phase()
    }

    /// Simulated time since session start.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Provides read-only access to the day/night clock.
    #[must_use]
    pub fn clock(world: &World) -> &DayNightClock {
        &world.clock
    }

    /// Planar location of the player.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player_position
    }

    /// Captures the player's position, vitals and stockpile.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player_position,
            facing: world.player_facing,
            health: world.state.health(),
            stamina: world.state.stamina(),
            level: world.state.level(),
            xp: world.state.xp(),
            resources: world.state.resources(),
        }
    }

    /// Captures a read-only view of every resource node.
    #[must_use]
    pub fn resource_nodes(world: &World) -> ResourceNodeView {
        ResourceNodeView::from_snapshots(
            world
                .registry
                .nodes()
                .map(|node| ResourceNodeSnapshot {
                    id: node.id,
                    kind: node.kind,
                    position: node.position,
                    respawn_at: node.respawn_at,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemies(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .registry
                .enemies()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    facing: enemy.facing,
                    health: enemy.health,
                    state: enemy.state,
                    last_attack_at: enemy.last_attack_at,
                })
                .collect(),
        )
    }

    /// Captures every placed building in identifier order.
    #[must_use]
    pub fn buildings(world: &World) -> Vec<BuildingSnapshot> {
        world
            .registry
            .buildings()
            .map(|building| BuildingSnapshot {
                id: building.id,
                kind: building.kind,
                position: building.position,
            })
            .collect()
    }

    /// Number of placed buildings of the provided kind.
    #[must_use]
    pub fn building_count(world: &World, kind: BuildingKind) -> usize {
        world
            .registry
            .buildings()
            .filter(|building| building.kind == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::{
        BuildingKind, EnemyState, MissionId, MovementInput, PlacementError, Recipe, ResourceBundle,
        ResourceKind, Reward,
    };

    fn world() -> World {
        World::new(Settings::default())
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn give(world: &mut World, bundle: ResourceBundle) {
        world.state.grant(bundle);
    }

    #[test]
    fn welcome_banner_is_exposed() {
        assert_eq!(query::welcome_banner(&world()), WELCOME_BANNER);
    }

    #[test]
    fn tick_advances_time_and_reports_it() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
        );
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16),
                now: Duration::from_millis(16),
            }]
        );
    }

    #[test]
    fn idle_movement_emits_nothing() {
        let mut world = world();
        assert!(run(&mut world, Command::MovePlayer {
            input: MovementInput::IDLE
        })
        .is_empty());
    }

    #[test]
    fn keyboard_movement_keeps_heading() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::MovePlayer {
                input: MovementInput::joystick(1.0, 0.0),
            },
        );
        let heading = query::player(&world).facing;
        let _ = run(
            &mut world,
            Command::MovePlayer {
                input: MovementInput::keyboard(true, false, false, false),
            },
        );
        let player = query::player(&world);
        assert_eq!(player.facing, heading);
        assert!((player.position.x - 0.2).abs() < 1e-6);
        assert!((player.position.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn collecting_marks_every_node_in_range() {
        let mut world = world();
        for position in [Vec2::new(1.0, 0.0), Vec2::new(0.0, -2.0), Vec2::new(5.0, 5.0)] {
            let _ = run(
                &mut world,
                Command::SpawnResourceNode {
                    kind: ResourceKind::Wood,
                    position,
                },
            );
        }

        let events = run(&mut world, Command::Collect);
        assert_eq!(events.len(), 2);
        assert_eq!(world.state.resources().wood, 2);

        let again = run(&mut world, Command::Collect);
        assert!(again.is_empty());
        assert_eq!(world.state.resources().wood, 2);
    }

    #[test]
    fn nodes_restore_only_after_deadline() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::SpawnResourceNode {
                kind: ResourceKind::Stone,
                position: Vec2::ZERO,
            },
        );
        let _ = run(&mut world, Command::Collect);
        let node = query::resource_nodes(&world)
            .iter()
            .next()
            .map(|snapshot| snapshot.id)
            .expect("node exists");

        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(29_999),
            },
        );
        assert!(run(&mut world, Command::RestoreResourceNode { node }).is_empty());

        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
            },
        );
        let events = run(&mut world, Command::RestoreResourceNode { node });
        assert!(matches!(
            events.as_slice(),
            [Event::ResourceNodeRestored { .. }]
        ));
    }

    #[test]
    fn unaffordable_wall_leaves_state_untouched() {
        let mut world = world();
        give(&mut world, ResourceBundle::new(3, 0, 0));
        let events = run(
            &mut world,
            Command::PlaceBuilding {
                kind: BuildingKind::Wall,
                position: Vec2::new(2.0, 2.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::BuildingRejected {
                reason: PlacementError::InsufficientResources,
                ..
            }]
        ));
        assert_eq!(world.state.resources().wood, 3);
        assert!(query::buildings(&world).is_empty());
    }

    #[test]
    fn affordable_tower_deducts_full_cost() {
        let mut world = world();
        give(&mut world, ResourceBundle::new(25, 15, 0));
        let events = run(
            &mut world,
            Command::PlaceBuilding {
                kind: BuildingKind::Tower,
                position: Vec2::new(2.0, 2.0),
            },
        );
        assert!(matches!(events.as_slice(), [Event::BuildingPlaced { .. }]));
        assert_eq!(world.state.resources(), ResourceBundle::new(5, 0, 0));
        assert_eq!(query::building_count(&world, BuildingKind::Tower), 1);
    }

    #[test]
    fn placement_outside_bounds_is_rejected() {
        let mut world = world();
        give(&mut world, ResourceBundle::new(5, 0, 0));
        let events = run(
            &mut world,
            Command::PlaceBuilding {
                kind: BuildingKind::Wall,
                position: Vec2::new(46.0, 0.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::BuildingRejected {
                reason: PlacementError::OutOfBounds,
                ..
            }]
        ));
        assert_eq!(world.state.resources().wood, 5);
    }

    #[test]
    fn building_limit_is_enforced_before_payment() {
        let mut settings = Settings::default();
        settings.buildings.max_buildings = 1;
        let mut world = World::new(settings);
        give(&mut world, ResourceBundle::new(6, 0, 0));
        let _ = run(
            &mut world,
            Command::PlaceBuilding {
                kind: BuildingKind::Floor,
                position: Vec2::ZERO,
            },
        );
        let events = run(
            &mut world,
            Command::PlaceBuilding {
                kind: BuildingKind::Floor,
                position: Vec2::ONE,
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::BuildingRejected {
                reason: PlacementError::LimitReached,
                ..
            }]
        ));
        assert_eq!(world.state.resources().wood, 3);
    }

    #[test]
    fn crafting_is_atomic() {
        let mut world = world();
        give(&mut world, ResourceBundle::new(3, 1, 0));
        let rejected = run(&mut world, Command::Craft { recipe: Recipe::Axe });
        assert!(matches!(rejected.as_slice(), [Event::CraftRejected { .. }]));
        assert_eq!(world.state.resources(), ResourceBundle::new(3, 1, 0));

        give(&mut world, ResourceBundle::new(0, 1, 0));
        let crafted = run(&mut world, Command::Craft { recipe: Recipe::Axe });
        assert_eq!(
            crafted,
            vec![Event::ItemCrafted {
                recipe: Recipe::Axe,
                total: 1
            }]
        );
        assert!(world.state.resources().is_empty());
        assert_eq!(world.state.crafted(Recipe::Axe), 1);
    }

    fn spawn_enemy(world: &mut World, position: Vec2) -> survival_core::EnemyId {
        let events = run(world, Command::SpawnEnemy { position });
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn attack_hits_every_enemy_in_range_and_repels_survivors() {
        let mut world = world();
        let near = spawn_enemy(&mut world, Vec2::new(1.0, 0.0));
        let other = spawn_enemy(&mut world, Vec2::new(0.0, 2.0));
        let far = spawn_enemy(&mut world, Vec2::new(10.0, 0.0));

        let events = run(&mut world, Command::Attack);
        assert_eq!(events.first(), Some(&Event::PlayerAttacked { hits: 2 }));

        let enemies = query::enemies(&world);
        let snapshot = |id| {
            enemies
                .iter()
                .find(|enemy| enemy.id == id)
                .copied()
                .expect("enemy alive")
        };
        assert_eq!(snapshot(near).health, 15);
        assert_eq!(snapshot(near).state, EnemyState::Chasing);
        assert!((snapshot(near).position.x - 1.5).abs() < 1e-6);
        assert!((snapshot(other).position.y - 2.5).abs() < 1e-6);
        assert_eq!(snapshot(far).health, 30);
        assert_eq!(snapshot(far).state, EnemyState::Wandering);
    }

    #[test]
    fn attack_cooldown_applies_even_without_hits() {
        let mut world = world();
        assert_eq!(
            run(&mut world, Command::Attack),
            vec![Event::PlayerAttacked { hits: 0 }]
        );
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(499),
            },
        );
        assert!(run(&mut world, Command::Attack).is_empty());
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
            },
        );
        assert_eq!(
            run(&mut world, Command::Attack),
            vec![Event::PlayerAttacked { hits: 0 }]
        );
    }

    #[test]
    fn defeating_an_enemy_awards_xp_and_food() {
        let mut world = world();
        let enemy = spawn_enemy(&mut world, Vec2::new(1.0, 1.0));
        let _ = run(&mut world, Command::Attack);
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
        );
        let events = run(&mut world, Command::Attack);

        let position = Vec2::new(1.0, 1.0) + Vec2::ONE.normalize() * 0.5;
        assert_eq!(
            events[..3],
            [
                Event::PlayerAttacked { hits: 1 },
                Event::EnemyDamaged {
                    enemy,
                    position,
                    damage: 15,
                    remaining: 0,
                },
                Event::EnemyDefeated { enemy, position },
            ]
        );
        assert!(events.contains(&Event::ExperienceGained { amount: 25, xp: 25 }));
        assert!(events.contains(&Event::ResourcesGranted {
            resources: ResourceBundle::new(0, 0, 2)
        }));
        assert!(query::enemies(&world).is_empty());
        assert_eq!(world.state.resources().food, 2);
    }

    #[test]
    fn strikes_respect_cooldown_and_end_the_session() {
        let mut world = world();
        let enemy = spawn_enemy(&mut world, Vec2::new(1.0, 0.0));
        let _ = run(
            &mut world,
            Command::DriveEnemy {
                enemy,
                state: EnemyState::Attacking,
                position: Vec2::new(1.0, 0.0),
                facing: 0.0,
            },
        );

        let mut game_overs = 0;
        for _ in 0..10 {
            let events = run(&mut world, Command::StrikePlayer { enemy });
            assert!(run(&mut world, Command::StrikePlayer { enemy }).is_empty());
            game_overs += events.iter().filter(|event| **event == Event::GameOver).count();
            let _ = run(
                &mut world,
                Command::Tick {
                    dt: Duration::from_secs(2),
                },
            );
        }

        assert_eq!(game_overs, 1);
        assert_eq!(world.state.health(), 0);
        assert_eq!(query::phase(&world), SessionPhase::GameOver);
        assert!(run(&mut world, Command::StrikePlayer { enemy }).is_empty());
        assert_eq!(world.state.health(), 0);
    }

    #[test]
    fn reset_restores_a_fresh_session() {
        let mut world = world();
        world.state.enter_game_over();
        assert_eq!(run(&mut world, Command::Reset), vec![Event::SessionReset]);
        assert_eq!(query::phase(&world), SessionPhase::Running);
        assert_eq!(query::now(&world), Duration::ZERO);
        assert_eq!(world.state.health(), 100);
    }

    #[test]
    fn mission_reward_is_granted_once() {
        let mut world = world();
        let reward = Reward {
            xp: 50,
            resources: ResourceBundle::new(5, 0, 0),
        };
        let first = run(
            &mut world,
            Command::CompleteMission {
                mission: MissionId::CollectWood,
                reward,
            },
        );
        assert_eq!(first.len(), 3);
        let second = run(
            &mut world,
            Command::CompleteMission {
                mission: MissionId::CollectWood,
                reward,
            },
        );
        assert!(second.is_empty());
        assert_eq!(world.state.xp(), 50);
        assert_eq!(world.state.resources().wood, 5);
    }
}
