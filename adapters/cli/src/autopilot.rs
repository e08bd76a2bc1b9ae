//! Scripted player used by the headless runner.

use survival_core::{BuildingKind, MovementInput, Vec2};
use survival_simulation::Simulation;
use survival_world::query;
use tracing::debug;

/// Distance in front of the player where walls are placed.
const WALL_OFFSET: f32 = 2.0;

/// Greedy player that gathers, fights back and fortifies.
///
/// Every tick it attacks when an enemy is in range, collects when a node is
/// in reach, builds a wall whenever one is affordable, and otherwise walks
/// toward the nearest available node.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    collected: u32,
    hits: u32,
    walls: u32,
    rejected_walls: u32,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn collected(&self) -> u32 {
        self.collected
    }

    pub(crate) fn hits(&self) -> u32 {
        self.hits
    }

    pub(crate) fn walls(&self) -> u32 {
        self.walls
    }

    pub(crate) fn rejected_walls(&self) -> u32 {
        self.rejected_walls
    }

    /// Issues this tick's requests and sets the movement input.
    pub(crate) fn drive(&mut self, simulation: &mut Simulation) {
        let world = simulation.world();
        let settings = query::settings(world);
        let player = query::player_position(world);
        let attack_range = settings.combat.attack_range;
        let reach = settings.resources.collection_radius;
        let wall_cost = settings.buildings.cost_of(BuildingKind::Wall);
        let building_room = u32::try_from(query::buildings(world).len())
            .map_or(false, |count| count < settings.buildings.max_buildings);
        let bounds = settings.world.bounds();

        let enemy_in_range = query::enemies(world)
            .iter()
            .any(|enemy| enemy.position.distance(player) <= attack_range);
        let target = query::resource_nodes(world)
            .iter()
            .filter(|node| node.is_available())
            .map(|node| node.position)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));

        if enemy_in_range {
            if let Some(hits) = simulation.request_attack() {
                self.hits += hits;
            }
        }

        if target.is_some_and(|node| node.distance(player) <= reach) {
            self.collected += simulation.request_collect();
        }

        let affordable = query::game_state(simulation.world()).can_afford(&wall_cost);
        if building_room && affordable {
            let site = bounds.clamp(player + Vec2::new(WALL_OFFSET, 0.0));
            match simulation.request_build(BuildingKind::Wall, site) {
                Some(building) => {
                    debug!(building = building.get(), "autopilot built a wall");
                    self.walls += 1;
                }
                None => self.rejected_walls += 1,
            }
        }

        simulation.set_movement_input(steer(player, target));
    }
}

/// Joystick input walking from `player` toward `target`.
///
/// The joystick's y axis points away from world z, so it is negated.
fn steer(player: Vec2, target: Option<Vec2>) -> MovementInput {
    match target {
        Some(target) => {
            let direction = (target - player).normalize_or_zero();
            if direction == Vec2::ZERO {
                MovementInput::IDLE
            } else {
                MovementInput::joystick(direction.x, -direction.y)
            }
        }
        None => MovementInput::IDLE,
    }
}
