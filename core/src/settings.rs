//! Static configuration surface loaded once per session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BuildingKind, ResourceBundle, WorldBounds};

/// Aggregated tuning knobs for every configurable aspect of a session.
///
/// Each section falls back to its defaults when omitted from a serialized
/// document, so partial configuration files only need to mention the values
/// they override.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// World bounds and scatter extents used during generation.
    pub world: WorldSettings,
    /// Player movement and vital limits.
    pub player: PlayerSettings,
    /// Collectible node generation, collection radius and respawn timing.
    pub resources: ResourceSettings,
    /// Building costs and placement limits.
    pub buildings: BuildingSettings,
    /// Day/night cycle pacing.
    pub day_cycle: DayCycleSettings,
    /// Player attack parameters and defeat rewards.
    pub combat: CombatSettings,
    /// Enemy stats, engagement radii and respawn timing.
    pub enemies: EnemySettings,
    /// Mission polling cadence.
    pub missions: MissionSettings,
}

impl Settings {
    /// Checks that every value lies inside the range the simulation relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("world.half_extent", self.world.half_extent)?;
        positive("world.resource_scatter", self.world.resource_scatter)?;
        positive("world.enemy_scatter", self.world.enemy_scatter)?;
        positive("player.move_speed", self.player.move_speed)?;
        positive("resources.collection_radius", self.resources.collection_radius)?;
        positive("combat.attack_range", self.combat.attack_range)?;
        positive("enemies.speed", self.enemies.speed)?;
        positive("enemies.chase_radius", self.enemies.chase_radius)?;
        positive("enemies.disengage_radius", self.enemies.disengage_radius)?;
        positive("enemies.attack_radius", self.enemies.attack_radius)?;

        if self.player.max_health == 0 {
            return Err(SettingsError::ZeroMaximum {
                field: "player.max_health",
            });
        }
        if self.enemies.max_health == 0 {
            return Err(SettingsError::ZeroMaximum {
                field: "enemies.max_health",
            });
        }

        non_zero_interval("resources.check_interval_ms", self.resources.check_interval_ms)?;
        non_zero_interval("enemies.ai_interval_ms", self.enemies.ai_interval_ms)?;
        non_zero_interval("missions.check_interval_ms", self.missions.check_interval_ms)?;
        if self.day_cycle.enabled {
            non_zero_interval("day_cycle.day_length_ms", self.day_cycle.day_length_ms)?;
        }

        if !(0.0..=1.0).contains(&self.enemies.wander_chance) {
            return Err(SettingsError::ProbabilityOutOfRange {
                field: "enemies.wander_chance",
                value: self.enemies.wander_chance,
            });
        }

        if self.enemies.attack_radius > self.enemies.chase_radius {
            return Err(SettingsError::AttackRadiusExceedsChase {
                attack: self.enemies.attack_radius,
                chase: self.enemies.chase_radius,
            });
        }
        if self.enemies.chase_radius > self.enemies.disengage_radius {
            return Err(SettingsError::ChaseRadiusExceedsDisengage {
                chase: self.enemies.chase_radius,
                disengage: self.enemies.disengage_radius,
            });
        }

        if self.resources.spawn_weights.total() == 0 {
            return Err(SettingsError::EmptySpawnWeights);
        }

        let hour = self.day_cycle.starting_hour;
        if !hour.is_finite() || !(0.0..24.0).contains(&hour) {
            return Err(SettingsError::StartingHourOutOfRange { hour });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NonPositive { field, value })
    }
}

fn non_zero_interval(field: &'static str, value: u64) -> Result<(), SettingsError> {
    if value == 0 {
        Err(SettingsError::ZeroInterval { field })
    } else {
        Ok(())
    }
}

/// World bounds and generation extents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Half the side length of the square playable area; both axes are clamped to `[-half_extent, half_extent]`.
    pub half_extent: f32,
    /// Half extent of the square in which resource nodes are scattered.
    pub resource_scatter: f32,
    /// Half extent of the square in which enemies spawn.
    pub enemy_scatter: f32,
}

impl WorldSettings {
    /// Playable area derived from `half_extent`.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.half_extent)
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            half_extent: 45.0,
            resource_scatter: 40.0,
            enemy_scatter: 30.0,
        }
    }
}

/// Player movement and vital limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Distance covered per tick at full input deflection.
    pub move_speed: f32,
    /// Health restored on level up and at session start.
    pub max_health: u32,
    /// Stamina restored on level up and at session start.
    pub max_stamina: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            max_health: 100,
            max_stamina: 100,
        }
    }
}

/// Collectible node parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    /// Number of nodes created at world generation.
    pub node_count: u32,
    /// Relative weights used when drawing each node's resource kind.
    pub spawn_weights: ResourceBundle,
    /// Radius around the player inside which nodes are collected.
    pub collection_radius: f32,
    /// Delay before a collected node becomes available again.
    pub respawn_time_ms: u64,
    /// Interval between two respawn sweeps.
    pub check_interval_ms: u64,
}

impl ResourceSettings {
    /// Delay before a collected node becomes available again.
    #[must_use]
    pub const fn respawn_time(&self) -> Duration {
        Duration::from_millis(self.respawn_time_ms)
    }

    /// Interval between two respawn sweeps.
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            node_count: 15,
            spawn_weights: ResourceBundle::new(20, 15, 10),
            collection_radius: 2.5,
            respawn_time_ms: 30_000,
            check_interval_ms: 1_000,
        }
    }
}

/// Building costs and limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingSettings {
    /// Resources deducted when a wall is placed.
    pub wall: ResourceBundle,
    /// Resources deducted when a floor is placed.
    pub floor: ResourceBundle,
    /// Resources deducted when a door is placed.
    pub door: ResourceBundle,
    /// Resources deducted when a chest is placed.
    pub chest: ResourceBundle,
    /// Resources deducted when a tower is placed.
    pub tower: ResourceBundle,
    /// Maximum number of buildings that may exist at once.
    pub max_buildings: u32,
}

impl BuildingSettings {
    /// Looks up the placement cost for the provided building kind.
    #[must_use]
    pub const fn cost_of(&self, kind: BuildingKind) -> ResourceBundle {
        match kind {
            BuildingKind::Wall => self.wall,
            BuildingKind::Floor => self.floor,
            BuildingKind::Door => self.door,
            BuildingKind::Chest => self.chest,
            BuildingKind::Tower => self.tower,
        }
    }
}

impl Default for BuildingSettings {
    fn default() -> Self {
        Self {
            wall: ResourceBundle::new(5, 0, 0),
            floor: ResourceBundle::new(3, 0, 0),
            door: ResourceBundle::new(8, 0, 0),
            chest: ResourceBundle::new(10, 5, 0),
            tower: ResourceBundle::new(20, 15, 0),
            max_buildings: 50,
        }
    }
}

/// Day/night cycle pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleSettings {
    /// Whether the game clock advances at all.
    pub enabled: bool,
    /// Real duration of a full 24 hour game day.
    pub day_length_ms: u64,
    /// Game hour at session start, in `[0, 24)`.
    pub starting_hour: f32,
}

impl DayCycleSettings {
    /// Game hours that elapse per simulated second.
    #[must_use]
    pub fn hours_per_second(&self) -> f32 {
        if !self.enabled || self.day_length_ms == 0 {
            return 0.0;
        }
        24.0 / (self.day_length_ms as f32 / 1_000.0)
    }
}

impl Default for DayCycleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            day_length_ms: 1_200_000,
            starting_hour: 12.0,
        }
    }
}

/// Player attack parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Radius around the player inside which enemies are hit.
    pub attack_range: f32,
    /// Damage applied to every enemy hit by one attack.
    pub damage: u32,
    /// Delay after any attack before the next one is accepted.
    pub cooldown_ms: u64,
    /// Distance a surviving enemy is pushed away from the player.
    pub knockback: f32,
    /// Experience awarded per defeated enemy.
    pub defeat_xp: u32,
    /// Resources awarded per defeated enemy.
    pub defeat_bonus: ResourceBundle,
}

impl CombatSettings {
    /// Delay after any attack before the next one is accepted.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            attack_range: 2.5,
            damage: 15,
            cooldown_ms: 500,
            knockback: 0.5,
            defeat_xp: 25,
            defeat_bonus: ResourceBundle::new(0, 0, 2),
        }
    }
}

/// Enemy stats and behaviour thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    /// Enemies spawned when the session starts.
    pub initial_count: u32,
    /// Health each enemy spawns with.
    pub max_health: u32,
    /// Damage applied to the player per strike.
    pub damage: u32,
    /// Distance covered per AI update while moving.
    pub speed: f32,
    /// Minimum delay between two strikes by the same enemy.
    pub attack_cooldown_ms: u64,
    /// Delay between a defeat and the replacement spawn.
    pub respawn_delay_ms: u64,
    /// Distance below which a wandering enemy starts chasing.
    pub chase_radius: f32,
    /// Distance above which a chasing enemy gives up.
    pub disengage_radius: f32,
    /// Distance at or below which an enemy attacks.
    pub attack_radius: f32,
    /// Probability per AI update that a wandering enemy takes a step.
    pub wander_chance: f64,
    /// Interval between two AI updates.
    pub ai_interval_ms: u64,
}

impl EnemySettings {
    /// Minimum delay between two strikes by the same enemy.
    #[must_use]
    pub const fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.attack_cooldown_ms)
    }

    /// Delay between a defeat and the replacement spawn.
    #[must_use]
    pub const fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }

    /// Interval between two AI updates.
    #[must_use]
    pub const fn ai_interval(&self) -> Duration {
        Duration::from_millis(self.ai_interval_ms)
    }
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            initial_count: 5,
            max_health: 30,
            damage: 10,
            speed: 0.05,
            attack_cooldown_ms: 2_000,
            respawn_delay_ms: 10_000,
            chase_radius: 8.0,
            disengage_radius: 12.0,
            attack_radius: 2.5,
            wander_chance: 0.02,
            ai_interval_ms: 100,
        }
    }
}

/// Mission polling cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    /// Interval between two collection-progress polls.
    pub check_interval_ms: u64,
}

impl MissionSettings {
    /// Interval between two collection-progress polls.
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            check_interval_ms: 2_000,
        }
    }
}

/// Reasons a settings document is rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// A distance or speed was zero, negative or not finite.
    #[error("`{field}` must be a positive finite number (received {value})")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A polling interval or duration was zero.
    #[error("`{field}` must be greater than zero")]
    ZeroInterval {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// A health maximum was zero.
    #[error("`{field}` must be greater than zero")]
    ZeroMaximum {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// A probability fell outside `[0, 1]`.
    #[error("`{field}` must lie in [0, 1] (received {value})")]
    ProbabilityOutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// Enemies would attack from farther away than they start chasing.
    #[error("attack radius {attack} exceeds chase radius {chase}")]
    AttackRadiusExceedsChase {
        /// Configured attack radius.
        attack: f32,
        /// Configured chase radius.
        chase: f32,
    },
    /// Enemies would disengage before they engage.
    #[error("chase radius {chase} exceeds disengage radius {disengage}")]
    ChaseRadiusExceedsDisengage {
        /// Configured chase radius.
        chase: f32,
        /// Configured disengage radius.
        disengage: f32,
    },
    /// Every resource spawn weight was zero.
    #[error("at least one resource spawn weight must be positive")]
    EmptySpawnWeights,
    /// The starting hour was outside `[0, 24)`.
    #[error("starting hour {hour} must lie in [0, 24)")]
    StartingHourOutOfRange {
        /// Configured starting hour.
        hour: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn default_day_length_matches_two_hundredths_of_an_hour_per_second() {
        let rate = DayCycleSettings::default().hours_per_second();
        assert!((rate - 0.02).abs() < 1e-6);
    }

    #[test]
    fn disabled_cycle_freezes_the_clock() {
        let settings = DayCycleSettings {
            enabled: false,
            ..DayCycleSettings::default()
        };
        assert_eq!(settings.hours_per_second(), 0.0);
    }

    #[test]
    fn rejects_inverted_engagement_radii() {
        let mut settings = Settings::default();
        settings.enemies.chase_radius = 20.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ChaseRadiusExceedsDisengage {
                chase: 20.0,
                disengage: 12.0,
            })
        );
    }

    #[test]
    fn rejects_non_finite_collection_radius() {
        let mut settings = Settings::default();
        settings.resources.collection_radius = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonPositive {
                field: "resources.collection_radius",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_weights() {
        let mut settings = Settings::default();
        settings.resources.spawn_weights = ResourceBundle::default();
        assert_eq!(settings.validate(), Err(SettingsError::EmptySpawnWeights));
    }

    #[test]
    fn building_costs_follow_the_default_table() {
        let buildings = BuildingSettings::default();
        assert_eq!(buildings.cost_of(BuildingKind::Wall), ResourceBundle::new(5, 0, 0));
        assert_eq!(
            buildings.cost_of(BuildingKind::Tower),
            ResourceBundle::new(20, 15, 0)
        );
    }

    #[test]
    fn settings_survive_bincode() {
        let mut settings = Settings::default();
        settings.enemies.wander_chance = 0.5;
        settings.buildings.max_buildings = 7;
        let bytes = bincode::serialize(&settings).expect("serialize");
        let restored: Settings = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, settings);
    }
}
