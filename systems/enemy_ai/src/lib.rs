#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-enemy behaviour state machine driven by distance to the player.
//!
//! The system polls on its own cadence. Each update first runs the behaviour
//! of the enemy's current state (wander, chase or attack) and then evaluates
//! the transition using the distance measured before the enemy moved. The
//! outcome is reported to the world as [`Command::DriveEnemy`] and, for
//! enemies whose attack cooldown elapsed, [`Command::StrikePlayer`].

use std::{f32::consts::TAU, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use survival_core::{
    settings::EnemySettings, Cadence, Command, EnemySnapshot, EnemyState, EnemyView, Event, Vec2,
    WorldBounds,
};
use tracing::trace;

/// Engagement thresholds and movement parameters shared by all enemies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Distance below which a wandering enemy starts chasing.
    pub chase_radius: f32,
    /// Distance above which a chasing enemy gives up.
    pub disengage_radius: f32,
    /// Distance at or below which an enemy attacks.
    pub attack_radius: f32,
    /// Distance covered per update while moving.
    pub speed: f32,
    /// Probability per update that a wandering enemy takes a step.
    pub wander_chance: f64,
    /// Minimum delay between two strikes by the same enemy.
    pub attack_cooldown: Duration,
    /// Interval between two updates.
    pub interval: Duration,
    /// Area enemies are kept inside while wandering or chasing.
    pub bounds: WorldBounds,
}

impl Config {
    /// Derives the configuration from the enemy settings section.
    #[must_use]
    pub fn from_settings(settings: &EnemySettings, bounds: WorldBounds) -> Self {
        Self {
            chase_radius: settings.chase_radius,
            disengage_radius: settings.disengage_radius,
            attack_radius: settings.attack_radius,
            speed: settings.speed,
            wander_chance: settings.wander_chance,
            attack_cooldown: settings.attack_cooldown(),
            interval: settings.ai_interval(),
            bounds,
        }
    }
}

/// Computes the state an enemy holds after an update at distance `distance`.
#[must_use]
pub fn next_state(state: EnemyState, distance: f32, config: &Config) -> EnemyState {
    match state {
        EnemyState::Wandering if distance < config.chase_radius => EnemyState::Chasing,
        EnemyState::Chasing if distance > config.disengage_radius => EnemyState::Wandering,
        EnemyState::Chasing if distance <= config.attack_radius => EnemyState::Attacking,
        EnemyState::Attacking if distance > config.attack_radius => EnemyState::Chasing,
        unchanged => unchanged,
    }
}

/// Pure system that steers every live enemy.
#[derive(Debug)]
pub struct EnemyAi {
    config: Config,
    cadence: Cadence,
    now: Duration,
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates the system with a seeded random source for wandering.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            cadence: Cadence::new(config.interval),
            config,
            now: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes world events and the current enemy view to emit steering commands.
    ///
    /// When more than one update is due the updates are chained on a local
    /// copy of the enemies, and a single command per enemy reports the result.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt, now } => {
                    elapsed = elapsed.saturating_add(*dt);
                    self.now = *now;
                }
                Event::SessionReset => {
                    self.cadence.reset();
                    self.now = Duration::ZERO;
                    elapsed = Duration::ZERO;
                }
                _ => {}
            }
        }

        let updates = self.cadence.advance(elapsed);
        if updates == 0 || enemies.is_empty() {
            return;
        }

        for original in enemies.iter() {
            let mut enemy = *original;
            let mut strikes = false;
            for _ in 0..updates {
                strikes |= self.update(&mut enemy, player);
            }

            if enemy.state != original.state
                || enemy.position != original.position
                || enemy.facing != original.facing
            {
                out.push(Command::DriveEnemy {
                    enemy: enemy.id,
                    state: enemy.state,
                    position: enemy.position,
                    facing: enemy.facing,
                });
            }
            if strikes {
                trace!(enemy = enemy.id.get(), "enemy strikes");
                out.push(Command::StrikePlayer { enemy: enemy.id });
            }
        }
    }

    /// Runs one update for a single enemy; returns whether it strikes the player.
    fn update(&mut self, enemy: &mut EnemySnapshot, player: Vec2) -> bool {
        let distance = enemy.position.distance(player);
        let mut strikes = false;

        match enemy.state {
            EnemyState::Wandering => {
                if self.rng.gen::<f64>() < self.config.wander_chance {
                    let angle = self.rng.gen_range(0.0..TAU);
                    let heading = Vec2::new(angle.cos(), angle.sin());
                    enemy.position = self
                        .config
                        .bounds
                        .clamp(enemy.position + heading * self.config.speed);
                }
            }
            EnemyState::Chasing => {
                let direction = (player - enemy.position).normalize_or_zero();
                enemy.position = self
                    .config
                    .bounds
                    .clamp(enemy.position + direction * self.config.speed);
                if direction != Vec2::ZERO {
                    enemy.facing = direction.x.atan2(direction.y);
                }
            }
            EnemyState::Attacking => {
                let ready = enemy.last_attack_at.map_or(true, |last| {
                    self.now.saturating_sub(last) >= self.config.attack_cooldown
                });
                if ready {
                    enemy.last_attack_at = Some(self.now);
                    strikes = true;
                }
            }
        }

        enemy.state = next_state(enemy.state, distance, &self.config);
        strikes
    }
}
