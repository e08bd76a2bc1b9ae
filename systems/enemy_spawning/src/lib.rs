#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy population management: the opening wave and delayed replacements.
//!
//! Every defeat schedules one replacement spawn a fixed delay later. Deadlines
//! are measured in simulated time, so replacements only appear while ticks
//! keep arriving, and [`EnemySpawning::cancel_pending`] drops any that have
//! not fired yet.

use std::{collections::VecDeque, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use survival_core::{settings::EnemySettings, Command, Event, Vec2};
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    initial_count: u32,
    scatter: f32,
    respawn_delay: Duration,
}

impl Config {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(initial_count: u32, scatter: f32, respawn_delay: Duration) -> Self {
        Self {
            initial_count,
            scatter,
            respawn_delay,
        }
    }

    /// Derives the configuration from the enemy settings section.
    #[must_use]
    pub fn from_settings(settings: &EnemySettings, scatter: f32) -> Self {
        Self::new(settings.initial_count, scatter, settings.respawn_delay())
    }
}

/// Pure system that emits enemy spawn commands.
#[derive(Debug)]
pub struct EnemySpawning {
    config: Config,
    now: Duration,
    pending: VecDeque<Duration>,
    rng: ChaCha8Rng,
}

impl EnemySpawning {
    /// Creates the system with a seeded random source for spawn positions.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            config,
            now: Duration::ZERO,
            pending: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits the spawn commands for the enemies present at session start.
    pub fn initial_wave(&mut self, out: &mut Vec<Command>) {
        for _ in 0..self.config.initial_count {
            let position = self.random_position();
            out.push(Command::SpawnEnemy { position });
        }
    }

    /// Consumes world events, scheduling replacements and emitting due spawns.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { now, .. } => {
                    self.now = *now;
                    self.release_due(out);
                }
                Event::EnemyDefeated { enemy, .. } => {
                    let deadline = self.now.saturating_add(self.config.respawn_delay);
                    debug!(enemy = enemy.get(), ?deadline, "replacement scheduled");
                    self.pending.push_back(deadline);
                }
                Event::SessionReset => {
                    self.now = Duration::ZERO;
                    self.pending.clear();
                }
                _ => {}
            }
        }
    }

    /// Number of replacement spawns waiting for their deadline.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every scheduled replacement and returns how many were cancelled.
    pub fn cancel_pending(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    fn release_due(&mut self, out: &mut Vec<Command>) {
        while matches!(self.pending.front(), Some(deadline) if *deadline <= self.now) {
            let _ = self.pending.pop_front();
            let position = self.random_position();
            out.push(Command::SpawnEnemy { position });
        }
    }

    fn random_position(&mut self) -> Vec2 {
        let extent = self.config.scatter.abs();
        Vec2::new(
            self.rng.gen_range(-extent..=extent),
            self.rng.gen_range(-extent..=extent),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::EnemyId;

    fn spawning() -> EnemySpawning {
        EnemySpawning::new(Config::new(5, 30.0, Duration::from_secs(10)), 21)
    }

    fn time(now_ms: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(100),
            now: Duration::from_millis(now_ms),
        }
    }

    fn defeat() -> Event {
        Event::EnemyDefeated {
            enemy: EnemyId::new(0),
            position: Vec2::ZERO,
        }
    }

    #[test]
    fn initial_wave_scatters_within_extent() {
        let mut spawning = spawning();
        let mut commands = Vec::new();
        spawning.initial_wave(&mut commands);

        assert_eq!(commands.len(), 5);
        for command in commands {
            match command {
                Command::SpawnEnemy { position } => {
                    assert!(position.x.abs() <= 30.0 && position.y.abs() <= 30.0);
                }
                other => panic!("unexpected command emitted: {other:?}"),
            }
        }
    }

    #[test]
    fn replacement_spawns_after_delay() {
        let mut spawning = spawning();
        let mut commands = Vec::new();
        spawning.handle(&[time(1_000), defeat()], &mut commands);
        assert!(commands.is_empty());
        assert_eq!(spawning.pending(), 1);

        spawning.handle(&[time(10_900)], &mut commands);
        assert!(commands.is_empty());

        spawning.handle(&[time(11_000)], &mut commands);
        assert_eq!(commands.len(), 1);
        assert_eq!(spawning.pending(), 0);
    }

    #[test]
    fn cancelled_replacements_never_spawn() {
        let mut spawning = spawning();
        let mut commands = Vec::new();
        spawning.handle(&[defeat(), defeat()], &mut commands);
        assert_eq!(spawning.cancel_pending(), 2);

        spawning.handle(&[time(60_000)], &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn reset_discards_schedule() {
        let mut spawning = spawning();
        let mut commands = Vec::new();
        spawning.handle(&[time(5_000), defeat(), Event::SessionReset], &mut commands);
        assert_eq!(spawning.pending(), 0);
    }
}
