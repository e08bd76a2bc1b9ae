#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource node generation and respawn scheduling.
//!
//! World generation scatters a fixed number of nodes with a weighted kind
//! distribution. Afterwards the system sweeps on its own cadence and restores
//! every collected node whose respawn deadline has passed.

use std::time::Duration;

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use survival_core::{
    settings::ResourceSettings, Cadence, Command, Event, ResourceBundle, ResourceKind,
    ResourceNodeView, Vec2,
};
use tracing::{debug, warn};

/// Configuration parameters required to construct the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    node_count: u32,
    weights: ResourceBundle,
    scatter: f32,
    check_interval: Duration,
}

impl Config {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(
        node_count: u32,
        weights: ResourceBundle,
        scatter: f32,
        check_interval: Duration,
    ) -> Self {
        Self {
            node_count,
            weights,
            scatter,
            check_interval,
        }
    }

    /// Derives the configuration from the resource settings section.
    #[must_use]
    pub fn from_settings(settings: &ResourceSettings, scatter: f32) -> Self {
        Self::new(
            settings.node_count,
            settings.spawn_weights,
            scatter,
            settings.check_interval(),
        )
    }
}

/// Pure system that seeds resource nodes and restores them after collection.
#[derive(Debug)]
pub struct ResourceSpawner {
    config: Config,
    cadence: Cadence,
    now: Duration,
    rng: ChaCha8Rng,
}

impl ResourceSpawner {
    /// Creates the spawner with a seeded random source for generation.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            cadence: Cadence::new(config.check_interval),
            config,
            now: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits the spawn commands that populate a fresh world.
    pub fn generate(&mut self, out: &mut Vec<Command>) {
        let weights: Vec<u32> = ResourceKind::ALL
            .iter()
            .map(|kind| self.config.weights.amount(*kind))
            .collect();
        let distribution = match WeightedIndex::new(&weights) {
            Ok(distribution) => distribution,
            Err(error) => {
                warn!(%error, "resource weights unusable; world left empty");
                return;
            }
        };

        let extent = self.config.scatter.abs();
        for _ in 0..self.config.node_count {
            let kind = ResourceKind::ALL[distribution.sample(&mut self.rng)];
            let position = Vec2::new(
                self.rng.gen_range(-extent..=extent),
                self.rng.gen_range(-extent..=extent),
            );
            out.push(Command::SpawnResourceNode { kind, position });
        }
        debug!(count = self.config.node_count, "resource nodes generated");
    }

    /// Consumes world events and the node view to emit restore commands.
    pub fn handle(&mut self, events: &[Event], nodes: &ResourceNodeView, out: &mut Vec<Command>) {
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

        if self.cadence.advance(elapsed) == 0 {
            return;
        }

        for node in nodes.iter() {
            if matches!(node.respawn_at, Some(deadline) if deadline <= self.now) {
                out.push(Command::RestoreResourceNode { node: node.id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(weights: ResourceBundle) -> Config {
        Config::new(200, weights, 40.0, Duration::from_secs(1))
    }

    #[test]
    fn generation_respects_count_and_extent() {
        let mut spawner = ResourceSpawner::new(config(ResourceBundle::new(20, 15, 10)), 9);
        let mut commands = Vec::new();
        spawner.generate(&mut commands);

        assert_eq!(commands.len(), 200);
        for command in &commands {
            match command {
                Command::SpawnResourceNode { position, .. } => {
                    assert!(position.x.abs() <= 40.0);
                    assert!(position.y.abs() <= 40.0);
                }
                other => panic!("unexpected command emitted: {other:?}"),
            }
        }
    }

    #[test]
    fn zero_weight_kinds_never_spawn() {
        let mut spawner = ResourceSpawner::new(config(ResourceBundle::new(1, 0, 1)), 4);
        let mut commands = Vec::new();
        spawner.generate(&mut commands);

        assert!(commands.iter().all(|command| !matches!(
            command,
            Command::SpawnResourceNode {
                kind: ResourceKind::Stone,
                ..
            }
        )));
    }

    #[test]
    fn all_zero_weights_generate_nothing() {
        let mut spawner = ResourceSpawner::new(config(ResourceBundle::default()), 4);
        let mut commands = Vec::new();
        spawner.generate(&mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn same_seed_generates_same_world() {
        let generate = |seed| {
            let mut spawner = ResourceSpawner::new(config(ResourceBundle::new(20, 15, 10)), seed);
            let mut commands = Vec::new();
            spawner.generate(&mut commands);
            commands
        };
        assert_eq!(generate(42), generate(42));
    }
}
