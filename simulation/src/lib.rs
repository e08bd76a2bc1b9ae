#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level orchestration of a survival session.
//!
//! [`Simulation`] owns the world and every system. Each tick runs in a fixed
//! order: queued movement, the clock, resource respawns, enemy respawns and
//! AI, the game-over check, and finally mission polling. Events produced by
//! one step are fed back through the systems until nothing new happens, and
//! every event is translated into requests on the optional presentation
//! sinks.

mod effects;

use std::time::Duration;

use survival_core::{
    BuildingId, BuildingKind, Command, Event, MovementInput, Recipe, SessionPhase, Settings,
    SettingsError, Vec2,
};
use survival_presentation::{AudioSink, Color, EntityRef, SceneSink};
use survival_system_builder::{BuildMode, Builder};
use survival_system_enemy_ai::{self as enemy_ai, EnemyAi};
use survival_system_enemy_spawning::{self as enemy_spawning, EnemySpawning};
use survival_system_missions::MissionTracker;
use survival_system_resource_spawner::{self as resource_spawner, ResourceSpawner};
use survival_world::{self as world, query, World};
use tracing::{debug, info};

use effects::Presenter;

const RESOURCE_STREAM: u64 = 0x5245_534f_5552_4345;
const ENEMY_SPAWN_STREAM: u64 = 0x454e_454d_5953_504e;
const ENEMY_AI_STREAM: u64 = 0x454e_454d_5941_4931;

/// Systems rebuilt from the session seed on every reset.
#[derive(Debug)]
struct Systems {
    builder: Builder,
    resources: ResourceSpawner,
    enemy_spawning: EnemySpawning,
    enemy_ai: EnemyAi,
    missions: MissionTracker,
}

impl Systems {
    fn new(settings: &Settings, seed: u64) -> Self {
        let bounds = settings.world.bounds();
        Self {
            builder: Builder::new(),
            resources: ResourceSpawner::new(
                resource_spawner::Config::from_settings(
                    &settings.resources,
                    settings.world.resource_scatter,
                ),
                seed ^ RESOURCE_STREAM,
            ),
            enemy_spawning: EnemySpawning::new(
                enemy_spawning::Config::from_settings(
                    &settings.enemies,
                    settings.world.enemy_scatter,
                ),
                seed ^ ENEMY_SPAWN_STREAM,
            ),
            enemy_ai: EnemyAi::new(
                enemy_ai::Config::from_settings(&settings.enemies, bounds),
                seed ^ ENEMY_AI_STREAM,
            ),
            missions: MissionTracker::new(settings.missions.check_interval()),
        }
    }
}

/// A single deterministic survival session.
pub struct Simulation {
    seed: u64,
    world: World,
    systems: Systems,
    presenter: Presenter,
    input: MovementInput,
    started: bool,
    journal: Option<Vec<Event>>,
}

impl Simulation {
    /// Creates a session from validated settings and a seed.
    ///
    /// The world starts empty; call [`Simulation::start`] after attaching the
    /// presentation sinks to populate it.
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            seed,
            systems: Systems::new(&settings, seed),
            world: World::new(settings),
            presenter: Presenter::default(),
            input: MovementInput::IDLE,
            started: false,
            journal: None,
        })
    }

    /// Attaches the scene collaborator.
    #[must_use]
    pub fn with_scene_sink(mut self, sink: impl SceneSink + 'static) -> Self {
        self.presenter.set_scene(Box::new(sink));
        self
    }

    /// Attaches the audio collaborator.
    #[must_use]
    pub fn with_audio_sink(mut self, sink: impl AudioSink + 'static) -> Self {
        self.presenter.set_audio(Box::new(sink));
        self
    }

    /// Records every applied event for [`Simulation::take_events`].
    #[must_use]
    pub fn with_event_journal(mut self) -> Self {
        self.journal = Some(Vec::new());
        self
    }

    /// Populates the world with resource nodes and the initial enemies.
    ///
    /// Calling it more than once per session has no effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.presenter.text(
            query::welcome_banner(&self.world),
            query::player_position(&self.world),
            Color::NOTICE,
        );

        let mut commands = Vec::new();
        self.systems.resources.generate(&mut commands);
        self.systems.enemy_spawning.initial_wave(&mut commands);
        let _ = self.submit_all(commands);

        info!(
            seed = self.seed,
            nodes = query::resource_nodes(&self.world).iter().count(),
            enemies = query::enemies(&self.world).len(),
            "session started"
        );
    }

    /// Advances the session by `delta_seconds`.
    ///
    /// Negative or non-finite values count as zero elapsed time.
    pub fn tick(&mut self, delta_seconds: f32) {
        let dt = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            Duration::try_from_secs_f32(delta_seconds).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        self.tick_duration(dt);
    }

    /// Advances the session by `dt`.
    pub fn tick_duration(&mut self, dt: Duration) {
        if self.is_game_over() {
            return;
        }

        if !self.input.is_idle() {
            let _ = self.submit(Command::MovePlayer { input: self.input });
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.pump(events);
    }

    /// Replaces the movement input applied at the start of every tick.
    pub fn set_movement_input(&mut self, input: MovementInput) {
        self.input = input;
    }

    /// Collects every available node around the player.
    ///
    /// Returns the number of nodes collected.
    pub fn request_collect(&mut self) -> u32 {
        let events = self.submit(Command::Collect);
        let collected = events
            .iter()
            .filter(|event| matches!(event, Event::ResourceCollected { .. }))
            .count();
        u32::try_from(collected).unwrap_or(u32::MAX)
    }

    /// Places a building of `kind` at `position`, bypassing build mode.
    ///
    /// Returns the new building, or `None` when the world rejected it.
    pub fn request_build(&mut self, kind: BuildingKind, position: Vec2) -> Option<BuildingId> {
        let events = self.submit(Command::PlaceBuilding { kind, position });
        placed_building(&events)
    }

    /// Selects a building type for placement, or leaves build mode.
    pub fn toggle_build_mode(&mut self, kind: Option<BuildingKind>) -> BuildMode {
        let mode = self.systems.builder.toggle(kind);
        debug!(?mode, "build mode toggled");
        mode
    }

    /// Places the building selected in build mode at `position`.
    ///
    /// Returns `None` outside build mode or when the world rejected it.
    pub fn place_selected(&mut self, position: Vec2) -> Option<BuildingId> {
        let mut commands = Vec::new();
        if !self.systems.builder.place(position, &mut commands) {
            return None;
        }
        let events = self.submit_all(commands);
        placed_building(&events)
    }

    /// Attacks every enemy in range of the player.
    ///
    /// Returns the number of enemies hit, or `None` when the attack did not
    /// happen because of the cooldown or the session being over.
    pub fn request_attack(&mut self) -> Option<u32> {
        let events = self.submit(Command::Attack);
        events.iter().find_map(|event| match event {
            Event::PlayerAttacked { hits } => Some(*hits),
            _ => None,
        })
    }

    /// Crafts an item from the recipe table.
    ///
    /// Returns whether the item was crafted.
    pub fn request_craft(&mut self, recipe: Recipe) -> bool {
        let events = self.submit(Command::Craft { recipe });
        events
            .iter()
            .any(|event| matches!(event, Event::ItemCrafted { .. }))
    }

    /// Starts the session over from the same seed.
    pub fn reset(&mut self) {
        self.clear_scene();

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Reset, &mut events);
        self.systems = Systems::new(query::settings(&self.world), self.seed);
        self.input = MovementInput::IDLE;
        self.started = false;
        self.pump(events);

        info!(seed = self.seed, "session reset");
        self.start();
    }

    /// Cancels scheduled enemy respawns and drops queued input.
    ///
    /// Returns the number of cancelled respawns.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.systems.enemy_spawning.cancel_pending();
        self.input = MovementInput::IDLE;
        info!(cancelled, "session torn down");
        cancelled
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the player has died.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::phase(&self.world) == SessionPhase::GameOver
    }

    /// Current build mode.
    #[must_use]
    pub fn build_mode(&self) -> BuildMode {
        self.systems.builder.mode()
    }

    /// Mission progress.
    #[must_use]
    pub fn missions(&self) -> &MissionTracker {
        &self.systems.missions
    }

    /// Enemy respawns waiting for their deadline.
    #[must_use]
    pub fn pending_enemy_respawns(&self) -> usize {
        self.systems.enemy_spawning.pending()
    }

    /// Seed the session was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Every event applied since the last call, in order.
    ///
    /// Always empty unless the journal was enabled at construction.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        self.submit_all(vec![command])
    }

    /// Applies `commands` and runs the resulting reactions to completion.
    ///
    /// Returns the events the commands produced directly.
    fn submit_all(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.pump(events.clone());
        events
    }

    /// Feeds `events` through every system until no new events appear.
    fn pump(&mut self, mut events: Vec<Event>) {
        let mut commands = Vec::new();
        while !events.is_empty() {
            self.presenter.present(&events, &self.world);
            self.systems.builder.handle(&events);

            let mut next = Vec::new();
            self.systems.resources.handle(
                &events,
                &query::resource_nodes(&self.world),
                &mut commands,
            );
            self.apply_all(&mut commands, &mut next);

            self.systems.enemy_spawning.handle(&events, &mut commands);
            self.systems.enemy_ai.handle(
                &events,
                &query::enemies(&self.world),
                query::player_position(&self.world),
                &mut commands,
            );
            self.apply_all(&mut commands, &mut next);

            if !self.is_game_over() {
                let resources = query::game_state(&self.world).resources();
                self.systems
                    .missions
                    .handle(&events, resources, &mut commands);
                self.apply_all(&mut commands, &mut next);
            }

            if let Some(journal) = self.journal.as_mut() {
                journal.append(&mut events);
            }
            events = next;
        }
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, out: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, out);
        }
    }

    fn clear_scene(&mut self) {
        let mut entities: Vec<EntityRef> = query::resource_nodes(&self.world)
            .iter()
            .map(|node| EntityRef::ResourceNode(node.id))
            .collect();
        entities.extend(
            query::buildings(&self.world)
                .iter()
                .map(|building| EntityRef::Building(building.id)),
        );
        entities.extend(
            query::enemies(&self.world)
                .iter()
                .map(|enemy| EntityRef::Enemy(enemy.id)),
        );
        for entity in entities {
            self.presenter.remove(entity);
        }
    }
}

fn placed_building(events: &[Event]) -> Option<BuildingId> {
    events.iter().find_map(|event| match event {
        Event::BuildingPlaced { building, .. } => Some(*building),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = Settings::default();
        settings.player.move_speed = 0.0;
        assert!(Simulation::new(settings, 1).is_err());
    }

    #[test]
    fn start_populates_world_once() {
        let mut simulation = Simulation::new(Settings::default(), 7).expect("default settings");
        simulation.start();
        simulation.start();

        assert_eq!(query::resource_nodes(simulation.world()).iter().count(), 15);
        assert_eq!(query::enemies(simulation.world()).len(), 5);
    }

    #[test]
    fn bad_deltas_do_not_advance_time() {
        let mut simulation = Simulation::new(Settings::default(), 7).expect("default settings");
        simulation.tick(f32::NAN);
        simulation.tick(-1.0);
        simulation.tick(f32::INFINITY);
        assert_eq!(query::now(simulation.world()), Duration::ZERO);

        simulation.tick(0.5);
        assert_eq!(query::now(simulation.world()), Duration::from_millis(500));
    }

    #[test]
    fn stream_seeds_differ() {
        assert_ne!(RESOURCE_STREAM, ENEMY_SPAWN_STREAM);
        assert_ne!(ENEMY_SPAWN_STREAM, ENEMY_AI_STREAM);
    }
}
