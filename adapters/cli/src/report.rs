//! Summary printed at the end of a headless run.

use std::{collections::BTreeMap, fmt, time::Duration};

use survival_core::{BuildingKind, MissionId, Recipe, ResourceBundle, ResourceKind};
use survival_presentation::{Signal, SignalLog};
use survival_simulation::Simulation;
use survival_system_missions::Progress;
use survival_world::query;

use crate::autopilot::Autopilot;

#[derive(Debug)]
pub(crate) struct Report {
    seed: u64,
    ticks: u32,
    simulated: Duration,
    game_over: bool,
    level: u32,
    xp: u32,
    health: u32,
    max_health: u32,
    resources: ResourceBundle,
    buildings: BTreeMap<&'static str, usize>,
    crafted: Vec<(Recipe, u32)>,
    completed: Vec<MissionId>,
    active: Vec<(MissionId, Progress)>,
    collected: u32,
    hits: u32,
    walls: u32,
    rejected_walls: u32,
    signals: BTreeMap<&'static str, usize>,
}

impl Report {
    pub(crate) fn capture(
        simulation: &Simulation,
        autopilot: &Autopilot,
        log: &SignalLog,
        ticks: u32,
    ) -> Self {
        let world = simulation.world();
        let state = query::game_state(world);

        let mut buildings = BTreeMap::new();
        for kind in BuildingKind::ALL {
            let count = query::building_count(world, kind);
            if count > 0 {
                let _ = buildings.insert(kind.name(), count);
            }
        }

        let mut signals = BTreeMap::new();
        for signal in log.snapshot() {
            *signals.entry(signal_label(&signal)).or_insert(0) += 1;
        }

        Self {
            seed: simulation.seed(),
            ticks,
            simulated: query::now(world),
            game_over: simulation.is_game_over(),
            level: state.level(),
            xp: state.xp(),
            health: state.health(),
            max_health: query::settings(world).player.max_health,
            resources: state.resources(),
            buildings,
            crafted: Recipe::ALL
                .iter()
                .map(|recipe| (*recipe, state.crafted(*recipe)))
                .collect(),
            completed: simulation.missions().completed().collect(),
            active: simulation.missions().active().collect(),
            collected: autopilot.collected(),
            hits: autopilot.hits(),
            walls: autopilot.walls(),
            rejected_walls: autopilot.rejected_walls(),
            signals,
        }
    }
}

fn signal_label(signal: &Signal) -> &'static str {
    match signal {
        Signal::FloatingText { .. } => "floating_text",
        Signal::LightingTransition { .. } => "lighting",
        Signal::CameraShake => "camera_shake",
        Signal::Visibility { .. } => "visibility",
        Signal::EntityCreated { .. } => "entity_created",
        Signal::EntityMoved { .. } => "entity_moved",
        Signal::EntityRemoved { .. } => "entity_removed",
        Signal::Sound { .. } => "sound",
    }
}

fn join<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return "none".to_owned();
    }
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} | {} ticks | {:.1}s simulated | {}",
            self.seed,
            self.ticks,
            self.simulated.as_secs_f32(),
            if self.game_over { "game over" } else { "alive" },
        )?;
        writeln!(
            f,
            "level {} | xp {} | health {}/{}",
            self.level, self.xp, self.health, self.max_health
        )?;
        writeln!(
            f,
            "resources: {}",
            join(&ResourceKind::ALL, |kind| format!(
                "{} {}",
                kind.name(),
                self.resources.amount(*kind)
            ))
        )?;
        let buildings: Vec<_> = self.buildings.iter().collect();
        writeln!(
            f,
            "buildings: {}",
            join(&buildings, |(kind, count)| format!("{kind} {count}"))
        )?;
        writeln!(
            f,
            "crafted: {}",
            join(&self.crafted, |(recipe, count)| format!(
                "{} {count}",
                recipe.name()
            ))
        )?;
        writeln!(
            f,
            "autopilot: collected {} | hits {} | walls {} | rejected {}",
            self.collected, self.hits, self.walls, self.rejected_walls
        )?;
        writeln!(
            f,
            "missions completed: {}",
            join(&self.completed, |mission| mission.title().to_owned())
        )?;
        writeln!(
            f,
            "missions active: {}",
            join(&self.active, |(mission, progress)| format!(
                "{} {}/{}",
                mission.title(),
                progress.current,
                progress.required
            ))
        )?;
        let signals: Vec<_> = self.signals.iter().collect();
        write!(
            f,
            "signals: {}",
            join(&signals, |(label, count)| format!("{label} {count}"))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::Settings;

    #[test]
    fn fresh_session_report_lists_defaults() {
        let log = SignalLog::new();
        let mut simulation = Simulation::new(Settings::default(), 5)
            .expect("valid settings")
            .with_scene_sink(log.clone());
        simulation.start();

        let report = Report::capture(&simulation, &Autopilot::new(), &log, 0);
        let text = report.to_string();

        assert!(text.contains("level 1 | xp 0 | health 100/100"));
        assert!(text.contains("resources: wood 0, stone 0, food 0"));
        assert!(text.contains("buildings: none"));
        assert!(text.contains("crafted: wall 0, axe 0"));
        assert!(text.contains("missions completed: none"));
        assert!(text.contains("Gather Wood 0/10"));
        assert!(text.contains("entity_created 20"));
    }

    #[test]
    fn crafted_items_are_counted_per_recipe() {
        let log = SignalLog::new();
        let mut settings = Settings::default();
        settings.resources.node_count = 6;
        settings.resources.spawn_weights = ResourceBundle::new(1, 0, 0);
        settings.world.resource_scatter = 1.0;
        settings.enemies.initial_count = 0;
        let mut simulation = Simulation::new(settings, 5)
            .expect("valid settings")
            .with_scene_sink(log.clone());
        simulation.start();

        assert_eq!(simulation.request_collect(), 6);
        assert!(simulation.request_craft(Recipe::Wall));
        assert!(!simulation.request_craft(Recipe::Axe));

        let text = Report::capture(&simulation, &Autopilot::new(), &log, 0).to_string();
        assert!(text.contains("crafted: wall 1, axe 0"));
        assert!(text.contains("resources: wood 1, stone 0, food 0"));
    }
}
