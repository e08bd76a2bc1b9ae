#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mission progress tracking over a fixed catalog and successor table.
//!
//! Collection missions are polled on their own cadence against the live
//! stockpile. Building missions advance as placement events arrive. Progress
//! never decreases: spending resources after partially meeting a collection
//! target leaves the recorded progress where it was. Completion is requested
//! from the world, which grants the reward; the tracker retires the mission and
//! activates its successor once the world confirms.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use survival_core::{
    BuildingKind, Cadence, Command, Event, MissionId, ResourceBundle, ResourceKind, Reward,
};
use tracing::debug;

/// What a mission counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    /// Hold at least the required amount of a resource.
    Collect(ResourceKind),
    /// Place the required number of buildings of a kind.
    Build(BuildingKind),
}

/// Static description of a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissionSpec {
    /// Identifier of the mission.
    pub id: MissionId,
    /// Quantity being tracked.
    pub objective: Objective,
    /// Amount needed to complete the mission.
    pub required: u32,
    /// Reward granted on completion.
    pub reward: Reward,
}

/// Missions active when a session starts.
pub const INITIAL_MISSIONS: [MissionId; 3] = [
    MissionId::CollectWood,
    MissionId::BuildWalls,
    MissionId::GatherStone,
];

/// Looks up the static description of a mission.
#[must_use]
pub const fn spec(id: MissionId) -> MissionSpec {
    match id {
        MissionId::CollectWood => MissionSpec {
            id,
            objective: Objective::Collect(ResourceKind::Wood),
            required: 10,
            reward: Reward {
                xp: 50,
                resources: ResourceBundle::new(5, 0, 0),
            },
        },
        MissionId::BuildWalls => MissionSpec {
            id,
            objective: Objective::Build(BuildingKind::Wall),
            required: 3,
            reward: Reward {
                xp: 100,
                resources: ResourceBundle::new(10, 5, 0),
            },
        },
        MissionId::GatherStone => MissionSpec {
            id,
            objective: Objective::Collect(ResourceKind::Stone),
            required: 15,
            reward: Reward {
                xp: 75,
                resources: ResourceBundle::new(0, 8, 0),
            },
        },
        MissionId::StockpileWood => MissionSpec {
            id,
            objective: Objective::Collect(ResourceKind::Wood),
            required: 15,
            reward: Reward {
                xp: 75,
                resources: ResourceBundle::new(8, 0, 0),
            },
        },
    }
}

/// Mission offered after the provided one completes.
#[must_use]
pub const fn successor(id: MissionId) -> Option<MissionId> {
    match id {
        MissionId::CollectWood => Some(MissionId::BuildWalls),
        MissionId::BuildWalls => Some(MissionId::GatherStone),
        MissionId::GatherStone => Some(MissionId::StockpileWood),
        MissionId::StockpileWood => None,
    }
}

/// Recorded progress of an active mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Amount achieved so far, clamped to `required`.
    pub current: u32,
    /// Amount needed to complete the mission.
    pub required: u32,
}

impl Progress {
    /// Reports whether the mission target was met.
    #[must_use]
    pub const fn is_met(&self) -> bool {
        self.current >= self.required
    }
}

/// Pure system that tracks mission progress and requests completions.
#[derive(Debug)]
pub struct MissionTracker {
    cadence: Cadence,
    active: BTreeMap<MissionId, u32>,
    completed: BTreeSet<MissionId>,
    requested: BTreeSet<MissionId>,
}

impl MissionTracker {
    /// Creates a tracker polling collection progress every `check_interval`.
    #[must_use]
    pub fn new(check_interval: Duration) -> Self {
        Self {
            cadence: Cadence::new(check_interval),
            active: INITIAL_MISSIONS.iter().map(|id| (*id, 0)).collect(),
            completed: BTreeSet::new(),
            requested: BTreeSet::new(),
        }
    }

    /// Active missions and their progress in catalog order.
    pub fn active(&self) -> impl Iterator<Item = (MissionId, Progress)> + '_ {
        self.active.iter().map(|(id, current)| {
            (
                *id,
                Progress {
                    current: *current,
                    required: spec(*id).required,
                },
            )
        })
    }

    /// Progress of a mission if it is active.
    #[must_use]
    pub fn progress(&self, id: MissionId) -> Option<Progress> {
        self.active.get(&id).map(|current| Progress {
            current: *current,
            required: spec(id).required,
        })
    }

    /// Completed missions in catalog order.
    pub fn completed(&self) -> impl Iterator<Item = MissionId> + '_ {
        self.completed.iter().copied()
    }

    /// Consumes world events and the current stockpile to emit completion requests.
    pub fn handle(&mut self, events: &[Event], resources: ResourceBundle, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt, .. } => elapsed = elapsed.saturating_add(*dt),
                Event::BuildingPlaced { kind, .. } => self.record_building(*kind),
                Event::MissionCompleted { mission, .. } => self.retire(*mission),
                Event::SessionReset => {
                    *self = Self::new(self.cadence.interval());
                    elapsed = Duration::ZERO;
                }
                _ => {}
            }
        }

        if self.cadence.advance(elapsed) > 0 {
            self.poll_collections(resources);
        }

        for (id, current) in &self.active {
            let mission = spec(*id);
            if *current >= mission.required && self.requested.insert(*id) {
                debug!(mission = id.title(), "mission target met");
                out.push(Command::CompleteMission {
                    mission: *id,
                    reward: mission.reward,
                });
            }
        }
    }

    fn record_building(&mut self, kind: BuildingKind) {
        for (id, current) in self.active.iter_mut() {
            let mission = spec(*id);
            if mission.objective == Objective::Build(kind) {
                *current = current.saturating_add(1).min(mission.required);
            }
        }
    }

    fn poll_collections(&mut self, resources: ResourceBundle) {
        for (id, current) in self.active.iter_mut() {
            let mission = spec(*id);
            if let Objective::Collect(kind) = mission.objective {
                let observed = resources.amount(kind).min(mission.required);
                *current = (*current).max(observed);
            }
        }
    }

    fn retire(&mut self, mission: MissionId) {
        let _ = self.active.remove(&mission);
        let _ = self.requested.remove(&mission);
        let _ = self.completed.insert(mission);

        if let Some(next) = successor(mission) {
            if !self.active.contains_key(&next) && !self.completed.contains(&next) {
                debug!(mission = next.title(), "mission activated");
                let _ = self.active.insert(next, 0);
            }
        }
    }
}
