//! Shared scalar state of a session: stockpile, vitals and progression.

use std::collections::{BTreeMap, BTreeSet};

use survival_core::{settings::PlayerSettings, MissionId, Recipe, ResourceBundle, SessionPhase};

/// Experience required per level; reaching `level * XP_PER_LEVEL` levels up.
pub const XP_PER_LEVEL: u32 = 100;

/// Singleton record mutated exclusively through the world's command handlers.
#[derive(Clone, Debug)]
pub struct GameState {
    resources: ResourceBundle,
    health: u32,
    stamina: u32,
    max_health: u32,
    max_stamina: u32,
    level: u32,
    xp: u32,
    crafted: BTreeMap<Recipe, u32>,
    completed_missions: BTreeSet<MissionId>,
    phase: SessionPhase,
}

impl GameState {
    pub(crate) fn new(player: &PlayerSettings) -> Self {
        Self {
            resources: ResourceBundle::default(),
            health: player.max_health,
            stamina: player.max_stamina,
            max_health: player.max_health,
            max_stamina: player.max_stamina,
            level: 1,
            xp: 0,
            crafted: BTreeMap::new(),
            completed_missions: BTreeSet::new(),
            phase: SessionPhase::Running,
        }
    }

    /// Current stockpile.
    #[must_use]
    pub const fn resources(&self) -> ResourceBundle {
        self.resources
    }

    /// Current health in `[0, max_health]`.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Current stamina in `[0, max_stamina]`.
    #[must_use]
    pub const fn stamina(&self) -> u32 {
        self.stamina
    }

    /// Current level, starting at one.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub const fn xp(&self) -> u32 {
        self.xp
    }

    /// Number of items crafted from the provided recipe.
    #[must_use]
    pub fn crafted(&self, recipe: Recipe) -> u32 {
        self.crafted.get(&recipe).copied().unwrap_or(0)
    }

    /// Completed missions in catalog order.
    pub fn completed_missions(&self) -> impl Iterator<Item = MissionId> + '_ {
        self.completed_missions.iter().copied()
    }

    /// Lifecycle phase of the session.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Reports whether the stockpile covers `cost` in every component.
    #[must_use]
    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.resources.covers(cost)
    }

    /// Deducts `cost` when affordable; leaves the stockpile untouched otherwise.
    pub(crate) fn try_spend(&mut self, cost: &ResourceBundle) -> bool {
        match self.resources.checked_sub(cost) {
            Some(remaining) => {
                self.resources = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn grant(&mut self, bundle: ResourceBundle) {
        self.resources.merge(bundle);
    }

    /// Adds experience and returns the new level when the award crossed the threshold.
    ///
    /// A single award grants at most one level and discards any surplus.
    pub(crate) fn add_xp(&mut self, amount: u32) -> Option<u32> {
        self.xp = self.xp.saturating_add(amount);
        if self.xp < self.level.saturating_mul(XP_PER_LEVEL) {
            return None;
        }

        self.level = self.level.saturating_add(1);
        self.xp = 0;
        self.health = self.max_health;
        self.stamina = self.max_stamina;
        Some(self.level)
    }

    /// Applies damage, clamping at zero, and returns the remaining health.
    pub(crate) fn damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub(crate) fn record_craft(&mut self, recipe: Recipe) -> u32 {
        let count = self.crafted.entry(recipe).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Marks a mission completed; returns `false` when it already was.
    pub(crate) fn record_mission(&mut self, mission: MissionId) -> bool {
        self.completed_missions.insert(mission)
    }

    pub(crate) fn enter_game_over(&mut self) {
        self.phase = SessionPhase::GameOver;
    }
}
