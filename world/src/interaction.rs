//! Resolution of player-triggered actions against the entity registry.

use survival_core::{
    BuildingId, BuildingKind, CraftError, EnemyState, Event, PlacementError, Recipe,
    ResourceBundle, Vec2,
};
use tracing::{debug, info};

use crate::World;

enum HitOutcome {
    Defeated { position: Vec2 },
    Survived,
}

impl World {
    /// Collects every available node within the collection radius.
    ///
    /// Returns the number of nodes collected.
    pub(crate) fn collect(&mut self, out_events: &mut Vec<Event>) -> u32 {
        let radius = self.settings.resources.collection_radius;
        let respawn_at = self
            .now
            .saturating_add(self.settings.resources.respawn_time());
        let candidates = self
            .registry
            .available_nodes_within(self.player_position, radius);

        let mut collected = 0;
        for id in candidates {
            let Some(node) = self.registry.node_mut(id) else {
                continue;
            };
            node.respawn_at = Some(respawn_at);
            let (kind, position) = (node.kind, node.position);

            self.state.grant(ResourceBundle::of(kind, 1));
            collected += 1;
            out_events.push(Event::ResourceCollected {
                node: id,
                kind,
                position,
                respawn_at,
            });
        }
        collected
    }

    /// Validates and pays for a building, then creates it.
    ///
    /// Resources are deducted only when the building is created.
    pub(crate) fn place_building(
        &mut self,
        kind: BuildingKind,
        position: Vec2,
    ) -> Result<BuildingId, PlacementError> {
        let buildings = &self.settings.buildings;
        if !self.settings.world.bounds().contains(position) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.registry.building_count() >= buildings.max_buildings as usize {
            return Err(PlacementError::LimitReached);
        }

        let cost = buildings.cost_of(kind);
        if !self.state.try_spend(&cost) {
            return Err(PlacementError::InsufficientResources);
        }

        Ok(self.registry.insert_building(kind, position))
    }

    /// Pays for and records one crafted item, returning the new item count.
    pub(crate) fn craft(&mut self, recipe: Recipe) -> Result<u32, CraftError> {
        if !self.state.try_spend(&recipe.cost()) {
            return Err(CraftError::InsufficientResources);
        }
        Ok(self.state.record_craft(recipe))
    }

    /// Strikes every enemy within range of the player.
    ///
    /// Returns `None` while the attack cooldown is running; otherwise the
    /// number of enemies hit. Any accepted swing restarts the cooldown,
    /// including one that hits nothing.
    pub(crate) fn attack(&mut self, out_events: &mut Vec<Event>) -> Option<u32> {
        let combat = self.settings.combat.clone();
        if let Some(last) = self.last_player_attack_at {
            if self.now.saturating_sub(last) < combat.cooldown() {
                debug!("attack ignored during cooldown");
                return None;
            }
        }
        self.last_player_attack_at = Some(self.now);

        let player = self.player_position;
        let bounds = self.settings.world.bounds();
        let targets = self.registry.enemies_within(player, combat.attack_range);
        let hits = u32::try_from(targets.len()).unwrap_or(u32::MAX);
        out_events.push(Event::PlayerAttacked { hits });

        for id in targets {
            let outcome = {
                let Some(enemy) = self.registry.enemy_mut(id) else {
                    continue;
                };
                enemy.health = enemy.health.saturating_sub(combat.damage);
                if enemy.health == 0 {
                    out_events.push(Event::EnemyDamaged {
                        enemy: id,
                        position: enemy.position,
                        damage: combat.damage,
                        remaining: 0,
                    });
                    HitOutcome::Defeated {
                        position: enemy.position,
                    }
                } else {
                    let away = (enemy.position - player).normalize_or_zero();
                    enemy.position = bounds.clamp(enemy.position + away * combat.knockback);
                    let previous = enemy.state;
                    enemy.state = EnemyState::Chasing;
                    out_events.push(Event::EnemyDamaged {
                        enemy: id,
                        position: enemy.position,
                        damage: combat.damage,
                        remaining: enemy.health,
                    });
                    if previous != EnemyState::Chasing {
                        out_events.push(Event::EnemyStateChanged {
                            enemy: id,
                            from: previous,
                            to: EnemyState::Chasing,
                        });
                    }
                    HitOutcome::Survived
                }
            };

            if let HitOutcome::Defeated { position } = outcome {
                let _ = self.registry.remove_enemy(id);
                debug!(enemy = id.get(), "enemy defeated");
                out_events.push(Event::EnemyDefeated {
                    enemy: id,
                    position,
                });
                self.award_xp(combat.defeat_xp, out_events);
                self.grant(combat.defeat_bonus, out_events);
            }
        }

        Some(hits)
    }

    /// Adds experience and announces any resulting level up.
    pub(crate) fn award_xp(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        let level_up = self.state.add_xp(amount);
        out_events.push(Event::ExperienceGained {
            amount,
            xp: self.state.xp(),
        });
        if let Some(level) = level_up {
            info!(level, "player levelled up");
            out_events.push(Event::LevelUp { level });
        }
    }

    /// Adds resources to the stockpile outside of node collection.
    pub(crate) fn grant(&mut self, resources: ResourceBundle, out_events: &mut Vec<Event>) {
        if resources.is_empty() {
            return;
        }
        self.state.grant(resources);
        out_events.push(Event::ResourcesGranted { resources });
    }
}
