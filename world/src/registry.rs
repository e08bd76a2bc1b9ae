//! Authoritative entity storage and identifier allocation.

use std::{collections::BTreeMap, time::Duration};

use survival_core::{
    BuildingId, BuildingKind, EnemyId, EnemyState, ResourceKind, ResourceNodeId, Vec2,
};

/// Collectible node stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct ResourceNode {
    /// Identifier allocated by the world for the node.
    pub(crate) id: ResourceNodeId,
    /// Resource granted on collection.
    pub(crate) kind: ResourceKind,
    /// Planar location of the node.
    pub(crate) position: Vec2,
    /// Deadline after which a collected node becomes available; `None` while available.
    pub(crate) respawn_at: Option<Duration>,
}

/// Placed structure stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Building {
    pub(crate) id: BuildingId,
    pub(crate) kind: BuildingKind,
    pub(crate) position: Vec2,
}

/// Hostile entity stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) facing: f32,
    pub(crate) health: u32,
    pub(crate) state: EnemyState,
    pub(crate) last_attack_at: Option<Duration>,
}

/// Ordered collections of live nodes, buildings and enemies.
///
/// Identifiers are allocated monotonically and never reused within a session.
#[derive(Debug)]
pub(crate) struct EntityRegistry {
    nodes: BTreeMap<ResourceNodeId, ResourceNode>,
    buildings: BTreeMap<BuildingId, Building>,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_node_id: ResourceNodeId,
    next_building_id: BuildingId,
    next_enemy_id: EnemyId,
}

impl EntityRegistry {
    /// Creates an empty registry with reset identifier counters.
    pub(crate) fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            buildings: BTreeMap::new(),
            enemies: BTreeMap::new(),
            next_node_id: ResourceNodeId::new(0),
            next_building_id: BuildingId::new(0),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn insert_node(&mut self, kind: ResourceKind, position: Vec2) -> ResourceNodeId {
        let id = self.next_node_id;
        self.next_node_id = ResourceNodeId::new(id.get().saturating_add(1));
        let _ = self.nodes.insert(
            id,
            ResourceNode {
                id,
                kind,
                position,
                respawn_at: None,
            },
        );
        id
    }

    pub(crate) fn node_mut(&mut self, id: ResourceNodeId) -> Option<&mut ResourceNode> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }

    /// Available nodes whose planar distance to `center` is at most `radius`.
    pub(crate) fn available_nodes_within(&self, center: Vec2, radius: f32) -> Vec<ResourceNodeId> {
        self.nodes
            .values()
            .filter(|node| node.respawn_at.is_none())
            .filter(|node| node.position.distance(center) <= radius)
            .map(|node| node.id)
            .collect()
    }

    pub(crate) fn insert_building(&mut self, kind: BuildingKind, position: Vec2) -> BuildingId {
        let id = self.next_building_id;
        self.next_building_id = BuildingId::new(id.get().saturating_add(1));
        let _ = self
            .buildings
            .insert(id, Building { id, kind, position });
        id
    }

    pub(crate) fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub(crate) fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub(crate) fn insert_enemy(&mut self, position: Vec2, health: u32) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let _ = self.enemies.insert(
            id,
            Enemy {
                id,
                position,
                facing: 0.0,
                health,
                state: EnemyState::Wandering,
                last_attack_at: None,
            },
        );
        id
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    pub(crate) fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }

    pub(crate) fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Enemies whose planar distance to `center` is at most `radius`, in id order.
    pub(crate) fn enemies_within(&self, center: Vec2, radius: f32) -> Vec<EnemyId> {
        self.enemies
            .values()
            .filter(|enemy| enemy.position.distance(center) <= radius)
            .map(|enemy| enemy.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifiers() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.nodes().count(), 0);
        assert_eq!(registry.building_count(), 0);
        assert_eq!(registry.enemies().count(), 0);
        assert_eq!(registry.next_enemy_id.get(), 0);
    }

    #[test]
    fn identifiers_are_not_reused_after_removal() {
        let mut registry = EntityRegistry::new();
        let first = registry.insert_enemy(Vec2::ZERO, 30);
        assert!(registry.remove_enemy(first).is_some());
        let second = registry.insert_enemy(Vec2::ZERO, 30);
        assert_ne!(first, second);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn proximity_query_skips_unavailable_nodes() {
        let mut registry = EntityRegistry::new();
        let near = registry.insert_node(ResourceKind::Wood, Vec2::new(1.0, 1.0));
        let hidden = registry.insert_node(ResourceKind::Stone, Vec2::new(-1.0, 0.0));
        let _far = registry.insert_node(ResourceKind::Food, Vec2::new(10.0, 0.0));
        if let Some(node) = registry.node_mut(hidden) {
            node.respawn_at = Some(Duration::from_secs(30));
        }

        assert_eq!(registry.available_nodes_within(Vec2::ZERO, 2.5), vec![near]);
    }

    #[test]
    fn enemy_proximity_includes_boundary() {
        let mut registry = EntityRegistry::new();
        let edge = registry.insert_enemy(Vec2::new(2.5, 0.0), 30);
        let _outside = registry.insert_enemy(Vec2::new(2.6, 0.0), 30);
        assert_eq!(registry.enemies_within(Vec2::ZERO, 2.5), vec![edge]);
    }
}
