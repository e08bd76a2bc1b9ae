#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the survival simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Planar positions use [`Vec2`] where `x` is the world x axis and `y` is the
//! world z axis.

pub mod cadence;
pub mod settings;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use cadence::Cadence;
pub use settings::{Settings, SettingsError};

/// Canonical banner shown when a session starts.
pub const WELCOME_BANNER: &str = "Welcome, survivor! Gather, build and stay alive.";

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// The simulation accepts input and advances time.
    Running,
    /// The player died; only a reset is accepted.
    GameOver,
}

/// Kinds of collectible resources.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ResourceKind {
    /// Harvested from trees.
    Wood,
    /// Mined from rocks.
    Stone,
    /// Foraged from bushes or dropped by enemies.
    Food,
}

impl ResourceKind {
    /// Every resource kind in display order.
    pub const ALL: [ResourceKind; 3] = [Self::Wood, Self::Stone, Self::Food];

    /// Lower-case name used in feedback texts and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Food => "food",
        }
    }
}

/// Quantities of each resource kind.
///
/// Used for stockpiles, costs, rewards and spawn weights alike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBundle {
    /// Amount of wood.
    pub wood: u32,
    /// Amount of stone.
    pub stone: u32,
    /// Amount of food.
    pub food: u32,
}

impl ResourceBundle {
    /// Creates a bundle from explicit amounts.
    #[must_use]
    pub const fn new(wood: u32, stone: u32, food: u32) -> Self {
        Self { wood, stone, food }
    }

    /// Creates a bundle holding `amount` of a single kind.
    #[must_use]
    pub const fn of(kind: ResourceKind, amount: u32) -> Self {
        match kind {
            ResourceKind::Wood => Self::new(amount, 0, 0),
            ResourceKind::Stone => Self::new(0, amount, 0),
            ResourceKind::Food => Self::new(0, 0, amount),
        }
    }

    /// Amount stored for the provided kind.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Food => self.food,
        }
    }

    /// Adds `amount` of `kind`, saturating at `u32::MAX`.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        let slot = match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Food => &mut self.food,
        };
        *slot = slot.saturating_add(amount);
    }

    /// Adds every component of `other` to this bundle.
    pub fn merge(&mut self, other: ResourceBundle) {
        for (kind, amount) in other.iter() {
            self.add(kind, amount);
        }
    }

    /// Reports whether every component is at least the matching component of `cost`.
    #[must_use]
    pub fn covers(&self, cost: &ResourceBundle) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.amount(*kind) >= cost.amount(*kind))
    }

    /// Returns the remainder after paying `cost`, or `None` when any component is short.
    #[must_use]
    pub fn checked_sub(&self, cost: &ResourceBundle) -> Option<ResourceBundle> {
        Some(Self {
            wood: self.wood.checked_sub(cost.wood)?,
            stone: self.stone.checked_sub(cost.stone)?,
            food: self.food.checked_sub(cost.food)?,
        })
    }

    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.wood
            .saturating_add(self.stone)
            .saturating_add(self.food)
    }

    /// Reports whether every component is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates over `(kind, amount)` pairs for non-zero components.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.amount(kind)))
            .filter(|(_, amount)| *amount > 0)
    }
}

/// Structures the player can place.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BuildingKind {
    /// Defensive wall segment.
    Wall,
    /// Floor tile.
    Floor,
    /// Door segment.
    Door,
    /// Storage chest.
    Chest,
    /// Watch tower.
    Tower,
}

impl BuildingKind {
    /// Every building kind in menu order.
    pub const ALL: [BuildingKind; 5] = [
        Self::Wall,
        Self::Floor,
        Self::Door,
        Self::Chest,
        Self::Tower,
    ];

    /// Lower-case name used in feedback texts and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Door => "door",
            Self::Chest => "chest",
            Self::Tower => "tower",
        }
    }
}

/// Items that can be crafted from the stockpile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Recipe {
    /// Prefabricated wall section.
    Wall,
    /// Stone axe.
    Axe,
}

impl Recipe {
    /// Every recipe in menu order.
    pub const ALL: [Recipe; 2] = [Self::Wall, Self::Axe];

    /// Resources consumed by one craft.
    #[must_use]
    pub const fn cost(self) -> ResourceBundle {
        match self {
            Self::Wall => ResourceBundle::new(5, 0, 0),
            Self::Axe => ResourceBundle::new(3, 2, 0),
        }
    }

    /// Lower-case name used in feedback texts and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Axe => "axe",
        }
    }
}

/// Identifiers of the missions in the fixed catalog.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MissionId {
    /// Collect the first batch of wood.
    CollectWood,
    /// Build a few walls.
    BuildWalls,
    /// Gather stone.
    GatherStone,
    /// Stockpile a larger batch of wood.
    StockpileWood,
}

impl MissionId {
    /// Human readable mission title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CollectWood => "Gather Wood",
            Self::BuildWalls => "Build Walls",
            Self::GatherStone => "Gather Stone",
            Self::StockpileWood => "Stockpile Wood",
        }
    }
}

/// Reward granted once when a mission completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Experience awarded.
    pub xp: u32,
    /// Resources added to the stockpile.
    pub resources: ResourceBundle,
}

/// Behaviour state of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Roams randomly until the player comes close.
    Wandering,
    /// Moves straight toward the player.
    Chasing,
    /// Stands still and strikes whenever its cooldown allows.
    Attacking,
}

/// Unique identifier assigned to a resource node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceNodeId(u32);

impl ResourceNodeId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Square playable area centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    half_extent: f32,
}

impl WorldBounds {
    /// Creates bounds spanning `[-half_extent, half_extent]` on both axes.
    #[must_use]
    pub const fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    /// Half the side length of the playable square.
    #[must_use]
    pub const fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Clamps both axes of `position` into the playable square.
    #[must_use]
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(
            Vec2::splat(-self.half_extent),
            Vec2::splat(self.half_extent),
        )
    }

    /// Reports whether `position` lies inside the playable square.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.is_finite()
            && position.x.abs() <= self.half_extent
            && position.y.abs() <= self.half_extent
    }
}

/// Device that produced a movement vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Discrete key presses, each axis in `{-1, 0, 1}`.
    Keyboard,
    /// Continuous touch joystick, each axis in `[-1, 1]`.
    Joystick,
}

/// Normalized movement request.
///
/// `y` follows screen conventions: a positive value moves the player toward
/// negative world z ("forward").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementInput {
    /// Horizontal deflection in `[-1, 1]`.
    pub x: f32,
    /// Vertical deflection in `[-1, 1]`.
    pub y: f32,
    /// Device that produced the vector.
    pub source: InputSource,
}

impl MovementInput {
    /// Input without any deflection.
    pub const IDLE: MovementInput = MovementInput {
        x: 0.0,
        y: 0.0,
        source: InputSource::Keyboard,
    };

    /// Creates joystick input, clamping both axes into `[-1, 1]`.
    #[must_use]
    pub fn joystick(x: f32, y: f32) -> Self {
        Self {
            x: sanitize_axis(x),
            y: sanitize_axis(y),
            source: InputSource::Joystick,
        }
    }

    /// Creates keyboard input from held direction keys.
    ///
    /// When opposing keys are held together, down wins over up and right
    /// wins over left.
    #[must_use]
    pub fn keyboard(up: bool, down: bool, left: bool, right: bool) -> Self {
        let axis = |positive: bool, negative: bool, winner: f32| match (positive, negative) {
            (true, true) => winner,
            (true, false) => 1.0,
            (false, true) => -1.0,
            (false, false) => 0.0,
        };
        Self {
            x: axis(right, left, 1.0),
            y: axis(up, down, -1.0),
            source: InputSource::Keyboard,
        }
    }

    /// Reports whether the input requests no movement.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player by one step of the provided input.
    MovePlayer {
        /// Movement vector to apply.
        input: MovementInput,
    },
    /// Creates a new resource node during world generation.
    SpawnResourceNode {
        /// Resource granted by the node.
        kind: ResourceKind,
        /// Planar location of the node.
        position: Vec2,
    },
    /// Makes a collected node available again once its respawn deadline passed.
    RestoreResourceNode {
        /// Identifier of the node to restore.
        node: ResourceNodeId,
    },
    /// Collects every available node within reach of the player.
    Collect,
    /// Places a building at the provided position.
    PlaceBuilding {
        /// Type of building to construct.
        kind: BuildingKind,
        /// Planar location of the building.
        position: Vec2,
    },
    /// Crafts one item from the stockpile.
    Craft {
        /// Recipe to craft.
        recipe: Recipe,
    },
    /// Strikes every enemy within reach of the player.
    Attack,
    /// Spawns a fresh enemy.
    SpawnEnemy {
        /// Planar location of the enemy.
        position: Vec2,
    },
    /// Applies the outcome of one AI update to an enemy.
    DriveEnemy {
        /// Identifier of the enemy being driven.
        enemy: EnemyId,
        /// State the enemy holds after the update.
        state: EnemyState,
        /// Planar location after the update.
        position: Vec2,
        /// Heading in radians after the update.
        facing: f32,
    },
    /// Lets an attacking enemy strike the player.
    StrikePlayer {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
    },
    /// Records a mission as completed and grants its reward.
    CompleteMission {
        /// Mission that completed.
        mission: MissionId,
        /// Reward to grant.
        reward: Reward,
    },
    /// Discards the session and restores the initial state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulated time since session start after the tick.
        now: Duration,
    },
    /// Announces a day/night flip.
    DayPhaseChanged {
        /// Whether it became day.
        is_day: bool,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Planar location after the move.
        position: Vec2,
        /// Heading in radians after the move.
        facing: f32,
    },
    /// Confirms that a resource node was created.
    ResourceNodeSpawned {
        /// Identifier assigned to the node.
        node: ResourceNodeId,
        /// Resource granted by the node.
        kind: ResourceKind,
        /// Planar location of the node.
        position: Vec2,
    },
    /// Reports that the player collected a node.
    ResourceCollected {
        /// Identifier of the collected node.
        node: ResourceNodeId,
        /// Resource that was added to the stockpile.
        kind: ResourceKind,
        /// Planar location of the node.
        position: Vec2,
        /// Simulated time at which the node becomes available again.
        respawn_at: Duration,
    },
    /// Reports that a collected node became available again.
    ResourceNodeRestored {
        /// Identifier of the restored node.
        node: ResourceNodeId,
        /// Resource granted by the node.
        kind: ResourceKind,
        /// Planar location of the node.
        position: Vec2,
    },
    /// Confirms that a building was placed and paid for.
    BuildingPlaced {
        /// Identifier assigned to the building.
        building: BuildingId,
        /// Type of building placed.
        kind: BuildingKind,
        /// Planar location of the building.
        position: Vec2,
    },
    /// Reports that a placement request was rejected without any state change.
    BuildingRejected {
        /// Type of building that was requested.
        kind: BuildingKind,
        /// Planar location that was requested.
        position: Vec2,
        /// Reason for the rejection.
        reason: PlacementError,
    },
    /// Confirms that an item was crafted and paid for.
    ItemCrafted {
        /// Recipe that was crafted.
        recipe: Recipe,
        /// Number of items of this recipe crafted so far.
        total: u32,
    },
    /// Reports that a craft request was rejected without any state change.
    CraftRejected {
        /// Recipe that was requested.
        recipe: Recipe,
        /// Reason for the rejection.
        reason: CraftError,
    },
    /// Reports that the player swung, whether or not anything was hit.
    PlayerAttacked {
        /// Number of enemies hit by the swing.
        hits: u32,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Planar location of the enemy.
        position: Vec2,
    },
    /// Reports that an enemy changed position.
    EnemyMoved {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Planar location after the move.
        position: Vec2,
        /// Heading in radians after the move.
        facing: f32,
    },
    /// Reports an enemy behaviour transition.
    EnemyStateChanged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// State before the transition.
        from: EnemyState,
        /// State after the transition.
        to: EnemyState,
    },
    /// Reports that a player attack damaged an enemy that survived.
    EnemyDamaged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Planar location after knockback.
        position: Vec2,
        /// Damage applied.
        damage: u32,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an enemy was defeated and removed.
    EnemyDefeated {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Planar location where the enemy fell.
        position: Vec2,
    },
    /// Reports that an enemy struck the player.
    PlayerDamaged {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Damage applied.
        amount: u32,
        /// Player health after the strike.
        health: u32,
    },
    /// Reports an experience award.
    ExperienceGained {
        /// Experience awarded.
        amount: u32,
        /// Experience held after the award and any level up.
        xp: u32,
    },
    /// Reports that the player reached a new level.
    LevelUp {
        /// Level reached.
        level: u32,
    },
    /// Reports resources added to the stockpile outside of collection.
    ResourcesGranted {
        /// Resources that were added.
        resources: ResourceBundle,
    },
    /// Reports that a mission completed and its reward was granted.
    MissionCompleted {
        /// Mission that completed.
        mission: MissionId,
        /// Reward that was granted.
        reward: Reward,
    },
    /// Announces that the player died and the session ended.
    GameOver,
    /// Announces that the session was reset to its initial state.
    SessionReset,
}

/// Reasons a building placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// At least one resource component is below the building's cost.
    #[error("insufficient resources")]
    InsufficientResources,
    /// The configured building limit has been reached.
    #[error("building limit reached")]
    LimitReached,
    /// The requested position lies outside the world bounds.
    #[error("position is outside the world bounds")]
    OutOfBounds,
}

/// Reasons a craft request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum CraftError {
    /// At least one resource component is below the recipe's cost.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Planar location of the player.
    pub position: Vec2,
    /// Heading in radians.
    pub facing: f32,
    /// Current health.
    pub health: u32,
    /// Current stamina.
    pub stamina: u32,
    /// Current level, starting at one.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub xp: u32,
    /// Current stockpile.
    pub resources: ResourceBundle,
}

/// Immutable representation of a single resource node used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceNodeSnapshot {
    /// Identifier allocated to the node by the world.
    pub id: ResourceNodeId,
    /// Resource granted by the node.
    pub kind: ResourceKind,
    /// Planar location of the node.
    pub position: Vec2,
    /// Simulated time at which a collected node becomes available again.
    ///
    /// `None` means the node is available.
    pub respawn_at: Option<Duration>,
}

impl ResourceNodeSnapshot {
    /// Reports whether the node can currently be collected.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.respawn_at.is_none()
    }
}

/// Read-only snapshot describing all resource nodes.
#[derive(Clone, Debug, Default)]
pub struct ResourceNodeView {
    snapshots: Vec<ResourceNodeSnapshot>,
}

impl ResourceNodeView {
    /// Creates a new view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ResourceNodeSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured node snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNodeSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ResourceNodeSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Planar location of the enemy.
    pub position: Vec2,
    /// Heading in radians.
    pub facing: f32,
    /// Health left.
    pub health: u32,
    /// Current behaviour state.
    pub state: EnemyState,
    /// Simulated time of the enemy's last strike, if any.
    pub last_attack_at: Option<Duration>,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a placed building used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingSnapshot {
    /// Identifier allocated to the building by the world.
    pub id: BuildingId,
    /// Type of building.
    pub kind: BuildingKind,
    /// Planar location of the building.
    pub position: Vec2,
}
