#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Outbound presentation contracts for survival adapters.
//!
//! The simulation never draws or plays anything itself. It calls into a
//! [`SceneSink`] and an [`AudioSink`] supplied at construction; both are
//! optional, and a failing sink is logged and skipped rather than allowed to
//! interrupt a tick.

use std::{cell::RefCell, rc::Rc};

use anyhow::Result as AnyResult;
use survival_core::{BuildingId, BuildingKind, EnemyId, ResourceKind, ResourceNodeId, Vec2};

/// RGBA color used for feedback effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Neutral feedback such as collection and welcome texts.
    pub const NOTICE: Color = Color::from_rgb_u8(0xf1, 0xc4, 0x0f);
    /// Damage, rejections and game over.
    pub const DANGER: Color = Color::from_rgb_u8(0xe7, 0x4c, 0x3c);
    /// Successful construction and defeats.
    pub const SUCCESS: Color = Color::from_rgb_u8(0x2e, 0xcc, 0x71);
    /// Level ups and mission rewards.
    pub const REWARD: Color = Color::from_rgb_u8(0x9b, 0x59, 0xb6);

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Handle to a drawable entity owned by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    /// The player avatar.
    Player,
    /// A collectible resource node.
    ResourceNode(ResourceNodeId),
    /// A placed building.
    Building(BuildingId),
    /// A live enemy.
    Enemy(EnemyId),
}

/// Appearance variant requested when an entity is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityVariant {
    /// Resource node of the given kind.
    Resource(ResourceKind),
    /// Building of the given kind.
    Building(BuildingKind),
    /// Hostile creature.
    Enemy,
}

/// Named sound effects the simulation may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundCue {
    /// A resource was collected or an enemy defeated.
    Collect,
    /// A building was placed.
    Build,
    /// The player's attack hit something.
    Attack,
    /// The player levelled up or finished a mission.
    LevelUp,
    /// The player took damage.
    Damage,
}

impl SoundCue {
    /// Stable name used by audio backends to look up the tone.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Build => "build",
            Self::Attack => "attack",
            Self::LevelUp => "level_up",
            Self::Damage => "damage",
        }
    }
}

/// Scene-graph collaborator that visualizes simulation state.
pub trait SceneSink {
    /// Shows a short-lived text effect at a planar world position.
    fn floating_text(&mut self, text: &str, position: Vec2, color: Color) -> AnyResult<()>;

    /// Starts the cosmetic transition of lights and fog toward day or night.
    fn lighting_transition(&mut self, to_day: bool) -> AnyResult<()>;

    /// Shakes the camera once.
    fn camera_shake(&mut self) -> AnyResult<()>;

    /// Shows or hides an existing entity.
    fn set_visibility(&mut self, entity: EntityRef, visible: bool) -> AnyResult<()>;

    /// Creates the visual for a new entity.
    fn create_entity(
        &mut self,
        entity: EntityRef,
        variant: EntityVariant,
        position: Vec2,
    ) -> AnyResult<()>;

    /// Moves an existing entity.
    fn move_entity(&mut self, entity: EntityRef, position: Vec2, facing: f32) -> AnyResult<()>;

    /// Removes the visual of an entity that left the world.
    fn remove_entity(&mut self, entity: EntityRef) -> AnyResult<()>;
}

/// Audio collaborator that plays named tones.
pub trait AudioSink {
    /// Plays the provided cue once.
    fn play(&mut self, cue: SoundCue) -> AnyResult<()>;
}

/// Recorded outbound presentation request.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// See [`SceneSink::floating_text`].
    FloatingText {
        /// Text to display.
        text: String,
        /// Planar world position.
        position: Vec2,
        /// Text color.
        color: Color,
    },
    /// See [`SceneSink::lighting_transition`].
    LightingTransition {
        /// Whether the scene transitions to day.
        to_day: bool,
    },
    /// See [`SceneSink::camera_shake`].
    CameraShake,
    /// See [`SceneSink::set_visibility`].
    Visibility {
        /// Entity affected.
        entity: EntityRef,
        /// Whether the entity is shown.
        visible: bool,
    },
    /// See [`SceneSink::create_entity`].
    EntityCreated {
        /// Entity created.
        entity: EntityRef,
        /// Appearance variant.
        variant: EntityVariant,
        /// Planar world position.
        position: Vec2,
    },
    /// See [`SceneSink::move_entity`].
    EntityMoved {
        /// Entity moved.
        entity: EntityRef,
        /// Planar world position.
        position: Vec2,
        /// Heading in radians.
        facing: f32,
    },
    /// See [`SceneSink::remove_entity`].
    EntityRemoved {
        /// Entity removed.
        entity: EntityRef,
    },
    /// See [`AudioSink::play`].
    Sound {
        /// Cue played.
        cue: SoundCue,
    },
}

/// Shared in-memory recorder implementing both sinks.
///
/// Clones share the same buffer, so one handle can be given to the
/// simulation while another inspects what was requested.
#[derive(Clone, Debug, Default)]
pub struct SignalLog {
    signals: Rc<RefCell<Vec<Signal>>>,
}

impl SignalLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every recorded signal in request order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }

    /// Removes and returns every recorded signal.
    #[must_use]
    pub fn drain(&self) -> Vec<Signal> {
        std::mem::take(&mut *self.signals.borrow_mut())
    }

    /// Number of recorded signals matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Signal) -> bool) -> usize {
        self.signals
            .borrow()
            .iter()
            .filter(|signal| predicate(signal))
            .count()
    }

    fn record(&self, signal: Signal) -> AnyResult<()> {
        self.signals.borrow_mut().push(signal);
        Ok(())
    }
}

impl SceneSink for SignalLog {
    fn floating_text(&mut self, text: &str, position: Vec2, color: Color) -> AnyResult<()> {
        self.record(Signal::FloatingText {
            text: text.to_owned(),
            position,
            color,
        })
    }

    fn lighting_transition(&mut self, to_day: bool) -> AnyResult<()> {
        self.record(Signal::LightingTransition { to_day })
    }

    fn camera_shake(&mut self) -> AnyResult<()> {
        self.record(Signal::CameraShake)
    }

    fn set_visibility(&mut self, entity: EntityRef, visible: bool) -> AnyResult<()> {
        self.record(Signal::Visibility { entity, visible })
    }

    fn create_entity(
        &mut self,
        entity: EntityRef,
        variant: EntityVariant,
        position: Vec2,
    ) -> AnyResult<()> {
        self.record(Signal::EntityCreated {
            entity,
            variant,
            position,
        })
    }

    fn move_entity(&mut self, entity: EntityRef, position: Vec2, facing: f32) -> AnyResult<()> {
        self.record(Signal::EntityMoved {
            entity,
            position,
            facing,
        })
    }

    fn remove_entity(&mut self, entity: EntityRef) -> AnyResult<()> {
        self.record(Signal::EntityRemoved { entity })
    }
}

impl AudioSink for SignalLog {
    fn play(&mut self, cue: SoundCue) -> AnyResult<()> {
        self.record(Signal::Sound { cue })
    }
}
