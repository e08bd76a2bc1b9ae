//! Translation of world events into presentation requests.

use anyhow::Result as AnyResult;
use survival_core::{Event, PlacementError, Vec2};
use survival_presentation::{AudioSink, Color, EntityRef, EntityVariant, SceneSink, SoundCue};
use survival_world::{query, World};
use tracing::{trace, warn};

/// Optional presentation collaborators and the rules for feeding them.
#[derive(Default)]
pub(crate) struct Presenter {
    scene: Option<Box<dyn SceneSink>>,
    audio: Option<Box<dyn AudioSink>>,
}

impl Presenter {
    pub(crate) fn set_scene(&mut self, sink: Box<dyn SceneSink>) {
        self.scene = Some(sink);
    }

    pub(crate) fn set_audio(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = Some(sink);
    }

    /// Requests the visuals for every event in order.
    ///
    /// `world` must already reflect the events, it supplies positions that the
    /// events themselves do not carry.
    pub(crate) fn present(&mut self, events: &[Event], world: &World) {
        let player = query::player_position(world);
        for event in events {
            self.present_one(event, player, world);
        }
    }

    pub(crate) fn text(&mut self, text: &str, position: Vec2, color: Color) {
        self.scene("floating_text", |sink| sink.floating_text(text, position, color));
    }

    pub(crate) fn remove(&mut self, entity: EntityRef) {
        self.scene("remove_entity", |sink| sink.remove_entity(entity));
    }

    fn present_one(&mut self, event: &Event, player: Vec2, world: &World) {
        match event {
            Event::TimeAdvanced { .. }
            | Event::EnemyStateChanged { .. }
            | Event::ExperienceGained { .. }
            | Event::ResourcesGranted { .. }
            | Event::SessionReset => {}
            Event::DayPhaseChanged { is_day } => {
                let to_day = *is_day;
                self.scene("lighting_transition", |sink| {
                    sink.lighting_transition(to_day)
                });
            }
            Event::PlayerMoved { position, facing } => {
                let (position, facing) = (*position, *facing);
                self.scene("move_entity", |sink| {
                    sink.move_entity(EntityRef::Player, position, facing)
                });
            }
            Event::ResourceNodeSpawned {
                node,
                kind,
                position,
            } => {
                let (entity, variant, position) = (
                    EntityRef::ResourceNode(*node),
                    EntityVariant::Resource(*kind),
                    *position,
                );
                self.scene("create_entity", |sink| {
                    sink.create_entity(entity, variant, position)
                });
            }
            Event::ResourceCollected {
                node,
                kind,
                position,
                ..
            } => {
                self.visibility(EntityRef::ResourceNode(*node), false);
                self.text(&format!("+1 {}", kind.name()), *position, Color::NOTICE);
                self.sound(SoundCue::Collect);
            }
            Event::ResourceNodeRestored { node, .. } => {
                self.visibility(EntityRef::ResourceNode(*node), true);
            }
            Event::BuildingPlaced {
                building,
                kind,
                position,
            } => {
                let (entity, variant, position) = (
                    EntityRef::Building(*building),
                    EntityVariant::Building(*kind),
                    *position,
                );
                self.scene("create_entity", |sink| {
                    sink.create_entity(entity, variant, position)
                });
                self.text(&format!("Built {}", kind.name()), position, Color::SUCCESS);
                self.sound(SoundCue::Build);
            }
            Event::BuildingRejected { reason, .. } => {
                let text = match reason {
                    PlacementError::InsufficientResources => "Not enough resources",
                    PlacementError::LimitReached => "Building limit reached",
                    PlacementError::OutOfBounds => "Cannot build there",
                };
                self.text(text, player, Color::DANGER);
            }
            Event::ItemCrafted { recipe, .. } => {
                self.text(&format!("Crafted {}", recipe.name()), player, Color::SUCCESS);
                self.sound(SoundCue::Build);
            }
            Event::CraftRejected { .. } => {
                self.text("Not enough resources", player, Color::DANGER);
            }
            Event::PlayerAttacked { hits } => {
                if *hits > 0 {
                    self.text("Attack!", player, Color::NOTICE);
                    self.sound(SoundCue::Attack);
                }
            }
            Event::EnemySpawned { enemy, position } => {
                let (entity, position) = (EntityRef::Enemy(*enemy), *position);
                self.scene("create_entity", |sink| {
                    sink.create_entity(entity, EntityVariant::Enemy, position)
                });
            }
            Event::EnemyMoved {
                enemy,
                position,
                facing,
            } => {
                let (entity, position, facing) = (EntityRef::Enemy(*enemy), *position, *facing);
                self.scene("move_entity", |sink| {
                    sink.move_entity(entity, position, facing)
                });
            }
            Event::EnemyDamaged {
                enemy,
                position,
                damage,
                ..
            } => {
                let facing = query::enemies(world)
                    .iter()
                    .find(|snapshot| snapshot.id == *enemy)
                    .map(|snapshot| snapshot.facing);
                if let Some(facing) = facing {
                    let (entity, position) = (EntityRef::Enemy(*enemy), *position);
                    self.scene("move_entity", |sink| {
                        sink.move_entity(entity, position, facing)
                    });
                }
                self.text(&format!("-{damage}"), *position, Color::DANGER);
            }
            Event::EnemyDefeated { enemy, position } => {
                self.remove(EntityRef::Enemy(*enemy));
                self.text("Defeated!", *position, Color::SUCCESS);
                self.sound(SoundCue::Collect);
            }
            Event::PlayerDamaged { amount, .. } => {
                self.text(&format!("-{amount}"), player, Color::DANGER);
                self.sound(SoundCue::Damage);
                self.scene("camera_shake", |sink| sink.camera_shake());
            }
            Event::LevelUp { level } => {
                self.text(&format!("Level {level}!"), player, Color::REWARD);
                self.sound(SoundCue::LevelUp);
            }
            Event::MissionCompleted { mission, .. } => {
                self.text(
                    &format!("Mission complete: {}", mission.title()),
                    player,
                    Color::REWARD,
                );
                self.sound(SoundCue::LevelUp);
            }
            Event::GameOver => self.text("Game Over", player, Color::DANGER),
        }
    }

    fn visibility(&mut self, entity: EntityRef, visible: bool) {
        self.scene("set_visibility", |sink| sink.set_visibility(entity, visible));
    }

    fn sound(&mut self, cue: SoundCue) {
        match self.audio.as_deref_mut() {
            Some(sink) => {
                if let Err(error) = sink.play(cue) {
                    warn!(cue = cue.name(), %error, "audio sink failed");
                }
            }
            None => trace!(cue = cue.name(), "no audio sink; sound skipped"),
        }
    }

    fn scene(
        &mut self,
        request: &'static str,
        call: impl FnOnce(&mut dyn SceneSink) -> AnyResult<()>,
    ) {
        match self.scene.as_deref_mut() {
            Some(sink) => {
                if let Err(error) = call(sink) {
                    warn!(request, %error, "scene sink failed");
                }
            }
            None => trace!(request, "no scene sink; request skipped"),
        }
    }
}
