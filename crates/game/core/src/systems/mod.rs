//! World-level services shared by every entity.
mod cursor;
mod movement;

use event_bus::Event;

pub use cursor::Cursor;
pub use movement::{MovementError, MovementSystem, PathFinder, StraightLine};

use crate::config::GameConfig;
use crate::math::Vec3;
use crate::registry::{EntityId, Registry};

/// Frame clock. `now` is seconds since the world was created.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    now: f64,
    delta: f32,
}

impl Clock {
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.now += f64::from(self.delta);
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

/// Collision collaborator answering "can `from` see `to`".
pub trait LineOfSight {
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool;
}

impl<F> LineOfSight for F
where
    F: Fn(Vec3, Vec3) -> bool,
{
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

/// No obstacles anywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl LineOfSight for OpenField {
    fn has_line_of_sight(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}

/// Game-wide notifications not owned by any one entity.
#[derive(Default)]
pub struct GameEvents {
    /// An enemy entered combat.
    pub combat_started: Event<EntityId>,
    pub wave_requested: Event<()>,
}

pub struct Systems {
    pub config: GameConfig,
    pub clock: Clock,
    pub cursor: Cursor,
    pub movement: MovementSystem,
    pub sight: Box<dyn LineOfSight>,
    pub events: GameEvents,
}

impl Systems {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            clock: Clock::default(),
            cursor: Cursor::new(),
            movement: MovementSystem::new(StraightLine),
            sight: Box::new(OpenField),
            events: GameEvents::default(),
        }
    }

    /// Advances one-shot animations and publishes their end events.
    pub fn update_animations(&self, registry: &mut Registry) {
        let dt = self.clock.delta();
        let ended: Vec<EntityId> = registry
            .animations
            .iter_mut()
            .filter_map(|(entity, animation)| animation.advance(dt).then_some(entity))
            .collect();
        for entity in ended {
            if let Some(animation) = registry.animations.get(entity) {
                animation.on_animation_end.publish(&entity);
            }
        }
    }
}

impl Default for Systems {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
