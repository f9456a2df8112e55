use event_bus::Event;
use strum::{Display, EnumIter};

use crate::registry::EntityId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationKind {
    #[default]
    Idle,
    Move,
    Run,
    Attack,
    Death,
}

/// Currently playing clip. One-shot clips publish `on_animation_end` once.
pub struct Animation {
    current: AnimationKind,
    elapsed: f32,
    one_shot: Option<f32>,
    finished: bool,
    pub on_animation_end: Event<EntityId>,
}

impl Animation {
    pub fn new() -> Self {
        Self {
            current: AnimationKind::Idle,
            elapsed: 0.0,
            one_shot: None,
            finished: false,
            on_animation_end: Event::new(),
        }
    }

    pub fn current(&self) -> AnimationKind {
        self.current
    }

    /// Switches to a looping clip. Re-selecting the playing clip is a no-op.
    pub fn change(&mut self, kind: AnimationKind) {
        if self.current == kind && self.one_shot.is_none() {
            return;
        }
        self.current = kind;
        self.elapsed = 0.0;
        self.one_shot = None;
        self.finished = false;
    }

    /// Plays `kind` once for `duration` seconds.
    pub fn play_once(&mut self, kind: AnimationKind, duration: f32) {
        self.current = kind;
        self.elapsed = 0.0;
        self.one_shot = Some(duration.max(0.0));
        self.finished = false;
    }

    /// Advances the clip; returns true on the frame a one-shot clip ends.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        match self.one_shot {
            Some(duration) if !self.finished && self.elapsed >= duration => {
                self.finished = true;
                true
            }
            _ => false,
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}
