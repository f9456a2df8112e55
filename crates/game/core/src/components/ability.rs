use event_bus::Event;

use crate::math::Vec3;
use crate::registry::EntityId;

/// Countdown polled by state handlers once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    max: f32,
    remaining: f32,
    running: bool,
}

impl Timer {
    pub fn new(max: f32) -> Self {
        Self {
            max,
            remaining: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.max;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.remaining = 0.0;
        self.running = false;
    }

    pub fn update(&mut self, dt: f32) {
        if self.running {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Started and run down to zero.
    pub fn has_finished(&self) -> bool {
        self.running && self.remaining <= 0.0
    }

    /// Not counting down; a stopped or finished timer is ready.
    pub fn is_ready(&self) -> bool {
        !self.running || self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Published when an ability resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityExecuted {
    pub ability: EntityId,
    pub caster: EntityId,
    pub target: Option<EntityId>,
}

/// Ability instance owned by one caster. Lives on its own entity.
pub struct Ability {
    pub name: String,
    pub caster: EntityId,
    pub cooldown: Timer,
    pub cast_delay: Timer,
    /// Needs a ground target picked with the cursor before casting.
    pub cursor_based: bool,
    /// Recasts itself whenever the cooldown finishes (auto-attacks).
    pub repeatable: bool,
    pub range: f32,
    pub damage: u32,
    /// Ground point picked while in cursor selection.
    pub target_point: Option<Vec3>,
    pub icon: String,
    pub description: String,

    pub start_cast: Event<EntityId>,
    pub cancel_cast: Event<EntityId>,
    pub on_execute: Event<AbilityExecuted>,
}

impl Ability {
    pub fn new(name: impl Into<String>, caster: EntityId, cooldown: f32, cast_delay: f32) -> Self {
        let name = name.into();
        Self {
            icon: name.to_lowercase().replace(' ', "_"),
            name,
            caster,
            cooldown: Timer::new(cooldown),
            cast_delay: Timer::new(cast_delay),
            cursor_based: false,
            repeatable: false,
            range: 5.0,
            damage: 1,
            target_point: None,
            description: String::new(),
            start_cast: Event::new(),
            cancel_cast: Event::new(),
            on_execute: Event::new(),
        }
    }

    pub fn cursor_based(mut self) -> Self {
        self.cursor_based = true;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Ability is casting or waiting out its cooldown.
    pub fn is_active(&self) -> bool {
        self.cooldown.is_running() && !self.cooldown.has_finished()
    }
}

/// Hotbar of ability entities for one actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityBar {
    slots: [Option<EntityId>; AbilityBar::SLOTS],
}

impl AbilityBar {
    pub const SLOTS: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: usize) -> Option<EntityId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Binds `ability` to `slot`; out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, ability: Option<EntityId>) -> Option<EntityId> {
        let entry = self.slots.get_mut(slot)?;
        std::mem::replace(entry, ability)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= Self::SLOTS || b >= Self::SLOTS {
            return false;
        }
        self.slots.swap(a, b);
        true
    }
}
