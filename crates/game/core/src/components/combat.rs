use event_bus::Event;

use crate::math::Vec3;
use crate::registry::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackData {
    pub attacker: EntityId,
    pub hit: EntityId,
    pub damage: u32,
}

pub struct Combatant {
    pub hp: u32,
    pub max_hp: u32,
    pub target: Option<EntityId>,
    pub dying: bool,
    /// Ability entity cast repeatedly while in combat.
    pub auto_attack: Option<EntityId>,
    /// Where an idle enemy heads when it has nothing to fight.
    pub rally_point: Option<Vec3>,

    pub on_hit: Event<AttackData>,
    pub on_death: Event<EntityId>,
}

impl Combatant {
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            target: None,
            dying: false,
            auto_attack: None,
            rally_point: None,
            on_hit: Event::new(),
            on_death: Event::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0 && !self.dying
    }

    /// Subtracts `damage`; returns true if this hit was the killing blow.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(damage);
        was_alive && self.hp == 0
    }
}
