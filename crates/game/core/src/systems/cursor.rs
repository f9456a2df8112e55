use event_bus::Event;
use tracing::debug;

use crate::math::Vec3;
use crate::registry::EntityId;

/// World-side pointer: actor selection, terrain point and interaction gating.
///
/// The UI disables world interaction while the pointer is over a window and
/// turns off context switching so hovering a widget does not change the
/// cursor's world context.
pub struct Cursor {
    selected_actor: Option<EntityId>,
    world_point: Vec3,
    enabled: bool,
    hidden: bool,
    context_switching: bool,

    /// `(previous, new)` selected actor.
    pub on_selected_actor_change: Event<(Option<EntityId>, EntityId)>,
    /// Left click on the terrain while enabled.
    pub on_floor_click: Event<Vec3>,
    /// Every left click, enabled or not. Targeting modes that disable the
    /// cursor listen here.
    pub on_click: Event<Vec3>,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            selected_actor: None,
            world_point: Vec3::ZERO,
            enabled: true,
            hidden: false,
            context_switching: true,
            on_selected_actor_change: Event::new(),
            on_floor_click: Event::new(),
            on_click: Event::new(),
        }
    }

    pub fn selected_actor(&self) -> Option<EntityId> {
        self.selected_actor
    }

    pub fn select_actor(&mut self, actor: EntityId) {
        let previous = self.selected_actor.replace(actor);
        if previous != Some(actor) {
            debug!(target: "game::cursor", ?previous, %actor, "selected actor changed");
            self.on_selected_actor_change.publish(&(previous, actor));
        }
    }

    pub fn world_point(&self) -> Vec3 {
        self.world_point
    }

    pub fn set_world_point(&mut self, point: Vec3) {
        self.world_point = point;
    }

    /// Publishes a click at the current world point, and a floor click when
    /// world interaction is enabled. Returns whether the floor click fired.
    pub fn click(&self) -> bool {
        self.on_click.publish(&self.world_point);
        if !self.enabled {
            return false;
        }
        self.on_floor_click.publish(&self.world_point);
        true
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn enable_context_switching(&mut self) {
        self.context_switching = true;
    }

    pub fn disable_context_switching(&mut self) {
        self.context_switching = false;
    }

    pub fn context_switching(&self) -> bool {
        self.context_switching
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
