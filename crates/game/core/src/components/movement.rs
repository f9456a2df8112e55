use std::collections::VecDeque;

use event_bus::Event;

use crate::math::Vec3;
use crate::registry::EntityId;

/// Path-following state and the movement lifecycle events of one actor.
///
/// Every event carries the moving entity so that one callback can serve
/// several actors.
pub struct MoveableActor {
    pub speed: f32,
    /// Remaining waypoints; the back is the final destination.
    pub path: VecDeque<Vec3>,
    /// Actor this one is currently tracking (leader, attack target).
    pub actor_target: Option<EntityId>,

    pub on_start_movement: Event<EntityId>,
    pub on_path_changed: Event<EntityId>,
    pub on_destination_reached: Event<EntityId>,
    pub on_movement_cancel: Event<EntityId>,
    pub on_destination_unreachable: Event<(EntityId, Vec3)>,
}

impl MoveableActor {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            path: VecDeque::new(),
            actor_target: None,
            on_start_movement: Event::new(),
            on_path_changed: Event::new(),
            on_destination_reached: Event::new(),
            on_movement_cancel: Event::new(),
            on_destination_unreachable: Event::new(),
        }
    }

    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.path.back().copied()
    }
}
