//! The game world as seen by the UI engine.

use game_core::{EntityId, EquipmentSlotName, GameWorld};
use tracing::trace;
use ui_engine::{NodeId, Texture, UiHost};

/// Icon drawn in slots that hold nothing.
pub const EMPTY_SLOT_ICON: &str = "ui/empty";

/// Whose items a slot shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOwner {
    /// Follows the cursor's selected actor.
    SelectedActor,
    /// A fixed entity, e.g. a chest being looted.
    Entity(EntityId),
}

impl SlotOwner {
    pub fn resolve(self, world: &GameWorld) -> Option<EntityId> {
        match self {
            Self::SelectedActor => world.systems.cursor.selected_actor(),
            Self::Entity(entity) => Some(entity),
        }
    }
}

/// What a dragged slot carries. `node` is the source cell, so a receiver can
/// refresh both ends of the drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPayload {
    Ability {
        node: NodeId,
        slot: usize,
    },
    Inventory {
        node: NodeId,
        owner: SlotOwner,
        row: usize,
        col: usize,
    },
    Equipment {
        node: NodeId,
        slot: EquipmentSlotName,
    },
}

impl SlotPayload {
    pub fn source(&self) -> NodeId {
        match *self {
            Self::Ability { node, .. }
            | Self::Inventory { node, .. }
            | Self::Equipment { node, .. } => node,
        }
    }
}

/// [`UiHost`] over a [`GameWorld`].
///
/// While the pointer is over a window the world cursor is disabled and its
/// context switching suspended. The host only undoes what it did itself: if
/// something else (a targeting mode) had already disabled the cursor, the
/// UI leaves it alone.
pub struct GameHost {
    pub world: GameWorld,
    icon_size: f32,
    ui_captured: bool,
}

impl GameHost {
    pub const DEFAULT_ICON_SIZE: f32 = 64.0;

    pub fn new(world: GameWorld) -> Self {
        Self {
            world,
            icon_size: Self::DEFAULT_ICON_SIZE,
            ui_captured: false,
        }
    }

    pub fn with_icon_size(mut self, size: f32) -> Self {
        self.icon_size = size;
        self
    }

    /// Square icon texture for an atlas key.
    pub fn icon(&self, key: &str) -> Texture {
        Texture::new(key, self.icon_size, self.icon_size)
    }

    pub fn selected_actor(&self) -> Option<EntityId> {
        self.world.systems.cursor.selected_actor()
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.ui_captured
    }
}

impl UiHost for GameHost {
    type Payload = SlotPayload;

    fn capture_pointer(&mut self) {
        let cursor = &mut self.world.systems.cursor;
        if self.ui_captured || !cursor.is_enabled() {
            return;
        }
        cursor.disable();
        cursor.disable_context_switching();
        self.ui_captured = true;
        trace!(target: "game::ui", "pointer captured by ui");
    }

    fn release_pointer(&mut self) {
        if !self.ui_captured {
            return;
        }
        let cursor = &mut self.world.systems.cursor;
        cursor.enable();
        cursor.enable_context_switching();
        self.ui_captured = false;
        trace!(target: "game::ui", "pointer released by ui");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameConfig;

    #[test]
    fn capture_leaves_a_foreign_disable_alone() {
        let mut host = GameHost::new(GameWorld::new(GameConfig::default()));
        host.capture_pointer();
        assert!(!host.world.systems.cursor.is_enabled());
        assert!(!host.world.systems.cursor.context_switching());
        host.release_pointer();
        assert!(host.world.systems.cursor.is_enabled());

        host.world.systems.cursor.disable();
        host.capture_pointer();
        assert!(!host.is_pointer_captured());
        host.release_pointer();
        assert!(!host.world.systems.cursor.is_enabled());
    }
}
