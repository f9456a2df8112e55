use std::collections::BTreeMap;

use event_bus::Event;
use strum::{Display, EnumIter};

use crate::components::{InventoryError, ItemFlags};
use crate::error::{ErrorSeverity, GameError};
use crate::registry::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentSlotName {
    Helm,
    Boots,
    Chest,
    Arms,
    Legs,
    Belt,
    LeftHand,
    RightHand,
    Amulet,
    Ring1,
    Ring2,
}

impl EquipmentSlotName {
    /// Whether an item with `flags` may be worn in this slot.
    pub fn accepts(self, flags: ItemFlags) -> bool {
        if flags.contains(ItemFlags::WEAPON) {
            return match self {
                Self::LeftHand => true,
                Self::RightHand => !flags.intersects(
                    ItemFlags::MAIN_HAND_ONLY
                        | ItemFlags::TWO_HANDED
                        | ItemFlags::BOW
                        | ItemFlags::CROSSBOW,
                ),
                _ => false,
            };
        }
        if flags.contains(ItemFlags::ARMOR) {
            return match self.armor_kind() {
                Some(kind) => flags.contains(kind),
                None => false,
            };
        }
        false
    }

    fn armor_kind(self) -> Option<ItemFlags> {
        match self {
            Self::Helm => Some(ItemFlags::HELMET),
            Self::Amulet => Some(ItemFlags::AMULET),
            Self::Chest => Some(ItemFlags::CHEST),
            Self::Belt => Some(ItemFlags::BELT),
            Self::Arms => Some(ItemFlags::ARMS),
            Self::Legs => Some(ItemFlags::LEGS),
            Self::Boots => Some(ItemFlags::BOOTS),
            Self::Ring1 | Self::Ring2 => Some(ItemFlags::RING),
            Self::LeftHand | Self::RightHand => None,
        }
    }

    fn is_ring(self) -> bool {
        matches!(self, Self::Ring1 | Self::Ring2)
    }

    fn is_hand(self) -> bool {
        matches!(self, Self::LeftHand | Self::RightHand)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentError {
    #[error("{item} cannot be worn in the {slot} slot")]
    InvalidSlot { item: EntityId, slot: EquipmentSlotName },

    #[error("{first} and {second} cannot be swapped")]
    SwapNotAllowed {
        first: EquipmentSlotName,
        second: EquipmentSlotName,
    },

    #[error("entity {0} has no equipment")]
    MissingEquipment(EntityId),

    #[error("entity {0} is not an item")]
    NotAnItem(EntityId),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl GameError for EquipmentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidSlot { .. } | Self::SwapNotAllowed { .. } => ErrorSeverity::Validation,
            Self::MissingEquipment(_) | Self::NotAnItem(_) => ErrorSeverity::Internal,
            Self::Inventory(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSlot { .. } => "EQUIPMENT_INVALID_SLOT",
            Self::SwapNotAllowed { .. } => "EQUIPMENT_SWAP_NOT_ALLOWED",
            Self::MissingEquipment(_) => "EQUIPMENT_MISSING",
            Self::NotAnItem(_) => "EQUIPMENT_NOT_AN_ITEM",
            Self::Inventory(inner) => inner.error_code(),
        }
    }
}

/// Items currently worn by one actor.
pub struct Equipment {
    slots: BTreeMap<EquipmentSlotName, EntityId>,
    pub on_updated: Event<EntityId>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            on_updated: Event::new(),
        }
    }

    pub fn get(&self, slot: EquipmentSlotName) -> Option<EntityId> {
        self.slots.get(&slot).copied()
    }

    /// Puts `item` in `slot`, returning what was worn there.
    pub fn set(&mut self, slot: EquipmentSlotName, item: EntityId) -> Option<EntityId> {
        self.slots.insert(slot, item)
    }

    pub fn clear(&mut self, slot: EquipmentSlotName) -> Option<EntityId> {
        self.slots.remove(&slot)
    }

    /// Swaps two slots of the same family (both rings or both hands).
    pub fn swap(
        &mut self,
        first: EquipmentSlotName,
        second: EquipmentSlotName,
    ) -> Result<(), EquipmentError> {
        let same_family = (first.is_ring() && second.is_ring()) || (first.is_hand() && second.is_hand());
        if !same_family {
            return Err(EquipmentError::SwapNotAllowed { first, second });
        }
        let a = self.slots.remove(&first);
        let b = self.slots.remove(&second);
        if let Some(item) = a {
            self.slots.insert(second, item);
        }
        if let Some(item) = b {
            self.slots.insert(first, item);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlotName, EntityId)> + '_ {
        self.slots.iter().map(|(slot, item)| (*slot, *item))
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}
