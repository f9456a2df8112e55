use arrayvec::ArrayVec;
use event_bus::Event;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::registry::EntityId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory Full.")]
    Full,

    #[error("slot ({row}, {col}) is outside the inventory grid")]
    SlotOutOfBounds { row: usize, col: usize },

    #[error("slot ({row}, {col}) is empty")]
    EmptySlot { row: usize, col: usize },

    #[error("entity {0} has no inventory")]
    MissingInventory(EntityId),

    #[error("grid {rows}x{cols} exceeds the inventory capacity")]
    TooLarge { rows: usize, cols: usize },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Full => ErrorSeverity::Recoverable,
            Self::SlotOutOfBounds { .. } | Self::EmptySlot { .. } | Self::TooLarge { .. } => {
                ErrorSeverity::Validation
            }
            Self::MissingInventory(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Full => "INVENTORY_FULL",
            Self::SlotOutOfBounds { .. } => "INVENTORY_SLOT_OUT_OF_BOUNDS",
            Self::EmptySlot { .. } => "INVENTORY_EMPTY_SLOT",
            Self::MissingInventory(_) => "INVENTORY_MISSING",
            Self::TooLarge { .. } => "INVENTORY_TOO_LARGE",
        }
    }
}

/// Fixed grid of item slots, stored row-major.
pub struct Inventory {
    rows: usize,
    cols: usize,
    slots: ArrayVec<Option<EntityId>, { GameConfig::MAX_INVENTORY_SLOTS }>,
    pub on_inventory_full: Event<EntityId>,
    pub on_updated: Event<EntityId>,
}

impl Inventory {
    pub fn new(rows: usize, cols: usize) -> Result<Self, InventoryError> {
        if rows * cols > GameConfig::MAX_INVENTORY_SLOTS {
            return Err(InventoryError::TooLarge { rows, cols });
        }
        let mut slots = ArrayVec::new();
        slots.extend(std::iter::repeat_n(None, rows * cols));
        Ok(Self {
            rows,
            cols,
            slots,
            on_inventory_full: Event::new(),
            on_updated: Event::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<EntityId>, InventoryError> {
        Ok(self.slots[self.index(row, col)?])
    }

    /// Stores `item` at the slot and returns whatever was there.
    pub fn set(
        &mut self,
        row: usize,
        col: usize,
        item: Option<EntityId>,
    ) -> Result<Option<EntityId>, InventoryError> {
        let index = self.index(row, col)?;
        Ok(std::mem::replace(&mut self.slots[index], item))
    }

    pub fn remove(&mut self, row: usize, col: usize) -> Result<Option<EntityId>, InventoryError> {
        self.set(row, col, None)
    }

    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<(), InventoryError> {
        let first = self.index(a.0, a.1)?;
        let second = self.index(b.0, b.1)?;
        self.slots.swap(first, second);
        Ok(())
    }

    /// Puts `item` in the first free slot, scanning row by row.
    pub fn add_item(&mut self, item: EntityId) -> Result<(usize, usize), InventoryError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(InventoryError::Full)?;
        self.slots[index] = Some(item);
        Ok((index / self.cols, index % self.cols))
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn contains(&self, item: EntityId) -> bool {
        self.slots.contains(&Some(item))
    }

    pub fn items(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().flatten().copied()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, InventoryError> {
        if row >= self.rows || col >= self.cols {
            return Err(InventoryError::SlotOutOfBounds { row, col });
        }
        Ok(row * self.cols + col)
    }
}
