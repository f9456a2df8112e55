use game_core::{EntityId, InventoryError};
use tracing::{debug, warn};
use ui_engine::{CellElement, DropOutcome, ElementCx, ImageOverflow, NodeId, UiEngine, UiError, Vec2};

use super::{
    HoverTooltip, ensure_droppable, item_data, refresh_pair, released_over_world,
    report_drop_failure, show_icon, slot_element,
};
use crate::host::{GameHost, SlotOwner, SlotPayload};

/// One cell of an inventory grid.
///
/// Receiving another slot of the same owner swaps the two items; a slot of a
/// different owner moves the item into the first free slot here. An
/// equipment slot dropped here unequips into this cell.
#[derive(Debug)]
pub struct InventorySlot {
    cell: NodeId,
    owner: SlotOwner,
    row: usize,
    col: usize,
    tooltip: HoverTooltip,
}

impl InventorySlot {
    pub fn install(
        ui: &mut UiEngine<GameHost>,
        host: &GameHost,
        cell: NodeId,
        owner: SlotOwner,
        row: usize,
        col: usize,
    ) -> Result<(), UiError> {
        let behavior = Self {
            cell,
            owner,
            row,
            col,
            tooltip: HoverTooltip::default(),
        };
        ui.tree_mut().set_element(
            cell,
            slot_element(host, ImageOverflow::ShrinkToFit),
            Some(Box::new(behavior)),
        )
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn item(&self, host: &GameHost) -> Option<EntityId> {
        let owner = self.owner.resolve(&host.world)?;
        let inventory = host.world.registry.inventories.get(owner)?;
        inventory.get(self.row, self.col).ok().flatten()
    }

    fn swap_within(
        &self,
        cx: &mut ElementCx<'_, GameHost>,
        owner: EntityId,
        from: (usize, usize),
    ) -> Result<(), InventoryError> {
        let inventory = cx
            .host
            .world
            .registry
            .inventories
            .get_mut(owner)
            .ok_or(InventoryError::MissingInventory(owner))?;
        inventory.swap(from, self.position())?;
        inventory.on_updated.publish(&owner);
        Ok(())
    }

    fn drop_in_world(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let Some(owner) = self.owner.resolve(&cx.host.world) else {
            return;
        };
        let Some(item) = self.item(cx.host) else {
            return;
        };
        let droppable = item_data(&cx.host.world, item).cloned();
        if let Some(data) = droppable
            && !ensure_droppable(cx, &data)
        {
            return;
        }
        let point = cx.host.world.systems.cursor.world_point();
        match cx.host.world.drop_item_in_world(owner, self.position(), point) {
            Ok(item) => {
                debug!(target: "game::ui", %owner, %item, "inventory item dropped in world");
                let own = cx.node();
                cx.refresh(own);
            }
            Err(err) => report_drop_failure(cx, err),
        }
    }
}

impl CellElement<GameHost> for InventorySlot {
    fn retrieve_info(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let texture = self
            .item(cx.host)
            .and_then(|item| item_data(&cx.host.world, item))
            .map(|data| cx.host.icon(&data.icon));
        show_icon(cx, texture);
    }

    fn hover_update(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let item = self.item(cx.host);
        self.tooltip.update(
            cx,
            |rect| Vec2::new(rect.right(), rect.y - rect.height),
            |host| {
                let data = item_data(&host.world, item?)?;
                Some((data.name.clone(), data.description.clone()))
            },
        );
    }

    fn on_hover_stop(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        self.tooltip.close(cx);
    }

    fn on_drag_start(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        self.tooltip.close(cx);
    }

    fn payload(&self) -> Option<SlotPayload> {
        Some(SlotPayload::Inventory {
            node: self.cell,
            owner: self.owner,
            row: self.row,
            col: self.col,
        })
    }

    fn receive_drop(&mut self, cx: &mut ElementCx<'_, GameHost>, payload: &SlotPayload) {
        let Some(owner) = self.owner.resolve(&cx.host.world) else {
            return;
        };
        match *payload {
            SlotPayload::Inventory {
                owner: source,
                row,
                col,
                ..
            } => {
                let Some(source) = source.resolve(&cx.host.world) else {
                    return;
                };
                let result = if source == owner {
                    self.swap_within(cx, owner, (row, col))
                } else {
                    cx.host
                        .world
                        .transfer_item(source, (row, col), owner)
                        .map(|_| ())
                };
                match result {
                    Ok(()) => refresh_pair(cx, payload),
                    Err(InventoryError::Full) => {
                        warn!(target: "game::ui", %owner, "inventory full");
                        cx.show_error(InventoryError::Full.to_string());
                    }
                    Err(err) => warn!(target: "game::ui", error = %err, "inventory drop failed"),
                }
            }
            SlotPayload::Equipment { slot, .. } => {
                if cx.host.selected_actor() != Some(owner) {
                    debug!(target: "game::ui", %owner, "equipment only unequips into its wearer's inventory");
                    return;
                }
                match cx
                    .host
                    .world
                    .unequip_to_inventory(owner, slot, self.position())
                {
                    Ok(()) => refresh_pair(cx, payload),
                    Err(err) => debug!(target: "game::ui", error = %err, "unequip refused"),
                }
            }
            SlotPayload::Ability { .. } => {
                debug!(target: "game::ui", "inventory slot ignores abilities");
            }
        }
    }

    fn on_drop(&mut self, cx: &mut ElementCx<'_, GameHost>, outcome: DropOutcome) {
        if released_over_world(cx, outcome) {
            self.drop_in_world(cx);
        }
    }
}
