use game_core::{EntityId, EquipmentError, EquipmentSlotName};
use tracing::{debug, warn};
use ui_engine::{CellElement, DropOutcome, ElementCx, ImageOverflow, NodeId, UiEngine, UiError, Vec2};

use super::{
    HoverTooltip, ensure_droppable, item_data, refresh_pair, released_over_world,
    report_drop_failure, show_icon, slot_element,
};
use crate::host::{GameHost, SlotPayload};

/// One worn-item slot of the selected actor.
#[derive(Debug)]
pub struct EquipmentSlot {
    cell: NodeId,
    slot: EquipmentSlotName,
    tooltip: HoverTooltip,
}

impl EquipmentSlot {
    pub fn install(
        ui: &mut UiEngine<GameHost>,
        host: &GameHost,
        cell: NodeId,
        slot: EquipmentSlotName,
    ) -> Result<(), UiError> {
        let behavior = Self {
            cell,
            slot,
            tooltip: HoverTooltip::default(),
        };
        ui.tree_mut().set_element(
            cell,
            slot_element(host, ImageOverflow::ShrinkToFit),
            Some(Box::new(behavior)),
        )
    }

    pub fn slot(&self) -> EquipmentSlotName {
        self.slot
    }

    fn worn(&self, host: &GameHost) -> Option<(EntityId, EntityId)> {
        let actor = host.selected_actor()?;
        let item = host.world.registry.equipment.get(actor)?.get(self.slot)?;
        Some((actor, item))
    }

    fn swap_with(
        &self,
        cx: &mut ElementCx<'_, GameHost>,
        actor: EntityId,
        other: EquipmentSlotName,
    ) -> Result<(), EquipmentError> {
        let equipment = cx
            .host
            .world
            .registry
            .equipment
            .get_mut(actor)
            .ok_or(EquipmentError::MissingEquipment(actor))?;
        equipment.swap(other, self.slot)?;
        equipment.on_updated.publish(&actor);
        Ok(())
    }

    fn drop_in_world(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let Some((actor, item)) = self.worn(cx.host) else {
            return;
        };
        let droppable = item_data(&cx.host.world, item).cloned();
        if let Some(data) = droppable
            && !ensure_droppable(cx, &data)
        {
            return;
        }
        let point = cx.host.world.systems.cursor.world_point();
        match cx.host.world.drop_worn_item_in_world(actor, self.slot, point) {
            Ok(item) => {
                debug!(target: "game::ui", %actor, %item, slot = %self.slot, "worn item dropped in world");
                let own = cx.node();
                cx.refresh(own);
            }
            Err(err) => report_drop_failure(cx, err),
        }
    }
}

impl CellElement<GameHost> for EquipmentSlot {
    fn retrieve_info(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let texture = self
            .worn(cx.host)
            .and_then(|(_, item)| item_data(&cx.host.world, item))
            .map(|data| cx.host.icon(&data.icon));
        show_icon(cx, texture);
    }

    fn hover_update(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let item = self.worn(cx.host).map(|(_, item)| item);
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
        Some(SlotPayload::Equipment {
            node: self.cell,
            slot: self.slot,
        })
    }

    fn receive_drop(&mut self, cx: &mut ElementCx<'_, GameHost>, payload: &SlotPayload) {
        let Some(actor) = cx.host.selected_actor() else {
            return;
        };
        let result = match *payload {
            SlotPayload::Inventory {
                owner, row, col, ..
            } => {
                if owner.resolve(&cx.host.world) != Some(actor) {
                    debug!(target: "game::ui", "only the wearer's own items can be equipped");
                    return;
                }
                cx.host
                    .world
                    .equip_from_inventory(actor, (row, col), self.slot)
            }
            SlotPayload::Equipment { slot, .. } => self.swap_with(cx, actor, slot),
            SlotPayload::Ability { .. } => {
                debug!(target: "game::ui", "equipment slot ignores abilities");
                return;
            }
        };
        match result {
            Ok(()) => refresh_pair(cx, payload),
            Err(
                err @ (EquipmentError::InvalidSlot { .. } | EquipmentError::SwapNotAllowed { .. }),
            ) => debug!(target: "game::ui", error = %err, "equipment drop refused"),
            Err(err) => warn!(target: "game::ui", error = %err, "equipment drop failed"),
        }
    }

    fn on_drop(&mut self, cx: &mut ElementCx<'_, GameHost>, outcome: DropOutcome) {
        if released_over_world(cx, outcome) {
            self.drop_in_world(cx);
        }
    }
}
