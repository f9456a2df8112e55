use game_core::{Ability, EntityId};
use tracing::debug;
use ui_engine::{
    CellElement, Effect, ElementCx, ImageOverflow, NodeId, UiEngine, UiError, Vec2,
};

use super::{HoverTooltip, refresh_pair, show_icon, slot_element};
use crate::host::{GameHost, SlotPayload};

/// One button of the selected actor's ability bar.
///
/// Empty slots are locked. The icon is drawn in grayscale while the
/// ability's cooldown runs. Dropping another ability slot here swaps the two
/// bindings.
#[derive(Debug)]
pub struct AbilitySlot {
    cell: NodeId,
    slot: usize,
    tooltip: HoverTooltip,
}

impl AbilitySlot {
    pub fn install(
        ui: &mut UiEngine<GameHost>,
        host: &GameHost,
        cell: NodeId,
        slot: usize,
    ) -> Result<(), UiError> {
        let behavior = Self {
            cell,
            slot,
            tooltip: HoverTooltip::default(),
        };
        ui.tree_mut().set_element(
            cell,
            slot_element(host, ImageOverflow::ShrinkRowToFit),
            Some(Box::new(behavior)),
        )
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    fn ability<'h>(&self, host: &'h GameHost) -> Option<(EntityId, &'h Ability)> {
        let actor = host.selected_actor()?;
        let id = host.world.registry.ability_bars.get(actor)?.get(self.slot)?;
        let ability = host.world.registry.abilities.get(id)?;
        Some((id, ability))
    }
}

impl CellElement<GameHost> for AbilitySlot {
    fn retrieve_info(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let texture = self
            .ability(cx.host)
            .map(|(_, ability)| cx.host.icon(&ability.icon));
        show_icon(cx, texture);
    }

    fn on_click(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let Some((id, ability)) = self.ability(cx.host) else {
            return;
        };
        debug!(target: "game::ui", slot = self.slot, ability = %id, "ability pressed");
        ability.start_cast.publish(&id);
    }

    fn hover_update(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        let slot = self.slot;
        self.tooltip.update(
            cx,
            |rect| Vec2::new(rect.x, rect.y - rect.height),
            |host| {
                let actor = host.selected_actor()?;
                let id = host.world.registry.ability_bars.get(actor)?.get(slot)?;
                let ability = host.world.registry.abilities.get(id)?;
                Some((ability.name.clone(), ability.description.clone()))
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
        Some(SlotPayload::Ability {
            node: self.cell,
            slot: self.slot,
        })
    }

    fn receive_drop(&mut self, cx: &mut ElementCx<'_, GameHost>, payload: &SlotPayload) {
        let SlotPayload::Ability { slot: other, .. } = *payload else {
            debug!(target: "game::ui", ?payload, "ability slot ignores item drops");
            return;
        };
        let Some(actor) = cx.host.selected_actor() else {
            return;
        };
        let Some(bar) = cx.host.world.registry.ability_bars.get_mut(actor) else {
            return;
        };
        if bar.swap(self.slot, other) {
            debug!(target: "game::ui", from = other, to = self.slot, "abilities swapped");
            refresh_pair(cx, payload);
        }
    }

    fn effect(&self, host: &GameHost) -> Option<Effect> {
        let (_, ability) = self.ability(host)?;
        (!ability.cooldown.is_ready()).then_some(Effect::Grayscale)
    }
}
