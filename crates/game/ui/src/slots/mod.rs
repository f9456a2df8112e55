//! Draggable slot widgets.
//!
//! Every slot is an image element whose payload names where its content
//! lives in the world ([`SlotPayload`]). A receiver matches on the payload
//! variant to decide what a drop means, then queues a refresh of both cells
//! so each one re-reads the world exactly once.
//!
//! Item slots (inventory and equipment) share one fallback: a drag released
//! over no window at all drops the item in the world at the cursor, if the
//! owner is close enough.

mod ability;
mod equipment;
mod inventory;

pub use ability::AbilitySlot;
pub use equipment::EquipmentSlot;
pub use inventory::InventorySlot;

use game_core::{EntityId, GameWorld, ItemData, MovementError};
use tracing::warn;
use ui_engine::{
    DropOutcome, ElementCx, ElementData, HoriAlign, ImageBox, ImageOverflow, Rect, Texture, Vec2,
    VertAlign, WindowId,
};

use crate::host::{EMPTY_SLOT_ICON, GameHost, SlotPayload};
use crate::windows;

/// Image element every slot starts with.
pub(crate) fn slot_element(host: &GameHost, overflow: ImageOverflow) -> ElementData {
    let image = ImageBox::new(None, overflow)
        .with_backdrop(host.icon(EMPTY_SLOT_ICON))
        .aligned(VertAlign::Middle, HoriAlign::Center);
    ElementData::image(image).draggable().receives_drops()
}

/// Shows `texture` (or the empty backdrop) and locks the slot when empty.
pub(crate) fn show_icon(cx: &mut ElementCx<'_, GameHost>, texture: Option<Texture>) {
    let Some(data) = cx.data_mut() else { return };
    data.set_locked(texture.is_none());
    if let Some(image) = data.image_box_mut() {
        image.texture = texture;
    }
}

/// Queues a refresh of this slot and the slot the payload came from.
pub(crate) fn refresh_pair(cx: &mut ElementCx<'_, GameHost>, payload: &SlotPayload) {
    let own = cx.node();
    cx.refresh(payload.source());
    cx.refresh(own);
    if let Some(window) = cx.window() {
        cx.ui.bring_to_front(window);
    }
}

/// Whether a finished drag should fall back to dropping in the world.
pub(crate) fn released_over_world(cx: &ElementCx<'_, GameHost>, outcome: DropOutcome) -> bool {
    outcome == DropOutcome::NoReceiver && cx.ui.window_at(cx.pointer().position).is_none()
}

/// Reports a failed world drop on the banner.
pub(crate) fn report_drop_failure(cx: &mut ElementCx<'_, GameHost>, err: MovementError) {
    match err {
        MovementError::OutOfRange { distance, range } => {
            warn!(target: "game::ui", distance, range, "item drop out of range");
            cx.show_error(err.to_string());
        }
        other => warn!(target: "game::ui", error = %other, "item drop failed"),
    }
}

/// Checks the drop flag before any world change.
pub(crate) fn ensure_droppable(cx: &mut ElementCx<'_, GameHost>, item: &ItemData) -> bool {
    if item.can_drop() {
        return true;
    }
    warn!(target: "game::ui", item = %item.name, "item cannot be dropped");
    cx.show_error("Item cannot be dropped.");
    false
}

pub(crate) fn item_data(world: &GameWorld, item: EntityId) -> Option<&ItemData> {
    world.registry.items.get(item)
}

/// Hover tooltip owned by one slot.
#[derive(Debug, Default)]
pub(crate) struct HoverTooltip {
    window: Option<WindowId>,
}

impl HoverTooltip {
    /// Opens the tooltip once the slot has been hovered long enough.
    /// `content` yields the title and body, or `None` for an empty slot.
    pub(crate) fn update(
        &mut self,
        cx: &mut ElementCx<'_, GameHost>,
        anchor: impl FnOnce(Rect) -> Vec2,
        content: impl FnOnce(&GameHost) -> Option<(String, String)>,
    ) {
        if let Some(window) = self.window
            && cx.ui.tooltip() == Some(window)
        {
            return;
        }
        self.window = None;
        if cx.hover_elapsed() < cx.ui.config().tooltip_delay {
            return;
        }
        let Some((title, body)) = content(&*cx.host) else {
            return;
        };
        let Some(rect) = cx.ui.tree().rect(cx.node()) else {
            return;
        };
        let parent = cx.window();
        match windows::open_tooltip(cx.ui, cx.host, &title, &body, anchor(rect), parent) {
            Ok(window) => self.window = Some(window),
            Err(err) => warn!(target: "game::ui", error = %err, "tooltip could not be built"),
        }
    }

    pub(crate) fn close(&mut self, cx: &mut ElementCx<'_, GameHost>) {
        if let Some(window) = self.window.take() {
            cx.ui.close_tooltip(window);
        }
    }
}
