//! Layouts of the game's windows.
//!
//! Every window is authored against the 1920x1080 target resolution and
//! rescaled by the engine. Floating windows start hidden and are opened from
//! the toolbar.

use std::cell::Cell;
use std::rc::Rc;

use event_bus::Subscription;
use game_core::{AbilityBar, EquipmentSlotName};
use tracing::debug;
use ui_engine::{
    CloseButton, ElementData, HoriAlign, NodeId, Padding, Placement, Rect, Sizing, TextBox,
    TextOverflow, TitleBar, UiEngine, UiError, Vec2, VertAlign, WindowButton, WindowId,
};

use crate::error::WindowError;
use crate::host::{GameHost, SlotOwner};
use crate::slots::{AbilitySlot, EquipmentSlot, InventorySlot};

const GRID_SPACING: f32 = 4.0;
const TOOLTIP_SIZE: Vec2 = Vec2::new(320.0, 160.0);

/// Equipment grid columns, top to bottom. `None` leaves a spacer.
const LEFT_COLUMN: [Option<EquipmentSlotName>; 6] = [
    Some(EquipmentSlotName::Helm),
    Some(EquipmentSlotName::Amulet),
    Some(EquipmentSlotName::Chest),
    Some(EquipmentSlotName::Belt),
    Some(EquipmentSlotName::Arms),
    Some(EquipmentSlotName::LeftHand),
];
const RIGHT_COLUMN: [Option<EquipmentSlotName>; 6] = [
    None,
    Some(EquipmentSlotName::Ring1),
    Some(EquipmentSlotName::Ring2),
    Some(EquipmentSlotName::Legs),
    Some(EquipmentSlotName::Boots),
    Some(EquipmentSlotName::RightHand),
];

/// Title row shared by floating windows: caption plus close button.
fn title_row(ui: &mut UiEngine<GameHost>, table: NodeId, title: &str) -> Result<(), UiError> {
    let tree = ui.tree_mut();
    let row = tree.add_row(table, Sizing::percent(8.0)?, Padding::ZERO)?;
    let caption = tree.add_cell(row, Sizing::percent(80.0)?, Padding::ZERO)?;
    let close = tree.add_cell(row, Sizing::percent(20.0)?, Padding::ZERO)?;
    TitleBar::install(ui, caption, title)?;
    CloseButton::install(ui, close, false)
}

/// Bottom-center hotbar of the selected actor's abilities.
pub fn ability_bar(ui: &mut UiEngine<GameHost>, host: &mut GameHost) -> Result<WindowId, UiError> {
    let window = ui.create_window(
        "ability bar",
        Rect::new(0.0, 0.0, 480.0, 120.0),
        Placement::Docked {
            vert: VertAlign::Bottom,
            hori: HoriAlign::Center,
            offset: Vec2::new(0.0, -16.0),
        },
        Padding::uniform(8.0),
    );
    let tree = ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::ZERO)?;
    let row = tree.add_row_grid(
        table,
        AbilityBar::SLOTS,
        GRID_SPACING,
        Sizing::Auto,
        Padding::ZERO,
    )?;
    for slot in 0..AbilityBar::SLOTS {
        let cell = ui
            .tree()
            .grid_cell(row, 0, slot)
            .ok_or(UiError::UnknownNode(row))?;
        AbilitySlot::install(ui, host, cell, slot)?;
    }
    ui.finalize_window(host, window)?;
    Ok(window)
}

/// Grid of the owner's inventory, sized to the inventory component.
pub fn inventory_window(
    ui: &mut UiEngine<GameHost>,
    host: &mut GameHost,
    owner: SlotOwner,
    title: &str,
) -> Result<WindowId, WindowError> {
    let entity = owner
        .resolve(&host.world)
        .ok_or(WindowError::NoSelectedActor)?;
    let inventory = host
        .world
        .registry
        .inventories
        .get(entity)
        .ok_or(game_core::InventoryError::MissingInventory(entity))?;
    let (rows, cols) = (inventory.rows(), inventory.cols());

    let window = ui.create_window(
        title,
        Rect::new(1400.0, 300.0, 400.0, 480.0),
        Placement::Floating,
        Padding::new(20.0, 0.0, 14.0, 14.0),
    );
    let table = ui.tree_mut().add_table(window, Sizing::Auto, Padding::ZERO)?;
    title_row(ui, table, title)?;
    let tree = ui.tree_mut();
    let row = tree.add_row(table, Sizing::Auto, Padding::new(20.0, 0.0, 0.0, 0.0))?;
    let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO)?;
    let grid = tree.add_grid(cell, rows, cols, GRID_SPACING, Sizing::Auto, Padding::ZERO)?;
    for r in 0..rows {
        for c in 0..cols {
            let slot = ui
                .tree()
                .grid_cell(grid, r, c)
                .ok_or(UiError::UnknownNode(grid))?;
            InventorySlot::install(ui, host, slot, owner, r, c)?;
        }
    }
    ui.finalize_window(host, window)?;
    ui.hide_window(window)?;
    Ok(window)
}

/// Worn items of the selected actor in two columns around a preview area.
pub fn equipment_window(
    ui: &mut UiEngine<GameHost>,
    host: &mut GameHost,
) -> Result<WindowId, UiError> {
    let window = ui.create_window(
        "character",
        Rect::new(300.0, 200.0, 520.0, 560.0),
        Placement::Floating,
        Padding::new(20.0, 20.0, 14.0, 14.0),
    );
    let table = ui.tree_mut().add_table(window, Sizing::Auto, Padding::ZERO)?;
    title_row(ui, table, "Character")?;
    let tree = ui.tree_mut();
    let row = tree.add_row(table, Sizing::Auto, Padding::new(4.0, 0.0, 0.0, 0.0))?;
    let left = tree.add_cell(row, Sizing::Auto, Padding::ZERO)?;
    tree.add_cell(row, Sizing::percent(40.0)?, Padding::new(0.0, 0.0, 24.0, 24.0))?;
    let right = tree.add_cell(row, Sizing::Auto, Padding::ZERO)?;

    for (column, slots) in [(left, LEFT_COLUMN), (right, RIGHT_COLUMN)] {
        let grid = ui.tree_mut().add_grid(
            column,
            slots.len(),
            1,
            GRID_SPACING,
            Sizing::Auto,
            Padding::ZERO,
        )?;
        for (index, slot) in slots.into_iter().enumerate() {
            let Some(slot) = slot else { continue };
            let cell = ui
                .tree()
                .grid_cell(grid, index, 0)
                .ok_or(UiError::UnknownNode(grid))?;
            EquipmentSlot::install(ui, host, cell, slot)?;
        }
    }
    ui.finalize_window(host, window)?;
    ui.hide_window(window)?;
    Ok(window)
}

/// Bottom-right buttons toggling the floating windows.
pub fn toolbar(
    ui: &mut UiEngine<GameHost>,
    host: &mut GameHost,
    buttons: &[(&str, WindowId)],
) -> Result<WindowId, UiError> {
    let window = ui.create_window(
        "toolbar",
        Rect::new(0.0, 0.0, 120.0 * buttons.len() as f32, 48.0),
        Placement::Docked {
            vert: VertAlign::Bottom,
            hori: HoriAlign::Right,
            offset: Vec2::new(-16.0, -16.0),
        },
        Padding::uniform(4.0),
    );
    let tree = ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::ZERO)?;
    let row = tree.add_row(table, Sizing::Auto, Padding::ZERO)?;
    for (label, target) in buttons {
        let cell = ui.tree_mut().add_cell(row, Sizing::Auto, Padding::ZERO)?;
        WindowButton::install(ui, cell, label, *target)?;
    }
    ui.finalize_window(host, window)?;
    Ok(window)
}

/// Opens a title-and-body tooltip at a screen position. Replaces any open
/// tooltip; closes with `parent` when given.
pub fn open_tooltip(
    ui: &mut UiEngine<GameHost>,
    host: &mut GameHost,
    title: &str,
    body: &str,
    anchor: Vec2,
    parent: Option<WindowId>,
) -> Result<WindowId, UiError> {
    let rect = Rect::new(anchor.x, anchor.y, TOOLTIP_SIZE.x, TOOLTIP_SIZE.y);
    let window = ui.open_tooltip(title, rect, parent);
    let header = TextBox::new(title, ui.config()).with_overflow(TextOverflow::ShrinkToFit);
    let text = TextBox::new(body, ui.config()).with_overflow(TextOverflow::WordWrap);

    let tree = ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::new(20.0, 20.0, 10.0, 6.0))?;
    let header_row = tree.add_row(table, Sizing::percent(30.0)?, Padding::ZERO)?;
    let header_cell = tree.add_cell(header_row, Sizing::Auto, Padding::ZERO)?;
    tree.set_element(header_cell, ElementData::text(header), None)?;
    let body_row = tree.add_row(table, Sizing::Auto, Padding::new(10.0, 0.0, 0.0, 0.0))?;
    let body_cell = tree.add_cell(body_row, Sizing::Auto, Padding::ZERO)?;
    tree.set_element(body_cell, ElementData::text(text), None)?;

    ui.finalize_window(host, window)?;
    debug!(target: "game::ui", window = %window, title, "tooltip opened");
    Ok(window)
}

/// Every window of the in-game HUD.
///
/// Slots read the selected actor, so a selection change marks the HUD stale;
/// [`GameWindows::sync`] re-reads it once per frame.
pub struct GameWindows {
    pub ability_bar: WindowId,
    pub inventory: WindowId,
    pub equipment: WindowId,
    pub toolbar: WindowId,
    stale: Rc<Cell<bool>>,
    _selection_hook: Subscription,
}

impl GameWindows {
    pub fn build(ui: &mut UiEngine<GameHost>, host: &mut GameHost) -> Result<Self, WindowError> {
        let ability_bar = ability_bar(ui, host)?;
        let inventory = inventory_window(ui, host, SlotOwner::SelectedActor, "Inventory")?;
        let equipment = equipment_window(ui, host)?;
        let toolbar = toolbar(
            ui,
            host,
            &[("Inventory", inventory), ("Character", equipment)],
        )?;

        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        let selection_hook = host
            .world
            .systems
            .cursor
            .on_selected_actor_change
            .subscribe(move |_| flag.set(true));

        Ok(Self {
            ability_bar,
            inventory,
            equipment,
            toolbar,
            stale,
            _selection_hook: selection_hook,
        })
    }

    pub fn slot_windows(&self) -> [WindowId; 3] {
        [self.ability_bar, self.inventory, self.equipment]
    }

    /// Re-reads every slot if the selected actor changed since the last call.
    pub fn sync(&self, ui: &mut UiEngine<GameHost>, host: &mut GameHost) {
        if !self.stale.replace(false) {
            return;
        }
        debug!(target: "game::ui", "selected actor changed, refreshing slots");
        for window in self.slot_windows() {
            ui.refresh_window(host, window);
        }
    }
}
