//! Window chrome shared by every window type.

use crate::element::{CellElement, ElementCx, ElementData, ElementFlags, TextBox, TextOverflow};
use crate::engine::UiEngine;
use crate::error::UiError;
use crate::geometry::{HoriAlign, Vec2, VertAlign};
use crate::host::UiHost;
use crate::tree::{NodeId, WindowId};

/// Window caption. Dragging it moves the window; there is no drag delay.
#[derive(Debug, Default)]
pub struct TitleBar {
    grab_offset: Vec2,
}

impl TitleBar {
    pub fn install<H: UiHost>(
        ui: &mut UiEngine<H>,
        cell: NodeId,
        title: &str,
    ) -> Result<(), UiError> {
        let text = TextBox::new(title, ui.config())
            .with_overflow(TextOverflow::ShrinkToFit)
            .aligned(VertAlign::Middle, HoriAlign::WindowCenter);
        let data = ElementData::text(text)
            .draggable()
            .with_drag_delay(0.0)
            .with_flags(ElementFlags::DRAG_IN_PLACE);
        ui.tree_mut()
            .set_element(cell, data, Some(Box::new(Self::default())))
    }
}

impl<H: UiHost> CellElement<H> for TitleBar {
    fn on_drag_start(&mut self, cx: &mut ElementCx<'_, H>) {
        let window = cx.window().and_then(|window| cx.ui.tree().rect(window));
        if let Some(rect) = window {
            self.grab_offset = cx.pointer().position - rect.position();
        }
    }

    fn drag_update(&mut self, cx: &mut ElementCx<'_, H>) {
        let Some(window) = cx.window() else { return };
        let position = cx.pointer().position - self.grab_offset;
        if let Err(err) = cx.ui.set_window_pos(window, position) {
            tracing::debug!(target: "ui::widgets", error = %err, "dragged window is gone");
        }
    }
}

/// Hides its window, or removes it for one-shot windows.
#[derive(Debug)]
pub struct CloseButton {
    remove: bool,
}

impl CloseButton {
    pub fn install<H: UiHost>(
        ui: &mut UiEngine<H>,
        cell: NodeId,
        remove: bool,
    ) -> Result<(), UiError> {
        let text = TextBox::new("X", ui.config())
            .with_overflow(TextOverflow::None)
            .aligned(VertAlign::Middle, HoriAlign::Center);
        ui.tree_mut().set_element(
            cell,
            ElementData::text(text),
            Some(Box::new(Self { remove })),
        )
    }
}

impl<H: UiHost> CellElement<H> for CloseButton {
    fn on_click(&mut self, cx: &mut ElementCx<'_, H>) {
        let Some(window) = cx.window() else { return };
        let result = if self.remove {
            cx.ui.remove_window(window)
        } else {
            cx.ui.hide_window(window)
        };
        if let Err(err) = result {
            tracing::debug!(target: "ui::widgets", error = %err, "closed window is gone");
        }
    }
}

/// Toggles another window, e.g. a toolbar button for the inventory.
#[derive(Debug)]
pub struct WindowButton {
    target: WindowId,
}

impl WindowButton {
    pub fn install<H: UiHost>(
        ui: &mut UiEngine<H>,
        cell: NodeId,
        label: &str,
        target: WindowId,
    ) -> Result<(), UiError> {
        let text = TextBox::new(label, ui.config())
            .aligned(VertAlign::Middle, HoriAlign::Center);
        ui.tree_mut().set_element(
            cell,
            ElementData::text(text),
            Some(Box::new(Self { target })),
        )
    }
}

impl<H: UiHost> CellElement<H> for WindowButton {
    fn on_click(&mut self, cx: &mut ElementCx<'_, H>) {
        if let Err(err) = cx.ui.toggle_window(self.target) {
            tracing::debug!(target: "ui::widgets", error = %err, "toggle target is gone");
        }
    }
}
