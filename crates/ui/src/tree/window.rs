use event_bus::Event;
use strum::Display;

use crate::geometry::{HoriAlign, Rect, Vec2, VertAlign, align_offset};
use crate::settings::Settings;

use super::WindowId;

/// How a window's authored rect maps onto the current viewport.
#[derive(Clone, Copy, Debug, PartialEq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// Position scales per axis, size uniformly.
    Floating,
    /// Pinned to a screen edge or corner; `offset` is in authored units.
    Docked {
        vert: VertAlign,
        hori: HoriAlign,
        offset: Vec2,
    },
    /// Screen position is kept as given, size scales uniformly.
    Tooltip,
}

/// Root data of a window node.
#[derive(Debug)]
pub struct WindowData {
    pub name: String,
    pub(crate) placement: Placement,
    pub(crate) unscaled_rect: Rect,
    pub(crate) hidden: bool,
    pub(crate) marked_for_removal: bool,
    pub(crate) on_hide: Event<WindowId>,
    pub(crate) on_show: Event<WindowId>,
}

impl WindowData {
    pub(crate) fn new(name: String, rect: Rect, placement: Placement) -> Self {
        Self {
            name,
            placement,
            unscaled_rect: rect,
            hidden: false,
            marked_for_removal: false,
            on_hide: Event::new(),
            on_show: Event::new(),
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Rect as authored against the target resolution.
    pub fn unscaled_rect(&self) -> Rect {
        self.unscaled_rect
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    pub fn on_hide(&self) -> &Event<WindowId> {
        &self.on_hide
    }

    pub fn on_show(&self) -> &Event<WindowId> {
        &self.on_show
    }

    /// Screen rect for the current viewport, always computed from the
    /// authored rect so repeated resizes never compound.
    pub fn resolve(&self, settings: &Settings) -> Rect {
        let scale = settings.scale_factor();
        let unscaled = self.unscaled_rect;
        let size = unscaled.size() * scale;
        let position = match self.placement {
            Placement::Floating => Vec2::new(
                settings.scale_width(unscaled.x),
                settings.scale_height(unscaled.y),
            ),
            Placement::Docked { vert, hori, offset } => {
                align_offset(size, settings.viewport(), vert, hori) + offset * scale
            }
            Placement::Tooltip => unscaled.position(),
        };
        Rect::new(position.x, position.y, size.x, size.y)
    }

    /// Records a screen position chosen at runtime (dragging, clamping) in
    /// authored units.
    pub(crate) fn store_position(&mut self, position: Vec2, size: Vec2, settings: &Settings) {
        match &mut self.placement {
            Placement::Floating => {
                self.unscaled_rect.x = position.x / settings.width_ratio();
                self.unscaled_rect.y = position.y / settings.height_ratio();
            }
            Placement::Docked { vert, hori, offset } => {
                let anchor = align_offset(size, settings.viewport(), *vert, *hori);
                *offset = (position - anchor) * (1.0 / settings.scale_factor());
            }
            Placement::Tooltip => {
                self.unscaled_rect.x = position.x;
                self.unscaled_rect.y = position.y;
            }
        }
    }
}
