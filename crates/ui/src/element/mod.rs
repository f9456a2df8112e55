//! Leaf content of the layout tree.
//!
//! A cell holds at most one element. The element is split in two halves:
//!
//! - [`ElementData`]: what the engine needs for layout, hit-testing and
//!   drawing (the visual, resolved rect, flags, interaction state)
//! - [`CellElement`]: optional widget behavior (clicks, drag payloads, drop
//!   handling), stored as a trait object next to the data
//!
//! Behaviors never hold references into the tree. Every hook receives an
//! [`ElementCx`] that lends out the host and the engine for the duration of
//! the call.

mod image;
mod text;

use bitflags::bitflags;
use strum::Display;

use crate::engine::UiEngine;
use crate::geometry::Rect;
use crate::host::{Pointer, UiHost};
use crate::tree::{NodeId, WindowId};

pub use image::{ImageBox, ImageOverflow, Texture};
pub use text::{TextBox, TextOverflow};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        const DRAGGABLE = 1 << 0;
        const RECEIVES_DROPS = 1 << 1;
        /// Set by the engine while the element is the dragged object.
        const BEING_DRAGGED = 1 << 2;
        /// Keeps the element in `Idle`; hover and drag never start.
        const STATE_LOCKED = 1 << 3;
        /// Drawn at its layout slot while dragged instead of under the pointer.
        const DRAG_IN_PLACE = 1 << 4;
    }
}

/// Draw-time tint applied to an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Highlight,
    Grayscale,
}

/// Per-element interaction state. `Idle` is both initial and terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractionState {
    #[default]
    Idle,
    Hover,
    DragDelay,
    Drag,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Text(TextBox),
    Image(ImageBox),
}

/// Layout and interaction data of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    pub visual: Visual,
    pub flags: ElementFlags,
    /// Overrides the configured drag delay for this element.
    pub drag_delay: Option<f32>,
    pub effect: Option<Effect>,
    pub(crate) rect: Rect,
    pub(crate) state: InteractionState,
    pub(crate) hover_elapsed: f32,
    pub(crate) drag_elapsed: f32,
}

impl ElementData {
    pub fn new(visual: Visual) -> Self {
        Self {
            visual,
            flags: ElementFlags::empty(),
            drag_delay: None,
            effect: None,
            rect: Rect::ZERO,
            state: InteractionState::Idle,
            hover_elapsed: 0.0,
            drag_elapsed: 0.0,
        }
    }

    pub fn text(text: TextBox) -> Self {
        Self::new(Visual::Text(text))
    }

    pub fn image(image: ImageBox) -> Self {
        Self::new(Visual::Image(image))
    }

    pub fn draggable(mut self) -> Self {
        self.flags.insert(ElementFlags::DRAGGABLE);
        self
    }

    pub fn receives_drops(mut self) -> Self {
        self.flags.insert(ElementFlags::RECEIVES_DROPS);
        self
    }

    pub fn with_drag_delay(mut self, seconds: f32) -> Self {
        self.drag_delay = Some(seconds.max(0.0));
        self
    }

    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Rect resolved by the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(ElementFlags::STATE_LOCKED)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.flags.set(ElementFlags::STATE_LOCKED, locked);
    }

    pub fn image_box(&self) -> Option<&ImageBox> {
        match &self.visual {
            Visual::Image(image) => Some(image),
            Visual::Text(_) => None,
        }
    }

    pub fn image_box_mut(&mut self) -> Option<&mut ImageBox> {
        match &mut self.visual {
            Visual::Image(image) => Some(image),
            Visual::Text(_) => None,
        }
    }

    pub fn text_box(&self) -> Option<&TextBox> {
        match &self.visual {
            Visual::Text(text) => Some(text),
            Visual::Image(_) => None,
        }
    }

    pub fn text_box_mut(&mut self) -> Option<&mut TextBox> {
        match &mut self.visual {
            Visual::Text(text) => Some(text),
            Visual::Image(_) => None,
        }
    }
}

/// What happened to a drag when the button was released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// `receive_drop` ran on the receiver exactly once.
    Delivered { receiver: NodeId },
    /// A cell was under the pointer but could not take the payload.
    Rejected { receiver: NodeId },
    /// Released outside every window.
    NoReceiver,
}

/// Widget behavior attached to an element.
///
/// Every hook has an empty default, so widgets implement only what they react
/// to. Fallback policy for drops that reach no receiver belongs in
/// [`CellElement::on_drop`] of the concrete widget.
pub trait CellElement<H: UiHost>: 'static {
    /// Pulls fresh content from the host into the element's visual.
    fn retrieve_info(&mut self, _cx: &mut ElementCx<'_, H>) {}

    fn on_click(&mut self, _cx: &mut ElementCx<'_, H>) {}

    fn on_hover_start(&mut self, _cx: &mut ElementCx<'_, H>) {}

    fn on_hover_stop(&mut self, _cx: &mut ElementCx<'_, H>) {}

    /// Runs every frame the element stays hovered.
    fn hover_update(&mut self, _cx: &mut ElementCx<'_, H>) {}

    fn on_drag_start(&mut self, _cx: &mut ElementCx<'_, H>) {}

    /// Runs every frame while the element is the dragged object.
    fn drag_update(&mut self, _cx: &mut ElementCx<'_, H>) {}

    /// What this element carries when dragged onto a receiver.
    fn payload(&self) -> Option<H::Payload> {
        None
    }

    fn receive_drop(&mut self, _cx: &mut ElementCx<'_, H>, _payload: &H::Payload) {}

    /// Runs on the source once the drag ends, after any delivery.
    fn on_drop(&mut self, _cx: &mut ElementCx<'_, H>, _outcome: DropOutcome) {}

    /// Effect to draw with this frame, overriding the element's own.
    fn effect(&self, _host: &H) -> Option<Effect> {
        None
    }
}

/// An element stored in a cell.
pub struct Element<H: UiHost> {
    pub data: ElementData,
    pub(crate) behavior: Option<Box<dyn CellElement<H>>>,
}

impl<H: UiHost> Element<H> {
    pub fn new(data: ElementData, behavior: Option<Box<dyn CellElement<H>>>) -> Self {
        Self { data, behavior }
    }

    pub fn behavior(&self) -> Option<&dyn CellElement<H>> {
        self.behavior.as_deref()
    }
}

/// Access lent to a behavior while one of its hooks runs.
pub struct ElementCx<'a, H: UiHost> {
    pub host: &'a mut H,
    pub ui: &'a mut UiEngine<H>,
    node: NodeId,
}

impl<'a, H: UiHost> ElementCx<'a, H> {
    pub(crate) fn new(host: &'a mut H, ui: &'a mut UiEngine<H>, node: NodeId) -> Self {
        Self { host, ui, node }
    }

    /// Cell holding the element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn window(&self) -> Option<WindowId> {
        self.ui.tree().window_of(self.node)
    }

    pub fn pointer(&self) -> Pointer {
        self.ui.pointer()
    }

    /// Seconds spent in `Hover` so far.
    pub fn hover_elapsed(&self) -> f32 {
        self.data().map_or(0.0, |data| data.hover_elapsed)
    }

    pub fn data(&self) -> Option<&ElementData> {
        self.ui.tree().element(self.node)
    }

    pub fn data_mut(&mut self) -> Option<&mut ElementData> {
        self.ui.tree_mut().element_mut(self.node)
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageBox> {
        self.data_mut().and_then(ElementData::image_box_mut)
    }

    pub fn text_mut(&mut self) -> Option<&mut TextBox> {
        self.data_mut().and_then(ElementData::text_box_mut)
    }

    /// Queues `retrieve_info` for `node` once the current hook returns.
    pub fn refresh(&mut self, node: NodeId) {
        self.ui.request_refresh(node);
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.show_error(message);
    }
}
