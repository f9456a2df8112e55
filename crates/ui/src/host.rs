//! The world the UI is embedded in.

use core::fmt::Debug;

use crate::geometry::Vec2;

/// Owner of everything the widgets read and mutate.
///
/// The engine tells the host when the pointer is over a window so that world
/// interaction (picking, context cursors) can stand down while the UI has
/// input priority.
pub trait UiHost: 'static {
    /// Carried from a drag source to its drop receiver.
    type Payload: Clone + Debug + 'static;

    fn capture_pointer(&mut self) {}

    fn release_pointer(&mut self) {}
}

/// A host with nothing to drag. Useful for static layouts.
impl UiHost for () {
    type Payload = ();
}

/// Pointer input sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pointer {
    pub position: Vec2,
    /// Button held this frame.
    pub down: bool,
    /// Button went down this frame.
    pub pressed: bool,
    /// Button went up this frame.
    pub released: bool,
}

impl Pointer {
    pub const fn hover(position: Vec2) -> Self {
        Self {
            position,
            down: false,
            pressed: false,
            released: false,
        }
    }

    pub const fn press(position: Vec2) -> Self {
        Self {
            position,
            down: true,
            pressed: true,
            released: false,
        }
    }

    pub const fn hold(position: Vec2) -> Self {
        Self {
            position,
            down: true,
            pressed: false,
            released: false,
        }
    }

    pub const fn release(position: Vec2) -> Self {
        Self {
            position,
            down: false,
            pressed: false,
            released: true,
        }
    }

    /// Next frame's sample given the button state, deriving the edges.
    pub fn next(self, position: Vec2, down: bool) -> Self {
        Self {
            position,
            down,
            pressed: down && !self.down,
            released: !down && self.down,
        }
    }
}
