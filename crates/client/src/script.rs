//! Scripted pointer input for headless sessions.

use std::collections::VecDeque;

use game_ui::{GameHost, GameWindows};
use ui_engine::{NodeId, Pointer, UiEngine, Vec2};

/// Frames a press is held before moving, comfortably past the default drag
/// delay at 60 frames per second.
const HOLD_FRAMES: usize = 12;

/// Queue of per-frame pointer samples. Once drained, the pointer rests where
/// the last sample left it.
#[derive(Clone, Debug)]
pub struct InputScript {
    samples: VecDeque<Pointer>,
    last: Pointer,
    hold_frames: usize,
}

impl InputScript {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            last: Pointer::default(),
            hold_frames: HOLD_FRAMES,
        }
    }

    /// Frames a drag holds still before moving.
    pub fn with_hold_frames(mut self, frames: usize) -> Self {
        self.hold_frames = frames;
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn hover(mut self, at: Vec2, frames: usize) -> Self {
        self.samples.extend(std::iter::repeat_n(Pointer::hover(at), frames));
        self
    }

    pub fn click(self, at: Vec2) -> Self {
        self.hover(at, 1)
            .push(Pointer::press(at))
            .push(Pointer::release(at))
    }

    pub fn drag(mut self, from: Vec2, to: Vec2) -> Self {
        self = self.hover(from, 1).push(Pointer::press(from));
        self.samples
            .extend(std::iter::repeat_n(Pointer::hold(from), self.hold_frames));
        self.push(Pointer::hold(to)).push(Pointer::release(to))
    }

    fn push(mut self, pointer: Pointer) -> Self {
        self.samples.push_back(pointer);
        self
    }

    /// The sample for the next frame.
    pub fn next_pointer(&mut self) -> Pointer {
        match self.samples.pop_front() {
            Some(pointer) => {
                self.last = pointer;
                pointer
            }
            None => Pointer::hover(self.last.position),
        }
    }

    /// Opens both floating windows from the toolbar, swaps the first two
    /// inventory slots, equips the helm that now sits in the second and
    /// lingers over it long enough for the tooltip.
    pub fn demo(ui: &UiEngine<GameHost>, windows: &GameWindows, frame_seconds: f32) -> Self {
        let toolbar = ui.tree().element_cells(windows.toolbar);
        let inventory = ui.tree().element_cells(windows.inventory);
        let equipment = ui.tree().element_cells(windows.equipment);
        let center = |cell: Option<&NodeId>| {
            cell.and_then(|cell| ui.tree().rect(*cell))
                .map(|rect| rect.position() + rect.size() * 0.5)
        };
        let frames_for = |seconds: f32| (seconds / frame_seconds).ceil() as usize + 2;

        let mut script = Self::new().with_hold_frames(frames_for(ui.config().drag_delay));
        if let (Some(open_inventory), Some(open_character)) =
            (center(toolbar.first()), center(toolbar.get(1)))
        {
            script = script.click(open_inventory).click(open_character);
        }
        // Title bar and close button come first in floating windows.
        if let (Some(first), Some(second)) = (center(inventory.get(2)), center(inventory.get(3))) {
            script = script.drag(first, second);
        }
        if let (Some(helm), Some(head)) = (center(inventory.get(3)), center(equipment.get(2))) {
            script = script
                .drag(helm, head)
                .hover(head, frames_for(ui.config().tooltip_delay));
        }
        script
    }
}

impl Default for InputScript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drained_script_rests_at_the_last_position() {
        let at = Vec2::new(10.0, 20.0);
        let mut script = InputScript::new().click(at);
        assert_eq!(script.len(), 3);
        assert_eq!(script.next_pointer(), Pointer::hover(at));
        assert_eq!(script.next_pointer(), Pointer::press(at));
        assert_eq!(script.next_pointer(), Pointer::release(at));
        assert!(script.is_empty());
        assert_eq!(script.next_pointer(), Pointer::hover(at));
    }

    #[test]
    fn drag_holds_past_the_delay_before_moving() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(50.0, 0.0);
        let mut script = InputScript::new().drag(from, to);
        let mut samples = Vec::new();
        while !script.is_empty() {
            samples.push(script.next_pointer());
        }
        assert_eq!(samples.len(), HOLD_FRAMES + 4);
        assert!(samples[1].pressed);
        assert_eq!(samples[samples.len() - 2], Pointer::hold(to));
        assert!(samples[samples.len() - 1].released);
    }
}
