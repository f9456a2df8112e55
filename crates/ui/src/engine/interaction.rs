//! Per-element interaction states and behavior dispatch.
//!
//! ```text
//! Idle ──pointer in cell──→ Hover ──down & draggable──→ DragDelay ──held past delay──→ Drag
//!  ↑                          │ released: on_click          │ released early: on_click   │ released:
//!  └──────────────────────────┴─────────────────────────────┴────────────────────────────┘ drop
//! ```
//!
//! Locked elements never leave `Idle`. Only one element may sit in its drag
//! delay at a time; a second one that tries falls back to `Idle`.

use tracing::{debug, trace};

use crate::element::{CellElement, DropOutcome, Effect, ElementCx, ElementFlags, InteractionState};
use crate::host::UiHost;
use crate::tree::NodeId;

use super::UiEngine;

impl<H: UiHost> UiEngine<H> {
    /// Runs `f` on the behavior of `node` with the behavior lifted out of the
    /// tree, so the hook can use the whole engine. Refreshes queued by the
    /// hook run once it returns.
    pub(crate) fn with_behavior<R>(
        &mut self,
        host: &mut H,
        node: NodeId,
        f: impl FnOnce(&mut dyn CellElement<H>, &mut ElementCx<'_, H>) -> R,
    ) -> Option<R> {
        let mut behavior = self.tree.take_behavior(node)?;
        let result = {
            let mut cx = ElementCx::new(host, self, node);
            f(behavior.as_mut(), &mut cx)
        };
        self.tree.restore_behavior(node, behavior);
        self.flush_refresh(host);
        Some(result)
    }

    pub(crate) fn request_refresh(&mut self, node: NodeId) {
        if !self.pending_refresh.contains(&node) {
            self.pending_refresh.push_back(node);
        }
    }

    fn flush_refresh(&mut self, host: &mut H) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        while let Some(node) = self.pending_refresh.pop_front() {
            self.retrieve_info(host, node);
        }
        self.refreshing = false;
    }

    pub(crate) fn fetch_info(&mut self, host: &mut H, node: NodeId) -> bool {
        self.with_behavior(host, node, |behavior, cx| behavior.retrieve_info(cx))
            .is_some()
    }

    /// Re-reads the element's content from the host and re-lays out its
    /// window.
    pub fn retrieve_info(&mut self, host: &mut H, node: NodeId) {
        if !self.fetch_info(host, node) {
            return;
        }
        if let Some(window) = self.tree.window_of(node) {
            self.relayout(window);
        }
        self.on_info_retrieved.publish(&node);
    }

    /// Re-reads every element of a window.
    pub fn refresh_window(&mut self, host: &mut H, window: crate::tree::WindowId) {
        for cell in self.tree.element_cells(window) {
            if self.fetch_info(host, cell) {
                self.on_info_retrieved.publish(&cell);
            }
        }
        self.relayout(window);
    }

    pub(crate) fn update_element(&mut self, host: &mut H, node: NodeId) {
        let Some(data) = self.tree.element(node) else {
            return;
        };
        let state = data.state;
        let locked = data.is_locked();
        let draggable = data.flags.contains(ElementFlags::DRAGGABLE);
        let delay = data.drag_delay.unwrap_or(self.config.drag_delay);
        let pointer = self.pointer;
        let dt = self.dt;
        let inside = self
            .tree
            .rect(node)
            .is_some_and(|rect| rect.contains(pointer.position));

        match state {
            InteractionState::Idle => {
                if inside && !locked {
                    self.set_state(host, node, InteractionState::Hover);
                }
            }
            InteractionState::Hover => {
                host.capture_pointer();
                if let Some(data) = self.tree.element_mut(node) {
                    data.hover_elapsed += dt;
                }
                if !inside {
                    self.set_state(host, node, InteractionState::Idle);
                } else if pointer.released {
                    self.with_behavior(host, node, |behavior, cx| behavior.on_click(cx));
                    self.set_state(host, node, InteractionState::Idle);
                } else if pointer.down && draggable {
                    self.set_state(host, node, InteractionState::DragDelay);
                } else {
                    self.with_behavior(host, node, |behavior, cx| behavior.hover_update(cx));
                }
            }
            InteractionState::DragDelay => {
                let elapsed = match self.tree.element_mut(node) {
                    Some(data) => {
                        data.drag_elapsed += dt;
                        data.drag_elapsed
                    }
                    None => return,
                };
                if self.dragged.is_none() && pointer.down {
                    match self.delaying {
                        Some(current) if current != node => {
                            self.set_state(host, node, InteractionState::Idle);
                        }
                        _ if elapsed >= delay => {
                            self.set_state(host, node, InteractionState::Drag);
                        }
                        _ => self.delaying = Some(node),
                    }
                } else {
                    self.with_behavior(host, node, |behavior, cx| behavior.on_click(cx));
                    self.set_state(host, node, InteractionState::Idle);
                }
            }
            InteractionState::Drag => {
                if pointer.down {
                    self.with_behavior(host, node, |behavior, cx| behavior.drag_update(cx));
                } else {
                    self.set_state(host, node, InteractionState::Idle);
                }
            }
        }
    }

    /// Sends an element back to `Idle` unless it is the dragged object.
    pub(crate) fn idle_element(&mut self, host: &mut H, node: NodeId) {
        let Some(data) = self.tree.element(node) else {
            return;
        };
        if data.state != InteractionState::Idle && !data.flags.contains(ElementFlags::BEING_DRAGGED)
        {
            self.set_state(host, node, InteractionState::Idle);
        }
    }

    fn set_state(&mut self, host: &mut H, node: NodeId, next: InteractionState) {
        let Some(current) = self.tree.element(node).map(|data| data.state) else {
            return;
        };
        if current == next {
            return;
        }

        match current {
            InteractionState::Hover => {
                self.with_behavior(host, node, |behavior, cx| behavior.on_hover_stop(cx));
            }
            InteractionState::DragDelay => {
                if self.delaying == Some(node) {
                    self.delaying = None;
                }
            }
            InteractionState::Drag => {
                self.finish_drag(host, node);
                self.dragged = None;
                if let Some(data) = self.tree.element_mut(node) {
                    data.flags.remove(ElementFlags::BEING_DRAGGED);
                }
            }
            InteractionState::Idle => {}
        }

        if let Some(data) = self.tree.element_mut(node) {
            data.state = next;
            data.hover_elapsed = 0.0;
            data.drag_elapsed = 0.0;
            match next {
                InteractionState::Idle if data.effect == Some(Effect::Highlight) => {
                    data.effect = None;
                }
                InteractionState::Hover if data.image_box().is_some() => {
                    data.effect = Some(Effect::Highlight);
                }
                InteractionState::Drag => data.flags.insert(ElementFlags::BEING_DRAGGED),
                _ => {}
            }
        }
        trace!(target: "ui::element", node = %node, from = %current, to = %next, "interaction state");

        match next {
            InteractionState::Hover => {
                self.with_behavior(host, node, |behavior, cx| behavior.on_hover_start(cx));
            }
            InteractionState::Drag => {
                self.dragged = Some(node);
                self.with_behavior(host, node, |behavior, cx| behavior.on_drag_start(cx));
            }
            InteractionState::Idle | InteractionState::DragDelay => {}
        }
    }

    /// Resolves the receiver under the pointer, delivers the payload at most
    /// once, then reports the outcome to the source.
    fn finish_drag(&mut self, host: &mut H, source: NodeId) {
        let payload = self
            .tree
            .behavior(source)
            .and_then(|behavior| behavior.payload());
        let outcome = match self.cell_under_cursor() {
            None => DropOutcome::NoReceiver,
            Some(receiver) if receiver == source => DropOutcome::Rejected { receiver },
            Some(receiver) => {
                let accepts = self
                    .tree
                    .element(receiver)
                    .is_some_and(|data| data.flags.contains(ElementFlags::RECEIVES_DROPS));
                let delivered = match &payload {
                    Some(payload) if accepts => self
                        .with_behavior(host, receiver, |behavior, cx| {
                            behavior.receive_drop(cx, payload)
                        })
                        .is_some(),
                    _ => false,
                };
                if delivered {
                    DropOutcome::Delivered { receiver }
                } else {
                    DropOutcome::Rejected { receiver }
                }
            }
        };
        debug!(target: "ui::element", source = %source, outcome = ?outcome, "drop");
        self.with_behavior(host, source, |behavior, cx| behavior.on_drop(cx, outcome));
    }
}
