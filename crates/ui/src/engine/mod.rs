//! Window registry, z-order, hit-testing and the per-frame update.
//!
//! # Frame Sequence
//!
//! ```text
//! update(host, pointer, dt)
//!   ├─→ dragging? only the dragged element runs
//!   ├─→ otherwise, for each window in z-order:
//!   │     ├─→ pointer outside or obscured: its elements fall back to Idle
//!   │     └─→ pointer inside: bring to front on press, capture the pointer,
//!   │         run each element's interaction state
//!   ├─→ prune windows marked for removal (never mid-frame)
//!   └─→ expire the error banner
//! draw(host, renderer)
//! ```
//!
//! # Design Principles
//!
//! - **Single owners**: at most one dragged element, one element in its drag
//!   delay, one tooltip and one banner at any time
//! - **Stale ids are fine**: windows and cells are addressed by [`NodeId`];
//!   operations on a pruned id report [`UiError::UnknownWindow`] or do
//!   nothing

mod banner;
mod draw;
mod interaction;

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use event_bus::{Event, Subscription};
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::element::ElementData;
use crate::error::UiError;
use crate::geometry::{Padding, Rect, Vec2};
use crate::host::{Pointer, UiHost};
use crate::render::{Monospace, TextMeasure};
use crate::settings::Settings;
use crate::tree::{LayoutTree, NodeId, Placement, WindowData, WindowId};

pub use banner::ErrorBanner;

struct Tooltip {
    window: WindowId,
    parent_hidden: Rc<Cell<bool>>,
    _parent_hook: Subscription,
}

/// Retained-mode UI: every window, the interaction singletons and the clock.
pub struct UiEngine<H: UiHost> {
    config: UiConfig,
    settings: Settings,
    measure: Box<dyn TextMeasure>,
    tree: LayoutTree<H>,
    /// Z-order, back to front.
    windows: Vec<WindowId>,
    tooltip: Option<Tooltip>,
    dragged: Option<NodeId>,
    delaying: Option<NodeId>,
    banner: Option<ErrorBanner>,
    pointer: Pointer,
    now: f32,
    dt: f32,
    pending_refresh: VecDeque<NodeId>,
    refreshing: bool,
    on_info_retrieved: Event<NodeId>,
}

impl<H: UiHost> UiEngine<H> {
    /// Engine measuring text with [`Monospace`].
    pub fn new(config: UiConfig, viewport: Vec2) -> Self {
        Self::with_measure(config, viewport, Box::new(Monospace))
    }

    pub fn with_measure(config: UiConfig, viewport: Vec2, measure: Box<dyn TextMeasure>) -> Self {
        let settings = Settings::new(&config, viewport);
        Self {
            config,
            settings,
            measure,
            tree: LayoutTree::new(),
            windows: Vec::new(),
            tooltip: None,
            dragged: None,
            delaying: None,
            banner: None,
            pointer: Pointer::default(),
            now: 0.0,
            dt: 0.0,
            pending_refresh: VecDeque::new(),
            refreshing: false,
            on_info_retrieved: Event::new(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tree(&self) -> &LayoutTree<H> {
        &self.tree
    }

    /// For building window contents. Call [`Self::finalize_window`] after.
    pub fn tree_mut(&mut self) -> &mut LayoutTree<H> {
        &mut self.tree
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Seconds since the engine was created.
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Windows in z-order, back to front. The tooltip is not included.
    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn dragged(&self) -> Option<NodeId> {
        self.dragged
    }

    pub fn banner(&self) -> Option<&ErrorBanner> {
        self.banner.as_ref()
    }

    /// Published with the cell after each `retrieve_info`.
    pub fn on_info_retrieved(&self) -> &Event<NodeId> {
        &self.on_info_retrieved
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.element(node)
    }

    // ------------------------------------------------------------------------
    // Windows
    // ------------------------------------------------------------------------

    /// Adds a window on top of every other. `rect` is in authored units.
    pub fn create_window(
        &mut self,
        name: impl Into<String>,
        rect: Rect,
        placement: Placement,
        padding: Padding,
    ) -> WindowId {
        let name = name.into();
        let id = self.tree.add_window(name.clone(), rect, placement, padding);
        self.windows.push(id);
        debug!(target: "ui::engine", window = %id, name = %name, "created window");
        id
    }

    /// Pulls every element's content from the host, then scales and lays out
    /// the window for the current viewport.
    pub fn finalize_window(&mut self, host: &mut H, window: WindowId) -> Result<(), UiError> {
        if self.tree.window(window).is_none() {
            return Err(UiError::UnknownWindow(window));
        }
        for cell in self.tree.element_cells(window) {
            if self.fetch_info(host, cell) {
                self.on_info_retrieved.publish(&cell);
            }
        }
        self.rescale_window(window);
        Ok(())
    }

    fn window_data(&self, window: WindowId) -> Result<&WindowData, UiError> {
        self.tree
            .window(window)
            .ok_or(UiError::UnknownWindow(window))
    }

    pub fn is_visible(&self, window: WindowId) -> bool {
        self.tree
            .window(window)
            .is_some_and(|data| !data.hidden && !data.marked_for_removal)
    }

    pub fn is_hidden(&self, window: WindowId) -> Result<bool, UiError> {
        self.window_data(window).map(|data| data.hidden)
    }

    pub fn show_window(&mut self, window: WindowId) -> Result<(), UiError> {
        let data = self
            .tree
            .window_mut(window)
            .ok_or(UiError::UnknownWindow(window))?;
        if !data.hidden || data.marked_for_removal {
            return Ok(());
        }
        data.hidden = false;
        let on_show = data.on_show.clone();
        debug!(target: "ui::engine", window = %window, "show");
        on_show.publish(&window);
        Ok(())
    }

    pub fn hide_window(&mut self, window: WindowId) -> Result<(), UiError> {
        let data = self
            .tree
            .window_mut(window)
            .ok_or(UiError::UnknownWindow(window))?;
        if data.hidden {
            return Ok(());
        }
        data.hidden = true;
        let on_hide = data.on_hide.clone();
        debug!(target: "ui::engine", window = %window, "hide");
        on_hide.publish(&window);
        Ok(())
    }

    pub fn toggle_window(&mut self, window: WindowId) -> Result<(), UiError> {
        if self.is_hidden(window)? {
            self.show_window(window)
        } else {
            self.hide_window(window)
        }
    }

    /// Hides the window now and erases it at the end of the frame.
    pub fn remove_window(&mut self, window: WindowId) -> Result<(), UiError> {
        self.hide_window(window)?;
        if let Some(data) = self.tree.window_mut(window) {
            data.marked_for_removal = true;
        }
        Ok(())
    }

    pub fn bring_to_front(&mut self, window: WindowId) {
        if let Some(index) = self.windows.iter().position(|id| *id == window)
            && index + 1 != self.windows.len()
        {
            self.windows.remove(index);
            self.windows.push(window);
            debug!(target: "ui::engine", window = %window, "brought to front");
        }
    }

    /// Moves a window, keeping it inside the viewport. The new position is
    /// stored in authored units so it survives rescaling.
    pub fn set_window_pos(&mut self, window: WindowId, position: Vec2) -> Result<(), UiError> {
        let rect = self
            .tree
            .rect(window)
            .ok_or(UiError::UnknownWindow(window))?;
        let viewport = self.settings.viewport();
        let position = Vec2::new(
            position.x.min(viewport.x - rect.width).max(0.0),
            position.y.min(viewport.y - rect.height).max(0.0),
        );
        self.tree
            .window_mut(window)
            .ok_or(UiError::UnknownWindow(window))?
            .store_position(position, rect.size(), &self.settings);
        self.tree.set_rect(
            window,
            Rect::new(position.x, position.y, rect.width, rect.height),
        );
        self.relayout(window);
        Ok(())
    }

    /// Applies a new viewport to every window.
    pub fn on_screen_resized(&mut self, viewport: Vec2) {
        self.settings.set_viewport(viewport);
        info!(
            target: "ui::engine",
            width = viewport.x,
            height = viewport.y,
            scale = self.settings.scale_factor(),
            "screen resized"
        );
        let mut windows = self.windows.clone();
        windows.extend(self.tooltip.as_ref().map(|tooltip| tooltip.window));
        for window in windows {
            self.rescale_window(window);
        }
    }

    /// Reset to authored values, then scale and lay out.
    fn rescale_window(&mut self, window: WindowId) {
        let Some(rect) = self
            .tree
            .window(window)
            .map(|data| data.resolve(&self.settings))
        else {
            return;
        };
        let scale = self.settings.scale_factor();
        self.tree.reset_paddings(window, scale);
        self.tree.set_rect(window, rect);
        self.tree.layout(window, scale, self.measure.as_ref());
    }

    fn relayout(&mut self, window: WindowId) {
        let scale = self.settings.scale_factor();
        self.tree.layout(window, scale, self.measure.as_ref());
    }

    // ------------------------------------------------------------------------
    // Tooltip & banner
    // ------------------------------------------------------------------------

    /// Opens the tooltip window at a screen rect, replacing any open one.
    /// With a `parent`, the tooltip goes away when the parent is hidden.
    pub fn open_tooltip(
        &mut self,
        name: impl Into<String>,
        rect: Rect,
        parent: Option<WindowId>,
    ) -> WindowId {
        if let Some(old) = self.tooltip.take() {
            self.tree.remove(old.window);
        }
        let window = self
            .tree
            .add_window(name, rect, Placement::Tooltip, Padding::ZERO);
        let parent_hidden = Rc::new(Cell::new(false));
        let parent_hook = parent
            .and_then(|parent| self.tree.window(parent))
            .map(|parent| {
                let flag = Rc::clone(&parent_hidden);
                parent.on_hide.subscribe(move |_| flag.set(true))
            })
            .unwrap_or_default();
        self.tooltip = Some(Tooltip {
            window,
            parent_hidden,
            _parent_hook: parent_hook,
        });
        debug!(target: "ui::engine", window = %window, "opened tooltip");
        window
    }

    /// The open tooltip, unless it is already on its way out.
    pub fn tooltip(&self) -> Option<WindowId> {
        self.tooltip
            .as_ref()
            .filter(|tooltip| !tooltip.parent_hidden.get())
            .map(|tooltip| tooltip.window)
            .filter(|window| self.is_visible(*window))
    }

    /// Closes the tooltip if `window` is still the open one.
    pub fn close_tooltip(&mut self, window: WindowId) {
        if self.tooltip.as_ref().is_some_and(|t| t.window == window)
            && let Err(err) = self.remove_window(window)
        {
            debug!(target: "ui::engine", error = %err, "tooltip window is gone");
            self.tooltip = None;
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "ui::engine", message = %message, "error banner");
        self.banner = Some(ErrorBanner::new(
            message,
            self.now,
            self.config.error_display_seconds,
            self.config.error_fade_seconds,
        ));
    }

    // ------------------------------------------------------------------------
    // Hit-testing
    // ------------------------------------------------------------------------

    /// True when a visible window later in z-order covers `point` where it
    /// overlaps `window`.
    pub fn is_obscured(&self, window: WindowId, point: Vec2) -> bool {
        let Some(rect) = self.tree.rect(window) else {
            return false;
        };
        let Some(index) = self.windows.iter().position(|id| *id == window) else {
            return false;
        };
        self.windows[index + 1..]
            .iter()
            .filter(|other| self.is_visible(**other))
            .filter_map(|other| self.tree.rect(*other))
            .any(|other| rect.overlap(&other).is_some_and(|shared| shared.contains(point)))
    }

    /// Topmost visible window that owns `point`.
    pub fn window_at(&self, point: Vec2) -> Option<WindowId> {
        self.windows.iter().rev().copied().find(|window| {
            self.is_visible(*window)
                && self
                    .tree
                    .rect(*window)
                    .is_some_and(|rect| rect.contains(point))
                && !self.is_obscured(*window, point)
        })
    }

    /// Element cell under `point` in the window that owns it.
    pub fn cell_at(&self, point: Vec2) -> Option<NodeId> {
        let window = self.window_at(point)?;
        self.tree.element_cells(window).into_iter().find(|cell| {
            self.tree
                .rect(*cell)
                .is_some_and(|rect| rect.contains(point))
        })
    }

    pub fn cell_under_cursor(&self) -> Option<NodeId> {
        self.cell_at(self.pointer.position)
    }

    // ------------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------------

    pub fn update(&mut self, host: &mut H, pointer: Pointer, dt: f32) {
        self.pointer = pointer;
        self.dt = dt;
        self.now += dt;

        if let Some(dragged) = self.dragged {
            if self.tree.contains(dragged) {
                self.update_element(host, dragged);
            } else {
                self.dragged = None;
            }
        } else {
            host.release_pointer();
            for window in self.windows.clone() {
                let point = pointer.position;
                let active = self.is_visible(window)
                    && self
                        .tree
                        .rect(window)
                        .is_some_and(|rect| rect.contains(point))
                    && !self.is_obscured(window, point);
                let cells = self.tree.element_cells(window);
                if !active {
                    for cell in cells {
                        self.idle_element(host, cell);
                    }
                    continue;
                }
                if pointer.pressed || pointer.down {
                    self.bring_to_front(window);
                }
                host.capture_pointer();
                for cell in cells {
                    self.update_element(host, cell);
                }
            }
        }

        self.prune();
        if self
            .banner
            .as_ref()
            .is_some_and(|banner| banner.is_finished(self.now))
        {
            self.banner = None;
        }
    }

    fn prune(&mut self) {
        let removed: Vec<WindowId> = self
            .windows
            .iter()
            .copied()
            .filter(|window| {
                self.tree
                    .window(*window)
                    .is_none_or(|data| data.marked_for_removal)
            })
            .collect();
        if !removed.is_empty() {
            self.windows.retain(|window| !removed.contains(window));
            for window in &removed {
                self.tree.remove(*window);
            }
            debug!(target: "ui::engine", count = removed.len(), "pruned windows");
        }

        if let Some(tooltip) = &self.tooltip
            && (tooltip.parent_hidden.get()
                || self
                    .tree
                    .window(tooltip.window)
                    .is_none_or(|data| data.marked_for_removal))
        {
            let window = tooltip.window;
            self.tooltip = None;
            self.tree.remove(window);
        }

        if self.dragged.is_some_and(|node| !self.tree.contains(node)) {
            self.dragged = None;
        }
        if self.delaying.is_some_and(|node| !self.tree.contains(node)) {
            self.delaying = None;
        }
        let tree = &self.tree;
        self.pending_refresh.retain(|node| tree.contains(*node));
    }
}
