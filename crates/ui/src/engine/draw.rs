use crate::element::{ElementData, ElementFlags, Visual};
use crate::geometry::{Rect, Vec2};
use crate::host::UiHost;
use crate::render::Renderer;
use crate::tree::{Background, BackgroundMode, NodeId, WindowId};

use super::UiEngine;

/// Banner font size at the target resolution.
const BANNER_FONT_SIZE: f32 = 24.0;

impl<H: UiHost> UiEngine<H> {
    /// Draws windows back to front, then the tooltip, the dragged element
    /// under the pointer and the error banner on top.
    pub fn draw(&self, host: &H, renderer: &mut dyn Renderer) {
        for window in &self.windows {
            if self.is_visible(*window) {
                self.draw_window(host, *window, renderer);
            }
        }
        if let Some(tooltip) = self.tooltip() {
            self.draw_window(host, tooltip, renderer);
        }

        if let Some(dragged) = self.dragged
            && let Some(data) = self.tree.element(dragged)
            && !data.flags.contains(ElementFlags::DRAG_IN_PLACE)
        {
            let size = data.rect.size();
            let pointer = self.pointer.position;
            let dest = Rect::new(
                pointer.x - size.x / 2.0,
                pointer.y - size.y / 2.0,
                size.x,
                size.y,
            );
            self.draw_element(host, dragged, data, dest, renderer);
        }

        if let Some(banner) = &self.banner {
            let alpha = banner.alpha(self.now);
            if alpha > 0.0 {
                let font_size = self.settings.scale_uniform(BANNER_FONT_SIZE);
                let size =
                    self.measure
                        .measure(banner.message(), font_size, self.config.font_spacing);
                let viewport = self.settings.viewport();
                let origin = Vec2::new((viewport.x - size.x) / 2.0, viewport.y / 4.0);
                renderer.text(banner.message(), origin, font_size, alpha);
            }
        }
    }

    fn draw_window(&self, host: &H, window: WindowId, renderer: &mut dyn Renderer) {
        for id in self.tree.descendants(window) {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if let Some(background) = node.background() {
                draw_background(background, node.rect(), renderer);
            }
            let Some(data) = node.element() else {
                continue;
            };
            let detached = self.dragged == Some(id)
                && !data.flags.contains(ElementFlags::DRAG_IN_PLACE);
            if !detached {
                self.draw_element(host, id, data, data.rect, renderer);
            }
        }
    }

    fn draw_element(
        &self,
        host: &H,
        node: NodeId,
        data: &ElementData,
        dest: Rect,
        renderer: &mut dyn Renderer,
    ) {
        match &data.visual {
            Visual::Image(image) => {
                let effect = self
                    .tree
                    .behavior(node)
                    .and_then(|behavior| behavior.effect(host))
                    .or(data.effect);
                if let Some(backdrop) = &image.backdrop {
                    renderer.texture(backdrop, dest, dest, None);
                }
                if let Some(texture) = &image.texture {
                    renderer.texture(texture, dest, dest, effect);
                }
            }
            Visual::Text(text) => {
                renderer.text(&text.display_text(), dest.position(), text.font_size(), 1.0);
            }
        }
    }
}

fn draw_background(background: &Background, rect: Rect, renderer: &mut dyn Renderer) {
    let texture = &background.texture;
    match background.mode {
        BackgroundMode::None => {
            let dest = Rect::new(rect.x, rect.y, texture.width, texture.height);
            renderer.texture(texture, dest, rect, None);
        }
        BackgroundMode::Stretch => renderer.texture(texture, rect, rect, None),
        BackgroundMode::Fill => {
            if texture.width <= 0.0 || texture.height <= 0.0 {
                return;
            }
            let scale = (rect.width / texture.width).max(rect.height / texture.height);
            let size = texture.size() * scale;
            let dest = Rect::new(
                rect.x + (rect.width - size.x) / 2.0,
                rect.y + (rect.height - size.y) / 2.0,
                size.x,
                size.y,
            );
            renderer.texture(texture, dest, rect, None);
        }
        BackgroundMode::Tile => {
            if texture.width <= 0.0 || texture.height <= 0.0 {
                return;
            }
            let mut y = rect.y;
            while y < rect.bottom() {
                let mut x = rect.x;
                while x < rect.right() {
                    let dest = Rect::new(x, y, texture.width, texture.height);
                    renderer.texture(texture, dest, rect, None);
                    x += texture.width;
                }
                y += texture.height;
            }
        }
    }
}
