//! Drawing and text-measurement collaborators.
//!
//! The engine never talks to a graphics API. It resolves every rect first and
//! then hands draw calls to a [`Renderer`]; text sizing goes through a
//! [`TextMeasure`]. Headless builds and tests use [`RecordingRenderer`] and
//! [`Monospace`].

use crate::element::{Effect, Texture};
use crate::geometry::{Rect, Vec2};

/// Measures laid-out text. `text` may contain `\n` line breaks.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32, spacing: f32) -> Vec2;
}

/// Fixed-advance measurement: every glyph is half the font size wide and
/// every line is one font size tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct Monospace;

impl Monospace {
    pub const ADVANCE: f32 = 0.5;
}

impl TextMeasure for Monospace {
    fn measure(&self, text: &str, font_size: f32, spacing: f32) -> Vec2 {
        let mut widest: f32 = 0.0;
        let mut lines = 0usize;
        for line in text.split('\n') {
            lines += 1;
            let glyphs = line.chars().count();
            if glyphs == 0 {
                continue;
            }
            let width = glyphs as f32 * font_size * Self::ADVANCE + (glyphs - 1) as f32 * spacing;
            widest = widest.max(width);
        }
        Vec2::new(widest, lines as f32 * font_size)
    }
}

/// Sink for the draw calls of one frame.
pub trait Renderer {
    /// Draws `texture` stretched over `dest`, clipped to `clip`.
    fn texture(&mut self, texture: &Texture, dest: Rect, clip: Rect, effect: Option<Effect>);

    fn text(&mut self, text: &str, origin: Vec2, font_size: f32, alpha: f32);
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawCommand {
    Texture {
        key: String,
        dest: Rect,
        clip: Rect,
        effect: Option<Effect>,
    },
    Text {
        text: String,
        origin: Vec2,
        font_size: f32,
        alpha: f32,
    },
}

/// Keeps every draw call in submission order.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Every text run drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Texture { .. } => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn texture(&mut self, texture: &Texture, dest: Rect, clip: Rect, effect: Option<Effect>) {
        self.commands.push(DrawCommand::Texture {
            key: texture.key.clone(),
            dest,
            clip,
            effect,
        });
    }

    fn text(&mut self, text: &str, origin: Vec2, font_size: f32, alpha: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin,
            font_size,
            alpha,
        });
    }
}
