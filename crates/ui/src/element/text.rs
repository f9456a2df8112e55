use strum::Display;

use crate::config::UiConfig;
use crate::geometry::{HoriAlign, Rect, VertAlign, align_offset};
use crate::render::TextMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextOverflow {
    /// Step the font size down until the text fits or the floor is hit.
    #[default]
    ShrinkToFit,
    /// Greedy line breaking on whitespace; words are never split.
    WordWrap,
    None,
}

/// Text element.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    content: String,
    lines: Vec<String>,
    pub overflow: TextOverflow,
    pub vert: VertAlign,
    pub hori: HoriAlign,
    base_font_size: f32,
    font_size: f32,
    min_font_size: f32,
    max_font_size: f32,
    spacing: f32,
}

impl TextBox {
    pub fn new(content: impl Into<String>, config: &UiConfig) -> Self {
        let content = content.into();
        Self {
            lines: vec![content.clone()],
            content,
            overflow: TextOverflow::default(),
            vert: VertAlign::Top,
            hori: HoriAlign::Left,
            base_font_size: config.base_font_size,
            font_size: config.base_font_size,
            min_font_size: config.min_font_size,
            max_font_size: config.max_font_size,
            spacing: config.font_spacing,
        }
    }

    pub fn with_overflow(mut self, overflow: TextOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn aligned(mut self, vert: VertAlign, hori: HoriAlign) -> Self {
        self.vert = vert;
        self.hori = hori;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.base_font_size = size;
        self.font_size = size;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the text. The new content is laid out on the next layout
    /// pass of the owning window.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.lines = vec![self.content.clone()];
    }

    /// The content as drawn, after wrapping.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn display_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Resolves font size, line breaks and the drawn rect inside `space`.
    /// `window_space` is only consulted for [`HoriAlign::WindowCenter`].
    pub(crate) fn fit(
        &mut self,
        space: Rect,
        window_space: Rect,
        device_scale: f32,
        measure: &dyn TextMeasure,
    ) -> Rect {
        self.font_size =
            (self.base_font_size * device_scale).clamp(self.min_font_size, self.max_font_size);
        self.lines = vec![self.content.clone()];

        match self.overflow {
            TextOverflow::ShrinkToFit => {
                let mut size = measure.measure(&self.content, self.font_size, self.spacing);
                while size.x > space.width && self.font_size > self.min_font_size {
                    self.font_size = (self.font_size - 1.0).max(self.min_font_size);
                    size = measure.measure(&self.content, self.font_size, self.spacing);
                }
            }
            TextOverflow::WordWrap => {
                self.lines = wrap(&self.content, space.width, |line| {
                    measure.measure(line, self.font_size, self.spacing).x
                });
            }
            TextOverflow::None => {}
        }

        let size = measure.measure(&self.display_text(), self.font_size, self.spacing);
        let offset = align_offset(size, space.size(), self.vert, self.hori);
        let x = if self.hori == HoriAlign::WindowCenter {
            window_space.x + (window_space.width - size.x) / 2.0
        } else {
            space.x + offset.x
        };
        Rect::new(x, space.y + offset.y, size.x, size.y)
    }
}

fn wrap(content: &str, width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Monospace;

    fn config() -> UiConfig {
        UiConfig {
            font_spacing: 0.0,
            min_font_size: 8.0,
            ..UiConfig::default()
        }
    }

    #[test]
    fn shrink_to_fit_steps_down_until_it_fits() {
        // 10 glyphs at 16px are 80px wide; 60px fits at 12px.
        let mut text = TextBox::new("abcdefghij", &config());
        let space = Rect::new(0.0, 0.0, 60.0, 40.0);
        let rect = text.fit(space, space, 1.0, &Monospace);
        assert_eq!(text.font_size(), 12.0);
        assert_eq!(rect.width, 60.0);
    }

    #[test]
    fn shrink_to_fit_stops_at_the_floor() {
        let mut text = TextBox::new("a very long line of text", &config());
        let space = Rect::new(0.0, 0.0, 10.0, 40.0);
        text.fit(space, space, 1.0, &Monospace);
        assert_eq!(text.font_size(), 8.0);
    }

    #[test]
    fn word_wrap_is_greedy_and_keeps_long_words_whole() {
        // 8px per glyph: "aa bb" is 40px, "aa bb cc" is 64px.
        let mut text = TextBox::new("aa bb cc extraordinary", &config())
            .with_overflow(TextOverflow::WordWrap);
        let space = Rect::new(0.0, 0.0, 48.0, 100.0);
        let rect = text.fit(space, space, 1.0, &Monospace);
        assert_eq!(text.lines(), ["aa bb", "cc", "extraordinary"]);
        assert_eq!(rect.height, 48.0);
    }

    #[test]
    fn font_scales_with_device_and_is_clamped() {
        let mut text = TextBox::new("x", &UiConfig::default()).with_overflow(TextOverflow::None);
        let space = Rect::new(0.0, 0.0, 500.0, 500.0);
        text.fit(space, space, 10.0, &Monospace);
        assert_eq!(text.font_size(), 72.0);
        text.fit(space, space, 0.5, &Monospace);
        assert_eq!(text.font_size(), 16.0);
    }

    #[test]
    fn window_center_uses_the_window_width() {
        let mut text = TextBox::new("abcd", &config())
            .with_overflow(TextOverflow::None)
            .aligned(VertAlign::Top, HoriAlign::WindowCenter);
        let cell = Rect::new(100.0, 0.0, 50.0, 20.0);
        let window = Rect::new(0.0, 0.0, 400.0, 300.0);
        let rect = text.fit(cell, window, 1.0, &Monospace);
        assert_eq!(rect.x, (400.0 - 32.0) / 2.0);
    }
}
