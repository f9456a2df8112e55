//! Viewport and device scale.

use crate::config::UiConfig;
use crate::geometry::Vec2;

/// Current viewport, measured against the resolution windows are authored
/// for.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    viewport: Vec2,
    target: Vec2,
}

impl Settings {
    pub fn new(config: &UiConfig, viewport: Vec2) -> Self {
        Self {
            viewport,
            target: Vec2::new(config.target_width, config.target_height),
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn width_ratio(&self) -> f32 {
        self.viewport.x / self.target.x
    }

    pub fn height_ratio(&self) -> f32 {
        self.viewport.y / self.target.y
    }

    /// Uniform factor that keeps authored aspect ratios intact.
    pub fn scale_factor(&self) -> f32 {
        self.width_ratio().min(self.height_ratio())
    }

    pub fn scale_width(&self, value: f32) -> f32 {
        value * self.width_ratio()
    }

    pub fn scale_height(&self, value: f32) -> f32 {
        value * self.height_ratio()
    }

    pub fn scale_uniform(&self, value: f32) -> f32 {
        value * self.scale_factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_resolution_scales_by_exactly_one() {
        let settings = Settings::new(&UiConfig::default(), Vec2::new(1920.0, 1080.0));
        assert_eq!(settings.scale_factor(), 1.0);
        assert_eq!(settings.scale_width(333.3), 333.3);
    }

    #[test]
    fn uniform_scale_follows_the_tighter_axis() {
        let settings = Settings::new(&UiConfig::default(), Vec2::new(960.0, 1080.0));
        assert_eq!(settings.scale_factor(), 0.5);
        assert_eq!(settings.scale_height(100.0), 100.0);
    }
}
