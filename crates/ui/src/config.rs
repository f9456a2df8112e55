//! Timings and font limits for the UI engine.

use std::env;

/// UI tuning values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UiConfig {
    /// Seconds a draggable element must be held before it starts dragging.
    pub drag_delay: f32,
    /// Seconds of hovering before a tooltip opens.
    pub tooltip_delay: f32,
    /// Total lifetime of an error banner, fade included.
    pub error_display_seconds: f32,
    /// Trailing part of the banner lifetime spent fading out.
    pub error_fade_seconds: f32,
    pub base_font_size: f32,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub font_spacing: f32,
    /// Resolution every window is authored against.
    pub target_width: f32,
    pub target_height: f32,
}

impl UiConfig {
    pub const DEFAULT_DRAG_DELAY: f32 = 0.1;
    pub const DEFAULT_TOOLTIP_DELAY: f32 = 0.8;
    pub const DEFAULT_ERROR_DISPLAY_SECONDS: f32 = 3.0;
    pub const DEFAULT_ERROR_FADE_SECONDS: f32 = 1.0;
    pub const DEFAULT_BASE_FONT_SIZE: f32 = 16.0;
    pub const DEFAULT_MIN_FONT_SIZE: f32 = 16.0;
    pub const DEFAULT_MAX_FONT_SIZE: f32 = 72.0;
    pub const DEFAULT_FONT_SPACING: f32 = 1.5;
    pub const TARGET_WIDTH: f32 = 1920.0;
    pub const TARGET_HEIGHT: f32 = 1080.0;

    pub fn new() -> Self {
        Self {
            drag_delay: Self::DEFAULT_DRAG_DELAY,
            tooltip_delay: Self::DEFAULT_TOOLTIP_DELAY,
            error_display_seconds: Self::DEFAULT_ERROR_DISPLAY_SECONDS,
            error_fade_seconds: Self::DEFAULT_ERROR_FADE_SECONDS,
            base_font_size: Self::DEFAULT_BASE_FONT_SIZE,
            min_font_size: Self::DEFAULT_MIN_FONT_SIZE,
            max_font_size: Self::DEFAULT_MAX_FONT_SIZE,
            font_spacing: Self::DEFAULT_FONT_SPACING,
            target_width: Self::TARGET_WIDTH,
            target_height: Self::TARGET_HEIGHT,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SAGE_UI_DRAG_DELAY` (default: 0.1)
    /// - `SAGE_UI_TOOLTIP_DELAY` (default: 0.8)
    /// - `SAGE_UI_ERROR_SECONDS` (default: 3)
    /// - `SAGE_UI_ERROR_FADE_SECONDS` (default: 1, capped at the display time)
    /// - `SAGE_UI_FONT_SIZE` (default: 16)
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(delay) = read_env::<f32>("SAGE_UI_DRAG_DELAY") {
            config.drag_delay = delay.max(0.0);
        }
        if let Some(delay) = read_env::<f32>("SAGE_UI_TOOLTIP_DELAY") {
            config.tooltip_delay = delay.max(0.0);
        }
        if let Some(seconds) = read_env::<f32>("SAGE_UI_ERROR_SECONDS") {
            config.error_display_seconds = seconds.max(0.0);
        }
        if let Some(seconds) = read_env::<f32>("SAGE_UI_ERROR_FADE_SECONDS") {
            config.error_fade_seconds = seconds.max(0.0);
        }
        config.error_fade_seconds = config.error_fade_seconds.min(config.error_display_seconds);
        if let Some(size) = read_env::<f32>("SAGE_UI_FONT_SIZE") {
            config.base_font_size = size.clamp(config.min_font_size, config.max_font_size);
        }

        config
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
