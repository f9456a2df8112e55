//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use game_core::GameConfig;
use ui_engine::{UiConfig, Vec2};

/// Everything the composition root needs to assemble and run a session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub game: GameConfig,
    pub ui: UiConfig,
    /// Screen size the UI is laid out for.
    pub screen_width: f32,
    pub screen_height: f32,
    /// Frames to simulate before the client exits.
    pub frames: u32,
    /// Seconds of simulated time per frame.
    pub frame_seconds: f32,
    /// Sleep between frames to match `frame_seconds` in wall-clock time.
    pub realtime: bool,
    pub session_id: Option<String>,
    /// Overrides the per-user cache directory for logs.
    pub log_dir: Option<PathBuf>,
    /// Where the final layout is dumped as JSON, if anywhere.
    pub snapshot_path: Option<PathBuf>,
}

impl ClientConfig {
    pub const DEFAULT_FRAMES: u32 = 120;
    pub const DEFAULT_FRAME_SECONDS: f32 = 1.0 / 60.0;

    pub fn new() -> Self {
        Self {
            game: GameConfig::new(),
            ui: UiConfig::new(),
            screen_width: UiConfig::TARGET_WIDTH,
            screen_height: UiConfig::TARGET_HEIGHT,
            frames: Self::DEFAULT_FRAMES,
            frame_seconds: Self::DEFAULT_FRAME_SECONDS,
            realtime: false,
            session_id: None,
            log_dir: None,
            snapshot_path: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Game and UI tuning come from [`GameConfig::from_env`] and
    /// [`UiConfig::from_env`]. Client variables:
    /// - `SAGE_SCREEN_WIDTH`, `SAGE_SCREEN_HEIGHT` (default: 1920x1080)
    /// - `SAGE_FRAMES` (default: 120)
    /// - `SAGE_FRAME_SECONDS` (default: 1/60)
    /// - `SAGE_REALTIME` (default: false)
    /// - `SAGE_SESSION_ID` (default: `session_<unix seconds>`)
    /// - `SAGE_LOG_DIR` (default: per-user cache directory)
    /// - `SAGE_SNAPSHOT_PATH` (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.game = GameConfig::from_env();
        config.ui = UiConfig::from_env();

        if let Some(width) = read_env::<f32>("SAGE_SCREEN_WIDTH")
            && width > 0.0
        {
            config.screen_width = width;
        }
        if let Some(height) = read_env::<f32>("SAGE_SCREEN_HEIGHT")
            && height > 0.0
        {
            config.screen_height = height;
        }
        if let Some(frames) = read_env::<u32>("SAGE_FRAMES") {
            config.frames = frames;
        }
        if let Some(seconds) = read_env::<f32>("SAGE_FRAME_SECONDS")
            && seconds > 0.0
        {
            config.frame_seconds = seconds;
        }
        if let Some(realtime) = read_env::<bool>("SAGE_REALTIME") {
            config.realtime = realtime;
        }
        config.session_id = env::var("SAGE_SESSION_ID").ok().filter(|id| !id.is_empty());
        config.log_dir = env::var_os("SAGE_LOG_DIR").map(PathBuf::from);
        config.snapshot_path = env::var_os("SAGE_SNAPSHOT_PATH").map(PathBuf::from);

        config
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_screen(mut self, width: f32, height: f32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}

impl Default for ClientConfig {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_authoring_resolution() {
        let config = ClientConfig::default();
        assert_eq!(config.viewport(), Vec2::new(1920.0, 1080.0));
        assert_eq!(config.frames, ClientConfig::DEFAULT_FRAMES);
        assert!(!config.realtime);
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::new()
            .with_frames(3)
            .with_screen(1280.0, 720.0)
            .with_snapshot_path("layout.json");
        assert_eq!(config.frames, 3);
        assert_eq!(config.viewport(), Vec2::new(1280.0, 720.0));
        assert_eq!(config.snapshot_path, Some(PathBuf::from("layout.json")));
    }
}
