//! Top-level client assembling the world, the state machines and the HUD.
//!
//! # Architecture
//!
//! ```text
//! Client (composition root)
//!   ├─→ GameHost (GameWorld + pointer capture)
//!   ├─→ StateMachines (party, wavemob, ability, game mode)
//!   ├─→ UiEngine + GameWindows (HUD layout and slot widgets)
//!   └─→ InputScript (pointer samples for headless sessions)
//! ```
//!
//! # Frame Order
//!
//! 1. World systems tick (clock, movement, animations)
//! 2. State machines update, then deferred entity removal
//! 3. HUD re-reads the selected actor if it changed
//! 4. UI engine consumes the frame's pointer sample
//! 5. Machines and UI draw
//!
//! # Design Principles
//!
//! - **Single owner**: the client owns every layer; nothing is shared across
//!   threads, so the loop is a plain sequence of calls
//! - **Headless by default**: drawing goes to a [`RecordingRenderer`]

mod builder;
pub mod config;
pub mod logging;
pub mod scene;
pub mod script;

pub use builder::ClientBuilder;
pub use config::ClientConfig;
pub use scene::Scene;
pub use script::InputScript;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use game_core::StateMachines;
use game_ui::{GameHost, GameWindows};
use tokio::time::MissedTickBehavior;
use ui_engine::{RecordingRenderer, UiEngine};

/// What a finished session looked like.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    /// Draw calls of the last frame.
    pub draw_commands: usize,
    pub visible_windows: usize,
    pub banner: Option<String>,
}

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. [`Client::builder`] spawns the scene and lays out the HUD
/// 2. [`Client::run`] simulates the configured number of frames
/// 3. The final layout is written as JSON when a snapshot path is set
pub struct Client {
    config: ClientConfig,
    host: GameHost,
    machines: StateMachines,
    ui: UiEngine<GameHost>,
    windows: GameWindows,
    scene: Scene,
    script: InputScript,
    renderer: RecordingRenderer,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn host(&self) -> &GameHost {
        &self.host
    }

    pub fn ui(&self) -> &UiEngine<GameHost> {
        &self.ui
    }

    pub fn windows(&self) -> &GameWindows {
        &self.windows
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    /// Simulates one frame with the script's next pointer sample.
    pub fn step(&mut self) {
        let dt = self.config.frame_seconds;
        let pointer = self.script.next_pointer();

        self.host.world.tick(dt);
        self.machines.update(&mut self.host.world);
        self.windows.sync(&mut self.ui, &mut self.host);
        self.ui.update(&mut self.host, pointer, dt);

        self.machines.draw(&self.host.world);
        self.renderer.clear();
        self.ui.draw(&self.host, &mut self.renderer);
    }

    /// Run the configured number of frames.
    ///
    /// Frames are paced to wall-clock time when `realtime` is set and run
    /// back to back otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout snapshot cannot be written.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let frames = self.config.frames;
        tracing::info!(
            target: "client",
            frames,
            frame_seconds = self.config.frame_seconds,
            scripted = self.script.len(),
            "session started"
        );

        let mut pacing = self.config.realtime.then(|| {
            let mut interval =
                tokio::time::interval(Duration::from_secs_f32(self.config.frame_seconds));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        for _ in 0..frames {
            if let Some(interval) = pacing.as_mut() {
                interval.tick().await;
            }
            self.step();
        }

        if let Some(path) = self.config.snapshot_path.clone() {
            self.write_snapshot(&path)?;
        }

        let summary = RunSummary {
            frames,
            draw_commands: self.renderer.commands().len(),
            visible_windows: self
                .ui
                .windows()
                .iter()
                .filter(|window| self.ui.is_visible(**window))
                .count(),
            banner: self.ui.banner().map(|banner| banner.message().to_owned()),
        };
        tracing::info!(
            target: "client",
            draw_commands = summary.draw_commands,
            visible_windows = summary.visible_windows,
            "session finished"
        );
        Ok(summary)
    }

    /// Writes the resolved layout of every window as pretty-printed JSON.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.ui.snapshot())
            .context("failed to serialize the layout snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        tracing::info!(target: "client", path = %path.display(), "layout snapshot written");
        Ok(())
    }
}
