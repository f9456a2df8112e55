//! Client builder.

use anyhow::{Context, Result};
use game_core::{GameWorld, StateMachines};
use game_ui::{GameHost, GameWindows};
use ui_engine::{RecordingRenderer, UiEngine};

use crate::{Client, ClientConfig, InputScript, Scene};

/// Builder for constructing a Client with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: the configuration must be provided
/// - **Optional fields**: the input script defaults to the demo walkthrough
/// - **Fail-fast validation**: missing fields or a broken scene fail `build()`
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    script: Option<InputScript>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (required).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the pointer input (optional).
    pub fn script(mut self, script: InputScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config is not set (required)
    /// - A state machine is missing a handler
    /// - The scene or the HUD cannot be built
    pub fn build(self) -> Result<Client> {
        let config = self
            .config
            .context("Config is required. Use .config() to set it.")?;

        let mut world = GameWorld::new(config.game.clone());
        // Machines attach first so the scene's state components reach them.
        let machines = StateMachines::new(&world).context("failed to build state machines")?;
        let scene = Scene::populate(&mut world).context("failed to populate the scene")?;

        let mut host = GameHost::new(world);
        let mut ui = UiEngine::new(config.ui.clone(), config.viewport());
        let windows = GameWindows::build(&mut ui, &mut host).context("failed to build the HUD")?;

        let script = self
            .script
            .unwrap_or_else(|| InputScript::demo(&ui, &windows, config.frame_seconds));

        Ok(Client {
            config,
            host,
            machines,
            ui,
            windows,
            scene,
            script,
            renderer: RecordingRenderer::new(),
        })
    }
}
