//! Sage client binary.
//!
//! Main entry point: a headless session over the demo encounter.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. Configuration from `.env` and `SAGE_*` variables
//! 2. File logging under a per-session directory
//! 3. The [`Client`] (world, state machines, HUD) via its builder
//!
//! # Examples
//!
//! ```bash
//! # Simulate five seconds and dump the final layout
//! SAGE_FRAMES=300 SAGE_SNAPSHOT_PATH=layout.json cargo run -p sage-client
//!
//! # Lay the HUD out for a smaller screen, paced in real time
//! SAGE_SCREEN_WIDTH=1280 SAGE_SCREEN_HEIGHT=720 SAGE_REALTIME=true cargo run -p sage-client
//! ```

use anyhow::Result;
use sage_client::{Client, ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let log_file = logging::setup_logging(config.log_dir.as_deref(), config.session_id.as_deref())?;

    let mut client = Client::builder().config(config).build()?;
    let summary = client.run().await?;

    println!(
        "{} frames, {} draw calls, {} windows open. Log: {}",
        summary.frames,
        summary.draw_commands,
        summary.visible_windows,
        log_file.display()
    );
    if let Some(banner) = summary.banner {
        println!("last message: {banner}");
    }

    Ok(())
}
