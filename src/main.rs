// src/main.rs

use ascii_shapes::{
    config::CONFIG,
    display::drivers::ConsoleDisplay,
    host::Host,
    scene::Scene,
    ticker::{event_channel, IntervalTickSource},
};

use anyhow::Context;
use log::{error, info};
use std::time::Duration;

/// Main entry point for `ascii-shapes`.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr, underneath the animation, so keep them quiet
    // unless RUST_LOG asks for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    info!("Starting ascii-shapes...");

    let config = &*CONFIG;
    info!("Configuration: {:?}", config.host);

    let scene = Scene::from_config(config).context("Invalid shape configuration")?;

    let (event_tx, event_rx) = event_channel();
    let period = Duration::from_millis(config.host.tick_ms.max(1));
    let mut ticks = IntervalTickSource::new(event_tx, period);

    let mut display = ConsoleDisplay::new().context("Failed to initialize console display")?;
    info!("ConsoleDisplay initialized.");

    let mut host = Host::new(scene, &mut display, &mut ticks, config);
    if let Err(e) = host.run(&event_rx) {
        error!("Host exited with error: {:#}. Root cause: {:?}", e, e.root_cause());
        return Err(e);
    }

    info!("ascii-shapes exited successfully.");
    Ok(())
}
