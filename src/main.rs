//! demo2d - Touch-driven 2D physics demos
//!
//! Runs one demo headless with a scripted gesture and reports what is left
//! in the world.

use demo2d::app::DemoApp;
use demo2d::config::AppConfig;

fn main() {
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Starting demo2d");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let mut app = DemoApp::new(config);
    let summary = app.run();
    log::info!(
        "{} finished after {} frames ({} steps): {} bodies, {} joints",
        summary.scene.name(),
        summary.frames,
        summary.steps,
        summary.bodies,
        summary.joints
    );
}
