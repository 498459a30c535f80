//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use demo2d::app::DemoApp;
use demo2d::config::AppConfig;
use demo2d_core::SceneKind;
use serial_test::serial;
use std::path::PathBuf;

fn temp_config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("demo2d_config_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("D2D_DEMO__START_SCENE", "ragdoll");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.demo.start_scene, "ragdoll");
    assert_eq!(config.demo.start_kind(), SceneKind::Ragdoll);
    std::env::remove_var("D2D_DEMO__START_SCENE");
}

#[test]
#[serial]
fn test_env_override_numeric() {
    std::env::set_var("D2D_PHYSICS__GRAVITY", "-9.8");
    let config = AppConfig::load().unwrap();
    assert!((config.physics.gravity + 9.8).abs() < 1e-6);
    std::env::remove_var("D2D_PHYSICS__GRAVITY");
}

#[test]
#[serial]
fn test_default_file_loading() {
    let config = AppConfig::load().unwrap();
    assert_eq!(config.screen.width, 480.0);
    assert_eq!(config.screen.ptm_ratio, 32.0);
    assert_eq!(config.physics.velocity_iterations, 8);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = temp_config_dir("user");
    std::fs::write(
        dir.join("default.toml"),
        "[demo]\nstart_scene = \"slice\"\nframes = 300\nragdoll_count = 2\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("user.toml"),
        "[demo]\nstart_scene = \"buoyancy\"\nframes = 12\nragdoll_count = 1\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(config.demo.start_kind(), SceneKind::Buoyancy);
    assert_eq!(config.demo.frames, 12);
    // Sections missing from both files keep their defaults
    assert_eq!(config.screen.height, 320.0);
}

#[test]
#[serial]
fn test_missing_dir_uses_defaults() {
    let config = AppConfig::load_from("no/such/config/dir").unwrap();
    assert_eq!(config.demo.frames, 300);
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_invalid_value_is_error() {
    let dir = temp_config_dir("invalid");
    std::fs::write(dir.join("default.toml"), "[physics]\ngravity = \"down\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    std::fs::remove_dir_all(&dir).ok();

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_configured_layout_drives_slice_demo() {
    let dir = temp_config_dir("layout");
    let layout = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/layouts/slice.ron");
    std::fs::write(
        dir.join("default.toml"),
        format!(
            "[demo]\nstart_scene = \"slice\"\nframes = 1\nragdoll_count = 2\nslice_layout = {:?}\n",
            layout
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let settings = config.scene_settings();
    let bodies = settings.slice_layout.as_ref().map(|l| l.bodies.len()).unwrap();
    let app = DemoApp::new(config);
    // Layout bodies plus the screen bounds
    assert_eq!(app.scene().world().body_count(), bodies + 1);
}
