use crtpad_settings::{AppConfig, ConfigError, MAX_FONT_SIZE};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");

    let config = AppConfig::load(&path).expect("load defaults");
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.storage.files_key, "crtpad-files");
    assert_eq!(config.storage.active_key, "crtpad-active-file");
    assert_eq!(config.autosave.quiet_period(), Duration::from_secs(2));
    assert_eq!(config.autosave.autosave_indicator(), Duration::from_secs(1));
    assert_eq!(config.autosave.save_indicator(), Duration::from_secs(2));
    assert_eq!(config.editor.font_size, 14);
    assert_eq!(config.editor.theme, "fallout-dark");
    assert!(!path.exists());
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("config.json");

    let mut config = AppConfig::default();
    config.autosave.quiet_period_ms = 150;
    config.editor.word_wrap = false;
    config.editor.theme = "fallout-amber".into();
    config.export_dir = Some("out".into());
    config.save(&path).expect("save");

    let reloaded = AppConfig::load(&path).expect("reload");
    assert_eq!(reloaded, config);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn partial_file_fills_defaults_and_sanitizes() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{ "autosave": { "quiet_period_ms": 0 }, "editor": { "font_size": 99 }, "storage": { "files_key": "" } }"#,
    )
    .expect("write config");

    let config = AppConfig::load(&path).expect("load");
    assert_eq!(config.autosave.quiet_period_ms, 2_000);
    assert_eq!(config.editor.font_size, MAX_FONT_SIZE);
    assert!(config.editor.minimap);
    assert_eq!(config.storage.files_key, "crtpad-files");
}

#[test]
fn invalid_json_reports_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, "{ not json").expect("write config");

    match AppConfig::load(&path) {
        Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn save_under_a_file_reports_io_error_for_parent() {
    let temp = tempdir().expect("tempdir");
    let blocker = temp.path().join("state");
    fs::write(&blocker, "not a directory").expect("write blocker");

    match AppConfig::default().save(blocker.join("config.json")) {
        Err(ConfigError::Io { path, .. }) => assert_eq!(path, blocker),
        other => panic!("expected io error, got {other:?}"),
    }
}
