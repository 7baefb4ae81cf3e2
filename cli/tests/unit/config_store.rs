//! Unit tests for `YamlConfigStore`: file layering and `WSAGENT_*` overrides.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use serial_test::serial;
use tempfile::TempDir;
use wsagent_cli::application::ports::ConfigStore;
use wsagent_cli::infra::YamlConfigStore;
use wsagent_common::{LauncherConfig, ProbeMethod};

const OVERRIDES: [&str; 3] = [
    "WSAGENT_PING_DELAY_MS",
    "WSAGENT_PROBE_METHOD",
    "WSAGENT_MAX_START_TIME_MS",
];

fn clear_env() {
    for key in OVERRIDES {
        // SAFETY: every test touching these variables is #[serial]
        unsafe { std::env::remove_var(key) };
    }
}

fn store_with(content: Option<&str>) -> (TempDir, YamlConfigStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    if let Some(content) = content {
        std::fs::write(&path, content).unwrap();
    }
    (dir, YamlConfigStore::new(Some(path)))
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    clear_env();
    let (_dir, store) = store_with(None);
    assert_eq!(store.load().unwrap(), LauncherConfig::default());
}

#[test]
#[serial]
fn test_file_values_override_defaults() {
    clear_env();
    let (_dir, store) = store_with(Some(
        "max_start_time_ms: 60000\nping_delay_ms: 500\nprobe_method: head\n",
    ));

    let config = store.load().unwrap();

    assert_eq!(config.max_start_time_ms, 60_000);
    assert_eq!(config.ping_delay_ms, 500);
    assert_eq!(config.probe_method, ProbeMethod::Head);
    assert_eq!(config.ping_conn_timeout_ms, 2000);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let (_dir, store) = store_with(Some("ping_delay_ms: 500\n"));
    // SAFETY: serialized with every other env-mutating test
    unsafe {
        std::env::set_var("WSAGENT_PING_DELAY_MS", "250");
        std::env::set_var("WSAGENT_PROBE_METHOD", "head");
    }

    let config = store.load();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.ping_delay_ms, 250);
    assert_eq!(config.probe_method, ProbeMethod::Head);
}

#[test]
#[serial]
fn test_invalid_env_value_is_rejected() {
    clear_env();
    let (_dir, store) = store_with(None);
    // SAFETY: serialized with every other env-mutating test
    unsafe { std::env::set_var("WSAGENT_MAX_START_TIME_MS", "soon") };

    let result = store.load();
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_file_value_fails_validation() {
    clear_env();
    let (_dir, store) = store_with(Some("ping_delay_ms: 0\n"));
    let err = store.load().unwrap_err();
    assert!(format!("{err:#}").contains("ping_delay_ms"));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    clear_env();
    let (_dir, store) = store_with(Some("ping_delay_ms: [1, 2]\n"));
    assert!(store.load().is_err());
}

#[test]
fn test_path_override_wins() {
    let store = YamlConfigStore::new(Some("/tmp/custom.yaml".into()));
    assert_eq!(store.path().unwrap(), std::path::PathBuf::from("/tmp/custom.yaml"));
}
