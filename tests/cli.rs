use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary config directory
fn temp_config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".pascani").join("config.json")
}

const BINARY_NAME: &str = "pascani";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Usage"))
        .stdout(contains("dashboard"))
        .stdout(contains("serve"));
}

#[test]
/// Insert rejects a malformed document before connecting anywhere.
fn insert_rejects_invalid_json() {
    let tmp = temp_config_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["insert", "turtles", "{not json"])
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("Invalid document"));
}

#[test]
/// A broken config file is reported instead of silently replaced.
fn invalid_config_file_is_an_error() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{ broken").unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("status")
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("Failed to load config"));
}

#[test]
/// Status fails when nothing listens on the configured port.
fn status_fails_without_server() {
    let tmp = temp_config_dir();
    let config_path = tmp.path().join("custom.json");
    fs::write(&config_path, r#"{"session": {"host": "127.0.0.1", "port": 1}}"#).unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure();
}

#[test]
/// init-config writes a loadable file once and refuses to overwrite it.
fn init_config_writes_defaults_once() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("init-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(contains("Config written"));
    let written = fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("allow_any_query"));

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("init-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(contains("Config file exists"));

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["init-config", "--force"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();
}
