use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("# api_base_url ="));
    assert!(contents.contains("log_level = \"info\""));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_set_api_url_keeps_template_comments() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .args(["config", "set-api-url", "https://api.example.com/prod"])
        .assert()
        .success();

    let contents = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("api_base_url = \"https://api.example.com/prod\""));
    assert!(contents.contains("# wsreg configuration"));
}

#[test]
fn test_set_api_url_rejects_garbage() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .args(["config", "set-api-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid URL"));
}

#[test]
fn test_missing_api_url_is_reported() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("wsreg")
        .env("WSREG_HOME", dir.path())
        .env_remove("WSREG_API_URL")
        .arg("workshops")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API base URL is not configured"));
}

#[test]
fn test_help_lists_commands() {
    cargo_bin_cmd!("wsreg")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("workshops"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("admin"));
}
