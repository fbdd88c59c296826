//! End-to-end tests driving the `kiro-proxy` binary with an isolated home.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn kiro_proxy(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kiro-proxy").unwrap();
    cmd.env("KIRO_PROXY_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn stored_config(home: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(home.path().join(".kiro-proxy/config.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_status_not_configured() {
    let home = TempDir::new().unwrap();

    kiro_proxy(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not configured"));
}

#[test]
fn test_install_then_status() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("creds.json");
    fs::write(&creds, r#"{"accessToken":"abc"}"#).unwrap();

    kiro_proxy(&home)
        .args(["install", creds.to_str().unwrap(), "--api-key", "mykey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved to"));

    assert_eq!(stored_config(&home)["api_key"], "mykey");
    assert_eq!(stored_config(&home)["port"], 8000);

    kiro_proxy(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("mykey"))
        .stdout(predicate::str::contains("NOT FOUND").not());
}

#[test]
fn test_install_generates_key() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("creds.json");
    fs::write(&creds, r#"{"refreshToken":"r"}"#).unwrap();

    kiro_proxy(&home)
        .args(["install", creds.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated API Key"));

    let key = stored_config(&home)["api_key"].as_str().unwrap().to_string();
    assert!(key.len() >= 22);
}

#[test]
fn test_install_ide_detection() {
    let home = TempDir::new().unwrap();
    let cache = home.path().join(".aws/sso/cache");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("kiro-auth-token.json"), r#"{"accessToken":"abc"}"#).unwrap();

    kiro_proxy(&home)
        .args(["install", "--ide"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found:"));

    assert!(stored_config(&home)["credentials_file"]
        .as_str()
        .unwrap()
        .ends_with("kiro-auth-token.json"));
}

#[test]
fn test_install_failures_exit_non_zero() {
    let home = TempDir::new().unwrap();
    let foreign = home.path().join("foreign.json");
    fs::write(&foreign, r#"{"foo":"bar"}"#).unwrap();
    let garbage = home.path().join("garbage.json");
    fs::write(&garbage, "not json").unwrap();

    kiro_proxy(&home)
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ide"));

    kiro_proxy(&home)
        .args(["install", "--ide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Kiro IDE credentials not found"));

    kiro_proxy(&home)
        .args(["install", foreign.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing accessToken or refreshToken"));

    kiro_proxy(&home)
        .args(["install", garbage.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON file"));

    assert!(!home.path().join(".kiro-proxy/config.json").exists());
}

#[test]
fn test_start_requires_configuration() {
    let home = TempDir::new().unwrap();

    kiro_proxy(&home)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not configured"));
}

#[test]
fn test_start_detects_deleted_credentials() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("creds.json");
    fs::write(&creds, r#"{"accessToken":"abc"}"#).unwrap();

    kiro_proxy(&home)
        .args(["install", creds.to_str().unwrap(), "-k", "mykey"])
        .assert()
        .success();
    fs::remove_file(&creds).unwrap();

    kiro_proxy(&home)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credentials file not found"))
        .stderr(predicate::str::contains("to reconfigure"));
}

#[test]
fn test_start_surfaces_server_launch_failure() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("creds.json");
    fs::write(&creds, r#"{"accessToken":"abc"}"#).unwrap();

    kiro_proxy(&home)
        .args(["install", creds.to_str().unwrap(), "-k", "mykey"])
        .assert()
        .success();

    kiro_proxy(&home)
        .env("KIRO_PROXY_SERVER", "kiro-gateway-definitely-not-installed")
        .args(["start", "--port", "9100"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("http://localhost:9100/v1"))
        .stderr(predicate::str::contains("Failed to start server"));
}

#[test]
fn test_init_kiro_cli_choice_is_unavailable() {
    let home = TempDir::new().unwrap();

    kiro_proxy(&home)
        .arg("init")
        .write_stdin("2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn test_init_manual_path_without_starting() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("creds.json");
    fs::write(&creds, r#"{"accessToken":"abc"}"#).unwrap();

    kiro_proxy(&home)
        .arg("init")
        .write_stdin(format!("3\n{}\nabc\nn\n", creds.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved!"));

    assert_eq!(stored_config(&home)["port"], 8000);
}
