//! CLI integration tests
use std::fs;
use std::path::Path;

use predicates::prelude::*;
use tempfile::TempDir;

/// Runs `folio` isolated from the user's config file and credentials.
fn cmd(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("folio");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("FOLIO_API_KEY")
        .env_remove("FOLIO_API_SECRET")
        .env_remove("FOLIO_LOGIN")
        .env_remove("FOLIO_PASSWORD")
        .env_remove("FOLIO_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--folder"))
        .stdout(predicate::str::contains("--pdf-root"))
        .stdout(predicate::str::contains("--archive"));
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_completions() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_cli_missing_credentials() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing api_key, api_secret, login"));
}

#[test]
fn test_cli_credentials_from_env_still_need_login() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .env("FOLIO_API_KEY", "key")
        .env("FOLIO_API_SECRET", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing login"))
        .stderr(predicate::str::contains("secret").not());
}

#[test]
fn test_cli_zero_limit() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["--api-key", "k", "--api-secret", "s", "--login", "me@example.com", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit must be at least 1"));
}

#[test]
fn test_cli_invalid_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(&config, "pdf_rot = \"/typo\"\n").unwrap();

    cmd(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_cli_missing_config_file() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["--config", "/nonexistent/folio.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
#[cfg(target_os = "linux")]
fn test_cli_default_config_location() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("folio")).unwrap();
    fs::write(tmp.path().join("folio/config.toml"), "limit = 0\n").unwrap();

    cmd(tmp.path())
        .args(["--api-key", "k", "--api-secret", "s", "--login", "me@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit must be at least 1"));
}

#[test]
fn test_cli_unreachable_api() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        "api_key = \"k\"\napi_secret = \"s\"\nlogin = \"me@example.com\"\napi_url = \"http://127.0.0.1:9\"\ntimeout = 2\n",
    )
    .unwrap();

    cmd(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Export failed"));
}

#[test]
fn test_cli_invalid_limit() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path()).args(["--limit", "many"]).assert().failure();
}

#[test]
fn test_cli_api_url_from_env() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .env("FOLIO_API_URL", "http://127.0.0.1:9")
        .args(["--api-key", "k", "--api-secret", "s", "--login", "me@example.com", "--timeout", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Export failed"));
}

#[test]
fn test_cli_invalid_api_url() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["--api-key", "k", "--api-secret", "s", "--login", "me@example.com", "--api-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}
