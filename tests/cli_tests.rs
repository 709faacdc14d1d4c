mod support;

use std::fs;
#[cfg(unix)]
use std::path::Path;
#[cfg(unix)]
use std::process::{Child, Stdio};
#[cfg(unix)]
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use signalsync::testkit::http::{StubResponse, StubServer};
use tempfile::tempdir;

use support::config::{config_for, write_config};
use support::feed::{THREE_SIGNALS, THREE_SIGNALS_RAW};

fn signalsync() -> Command {
    let mut cmd = Command::cargo_bin("signalsync").expect("signalsync binary");
    cmd.env_remove("SIGNALSYNC_URL")
        .env_remove("SIGNALSYNC_POLL_SECS")
        .env_remove("SIGNALSYNC_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Start the binary with piped stdout so its log lines can be inspected
/// after it is interrupted.
#[cfg(unix)]
fn spawn_signalsync(args: &[&str], config: &Path) -> Child {
    std::process::Command::new(assert_cmd::cargo::cargo_bin("signalsync"))
        .env_remove("SIGNALSYNC_URL")
        .env_remove("SIGNALSYNC_POLL_SECS")
        .env_remove("SIGNALSYNC_OUTPUT")
        .env_remove("RUST_LOG")
        .args(args)
        .arg("--config")
        .arg(config)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn signalsync")
}

#[cfg(unix)]
fn send_sigint(child: &Child) {
    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(status.success(), "kill -INT failed");
}

#[cfg(unix)]
async fn wait_until(what: &str, mut ready: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !ready() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[test]
fn check_config_rejects_invalid_interval() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[polling]\ninterval_secs = -3\n");

    signalsync()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for interval_secs"));
}

#[test]
fn check_config_prints_effective_settings() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("signals_out.csv");
    let path = write_config(dir.path(), &config_for("http://10.1.2.3:8000/signals", &output));

    signalsync()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("http://10.1.2.3:8000/signals"))
        .stdout(predicate::str::contains(output.display().to_string()));
}

#[test]
fn check_config_without_file_uses_defaults() {
    let dir = tempdir().unwrap();

    signalsync()
        .args(["check", "config", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("signals_out.csv"));
}

#[test]
fn env_override_reaches_the_binary() {
    let dir = tempdir().unwrap();

    signalsync()
        .env("SIGNALSYNC_URL", "https://feed.example.net/v2/signals")
        .args(["check", "config", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("https://feed.example.net/v2/signals"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn check_fetch_reports_signal_count() {
    let server = StubServer::start(vec![StubResponse::ok(THREE_SIGNALS_RAW)]).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("signals_out.csv");
    let path = write_config(dir.path(), &config_for(server.url().as_str(), &output));

    let assert = tokio::task::spawn_blocking(move || {
        signalsync()
            .args(["check", "fetch", "--config"])
            .arg(&path)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Signals: 3"));
    assert!(!output.exists(), "check fetch must not write the snapshot");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn check_fetch_fails_on_unreachable_feed() {
    let url = StubServer::unused_url().await;
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        &config_for(url.as_str(), &dir.path().join("signals_out.csv")),
    );

    let assert = tokio::task::spawn_blocking(move || {
        signalsync()
            .args(["check", "fetch", "--config"])
            .arg(&path)
            .assert()
    })
    .await
    .unwrap();

    assert.failure().stdout(predicate::str::contains("Fetch failed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_once_writes_the_snapshot() {
    let server = StubServer::start(vec![StubResponse::ok(THREE_SIGNALS_RAW)]).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("out").join("signals_out.csv");
    let path = write_config(dir.path(), &config_for(server.url().as_str(), &output));

    let assert = tokio::task::spawn_blocking(move || {
        signalsync()
            .args(["run", "--once", "--json-logs", "--config"])
            .arg(&path)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Updated snapshot (3 signals)"));
    assert_eq!(fs::read_to_string(&output).unwrap(), THREE_SIGNALS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_once_with_failed_fetch_writes_nothing() {
    let server = StubServer::start(vec![StubResponse::status(503, "down")]).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("signals_out.csv");
    let path = write_config(dir.path(), &config_for(server.url().as_str(), &output));

    let assert = tokio::task::spawn_blocking(move || {
        signalsync()
            .args(["run", "--once", "--json-logs", "--config"])
            .arg(&path)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Fetch failed"));
    assert!(!output.exists());
}

#[test]
fn run_rejects_bad_url_override() {
    let dir = tempdir().unwrap();

    signalsync()
        .args(["run", "--once", "--url", "not a url", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for url"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_exits_cleanly_on_sigint_and_keeps_the_snapshot() {
    let server = StubServer::start(vec![StubResponse::ok(THREE_SIGNALS_RAW)]).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("signals_out.csv");
    let path = write_config(dir.path(), &config_for(server.url().as_str(), &output));

    let child = spawn_signalsync(&["run", "--json-logs"], &path);
    wait_until("first snapshot write", || output.exists()).await;
    // Let a few unchanged cycles go by so the signal lands mid-loop.
    tokio::time::sleep(Duration::from_millis(300)).await;

    send_sigint(&child);
    let result = tokio::task::spawn_blocking(move || child.wait_with_output())
        .await
        .unwrap()
        .expect("wait for signalsync");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(result.status.success(), "exit status {:?}, stdout: {stdout}", result.status);
    assert!(stdout.contains("Interrupted by user"), "stdout: {stdout}");
    assert!(stdout.contains("signalsync stopped"), "stdout: {stdout}");
    assert_eq!(fs::read_to_string(&output).unwrap(), THREE_SIGNALS);
    assert!(!dir.path().join("signals_out.csv.tmp").exists());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_once_exits_cleanly_on_sigint_during_fetch() {
    let server = StubServer::start(vec![StubResponse::Hang]).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("signals_out.csv");
    let path = write_config(dir.path(), &config_for(server.url().as_str(), &output));

    let child = spawn_signalsync(&["run", "--once", "--json-logs"], &path);
    wait_until("fetch to reach the server", || server.request_count() >= 1).await;

    send_sigint(&child);
    let result = tokio::task::spawn_blocking(move || child.wait_with_output())
        .await
        .unwrap()
        .expect("wait for signalsync");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(result.status.success(), "exit status {:?}, stdout: {stdout}", result.status);
    assert!(stdout.contains("Interrupted by user"), "stdout: {stdout}");
    assert!(!stdout.contains("Single cycle complete"), "stdout: {stdout}");
    assert!(!output.exists());
}
