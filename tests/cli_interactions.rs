//! CLI behavior tests
//!
//! These run the built binary against local wiremock servers, so they never
//! touch the public network.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Test command with a clean THOR_* environment
fn create_test_cmd() -> Command {
    let mut cmd = Command::cargo_bin("thor").unwrap();
    cmd.env_remove("THOR_HAMMERS")
        .env_remove("THOR_THROWS")
        .env_remove("THOR_TIMEOUT")
        .env_remove("THOR_LOG_LEVEL")
        .env_remove("THOR_LOG_FORMAT")
        .env("NO_COLOR", "1");
    cmd
}

async fn start_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn count_lines(stdout: &str, needle: &str) -> usize {
    stdout.lines().filter(|line| line.contains(needle)).count()
}

#[test]
fn test_missing_url_prints_usage() {
    create_test_cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage: thor [-h HAMMERS -t THROWS] URL"));
}

#[test]
fn test_help_exits_zero() {
    create_test_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: thor [-h HAMMERS -t THROWS] URL"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_invalid_counts_are_usage_errors() {
    let cases: [&[&str]; 5] = [
        &["-h", "0", "http://127.0.0.1:9/"],
        &["-t", "0", "http://127.0.0.1:9/"],
        &["-h", "abc", "http://127.0.0.1:9/"],
        &["-t", "-3", "http://127.0.0.1:9/"],
        &["-h", "20000", "http://127.0.0.1:9/"],
    ];

    for args in cases {
        create_test_cmd()
            .args(args)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("TOTAL").not());
    }
}

#[test]
fn test_unknown_flag_is_usage_error() {
    create_test_cmd()
        .args(["-x", "http://127.0.0.1:9/"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_url_is_usage_error() {
    create_test_cmd()
        .arg("not-a-url")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("Invalid URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_successful_run_line_counts() {
    let server = start_server(200, "pong").await;

    let mut cmd = create_test_cmd();
    cmd.args(["-h", "5", "-t", "3"]).arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(count_lines(&stdout, "Throw:"), 15);
    assert_eq!(count_lines(&stdout, "AVERAGE   ,"), 5);
    assert_eq!(count_lines(&stdout, "TOTAL AVERAGE ELAPSED TIME:"), 1);
    assert!(stdout.trim_end().lines().last().unwrap().starts_with("TOTAL AVERAGE ELAPSED TIME: "));
    assert!(!stdout.contains("pong"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 15);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_defaults_are_one_hammer_one_throw() {
    let server = start_server(200, "pong").await;

    let mut cmd = create_test_cmd();
    cmd.arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.starts_with("Hammer: 0, Throw:   0, Elapsed Time: "));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verbose_prints_bodies() {
    let server = start_server(200, "hello from the anvil").await;

    let mut cmd = create_test_cmd();
    cmd.args(["-v", "-t", "2"]).arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(count_lines(&stdout, "hello from the anvil"), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_fails_without_total() {
    let server = start_server(500, "boom").await;

    let mut cmd = create_test_cmd();
    cmd.args(["-h", "2", "-t", "2"]).arg(server.uri());
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("TOTAL AVERAGE"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("500"));
}

#[test]
fn test_connection_refused_fails() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}/", listener.local_addr().unwrap())
    };

    create_test_cmd()
        .arg(uri)
        .assert()
        .failure()
        .stdout(predicate::str::contains("TOTAL").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_var_fallbacks() {
    let server = start_server(200, "pong").await;

    let mut cmd = create_test_cmd();
    cmd.env("THOR_HAMMERS", "2").env("THOR_THROWS", "2").arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(count_lines(&stdout, "Throw:"), 4);
    assert_eq!(count_lines(&stdout, "AVERAGE   ,"), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_overrides_env() {
    let server = start_server(200, "pong").await;

    let mut cmd = create_test_cmd();
    cmd.env("THOR_HAMMERS", "4").args(["-h", "1"]).arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(count_lines(&stdout, "AVERAGE   ,"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_file_in_working_directory() {
    let server = start_server(200, "pong").await;
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "THOR_THROWS=3\n").unwrap();

    let mut cmd = create_test_cmd();
    cmd.current_dir(temp_dir.path()).arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(count_lines(&stdout, "Throw:"), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debug_logs_stay_off_stdout() {
    let server = start_server(200, "pong").await;

    let mut cmd = create_test_cmd();
    cmd.args(["--debug", "-h", "2"]).arg(server.uri());
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout
        .lines()
        .all(|line| line.starts_with("Hammer: ") || line.starts_with("TOTAL AVERAGE ELAPSED TIME: ")));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("DEBUG"));
}
